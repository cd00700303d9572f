//! A canned HTTP server standing in for a search cluster.

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use tokio::net::TcpListener;

/// Requests received by a [`CannedServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Answers every request with the same status and body.
pub struct CannedServer {
    pub url: String,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl CannedServer {
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let body: String = body.into();
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();
        let recorded = requests.clone();

        let app = Router::new().fallback(move |request: axum::extract::Request| {
            let body = body.clone();
            let recorded = recorded.clone();
            async move {
                let method = request.method().to_string();
                let path = request.uri().path().to_string();
                let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
                    .await
                    .unwrap_or_default();
                recorded.lock().push(RecordedRequest {
                    method,
                    path,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
                canned_response(status, body)
            }
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests.lock().last().cloned().unwrap()
    }
}

fn canned_response(status: StatusCode, body: String) -> Response {
    let mut response = (status, body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert("x-elastic-product", HeaderValue::from_static("Elasticsearch"));
    response
}

/// An address nothing listens on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A search response body holding the given sources.
pub fn hits_body(sources: &[serde_json::Value]) -> String {
    let hits: Vec<_> = sources
        .iter()
        .map(|source| serde_json::json!({"_id": source["id"], "_source": source}))
        .collect();
    serde_json::json!({
        "took": 3,
        "timed_out": false,
        "hits": {"total": {"value": sources.len(), "relation": "eq"}, "hits": hits}
    })
    .to_string()
}
