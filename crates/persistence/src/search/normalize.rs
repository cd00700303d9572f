//! Normalization of untrusted numeric inputs.
//!
//! Offsets, limits and depths arrive as unbounded unsigned integers. Backends
//! expect signed 32-bit values, so everything is clamped to `i32::MAX` before a
//! query is built. These functions run inside plan construction and therefore
//! apply identically to every backend.

/// Upper bound for every normalized value.
pub const INT32_MAX: u32 = i32::MAX as u32;

/// Page size used when an event query does not specify one.
pub const DEFAULT_EVENT_LIMIT: u32 = 10;

/// Bucket count used when an attribute query does not specify one.
pub const DEFAULT_ATTRIBUTE_LIMIT: u32 = 10_000;

fn clamp(value: u64) -> u32 {
    value.min(u64::from(INT32_MAX)) as u32
}

/// Clamps an offset to `[0, i32::MAX]`.
pub fn normalize_offset(offset: u64) -> u32 {
    clamp(offset)
}

/// Normalizes an event page size: `0` selects the default of 10.
pub fn normalize_event_limit(limit: u64) -> u32 {
    if limit == 0 {
        DEFAULT_EVENT_LIMIT
    } else {
        clamp(limit)
    }
}

/// Normalizes an attribute bucket count: `0` selects the default of 10000.
pub fn normalize_attribute_limit(limit: u64) -> u32 {
    if limit == 0 {
        DEFAULT_ATTRIBUTE_LIMIT
    } else {
        clamp(limit)
    }
}

/// Normalizes a truncation depth.
///
/// `0` means "no truncation" and yields `None`.
pub fn normalize_max_depth(max_depth: u64) -> Option<u32> {
    if max_depth == 0 {
        None
    } else {
        Some(clamp(max_depth))
    }
}
