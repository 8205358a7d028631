//! Constant-time comparisons
//!
//! Digest and tag comparisons go through here so that the time taken does
//! not reveal how many leading bytes matched.

use subtle::ConstantTimeEq;

/// Constant-time equality of byte slices
///
/// Length is not secret, so unequal lengths return early.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Constant-time, ASCII case-insensitive equality of hex strings
pub fn ct_eq_hex(a: &str, b: &str) -> bool {
    let a = a.to_ascii_lowercase();
    let b = b.to_ascii_lowercase();
    ct_eq(a.as_bytes(), b.as_bytes())
}
