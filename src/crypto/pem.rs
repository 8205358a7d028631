//! Minimal PEM framing
//!
//! `-----BEGIN {label}-----`, base64 body wrapped at 64 columns,
//! `-----END {label}-----`. Encoding is independent of what the DER bytes
//! contain; the label is the only thing that differs between key types.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{CriptesError, Result};

/// Base64 characters per body line
pub const LINE_WIDTH: usize = 64;

pub fn header(label: &str) -> String {
    format!("-----BEGIN {label}-----")
}

pub fn footer(label: &str) -> String {
    format!("-----END {label}-----")
}

/// Wrap DER bytes in a PEM block
pub fn encode(label: &str, der: &[u8]) -> String {
    let body = STANDARD.encode(der);
    let lines: Vec<&str> = body
        .as_bytes()
        .chunks(LINE_WIDTH)
        // base64 output is ASCII, so every chunk is valid UTF-8
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect();

    format!("{}\n{}\n{}", header(label), lines.join("\n"), footer(label))
}

/// Recover DER bytes from a PEM block
///
/// Strips the header and footer for `label`, drops every line break, and
/// base64-decodes what is left.
pub fn decode(label: &str, pem: &str) -> Result<Vec<u8>> {
    let body: String = pem
        .replace(&header(label), "")
        .replace(&footer(label), "")
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect();
    let body = body.trim();

    if body.is_empty() {
        return Err(CriptesError::validation(format!("{label} must not be empty")));
    }

    STANDARD
        .decode(body)
        .map_err(|e| CriptesError::crypto(&format!("Malformed {label}"), e))
}
