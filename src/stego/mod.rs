//! LSB image steganography
//!
//! A message is hidden in the least significant bit of the red, green and
//! blue channels, three bits per pixel, walking pixels in row-major order.
//! The end of the message is marked by [`TERMINATOR`].
//!
//! Only lossless carriers survive: any recompression destroys the LSBs.

pub mod carrier;
pub mod lsb;

pub use lsb::{capacity, capacity_for, embed, extract};

/// Literal appended to every hidden message
pub const TERMINATOR: &str = "<<<CRIPTES_FIN>>>";

/// Bytes held back from the advertised capacity
pub const SAFETY_MARGIN: usize = 10;
