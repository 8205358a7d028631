//! criptes - an educational cryptography toolkit
//!
//! This crate provides:
//! - Password-based text encryption with AES-256, DES, 3DES and ChaCha20
//! - RSA-2048 key pairs and RSA-OAEP for short messages
//! - MD5 / SHA-1 / SHA-256 / SHA-512 digests with constant-time verification
//! - LSB steganography in lossless images
//!
//! Insecure algorithms are offered for study and comparison and are flagged
//! as such.

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod stego;

pub use error::{CriptesError, Result};
