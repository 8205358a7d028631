//! Cryptographic operations for criptes
//!
//! This module provides:
//! - PBKDF2 password-based key derivation
//! - AES-256 / DES / 3DES (CBC) and ChaCha20 text encryption
//! - RSA-2048 key pairs with PEM framing and OAEP encryption
//! - MD5 / SHA-1 / SHA-256 / SHA-512 hashing with constant-time verification
//!
//! Every operation is a pure function of its inputs. None of the engines
//! calls another.

pub mod constant_time;
pub mod hash;
pub mod kdf;
pub mod pem;
pub mod rsa;
pub mod symmetric;

pub use hash::HashAlgorithm;
pub use kdf::{derive_key, DerivedKey};
pub use rsa::{generate_key_pair, KeyPair};
pub use symmetric::SymmetricAlgorithm;
