//! PBKDF2-HMAC-SHA256 key derivation
//!
//! Turns a user password into key material of exactly the length the
//! selected cipher needs. The salt is not random: it is derived from the
//! algorithm identifier, so the same password and algorithm always yield
//! the same key. Envelopes produced by earlier versions depend on this,
//! so it must not change without a format version bump.

use std::ops::Deref;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use super::SymmetricAlgorithm;

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// PBKDF2 iteration count
pub const ITERATIONS: u32 = 65_536;

/// Salts are right-padded with this byte up to [`SALT_LEN`]
const SALT_PAD: u8 = b'0';

/// Key material derived from a password, zeroed on drop
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DerivedKey(Vec<u8>);

impl DerivedKey {
    fn new(bytes: Vec<u8>) -> Self {
        let key = Self(bytes);
        key.lock_memory();
        key
    }

    /// Lock memory to prevent swapping (best effort, may fail without privileges)
    #[cfg(unix)]
    fn lock_memory(&self) {
        // SAFETY: pointer and length describe the live allocation owned by self.0
        unsafe {
            libc::mlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {}

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for DerivedKey {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Keep key bytes out of logs and panic messages
impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("len", &self.0.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}

/// Deterministic salt for an algorithm: `CriptES_{ID}_sal`, padded with
/// `'0'` and cut to [`SALT_LEN`] bytes
pub fn salt_for(algorithm: SymmetricAlgorithm) -> [u8; SALT_LEN] {
    let label = format!("CriptES_{}_sal", algorithm.salt_id());
    let mut salt = [SALT_PAD; SALT_LEN];
    for (dst, src) in salt.iter_mut().zip(label.bytes()) {
        *dst = src;
    }
    salt
}

/// Derive a key for `algorithm` from `password`
///
/// The output length always equals [`SymmetricAlgorithm::key_len`].
pub fn derive_key(password: &str, algorithm: SymmetricAlgorithm) -> DerivedKey {
    let salt = salt_for(algorithm);
    let mut key = vec![0u8; algorithm.key_len()];

    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, ITERATIONS, &mut key);

    tracing::trace!(algorithm = %algorithm, key_len = key.len(), "derived key");
    DerivedKey::new(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_is_padded_and_truncated() {
        assert_eq!(&salt_for(SymmetricAlgorithm::Aes), b"CriptES_AES_sal0");
        assert_eq!(&salt_for(SymmetricAlgorithm::Des), b"CriptES_DES_sal0");
        assert_eq!(&salt_for(SymmetricAlgorithm::TripleDes), b"CriptES_TRIPLE_D");
        assert_eq!(&salt_for(SymmetricAlgorithm::ChaCha20), b"CriptES_CHACHA20");
    }

    #[test]
    fn test_key_length_matches_algorithm() {
        for algorithm in SymmetricAlgorithm::ALL {
            let key = derive_key("password", algorithm);
            assert_eq!(key.len(), algorithm.key_len());
        }
    }

    #[test]
    fn test_known_derivations() {
        let aes = derive_key("password", SymmetricAlgorithm::Aes);
        assert_eq!(
            hex::encode(&*aes),
            "ed7bec85232dfd001d5f41591b7b4f149dba6d7511a393d5ed1864ffe72f813f"
        );

        let des = derive_key("password", SymmetricAlgorithm::Des);
        assert_eq!(hex::encode(&*des), "f3e1c0a544bd53bc");
    }

    #[test]
    fn test_derive_key_deterministic() {
        let key1 = derive_key("test_password_123", SymmetricAlgorithm::Aes);
        let key2 = derive_key("test_password_123", SymmetricAlgorithm::Aes);

        assert_eq!(&*key1, &*key2);
    }

    #[test]
    fn test_different_algorithms_use_different_salts() {
        let aes = derive_key("test_password_123", SymmetricAlgorithm::Aes);
        let chacha = derive_key("test_password_123", SymmetricAlgorithm::ChaCha20);

        // Same length, different salt
        assert_ne!(&*aes, &*chacha);
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = derive_key("pw", SymmetricAlgorithm::Des);
        let printed = format!("{key:?}");
        assert!(printed.contains("REDACTED"));
        assert!(printed.contains("len: 8"));
    }
}
