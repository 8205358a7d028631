//! Password-based symmetric encryption
//!
//! Envelope format (base64 for transport):
//! - AES-256 / DES / 3DES: `[IV (block size)][CBC ciphertext, PKCS#7 padded]`
//! - ChaCha20: `[ciphertext]` only. The nonce is the fixed [`CHACHA20_NONCE`]
//!   and is not transmitted, so the algorithm must be known out of band.
//!
//! There is no authentication tag. A wrong password is usually caught by the
//! padding check on block modes; ChaCha20 can only catch it when the output
//! is not valid UTF-8.

use std::fmt;
use std::str::FromStr;

use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::{
    block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit, StreamCipher,
};
use chacha20::ChaCha20;
use des::{Des, TdesEde3};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::kdf::derive_key;
use crate::error::{CriptesError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type DesCbcEnc = cbc::Encryptor<Des>;
type DesCbcDec = cbc::Decryptor<Des>;
type TdesCbcEnc = cbc::Encryptor<TdesEde3>;
type TdesCbcDec = cbc::Decryptor<TdesEde3>;

/// Fixed ChaCha20 nonce (96 bits): bytes `0x00..=0x0b`
pub const CHACHA20_NONCE: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// Supported symmetric algorithms
///
/// Serialized as its short id; deserialized through [`FromStr`], so labels
/// and aliases are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum SymmetricAlgorithm {
    #[serde(rename = "aes")]
    Aes,
    #[serde(rename = "des")]
    Des,
    #[serde(rename = "3des")]
    TripleDes,
    #[serde(rename = "chacha20")]
    ChaCha20,
}

impl SymmetricAlgorithm {
    pub const ALL: [SymmetricAlgorithm; 4] = [Self::Aes, Self::Des, Self::TripleDes, Self::ChaCha20];

    /// Human-friendly name
    pub fn label(self) -> &'static str {
        match self {
            Self::Aes => "AES-256",
            Self::Des => "DES",
            Self::TripleDes => "3DES",
            Self::ChaCha20 => "ChaCha20",
        }
    }

    /// Short name accepted on the command line and stored in settings
    pub fn id(self) -> &'static str {
        match self {
            Self::Aes => "aes",
            Self::Des => "des",
            Self::TripleDes => "3des",
            Self::ChaCha20 => "chacha20",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Aes => "Current standard, the safest choice",
            Self::Des => "Classic, obsolete since the late 1990s",
            Self::TripleDes => "Triple DES, stronger than DES but legacy",
            Self::ChaCha20 => "Modern and fast, used in TLS 1.3",
        }
    }

    /// Cipher/mode/padding identifier
    pub fn transform(self) -> &'static str {
        match self {
            Self::Aes => "AES/CBC/PKCS7Padding",
            Self::Des => "DES/CBC/PKCS7Padding",
            Self::TripleDes => "DESede/CBC/PKCS7Padding",
            Self::ChaCha20 => "ChaCha20",
        }
    }

    /// Key length in bytes
    pub fn key_len(self) -> usize {
        match self {
            Self::Aes => 32,
            Self::Des => 8,
            Self::TripleDes => 24,
            Self::ChaCha20 => 32,
        }
    }

    /// Cipher block length in bytes (1 for the stream cipher)
    pub fn block_len(self) -> usize {
        match self {
            Self::Aes => 16,
            Self::Des | Self::TripleDes => 8,
            Self::ChaCha20 => 1,
        }
    }

    /// Length of the IV prefix stored in the envelope
    pub fn iv_len(self) -> usize {
        match self {
            Self::Aes => 16,
            Self::Des | Self::TripleDes => 8,
            Self::ChaCha20 => 0,
        }
    }

    /// Identifier mixed into the key-derivation salt
    pub fn salt_id(self) -> &'static str {
        match self {
            Self::Aes => "AES",
            Self::Des => "DES",
            Self::TripleDes => "TRIPLE_DES",
            Self::ChaCha20 => "CHACHA20",
        }
    }

    pub fn is_secure(self) -> bool {
        matches!(self, Self::Aes | Self::ChaCha20)
    }

    pub fn is_stream(self) -> bool {
        self == Self::ChaCha20
    }
}

impl fmt::Display for SymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for SymmetricAlgorithm {
    type Error = CriptesError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl FromStr for SymmetricAlgorithm {
    type Err = CriptesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes" | "aes256" | "aes-256" => Ok(Self::Aes),
            "des" => Ok(Self::Des),
            "3des" | "tripledes" | "triple-des" | "desede" => Ok(Self::TripleDes),
            "chacha20" | "chacha" => Ok(Self::ChaCha20),
            other => Err(CriptesError::validation(format!(
                "Unknown cipher '{other}' (expected aes, des, 3des or chacha20)"
            ))),
        }
    }
}

/// Encrypt `plaintext` with a key derived from `password`
///
/// Returns the base64 envelope.
///
/// # Errors
/// `Validation` for blank text or password, `Crypto` on provider failure.
pub fn encrypt(plaintext: &str, password: &str, algorithm: SymmetricAlgorithm) -> Result<String> {
    if plaintext.trim().is_empty() {
        return Err(CriptesError::validation("Text must not be empty"));
    }
    if password.trim().is_empty() {
        return Err(CriptesError::validation("Password must not be empty"));
    }
    if !algorithm.is_secure() {
        warn!(algorithm = %algorithm, "encrypting with an obsolete cipher");
    }

    debug!(algorithm = %algorithm, len = plaintext.len(), "encrypting");
    let key = derive_key(password, algorithm);
    let envelope = seal(&key, plaintext.as_bytes(), algorithm)?;

    Ok(STANDARD.encode(envelope))
}

/// Decrypt a base64 envelope produced by [`encrypt`]
///
/// # Errors
/// `Validation` for blank input; `Crypto` for malformed base64, undersized
/// ciphertext, bad padding, or non-UTF-8 output.
pub fn decrypt(envelope: &str, password: &str, algorithm: SymmetricAlgorithm) -> Result<String> {
    if envelope.trim().is_empty() {
        return Err(CriptesError::validation("Ciphertext must not be empty"));
    }
    if password.trim().is_empty() {
        return Err(CriptesError::validation("Password must not be empty"));
    }

    let bytes = STANDARD
        .decode(envelope.trim())
        .map_err(|e| CriptesError::crypto("Ciphertext is not valid base64", e))?;

    debug!(algorithm = %algorithm, len = bytes.len(), "decrypting");
    let key = derive_key(password, algorithm);
    let plaintext = open(&key, &bytes, algorithm)?;

    String::from_utf8(plaintext).map_err(|_| {
        CriptesError::Crypto(
            "Decryption produced invalid text; check the password and algorithm".into(),
        )
    })
}

/// Encrypt with an already-derived key, returning raw envelope bytes
pub fn seal(key: &[u8], plaintext: &[u8], algorithm: SymmetricAlgorithm) -> Result<Vec<u8>> {
    match algorithm {
        SymmetricAlgorithm::Aes => seal_cbc::<Aes256CbcEnc>(key, plaintext, algorithm.iv_len()),
        SymmetricAlgorithm::Des => seal_cbc::<DesCbcEnc>(key, plaintext, algorithm.iv_len()),
        SymmetricAlgorithm::TripleDes => seal_cbc::<TdesCbcEnc>(key, plaintext, algorithm.iv_len()),
        SymmetricAlgorithm::ChaCha20 => {
            let mut data = plaintext.to_vec();
            apply_chacha20(key, &mut data)?;
            Ok(data)
        }
    }
}

/// Decrypt raw envelope bytes with an already-derived key
pub fn open(key: &[u8], envelope: &[u8], algorithm: SymmetricAlgorithm) -> Result<Vec<u8>> {
    match algorithm {
        SymmetricAlgorithm::Aes => open_cbc::<Aes256CbcDec>(key, envelope, algorithm),
        SymmetricAlgorithm::Des => open_cbc::<DesCbcDec>(key, envelope, algorithm),
        SymmetricAlgorithm::TripleDes => open_cbc::<TdesCbcDec>(key, envelope, algorithm),
        SymmetricAlgorithm::ChaCha20 => {
            let mut data = envelope.to_vec();
            apply_chacha20(key, &mut data)?;
            Ok(data)
        }
    }
}

fn seal_cbc<E>(key: &[u8], plaintext: &[u8], iv_len: usize) -> Result<Vec<u8>>
where
    E: KeyIvInit + BlockEncryptMut,
{
    let mut iv = vec![0u8; iv_len];
    OsRng.fill_bytes(&mut iv);

    let cipher = E::new_from_slices(key, &iv)
        .map_err(|e| CriptesError::crypto("Encryption failed", e))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut envelope = iv;
    envelope.extend_from_slice(&ciphertext);
    Ok(envelope)
}

fn open_cbc<D>(key: &[u8], envelope: &[u8], algorithm: SymmetricAlgorithm) -> Result<Vec<u8>>
where
    D: KeyIvInit + BlockDecryptMut,
{
    let iv_len = algorithm.iv_len();
    let block_len = algorithm.block_len();

    // Need the IV plus at least one whole block
    if envelope.len() < iv_len + block_len || (envelope.len() - iv_len) % block_len != 0 {
        return Err(CriptesError::Crypto(format!(
            "Malformed ciphertext: {} bytes is not a valid {} envelope",
            envelope.len(),
            algorithm
        )));
    }

    let (iv, ciphertext) = envelope.split_at(iv_len);
    let cipher = D::new_from_slices(key, iv)
        .map_err(|e| CriptesError::crypto("Decryption failed", e))?;

    cipher.decrypt_padded_vec_mut::<Pkcs7>(ciphertext).map_err(|e| {
        warn!(algorithm = %algorithm, "padding check failed");
        CriptesError::crypto("Decryption failed; check the password and algorithm", e)
    })
}

fn apply_chacha20(key: &[u8], data: &mut [u8]) -> Result<()> {
    let mut cipher = ChaCha20::new_from_slices(key, &CHACHA20_NONCE)
        .map_err(|e| CriptesError::crypto("ChaCha20 setup failed", e))?;
    cipher.apply_keystream(data);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::derive_key;

    const PAYLOADS: [&str; 3] = ["a", "Contraseña secreta: ñandú 🔐 日本語", ""];

    fn long_payload() -> String {
        "0123456789abcdef".repeat(640)
    }

    #[test]
    fn test_seal_open_roundtrip_all_algorithms() {
        let big = long_payload();
        for algorithm in SymmetricAlgorithm::ALL {
            let key = derive_key("correct horse", algorithm);
            for payload in PAYLOADS.iter().copied().chain([big.as_str()]) {
                let envelope = seal(&key, payload.as_bytes(), algorithm).unwrap();
                let opened = open(&key, &envelope, algorithm).unwrap();
                assert_eq!(opened, payload.as_bytes(), "{algorithm} roundtrip");
            }
        }
    }

    #[test]
    fn test_envelope_layout() {
        for algorithm in SymmetricAlgorithm::ALL {
            let key = derive_key("pw", algorithm);
            let envelope = seal(&key, b"hello", algorithm).unwrap();

            if algorithm.is_stream() {
                assert_eq!(envelope.len(), 5);
            } else {
                // IV plus one padded block
                assert_eq!(envelope.len(), algorithm.iv_len() + algorithm.block_len());
            }
        }
    }

    #[test]
    fn test_block_modes_use_random_iv() {
        let key = derive_key("pw", SymmetricAlgorithm::Aes);
        let a = seal(&key, b"same message", SymmetricAlgorithm::Aes).unwrap();
        let b = seal(&key, b"same message", SymmetricAlgorithm::Aes).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_chacha20_is_deterministic() {
        let key = derive_key("pw", SymmetricAlgorithm::ChaCha20);
        let a = seal(&key, b"same message", SymmetricAlgorithm::ChaCha20).unwrap();
        let b = seal(&key, b"same message", SymmetricAlgorithm::ChaCha20).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_known_envelopes_decrypt() {
        for (algorithm, envelope) in KNOWN_ENVELOPES {
            assert_eq!(decrypt(envelope, "password", algorithm).unwrap(), "Hola, mundo!");
        }
    }

    #[test]
    fn test_chacha20_known_ciphertext() {
        let envelope = encrypt("Hola, mundo!", "password", SymmetricAlgorithm::ChaCha20).unwrap();
        assert_eq!(envelope, "FtEJ/AUATt6HmG7D");
    }

    #[test]
    fn test_blank_inputs_rejected() {
        let err = encrypt("   ", "pw", SymmetricAlgorithm::Aes).unwrap_err();
        assert!(matches!(err, CriptesError::Validation(_)));

        let err = encrypt("text", "", SymmetricAlgorithm::Aes).unwrap_err();
        assert!(matches!(err, CriptesError::Validation(_)));

        let err = decrypt("", "pw", SymmetricAlgorithm::Aes).unwrap_err();
        assert!(matches!(err, CriptesError::Validation(_)));
    }

    const KNOWN_ENVELOPES: [(SymmetricAlgorithm, &str); 4] = [
        (SymmetricAlgorithm::Aes, "AAECAwQFBgcICQoLDA0OD3uTW3Wdpg7p0CT/Ch/VxZE="),
        (SymmetricAlgorithm::Des, "AAECAwQFBgeiuG3aNlHjUvlZmlSbkxBB"),
        (SymmetricAlgorithm::TripleDes, "AAECAwQFBgeXx4m2mNQSMbp0WjWs7X6i"),
        (SymmetricAlgorithm::ChaCha20, "FtEJ/AUATt6HmG7D"),
    ];

    #[test]
    fn test_wrong_password_fails() {
        // CBC fails the padding check; ChaCha20 output is not valid UTF-8
        for (algorithm, envelope) in KNOWN_ENVELOPES {
            let result = decrypt(envelope, "wrong password", algorithm);
            assert!(matches!(result, Err(CriptesError::Crypto(_))), "{algorithm}");
        }
    }

    #[test]
    fn test_undersized_envelope_fails() {
        for algorithm in SymmetricAlgorithm::ALL.into_iter().filter(|a| !a.is_stream()) {
            let key = derive_key("pw", algorithm);
            let iv_len = algorithm.iv_len();
            let block_len = algorithm.block_len();

            for len in [0, iv_len, iv_len + block_len - 1, iv_len + block_len + 1] {
                let result = open(&key, &vec![0u8; len], algorithm);
                assert!(
                    matches!(result, Err(CriptesError::Crypto(_))),
                    "{algorithm} accepted {len} bytes"
                );
            }
        }
    }

    #[test]
    fn test_invalid_base64_fails() {
        let result = decrypt("not base64!!", "pw", SymmetricAlgorithm::Des);
        assert!(matches!(result, Err(CriptesError::Crypto(_))));
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("AES".parse::<SymmetricAlgorithm>().unwrap(), SymmetricAlgorithm::Aes);
        assert_eq!("3des".parse::<SymmetricAlgorithm>().unwrap(), SymmetricAlgorithm::TripleDes);
        assert_eq!("ChaCha20".parse::<SymmetricAlgorithm>().unwrap(), SymmetricAlgorithm::ChaCha20);
        assert!("rot13".parse::<SymmetricAlgorithm>().is_err());

        for algorithm in SymmetricAlgorithm::ALL {
            assert_eq!(algorithm.id().parse::<SymmetricAlgorithm>().unwrap(), algorithm);
        }
    }
}
