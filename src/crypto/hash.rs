//! Cryptographic hashing: MD5, SHA-1, SHA-256, SHA-512
//!
//! Digests are rendered as lowercase, zero-padded hex. MD5 and SHA-1 are
//! offered for teaching and legacy comparison only; both have practical
//! collision attacks.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use tracing::{debug, warn};

use super::constant_time::ct_eq_hex;
use crate::error::{CriptesError, Result};

/// Sentinel stored by [`digest_all`] for an algorithm that failed
pub const ERROR_SENTINEL: &str = "ERROR";

/// Supported hash algorithms
///
/// Serialized as its short id; deserialized through [`FromStr`], so labels
/// and aliases are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum HashAlgorithm {
    #[serde(rename = "md5")]
    Md5,
    #[serde(rename = "sha1")]
    Sha1,
    #[serde(rename = "sha256")]
    Sha256,
    #[serde(rename = "sha512")]
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [Self::Md5, Self::Sha1, Self::Sha256, Self::Sha512];

    pub fn label(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// Output size in bits
    pub fn bits(self) -> usize {
        match self {
            Self::Md5 => 128,
            Self::Sha1 => 160,
            Self::Sha256 => 256,
            Self::Sha512 => 512,
        }
    }

    /// Length of the hex rendering
    pub fn hex_len(self) -> usize {
        self.bits() / 4
    }

    pub fn is_secure(self) -> bool {
        matches!(self, Self::Sha256 | Self::Sha512)
    }

    fn from_hex_len(len: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.hex_len() == len)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = CriptesError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl FromStr for HashAlgorithm {
    type Err = CriptesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(CriptesError::validation(format!(
                "Unknown hash '{s}' (expected md5, sha1, sha256 or sha512)"
            ))),
        }
    }
}

/// Raw digest of arbitrary bytes, including the empty input
pub fn digest_bytes(data: &[u8], algorithm: HashAlgorithm) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Md5 => Md5::digest(data).to_vec(),
        HashAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
        HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
    }
}

/// Hex digest of `text` (UTF-8)
///
/// # Errors
/// `Validation` if `text` is empty. Whitespace is ordinary input.
pub fn digest(text: &str, algorithm: HashAlgorithm) -> Result<String> {
    if text.is_empty() {
        return Err(CriptesError::validation("Text must not be empty"));
    }
    if !algorithm.is_secure() {
        debug!(algorithm = %algorithm, "hashing with a broken algorithm");
    }

    Ok(hex::encode(digest_bytes(text.as_bytes(), algorithm)))
}

/// Digest `text` with every algorithm
///
/// Each entry is computed independently; a failure stores [`ERROR_SENTINEL`]
/// for that algorithm and leaves the others intact.
pub fn digest_all(text: &str) -> BTreeMap<HashAlgorithm, String> {
    HashAlgorithm::ALL
        .into_iter()
        .map(|algorithm| {
            let value = digest(text, algorithm).unwrap_or_else(|e| {
                warn!(algorithm = %algorithm, error = %e, "digest failed");
                ERROR_SENTINEL.to_string()
            });
            (algorithm, value)
        })
        .collect()
}

/// Check `text` against an expected hex digest
///
/// Comparison is constant-time and case-insensitive. Any failure to compute
/// the digest counts as a mismatch.
pub fn verify(text: &str, expected_hex: &str, algorithm: HashAlgorithm) -> bool {
    match digest(text, algorithm) {
        Ok(actual) => ct_eq_hex(&actual, expected_hex.trim()),
        Err(_) => false,
    }
}

/// Guess which algorithms could have produced `hex` from its length alone
///
/// This is a heuristic: any 64-character hex string "looks like" SHA-256
/// whether or not it is one. Returns the empty set for non-hex input or an
/// unknown length.
pub fn identify_by_length(hex: &str) -> BTreeSet<HashAlgorithm> {
    let cleaned = hex.trim().to_ascii_lowercase();
    if !cleaned.bytes().all(|b| b.is_ascii_hexdigit()) {
        return BTreeSet::new();
    }

    HashAlgorithm::from_hex_len(cleaned.len()).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        let expected = [
            (HashAlgorithm::Md5, "4d186321c1a7f0f354b297e8914ab240"),
            (HashAlgorithm::Sha1, "99800b85d3383e3a2fb45eb7d0066a4879a9dad0"),
            (
                HashAlgorithm::Sha256,
                "b221d9dbb083a7f33428d7c2a3c3198ae925614d70210e28716ccaa7cd4ddb79",
            ),
            (
                HashAlgorithm::Sha512,
                "e83e8535d6f689493e5819bd60aa3e5fdcba940e6d111ab6fb5c34f24f86496b\
                 f3726e2bf4ec59d6d2f5a2aeb1e4f103283e7d64e4f49c03b4c4725cb361e773",
            ),
        ];
        for (algorithm, hex) in expected {
            let actual = digest("hola", algorithm).unwrap();
            assert_eq!(actual, hex);
            assert_eq!(actual.len(), algorithm.hex_len());
        }
    }

    #[test]
    fn test_empty_input_digest_bytes() {
        assert_eq!(
            hex::encode(digest_bytes(b"", HashAlgorithm::Sha256)),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_empty_text_rejected() {
        assert!(matches!(digest("", HashAlgorithm::Sha256), Err(CriptesError::Validation(_))));
        assert!(matches!(digest("", HashAlgorithm::Md5), Err(CriptesError::Validation(_))));
    }

    #[test]
    fn test_whitespace_is_hashed() {
        assert_eq!(
            digest(" ", HashAlgorithm::Sha256).unwrap(),
            "36a9e7f1c95b82ffb99743e0c5c4ce95d83c9a430aac59f84ef3cbfab6145068"
        );
        assert!(verify(" \t", &digest(" \t", HashAlgorithm::Md5).unwrap(), HashAlgorithm::Md5));
    }

    #[test]
    fn test_digest_all_covers_every_algorithm() {
        let all = digest_all("hola");
        assert_eq!(all.len(), 4);
        for (algorithm, hex) in &all {
            assert_eq!(hex.len(), algorithm.hex_len());
        }
    }

    #[test]
    fn test_digest_all_empty_uses_sentinel() {
        let all = digest_all("");
        assert_eq!(all.len(), 4);
        assert!(all.values().all(|v| v == ERROR_SENTINEL));
    }

    #[test]
    fn test_verify() {
        for algorithm in HashAlgorithm::ALL {
            let hex = digest("message", algorithm).unwrap();
            assert!(verify("message", &hex, algorithm));
            assert!(verify("message", &hex.to_uppercase(), algorithm));
            assert!(!verify("messagf", &hex, algorithm));
            assert!(!verify("message", &"0".repeat(algorithm.hex_len()), algorithm));
        }
        assert!(!verify("", "", HashAlgorithm::Sha256));
    }

    #[test]
    fn test_identify_by_length() {
        let sha256 = "a".repeat(64);
        assert_eq!(
            identify_by_length(&sha256),
            BTreeSet::from([HashAlgorithm::Sha256])
        );
        assert_eq!(
            identify_by_length("  D41D8CD98F00B204E9800998ECF8427E "),
            BTreeSet::from([HashAlgorithm::Md5])
        );
        assert!(identify_by_length(&"g".repeat(64)).is_empty());
        assert!(identify_by_length(&"a".repeat(50)).is_empty());
        assert!(identify_by_length("").is_empty());
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("SHA-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("sha_1".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha1);
        assert!("crc32".parse::<HashAlgorithm>().is_err());

        for algorithm in HashAlgorithm::ALL {
            assert_eq!(algorithm.id().parse::<HashAlgorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_avalanche() {
        let inputs = ["hello world", "criptes", "The quick brown fox", "0000", "pass"];
        for algorithm in HashAlgorithm::ALL {
            for input in inputs {
                let mut flipped = input.to_string();
                let last = flipped.pop().unwrap();
                flipped.push(if last == 'x' { 'y' } else { 'x' });

                let a = digest(input, algorithm).unwrap();
                let b = digest(&flipped, algorithm).unwrap();
                let changed = a.chars().zip(b.chars()).filter(|(x, y)| x != y).count();
                assert!(
                    changed * 4 >= a.len(),
                    "{algorithm}: only {changed}/{} hex digits changed",
                    a.len()
                );
            }
        }
    }
}
