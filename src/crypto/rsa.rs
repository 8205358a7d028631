//! RSA-2048 key pairs and RSA-OAEP (SHA-256, MGF1-SHA-256)
//!
//! Public keys are X.509 SubjectPublicKeyInfo and private keys PKCS#8, both
//! PEM-framed, so they interoperate with OpenSSL and other generic tooling.
//! RSA only encrypts short messages; longer text belongs in the symmetric
//! engine.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::pem;
use crate::error::{CriptesError, Result};

/// Modulus size in bits
pub const KEY_BITS: usize = 2048;

/// User-facing limit on plaintext characters
pub const MAX_PLAINTEXT_CHARS: usize = 200;

/// OAEP-SHA-256 capacity of a 2048-bit modulus: `256 - 2 * 32 - 2`
pub const MAX_PLAINTEXT_BYTES: usize = KEY_BITS / 8 - 2 * 32 - 2;

pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

/// A PEM-encoded RSA key pair
pub struct KeyPair {
    public_key_pem: String,
    /// PKCS#8 private key, zeroed on drop
    private_key_pem: Zeroizing<String>,
}

impl KeyPair {
    /// Generate a new 2048-bit key pair from the OS CSPRNG
    ///
    /// Takes from a fraction of a second to a few seconds; there is no way
    /// to cancel it once started.
    pub fn generate() -> Result<Self> {
        info!(bits = KEY_BITS, "generating RSA key pair");

        let private_key = RsaPrivateKey::new(&mut OsRng, KEY_BITS)
            .map_err(|e| CriptesError::crypto("Failed to generate RSA key pair", e))?;
        let public_key = RsaPublicKey::from(&private_key);

        let public_der = public_key
            .to_public_key_der()
            .map_err(|e| CriptesError::crypto("Failed to encode public key", e))?;
        let private_der = private_key
            .to_pkcs8_der()
            .map_err(|e| CriptesError::crypto("Failed to encode private key", e))?;

        Ok(Self {
            public_key_pem: pem::encode(PUBLIC_KEY_LABEL, public_der.as_bytes()),
            private_key_pem: Zeroizing::new(pem::encode(PRIVATE_KEY_LABEL, private_der.as_bytes())),
        })
    }

    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    pub fn private_key_pem(&self) -> &str {
        &self.private_key_pem
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key_pem", &self.public_key_pem)
            .field("private_key_pem", &"[REDACTED]")
            .finish()
    }
}

/// Generate a new RSA key pair
pub fn generate_key_pair() -> Result<KeyPair> {
    KeyPair::generate()
}

/// Parse an X.509 SubjectPublicKeyInfo PEM
pub fn load_public_key(public_key_pem: &str) -> Result<RsaPublicKey> {
    let der = pem::decode(PUBLIC_KEY_LABEL, public_key_pem)?;
    RsaPublicKey::from_public_key_der(&der)
        .map_err(|e| CriptesError::crypto("Invalid public key", e))
}

/// Parse a PKCS#8 private key PEM
pub fn load_private_key(private_key_pem: &str) -> Result<RsaPrivateKey> {
    let der = Zeroizing::new(pem::decode(PRIVATE_KEY_LABEL, private_key_pem)?);
    RsaPrivateKey::from_pkcs8_der(&der)
        .map_err(|e| CriptesError::crypto("Invalid private key", e))
}

/// Encrypt short text for the holder of the matching private key
///
/// Returns base64 ciphertext (256 bytes before encoding).
///
/// # Errors
/// `Validation` for blank text, blank key, more than
/// [`MAX_PLAINTEXT_CHARS`] characters or more than [`MAX_PLAINTEXT_BYTES`]
/// UTF-8 bytes; `Crypto` for a malformed key or a provider failure.
pub fn encrypt(plaintext: &str, public_key_pem: &str) -> Result<String> {
    if plaintext.trim().is_empty() {
        return Err(CriptesError::validation("Text must not be empty"));
    }
    if public_key_pem.trim().is_empty() {
        return Err(CriptesError::validation("Public key must not be empty"));
    }
    if plaintext.chars().count() > MAX_PLAINTEXT_CHARS {
        return Err(CriptesError::validation(format!(
            "RSA can only encrypt short text (max {MAX_PLAINTEXT_CHARS} characters). Use AES for longer text."
        )));
    }
    if plaintext.len() > MAX_PLAINTEXT_BYTES {
        return Err(CriptesError::validation(format!(
            "Text is {} bytes once encoded; RSA-2048 with OAEP fits at most {MAX_PLAINTEXT_BYTES}",
            plaintext.len()
        )));
    }

    let public_key = load_public_key(public_key_pem)?;
    debug!(len = plaintext.len(), "RSA-OAEP encrypt");

    let ciphertext = public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext.as_bytes())
        .map_err(|e| CriptesError::crypto("Encryption failed", e))?;

    Ok(STANDARD.encode(ciphertext))
}

/// Decrypt base64 ciphertext produced by [`encrypt`]
///
/// # Errors
/// `Validation` for blank input; `Crypto` for a malformed key, malformed
/// ciphertext, or the wrong private key.
pub fn decrypt(ciphertext_b64: &str, private_key_pem: &str) -> Result<String> {
    if ciphertext_b64.trim().is_empty() {
        return Err(CriptesError::validation("Ciphertext must not be empty"));
    }
    if private_key_pem.trim().is_empty() {
        return Err(CriptesError::validation("Private key must not be empty"));
    }

    let private_key = load_private_key(private_key_pem)?;
    let ciphertext = STANDARD
        .decode(ciphertext_b64.trim())
        .map_err(|e| CriptesError::crypto("Ciphertext is not valid base64", e))?;

    debug!(len = ciphertext.len(), "RSA-OAEP decrypt");
    let plaintext = private_key
        .decrypt(Oaep::new::<Sha256>(), &ciphertext)
        .map_err(|e| {
            CriptesError::crypto("Decryption failed; make sure you use the matching private key", e)
        })?;

    String::from_utf8(plaintext)
        .map_err(|e| CriptesError::crypto("Decrypted data is not valid text", e))
}
