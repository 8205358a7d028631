//! User settings

use serde::{Deserialize, Serialize};

use crate::crypto::{HashAlgorithm, SymmetricAlgorithm};
use crate::error::{CriptesError, Result};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Persisted preferences, stored as `settings.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cipher used by `encrypt`/`decrypt` when `-a` is omitted
    pub default_cipher: SymmetricAlgorithm,
    /// Hash used by `hash digest`/`hash verify` when `-a` is omitted
    pub default_hash: HashAlgorithm,
    /// Log filter applied when neither `RUST_LOG` nor `-v` is given
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_cipher: SymmetricAlgorithm::Aes,
            default_hash: HashAlgorithm::Sha256,
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    pub const KEYS: [&'static str; 3] = ["default_cipher", "default_hash", "log_level"];

    /// Update one setting from its textual form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "default_cipher" => self.default_cipher = value.parse()?,
            "default_hash" => self.default_hash = value.parse()?,
            "log_level" => {
                let level = value.trim().to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(CriptesError::InvalidConfig(format!(
                        "log_level must be one of: {}",
                        LOG_LEVELS.join(", ")
                    )));
                }
                self.log_level = level;
            }
            other => {
                return Err(CriptesError::InvalidConfig(format!(
                    "Unknown key '{other}' (expected one of: {})",
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Current value of one setting, as shown by `config show`
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_cipher" => Some(self.default_cipher.id().to_string()),
            "default_hash" => Some(self.default_hash.id().to_string()),
            "log_level" => Some(self.log_level.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_cipher, SymmetricAlgorithm::Aes);
        assert_eq!(settings.default_hash, HashAlgorithm::Sha256);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"default_cipher":"chacha20"}"#).unwrap();
        assert_eq!(settings.default_cipher, SymmetricAlgorithm::ChaCha20);
        assert_eq!(settings.default_hash, HashAlgorithm::Sha256);
    }

    #[test]
    fn test_hand_edited_labels_accepted() {
        let json = r#"{"default_cipher":"AES-256","default_hash":"SHA-512"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.default_cipher, SymmetricAlgorithm::Aes);
        assert_eq!(settings.default_hash, HashAlgorithm::Sha512);

        let settings: Settings = serde_json::from_str(r#"{"default_cipher":"3DES"}"#).unwrap();
        assert_eq!(settings.default_cipher, SymmetricAlgorithm::TripleDes);

        assert!(serde_json::from_str::<Settings>(r#"{"default_cipher":"rot13"}"#).is_err());
    }

    #[test]
    fn test_json_names() {
        let mut settings = Settings::default();
        settings.default_cipher = SymmetricAlgorithm::TripleDes;
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""default_cipher":"3des""#));
        assert!(json.contains(r#""default_hash":"sha256""#));
    }

    #[test]
    fn test_set() {
        let mut settings = Settings::default();
        settings.set("default_cipher", "3DES").unwrap();
        settings.set("default_hash", "sha-512").unwrap();
        settings.set("log_level", "DEBUG").unwrap();

        assert_eq!(settings.default_cipher, SymmetricAlgorithm::TripleDes);
        assert_eq!(settings.default_hash, HashAlgorithm::Sha512);
        assert_eq!(settings.get("log_level").as_deref(), Some("debug"));
        assert_eq!(settings.get("default_cipher").as_deref(), Some("3des"));
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(matches!(settings.set("colour", "red"), Err(CriptesError::InvalidConfig(_))));
        assert!(matches!(settings.set("log_level", "loud"), Err(CriptesError::InvalidConfig(_))));
        assert!(matches!(settings.set("default_cipher", "rot13"), Err(CriptesError::Validation(_))));
        assert_eq!(settings, Settings::default());
    }
}
