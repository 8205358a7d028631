//! Files in the data directory
//!
//! Layout:
//! - `settings.json`: [`Settings`] as pretty JSON
//! - `public.pem`: X.509 SubjectPublicKeyInfo
//! - `private.pem`: PKCS#8, mode 0600 on Unix

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::KeyPair;
use crate::error::{CriptesError, Result};

use super::Settings;

/// Overrides the data directory when set
pub const DATA_DIR_ENV: &str = "CRIPTES_HOME";

const APP_DIR: &str = "criptes";
const SETTINGS_FILE: &str = "settings.json";
const PUBLIC_KEY_FILE: &str = "public.pem";
const PRIVATE_KEY_FILE: &str = "private.pem";

/// Resolve the data directory: `$CRIPTES_HOME`, else the platform data dir
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or_else(|| {
            CriptesError::InvalidConfig(format!(
                "Could not determine a data directory; set {DATA_DIR_ENV}"
            ))
        })
}

pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILE)
}

pub fn public_key_path(dir: &Path) -> PathBuf {
    dir.join(PUBLIC_KEY_FILE)
}

pub fn private_key_path(dir: &Path) -> PathBuf {
    dir.join(PRIVATE_KEY_FILE)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Load settings, falling back to defaults when no file exists yet
pub fn load_settings(dir: &Path) -> Result<Settings> {
    let path = settings_path(dir);
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(&path)?;
    let settings = serde_json::from_str(&content)?;
    Ok(settings)
}

pub fn save_settings(dir: &Path, settings: &Settings) -> Result<()> {
    ensure_dir(dir)?;

    let json = serde_json::to_string_pretty(settings)?;
    let path = settings_path(dir);
    let mut file = File::create(&path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    debug!(path = %path.display(), "saved settings");
    Ok(())
}

/// Both halves of the key pair are on disk
pub fn keys_exist(dir: &Path) -> bool {
    public_key_path(dir).exists() && private_key_path(dir).exists()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `contents` to `path`; `private` files are created with mode 0600
fn write_key_file(path: &Path, contents: &str, private: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if private {
            options.mode(0o600);
        }
    }

    let mut file = options.open(path)?;

    // mode() only applies on creation; tighten a file left over from before
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if private {
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }

    #[cfg(not(unix))]
    let _ = private;

    file.write_all(contents.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    Ok(())
}

/// Write the key pair, refusing to replace an existing one unless `overwrite`
///
/// Both halves go to temporary files first and are renamed into place only
/// once both writes succeeded.
pub fn save_key_pair(dir: &Path, pair: &KeyPair, overwrite: bool) -> Result<()> {
    if keys_exist(dir) && !overwrite {
        return Err(CriptesError::KeysAlreadyExist);
    }
    ensure_dir(dir)?;

    let private_path = private_key_path(dir);
    let public_path = public_key_path(dir);
    let private_tmp = tmp_path(&private_path);
    let public_tmp = tmp_path(&public_path);

    let written = write_key_file(&private_tmp, pair.private_key_pem(), true)
        .and_then(|()| write_key_file(&public_tmp, pair.public_key_pem(), false));
    if let Err(e) = written {
        fs::remove_file(&private_tmp).ok();
        fs::remove_file(&public_tmp).ok();
        return Err(e);
    }

    fs::rename(&private_tmp, &private_path)?;
    fs::rename(&public_tmp, &public_path)?;

    debug!(dir = %dir.display(), "saved RSA key pair");
    Ok(())
}

/// Read the stored public key PEM
pub fn read_public_key(dir: &Path) -> Result<String> {
    let path = public_key_path(dir);
    if !path.exists() {
        return Err(CriptesError::KeysNotFound);
    }

    let content = fs::read_to_string(&path)?;
    Ok(content.trim().to_string())
}

/// Read the stored private key PEM
pub fn read_private_key(dir: &Path) -> Result<Zeroizing<String>> {
    let path = private_key_path(dir);
    if !path.exists() {
        return Err(CriptesError::KeysNotFound);
    }

    let content = Zeroizing::new(fs::read_to_string(&path)?);
    Ok(Zeroizing::new(content.trim().to_string()))
}
