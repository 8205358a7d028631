//! Configuration management for criptes
//!
//! Handles on-disk storage of:
//! - User settings (default algorithms, log level)
//! - The RSA key pair

mod settings;
mod storage;

pub use settings::Settings;
pub use storage::{
    get_data_dir, keys_exist, load_settings, private_key_path, public_key_path,
    read_private_key, read_public_key, save_key_pair, save_settings, settings_path, DATA_DIR_ENV,
};
