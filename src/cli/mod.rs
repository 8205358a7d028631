//! CLI command implementations

pub mod cipher;
pub mod hash;
pub mod rsa;
pub mod settings;
pub mod stego;

use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use zeroize::Zeroizing;

use crate::config::{self, Settings};
use crate::error::Result;

/// Environment variable read for `--password`
pub const PASSWORD_ENV: &str = "CRIPTES_PASSWORD";

/// State shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    pub data_dir: PathBuf,
    pub settings: Settings,
}

impl Context {
    /// Resolve the data directory and read settings
    ///
    /// An unreadable settings file is reported and replaced by defaults, so
    /// `config set` can still repair it.
    pub fn load() -> Result<Self> {
        let data_dir = config::get_data_dir()?;
        let settings = config::load_settings(&data_dir).unwrap_or_else(|e| {
            eprintln!(
                "{} Ignoring {}: {}",
                "Warning:".yellow().bold(),
                config::settings_path(&data_dir).display(),
                e
            );
            Settings::default()
        });
        Ok(Self { data_dir, settings })
    }
}

/// Ask for a new password twice until both entries match
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    loop {
        let password = Zeroizing::new(rpassword::prompt_password("Password: ")?);
        if password.trim().is_empty() {
            eprintln!("{} Password must not be empty", "Error:".red());
            continue;
        }

        let confirm = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);
        if *password != *confirm {
            eprintln!("{} Passwords do not match", "Error:".red());
            continue;
        }

        return Ok(password);
    }
}

/// Ask for an existing password
pub fn prompt_password() -> Result<Zeroizing<String>> {
    let password = rpassword::prompt_password("Password: ")?;
    Ok(Zeroizing::new(password))
}

/// Use the password given on the command line or in the environment,
/// prompting only when neither is set
pub fn resolve_password(given: Option<String>, new: bool) -> Result<Zeroizing<String>> {
    match given {
        Some(password) => Ok(Zeroizing::new(password)),
        None if new => prompt_new_password(),
        None => prompt_password(),
    }
}

/// Ask a yes/no question, defaulting to no
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí")
}

/// Horizontal rule used around multi-line output
pub(crate) fn rule() -> colored::ColoredString {
    "─".repeat(60).dimmed()
}
