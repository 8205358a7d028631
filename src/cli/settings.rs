//! `config show` / `config set`

use colored::Colorize;

use crate::config::{self, Settings};
use crate::error::Result;

use super::Context;

pub fn show(ctx: &Context) -> Result<()> {
    println!(
        "{} {}",
        "Data directory:".cyan().bold(),
        ctx.data_dir.display()
    );
    for key in Settings::KEYS {
        let value = ctx.settings.get(key).unwrap_or_default();
        println!("{key} = {value}");
    }
    Ok(())
}

pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut settings = ctx.settings.clone();
    settings.set(key, value)?;
    config::save_settings(&ctx.data_dir, &settings)?;

    let value = settings.get(key).unwrap_or_default();
    println!("{} {key} = {value}", "✓".green().bold());
    Ok(())
}
