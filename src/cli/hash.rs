//! Hashing commands

use colored::Colorize;

use crate::crypto::{hash, HashAlgorithm};
use crate::error::Result;

use super::Context;

pub fn digest(ctx: &Context, text: &str, algorithm: Option<HashAlgorithm>) -> Result<()> {
    let algorithm = algorithm.unwrap_or(ctx.settings.default_hash);
    let hex = hash::digest(text, algorithm)?;
    println!("{hex}");
    Ok(())
}

pub fn all(text: &str) -> Result<()> {
    for (algorithm, hex) in hash::digest_all(text) {
        let hex = if hex == hash::ERROR_SENTINEL { hex.red() } else { hex.normal() };
        println!("{:<8} {}", algorithm.label().bold(), hex);
    }
    Ok(())
}

/// Returns whether the digest matched
pub fn verify(
    ctx: &Context,
    text: &str,
    expected: &str,
    algorithm: Option<HashAlgorithm>,
) -> Result<bool> {
    let algorithm = algorithm.unwrap_or(ctx.settings.default_hash);
    let matched = hash::verify(text, expected, algorithm);

    if matched {
        println!("{} {} digest matches", "✓".green().bold(), algorithm);
    } else {
        println!("{} {} digest does not match", "✗".red().bold(), algorithm);
    }
    Ok(matched)
}

pub fn identify(hex: &str) -> Result<()> {
    let candidates = hash::identify_by_length(hex);
    if candidates.is_empty() {
        println!("{}", "Unknown: not a hex digest of a supported length".yellow());
        return Ok(());
    }

    for algorithm in candidates {
        println!("{} ({} bits)", algorithm.label().bold(), algorithm.bits());
    }
    Ok(())
}
