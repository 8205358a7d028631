//! Symmetric encryption commands and the algorithm overview

use colored::Colorize;

use crate::crypto::{symmetric, HashAlgorithm, SymmetricAlgorithm};
use crate::error::Result;

use super::{resolve_password, rule, Context};

fn warn_if_insecure(algorithm: SymmetricAlgorithm) {
    if !algorithm.is_secure() {
        eprintln!(
            "{} {} is obsolete and kept for study only. Prefer AES-256 or ChaCha20.",
            "Warning:".yellow().bold(),
            algorithm
        );
    }
}

pub fn encrypt(
    ctx: &Context,
    text: &str,
    algorithm: Option<SymmetricAlgorithm>,
    password: Option<String>,
) -> Result<()> {
    let algorithm = algorithm.unwrap_or(ctx.settings.default_cipher);
    warn_if_insecure(algorithm);

    let password = resolve_password(password, true)?;
    let envelope = symmetric::encrypt(text, &password, algorithm)?;

    println!("{envelope}");
    Ok(())
}

pub fn decrypt(
    ctx: &Context,
    envelope: &str,
    algorithm: Option<SymmetricAlgorithm>,
    password: Option<String>,
) -> Result<()> {
    let algorithm = algorithm.unwrap_or(ctx.settings.default_cipher);

    let password = resolve_password(password, false)?;
    let plaintext = symmetric::decrypt(envelope, &password, algorithm)?;

    println!("{plaintext}");
    Ok(())
}

fn security_tag(secure: bool) -> colored::ColoredString {
    if secure {
        "secure".green()
    } else {
        "insecure".red()
    }
}

pub fn algorithms(ctx: &Context) -> Result<()> {
    println!("{}", "Symmetric ciphers".cyan().bold());
    println!("{}", rule());
    for algorithm in SymmetricAlgorithm::ALL {
        let marker = if algorithm == ctx.settings.default_cipher { "*" } else { " " };
        println!(
            "{marker} {:<9} {:<8} key {:>3} bits  {:<24} {}",
            algorithm.label().bold(),
            algorithm.id(),
            algorithm.key_len() * 8,
            algorithm.transform(),
            security_tag(algorithm.is_secure())
        );
        println!("            {}", algorithm.description().dimmed());
    }

    println!();
    println!("{}", "Hash functions".cyan().bold());
    println!("{}", rule());
    for algorithm in HashAlgorithm::ALL {
        let marker = if algorithm == ctx.settings.default_hash { "*" } else { " " };
        println!(
            "{marker} {:<9} {:<8} {:>3} bits  {:>3} hex chars  {}",
            algorithm.label().bold(),
            algorithm.id(),
            algorithm.bits(),
            algorithm.hex_len(),
            security_tag(algorithm.is_secure())
        );
    }

    println!();
    println!("{} marks the configured default", "*".bold());
    Ok(())
}
