//! RSA key management and encryption commands

use std::fs;
use std::io::Write;
use std::path::Path;

use colored::Colorize;
use zeroize::Zeroizing;

use crate::config;
use crate::crypto::{generate_key_pair, rsa};
use crate::error::{CriptesError, Result};

use super::{confirm, rule, Context};

pub fn keygen(ctx: &Context, force: bool) -> Result<()> {
    if config::keys_exist(&ctx.data_dir) && !force {
        println!("{} An RSA key pair already exists.", "Warning:".yellow().bold());
        println!("Anything encrypted for the old public key can no longer be decrypted.\n");

        if !confirm("Replace it?") {
            return Err(CriptesError::KeysAlreadyExist);
        }
    }

    print!("{}", "Generating RSA-2048 key pair... ".cyan());
    std::io::stdout().flush()?;
    let pair = generate_key_pair()?;
    println!("{}", "done".green());

    config::save_key_pair(&ctx.data_dir, &pair, true)?;

    println!();
    println!("{}", "Public key:".cyan().bold());
    println!("{}", rule());
    println!("{}", pair.public_key_pem());
    println!("{}", rule());
    println!();
    println!(
        "Private key saved to {}",
        config::private_key_path(&ctx.data_dir).display().to_string().cyan()
    );

    Ok(())
}

pub fn pubkey(ctx: &Context) -> Result<()> {
    let public_key = config::read_public_key(&ctx.data_dir)?;
    println!("{public_key}");
    Ok(())
}

fn read_key_file(path: &Path) -> Result<Zeroizing<String>> {
    let content = Zeroizing::new(fs::read_to_string(path)?);
    Ok(Zeroizing::new(content.trim().to_string()))
}

pub fn encrypt(ctx: &Context, text: &str, key: Option<&Path>) -> Result<()> {
    let public_key = match key {
        Some(path) => read_key_file(path)?,
        None => Zeroizing::new(config::read_public_key(&ctx.data_dir)?),
    };

    let ciphertext = rsa::encrypt(text, &public_key)?;
    println!("{ciphertext}");
    Ok(())
}

pub fn decrypt(ctx: &Context, ciphertext: &str, key: Option<&Path>) -> Result<()> {
    let private_key = match key {
        Some(path) => read_key_file(path)?,
        None => config::read_private_key(&ctx.data_dir)?,
    };

    let plaintext = rsa::decrypt(ciphertext, &private_key)?;
    println!("{plaintext}");
    Ok(())
}
