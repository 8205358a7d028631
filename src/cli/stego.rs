//! Steganography commands

use std::path::Path;

use colored::Colorize;

use crate::error::Result;
use crate::stego::{self, carrier};

pub fn capacity(image: &Path) -> Result<()> {
    let carrier = carrier::load(image)?;
    let capacity = stego::capacity(&carrier);

    println!(
        "{}x{} pixels: room for {} characters",
        carrier.width(),
        carrier.height(),
        capacity.max(0).to_string().bold()
    );
    Ok(())
}

pub fn embed(image: &Path, message: &str, output: &Path) -> Result<()> {
    let cover = carrier::load(image)?;
    let stego_image = stego::embed(&cover, message)?;
    carrier::save_png(&stego_image, output)?;

    let is_png = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        eprintln!(
            "{} {} was written as PNG; keep it lossless or the message is lost",
            "Warning:".yellow().bold(),
            output.display()
        );
    }

    println!(
        "{} Hidden {} bytes in {}",
        "✓".green().bold(),
        message.len(),
        output.display().to_string().cyan()
    );
    Ok(())
}

pub fn extract(image: &Path) -> Result<()> {
    let carrier = carrier::load(image)?;
    let message = stego::extract(&carrier)?;
    println!("{message}");
    Ok(())
}
