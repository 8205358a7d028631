//! Bit-level embedding and extraction
//!
//! Bitstream layout: UTF-8 bytes of `message + TERMINATOR`, each byte
//! MSB first. Bit `i` lands in channel `i % 3` (R, G, B) of pixel `i / 3`,
//! pixels in row-major order. Alpha and every channel past the last payload
//! bit are left exactly as in the source. Unused capacity is not randomised.

use image::{ImageBuffer, Pixel};
use tracing::debug;

use super::{SAFETY_MARGIN, TERMINATOR};
use crate::error::{CriptesError, Result};

/// Payload bits stored per pixel (R, G, B)
pub const BITS_PER_PIXEL: usize = 3;

/// An 8-bit-per-channel pixel buffer usable as a carrier
pub type Carrier<P> = ImageBuffer<P, Vec<u8>>;

fn ensure_rgb<P: Pixel<Subpixel = u8>>() -> Result<()> {
    if usize::from(P::CHANNEL_COUNT) < BITS_PER_PIXEL {
        return Err(CriptesError::validation(
            "Carrier image must have red, green and blue channels",
        ));
    }
    Ok(())
}

/// Total payload bits a `width` x `height` carrier can hold
pub fn capacity_bits(width: u32, height: u32) -> usize {
    width as usize * height as usize * BITS_PER_PIXEL
}

/// Advertised message capacity in bytes for the given dimensions
///
/// `floor(w * h * 3 / 8) - len(TERMINATOR) - SAFETY_MARGIN`. Negative for
/// carriers too small to hold anything.
pub fn capacity_for(width: u32, height: u32) -> i64 {
    let bytes = (capacity_bits(width, height) / 8) as i64;
    bytes - TERMINATOR.len() as i64 - SAFETY_MARGIN as i64
}

/// Advertised message capacity in bytes for `image`
pub fn capacity<P: Pixel<Subpixel = u8>>(image: &Carrier<P>) -> i64 {
    capacity_for(image.width(), image.height())
}

/// MSB-first bits of `bytes`
fn bits(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
}

/// Hide `message` in a copy of `image`
///
/// # Errors
/// `Validation` for a blank message or a carrier without RGB channels;
/// `Capacity` if `message + TERMINATOR` needs more bits than the carrier
/// has. In both cases nothing is written.
pub fn embed<P>(image: &Carrier<P>, message: &str) -> Result<Carrier<P>>
where
    P: Pixel<Subpixel = u8>,
{
    if message.trim().is_empty() {
        return Err(CriptesError::validation("Message must not be empty"));
    }
    ensure_rgb::<P>()?;

    let mut payload = Vec::with_capacity(message.len() + TERMINATOR.len());
    payload.extend_from_slice(message.as_bytes());
    payload.extend_from_slice(TERMINATOR.as_bytes());

    let required_bits = payload.len() * 8;
    let available_bits = capacity_bits(image.width(), image.height());
    if required_bits > available_bits {
        return Err(CriptesError::Capacity {
            required_bits,
            available_bits,
        });
    }

    debug!(
        width = image.width(),
        height = image.height(),
        required_bits,
        available_bits,
        "embedding message"
    );

    let mut stego = image.clone();
    let mut stream = bits(&payload);

    'pixels: for pixel in stego.pixels_mut() {
        for channel in pixel.channels_mut().iter_mut().take(BITS_PER_PIXEL) {
            match stream.next() {
                Some(bit) => *channel = (*channel & 0xFE) | bit,
                None => break 'pixels,
            }
        }
    }

    Ok(stego)
}

/// Recover a message hidden by [`embed`]
///
/// Reads one LSB at a time and stops at the first byte that completes the
/// terminator; the rest of the image is never read. Invalid UTF-8 in the
/// recovered bytes is replaced with U+FFFD.
///
/// # Errors
/// `Validation` for a carrier without RGB channels; `NotFound` if the whole
/// image is scanned without meeting the terminator.
pub fn extract<P>(image: &Carrier<P>) -> Result<String>
where
    P: Pixel<Subpixel = u8>,
{
    ensure_rgb::<P>()?;

    let terminator = TERMINATOR.as_bytes();
    let mut buffer: Vec<u8> = Vec::new();
    let mut current = 0u8;
    let mut filled = 0u8;

    for pixel in image.pixels() {
        for channel in pixel.channels().iter().take(BITS_PER_PIXEL) {
            current = (current << 1) | (channel & 1);
            filled += 1;
            if filled < 8 {
                continue;
            }

            buffer.push(current);
            current = 0;
            filled = 0;

            // Checked after every byte, so a first match is always a suffix
            if buffer.ends_with(terminator) {
                buffer.truncate(buffer.len() - terminator.len());
                debug!(len = buffer.len(), "found hidden message");
                return Ok(String::from_utf8_lossy(&buffer).into_owned());
            }
        }
    }

    Err(CriptesError::NotFound)
}
