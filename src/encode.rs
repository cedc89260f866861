//! QR symbol rendering on top of the `qrcode` crate.
//!
//! The encoder itself is an external collaborator; this module only fixes
//! the rendering parameters (error correction, module size, border) and
//! hands back an RGBA bitmap ready for compositing.

use crate::{Error, Result};
use image::{DynamicImage, ImageBuffer, Luma, RgbaImage};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};

/// Largest "normal" QR symbol version.
const MAX_VERSION: i16 = 40;

/// Rendering parameters for the QR bitmap
#[derive(Debug, Clone, Copy)]
pub struct QrStyle {
    /// Error correction level
    pub ec_level: EcLevel,
    /// Edge length of one module in pixels
    pub module_size: u32,
    /// Width of the white border, in modules
    pub border: u32,
    /// Smallest symbol version to try; grown until the payload fits
    pub min_version: i16,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::H,
            module_size: 10,
            border: 4,
            min_version: 1,
        }
    }
}

/// Pick the smallest symbol version >= `min_version` that holds `data`.
fn fit_symbol(data: &[u8], style: &QrStyle) -> Result<QrCode> {
    let start = style.min_version.clamp(1, MAX_VERSION);
    for v in start..=MAX_VERSION {
        match QrCode::with_version(data, Version::Normal(v), style.ec_level) {
            Ok(code) => return Ok(code),
            Err(QrError::DataTooLong) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(QrError::DataTooLong.into())
}

/// Encode `data` into a black-on-white QR bitmap with an alpha channel.
pub fn encode(data: &str, style: &QrStyle) -> Result<RgbaImage> {
    if style.module_size == 0 {
        return Err(Error::Encode("module size must be at least 1 pixel".into()));
    }

    let code = fit_symbol(data.as_bytes(), style)?;
    log::debug!(
        "Encoded {} bytes as version {:?}, ec level {:?}",
        data.len(),
        code.version(),
        code.error_correction_level()
    );

    let symbol = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(style.module_size, style.module_size)
        .dark_color(Luma([0u8]))
        .light_color(Luma([255u8]))
        .build();

    let pad = style.border * style.module_size;
    let mut canvas = ImageBuffer::from_pixel(
        symbol.width() + 2 * pad,
        symbol.height() + 2 * pad,
        Luma([255u8]),
    );
    image::imageops::replace(&mut canvas, &symbol, pad as i64, pad as i64);

    Ok(DynamicImage::ImageLuma8(canvas).into_rgba8())
}
