//! Image decode/encode.
//!
//! The board only ever sees [`ImageCodec`]; [`ImageCrateCodec`] is the
//! default implementation over the `image` crate. Codecs are shared with
//! background workers, so they must be `Send + Sync`.

use crate::error::{BoardError, BoardResult};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Pixels plus the normalized format tag they were decoded from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: RgbaImage,
    pub format: String,
}

pub trait ImageCodec: Send + Sync {
    /// Decode raw bytes. The content is sniffed first; `format_hint` is only
    /// used when sniffing fails.
    fn decode(&self, bytes: &[u8], format_hint: Option<&str>) -> BoardResult<DecodedImage>;

    /// Encode pixels in the format named by `format` (`"png"`, `"JPEG"`, ...).
    fn encode(&self, pixels: &RgbaImage, format: &str) -> BoardResult<Vec<u8>>;
}

/// Lowercase extension-style tag: `"JPEG"` becomes `"jpg"`, `"PNG"` becomes
/// `"png"`.
pub fn normalize_format(format: &str) -> String {
    let lower = format.trim().trim_start_matches('.').to_ascii_lowercase();
    match lower.as_str() {
        "jpeg" | "jpe" | "jfif" => "jpg".to_string(),
        "tif" => "tiff".to_string(),
        _ => lower,
    }
}

fn format_tag(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .map(|ext| normalize_format(ext))
        .unwrap_or_else(|| "png".to_string())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, bytes: &[u8], format_hint: Option<&str>) -> BoardResult<DecodedImage> {
        let format = match image::guess_format(bytes) {
            Ok(format) => format,
            Err(_) => format_hint
                .and_then(|hint| ImageFormat::from_extension(normalize_format(hint)))
                .ok_or_else(|| {
                    BoardError::UnknownFormat(format_hint.unwrap_or("unknown").to_string())
                })?,
        };
        let image = image::load_from_memory_with_format(bytes, format)?;
        Ok(DecodedImage {
            pixels: image.into_rgba8(),
            format: format_tag(format),
        })
    }

    fn encode(&self, pixels: &RgbaImage, format: &str) -> BoardResult<Vec<u8>> {
        let tag = normalize_format(format);
        let image_format = ImageFormat::from_extension(&tag)
            .ok_or_else(|| BoardError::UnknownFormat(format.to_string()))?;

        let image = DynamicImage::ImageRgba8(pixels.clone());
        // JPEG has no alpha channel
        let image = if image_format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(image.to_rgb8())
        } else {
            image
        };

        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), image_format)?;
        Ok(bytes)
    }
}
