//! Encoded image payloads and the image references that point at them.
//!
//! An image reference is either a `data:` URL or a local path. The engine
//! never inspects raw bytes itself; decoding and encoding go through the
//! `image` crate.

use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage, RgbaImage};
use tracing::debug;

use crate::config::ExportConfig;
use crate::consts::FALLBACK_MIME_TYPE;
use crate::error::{ReviveError, Result};
use crate::geometry::Dimensions;

/// Encoded image bytes plus their mime type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// `data:<mime>;base64,<bytes>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }

    /// Parse a base64 data URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| ReviveError::InvalidDataUrl("missing data: prefix".into()))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| ReviveError::InvalidDataUrl("missing ',' separator".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| ReviveError::InvalidDataUrl("only base64 payloads are supported".into()))?;
        let mime_type = if mime_type.is_empty() {
            "text/plain"
        } else {
            mime_type
        };
        Ok(Self::new(mime_type, BASE64.decode(data.trim())?))
    }

    /// Read a file, taking the mime type from the file contents and falling
    /// back to the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let mime_type = image::guess_format(&bytes)
            .ok()
            .or_else(|| ImageFormat::from_path(path).ok())
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());
        Ok(Self::new(mime_type, bytes))
    }

    /// Load what an image reference points at.
    pub fn load(reference: &str) -> Result<Self> {
        if is_data_url(reference) {
            Self::from_data_url(reference)
        } else {
            Self::from_path(Path::new(reference))
        }
    }

    /// Intrinsic size without decoding the pixel data.
    pub fn probe_dimensions(&self) -> Result<Dimensions> {
        let reader = ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()
            .map_err(|e| ReviveError::DimensionProbe(e.to_string()))?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| ReviveError::DimensionProbe(e.to_string()))?;
        Ok(Dimensions::new(width, height))
    }

    /// Decode into a drawable image.
    pub fn decode(&self) -> Result<DynamicImage> {
        let reader = ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()
            .map_err(|e| ReviveError::Decode(e.to_string()))?;
        reader.decode().map_err(|e| ReviveError::Decode(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

pub fn is_data_url(reference: &str) -> bool {
    reference.starts_with("data:")
}

/// Measure the intrinsic size of whatever `reference` points at.
///
/// Every failure (missing file, bad data URL, undecodable header) is a
/// dimension-probe failure.
pub fn probe_dimensions(reference: &str) -> Result<Dimensions> {
    let payload = ImagePayload::load(reference).map_err(|e| match e {
        ReviveError::DimensionProbe(_) => e,
        other => ReviveError::DimensionProbe(other.to_string()),
    })?;
    payload.probe_dimensions()
}

/// Formats the rasterizer can write. Anything else falls back to PNG.
fn encodable_format(mime_type: &str) -> Option<ImageFormat> {
    match ImageFormat::from_mime_type(mime_type)? {
        f @ (ImageFormat::Png
        | ImageFormat::Jpeg
        | ImageFormat::WebP
        | ImageFormat::Bmp
        | ImageFormat::Gif
        | ImageFormat::Tiff) => Some(f),
        _ => None,
    }
}

/// Encode `image` as `mime_type` at the configured (maximum) quality.
///
/// JPEG has no alpha channel: transparent areas are composited onto black.
pub fn encode_image(
    image: &RgbaImage,
    mime_type: &str,
    export: &ExportConfig,
) -> Result<ImagePayload> {
    let format = encodable_format(mime_type).unwrap_or(ImageFormat::Png);
    let out_mime = format.to_mime_type();
    if out_mime != mime_type {
        debug!(requested = mime_type, used = out_mime, "Falling back to a supported encoding");
    }

    let encode_err = |e: image::ImageError| ReviveError::Encode {
        mime_type: out_mime.to_string(),
        reason: e.to_string(),
    };

    let mut buf = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => {
            let flattened = flatten_on_black(image);
            let encoder = JpegEncoder::new_with_quality(&mut buf, export.jpeg_quality.clamp(1, 100));
            flattened.write_with_encoder(encoder).map_err(encode_err)?;
        }
        ImageFormat::WebP => {
            let encoder = WebPEncoder::new_lossless(&mut buf);
            image.write_with_encoder(encoder).map_err(encode_err)?;
        }
        other => {
            DynamicImage::ImageRgba8(image.clone())
                .write_to(&mut buf, other)
                .map_err(encode_err)?;
        }
    }

    Ok(ImagePayload::new(out_mime, buf.into_inner()))
}

fn flatten_on_black(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let k = a as u32;
        image::Rgb([
            ((r as u32 * k + 127) / 255) as u8,
            ((g as u32 * k + 127) / 255) as u8,
            ((b as u32 * k + 127) / 255) as u8,
        ])
    })
}

/// Preferred file extension for `mime_type`, `png` when unknown.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    ImageFormat::from_mime_type(mime_type)
        .and_then(|f| f.extensions_str().first().copied())
        .unwrap_or("png")
}
