//! Upload payload preparation
//!
//! The endpoint always receives the file declared as `image/jpeg`, so
//! anything that is not already a JPEG (or needs cropping) is decoded
//! and re-encoded here.

use image::codecs::jpeg::JpegEncoder;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConfigError, UploadError};

/// Full quality, matching what the picker hands back uncompressed
const JPEG_QUALITY: u8 = 100;

/// Width:height ratio the uploaded photo is centre-cropped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Largest centred rectangle with this ratio inside a `width` x `height` image.
    /// Returns (x, y, w, h).
    pub fn center_crop_rect(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let (rw, rh) = (self.width as u64, self.height as u64);
        let (w, h) = (width as u64, height as u64);

        let (crop_w, crop_h) = if w * rh > h * rw {
            // Too wide: keep full height
            ((h * rw / rh).max(1), h)
        } else {
            // Too tall (or exact): keep full width
            (w, (w * rh / rw).max(1))
        };

        let x = (w - crop_w) / 2;
        let y = (h - crop_h) / 2;
        (x as u32, y as u32, crop_w as u32, crop_h as u32)
    }
}

impl Default for AspectRatio {
    /// 4:3, the framing used by the camera and library editors
    fn default() -> Self {
        Self::new(4, 3)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidAspect(s.to_string());

        let (w, h) = s.trim().split_once(':').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self::new(width, height))
    }
}

/// Read the image at `path` and return the JPEG bytes to upload
pub async fn jpeg_payload(path: PathBuf, crop: Option<AspectRatio>) -> Result<Vec<u8>, UploadError> {
    // Spawn blocking because decoding and encoding are CPU-intensive
    tokio::task::spawn_blocking(move || jpeg_payload_blocking(&path, crop)).await?
}

fn jpeg_payload_blocking(path: &Path, crop: Option<AspectRatio>) -> Result<Vec<u8>, UploadError> {
    let bytes = std::fs::read(path)?;

    let reader = ImageReader::new(Cursor::new(bytes.as_slice())).with_guessed_format()?;
    let is_jpeg = reader.format() == Some(ImageFormat::Jpeg);
    let mut decoder = reader.into_decoder()?;

    // Camera JPEGs are often stored sideways with an EXIF rotation tag
    let orientation = decoder.orientation()?;
    let (width, height) = upright_dimensions(decoder.dimensions(), orientation);
    let needs_crop = crop
        .map(|aspect| aspect.center_crop_rect(width, height) != (0, 0, width, height))
        .unwrap_or(false);

    if is_jpeg && orientation == Orientation::NoTransforms && !needs_crop {
        drop(decoder);
        log::debug!("Sending {} unchanged ({} bytes)", path.display(), bytes.len());
        return Ok(bytes);
    }

    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);

    let img = match crop {
        Some(aspect) if needs_crop => crop_to_aspect(&img, aspect),
        _ => img,
    };

    let jpeg = encode_jpeg(&img)?;
    log::debug!(
        "Prepared {} as {}x{} JPEG ({} bytes, {:?})",
        path.display(),
        img.width(),
        img.height(),
        jpeg.len(),
        orientation
    );
    Ok(jpeg)
}

/// Dimensions after the orientation is applied
fn upright_dimensions((width, height): (u32, u32), orientation: Orientation) -> (u32, u32) {
    match orientation {
        Orientation::Rotate90
        | Orientation::Rotate270
        | Orientation::Rotate90FlipH
        | Orientation::Rotate270FlipH => (height, width),
        _ => (width, height),
    }
}

fn crop_to_aspect(img: &DynamicImage, aspect: AspectRatio) -> DynamicImage {
    let (x, y, w, h) = aspect.center_crop_rect(img.width(), img.height());
    img.crop_imm(x, y, w, h)
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, UploadError> {
    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode_image(&rgb)?;
    Ok(out)
}
