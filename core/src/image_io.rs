//! Image I/O

use crate::geometry::*;
use crate::pbrt::*;
use exr::prelude::write_rgb_file;
use image::{ImageBuffer, ImageFormat, Rgb};
use std::path::Path;
use thiserror::Error;

/// Errors returned when writing an image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The file name has no extension to pick a format from.
    #[error("can't determine file type from suffix of filename {0}")]
    NoExtension(String),

    /// The file name extension is not a supported format.
    #[error("extension {extension} of {path} is not supported")]
    UnsupportedFormat {
        /// Output path.
        path: String,
        /// Offending extension.
        extension: String,
    },

    /// The RGB buffer does not match the image bounds.
    #[error("expected {expected} RGB values, got {actual}")]
    SizeMismatch {
        /// Expected number of values.
        expected: usize,
        /// Provided number of values.
        actual: usize,
    },

    /// The encoder failed.
    #[error("error saving output image {path}: {message}")]
    Write {
        /// Output path.
        path: String,
        /// Encoder error.
        message: String,
    },
}

/// Destination for a resolved image.
pub trait ImageSink {
    /// Consume a resolved image.
    ///
    /// * `rgb`             - Linear RGB values, 3 per pixel, in scanline order.
    /// * `output_bounds`   - Pixel bounds of the data in the overall image.
    /// * `full_resolution` - Resolution of the overall image.
    fn write(&self, rgb: &[Float], output_bounds: &Bounds2i, full_resolution: &Point2i) -> Result<(), ImageError>;
}

/// Writes images to a file, choosing the format from the file extension.
#[derive(Clone, Debug)]
pub struct FileImageSink {
    /// Output file path.
    pub path: String,
}

impl FileImageSink {
    /// Create a new `FileImageSink`.
    ///
    /// * `path` - Output file path; `.exr`, `.png` and `.tga` are supported.
    pub fn new(path: &str) -> Self {
        Self { path: path.to_string() }
    }
}

impl ImageSink for FileImageSink {
    fn write(&self, rgb: &[Float], output_bounds: &Bounds2i, _full_resolution: &Point2i) -> Result<(), ImageError> {
        write_image(&self.path, rgb, output_bounds)
    }
}

/// Write an image to the given path.
///
/// * `path`          - Output file path.
/// * `rgb`           - Linear RGB values, 3 per pixel.
/// * `output_bounds` - The bounds for the image output.
pub fn write_image(path: &str, rgb: &[Float], output_bounds: &Bounds2i) -> Result<(), ImageError> {
    let resolution = output_bounds.diagonal();
    let res_x = max(0, resolution.x) as u32;
    let res_y = max(0, resolution.y) as u32;

    let expected = 3 * res_x as usize * res_y as usize;
    if rgb.len() != expected {
        return Err(ImageError::SizeMismatch {
            expected,
            actual: rgb.len(),
        });
    }

    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| ImageError::NoExtension(path.to_string()))?;

    match extension.as_str() {
        "exr" => write_exr(path, rgb, res_x, res_y),
        "png" => write_8_bit(path, rgb, res_x, res_y, ImageFormat::Png),
        "tga" => write_8_bit(path, rgb, res_x, res_y, ImageFormat::Tga),
        _ => Err(ImageError::UnsupportedFormat {
            path: path.to_string(),
            extension,
        }),
    }
}

/// Writes the image in OpenEXR format.
///
/// * `path`  - Output file path.
/// * `rgb`   - Linear RGB values.
/// * `res_x` - X resolution.
/// * `res_y` - Y resolution.
fn write_exr(path: &str, rgb: &[Float], res_x: u32, res_y: u32) -> Result<(), ImageError> {
    info!("Writing image {} with resolution {}x{}", path, res_x, res_y);

    let width = res_x as usize;
    write_rgb_file(path, width, res_y as usize, |x, y| {
        let offset = 3 * (y * width + x);
        (rgb[offset], rgb[offset + 1], rgb[offset + 2])
    })
    .map_err(|err| ImageError::Write {
        path: path.to_string(),
        message: err.to_string(),
    })
}

/// Writes the image in an 8-bit format with gamma correction.
///
/// * `path`         - Output file path.
/// * `rgb`          - Linear RGB values.
/// * `res_x`        - X resolution.
/// * `res_y`        - Y resolution.
/// * `image_format` - Image format.
fn write_8_bit(path: &str, rgb: &[Float], res_x: u32, res_y: u32, image_format: ImageFormat) -> Result<(), ImageError> {
    info!("Writing image {} with resolution {}x{}", path, res_x, res_y);

    let imgbuf = ImageBuffer::from_fn(res_x, res_y, |x, y| {
        let offset = 3 * (y * res_x + x) as usize;
        Rgb(to_srgb8(&[rgb[offset], rgb[offset + 1], rgb[offset + 2]]))
    });

    imgbuf
        .save_with_format(path, image_format)
        .map_err(|err| ImageError::Write {
            path: path.to_string(),
            message: err.to_string(),
        })
}

/// Gamma correct a linear RGB value and quantize it to 8 bits.
///
/// * `rgb` - Linear RGB value.
pub fn to_srgb8(rgb: &[Float; 3]) -> [u8; 3] {
    [clamp_byte(rgb[0]), clamp_byte(rgb[1]), clamp_byte(rgb[2])]
}

#[inline]
fn clamp_byte(v: Float) -> u8 {
    clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
