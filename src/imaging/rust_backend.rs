//! Production bitmap backend on top of the `image` crate.
//!
//! Everything is statically linked into the binary; there is no native
//! library to initialize, so [`initialize`](BitmapBackend::initialize) only
//! resolves the codec table once and logs it.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Load | `image::ImageReader` with an explicit `ImageFormat` |
//! | Allocate | `DynamicImage::new_*`, layout chosen from bpp |
//! | Get / set pixel | `GenericImageView::get_pixel` / `GenericImage::put_pixel` |
//! | Fill | `put_pixel` over every coordinate |
//! | Convert to 32 bits | `DynamicImage::to_rgba8` |
//! | Save | `DynamicImage::save_with_format` |

use super::backend::{BackendError, BitmapBackend, SUPPORTED_DEPTHS};
use super::params::{ALL_FORMATS, Color, Format};
use image::{DynamicImage, GenericImage, GenericImageView, ImageFormat, ImageReader, Rgba};
use std::path::Path;
use std::sync::{LazyLock, Once};

/// Largest pixel buffer [`RustBackend::allocate`] hands out: 4 GiB.
const MAX_BITMAP_BYTES: u64 = 4 << 30;

static INIT: Once = Once::new();

static READABLE_FORMATS: LazyLock<Vec<Format>> = LazyLock::new(|| {
    ALL_FORMATS
        .iter()
        .copied()
        .filter(|f| image_format(*f).reading_enabled())
        .collect()
});

/// Formats whose decoders are compiled in.
pub fn readable_formats() -> &'static [Format] {
    &READABLE_FORMATS
}

fn image_format(format: Format) -> ImageFormat {
    match format {
        Format::Png => ImageFormat::Png,
        Format::Jpeg => ImageFormat::Jpeg,
        Format::Bmp => ImageFormat::Bmp,
        Format::Tiff => ImageFormat::Tiff,
        Format::WebP => ImageFormat::WebP,
        Format::Gif => ImageFormat::Gif,
        Format::Tga => ImageFormat::Tga,
    }
}

/// Backend using the `image` crate ecosystem. Bitmaps are [`DynamicImage`]s.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn check_bounds(bitmap: &DynamicImage, x: u32, y: u32) -> Result<(), BackendError> {
    let (width, height) = bitmap.dimensions();
    if x >= width || y >= height {
        return Err(BackendError::OutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    Ok(())
}

impl BitmapBackend for RustBackend {
    type Bitmap = DynamicImage;

    fn initialize(&self) {
        INIT.call_once(|| {
            let names: Vec<&str> = readable_formats().iter().map(|f| f.name()).collect();
            log::info!("image backend initialized, readable formats: {names:?}");
        });
    }

    fn load(&self, format: Format, path: &Path) -> Result<DynamicImage, BackendError> {
        let mut reader = ImageReader::open(path)?;
        reader.set_format(image_format(format));
        let bitmap = reader.decode().map_err(|e| match e {
            image::ImageError::IoError(io) => BackendError::Io(io),
            other => BackendError::Decode {
                path: path.display().to_string(),
                message: other.to_string(),
            },
        })?;
        log::debug!(
            "loaded {} as {format}: {}x{} {:?}",
            path.display(),
            bitmap.width(),
            bitmap.height(),
            bitmap.color()
        );
        Ok(bitmap)
    }

    fn allocate(&self, width: u32, height: u32, bpp: u32) -> Result<DynamicImage, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "cannot allocate a {width}x{height} bitmap"
            )));
        }
        if !SUPPORTED_DEPTHS.contains(&bpp) {
            return Err(BackendError::UnsupportedDepth(bpp));
        }
        let bytes = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|pixels| pixels.checked_mul(u64::from(bpp / 8)))
            .filter(|&bytes| bytes <= MAX_BITMAP_BYTES)
            .and_then(|bytes| usize::try_from(bytes).ok());
        if bytes.is_none() {
            return Err(BackendError::TooLarge { width, height, bpp });
        }
        let bitmap = match bpp {
            8 => DynamicImage::new_luma8(width, height),
            16 => DynamicImage::new_luma_a8(width, height),
            24 => DynamicImage::new_rgb8(width, height),
            32 => DynamicImage::new_rgba8(width, height),
            48 => DynamicImage::new_rgb16(width, height),
            64 => DynamicImage::new_rgba16(width, height),
            96 => DynamicImage::new_rgb32f(width, height),
            128 => DynamicImage::new_rgba32f(width, height),
            other => return Err(BackendError::UnsupportedDepth(other)),
        };
        log::debug!("allocated {width}x{height} at {bpp} bpp");
        Ok(bitmap)
    }

    fn dimensions(&self, bitmap: &DynamicImage) -> (u32, u32) {
        bitmap.dimensions()
    }

    fn bits_per_pixel(&self, bitmap: &DynamicImage) -> u32 {
        u32::from(bitmap.color().bits_per_pixel())
    }

    fn get_pixel(&self, bitmap: &DynamicImage, x: u32, y: u32) -> Option<Color> {
        check_bounds(bitmap, x, y).ok()?;
        Some(Color::from_array(bitmap.get_pixel(x, y).0))
    }

    fn set_pixel(
        &self,
        bitmap: &mut DynamicImage,
        x: u32,
        y: u32,
        color: Color,
    ) -> Result<(), BackendError> {
        check_bounds(bitmap, x, y)?;
        bitmap.put_pixel(x, y, Rgba(color.to_array()));
        Ok(())
    }

    fn fill(&self, bitmap: &mut DynamicImage, color: Color) -> Result<(), BackendError> {
        let (width, height) = bitmap.dimensions();
        let pixel = Rgba(color.to_array());
        for y in 0..height {
            for x in 0..width {
                bitmap.put_pixel(x, y, pixel);
            }
        }
        Ok(())
    }

    fn convert_to_32bits(&self, bitmap: &mut DynamicImage) -> Result<(), BackendError> {
        if !matches!(bitmap, DynamicImage::ImageRgba8(_)) {
            *bitmap = DynamicImage::ImageRgba8(bitmap.to_rgba8());
        }
        Ok(())
    }

    fn save(
        &self,
        format: Format,
        bitmap: &DynamicImage,
        path: &Path,
    ) -> Result<(), BackendError> {
        bitmap
            .save_with_format(path, image_format(format))
            .map_err(|e| match e {
                image::ImageError::IoError(io) => BackendError::Io(io),
                other => BackendError::Encode {
                    path: path.display().to_string(),
                    message: other.to_string(),
                },
            })
    }

    fn release(&self, bitmap: DynamicImage) {
        log::debug!("released {}x{} bitmap", bitmap.width(), bitmap.height());
        drop(bitmap);
    }
}
