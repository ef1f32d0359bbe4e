//! The image handle.
//!
//! An [`Image`] owns exactly one bitmap obtained from a [`BitmapBackend`]
//! and gates every access through its [`ImageFlags`]:
//!
//! ```text
//! open(READ)          → backend.load      → NotFound on failure
//! open(WRITE)         → backend.allocate  → AllocationFailed on failure
//!                       (only when nothing was loaded)
//! draw/clear/convert/save  require WRITE  → ReadOnly otherwise
//! pixel                    requires READ  → WriteOnly otherwise
//! drop                → backend.release   (exactly once)
//! ```
//!
//! Changing flags after construction never loads or allocates. A handle
//! opened with no flags holds no bitmap, and pixel or save calls on it
//! report `false` / `None` the same way a failed backend call does.

use crate::error::{ImageError, Result};
use crate::flags::ImageFlags;
use crate::imaging::{BackendError, BitmapBackend, Color, Format};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Construction parameters for [`Image::open`].
///
/// Width and height are only used when a blank bitmap has to be allocated.
/// Leaving them unset makes allocation fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub flags: ImageFlags,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bpp: u32,
    pub clear_color: Color,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            flags: ImageFlags::READ | ImageFlags::WRITE,
            width: None,
            height: None,
            bpp: 32,
            clear_color: Color::from_hex(0xFFFFFF),
        }
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(self, flags: ImageFlags) -> Self {
        Self { flags, ..self }
    }

    pub fn size(self, width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..self
        }
    }

    pub fn bpp(self, bpp: u32) -> Self {
        Self { bpp, ..self }
    }

    pub fn clear_color(self, clear_color: Color) -> Self {
        Self {
            clear_color,
            ..self
        }
    }
}

/// Snapshot of a handle's state, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub format: Format,
    pub readable: bool,
    pub writable: bool,
    /// Actual bitmap size, absent when the handle holds no bitmap.
    pub dimensions: Option<(u32, u32)>,
    /// Actual bitmap depth.
    pub bits_per_pixel: Option<u32>,
    /// Depth requested at construction.
    pub requested_bpp: u32,
}

/// Owning, permission-checked handle to one bitmap.
pub struct Image<'a, B: BitmapBackend> {
    backend: &'a B,
    format: Format,
    path: PathBuf,
    flags: ImageFlags,
    width: Option<u32>,
    height: Option<u32>,
    bpp: u32,
    clear_color: Color,
    bitmap: Option<B::Bitmap>,
}

impl<'a, B: BitmapBackend> Image<'a, B> {
    /// Open a handle with default options: read and write, 32 bpp, no size.
    pub fn new(backend: &'a B, format: Format, path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(backend, format, path, OpenOptions::default())
    }

    /// Load and/or allocate according to `options.flags`.
    ///
    /// With `READ` the file must load. With `WRITE` a blank
    /// `width × height` bitmap at `bpp` is allocated if nothing was loaded.
    pub fn open(
        backend: &'a B,
        format: Format,
        path: impl Into<PathBuf>,
        options: OpenOptions,
    ) -> Result<Self> {
        backend.initialize();

        // Built before acquiring so that Drop covers every exit path.
        let mut image = Self {
            backend,
            format,
            path: path.into(),
            flags: options.flags,
            width: options.width,
            height: options.height,
            bpp: options.bpp,
            clear_color: options.clear_color,
            bitmap: None,
        };

        if image.flags.contains(ImageFlags::READ) {
            log::debug!("{}: read flag, loading as {format}", image.path.display());
            let bitmap = backend
                .load(format, &image.path)
                .map_err(|source| ImageError::NotFound {
                    path: image.path.clone(),
                    source,
                })?;
            image.bitmap = Some(bitmap);
        }

        if image.flags.contains(ImageFlags::WRITE) && image.bitmap.is_none() {
            let width = image.width.unwrap_or(0);
            let height = image.height.unwrap_or(0);
            let bitmap = backend
                .allocate(width, height, image.bpp)
                .map_err(|source| ImageError::AllocationFailed {
                    path: image.path.clone(),
                    source,
                })?;
            image.bitmap = Some(bitmap);
            log::debug!(
                "{}: write flag, nothing loaded, allocated {width}x{height} at {} bpp",
                image.path.display(),
                image.bpp
            );
        }

        Ok(image)
    }

    /// True when `READ` is set, whether or not `WRITE` is too.
    pub fn is_read_only(&self) -> bool {
        self.flags.contains(ImageFlags::READ)
    }

    /// True when `WRITE` is set, whether or not `READ` is too.
    pub fn is_write_only(&self) -> bool {
        self.flags.contains(ImageFlags::WRITE)
    }

    pub fn is_read_and_write(&self) -> bool {
        self.flags.contains(ImageFlags::READ | ImageFlags::WRITE)
    }

    pub fn set_flags(&mut self, flags: ImageFlags) {
        self.flags = flags;
    }

    pub fn set_read_only(&mut self) {
        self.flags.remove(ImageFlags::WRITE);
        self.flags.insert(ImageFlags::READ);
    }

    pub fn set_write_only(&mut self) {
        self.flags.remove(ImageFlags::READ);
        self.flags.insert(ImageFlags::WRITE);
    }

    pub fn set_read_and_write(&mut self) {
        self.flags.insert(ImageFlags::READ | ImageFlags::WRITE);
    }

    /// Whether the depth requested at construction (or after
    /// [`convert_to_32bits`](Self::convert_to_32bits)) is 32 bpp.
    pub fn is_32bit(&self) -> bool {
        self.bpp == 32
    }

    /// Convert the bitmap to 32-bit RGBA in place.
    pub fn convert_to_32bits(&mut self) -> Result<bool> {
        self.ensure_writable()?;
        let Some(bitmap) = self.bitmap.as_mut() else {
            return Ok(self.missing_bitmap("convert_to_32bits"));
        };
        let result = self.backend.convert_to_32bits(bitmap);
        let converted = self.report("convert_to_32bits", result);
        if converted {
            self.bpp = 32;
        }
        Ok(converted)
    }

    /// Color used by [`clear_pixel`](Self::clear_pixel) and
    /// [`clear_image`](Self::clear_image). Touches no pixels.
    pub fn set_clear_pixel_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn clear_pixel(&mut self, x: u32, y: u32) -> Result<bool> {
        self.draw_pixel(x, y, self.clear_color)
    }

    pub fn clear_image(&mut self) -> Result<bool> {
        self.ensure_writable()?;
        let Some(bitmap) = self.bitmap.as_mut() else {
            return Ok(self.missing_bitmap("clear_image"));
        };
        let result = self.backend.fill(bitmap, self.clear_color);
        Ok(self.report("clear_image", result))
    }

    /// Set one pixel. Returns whether the backend accepted it; coordinates
    /// outside the bitmap are rejected there, not here.
    pub fn draw_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<bool> {
        self.ensure_writable()?;
        let Some(bitmap) = self.bitmap.as_mut() else {
            return Ok(self.missing_bitmap("draw_pixel"));
        };
        let result = self.backend.set_pixel(bitmap, x, y, color);
        Ok(self.report("draw_pixel", result))
    }

    /// Read one pixel. `None` when out of range.
    pub fn pixel(&self, x: u32, y: u32) -> Result<Option<Color>> {
        if !self.flags.contains(ImageFlags::READ) {
            return Err(ImageError::WriteOnly);
        }
        Ok(self
            .bitmap
            .as_ref()
            .and_then(|bitmap| self.backend.get_pixel(bitmap, x, y)))
    }

    /// Write the bitmap to the handle's path in the handle's format.
    pub fn save_image(&mut self) -> Result<bool> {
        self.ensure_writable()?;
        let Some(bitmap) = self.bitmap.as_ref() else {
            return Ok(self.missing_bitmap("save_image"));
        };
        let result = self.backend.save(self.format, bitmap, &self.path);
        Ok(self.report("save_image", result))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn flags(&self) -> ImageFlags {
        self.flags
    }

    /// Width requested at construction.
    pub fn width(&self) -> Option<u32> {
        self.width
    }

    /// Height requested at construction.
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn bpp(&self) -> u32 {
        self.bpp
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Actual size of the held bitmap.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.bitmap.as_ref().map(|b| self.backend.dimensions(b))
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            path: self.path.clone(),
            format: self.format,
            readable: self.flags.contains(ImageFlags::READ),
            writable: self.flags.contains(ImageFlags::WRITE),
            dimensions: self.dimensions(),
            bits_per_pixel: self
                .bitmap
                .as_ref()
                .map(|b| self.backend.bits_per_pixel(b)),
            requested_bpp: self.bpp,
        }
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.flags.contains(ImageFlags::WRITE) {
            Ok(())
        } else {
            Err(ImageError::ReadOnly)
        }
    }

    fn report(&self, op: &str, result: std::result::Result<(), BackendError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}: {op} failed: {e}", self.path.display());
                false
            }
        }
    }

    fn missing_bitmap(&self, op: &str) -> bool {
        log::warn!("{}: {op} on a handle without a bitmap", self.path.display());
        false
    }
}

impl<B: BitmapBackend> Drop for Image<'_, B> {
    fn drop(&mut self) {
        if let Some(bitmap) = self.bitmap.take() {
            self.backend.release(bitmap);
            log::debug!("{}: bitmap released", self.path.display());
        }
    }
}
