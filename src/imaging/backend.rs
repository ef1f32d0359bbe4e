//! Bitmap backend trait and shared types.
//!
//! The [`BitmapBackend`] trait is the whole contract between an
//! [`Image`](crate::handle::Image) handle and the library that actually owns
//! pixels: initialize, load, allocate, read/write pixels, fill, convert,
//! save and release.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` in this module.

use super::params::{Color, Format};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: String, message: String },
    #[error("Unsupported bit depth: {0} bpp")]
    UnsupportedDepth(u32),
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} bitmap")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("A {width}x{height} bitmap at {bpp} bpp exceeds the allocation limit")]
    TooLarge { width: u32, height: u32, bpp: u32 },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Bit depths a backend can allocate, in bits per pixel.
///
/// | bpp | Layout |
/// |---|---|
/// | 8 | gray |
/// | 16 | gray + alpha |
/// | 24 | RGB |
/// | 32 | RGBA |
/// | 48 | RGB, 16-bit channels |
/// | 64 | RGBA, 16-bit channels |
/// | 96 | RGB, `f32` channels |
/// | 128 | RGBA, `f32` channels |
pub const SUPPORTED_DEPTHS: &[u32] = &[8, 16, 24, 32, 48, 64, 96, 128];

/// Contract every bitmap library binding must satisfy.
///
/// A backend hands out owned [`Bitmap`](Self::Bitmap) values and takes them
/// back in [`release`](Self::release). The handle guarantees each bitmap is
/// released exactly once.
pub trait BitmapBackend {
    /// The library's in-memory bitmap.
    type Bitmap;

    /// One-time global setup. Must be idempotent: the handle calls it on
    /// every construction.
    fn initialize(&self);

    /// Decode the file at `path` as `format`.
    fn load(&self, format: Format, path: &Path) -> Result<Self::Bitmap, BackendError>;

    /// Allocate a blank bitmap. Zero-sized and oversized requests are errors.
    fn allocate(&self, width: u32, height: u32, bpp: u32) -> Result<Self::Bitmap, BackendError>;

    /// Bitmap size as `(width, height)`.
    fn dimensions(&self, bitmap: &Self::Bitmap) -> (u32, u32);

    /// Bits per pixel of the bitmap's current layout.
    fn bits_per_pixel(&self, bitmap: &Self::Bitmap) -> u32;

    /// Read one pixel. `None` when out of range.
    fn get_pixel(&self, bitmap: &Self::Bitmap, x: u32, y: u32) -> Option<Color>;

    /// Write one pixel in the bitmap's native representation.
    fn set_pixel(
        &self,
        bitmap: &mut Self::Bitmap,
        x: u32,
        y: u32,
        color: Color,
    ) -> Result<(), BackendError>;

    /// Set every pixel to `color`.
    fn fill(&self, bitmap: &mut Self::Bitmap, color: Color) -> Result<(), BackendError>;

    /// Convert the bitmap in place to 32-bit RGBA.
    fn convert_to_32bits(&self, bitmap: &mut Self::Bitmap) -> Result<(), BackendError>;

    /// Encode the bitmap as `format` and write it to `path`.
    fn save(&self, format: Format, bitmap: &Self::Bitmap, path: &Path)
    -> Result<(), BackendError>;

    /// Give the bitmap back to the library.
    fn release(&self, bitmap: Self::Bitmap);
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Bitmap handed out by [`MockBackend`]. Only written pixels are stored.
    #[derive(Debug)]
    pub struct MockBitmap {
        pub id: usize,
        pub width: u32,
        pub height: u32,
        pub bpp: u32,
        pub pixels: HashMap<(u32, u32), Color>,
    }

    /// Mock backend that records operations without touching the filesystem.
    ///
    /// Loads succeed only for paths registered with [`MockBackend::with_file`].
    #[derive(Default)]
    pub struct MockBackend {
        pub files: Mutex<HashMap<String, (u32, u32, u32)>>,
        pub initialized: Mutex<bool>,
        pub next_id: Mutex<usize>,
        pub fail_saves: bool,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Initialize,
        Load {
            path: String,
            format: Format,
        },
        Allocate {
            id: usize,
            width: u32,
            height: u32,
            bpp: u32,
        },
        SetPixel {
            id: usize,
            x: u32,
            y: u32,
            color: Color,
        },
        Fill {
            id: usize,
            color: Color,
        },
        Convert {
            id: usize,
        },
        Save {
            id: usize,
            path: String,
            format: Format,
        },
        Release {
            id: usize,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a loadable file of the given size and depth.
        pub fn with_file(self, path: &str, width: u32, height: u32, bpp: u32) -> Self {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), (width, height, bpp));
            self
        }

        pub fn failing_saves(self) -> Self {
            Self {
                fail_saves: true,
                ..self
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn count(&self, predicate: impl Fn(&RecordedOp) -> bool) -> usize {
            self.get_operations()
                .iter()
                .filter(|op| predicate(*op))
                .count()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }

        fn bitmap(&self, width: u32, height: u32, bpp: u32) -> MockBitmap {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            MockBitmap {
                id: *next_id,
                width,
                height,
                bpp,
                pixels: HashMap::new(),
            }
        }
    }

    impl BitmapBackend for MockBackend {
        type Bitmap = MockBitmap;

        fn initialize(&self) {
            let mut initialized = self.initialized.lock().unwrap();
            if !*initialized {
                *initialized = true;
                self.record(RecordedOp::Initialize);
            }
        }

        fn load(&self, format: Format, path: &Path) -> Result<MockBitmap, BackendError> {
            let key = path.to_string_lossy().to_string();
            self.record(RecordedOp::Load {
                path: key.clone(),
                format,
            });
            let (width, height, bpp) =
                self.files.lock().unwrap().get(&key).copied().ok_or_else(|| {
                    BackendError::Io(std::io::Error::from(std::io::ErrorKind::NotFound))
                })?;
            Ok(self.bitmap(width, height, bpp))
        }

        fn allocate(&self, width: u32, height: u32, bpp: u32) -> Result<MockBitmap, BackendError> {
            if width == 0 || height == 0 {
                return Err(BackendError::ProcessingFailed(format!(
                    "cannot allocate {width}x{height}"
                )));
            }
            if !SUPPORTED_DEPTHS.contains(&bpp) {
                return Err(BackendError::UnsupportedDepth(bpp));
            }
            let bitmap = self.bitmap(width, height, bpp);
            self.record(RecordedOp::Allocate {
                id: bitmap.id,
                width,
                height,
                bpp,
            });
            Ok(bitmap)
        }

        fn dimensions(&self, bitmap: &MockBitmap) -> (u32, u32) {
            (bitmap.width, bitmap.height)
        }

        fn bits_per_pixel(&self, bitmap: &MockBitmap) -> u32 {
            bitmap.bpp
        }

        fn get_pixel(&self, bitmap: &MockBitmap, x: u32, y: u32) -> Option<Color> {
            if x >= bitmap.width || y >= bitmap.height {
                return None;
            }
            Some(bitmap.pixels.get(&(x, y)).copied().unwrap_or(Color::BLACK))
        }

        fn set_pixel(
            &self,
            bitmap: &mut MockBitmap,
            x: u32,
            y: u32,
            color: Color,
        ) -> Result<(), BackendError> {
            self.record(RecordedOp::SetPixel {
                id: bitmap.id,
                x,
                y,
                color,
            });
            if x >= bitmap.width || y >= bitmap.height {
                return Err(BackendError::OutOfBounds {
                    x,
                    y,
                    width: bitmap.width,
                    height: bitmap.height,
                });
            }
            bitmap.pixels.insert((x, y), color);
            Ok(())
        }

        fn fill(&self, bitmap: &mut MockBitmap, color: Color) -> Result<(), BackendError> {
            self.record(RecordedOp::Fill {
                id: bitmap.id,
                color,
            });
            for y in 0..bitmap.height {
                for x in 0..bitmap.width {
                    bitmap.pixels.insert((x, y), color);
                }
            }
            Ok(())
        }

        fn convert_to_32bits(&self, bitmap: &mut MockBitmap) -> Result<(), BackendError> {
            self.record(RecordedOp::Convert { id: bitmap.id });
            bitmap.bpp = 32;
            Ok(())
        }

        fn save(
            &self,
            format: Format,
            bitmap: &MockBitmap,
            path: &Path,
        ) -> Result<(), BackendError> {
            self.record(RecordedOp::Save {
                id: bitmap.id,
                path: path.to_string_lossy().to_string(),
                format,
            });
            if self.fail_saves {
                return Err(BackendError::Io(std::io::Error::from(
                    std::io::ErrorKind::PermissionDenied,
                )));
            }
            Ok(())
        }

        fn release(&self, bitmap: MockBitmap) {
            self.record(RecordedOp::Release { id: bitmap.id });
        }
    }

    #[test]
    fn mock_initializes_once() {
        let backend = MockBackend::new();
        backend.initialize();
        backend.initialize();

        assert_eq!(backend.get_operations(), vec![RecordedOp::Initialize]);
    }

    #[test]
    fn mock_load_unknown_path_errors() {
        let backend = MockBackend::new();
        let result = backend.load(Format::Png, Path::new("/missing.png"));

        assert!(matches!(result, Err(BackendError::Io(_))));
        let ops = backend.get_operations();
        assert!(matches!(&ops[0], RecordedOp::Load { path, .. } if path == "/missing.png"));
    }

    #[test]
    fn mock_load_registered_file() {
        let backend = MockBackend::new().with_file("/photo.png", 64, 48, 24);
        let bitmap = backend.load(Format::Png, Path::new("/photo.png")).unwrap();

        assert_eq!(backend.dimensions(&bitmap), (64, 48));
        assert_eq!(bitmap.bpp, 24);
    }

    #[test]
    fn mock_allocate_rejects_zero_size_and_odd_depths() {
        let backend = MockBackend::new();

        assert!(backend.allocate(0, 10, 32).is_err());
        assert!(matches!(
            backend.allocate(10, 10, 12),
            Err(BackendError::UnsupportedDepth(12))
        ));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn mock_set_pixel_checks_bounds() {
        let backend = MockBackend::new();
        let mut bitmap = backend.allocate(2, 2, 32).unwrap();

        assert!(backend.set_pixel(&mut bitmap, 1, 1, Color::WHITE).is_ok());
        assert!(matches!(
            backend.set_pixel(&mut bitmap, 2, 0, Color::WHITE),
            Err(BackendError::OutOfBounds { x: 2, y: 0, .. })
        ));
        assert_eq!(backend.get_pixel(&bitmap, 1, 1), Some(Color::WHITE));
        assert_eq!(backend.get_pixel(&bitmap, 0, 0), Some(Color::BLACK));
        assert_eq!(backend.get_pixel(&bitmap, 5, 5), None);
    }
}
