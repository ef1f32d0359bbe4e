//! Bitmap library boundary.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Load** | `image::ImageReader` |
//! | **Allocate** | `image::DynamicImage::new_*` |
//! | **Pixels** | `GenericImage` / `GenericImageView` |
//! | **Save** | `DynamicImage::save_with_format` |
//!
//! The module is split into:
//! - **Parameters**: [`Format`] and [`Color`], the values crossing the boundary
//! - **Backend**: [`BitmapBackend`] trait + [`RustBackend`]

pub mod backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, BitmapBackend, SUPPORTED_DEPTHS};
pub use params::{ALL_FORMATS, Color, Format};
pub use rust_backend::{RustBackend, readable_formats};
