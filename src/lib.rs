//! # bitmap-handle
//!
//! An owning image handle with read/write access control. The handle loads
//! or allocates one bitmap, lets you draw and clear pixels, saves it back,
//! and releases it when dropped. All pixel work is done by a bitmap library
//! behind the [`BitmapBackend`] trait; production code uses [`RustBackend`]
//! on top of the `image` crate.
//!
//! ```no_run
//! use bitmap_handle::imaging::{Color, Format, RustBackend};
//! use bitmap_handle::{Image, ImageFlags, OpenOptions};
//!
//! # fn main() -> bitmap_handle::Result<()> {
//! let backend = RustBackend::new();
//! let options = OpenOptions::new().flags(ImageFlags::WRITE).size(10, 10);
//! let mut image = Image::open(&backend, Format::Png, "dot.png", options)?;
//! image.draw_pixel(4, 4, Color::rgb(255, 0, 0))?;
//! image.save_image()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`handle`] | The [`Image`] handle: construction, permission checks, pixel edits, save, release |
//! | [`flags`] | [`ImageFlags`], the `READ`/`WRITE` permission set |
//! | [`error`] | [`ImageError`] kinds surfaced by the handle |
//! | [`imaging`] | [`BitmapBackend`] trait, [`RustBackend`], [`Format`](imaging::Format) and [`Color`](imaging::Color) |
//! | [`config`] | `bitmap-handle.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Backend Trait
//!
//! The handle never touches pixels itself. Every load, allocation, pixel
//! write and save goes through [`BitmapBackend`], so tests swap in a
//! recording mock and check exactly which calls were made, including that
//! each bitmap is released once.
//!
//! ## Flags Are Checked, Not Enforced Retroactively
//!
//! Flags decide what happens at construction (load, allocate) and which
//! calls are allowed afterwards. Changing them later never loads or
//! allocates; it only changes which calls succeed.
//!
//! ## Scope-Bound Ownership
//!
//! The bitmap lives in the handle and is given back to the backend in
//! `Drop`. The handle is assembled before anything is acquired, so an early
//! return from construction releases whatever was already acquired.

pub mod config;
pub mod error;
pub mod flags;
pub mod handle;
pub mod imaging;
pub mod output;

pub use error::{ImageError, Result};
pub use flags::ImageFlags;
pub use handle::{Image, ImageInfo, OpenOptions};
pub use imaging::{BitmapBackend, RustBackend};
