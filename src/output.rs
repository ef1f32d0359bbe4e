//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Info
//!
//! ```text
//! photo.png
//!     Format: png
//!     Access: read
//!     Size: 640x480
//!     Depth: 24 bpp
//! ```
//!
//! ## Edits
//!
//! ```text
//! photo.png: pixel (3, 4) set to #ff0000, saved
//! photo.png: pixel (900, 4) rejected
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Edits go through
//! [`edit_result`] instead, since a rejected or unsaved edit is an error.

use crate::handle::ImageInfo;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn access_label(readable: bool, writable: bool) -> &'static str {
    match (readable, writable) {
        (true, true) => "read-write",
        (true, false) => "read",
        (false, true) => "write",
        (false, false) => "none",
    }
}

/// Format the `info` command output.
pub fn format_info(info: &ImageInfo) -> Vec<String> {
    let mut lines = vec![info.path.display().to_string()];
    lines.push(format!("{}Format: {}", indent(1), info.format));
    lines.push(format!(
        "{}Access: {}",
        indent(1),
        access_label(info.readable, info.writable)
    ));
    match info.dimensions {
        Some((w, h)) => lines.push(format!("{}Size: {}x{}", indent(1), w, h)),
        None => lines.push(format!("{}Size: (no bitmap)", indent(1))),
    }
    if let Some(bpp) = info.bits_per_pixel {
        lines.push(format!("{}Depth: {} bpp", indent(1), bpp));
    }
    lines
}

pub fn print_info(info: &ImageInfo) {
    for line in format_info(info) {
        println!("{}", line);
    }
}

/// Format the result of an edit command.
///
/// `applied` is whether the backend accepted the edit, `saved` whether the
/// file was written afterwards.
pub fn format_edit(path: &str, edit: &str, applied: bool, saved: bool) -> String {
    match (applied, saved) {
        (true, true) => format!("{}: {}, saved", path, edit),
        (true, false) => format!("{}: {}, save failed", path, edit),
        (false, _) => format!("{}: {} rejected", path, edit),
    }
}

/// The edit line as `Ok` when the edit was applied and saved, as `Err`
/// otherwise, so the CLI exits non-zero on rejected edits.
pub fn edit_result(
    path: &str,
    edit: &str,
    applied: bool,
    saved: bool,
) -> Result<String, String> {
    let line = format_edit(path, edit, applied, saved);
    if applied && saved {
        Ok(line)
    } else {
        Err(line)
    }
}
