//! Read/write permission set for image handles.

use bitflags::bitflags;

bitflags! {
    /// Access permissions of an [`Image`](crate::handle::Image).
    ///
    /// `READ` loads the file at construction and allows pixel reads.
    /// `WRITE` allocates a blank bitmap when nothing was loaded and allows
    /// every mutating call, including save.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageFlags: u8 {
        const READ  = 0b01;
        const WRITE = 0b10;
    }
}

impl Default for ImageFlags {
    fn default() -> Self {
        Self::READ | Self::WRITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_read_and_write() {
        assert_eq!(ImageFlags::default(), ImageFlags::all());
    }

    #[test]
    fn set_operations() {
        let rw = ImageFlags::READ | ImageFlags::WRITE;
        assert_eq!(rw & !ImageFlags::WRITE, ImageFlags::READ);
        assert_eq!(rw - ImageFlags::READ, ImageFlags::WRITE);
        assert!((ImageFlags::READ & ImageFlags::WRITE).is_empty());
    }

    #[test]
    fn complement_stays_within_known_bits() {
        assert_eq!(!ImageFlags::READ, ImageFlags::WRITE);
        assert_eq!(!ImageFlags::empty(), ImageFlags::all());
    }
}
