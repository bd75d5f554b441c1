/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoded image representation
//!
//! The decoder produces these and the container encoder consumes them,
//! neither side knows about the other.
use alloc::vec::Vec;
use core::ops::Deref;

/// Number of interleaved channels in a decoded pixel, red, green and blue
pub const RGB_CHANNELS: usize = 3;

/// Width and height of an image in pixels
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImageDimensions {
    pub width:  u32,
    pub height: u32
}

impl ImageDimensions {
    pub const fn new(width: u32, height: u32) -> ImageDimensions {
        ImageDimensions { width, height }
    }

    /// Whether both dimensions are non-zero
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Number of pixels in the image, or `None` on overflow
    pub fn area(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Bytes needed to hold the image as interleaved 8 bit RGB,
    /// or `None` on overflow
    pub fn rgb_buffer_size(&self) -> Option<usize> {
        self.area()?.checked_mul(RGB_CHANNELS)
    }
}

/// Interleaved 8 bit RGB samples, row major, top to bottom
/// with no padding between rows.
///
/// The buffer is created once the dimensions are known and never
/// resized afterwards, only the decoder writes into it.
#[derive(Clone, Eq, PartialEq)]
pub struct PixelBuffer {
    dimensions: ImageDimensions,
    data:       Vec<u8>
}

impl PixelBuffer {
    /// Allocate a zeroed buffer for `dimensions`
    ///
    /// Returns `None` if the size overflows `usize`
    pub fn allocate(dimensions: ImageDimensions) -> Option<PixelBuffer> {
        let size = dimensions.rgb_buffer_size()?;

        Some(PixelBuffer {
            dimensions,
            data: alloc::vec![0; size]
        })
    }

    /// Wrap already decoded samples
    ///
    /// Returns the samples back if their length does not match the dimensions
    pub fn from_raw(dimensions: ImageDimensions, data: Vec<u8>) -> Result<PixelBuffer, Vec<u8>> {
        if dimensions.rgb_buffer_size() != Some(data.len()) {
            return Err(data);
        }
        Ok(PixelBuffer { dimensions, data })
    }

    pub const fn dimensions(&self) -> ImageDimensions {
        self.dimensions
    }

    /// Mutable view for the decoder to write into
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl Deref for PixelBuffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl core::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("dimensions", &self.dimensions)
            .field("len", &self.data.len())
            .finish()
    }
}

/// An embedded ICC color profile, kept as opaque bytes
///
/// Empty when the image carried no profile.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct ColorProfile {
    icc: Vec<u8>
}

impl ColorProfile {
    pub const fn empty() -> ColorProfile {
        ColorProfile { icc: Vec::new() }
    }

    pub fn new(icc: Vec<u8>) -> ColorProfile {
        ColorProfile { icc }
    }

    pub fn is_empty(&self) -> bool {
        self.icc.is_empty()
    }

    pub fn icc(&self) -> &[u8] {
        &self.icc
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.icc
    }
}

impl core::fmt::Debug for ColorProfile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ColorProfile({} bytes)", self.icc.len())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use crate::image::{ImageDimensions, PixelBuffer};

    #[test]
    fn buffer_is_sized_from_dimensions() {
        let dims = ImageDimensions::new(5, 3);
        let buffer = PixelBuffer::allocate(dims).unwrap();

        assert_eq!(buffer.len(), 5 * 3 * 3);
        assert!(buffer.iter().all(|x| *x == 0));
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        let dims = ImageDimensions::new(2, 2);

        assert!(PixelBuffer::from_raw(dims, vec![0; 11]).is_err());
        assert!(PixelBuffer::from_raw(dims, vec![0; 12]).is_ok());
    }

    #[test]
    fn zero_dimensions_are_invalid() {
        assert!(!ImageDimensions::new(0, 10).is_valid());
        assert!(!ImageDimensions::new(10, 0).is_valid());
        assert!(ImageDimensions::new(1, 1).is_valid());
    }
}
