/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Vocabulary of the codec event protocol
use bitflags::bitflags;

bitflags! {
    /// Event categories a session can subscribe to
    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct DecoderEvents: u32 {
        /// Image dimensions and channel layout
        const BASIC_INFO = 1 << 0;
        /// The color profile can be queried
        const COLOR_ENCODING = 1 << 1;
        /// The output buffer holds the decoded frame
        const FULL_IMAGE = 1 << 2;
    }
}

/// What the codec reports back after each step
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DecoderStatus {
    /// Decoding finished, nothing more will happen
    Success,
    /// Unrecoverable fault, details through
    /// [`last_error`](crate::CodecEventSource::last_error)
    Error,
    /// The codec wants more bytes
    NeedMoreInput,
    /// Basic info can be queried
    BasicInfo,
    /// The color profile can be queried
    ColorEncoding,
    /// The codec needs an output buffer before it can continue
    NeedImageOutBuffer,
    /// The output buffer holds the full frame
    FullImage,
    /// Any status this crate has no name for
    Other(u32)
}

/// Sample type of the output buffer
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DataType {
    Uint8,
    Uint16,
    Float32
}

impl DataType {
    pub const fn size_of(self) -> usize {
        match self {
            DataType::Uint8 => 1,
            DataType::Uint16 => 2,
            DataType::Float32 => 4
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Endianness {
    Native,
    Little,
    Big
}

/// Layout the codec should write samples in
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PixelFormat {
    pub num_channels: u32,
    pub data_type:    DataType,
    pub endianness:   Endianness,
    /// Row alignment in bytes, 0 or 1 for tightly packed rows
    pub align:        usize
}

impl PixelFormat {
    /// Interleaved 8 bit RGB, tightly packed rows
    pub const RGB8: PixelFormat = PixelFormat {
        num_channels: 3,
        data_type:    DataType::Uint8,
        endianness:   Endianness::Little,
        align:        0
    };

    /// Size of a buffer holding an image of `width`x`height` in this layout,
    /// or `None` on overflow
    ///
    /// The last row is not padded to the alignment.
    pub fn buffer_size(&self, width: usize, height: usize) -> Option<usize> {
        if width == 0 || height == 0 {
            return Some(0);
        }
        let row_size = width
            .checked_mul(self.num_channels as usize)?
            .checked_mul(self.data_type.size_of())?;

        let stride = if self.align > 1 {
            row_size.checked_add(self.align - 1)? / self.align * self.align
        } else {
            row_size
        };
        stride.checked_mul(height - 1)?.checked_add(row_size)
    }
}

/// Image properties reported with the basic info event
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BasicInfo {
    pub xsize:              u32,
    pub ysize:              u32,
    /// 1 for grayscale, 3 for color
    pub num_color_channels: u32,
    pub has_alpha:          bool
}

#[cfg(test)]
mod tests {
    use crate::events::{DataType, Endianness, PixelFormat};

    #[test]
    fn rgb8_size_is_tightly_packed() {
        assert_eq!(PixelFormat::RGB8.buffer_size(3, 5), Some(3 * 5 * 3));
        assert_eq!(PixelFormat::RGB8.buffer_size(1, 1), Some(3));
    }

    #[test]
    fn aligned_rows_pad_all_but_the_last() {
        let format = PixelFormat {
            num_channels: 3,
            data_type:    DataType::Uint8,
            endianness:   Endianness::Little,
            align:        4
        };
        // rows of 3 bytes padded to 4, last row unpadded
        assert_eq!(format.buffer_size(1, 3), Some(4 * 2 + 3));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(PixelFormat::RGB8.buffer_size(usize::MAX, 2), None);
    }
}
