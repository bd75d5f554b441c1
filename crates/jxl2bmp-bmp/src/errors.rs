/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use jxl2bmp_core::bytestream::ByteIoError;

/// Errors that can occur during encoding
#[non_exhaustive]
pub enum BmpEncodeErrors {
    /// Width or height was zero
    ZeroDimensions(u32, u32),
    /// The pixel buffer length does not match the dimensions
    ///
    /// # Arguments
    /// - 1st argument is the length we expected
    /// - 2nd argument is the length of the buffer
    WrongBufferLength(usize, usize),
    /// The dimension cannot be represented in a BMP header
    TooLargeDimensions(&'static str, usize),
    /// The sink could not accept the bytes
    IoErrors(ByteIoError)
}

impl Debug for BmpEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroDimensions(width, height) => {
                writeln!(f, "Cannot encode an image of {width}x{height}, dimensions must be non-zero")
            }
            Self::WrongBufferLength(expected, found) => {
                writeln!(
                    f,
                    "Pixel buffer length {found} does not match image dimensions, expected {expected}"
                )
            }
            Self::TooLargeDimensions(what, found) => {
                writeln!(f, "Too large {what} {found}, cannot be stored in a BMP header")
            }
            Self::IoErrors(err) => {
                writeln!(f, "I/O error {:?}", err)
            }
        }
    }
}

impl Display for BmpEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BmpEncodeErrors {}

impl From<ByteIoError> for BmpEncodeErrors {
    fn from(value: ByteIoError) -> Self {
        BmpEncodeErrors::IoErrors(value)
    }
}
