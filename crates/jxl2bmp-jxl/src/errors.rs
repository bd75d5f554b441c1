/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Display, Formatter};

/// Errors that can occur while running a decode session
#[non_exhaustive]
pub enum JxlDecodeErrors {
    /// The codec reported an unrecoverable fault
    CodecError(String),
    /// The codec asked for more bytes although the whole
    /// file was handed over up front
    NeedMoreInput,
    /// The codec returned a status the session does not understand
    UnknownStatus(u32),
    /// Basic info was reported a second time
    RepeatedBasicInfo,
    /// Something that needs the image dimensions happened before
    /// basic info was reported
    MissingBasicInfo(&'static str),
    /// The codec asked for an output buffer a second time
    RepeatedOutputBuffer,
    /// The image reports a zero width or height
    ZeroDimensions(u32, u32),
    /// Too large dimensions for a given width or height
    ///
    /// # Arguments
    /// - 1st argument is the dimension name
    /// - 2nd argument is the configured limit
    /// - 3rd argument is the image value
    TooLargeDimensions(&'static str, usize, usize),
    /// The buffer size reported by the codec does not match
    /// `width * height * 3`
    ///
    /// # Arguments
    /// - 1st argument is the size computed from the dimensions
    /// - 2nd argument is the size the codec reported
    BufferSizeMismatch(usize, usize),
    /// Decoding finished without the pixels being delivered
    IncompleteImage
}

impl JxlDecodeErrors {
    /// Whether the codec or the event stream misbehaved, as opposed to
    /// the image failing a size check
    pub const fn is_protocol_error(&self) -> bool {
        !matches!(
            self,
            JxlDecodeErrors::BufferSizeMismatch(..) | JxlDecodeErrors::TooLargeDimensions(..)
        )
    }
}

impl Debug for JxlDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CodecError(message) => {
                writeln!(f, "Decoder error: {message}")
            }
            Self::NeedMoreInput => {
                writeln!(f, "Decoder asked for more input, but all input was already provided")
            }
            Self::UnknownStatus(status) => {
                writeln!(f, "Unknown decoder status {status}")
            }
            Self::RepeatedBasicInfo => {
                writeln!(f, "Basic info was reported more than once")
            }
            Self::MissingBasicInfo(when) => {
                writeln!(f, "Basic info not yet known when {when}")
            }
            Self::RepeatedOutputBuffer => {
                writeln!(f, "Decoder asked for an output buffer more than once")
            }
            Self::ZeroDimensions(width, height) => {
                writeln!(f, "Invalid image dimensions {width}x{height}")
            }
            Self::TooLargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension}, {found} exceeds {expected}"
                )
            }
            Self::BufferSizeMismatch(expected, found) => {
                writeln!(f, "Invalid out buffer size {found}, expected {expected}")
            }
            Self::IncompleteImage => {
                writeln!(f, "Decoding finished before the full image was written")
            }
        }
    }
}

impl Display for JxlDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for JxlDecodeErrors {}

impl From<&'static str> for JxlDecodeErrors {
    fn from(r: &'static str) -> Self {
        Self::CodecError(r.to_string())
    }
}
