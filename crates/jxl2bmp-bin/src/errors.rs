/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

use jxl2bmp_bmp::BmpEncodeErrors;
use jxl2bmp_jxl::JxlDecodeErrors;

/// Reasons converting a single file can fail
pub enum ConvertErrors {
    /// The input could not be read
    ReadFailure(PathBuf, std::io::Error),
    /// The input was read but could not be decoded
    DecodeErrors(PathBuf, JxlDecodeErrors),
    /// The container could not be produced
    EncodeErrors(PathBuf, BmpEncodeErrors),
    /// An output file could not be created, written or renamed
    SinkFailure(PathBuf, std::io::Error),
    Generic(String)
}

impl Debug for ConvertErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailure(path, err) => {
                writeln!(f, "Could not read {path:?}: {err}")
            }
            Self::DecodeErrors(path, err) => {
                writeln!(f, "Could not decode {path:?}: {err:?}")
            }
            Self::EncodeErrors(path, err) => {
                writeln!(f, "Could not encode {path:?}: {err:?}")
            }
            Self::SinkFailure(path, err) => {
                writeln!(f, "Could not write {path:?}: {err}")
            }
            Self::Generic(message) => {
                writeln!(f, "{message}")
            }
        }
    }
}

impl Display for ConvertErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ConvertErrors {}

impl From<String> for ConvertErrors {
    fn from(value: String) -> Self {
        Self::Generic(value)
    }
}
