/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A BMP container encoder
//!
//! This crate writes interleaved 8 bit RGB pixels as an uncompressed
//! 24 bit Windows BMP (`BITMAPINFOHEADER`, 40 byte info header).
//!
//! # Layout
//! - 14 byte file header, `BM` magic, file size and pixel data offset
//! - 40 byte info header
//! - Pixel rows, bottom row first, each pixel stored as blue, green, red,
//!   each row zero padded to a multiple of 4 bytes
//!
//! # Features
//! - `no_std` with `alloc` when the `std` feature is off
//! - A header reader for inspecting containers produced by the encoder
//!
//! # Example
//! ```
//! use jxl2bmp_bmp::BmpEncoder;
//! use jxl2bmp_core::image::ImageDimensions;
//!
//! let pixels = [10, 20, 30];
//! let encoder = BmpEncoder::new(&pixels, ImageDimensions::new(1, 1));
//! let mut sink = vec![];
//! let written = encoder.encode(&mut sink).unwrap();
//!
//! assert_eq!(written, 58);
//! assert_eq!(&sink[54..], &[30, 20, 10, 0]);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub use crate::common::{probe_bmp, row_padding, BmpHeader, PIXEL_DATA_OFFSET};
pub use crate::encoder::{encode_container, BmpEncoder, ImageSizeField};
pub use crate::errors::BmpEncodeErrors;

mod common;
mod encoder;
mod errors;
