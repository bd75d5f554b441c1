/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! One shot JPEG XL decoding through an event driven codec session
//!
//! A [`CodecSession`] hands the complete file to a [`CodecEventSource`]
//! and reacts to the events it reports until the image is decoded into
//! interleaved 8 bit RGB, together with its ICC profile.
//!
//! The default source is [`OxideEventSource`], built on `jxl-oxide`.
//!
//! # Example
//! ```no_run
//! use jxl2bmp_core::options::DecodeOptions;
//!
//! let data = std::fs::read("image.jxl").unwrap();
//! let options = DecodeOptions::default().set_max_threads(4);
//!
//! let image = jxl2bmp_jxl::decode_with_options(&data, options).unwrap();
//! println!("{}x{}", image.dimensions.width, image.dimensions.height);
//! ```
pub use jxl2bmp_core;

pub use crate::errors::JxlDecodeErrors;
pub use crate::events::{BasicInfo, DataType, DecoderEvents, DecoderStatus, Endianness, PixelFormat};
pub use crate::oxide::OxideEventSource;
pub use crate::runner::ParallelRunner;
pub use crate::session::{
    decode, decode_with_options, probe, probe_with_options, CodecSession, DecodedImage, ImageInfo
};
pub use crate::source::CodecEventSource;

mod errors;
mod events;
mod oxide;
mod runner;
mod session;
mod source;
