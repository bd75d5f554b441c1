/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Core routines shared by the jxl2bmp crates
//!
//! This crate provides the pieces both halves of the
//! conversion pipeline agree on
//!
//! - Image dimensions, the decoded pixel buffer and the color profile holder
//! - A byte writer with little endian aware writes, used to emit containers
//! - Decoder options
//! - A logging shim that forwards to the `log` crate when enabled
//!
//! This library is `#[no_std]` with `alloc` needed for storing decoded bytes.
//!
//! # Features
//!  - `std`: Enables writing to files via `BufWriter<File>`
//!  - `log`: Forward the logging macros to the `log` crate
//!  - `serde`: Enables serializing of some of the data structures
//!     present in the crate
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

#[cfg(feature = "log")]
pub use log;

pub mod bytestream;
pub mod image;
#[cfg(not(feature = "log"))]
pub mod log;
pub mod options;
mod serde;
