/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bytestream writer
//! with endian aware writes
//!
//! Encoders write to anything implementing [`ByteWriterTrait`],
//! wrapped in a [`ByteWriter`] which keeps count of what was
//! written and provides the fixed width integer writes.
pub use traits::ByteWriterTrait;
pub use writer::{ByteIoError, ByteWriter};

mod traits;
mod writer;
