/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};
use core::mem::size_of;

use crate::bytestream::ByteWriterTrait;

/// Errors raised when writing to a sink
pub enum ByteIoError {
    #[cfg(feature = "std")]
    StdIoError(std::io::Error),
    // requested, available
    NotEnoughBuffer(usize, usize),
    Generic(&'static str)
}

impl Debug for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(feature = "std")]
            ByteIoError::StdIoError(err) => {
                writeln!(f, "Underlying I/O error {}", err)
            }
            ByteIoError::NotEnoughBuffer(expected, found) => {
                writeln!(
                    f,
                    "Not enough buffer to write {expected} bytes, buffer size is {found}"
                )
            }
            ByteIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
        }
    }
}

impl Display for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ByteIoError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for ByteIoError {
    fn from(value: std::io::Error) -> Self {
        ByteIoError::StdIoError(value)
    }
}

impl From<&'static str> for ByteIoError {
    fn from(value: &'static str) -> Self {
        ByteIoError::Generic(value)
    }
}

/// Encapsulates a sink with support for endian aware writes
///
/// The writer keeps track of how many bytes went through it,
/// which encoders report back to their callers.
pub struct ByteWriter<T: ByteWriterTrait> {
    buffer:        T,
    bytes_written: usize
}

impl<T: ByteWriterTrait> ByteWriter<T> {
    /// Create a new writer for the sink
    pub fn new(sink: T) -> ByteWriter<T> {
        ByteWriter {
            buffer:        sink,
            bytes_written: 0
        }
    }

    /// Destroy this writer returning the underlying sink
    pub fn inner(self) -> T {
        self.buffer
    }

    /// Return the number of bytes the writer has written
    ///
    /// ```
    /// use jxl2bmp_core::bytestream::ByteWriter;
    /// let mut sink = vec![];
    /// let mut stream = ByteWriter::new(&mut sink);
    /// stream.write_u8_err(1).unwrap();
    /// assert_eq!(stream.bytes_written(), 1);
    /// ```
    pub const fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Write all bytes in `buf` or error out
    pub fn write_all(&mut self, buf: &[u8]) -> Result<(), ByteIoError> {
        self.buffer.write_all_bytes(buf)?;
        self.bytes_written += buf.len();
        Ok(())
    }

    /// Write a fixed size array of bytes or error out
    pub fn write_const_bytes<const N: usize>(&mut self, buf: &[u8; N]) -> Result<(), ByteIoError> {
        self.buffer.write_const_bytes(buf)?;
        self.bytes_written += N;
        Ok(())
    }

    /// Write a single byte into the sink or error out
    /// if the sink cannot accept it
    pub fn write_u8_err(&mut self, byte: u8) -> Result<(), ByteIoError> {
        self.write_const_bytes(&[byte])
    }

    /// Tell the sink how many bytes are about to be written
    pub fn reserve(&mut self, size: usize) -> Result<(), ByteIoError> {
        self.buffer.reserve_capacity(size)
    }

    /// Flush everything written so far to the sink
    pub fn flush(&mut self) -> Result<(), ByteIoError> {
        self.buffer.flush_bytes()
    }
}

enum Mode {
    // Big endian
    BE,
    // Little Endian
    LE
}

macro_rules! write_single_type {
    ($name:tt,$name2:tt,$name3:tt,$int_type:tt) => {
        impl<T: ByteWriterTrait> ByteWriter<T> {
            #[inline(always)]
            fn $name(&mut self, byte: $int_type, mode: Mode) -> Result<(), ByteIoError> {
                const SIZE: usize = size_of::<$int_type>();

                // get bits, depending on mode.
                // This should be inlined and not visible in
                // the generated binary since mode is a compile
                // time constant.
                let bytes: [u8; SIZE] = match mode {
                    Mode::BE => byte.to_be_bytes(),
                    Mode::LE => byte.to_le_bytes()
                };
                self.write_const_bytes(&bytes)
            }

            #[doc=concat!("Write ",stringify!($int_type)," as a big endian integer")]
            #[doc=concat!("Returning an error if the underlying sink cannot support a ",stringify!($int_type)," write.")]
            #[inline]
            pub fn $name2(&mut self, byte: $int_type) -> Result<(), ByteIoError> {
                self.$name(byte, Mode::BE)
            }

            #[doc=concat!("Write ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning an error if the underlying sink cannot support a ",stringify!($int_type)," write.")]
            #[inline]
            pub fn $name3(&mut self, byte: $int_type) -> Result<(), ByteIoError> {
                self.$name(byte, Mode::LE)
            }
        }
    };
}

write_single_type!(write_u32_inner, write_u32_be_err, write_u32_le_err, u32);
write_single_type!(write_i32_inner, write_i32_be_err, write_i32_le_err, i32);
write_single_type!(write_u16_inner, write_u16_be_err, write_u16_le_err, u16);
