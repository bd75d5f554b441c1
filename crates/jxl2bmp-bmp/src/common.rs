/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// `BM`, stored as the first two bytes of the file
pub(crate) const BMP_MAGIC: [u8; 2] = *b"BM";
/// Size of `BITMAPFILEHEADER`
pub(crate) const FILE_HEADER_SIZE: u32 = 14;
/// Size of `BITMAPINFOHEADER`
pub(crate) const INFO_HEADER_SIZE: u32 = 40;
/// Offset from the start of the file to the first pixel row
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
pub(crate) const PLANES: u16 = 1;
pub(crate) const BITS_PER_PIXEL: u16 = 24;
/// `BI_RGB`
pub(crate) const COMPRESSION_NONE: u32 = 0;
pub(crate) const PIXELS_PER_UNIT: i32 = 100;

/// Number of zero bytes appended to a row of `width` 24 bit pixels
/// so that the row length is a multiple of 4
///
/// ```
/// assert_eq!(jxl2bmp_bmp::row_padding(1), 1);
/// assert_eq!(jxl2bmp_bmp::row_padding(4), 0);
/// ```
pub const fn row_padding(width: usize) -> usize {
    (4 - (width * 3) % 4) % 4
}

/// Probe some bytes to see if they start with the headers
/// this crate writes
pub fn probe_bmp(bytes: &[u8]) -> bool {
    if let Some(magic_bytes) = bytes.get(0..2) {
        if magic_bytes == BMP_MAGIC {
            // skip file_size   -> 4
            // skip reserved    -> 4
            // skip data offset -> 4
            // read info header size
            if let Some(sz) = bytes.get(14..18) {
                return read_u32(sz) == INFO_HEADER_SIZE;
            }
        }
    }
    false
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut out = [0; 4];
    out.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(out)
}

fn read_u16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// The file and info headers of a BMP container
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BmpHeader {
    pub file_size:         u32,
    pub reserved:          [u16; 2],
    pub pixel_data_offset: u32,
    pub info_header_size:  u32,
    pub width:             i32,
    pub height:            i32,
    pub planes:            u16,
    pub bits_per_pixel:    u16,
    pub compression:       u32,
    pub image_size:        u32,
    pub x_pixels_per_unit: i32,
    pub y_pixels_per_unit: i32,
    pub colors_used:       u32,
    pub colors_important:  u32
}

impl BmpHeader {
    /// Read both headers from the start of `bytes`
    ///
    /// Returns `None` if there are fewer than 54 bytes or
    /// the magic bytes are not `BM`
    pub fn parse(bytes: &[u8]) -> Option<BmpHeader> {
        let header = bytes.get(..PIXEL_DATA_OFFSET as usize)?;

        if header[0..2] != BMP_MAGIC {
            return None;
        }
        Some(BmpHeader {
            file_size:         read_u32(&header[2..]),
            reserved:          [read_u16(&header[6..]), read_u16(&header[8..])],
            pixel_data_offset: read_u32(&header[10..]),
            info_header_size:  read_u32(&header[14..]),
            width:             read_u32(&header[18..]) as i32,
            height:            read_u32(&header[22..]) as i32,
            planes:            read_u16(&header[26..]),
            bits_per_pixel:    read_u16(&header[28..]),
            compression:       read_u32(&header[30..]),
            image_size:        read_u32(&header[34..]),
            x_pixels_per_unit: read_u32(&header[38..]) as i32,
            y_pixels_per_unit: read_u32(&header[42..]) as i32,
            colors_used:       read_u32(&header[46..]),
            colors_important:  read_u32(&header[50..])
        })
    }

    /// Bytes per stored row, padding included
    pub fn stride(&self) -> usize {
        let width = self.width.unsigned_abs() as usize;
        width * 3 + row_padding(width)
    }
}
