/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec;

use jxl2bmp_core::bytestream::{ByteWriter, ByteWriterTrait};
use jxl2bmp_core::image::{ImageDimensions, PixelBuffer, RGB_CHANNELS};
use jxl2bmp_core::log::trace;

use crate::common::{
    row_padding, BITS_PER_PIXEL, BMP_MAGIC, COMPRESSION_NONE, INFO_HEADER_SIZE, PIXELS_PER_UNIT,
    PIXEL_DATA_OFFSET, PLANES
};
use crate::BmpEncodeErrors;

/// What to store in the info header's image size field
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ImageSizeField {
    /// `width * height`, the value older tooling wrote.
    ///
    /// Readers ignore the field for uncompressed images, so
    /// this keeps output byte identical to those tools.
    #[default]
    PixelCount,
    /// Size of the pixel region in bytes, row padding included
    PaddedBytes
}

/// Sizes derived from the dimensions, validated to fit the headers
#[derive(Debug, Copy, Clone)]
struct ContainerLayout {
    width:      usize,
    height:     usize,
    padding:    usize,
    stride:     usize,
    file_size:  u32,
    image_size: u32
}

/// A 24 bit BMP encoder
///
/// # Example
/// - Encode a 100 by 100 RGB image
///
/// ```
/// use jxl2bmp_bmp::{BmpEncoder, BmpEncodeErrors};
/// use jxl2bmp_core::image::ImageDimensions;
///
/// const W: usize = 100;
/// const H: usize = 100;
///
/// fn main() -> Result<(), BmpEncodeErrors> {
///     let pixels = std::array::from_fn::<u8, { W * H * 3 }, _>(|i| (i % 256) as u8);
///     let encoder = BmpEncoder::new(&pixels, ImageDimensions::new(W as u32, H as u32));
///     let mut sink = vec![];
///     let written = encoder.encode(&mut sink)?;
///     assert_eq!(written, sink.len());
///     Ok(())
/// }
/// ```
pub struct BmpEncoder<'a> {
    // raw pixels, in RGB
    pixel_data:       &'a [u8],
    dimensions:       ImageDimensions,
    image_size_field: ImageSizeField
}

impl<'a> BmpEncoder<'a> {
    /// Create a new encoder which will encode the pixels
    ///
    /// # Arguments
    /// - data: Pixel data, size must be equal to `width*height*3`
    /// - dimensions: Image width and height
    pub const fn new(data: &'a [u8], dimensions: ImageDimensions) -> BmpEncoder<'a> {
        BmpEncoder {
            pixel_data: data,
            dimensions,
            image_size_field: ImageSizeField::PixelCount
        }
    }

    /// Create an encoder for a decoded pixel buffer
    pub fn new_from_buffer(buffer: &'a PixelBuffer) -> BmpEncoder<'a> {
        BmpEncoder::new(buffer, buffer.dimensions())
    }

    pub fn set_image_size_field(&mut self, field: ImageSizeField) {
        self.image_size_field = field;
    }

    /// Return the exact size of the encoded container
    ///
    /// # Errors
    /// Same validation errors as [`encode`](Self::encode)
    pub fn encoded_size(&self) -> Result<usize, BmpEncodeErrors> {
        Ok(self.layout()?.file_size as usize)
    }

    fn layout(&self) -> Result<ContainerLayout, BmpEncodeErrors> {
        let dims = self.dimensions;

        if !dims.is_valid() {
            return Err(BmpEncodeErrors::ZeroDimensions(dims.width, dims.height));
        }
        if dims.width > i32::MAX as u32 {
            return Err(BmpEncodeErrors::TooLargeDimensions("width", dims.width as usize));
        }
        if dims.height > i32::MAX as u32 {
            return Err(BmpEncodeErrors::TooLargeDimensions("height", dims.height as usize));
        }
        let expected_len = dims
            .rgb_buffer_size()
            .ok_or(BmpEncodeErrors::TooLargeDimensions("image", usize::MAX))?;

        if self.pixel_data.len() != expected_len {
            return Err(BmpEncodeErrors::WrongBufferLength(
                expected_len,
                self.pixel_data.len()
            ));
        }
        let width = dims.width as usize;
        let height = dims.height as usize;
        let padding = row_padding(width);
        let stride = width * RGB_CHANNELS + padding;

        let pixel_bytes = stride
            .checked_mul(height)
            .ok_or(BmpEncodeErrors::TooLargeDimensions("image", usize::MAX))?;

        let file_size = pixel_bytes
            .checked_add(PIXEL_DATA_OFFSET as usize)
            .and_then(|x| u32::try_from(x).ok())
            .ok_or(BmpEncodeErrors::TooLargeDimensions("file size", pixel_bytes))?;

        // both fit since they are smaller than file_size
        let image_size = match self.image_size_field {
            ImageSizeField::PixelCount => (width * height) as u32,
            ImageSizeField::PaddedBytes => pixel_bytes as u32
        };

        Ok(ContainerLayout {
            width,
            height,
            padding,
            stride,
            file_size,
            image_size
        })
    }

    fn encode_headers<T: ByteWriterTrait>(
        &self, layout: &ContainerLayout, writer: &mut ByteWriter<T>
    ) -> Result<(), BmpEncodeErrors> {
        // BITMAPFILEHEADER
        writer.write_const_bytes(&BMP_MAGIC)?;
        writer.write_u32_le_err(layout.file_size)?;
        // reserved
        writer.write_u16_le_err(0)?;
        writer.write_u16_le_err(0)?;
        writer.write_u32_le_err(PIXEL_DATA_OFFSET)?;

        // BITMAPINFOHEADER
        writer.write_u32_le_err(INFO_HEADER_SIZE)?;
        // positive height, rows are stored bottom up
        writer.write_i32_le_err(layout.width as i32)?;
        writer.write_i32_le_err(layout.height as i32)?;
        writer.write_u16_le_err(PLANES)?;
        writer.write_u16_le_err(BITS_PER_PIXEL)?;
        writer.write_u32_le_err(COMPRESSION_NONE)?;
        writer.write_u32_le_err(layout.image_size)?;
        writer.write_i32_le_err(PIXELS_PER_UNIT)?;
        writer.write_i32_le_err(PIXELS_PER_UNIT)?;
        // no palette, colors used and important colors
        writer.write_u32_le_err(0)?;
        writer.write_u32_le_err(0)?;

        Ok(())
    }

    /// Encode the pixels into `sink`
    ///
    /// Nothing is written if the dimensions or buffer length are invalid.
    /// If the sink fails midway the bytes already written are not a valid
    /// container and should be discarded.
    ///
    /// # Returns
    /// - Ok(size): Bytes written to the sink
    /// - Err: The error encountered during encoding
    pub fn encode<T: ByteWriterTrait>(&self, sink: T) -> Result<usize, BmpEncodeErrors> {
        let layout = self.layout()?;

        trace!(
            "Encoding {}x{} BMP, stride {}, padding {}",
            layout.width,
            layout.height,
            layout.stride,
            layout.padding
        );

        let mut writer = ByteWriter::new(sink);
        writer.reserve(layout.file_size as usize)?;

        self.encode_headers(&layout, &mut writer)?;

        let row_bytes = layout.width * RGB_CHANNELS;
        // padding bytes at the end stay zero, only pixels are overwritten
        let mut row = vec![0_u8; layout.stride];

        // bottom row first
        for source_row in self.pixel_data.chunks_exact(row_bytes).rev() {
            for (out, pix) in row[..row_bytes]
                .chunks_exact_mut(RGB_CHANNELS)
                .zip(source_row.chunks_exact(RGB_CHANNELS))
            {
                // RGB -> BGR
                out[0] = pix[2];
                out[1] = pix[1];
                out[2] = pix[0];
            }
            writer.write_all(&row)?;
        }
        writer.flush()?;

        Ok(writer.bytes_written())
    }
}

/// Encode a decoded pixel buffer as a BMP container into `sink`
///
/// This is a shorthand for [`BmpEncoder::new_from_buffer`] followed by
/// [`BmpEncoder::encode`] with default options.
pub fn encode_container<T: ByteWriterTrait>(
    pixels: &PixelBuffer, sink: T
) -> Result<usize, BmpEncodeErrors> {
    BmpEncoder::new_from_buffer(pixels).encode(sink)
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use jxl2bmp_core::image::ImageDimensions;

    use crate::{BmpEncodeErrors, BmpEncoder, ImageSizeField};

    #[test]
    fn single_pixel_is_stored_as_bgr_with_padding() {
        let pixels = [10, 20, 30];
        let encoder = BmpEncoder::new(&pixels, ImageDimensions::new(1, 1));

        let mut sink: Vec<u8> = vec![];
        let written = encoder.encode(&mut sink).unwrap();

        assert_eq!(written, 58);
        assert_eq!(sink.len(), 58);
        assert_eq!(&sink[54..], &[30, 20, 10, 0]);
    }

    #[test]
    fn header_bytes_are_exact() {
        // 2x1 image, stride 6 padded to 8
        let pixels = [1, 2, 3, 4, 5, 6];
        let encoder = BmpEncoder::new(&pixels, ImageDimensions::new(2, 1));

        let mut sink: Vec<u8> = vec![];
        encoder.encode(&mut sink).unwrap();

        #[rustfmt::skip]
        let expected: [u8; 54] = [
            b'B', b'M',
            62, 0, 0, 0, // file size
            0, 0, 0, 0, // reserved
            54, 0, 0, 0, // pixel offset
            40, 0, 0, 0, // info header size
            2, 0, 0, 0, // width
            1, 0, 0, 0, // height
            1, 0, // planes
            24, 0, // bpp
            0, 0, 0, 0, // compression
            2, 0, 0, 0, // width * height
            100, 0, 0, 0,
            100, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
        ];
        assert_eq!(&sink[..54], &expected);
        assert_eq!(&sink[54..], &[3, 2, 1, 6, 5, 4, 0, 0]);
    }

    #[test]
    fn padded_image_size_field() {
        let pixels = [0; 2 * 3 * 3];
        let mut encoder = BmpEncoder::new(&pixels, ImageDimensions::new(2, 3));
        encoder.set_image_size_field(ImageSizeField::PaddedBytes);

        let mut sink: Vec<u8> = vec![];
        encoder.encode(&mut sink).unwrap();

        assert_eq!(u32::from_le_bytes([sink[34], sink[35], sink[36], sink[37]]), 8 * 3);
    }

    #[test]
    fn encoded_size_matches_output() {
        let pixels = [7; 5 * 4 * 3];
        let encoder = BmpEncoder::new(&pixels, ImageDimensions::new(5, 4));
        let mut sink: Vec<u8> = vec![];
        let written = encoder.encode(&mut sink).unwrap();

        assert_eq!(encoder.encoded_size().unwrap(), written);
        // 5*3 = 15, padded to 16
        assert_eq!(written, 54 + 16 * 4);
    }

    #[test]
    fn wrong_length_writes_nothing() {
        let pixels = [0; 11];
        let encoder = BmpEncoder::new(&pixels, ImageDimensions::new(2, 2));
        let mut sink: Vec<u8> = vec![];

        let err = encoder.encode(&mut sink).unwrap_err();

        assert!(matches!(err, BmpEncodeErrors::WrongBufferLength(12, 11)));
        assert!(sink.is_empty());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let encoder = BmpEncoder::new(&[], ImageDimensions::new(0, 4));
        let mut sink: Vec<u8> = vec![];

        assert!(matches!(
            encoder.encode(&mut sink),
            Err(BmpEncodeErrors::ZeroDimensions(0, 4))
        ));
    }

    #[test]
    fn short_slice_sink_reports_io_error() {
        let pixels = [1; 4 * 4 * 3];
        let encoder = BmpEncoder::new(&pixels, ImageDimensions::new(4, 4));
        let mut storage = [0_u8; 60];

        let err = encoder.encode(&mut storage[..]).unwrap_err();
        assert!(matches!(err, BmpEncodeErrors::IoErrors(_)));
    }
}
