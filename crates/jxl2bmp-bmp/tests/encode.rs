/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::File;
use std::io::BufWriter;

use jxl2bmp_bmp::{probe_bmp, row_padding, BmpEncoder, BmpHeader, ImageSizeField, PIXEL_DATA_OFFSET};
use jxl2bmp_core::image::{ImageDimensions, PixelBuffer};
use nanorand::{Rng, WyRand};

fn random_pixels(rand: &mut WyRand, width: u32, height: u32) -> Vec<u8> {
    let mut pixels = vec![0_u8; width as usize * height as usize * 3];
    rand.fill(&mut pixels);
    pixels
}

fn encode(pixels: &[u8], width: u32, height: u32) -> Vec<u8> {
    let encoder = BmpEncoder::new(pixels, ImageDimensions::new(width, height));
    let mut sink: Vec<u8> = vec![];
    let written = encoder.encode(&mut sink).unwrap();
    assert_eq!(written, sink.len());
    sink
}

/// Read the pixel rows back, undoing the bottom up order and BGR swizzle
fn decode_rows(container: &[u8]) -> (BmpHeader, Vec<u8>) {
    let header = BmpHeader::parse(container).unwrap();
    let width = header.width as usize;
    let height = header.height as usize;
    let stride = header.stride();

    let data = &container[header.pixel_data_offset as usize..];
    assert_eq!(data.len(), stride * height);

    let mut pixels = vec![0; width * height * 3];

    for (r, stored_row) in data.chunks_exact(stride).enumerate() {
        let source_row = height - 1 - r;
        let out = &mut pixels[source_row * width * 3..(source_row + 1) * width * 3];

        for (o, p) in out.chunks_exact_mut(3).zip(stored_row.chunks_exact(3)) {
            o[0] = p[2];
            o[1] = p[1];
            o[2] = p[0];
        }
        // padding is always zero
        assert!(stored_row[width * 3..].iter().all(|x| *x == 0));
    }
    (header, pixels)
}

#[test]
fn round_trip_restores_samples() {
    let mut rand = WyRand::new_seed(0x5eed);

    for (width, height) in [(1, 1), (2, 1), (3, 7), (4, 4), (5, 3), (17, 9), (64, 2)] {
        let pixels = random_pixels(&mut rand, width, height);
        let container = encode(&pixels, width, height);

        let (header, restored) = decode_rows(&container);

        assert_eq!(header.width, width as i32);
        assert_eq!(header.height, height as i32);
        assert_eq!(restored, pixels, "mismatch for {width}x{height}");
    }
}

#[test]
fn encoding_is_deterministic() {
    let mut rand = WyRand::new_seed(7);
    let pixels = random_pixels(&mut rand, 13, 11);

    assert_eq!(encode(&pixels, 13, 11), encode(&pixels, 13, 11));
}

#[test]
fn every_row_gets_the_same_padding() {
    for width in 1..=12_u32 {
        let height = 3;
        let pixels = vec![0xAB; width as usize * height as usize * 3];
        let container = encode(&pixels, width, height);

        let padding = row_padding(width as usize);
        if (width * 3) % 4 == 0 {
            assert_eq!(padding, 0);
        } else {
            assert_eq!(padding, (4 - (width as usize * 3) % 4));
        }
        let stride = width as usize * 3 + padding;
        assert_eq!(container.len(), 54 + stride * height as usize);

        for row in container[54..].chunks_exact(stride) {
            assert!(row[..width as usize * 3].iter().all(|x| *x == 0xAB));
            assert!(row[width as usize * 3..].iter().all(|x| *x == 0));
        }
    }
}

#[test]
fn header_fields_are_correct() {
    let container = encode(&[0; 2 * 3], 2, 1);
    let header = BmpHeader::parse(&container).unwrap();

    assert!(probe_bmp(&container));
    assert_eq!(header.pixel_data_offset, PIXEL_DATA_OFFSET);
    assert_eq!(header.pixel_data_offset, 54);
    assert_eq!(header.file_size, 54 + (2 * 3 + 2));
    assert_eq!(header.reserved, [0, 0]);
    assert_eq!(header.info_header_size, 40);
    assert_eq!(header.planes, 1);
    assert_eq!(header.bits_per_pixel, 24);
    assert_eq!(header.compression, 0);
    assert_eq!(header.x_pixels_per_unit, 100);
    assert_eq!(header.y_pixels_per_unit, 100);
    assert_eq!(header.colors_used, 0);
    assert_eq!(header.colors_important, 0);

    // width 1 => stride 4
    let container = encode(&[1, 2, 3], 1, 1);
    let header = BmpHeader::parse(&container).unwrap();
    assert_eq!(header.stride(), 4);
    assert_eq!(header.file_size, 58);
}

// The image size field is ambiguous, older tools wrote width*height
// while the declared file size includes padding. Both are supported.
#[test]
fn image_size_field_pixel_count() {
    let container = encode(&[0; 5 * 2 * 3], 5, 2);
    let header = BmpHeader::parse(&container).unwrap();

    assert_eq!(header.image_size, 5 * 2);
    assert_eq!(header.file_size, 54 + 16 * 2);
}

#[test]
fn image_size_field_padded_bytes() {
    let pixels = [0; 5 * 2 * 3];
    let mut encoder = BmpEncoder::new(&pixels, ImageDimensions::new(5, 2));
    encoder.set_image_size_field(ImageSizeField::PaddedBytes);

    let mut sink: Vec<u8> = vec![];
    encoder.encode(&mut sink).unwrap();
    let header = BmpHeader::parse(&sink).unwrap();

    assert_eq!(header.image_size, 16 * 2);
    assert_eq!(header.file_size, PIXEL_DATA_OFFSET + header.image_size);
}

#[test]
fn encode_from_pixel_buffer_into_file() {
    let dims = ImageDimensions::new(3, 2);
    let buffer = PixelBuffer::from_raw(dims, (0..18).collect()).unwrap();

    let path = std::env::temp_dir().join(format!("jxl2bmp-bmp-test-{}.bmp", std::process::id()));
    {
        let mut writer = BufWriter::new(File::create(&path).unwrap());
        jxl2bmp_bmp::encode_container(&buffer, &mut writer).unwrap();
    }
    let contents = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let (_, restored) = decode_rows(&contents);
    assert_eq!(&restored[..], &buffer[..]);
}
