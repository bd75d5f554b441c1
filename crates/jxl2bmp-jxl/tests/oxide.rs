/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! End to end decoding of real JPEG XL files produced by zune-jpegxl
use jxl2bmp_bmp::{encode_container, BmpHeader, PIXEL_DATA_OFFSET};
use jxl2bmp_core::options::{DecodeOptions, ProfileTarget};
use jxl2bmp_jxl::{decode, decode_with_options, probe, JxlDecodeErrors};
use nanorand::{Rng, WyRand};
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::options::EncoderOptions;
use zune_jpegxl::JxlSimpleEncoder;

fn encode_jxl(pixels: &[u8], width: usize, height: usize, colorspace: ColorSpace) -> Vec<u8> {
    let options = EncoderOptions::new(width, height, colorspace, BitDepth::Eight);
    JxlSimpleEncoder::new(pixels, options).encode().unwrap()
}

#[test]
fn empty_input_wants_more_data() {
    let err = decode(&[]).unwrap_err();
    assert!(matches!(err, JxlDecodeErrors::NeedMoreInput));
}

#[test]
fn garbage_is_a_codec_error() {
    let err = decode(b"definitely not a jpeg xl file").unwrap_err();
    assert!(matches!(err, JxlDecodeErrors::CodecError(_)));
}

#[test]
fn truncated_file_fails() {
    let pixels = vec![128_u8; 16 * 16 * 3];
    let file = encode_jxl(&pixels, 16, 16, ColorSpace::RGB);

    assert!(decode(&file[..file.len() / 2]).is_err());
}

#[test]
fn lossless_rgb_round_trips_exactly() {
    let (width, height) = (37, 19);
    let mut pixels = vec![0_u8; width * height * 3];
    WyRand::new_seed(0x1337).fill(&mut pixels);

    let file = encode_jxl(&pixels, width, height, ColorSpace::RGB);
    let image = decode(&file).unwrap();

    assert_eq!(image.dimensions.width as usize, width);
    assert_eq!(image.dimensions.height as usize, height);
    assert_eq!(&image.pixels[..], &pixels[..]);
}

#[test]
fn grayscale_is_replicated_into_rgb() {
    let (width, height) = (8, 3);
    let luma = (0..width * height).map(|x| (x * 10) as u8).collect::<Vec<u8>>();

    let file = encode_jxl(&luma, width, height, ColorSpace::Luma);
    let image = decode(&file).unwrap();

    for (pixel, value) in image.pixels.chunks_exact(3).zip(&luma) {
        assert_eq!(pixel, &[*value, *value, *value]);
    }
}

#[test]
fn probe_reads_headers_only() {
    let pixels = vec![7_u8; 20 * 10 * 3];
    let file = encode_jxl(&pixels, 20, 10, ColorSpace::RGB);

    let info = probe(&file).unwrap();

    assert_eq!((info.dimensions.width, info.dimensions.height), (20, 10));
    assert_eq!(info.num_color_channels, 3);
    assert!(!info.has_alpha);
}

#[test]
fn limits_apply_to_real_files() {
    let pixels = vec![7_u8; 20 * 10 * 3];
    let file = encode_jxl(&pixels, 20, 10, ColorSpace::RGB);

    let options = DecodeOptions::default().set_max_height(9);
    let err = decode_with_options(&file, options).unwrap_err();

    assert!(matches!(
        err,
        JxlDecodeErrors::TooLargeDimensions("height", 9, 10)
    ));
}

#[test]
fn small_image_becomes_a_bmp() {
    // the smallest size the fixture encoder accepts
    let pixels = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
    let file = encode_jxl(&pixels, 2, 2, ColorSpace::RGB);
    let image = decode(&file).unwrap();

    let mut bmp = vec![];
    encode_container(&image.pixels, &mut bmp).unwrap();

    let header = BmpHeader::parse(&bmp).unwrap();
    assert_eq!((header.width, header.height), (2, 2));
    assert_eq!(bmp.len(), PIXEL_DATA_OFFSET as usize + 2 * 8);
    // bottom row first, BGR, two bytes of padding per row
    assert_eq!(
        &bmp[PIXEL_DATA_OFFSET as usize..],
        &[90, 80, 70, 120, 110, 100, 0, 0, 30, 20, 10, 60, 50, 40, 0, 0]
    );
}

#[test]
fn color_encoding_fills_the_profile() {
    let pixels = vec![90_u8; 4 * 4 * 3];
    let file = encode_jxl(&pixels, 4, 4, ColorSpace::RGB);

    let image = decode(&file).unwrap();
    assert!(!image.color_profile.is_empty());
    // ICC file signature
    assert_eq!(&image.color_profile.icc()[36..40], b"acsp");

    // nothing embedded, the file only signals its color encoding
    let options = DecodeOptions::default().set_profile_target(ProfileTarget::Original);
    let image = decode_with_options(&file, options).unwrap();
    assert!(image.color_profile.is_empty());
}

#[test]
fn large_images_decode_with_workers() {
    // big enough for the runner to spin up a pool on multi core machines
    let (width, height) = (600, 300);
    let mut pixels = vec![0_u8; width * height * 3];
    WyRand::new_seed(42).fill(&mut pixels);

    let file = encode_jxl(&pixels, width, height, ColorSpace::RGB);

    let options = DecodeOptions::default().set_max_threads(2);
    let image = decode_with_options(&file, options).unwrap();

    assert_eq!(&image.pixels[..], &pixels[..]);
}
