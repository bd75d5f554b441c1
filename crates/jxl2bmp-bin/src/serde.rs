/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;

use jxl2bmp_bmp::BmpHeader;
use jxl2bmp_jxl::ImageInfo;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// What `--probe` prints for a JPEG XL file
pub struct Metadata<'a> {
    file: &'a Path,
    size: u64,
    info: &'a ImageInfo
}

impl<'a> Metadata<'a> {
    pub fn new(file: &'a Path, size: u64, info: &'a ImageInfo) -> Metadata<'a> {
        Metadata { file, size, info }
    }
}

impl<'a> Serialize for Metadata<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("Metadata", 7)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("format", "jpeg-xl")?;
        state.serialize_field("file_size", &self.size)?;
        state.serialize_field("dimensions", &self.info.dimensions)?;
        state.serialize_field("color_channels", &self.info.num_color_channels)?;
        state.serialize_field("has_alpha", &self.info.has_alpha)?;
        state.serialize_field("icc_profile_size", &self.info.color_profile)?;

        state.end()
    }
}

/// What `--probe` prints for a BMP file, typically one we wrote
pub struct BmpMetadata<'a> {
    file:   &'a Path,
    size:   u64,
    header: BmpHeader
}

impl<'a> BmpMetadata<'a> {
    pub fn new(file: &'a Path, size: u64, header: BmpHeader) -> BmpMetadata<'a> {
        BmpMetadata { file, size, header }
    }
}

impl<'a> Serialize for BmpMetadata<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("BmpMetadata", 8)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("format", "bmp")?;
        state.serialize_field("file_size", &self.size)?;
        state.serialize_field("width", &self.header.width)?;
        state.serialize_field("height", &self.header.height)?;
        state.serialize_field("bits_per_pixel", &self.header.bits_per_pixel)?;
        state.serialize_field("pixel_data_offset", &self.header.pixel_data_offset)?;
        state.serialize_field("image_size", &self.header.image_size)?;

        state.end()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use jxl2bmp_bmp::{BmpEncoder, BmpHeader};
    use jxl2bmp_core::image::{ColorProfile, ImageDimensions};
    use jxl2bmp_jxl::ImageInfo;

    use crate::serde::{BmpMetadata, Metadata};

    #[test]
    fn jxl_metadata_json() {
        let info = ImageInfo {
            dimensions:         ImageDimensions::new(3, 2),
            num_color_channels: 1,
            has_alpha:          true,
            color_profile:      ColorProfile::new(vec![0; 12])
        };
        let json = serde_json::to_value(Metadata::new(Path::new("a.jxl"), 99, &info)).unwrap();

        assert_eq!(json["file"], "a.jxl");
        assert_eq!(json["format"], "jpeg-xl");
        assert_eq!(json["file_size"], 99);
        assert_eq!(json["dimensions"]["width"], 3);
        assert_eq!(json["dimensions"]["height"], 2);
        assert_eq!(json["color_channels"], 1);
        assert_eq!(json["has_alpha"], true);
        assert_eq!(json["icc_profile_size"], 12);
    }

    #[test]
    fn bmp_metadata_json() {
        let pixels = [0_u8; 2 * 3];
        let mut sink = vec![];
        BmpEncoder::new(&pixels, ImageDimensions::new(2, 1))
            .encode(&mut sink)
            .unwrap();

        let header = BmpHeader::parse(&sink).unwrap();
        let json =
            serde_json::to_value(BmpMetadata::new(Path::new("1.bmp"), sink.len() as u64, header))
                .unwrap();

        assert_eq!(json["format"], "bmp");
        assert_eq!(json["width"], 2);
        assert_eq!(json["height"], 1);
        assert_eq!(json["bits_per_pixel"], 24);
        assert_eq!(json["pixel_data_offset"], 54);
        assert_eq!(json["file_size"], 62);
    }
}
