/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::builder::PossibleValue;
use clap::{value_parser, Arg, ArgAction, Command, ValueEnum};
use jxl2bmp_bmp::ImageSizeField;

/// Command line spelling of [`ImageSizeField`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IImageSizeField {
    PixelCount,
    PaddedBytes
}

impl IImageSizeField {
    pub const fn to_image_size_field(self) -> ImageSizeField {
        match self {
            IImageSizeField::PixelCount => ImageSizeField::PixelCount,
            IImageSizeField::PaddedBytes => ImageSizeField::PaddedBytes
        }
    }
}

impl ValueEnum for IImageSizeField {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::PixelCount, Self::PaddedBytes]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::PixelCount => PossibleValue::new("pixel-count"),
            Self::PaddedBytes => PossibleValue::new("padded-bytes")
        })
    }
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("jxl2bmp")
        .about("Convert JPEG XL images to uncompressed 24 bit BMP files")
        .arg(Arg::new("in")
            .short('i')
            .long("input")
            .help("Input file or directory to read images from")
            .long_help("Input file or directory to read images from.\nDirectories are scanned for files with a jxl extension")
            .action(ArgAction::Append)
            .value_parser(value_parser!(PathBuf))
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .long("output")
            .help("Directory to write the converted files to")
            .value_parser(value_parser!(PathBuf))
            .required_unless_present("probe"))
        .arg(Arg::new("recursive")
            .long("recursive")
            .action(ArgAction::SetTrue)
            .help("Descend into sub-directories of input directories"))
        .arg(Arg::new("keep-names")
            .long("keep-names")
            .action(ArgAction::SetTrue)
            .help("Name outputs after the input file instead of 1.bmp, 2.bmp ..."))
        .arg(Arg::new("icc")
            .long("icc")
            .action(ArgAction::SetTrue)
            .help("Also write the embedded color profile next to each output"))
        .arg(Arg::new("keep-going")
            .long("keep-going")
            .action(ArgAction::SetTrue)
            .help("Continue with the next file after a failure"))
        .arg(Arg::new("all-yes")
            .short('y')
            .long("all-yes")
            .action(ArgAction::SetTrue)
            .help("Overwrite existing outputs without asking"))
        .arg(Arg::new("probe")
            .long("probe")
            .action(ArgAction::SetTrue)
            .help("Print image metadata as json and exit"))
        .arg(Arg::new("jobs")
            .long("jobs")
            .help_heading("ADVANCED")
            .help("Number of files to convert concurrently")
            .value_parser(value_parser!(usize))
            .default_value("1"))
        .arg(Arg::new("threads")
            .long("threads")
            .help_heading("ADVANCED")
            .help("Maximum number of decoder threads per file")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("max-width")
            .long("max-width")
            .help_heading("ADVANCED")
            .help("Maximum width of images to decode")
            .value_parser(value_parser!(usize))
            .default_value("16384"))
        .arg(Arg::new("max-height")
            .long("max-height")
            .help_heading("ADVANCED")
            .help("Maximum height of images to decode")
            .value_parser(value_parser!(usize))
            .default_value("16384"))
        .arg(Arg::new("image-size-field")
            .long("image-size-field")
            .help_heading("ADVANCED")
            .help("Value stored in the BMP image size field")
            .long_help("Value stored in the BMP image size field.\npixel-count stores width*height like older tools did, padded-bytes stores the size of the pixel data")
            .value_parser(value_parser!(IImageSizeField))
            .default_value("pixel-count"))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the decoding options"))
}
