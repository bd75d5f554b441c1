/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::parser::ValueSource;
use clap::ArgMatches;
use jxl2bmp_bmp::ImageSizeField;
use jxl2bmp_core::options::DecodeOptions;
use log::{info, Level};

use crate::cmd_args::IImageSizeField;

const DEFAULT_MAX_DIMENSION: usize = 1 << 14;

#[derive(Debug, Copy, Clone)]
pub struct CmdOptions {
    pub max_width:        usize,
    pub max_height:       usize,
    pub threads:          Option<usize>,
    pub jobs:             usize,
    pub image_size_field: ImageSizeField,
    pub recursive:        bool,
    pub keep_names:       bool,
    pub keep_going:       bool,
    pub write_icc:        bool,
    pub override_files:   bool
}

impl CmdOptions {
    pub fn new() -> CmdOptions {
        CmdOptions {
            max_width:        DEFAULT_MAX_DIMENSION,
            max_height:       DEFAULT_MAX_DIMENSION,
            threads:          None,
            jobs:             1,
            image_size_field: ImageSizeField::PixelCount,
            recursive:        false,
            keep_names:       false,
            keep_going:       false,
            write_icc:        false,
            override_files:   false
        }
    }

    /// Options every decode session is created with
    pub fn decode_options(&self) -> DecodeOptions {
        let options = DecodeOptions::default()
            .set_max_width(self.max_width)
            .set_max_height(self.max_height);

        match self.threads {
            Some(threads) => options.set_max_threads(threads),
            None => options
        }
    }
}

pub fn parse_options(options: &ArgMatches) -> CmdOptions {
    let mut cmd_options = CmdOptions::new();

    if let Some(width) = options.get_one::<usize>("max-width") {
        cmd_options.max_width = *width;
    }
    if let Some(height) = options.get_one::<usize>("max-height") {
        cmd_options.max_height = *height;
    }
    if let Some(threads) = options.get_one::<usize>("threads") {
        info!("Limiting decoder threads to {}", threads);
        cmd_options.threads = Some(*threads);
    }
    if let Some(jobs) = options.get_one::<usize>("jobs") {
        cmd_options.jobs = (*jobs).max(1);
    }
    if let Some(field) = options.get_one::<IImageSizeField>("image-size-field") {
        cmd_options.image_size_field = field.to_image_size_field();
    }

    if options.value_source("all-yes") == Some(ValueSource::CommandLine) {
        info!("Setting all commands to yes");
        cmd_options.override_files = true;
    }
    cmd_options.recursive = options.get_flag("recursive");
    cmd_options.keep_names = options.get_flag("keep-names");
    cmd_options.keep_going = options.get_flag("keep-going");
    cmd_options.write_icc = options.get_flag("icc");

    cmd_options
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("warn") {
        Level::Warn
    } else if options.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    };

    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger: {err}");
        return;
    }

    info!("Initialized logger");
    info!("Log level :{}", log_level);
}

#[cfg(test)]
mod tests {
    use jxl2bmp_bmp::ImageSizeField;

    use crate::cmd_args::create_cmd_args;
    use crate::cmd_parsers::global_options::parse_options;

    #[test]
    fn flags_reach_the_options() {
        let matches = create_cmd_args()
            .try_get_matches_from([
                "jxl2bmp",
                "-i",
                "in",
                "-o",
                "out",
                "-y",
                "--keep-going",
                "--icc",
                "--threads",
                "3",
                "--jobs",
                "0",
                "--max-width",
                "64",
                "--image-size-field",
                "padded-bytes"
            ])
            .unwrap();
        let options = parse_options(&matches);

        assert!(options.override_files);
        assert!(options.keep_going);
        assert!(options.write_icc);
        assert!(!options.keep_names);
        assert!(!options.recursive);
        assert_eq!(options.jobs, 1);
        assert_eq!(options.threads, Some(3));
        assert_eq!(options.image_size_field, ImageSizeField::PaddedBytes);

        let decode = options.decode_options();
        assert_eq!(decode.max_width(), 64);
        assert_eq!(decode.max_height(), 1 << 14);
        assert_eq!(decode.max_threads(), Some(3));
    }
}
