/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::{Path, PathBuf};

use clap::ArgMatches;
use jxl2bmp_bmp::{probe_bmp, BmpHeader};
use jxl2bmp_core::options::DecodeOptions;
use jxl2bmp_jxl::probe_with_options;
use log::{error, warn};
use serde::Serialize;

use crate::cmd_parsers::global_options::CmdOptions;
use crate::errors::ConvertErrors;
use crate::file_io::{collect_inputs, read_file};
use crate::serde::{BmpMetadata, Metadata};

/// Probe input files, extract metadata, and print to standard output.
pub fn probe_input_files(args: &ArgMatches, cmd_opts: &CmdOptions) -> Result<(), ConvertErrors> {
    let inputs = args
        .get_many::<PathBuf>("in")
        .map(|inputs| inputs.cloned().collect::<Vec<PathBuf>>())
        .unwrap_or_default();

    let files = collect_inputs(&inputs, cmd_opts.recursive)?;
    let mut buf = Vec::with_capacity(1 << 20);
    let mut failures = 0;

    for file in &files {
        let result = read_file(file, &mut buf).and_then(|()| probe_file(file, &buf));

        if let Err(err) = result {
            if !cmd_opts.keep_going {
                return Err(err);
            }
            error!("{:?}", err);
            failures += 1;
        }
    }
    if failures > 0 {
        return Err(ConvertErrors::Generic(format!(
            "Could not probe {failures} of {} files",
            files.len()
        )));
    }
    Ok(())
}

fn probe_file(file: &Path, data: &[u8]) -> Result<(), ConvertErrors> {
    let size = data.len() as u64;

    if probe_bmp(data) {
        let header = BmpHeader::parse(data)
            .ok_or_else(|| ConvertErrors::Generic(format!("Truncated BMP header in {file:?}")))?;

        return print_json(&BmpMetadata::new(file, size, header));
    }
    // set to high to remove restrictions.
    // We'll just be reading headers so it doesn't matter
    let options = DecodeOptions::default()
        .set_max_width(usize::MAX)
        .set_max_height(usize::MAX);

    let info = probe_with_options(data, options)
        .map_err(|e| ConvertErrors::DecodeErrors(file.to_path_buf(), e))?;

    print_json(&Metadata::new(file, size, &info))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ConvertErrors> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            Ok(())
        }
        Err(err) => {
            warn!("Could not serialize metadata: {}", err);
            Err(ConvertErrors::Generic(err.to_string()))
        }
    }
}
