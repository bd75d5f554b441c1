/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{stdin, BufRead, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::ArgMatches;
use jxl2bmp_bmp::BmpEncoder;
use jxl2bmp_core::image::ColorProfile;
use jxl2bmp_jxl::decode_with_options;
use log::{debug, error, info};
use rayon::prelude::*;

use crate::cmd_parsers::global_options::CmdOptions;
use crate::errors::ConvertErrors;
use crate::file_io::{collect_inputs, read_file};

/// One input and the container it becomes
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Conversion {
    pub input:  PathBuf,
    pub output: PathBuf
}

pub(crate) fn create_and_exec_workflow_from_cmd(
    args: &ArgMatches, cmd_opts: &CmdOptions
) -> Result<(), ConvertErrors> {
    info!("Creating conversions from input");

    let inputs = args
        .get_many::<PathBuf>("in")
        .map(|inputs| inputs.cloned().collect::<Vec<PathBuf>>())
        .unwrap_or_default();
    let out_dir = args
        .get_one::<PathBuf>("out")
        .ok_or_else(|| ConvertErrors::Generic("No output directory given".to_string()))?;

    let files = collect_inputs(&inputs, cmd_opts.recursive)?;

    if files.is_empty() {
        return Err(ConvertErrors::Generic(format!(
            "No jxl files found in {inputs:?}"
        )));
    }
    fs::create_dir_all(out_dir).map_err(|e| ConvertErrors::SinkFailure(out_dir.clone(), e))?;

    let conversions = plan_conversions(&files, out_dir, cmd_opts.keep_names);

    for conversion in &conversions {
        for output in written_paths(conversion, cmd_opts) {
            verify_output_path(&output, cmd_opts)?;
        }
    }
    run_conversions(&conversions, cmd_opts)
}

/// Pair every input with its output path
///
/// Outputs are numbered from 1 in input order, or named after the input
/// stem with `keep_names`. Repeated stems get the position appended,
/// counting up from there until the name is free.
pub fn plan_conversions(files: &[PathBuf], out_dir: &Path, keep_names: bool) -> Vec<Conversion> {
    let mut used = HashSet::new();

    files
        .iter()
        .enumerate()
        .map(|(pos, input)| {
            let number = pos + 1;

            let stem = match input.file_stem() {
                Some(stem) if keep_names => stem.to_string_lossy().into_owned(),
                _ => number.to_string()
            };
            let mut name = stem.clone();
            let mut suffix = number;

            // a suffixed name may itself belong to another input
            while !used.insert(name.clone()) {
                name = format!("{stem}-{suffix}");
                suffix += 1;
            }
            Conversion {
                input:  input.clone(),
                output: out_dir.join(format!("{name}.bmp"))
            }
        })
        .collect()
}

/// Every file a conversion may create
fn written_paths(conversion: &Conversion, cmd_opts: &CmdOptions) -> Vec<PathBuf> {
    let mut paths = vec![conversion.output.clone()];

    if cmd_opts.write_icc {
        paths.push(icc_path(&conversion.output));
    }
    paths
}

fn verify_output_path(out_path: &Path, cmd_opts: &CmdOptions) -> Result<(), ConvertErrors> {
    if !out_path.exists() {
        return Ok(());
    }
    if cmd_opts.override_files {
        info!("Overwriting path {:?} ", out_path);
        return Ok(());
    }
    println!("File {:?} exists, overwrite [y/N]", out_path);
    let mut result = String::new();

    stdin()
        .lock()
        .read_line(&mut result)
        .map_err(|e| ConvertErrors::ReadFailure(PathBuf::from("<stdin>"), e))?;

    if result.trim() != "y" {
        return Err(ConvertErrors::Generic(format!(
            "Not overwriting file {:?}",
            out_path
        )));
    }
    Ok(())
}

/// Convert every planned file, sequentially or on a pool of `jobs` threads
pub fn run_conversions(conversions: &[Conversion], cmd_opts: &CmdOptions) -> Result<(), ConvertErrors> {
    let failures = if cmd_opts.jobs > 1 {
        debug!("Converting on {} threads", cmd_opts.jobs);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(cmd_opts.jobs)
            .build()
            .map_err(|e| ConvertErrors::Generic(format!("Could not create thread pool: {e}")))?;

        pool.install(|| {
            conversions
                .par_iter()
                .map(|conversion| {
                    let mut buf = Vec::new();
                    convert_file(conversion, cmd_opts, &mut buf)
                })
                .collect::<Vec<Result<(), ConvertErrors>>>()
        })
        .into_iter()
        .filter_map(Result::err)
        .map(|err| report_failure(err, cmd_opts))
        .collect::<Result<Vec<()>, ConvertErrors>>()?
        .len()
    } else {
        // one buffer for all the files
        let mut buf = Vec::with_capacity(1 << 20);
        let mut failures = 0;

        for conversion in conversions {
            if let Err(err) = convert_file(conversion, cmd_opts, &mut buf) {
                report_failure(err, cmd_opts)?;
                failures += 1;
            }
        }
        failures
    };

    if failures > 0 {
        return Err(ConvertErrors::Generic(format!(
            "Could not convert {failures} of {} files",
            conversions.len()
        )));
    }
    info!("Converted {} files", conversions.len());
    Ok(())
}

fn report_failure(err: ConvertErrors, cmd_opts: &CmdOptions) -> Result<(), ConvertErrors> {
    if !cmd_opts.keep_going {
        return Err(err);
    }
    error!("{:?}", err);
    Ok(())
}

/// Decode one file and write its container and, if asked, its color profile
pub fn convert_file(
    conversion: &Conversion, cmd_opts: &CmdOptions, buf: &mut Vec<u8>
) -> Result<(), ConvertErrors> {
    let start = Instant::now();

    read_file(&conversion.input, buf)?;

    let image = decode_with_options(buf.as_slice(), cmd_opts.decode_options())
        .map_err(|e| ConvertErrors::DecodeErrors(conversion.input.clone(), e))?;

    let mut encoder = BmpEncoder::new_from_buffer(&image.pixels);
    encoder.set_image_size_field(cmd_opts.image_size_field);

    let written = write_container(&conversion.output, &encoder)?;

    if cmd_opts.write_icc {
        write_profile(&conversion.output, &image.color_profile)?;
    }
    info!(
        "Converted {:?} -> {:?} ({} bytes) in {:?}",
        conversion.input,
        conversion.output,
        written,
        start.elapsed()
    );
    Ok(())
}

/// Where the color profile of `output` goes with `--icc`
fn icc_path(output: &Path) -> PathBuf {
    output.with_extension("icc")
}

/// Write `profile` next to `output`, returns whether a file was written
///
/// Images without a profile get no sidecar.
fn write_profile(output: &Path, profile: &ColorProfile) -> Result<bool, ConvertErrors> {
    if profile.is_empty() {
        debug!("No color profile for {:?}", output);
        return Ok(false);
    }
    let path = icc_path(output);

    fs::write(&path, profile.icc()).map_err(|e| ConvertErrors::SinkFailure(path.clone(), e))?;
    debug!("Wrote color profile to {:?}", path);
    Ok(true)
}

/// Path the container is written to before it is complete
fn partial_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// Encode into `<output>.part` and rename it into place on success
///
/// On failure the partial file is removed, `output` is left untouched.
fn write_container(output: &Path, encoder: &BmpEncoder) -> Result<usize, ConvertErrors> {
    let partial = partial_path(output);

    let result = encode_to_file(&partial, encoder).and_then(|written| {
        fs::rename(&partial, output)
            .map_err(|e| ConvertErrors::SinkFailure(output.to_path_buf(), e))?;
        Ok(written)
    });

    if result.is_err() && partial.exists() {
        if let Err(err) = fs::remove_file(&partial) {
            error!("Could not remove {:?}: {}", partial, err);
        }
    }
    result
}

fn encode_to_file(path: &Path, encoder: &BmpEncoder) -> Result<usize, ConvertErrors> {
    let file = File::create(path).map_err(|e| ConvertErrors::SinkFailure(path.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);

    encoder
        .encode(&mut writer)
        .map_err(|e| ConvertErrors::EncodeErrors(path.to_path_buf(), e))
}
