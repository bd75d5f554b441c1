/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use log::{debug, trace};
use walkdir::WalkDir;

use crate::errors::ConvertErrors;

/// Whether `path` carries a `jxl` extension, ignoring case
pub fn is_jxl(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("jxl"))
}

/// Read the whole of `path` into `buf`, replacing its contents
///
/// The buffer is reused across files to keep allocations down.
pub fn read_file(path: &Path, buf: &mut Vec<u8>) -> Result<(), ConvertErrors> {
    buf.clear();

    let mut fd = File::open(path).map_err(|e| ConvertErrors::ReadFailure(path.to_path_buf(), e))?;
    fd.read_to_end(buf)
        .map_err(|e| ConvertErrors::ReadFailure(path.to_path_buf(), e))?;

    trace!("Read {} bytes from {:?}", buf.len(), path);
    Ok(())
}

/// Expand the command line inputs into a sorted list of files
///
/// Files are taken as given, directories contribute the `jxl` files they
/// contain, and those of their sub-directories when `recursive` is set.
pub fn collect_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, ConvertErrors> {
    let mut files = vec![];

    for input in inputs {
        if input.is_dir() {
            let max_depth = if recursive { usize::MAX } else { 1 };

            for entry in WalkDir::new(input).min_depth(1).max_depth(max_depth) {
                let entry = entry.map_err(|e| {
                    ConvertErrors::Generic(format!("Could not scan {input:?}: {e}"))
                })?;
                if entry.file_type().is_file() && is_jxl(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(ConvertErrors::ReadFailure(
                input.clone(),
                std::io::Error::new(ErrorKind::NotFound, "path does not exist")
            ));
        }
    }
    files.sort();
    files.dedup();

    debug!("Found {} input files", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::errors::ConvertErrors;
    use crate::file_io::{collect_inputs, is_jxl, read_file};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jxl2bmp-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(is_jxl(Path::new("a.jxl")));
        assert!(is_jxl(Path::new("dir/B.JXL")));
        assert!(is_jxl(Path::new("c.JxL")));
        assert!(!is_jxl(Path::new("d.jpg")));
        assert!(!is_jxl(Path::new("jxl")));
    }

    #[test]
    fn directories_are_scanned_and_sorted() {
        let dir = scratch_dir("scan");
        fs::create_dir_all(dir.join("nested")).unwrap();

        for name in ["b.jxl", "a.JXL", "c.png", "nested/d.jxl"] {
            fs::write(dir.join(name), [0]).unwrap();
        }

        let shallow = collect_inputs(&[dir.clone()], false).unwrap();
        assert_eq!(shallow, vec![dir.join("a.JXL"), dir.join("b.jxl")]);

        let deep = collect_inputs(&[dir.clone()], true).unwrap();
        assert_eq!(
            deep,
            vec![dir.join("a.JXL"), dir.join("b.jxl"), dir.join("nested/d.jxl")]
        );

        // explicit files are kept whatever their extension, duplicates dropped
        let explicit = collect_inputs(&[dir.join("c.png"), dir.clone(), dir.join("b.jxl")], false).unwrap();
        assert_eq!(
            explicit,
            vec![dir.join("a.JXL"), dir.join("b.jxl"), dir.join("c.png")]
        );

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_input_is_a_read_failure() {
        let dir = scratch_dir("missing");
        let err = collect_inputs(&[dir.join("nope.jxl")], false).unwrap_err();

        assert!(matches!(err, ConvertErrors::ReadFailure(..)));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn buffer_is_replaced_on_read() {
        let dir = scratch_dir("read");
        let file = dir.join("data.jxl");
        fs::write(&file, [1, 2, 3]).unwrap();

        let mut buf = vec![9; 10];
        read_file(&file, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);

        assert!(matches!(
            read_file(&dir.join("gone.jxl"), &mut buf),
            Err(ConvertErrors::ReadFailure(..))
        ));
        fs::remove_dir_all(dir).unwrap();
    }
}
