//! Input discovery and output naming for a batch directory.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Extension (with dot) selecting input files, compared case-insensitively.
pub const INPUT_EXTENSION: &str = ".3fr";

/// Name of the output subdirectory created inside the input directory.
pub const OUTPUT_DIR_NAME: &str = "EXR";

pub const OUTPUT_EXTENSION: &str = "exr";

pub fn is_3fr_file(file_name: &str) -> bool {
    is_3fr_name(OsStr::new(file_name))
}

fn is_3fr_name(file_name: &OsStr) -> bool {
    let name = file_name.as_encoded_bytes();
    let ext = INPUT_EXTENSION.as_bytes();
    name.len() >= ext.len() && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext)
}

/// File name without its directory and without the last dot-delimited extension.
///
/// Works on the raw name so distinct non-UTF-8 names keep distinct outputs.
pub fn output_basename(path: &Path) -> OsString {
    let name = path.file_name().unwrap_or_default();
    let bytes = name.as_encoded_bytes();
    match bytes.iter().rposition(|&b| b == b'.') {
        // SAFETY: the split is right before an ASCII '.', which is a valid
        // boundary for the platform's OsStr encoding.
        Some(dot) => {
            let stem = unsafe { OsStr::from_encoded_bytes_unchecked(&bytes[..dot]) };
            stem.to_os_string()
        }
        None => name.to_os_string(),
    }
}

pub fn output_dir_for(input_dir: &Path) -> PathBuf {
    input_dir.join(OUTPUT_DIR_NAME)
}

pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = output_basename(input);
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    output_dir.join(name)
}

pub fn check_input_dir(input_dir: &Path) -> Result<()> {
    if !input_dir.is_dir() {
        return Err(ConversionError::Directory(format!(
            "input directory '{}' does not exist or is not a directory",
            input_dir.display()
        )));
    }
    Ok(())
}

/// Regular files in `input_dir` with a `.3fr` extension, sorted by file name.
pub fn find_inputs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir).map_err(|e| {
        ConversionError::Directory(format!(
            "could not open directory '{}': {}",
            input_dir.display(),
            e
        ))
    })?;

    let mut inputs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            ConversionError::Directory(format!(
                "could not read directory '{}': {}",
                input_dir.display(),
                e
            ))
        })?;

        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && is_3fr_name(&entry.file_name()) {
            inputs.push(entry.path());
        } else {
            debug!("Skipping {}", entry.path().display());
        }
    }

    inputs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(inputs)
}

/// Creates the output directory, reusing it when it already exists.
pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    if output_dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(output_dir).map_err(|e| {
        ConversionError::Directory(format!(
            "could not create output directory '{}': {}",
            output_dir.display(),
            e
        ))
    })?;
    info!("Created output directory: {}", output_dir.display());
    Ok(())
}
