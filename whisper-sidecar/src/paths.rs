use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// Suffix appended to the audio file name to form the transcript file name.
pub const OUTPUT_SUFFIX: &str = ".txt";

/// Input audio path and the transcript path derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Validate the raw path argument and derive the transcript path.
///
/// The argument must be present and absolute. whisper.cpp tooling resolves
/// model and audio paths relative to its own working directory, so relative
/// paths are rejected here instead of being normalized.
pub fn resolve(raw: Option<&Path>) -> Result<PathPair> {
    let input = match raw {
        Some(r) if !r.as_os_str().is_empty() => r.to_path_buf(),
        _ => return Err(Error::MissingInputPath),
    };

    if !input.is_absolute() {
        return Err(Error::RelativeInputPath { path: input });
    }

    let output = output_path_for(&input)?;

    info!(path = %input.display(), "using absolute path");
    info!(path = %output.display(), "output file path");

    Ok(PathPair { input, output })
}

/// `<dir>/<file name>.txt`, a sibling of `input`.
pub fn output_path_for(input: &Path) -> Result<PathBuf> {
    let file_name = input.file_name().ok_or_else(|| Error::NoFileName {
        path: input.to_path_buf(),
    })?;

    let mut name = OsString::from(file_name);
    name.push(OUTPUT_SUFFIX);

    Ok(match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    })
}
