//! Directory listing and text reads

use crate::{Error, NormalizedPath, Result};
use std::fs;

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// List the entries of a directory, sorted by file name.
///
/// A missing directory lists as empty; any other read failure is an error.
pub fn list_dir(dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let native = dir.to_native();
    let entries = fs::read_dir(&native).map_err(|e| Error::io(&native, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    Ok(names.iter().map(|name| dir.join(name)).collect())
}

/// Immediate subdirectories of `dir`, sorted by name.
pub fn list_subdirs(dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    Ok(list_dir(dir)?.into_iter().filter(|p| p.is_dir()).collect())
}

/// Regular files directly under `dir` whose name starts with `prefix` and
/// ends with `suffix`, sorted by name.
pub fn list_files_matching(
    dir: &NormalizedPath,
    prefix: &str,
    suffix: &str,
) -> Result<Vec<NormalizedPath>> {
    Ok(list_dir(dir)?
        .into_iter()
        .filter(|p| {
            p.file_name()
                .is_some_and(|name| name.starts_with(prefix) && name.ends_with(suffix))
        })
        .filter(|p| p.is_file())
        .collect())
}

/// Resolve symlinks and return the canonical absolute path.
pub fn canonicalize(path: &NormalizedPath) -> Result<NormalizedPath> {
    let native = path.to_native();
    dunce::canonicalize(&native)
        .map(NormalizedPath::from)
        .map_err(|e| Error::io(&native, e))
}
