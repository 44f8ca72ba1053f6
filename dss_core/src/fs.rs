//! Whole-file replacement for stage artifacts.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Replaces several files as one artifact set.
///
/// Every body is written and synced to a temporary file first; targets are
/// only renamed once all of them are staged, so a failure while writing
/// leaves every previous file untouched.
pub fn write_all_atomic(files: &[(&Path, &[u8])]) -> io::Result<()> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, body) in files {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.as_file_mut().write_all(body)?;
        tmp.as_file_mut().sync_all()?;
        staged.push((tmp, *path));
    }

    for (tmp, path) in staged {
        tmp.persist(path).map_err(|e| e.error)?;
    }
    Ok(())
}
