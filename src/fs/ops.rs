//! Concrete filesystem mutations used by the apply stage.
//!
//! All helpers are synchronous and create missing ancestor directories before
//! writing. Errors bubble up as `io::Error`; classification into report rows
//! happens in the apply handlers.

use std::fs;
use std::io;
use std::path::Path;

use crate::constants::APPEND_SEPARATOR;

/// Create a directory and all ancestors. Idempotent: an already-existing
/// directory is not an error.
pub fn create_dir_all(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Write `content` to `path`, creating ancestors first. Overwrites.
pub fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Append `content` to the file at `path`, separated from existing content by
/// a newline. Creates the file (and ancestors) when absent.
pub fn append_with_separator(path: &Path, content: &str) -> io::Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    let mut out = existing;
    if !out.is_empty() && !out.ends_with(APPEND_SEPARATOR) {
        out.push(APPEND_SEPARATOR);
    }
    out.push_str(content);
    write_file(path, &out)
}

/// Remove a file or directory tree. Idempotent: an absent path is Ok.
pub fn delete_recursive(path: &Path) -> io::Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
