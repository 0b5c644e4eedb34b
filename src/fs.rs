//! File helpers for the build driver
//!
//! Copies go through a temp file in the destination directory followed by a
//! rename, so a reader never sees a half-written Markdown file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::OrgpressResult;

/// Write `content` to `path` atomically, creating parent directories
pub fn atomic_write(path: &Path, content: &[u8]) -> OrgpressResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Copy `from` to `to` atomically
pub fn atomic_copy(from: &Path, to: &Path) -> OrgpressResult<()> {
    let content = fs::read(from)?;
    atomic_write(to, &content)
}

/// Compute SHA-256 hash of content
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{:x}", hasher.finalize())
}

/// Compute SHA-256 hash of a file
pub fn hash_file(path: &Path) -> io::Result<String> {
    Ok(hash_content(&fs::read(path)?))
}

/// True when `output` exists and is not older than `input`
pub fn is_fresh(input: &Path, output: &Path) -> bool {
    let modified = |p: &Path| fs::metadata(p).and_then(|m| m.modified());
    match (modified(input), modified(output)) {
        (Ok(src), Ok(dst)) => dst >= src,
        _ => false,
    }
}
