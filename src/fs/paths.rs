//! Output-tree writes.

use std::path::Path;

use filetime::FileTime;

use crate::error::Result;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Write resource bytes to disk, creating parent directories as needed.
pub fn write_resource(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Stamp a file's modification time with the post creation time, so the
/// output tree reflects content age rather than download time.
pub fn set_modified_time(path: &Path, epoch_secs: i64) -> Result<()> {
    filetime::set_file_mtime(path, FileTime::from_unix_time(epoch_secs, 0))?;
    Ok(())
}

/// Create a hard link at `link` pointing at `original`'s inode, creating
/// parent directories as needed.
pub fn hard_link(original: &Path, link: &Path) -> Result<()> {
    if let Some(parent) = link.parent() {
        ensure_dir(parent)?;
    }
    std::fs::hard_link(original, link)?;
    Ok(())
}
