use eyre::Result;
use std::path::Path;
use std::time::SystemTime;

/// Check if a source file should be copied over the destination.
///
/// Copies when the destination is missing or strictly older than the source.
/// Equal modification times skip: the destination wins, so an unchanged tree
/// is never recopied.
pub fn file_needs_copy(src: &Path, dst: &Path) -> Result<bool> {
    if !dst.exists() {
        return Ok(true);
    }

    let src_meta = src.metadata()?;
    let dst_meta = dst.metadata()?;

    let src_time = src_meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    let dst_time = dst_meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);

    Ok(src_time
        .duration_since(dst_time)
        .is_ok_and(|diff| !diff.is_zero()))
}
