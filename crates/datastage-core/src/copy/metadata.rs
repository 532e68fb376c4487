use eyre::{Context, Result};
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::Path;

/// Mirror the source's mtime and permissions onto `dst`.
///
/// Preservation failures demote to warnings once the content is written.
pub(crate) fn preserve_metadata(src: &Path, dst: &Path) -> Result<()> {
    let md = fs::metadata(src).with_context(|| format!("metadata {}", src.display()))?;

    if let Ok(modified) = md.modified() {
        let ft = FileTime::from_system_time(modified);
        if set_file_mtime(dst, ft).is_err() {
            log::warn!("could not preserve mtime for {}", dst.display());
        }
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mode = md.permissions().mode();
        if fs::set_permissions(dst, fs::Permissions::from_mode(mode)).is_err() {
            log::warn!("could not preserve permissions for {}", dst.display());
        }
    }
    #[cfg(not(unix))]
    {
        if fs::set_permissions(dst, md.permissions()).is_err() {
            log::warn!("could not preserve permissions for {}", dst.display());
        }
    }

    Ok(())
}
