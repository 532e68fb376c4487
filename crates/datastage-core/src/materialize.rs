//! The activation sequence: normalize the target name, ensure the directory,
//! then mirror the dataset into it incrementally.

use crate::copy::{copy_file, file_needs_copy};
use crate::logger::ActivationLog;
use crate::MaterializeOptions;
use eyre::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// What a materialize run did, for reporting.
#[derive(Debug, Default, Clone)]
pub struct MaterializeSummary {
    pub removed_symlink: bool,
    pub copied_files: usize,
    pub skipped_files: usize,
    pub dirs_created: usize,
    pub total_bytes: u64,
    pub duration: Duration,
    pub source_missing: bool,
}

/// Ensure `target` is a real directory holding a current copy of `source_root`.
///
/// The sequence is: drop a stale symlink squatting on `target`, ensure the
/// directory exists, then walk `source_root` and copy every file that is
/// missing or older at the destination. A missing `source_root` is reported
/// through `log` and aborts the copy without an error; any other filesystem
/// fault propagates to the caller.
pub fn materialize(
    source_root: &Path,
    target: &Path,
    options: &MaterializeOptions,
    log: &dyn ActivationLog,
) -> Result<MaterializeSummary> {
    let start = Instant::now();
    let mut summary = MaterializeSummary::default();

    normalize_target(target, options, &mut summary, log)?;
    ensure_target_dir(target, options, log)?;

    if !source_root.exists() {
        log.error(&format!(
            "source directory '{}' does not exist",
            source_root.display()
        ));
        summary.source_missing = true;
        summary.duration = start.elapsed();
        return Ok(summary);
    }

    copy_tree(source_root, target, options, &mut summary)?;
    summary.duration = start.elapsed();
    Ok(summary)
}

/// A symlink at the target name is removed unconditionally, whatever it
/// points at. Anything else is left for the directory ensure.
fn normalize_target(
    target: &Path,
    options: &MaterializeOptions,
    summary: &mut MaterializeSummary,
    log: &dyn ActivationLog,
) -> Result<()> {
    let is_symlink = fs::symlink_metadata(target)
        .map(|md| md.file_type().is_symlink())
        .unwrap_or(false);

    if is_symlink {
        if options.dry_run {
            log.info(&format!(
                "symlink '{}' would be removed",
                target.display()
            ));
        } else {
            fs::remove_file(target)
                .with_context(|| format!("removing symlink {}", target.display()))?;
            log.info(&format!("symlink '{}' has been removed", target.display()));
        }
        summary.removed_symlink = true;
    } else {
        log.info(&format!("'{}' is not a symlink", target.display()));
    }
    Ok(())
}

/// Idempotent directory create. A regular file at the target name makes this
/// fail, and the error propagates.
fn ensure_target_dir(
    target: &Path,
    options: &MaterializeOptions,
    log: &dyn ActivationLog,
) -> Result<()> {
    if options.dry_run {
        if target.is_dir() {
            log.info(&format!("directory '{}' is ready", target.display()));
        } else {
            log.info(&format!("directory '{}' would be created", target.display()));
        }
        return Ok(());
    }

    fs::create_dir_all(target)
        .with_context(|| format!("creating directory {}", target.display()))?;
    log.info(&format!("directory '{}' is ready", target.display()));
    Ok(())
}

/// Mirror relative paths under the target, copying files that pass the copy
/// predicate. Existing destination directories are merged into; files only
/// present at the destination are never touched.
fn copy_tree(
    source_root: &Path,
    target: &Path,
    options: &MaterializeOptions,
    summary: &mut MaterializeSummary,
) -> Result<()> {
    for entry in WalkDir::new(source_root).follow_links(true) {
        let entry = entry?;
        if entry.depth() == 0 {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(source_root)
            .with_context(|| format!("stripping prefix from {}", entry.path().display()))?;
        let dest = target.join(rel);

        if entry.file_type().is_dir() {
            if !dest.is_dir() {
                if !options.dry_run {
                    fs::create_dir_all(&dest)
                        .with_context(|| format!("creating directory {}", dest.display()))?;
                }
                summary.dirs_created += 1;
            }
            continue;
        }

        // The predicate is evaluated per file at traversal time; a source
        // tree changing mid-copy yields independent decisions, not a
        // snapshot-consistent destination.
        if file_needs_copy(entry.path(), &dest)? {
            let bytes = if options.dry_run {
                entry.metadata()?.len()
            } else {
                copy_file(entry.path(), &dest, options.preserve_times)?
            };
            log::debug!("copy {} -> {}", entry.path().display(), dest.display());
            summary.copied_files += 1;
            summary.total_bytes += bytes;
        } else {
            log::debug!("skip {} (destination is current)", dest.display());
            summary.skipped_files += 1;
        }
    }
    Ok(())
}
