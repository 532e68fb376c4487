use crate::copy::metadata;
use eyre::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix for temporary files during atomic copy operations.
const PARTIAL_FILE_SUFFIX: &str = ".stage.partial";

const COPY_BUFFER_SIZE: usize = 256 * 1024;

/// Guard that ensures temp files are cleaned up on failure.
/// Deletes the temp file on drop unless `commit()` is called.
struct TempFileGuard {
    temp_path: PathBuf,
    committed: bool,
}

impl TempFileGuard {
    fn new(temp_path: PathBuf) -> Self {
        Self {
            temp_path,
            committed: false,
        }
    }

    /// Atomically rename temp file to final destination.
    fn commit(mut self, final_path: &Path) -> Result<()> {
        // On Windows, rename fails if destination exists, so remove first
        #[cfg(windows)]
        {
            let _ = fs::remove_file(final_path);
        }
        fs::rename(&self.temp_path, final_path).with_context(|| {
            format!(
                "renaming {} to {}",
                self.temp_path.display(),
                final_path.display()
            )
        })?;
        self.committed = true;
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.temp_path
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

fn temp_path_for(dst: &Path) -> PathBuf {
    let mut temp = dst.as_os_str().to_owned();
    temp.push(PARTIAL_FILE_SUFFIX);
    PathBuf::from(temp)
}

/// Copy a single file, optionally carrying over mtime and permissions.
/// Returns the number of bytes copied.
pub fn copy_file(src: &Path, dst: &Path, preserve_times: bool) -> Result<u64> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    let guard = TempFileGuard::new(temp_path_for(dst));

    let result: Result<u64> = (|| {
        let src_file = File::open(src).with_context(|| format!("opening {}", src.display()))?;
        let dst_file = File::create(guard.path())
            .with_context(|| format!("creating {}", guard.path().display()))?;

        let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, src_file);
        let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, dst_file);
        let bytes = io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        drop(writer);

        if preserve_times {
            metadata::preserve_metadata(src, guard.path())?;
        }

        Ok(bytes)
    })();

    match result {
        Ok(bytes) => {
            guard.commit(dst)?;
            Ok(bytes)
        }
        Err(e) => Err(e),
    }
}
