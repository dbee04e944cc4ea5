use std::{fs, path::Path};

use walkdir::WalkDir;

use crate::error::{BuildError, Result};

/// Copies every file under `src` into `dst`, keeping relative paths and
/// permission bits. Returns the number of files copied.
///
/// A missing `src` copies nothing. Errors stop the copy; whatever was already
/// written stays on disk.
pub fn mirror(src: &Path, dst: &Path) -> Result<usize> {
    if !src.exists() {
        tracing::debug!("no static directory at {}, skipping", src.display());
        return Ok(0);
    }

    let fail = |source| BuildError::Assets {
        path: dst.to_path_buf(),
        source,
    };

    let mut copied = 0;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| fail(e.into()))?;

        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(fail)?;
            continue;
        }

        // fs::copy carries the permission bits over
        fs::copy(entry.path(), &target).map_err(fail)?;

        tracing::debug!("copied {}", relative.display());
        copied += 1;
    }

    Ok(copied)
}
