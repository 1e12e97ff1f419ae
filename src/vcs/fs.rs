//! Filesystem staging for working trees.

use crate::debug;
use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use std::{fs, path::Path};

const GIT_DIR: &str = ".git";

/// Recursively copy the contents of `src` into `dst`.
///
/// Dotfiles are copied (`.nojekyll`, `.well-known/`), a `.git` directory
/// inside `src` is not. Symlinks to files are copied as files; symlinks to
/// directories are skipped.
///
/// Returns the number of files copied.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_dir() {
        bail!("source directory not found: {}", src.display());
    }
    fs::create_dir_all(dst).with_context(|| format!("Failed to create {}", dst.display()))?;

    let mut count = 0;
    for entry in WalkDir::new(src).skip_hidden(false).sort(true) {
        let entry = entry?;
        let path = entry.path();
        let relative = path.strip_prefix(src)?;

        if relative.as_os_str().is_empty() || is_in_git_dir(relative) {
            continue;
        }

        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&path, &target)
                .with_context(|| format!("Failed to copy {}", path.display()))?;
            count += 1;
        } else {
            debug!("copy"; "skipping {}", path.display());
        }
    }

    Ok(count)
}

/// Remove everything inside `dir` except a top-level `.git` directory.
///
/// `dir` itself is kept (created if missing).
pub fn clear_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name() == GIT_DIR {
            continue;
        }
        let path = entry.path();
        let removed = if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.with_context(|| format!("Failed to delete {}", path.display()))?;
    }

    Ok(())
}

fn is_in_git_dir(relative: &Path) -> bool {
    relative.components().any(|c| c.as_os_str() == GIT_DIR)
}
