//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `expand_path` - tilde expansion + root-relative resolution
//! - `is_plain_component` - checks a directory name is safe to join

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand `~` and resolve a relative path against `root`.
///
/// # Example
/// ```ignore
/// expand_path(Path::new("~/.github-token"), root) // -> /home/user/.github-token
/// expand_path(Path::new("public"), root)          // -> <root>/public
/// ```
pub fn expand_path(path: &Path, root: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    let full_path = if path.is_relative() {
        root.join(&path)
    } else {
        path
    };
    normalize_path(&full_path)
}

/// Whether `name` is exactly one ordinary path component.
///
/// Rejects empty names, separators, `.`/`..`, absolute paths and `.git`,
/// so the name can be joined onto a working tree without escaping it.
pub fn is_plain_component(name: &str) -> bool {
    if name.trim().is_empty() || name == ".git" {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_expand_path_relative_to_root() {
        let expanded = expand_path(Path::new("public"), Path::new("/site/root"));
        assert_eq!(expanded, PathBuf::from("/site/root/public"));
    }

    #[test]
    fn test_expand_path_absolute_kept() {
        let expanded = expand_path(Path::new("/etc/token"), Path::new("/site/root"));
        assert_eq!(expanded, PathBuf::from("/etc/token"));
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path(Path::new("~/.github-token"), Path::new("/site/root"));
        assert!(!expanded.starts_with("/site/root"));
        assert!(expanded.ends_with(".github-token"));
    }

    #[test]
    fn test_is_plain_component() {
        assert!(is_plain_component("1.0"));
        assert!(is_plain_component("latest"));
        assert!(is_plain_component("v2.3.1-beta"));

        assert!(!is_plain_component(""));
        assert!(!is_plain_component("   "));
        assert!(!is_plain_component("."));
        assert!(!is_plain_component(".."));
        assert!(!is_plain_component(".git"));
        assert!(!is_plain_component("a/b"));
        assert!(!is_plain_component("/abs"));
        assert!(!is_plain_component("a\\b"));
    }
}
