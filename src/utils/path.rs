//! Filesystem path helpers for config-relative paths.

use std::path::{Path, PathBuf};

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
/// resolve_config_path(Path::new("~/posts.json"), root)   // -> /home/me/posts.json
/// resolve_config_path(Path::new("data/posts.json"), root) // -> {root}/data/posts.json
/// ```
pub fn resolve_config_path(path: &Path, root: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(path.to_str().unwrap_or_default()).into_owned();
    let path = PathBuf::from(expanded);
    let full_path = if path.is_relative() {
        root.join(&path)
    } else {
        path
    };
    normalize_path(&full_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.txt"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_resolve_config_path_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("posts.json");
        std::fs::write(&file, "[]").unwrap();

        let resolved = resolve_config_path(Path::new("posts.json"), dir.path());
        assert_eq!(resolved, normalize_path(&file));
    }

    #[test]
    fn test_resolve_config_path_absolute_untouched() {
        let resolved = resolve_config_path(Path::new("/no/such/file.json"), Path::new("/root"));
        assert_eq!(resolved, PathBuf::from("/no/such/file.json"));
    }

    #[test]
    fn test_resolve_config_path_expands_tilde() {
        if std::env::var_os("HOME").is_none() {
            return;
        }
        let resolved = resolve_config_path(Path::new("~/posts.json"), Path::new("/root"));
        assert!(!resolved.to_string_lossy().contains('~'));
        assert!(resolved.is_absolute());
    }
}
