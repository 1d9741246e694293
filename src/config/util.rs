//! Configuration path helpers.

use std::path::{Path, PathBuf};

/// Find the config file by searching upward from `start`.
///
/// An absolute `config_name` is returned as-is when it exists.
///
/// ```text
/// /home/user/site/sections/   ← start
/// /home/user/site/vise.toml   ← found
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Expand `~` and resolve a relative path against `root`.
pub fn expand_path(path: &Path, root: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = PathBuf::from(shellexpand::tilde(&raw).into_owned());
    if expanded.is_relative() {
        root.join(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("vise.toml"), "").unwrap();

        let found = find_config_file(&nested, Path::new("vise.toml")).unwrap();
        assert_eq!(found, dir.path().join("vise.toml"));
    }

    #[test]
    fn test_find_config_missing() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file(dir.path(), Path::new("no-such-vise-config.toml")).is_none());
    }

    #[test]
    fn test_expand_relative() {
        let root = Path::new("/srv/site");
        assert_eq!(
            expand_path(Path::new("sections"), root),
            PathBuf::from("/srv/site/sections")
        );
        assert_eq!(expand_path(Path::new("/abs"), root), PathBuf::from("/abs"));
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_path(Path::new("~/sections"), Path::new("/srv"));
        assert!(!expanded.to_string_lossy().contains('~'));
    }
}
