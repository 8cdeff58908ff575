//! Tool directory and project root resolution.

use crate::utils::path::{expand_path, normalize_path};
use anyhow::{Result, anyhow, bail};
use std::path::{Path, PathBuf};

/// Where the tool lives and which tree it serves.
///
/// ```text
/// /home/user/site/                ← root
/// /home/user/site/scripts/        ← script_dir
/// /home/user/site/scripts/sitepub ← the binary
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Directory holding the binary; the update step runs here
    pub script_dir: PathBuf,
    /// Parent of `script_dir`; served and committed
    pub root: PathBuf,
}

impl ToolPaths {
    /// Derive both directories from the binary's own path.
    ///
    /// Symlinks are resolved first, so a symlinked binary still finds the
    /// site it was installed into.
    pub fn from_exe(exe: &Path) -> Result<Self> {
        let exe = normalize_path(exe);
        let script_dir = exe
            .parent()
            .ok_or_else(|| anyhow!("`{}` has no parent directory", exe.display()))?
            .to_path_buf();

        // `dirname /` is `/`
        let root = script_dir
            .parent()
            .map_or_else(|| script_dir.clone(), Path::to_path_buf);

        Ok(Self { script_dir, root })
    }

    /// Replace the project root with a user supplied directory.
    pub fn with_root(self, root: &Path) -> Result<Self> {
        let root = expand_path(root);
        if !root.is_dir() {
            bail!("project root `{}` is not a directory", root.display());
        }
        Ok(Self { root, ..self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site_with_tool() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let scripts = dir.path().join("scripts");
        fs::create_dir(&scripts).unwrap();
        let exe = scripts.join("sitepub");
        fs::write(&exe, "").unwrap();
        (dir, exe)
    }

    #[test]
    fn test_root_is_parent_of_tool_dir() {
        let (dir, exe) = site_with_tool();
        let paths = ToolPaths::from_exe(&exe).unwrap();

        let site = dir.path().canonicalize().unwrap();
        assert_eq!(paths.script_dir, site.join("scripts"));
        assert_eq!(paths.root, site);
    }

    #[test]
    fn test_resolution_ignores_current_directory() {
        let (_dir, exe) = site_with_tool();
        let first = ToolPaths::from_exe(&exe).unwrap();

        // Same binary path, different dotted spelling
        let dotted = exe
            .parent()
            .unwrap()
            .join("..")
            .join("scripts")
            .join("sitepub");
        assert_eq!(ToolPaths::from_exe(&dotted).unwrap(), first);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_binary_resolves_to_target() {
        let (dir, exe) = site_with_tool();
        let elsewhere = tempfile::tempdir().unwrap();
        let link = elsewhere.path().join("sitepub");
        std::os::unix::fs::symlink(&exe, &link).unwrap();

        let paths = ToolPaths::from_exe(&link).unwrap();
        assert_eq!(paths.root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_filesystem_root_is_its_own_parent() {
        let paths = ToolPaths::from_exe(Path::new("/sitepub-not-here")).unwrap();
        assert_eq!(paths.script_dir, Path::new("/"));
        assert_eq!(paths.root, Path::new("/"));
    }

    #[test]
    fn test_with_root_override() {
        let (dir, exe) = site_with_tool();
        let other = tempfile::tempdir().unwrap();

        let paths = ToolPaths::from_exe(&exe)
            .unwrap()
            .with_root(other.path())
            .unwrap();
        assert_eq!(paths.root, other.path().canonicalize().unwrap());
        assert_eq!(
            paths.script_dir,
            dir.path().canonicalize().unwrap().join("scripts")
        );
    }

    #[test]
    fn test_with_root_rejects_missing_directory() {
        let (dir, exe) = site_with_tool();
        let missing = dir.path().join("nope");
        assert!(
            ToolPaths::from_exe(&exe)
                .unwrap()
                .with_root(&missing)
                .is_err()
        );
    }
}
