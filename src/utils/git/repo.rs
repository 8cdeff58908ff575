use crate::core::FlowError;
use std::path::{Path, PathBuf};

/// What the publish header shows about the repository.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// The directory the search started from
    pub root: PathBuf,
    /// Short name of the checked-out branch (`None` when HEAD is detached)
    pub branch: Option<String>,
}

/// Find the repository containing `root`, walking up parent directories.
pub fn discover_repo(root: &Path) -> Result<RepoInfo, FlowError> {
    let repo = gix::discover(root).map_err(|_| FlowError::NotARepository(root.to_path_buf()))?;

    let branch = repo
        .head_name()
        .ok()
        .flatten()
        .map(|name| name.shorten().to_string());

    Ok(RepoInfo {
        root: root.to_path_buf(),
        branch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_plain_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A temp dir nested in someone's checkout would be found; skip then
        if gix::discover(dir.path()).is_ok() {
            return;
        }

        let err = discover_repo(dir.path()).unwrap_err();
        assert!(matches!(err, FlowError::NotARepository(ref p) if p == dir.path()));
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        gix::init(dir.path()).unwrap();
        let nested = dir.path().join("assets").join("img");
        std::fs::create_dir_all(&nested).unwrap();

        let info = discover_repo(&nested).unwrap();
        assert_eq!(info.root, nested);
    }
}
