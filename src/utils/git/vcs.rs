use crate::exec;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Version-control operations the publish phase needs.
///
/// Each call runs to completion and hands back the exit status untouched;
/// the caller decides what a failure means.
pub trait Vcs {
    /// Print a summary of working-tree changes (`diff --stat`).
    fn diff_stat(&mut self) -> Result<ExitStatus>;
    /// Stage everything under the root (`add .`).
    fn add_all(&mut self) -> Result<ExitStatus>;
    /// Record staged changes (`commit -m <message>`).
    fn commit(&mut self, message: &str) -> Result<ExitStatus>;
    /// Push to the configured upstream (`push`).
    fn push(&mut self) -> Result<ExitStatus>;
}

/// [`Vcs`] backed by the `git` command-line client, run from the project root.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl Vcs for GitCli {
    fn diff_stat(&mut self) -> Result<ExitStatus> {
        exec!(&self.root; "git"; "diff", "--stat")
    }

    fn add_all(&mut self) -> Result<ExitStatus> {
        exec!(&self.root; "git"; "add", ".")
    }

    fn commit(&mut self, message: &str) -> Result<ExitStatus> {
        exec!(&self.root; "git"; "commit", "-m", message)
    }

    fn push(&mut self) -> Result<ExitStatus> {
        exec!(&self.root; "git"; "push")
    }
}
