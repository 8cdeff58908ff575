//! External command execution utilities.
//!
//! Provides a Builder-based API for the three ways this tool runs programs:
//! in the foreground with the terminal attached (`status`), in the
//! background with output discarded (`spawn`), and stopping a background
//! child (`terminate`).
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! // Foreground, output goes straight to the terminal
//! let status = Cmd::new("git").args(["diff", "--stat"]).cwd(root).status()?;
//!
//! // Background server with stdout/stderr sent to the null device
//! let child = Cmd::from_slice(&["python3", "-m", "http.server", "3000"])
//!     .cwd(root)
//!     .quiet(true)
//!     .spawn()?;
//! ```

use anyhow::{Context, Result};
use std::{
    ffi::{OsStr, OsString},
    io,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
};

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Debug, Clone, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    quiet: bool,
    #[cfg_attr(not(unix), allow(dead_code))]
    own_group: bool,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a command array (e.g., `["git"]` or `["python3", "update.py"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args: Vec<_> = iter.map(|s| s.as_ref().to_owned()).collect();
        Self {
            program,
            args,
            ..Default::default()
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_owned()));
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set environment variables for the subprocess.
    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in vars {
            self.envs.push((k.as_ref().to_owned(), v.as_ref().to_owned()));
        }
        self
    }

    /// Discard the child's stdout and stderr.
    pub fn quiet(mut self, enable: bool) -> Self {
        self.quiet = enable;
        self
    }

    /// Start the child in its own process group (unix only).
    ///
    /// A terminal Ctrl+C then reaches only this process, not the child.
    pub fn own_process_group(mut self, enable: bool) -> Self {
        self.own_group = enable;
        self
    }

    /// Get the program name for messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    /// Whole command line, space separated, for messages.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run in the foreground and wait for the exit status.
    ///
    /// A non-zero status is returned as-is, not as an error: callers decide
    /// what a failed step means.
    pub fn status(self) -> Result<ExitStatus> {
        let name = self.program_name();
        self.command()
            .status()
            .with_context(|| format!("Failed to execute `{name}`"))
    }

    /// Start in the background without waiting.
    pub fn spawn(self) -> Result<Child> {
        let name = self.program_name();
        self.command()
            .spawn()
            .with_context(|| format!("Failed to spawn `{name}`"))
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).envs(self.envs.iter().cloned());

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        if self.quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        #[cfg(unix)]
        if self.own_group {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd
    }
}

/// Create a command from a single program name.
///
/// This is a helper for the `exec!` macro.
#[inline]
pub fn cmd<S: AsRef<OsStr>>(program: S) -> Cmd {
    Cmd::new(program)
}

// ============================================================================
// Process helpers
// ============================================================================

/// Check whether `program` can be started from `cwd`.
///
/// Bare names are searched on `PATH`; names with a path separator are
/// resolved against `cwd`.
pub fn program_exists(program: &str, cwd: &Path) -> bool {
    which::which_in(program, std::env::var_os("PATH"), cwd).is_ok()
}

/// Ask a running child to stop.
///
/// Sends SIGTERM so the child can shut down cleanly. The child is not
/// reaped here.
#[cfg(unix)]
pub fn terminate(child: &mut Child) -> io::Result<()> {
    let pid = libc::pid_t::try_from(child.id())
        .map_err(|_| io::Error::other("child pid out of range"))?;
    // SAFETY: `pid` is our own child and has not been reaped yet, so the
    // id cannot have been reused by another process.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Ask a running child to stop (hard kill; no SIGTERM off unix).
#[cfg(not(unix))]
pub fn terminate(child: &mut Child) -> io::Result<()> {
    child.kill()
}

// ============================================================================
// Macro (syntax sugar for simple cases)
// ============================================================================

/// Run an external command in the foreground and return its `ExitStatus`.
///
/// # Syntax
///
/// ```ignore
/// exec!("git"; "status", "-s")?;
///
/// // With working directory
/// exec!(root; "git"; "add", ".")?;
/// ```
#[macro_export]
macro_rules! exec {
    // root + single cmd
    ($root:expr; $cmd:expr; $($arg:expr),* $(,)?) => {
        $crate::utils::exec::cmd($cmd)
            $(.arg($arg))*
            .cwd($root)
            .status()
    };

    // single cmd only
    ($cmd:expr; $($arg:expr),* $(,)?) => {
        $crate::utils::exec::cmd($cmd)
            $(.arg($arg))*
            .status()
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_builder() {
        let cmd = Cmd::new("echo")
            .arg("hello")
            .args(["world", "!"])
            .cwd("/tmp");

        assert_eq!(cmd.program, OsString::from("echo"));
        assert_eq!(cmd.args.len(), 3);
        assert_eq!(cmd.cwd, Some(PathBuf::from("/tmp")));
        assert!(!cmd.quiet);
    }

    #[test]
    fn test_from_slice_and_display() {
        let cmd = Cmd::from_slice(&["python3", "-m", "http.server", "3000"]);
        assert_eq!(cmd.program_name(), "python3");
        assert_eq!(cmd.display(), "python3 -m http.server 3000");
    }

    #[test]
    fn test_from_empty_slice() {
        let empty: [&str; 0] = [];
        let cmd = Cmd::from_slice(&empty);
        assert_eq!(cmd.program_name(), "");
        assert!(cmd.args.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_status_reports_exit_code() {
        let status = Cmd::from_slice(&["sh", "-c", "exit 3"]).status().unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_macro_uses_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        let status = crate::exec!(dir.path(); "test"; "-f", "marker").unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let err = Cmd::new("definitely-not-a-real-program-xyz").spawn();
        assert!(err.is_err());
        assert!(!program_exists("definitely-not-a-real-program-xyz", Path::new(".")));
    }

    #[cfg(unix)]
    #[test]
    fn test_program_exists_on_path() {
        assert!(program_exists("sh", Path::new("/")));
    }

    #[cfg(unix)]
    #[test]
    fn test_terminate_then_reap() {
        let mut child = Cmd::new("sleep").arg("30").quiet(true).spawn().unwrap();
        terminate(&mut child).unwrap();
        let status = child.wait().unwrap();
        assert!(!status.success());
        assert_eq!(status.code(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_own_process_group() {
        let mut child = Cmd::new("sleep")
            .arg("30")
            .quiet(true)
            .own_process_group(true)
            .spawn()
            .unwrap();
        let pid = child.id() as libc::pid_t;
        // SAFETY: getpgid only reads the group of a live child
        let (group, ours) = unsafe { (libc::getpgid(pid), libc::getpgid(0)) };
        terminate(&mut child).unwrap();
        child.wait().unwrap();

        assert_eq!(group, pid);
        assert_ne!(group, ours);
    }

    #[cfg(unix)]
    #[test]
    fn test_inherits_process_group_by_default() {
        let mut child = Cmd::new("sleep").arg("30").quiet(true).spawn().unwrap();
        let pid = child.id() as libc::pid_t;
        // SAFETY: as above
        let (group, ours) = unsafe { (libc::getpgid(pid), libc::getpgid(0)) };
        terminate(&mut child).unwrap();
        child.wait().unwrap();

        assert_eq!(group, ours);
    }
}
