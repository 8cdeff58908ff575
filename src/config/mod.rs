//! Run settings, resolved once from the command line.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── paths.rs   # ToolPaths: tool directory and project root
//! └── mod.rs     # Settings (this file)
//! ```
//!
//! There is no settings file. Every value comes from a flag or its default,
//! and the resulting [`Settings`] is passed by reference to each phase.
//!
//! | Setting       | Flag             | Default                                      |
//! |---------------|------------------|----------------------------------------------|
//! | project root  | `--root`         | parent of the directory holding the binary   |
//! | update step   | `--update-cmd`   | `python3 update-reading.py`                  |
//! | preview server| `--server-cmd`   | `python3 -m http.server {port} --bind {interface}` |
//! | port          | `--port`         | `3000`                                       |
//! | interface     | `--interface`    | `0.0.0.0`                                    |

mod paths;

pub use paths::ToolPaths;

use crate::cli::Cli;
use crate::utils::exec::Cmd;
use anyhow::{Context, Result, bail};
use std::net::IpAddr;

/// Preview server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Preview server bind address (all interfaces).
pub const DEFAULT_INTERFACE: &str = "0.0.0.0";

/// Content-update step, run from the tool directory.
pub const DEFAULT_UPDATE_CMD: &str = "python3 update-reading.py";

/// Static file server, run from the project root.
pub const DEFAULT_SERVER_CMD: &str = "python3 -m http.server {port} --bind {interface}";

// ============================================================================
// Settings
// ============================================================================

/// Everything a run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: ToolPaths,

    /// Update step argv
    pub update: Vec<String>,

    /// Server argv with `{port}` and `{interface}` filled in
    pub server: Vec<String>,

    pub interface: IpAddr,
    pub port: u16,

    /// Run the publish phase after the server stops
    pub push: bool,

    /// Skip the update step entirely
    pub skip_update: bool,

    /// Abort when the update step fails instead of serving anyway
    pub strict: bool,
}

impl Settings {
    /// Resolve settings for this process.
    ///
    /// Paths come from the location of the running binary, so the result
    /// does not depend on the current directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let exe = std::env::current_exe().context("failed to locate the running executable")?;
        let paths = ToolPaths::from_exe(&exe)?;
        let paths = match &cli.root {
            Some(root) => paths.with_root(root)?,
            None => paths,
        };
        Self::from_parts(cli, paths)
    }

    /// Combine parsed flags with already resolved paths.
    pub fn from_parts(cli: &Cli, paths: ToolPaths) -> Result<Self> {
        let update = split_command(&cli.update_cmd);
        if update.is_empty() {
            bail!("--update-cmd must name a program");
        }

        let server = fill_placeholders(&split_command(&cli.server_cmd), cli.port, cli.interface);
        if server.is_empty() {
            bail!("--server-cmd must name a program");
        }

        Ok(Self {
            paths,
            update,
            server,
            interface: cli.interface,
            port: cli.port,
            push: cli.push,
            skip_update: cli.skip_update,
            strict: cli.strict,
        })
    }

    /// The update step, ready to run from the tool directory.
    pub fn update_command(&self) -> Cmd {
        Cmd::from_slice(&self.update)
            .cwd(&self.paths.script_dir)
            .envs(self.env_vars())
    }

    /// The preview server, ready to spawn from the project root with its
    /// output discarded.
    ///
    /// It gets its own process group so Ctrl+C is handled by the serve loop
    /// alone, which then terminates the server.
    pub fn server_command(&self) -> Cmd {
        Cmd::from_slice(&self.server)
            .cwd(&self.paths.root)
            .envs(self.env_vars())
            .quiet(true)
            .own_process_group(true)
    }

    /// Address to print for the operator.
    pub fn server_url(&self) -> String {
        let host = if self.interface.is_unspecified() || self.interface.is_loopback() {
            "localhost".to_string()
        } else {
            self.interface.to_string()
        };
        format!("http://{host}:{}/", self.port)
    }

    /// `$SITEPUB_*` variables handed to both child programs.
    fn env_vars(&self) -> [(&'static str, String); 3] {
        [
            ("SITEPUB_ROOT", self.paths.root.display().to_string()),
            ("SITEPUB_SCRIPT_DIR", self.paths.script_dir.display().to_string()),
            ("SITEPUB_PORT", self.port.to_string()),
        ]
    }
}

// ============================================================================
// Command Line Helpers
// ============================================================================

/// Split a command line on whitespace.
///
/// No quoting rules: arguments containing spaces belong in a wrapper script.
pub fn split_command(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Replace `{port}` and `{interface}` in every argument.
pub fn fill_placeholders(args: &[String], port: u16, interface: IpAddr) -> Vec<String> {
    let port = port.to_string();
    let interface = interface.to_string();
    args.iter()
        .map(|arg| {
            arg.replace("{port}", &port)
                .replace("{interface}", &interface)
        })
        .collect()
}

/// Settings rooted at `dir` (tool directory `dir/scripts`) from the given flags.
#[cfg(test)]
pub fn test_settings(dir: &std::path::Path, args: &[&str]) -> Settings {
    use clap::Parser;

    let cli = Cli::parse_from(std::iter::once("sitepub").chain(args.iter().copied()));
    let paths = ToolPaths {
        script_dir: dir.join("scripts"),
        root: dir.to_path_buf(),
    };
    Settings::from_parts(&cli, paths).unwrap()
}
