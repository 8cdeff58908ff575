//! Command-line interface definitions.

use crate::config::{DEFAULT_INTERFACE, DEFAULT_PORT, DEFAULT_SERVER_CMD, DEFAULT_UPDATE_CMD};
use clap::{ColorChoice, Parser};
use std::{net::IpAddr, path::PathBuf};

/// Refresh site content, preview it locally, and optionally commit and push
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Commit and push changes after the preview server stops
    #[arg(long)]
    pub push: bool,

    /// Port number for the preview server
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long, default_value = DEFAULT_INTERFACE)]
    pub interface: IpAddr,

    /// Project root to serve and publish (default: parent of the binary's directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Content-update command, run from the binary's directory
    #[arg(long, default_value = DEFAULT_UPDATE_CMD, value_name = "CMD")]
    pub update_cmd: String,

    /// Static server command, run from the project root.
    ///
    /// `{port}` and `{interface}` are replaced with the values above.
    #[arg(long, default_value = DEFAULT_SERVER_CMD, value_name = "CMD")]
    pub server_cmd: String,

    /// Skip the content-update step
    #[arg(long)]
    pub skip_update: bool,

    /// Stop when the content-update step fails instead of serving anyway
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Anything unrecognised from here on is accepted and ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub ignored: Vec<String>,
}
