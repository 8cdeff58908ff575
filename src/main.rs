//! Sitepub - refresh site content, preview it locally, then optionally
//! commit and push.

mod cli;
mod config;
mod core;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::Settings;

fn main() {
    if let Err(err) = run() {
        logger::report_error(&err);
        std::process::exit(core::exit_code_of(&err));
    }
}

fn run() -> Result<()> {
    // Ctrl+C outside the serve phase still ends the program immediately
    core::setup_interrupt_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    if !cli.ignored.is_empty() {
        debug!("cli"; "ignoring arguments: {}", cli.ignored.join(" "));
    }

    let settings = Settings::load(&cli)?;
    debug!("config"; "tool dir: {}", settings.paths.script_dir.display());
    debug!("config"; "root: {}", settings.paths.root.display());

    cli::update::run_update(&settings)?;
    cli::serve::serve_preview(&settings)?;

    if settings.push {
        cli::publish::run_publish(&settings)?;
    } else {
        log!("serve"; "rerun with --push to commit and push these changes");
    }
    Ok(())
}
