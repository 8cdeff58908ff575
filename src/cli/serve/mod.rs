//! Phase B: run the external preview server until it exits or is interrupted.
//!
//! The server is a child process with its output discarded. While it runs,
//! Ctrl+C is routed to this module instead of ending the program: the child
//! is terminated and reaped, "Server stopped." is printed, and the run
//! carries on to the publish phase. Default interrupt behavior is restored
//! once the child is gone.

mod lifecycle;

pub use lifecycle::Stopped;

use lifecycle::{ServerGuard, wait_for_exit};

use crate::{
    config::Settings,
    core::{FlowError, route_interrupts},
    debug, log,
    utils::exec::program_exists,
};
use anyhow::Result;
use crossbeam::channel;

/// Start the preview server and block until it is gone.
pub fn serve_preview(settings: &Settings) -> Result<Stopped> {
    let cmd = settings.server_command();
    let program = cmd.program_name();
    if !program_exists(&program, &settings.paths.root) {
        return Err(FlowError::MissingProgram(program).into());
    }

    debug!("serve"; "starting `{}` in {}", cmd.display(), settings.paths.root.display());
    let mut server = ServerGuard::new(cmd.spawn()?);
    debug!("serve"; "server pid {}", server.id());

    // One slot: repeated Ctrl+C while a token is pending collapses into one
    let (cancel_tx, cancel_rx) = channel::bounded(1);
    let route = route_interrupts(cancel_tx);

    log!("serve"; "{} at {} (press Ctrl+C to stop)",
        settings.paths.root.display(), settings.server_url());

    let stopped = wait_for_exit(&mut server, &cancel_rx);
    drop(route);
    let stopped = stopped?;

    match stopped {
        Stopped::Cancelled(_) => {
            println!();
            println!("Server stopped.");
        }
        Stopped::Exited(status) => {
            log!("serve"; "server exited on its own ({})", status);
        }
    }
    Ok(stopped)
}
