//! Phase A: run the content-update step.
//!
//! The step runs in the foreground from the tool directory with the
//! terminal attached. Its exit status is only acted on with `--strict`;
//! otherwise a failure is reported and the preview still starts.

use crate::{
    config::Settings,
    core::FlowError,
    debug, log,
    utils::exec::program_exists,
};
use anyhow::Result;

/// Run the update step once, blocking until it finishes.
pub fn run_update(settings: &Settings) -> Result<()> {
    if settings.skip_update {
        log!("update"; "skipped");
        return Ok(());
    }

    let cmd = settings.update_command();
    let program = cmd.program_name();
    let display = cmd.display();

    if !program_exists(&program, &settings.paths.script_dir) {
        return on_failure(settings, FlowError::MissingProgram(program));
    }

    log!("update"; "running `{}`", display);
    let status = cmd.status()?;

    if status.success() {
        debug!("update"; "`{}` finished", display);
        Ok(())
    } else {
        on_failure(
            settings,
            FlowError::UpdateFailed {
                command: display,
                status,
            },
        )
    }
}

/// Abort in strict mode; otherwise report and carry on.
fn on_failure(settings: &Settings, err: FlowError) -> Result<()> {
    if settings.strict {
        return Err(err.into());
    }
    log!("update"; "{}, serving current content anyway", err);
    Ok(())
}
