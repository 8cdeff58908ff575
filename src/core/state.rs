//! Interrupt routing.
//!
//! A single Ctrl+C handler is installed at program start. Its effect depends
//! on whether a route is registered:
//! - No route: exit immediately with [`INTERRUPTED_EXIT_CODE`]
//! - Route registered (preview server running): send a cancellation token to
//!   the serve loop and keep the process alive

use crossbeam::channel::Sender;
use parking_lot::Mutex;
use std::sync::LazyLock;

/// Exit status for an interrupt outside the serve phase (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Cancellation sender of the running serve loop, if any
static CANCEL_TX: LazyLock<Mutex<Option<Sender<()>>>> = LazyLock::new(|| Mutex::new(None));

/// Setup the global Ctrl+C handler. Call once at program start
pub fn setup_interrupt_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(on_interrupt)
        .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

fn on_interrupt() {
    let slot = CANCEL_TX.lock();
    match slot.as_ref() {
        // Full channel: a token is already pending, drop this one
        Some(tx) => {
            let _ = tx.try_send(());
        }
        None => std::process::exit(INTERRUPTED_EXIT_CODE),
    }
}

/// Route interrupts to `tx` until the returned guard is dropped.
pub fn route_interrupts(tx: Sender<()>) -> InterruptRoute {
    *CANCEL_TX.lock() = Some(tx);
    InterruptRoute { _private: () }
}

/// Restores default interrupt behavior when dropped.
#[must_use = "interrupts fall back to default behavior as soon as the route is dropped"]
pub struct InterruptRoute {
    _private: (),
}

impl Drop for InterruptRoute {
    fn drop(&mut self) {
        CANCEL_TX.lock().take();
    }
}
