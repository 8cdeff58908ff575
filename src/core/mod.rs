//! Core types shared by every phase: failure kinds and interrupt routing.

mod error;
mod state;

pub use error::{FlowError, exit_code_of};
pub use state::{route_interrupts, setup_interrupt_handler};
