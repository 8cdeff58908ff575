//! Server lifecycle management.

use crate::utils::exec::terminate;
use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, RecvTimeoutError};
use std::{
    io,
    process::{Child, ExitStatus},
    time::Duration,
};

/// How often the child is checked for a natural exit while waiting.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Why the serve loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stopped {
    /// The server exited by itself
    Exited(ExitStatus),
    /// A cancellation token arrived and the server was terminated
    Cancelled(ExitStatus),
}

/// Owns the server process and reaps it exactly once.
///
/// If dropped before the child was reaped (error or panic on the way out),
/// the child is terminated and reaped so no server is left holding the port.
pub struct ServerGuard {
    child: Child,
    status: Option<ExitStatus>,
}

impl ServerGuard {
    pub fn new(child: Child) -> Self {
        Self {
            child,
            status: None,
        }
    }

    /// Process id of the server.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Reap the child if it has already exited, without blocking.
    pub fn poll(&mut self) -> io::Result<Option<ExitStatus>> {
        if self.status.is_none() {
            self.status = self.child.try_wait()?;
        }
        Ok(self.status)
    }

    /// Block until the child exits on its own.
    pub fn wait(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.status {
            return Ok(status);
        }
        let status = self.child.wait()?;
        self.status = Some(status);
        Ok(status)
    }

    /// Terminate the child and reap it.
    ///
    /// Once reaped, later calls return the recorded status and send nothing.
    pub fn stop(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.status {
            return Ok(status);
        }
        // An exited but unreaped child still accepts the signal
        terminate(&mut self.child)?;
        self.wait()
    }
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        if self.status.is_none() {
            let _ = self.stop();
        }
    }
}

/// Wait until the server exits or a cancellation token arrives.
///
/// `Child::wait` retries on EINTR, so a signal landing mid-wait is not an
/// error. If every sender is gone the wait degrades to a plain blocking wait.
pub fn wait_for_exit(server: &mut ServerGuard, cancel: &Receiver<()>) -> Result<Stopped> {
    loop {
        if let Some(status) = server.poll().context("failed to check the preview server")? {
            // A pending token means the stop was requested
            if cancel.try_recv().is_ok() {
                return Ok(Stopped::Cancelled(status));
            }
            return Ok(Stopped::Exited(status));
        }

        match cancel.recv_timeout(POLL_INTERVAL) {
            Ok(()) => {
                let status = server.stop().context("failed to stop the preview server")?;
                return Ok(Stopped::Cancelled(status));
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                let status = server.wait().context("failed to wait for the preview server")?;
                return Ok(Stopped::Exited(status));
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::utils::exec::Cmd;
    use crossbeam::channel;

    fn spawn(args: &[&str]) -> ServerGuard {
        ServerGuard::new(Cmd::from_slice(args).quiet(true).spawn().unwrap())
    }

    fn is_alive(pid: u32) -> bool {
        // SAFETY: signal 0 only checks whether the process exists
        unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
    }

    #[test]
    fn test_natural_exit() {
        let mut server = spawn(&["sh", "-c", "exit 0"]);
        let (_tx, rx) = channel::bounded(1);

        let stopped = wait_for_exit(&mut server, &rx).unwrap();
        assert!(matches!(stopped, Stopped::Exited(status) if status.success()));
    }

    #[test]
    fn test_cancellation_terminates_and_reaps() {
        let mut server = spawn(&["sleep", "30"]);
        let pid = server.id();
        let (tx, rx) = channel::bounded(1);
        tx.send(()).unwrap();

        let stopped = wait_for_exit(&mut server, &rx).unwrap();
        let Stopped::Cancelled(status) = stopped else {
            panic!("expected cancellation, got {stopped:?}");
        };
        assert_eq!(status.code(), None);
        assert!(!is_alive(pid));
    }

    #[test]
    fn test_exit_with_pending_cancellation_counts_as_cancelled() {
        use std::os::unix::process::ExitStatusExt;

        let mut server = spawn(&["sleep", "30"]);
        let pid = server.id();
        let (tx, rx) = channel::bounded(1);

        // The server dies from the same Ctrl+C before the token is consumed
        // SAFETY: plain signal to our own child
        unsafe { libc::kill(pid as libc::pid_t, libc::SIGINT) };
        while server.poll().unwrap().is_none() {
            std::thread::sleep(Duration::from_millis(10));
        }
        tx.send(()).unwrap();

        let stopped = wait_for_exit(&mut server, &rx).unwrap();
        let Stopped::Cancelled(status) = stopped else {
            panic!("expected cancellation, got {stopped:?}");
        };
        assert_eq!(status.signal(), Some(libc::SIGINT));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_second_stop_is_a_no_op() {
        let mut server = spawn(&["sleep", "30"]);
        let first = server.stop().unwrap();
        let second = server.stop().unwrap();
        assert_eq!(first, second);
        assert_eq!(server.poll().unwrap(), Some(first));
    }

    #[test]
    fn test_extra_cancellation_after_reap_is_harmless() {
        let mut server = spawn(&["sleep", "30"]);
        let (tx, rx) = channel::bounded(1);
        tx.send(()).unwrap();
        wait_for_exit(&mut server, &rx).unwrap();

        // A late Ctrl+C finds the slot free and nobody waiting
        assert!(tx.try_send(()).is_ok());
        assert!(tx.try_send(()).is_err());
        assert!(server.stop().is_ok());
    }

    #[test]
    fn test_disconnected_channel_falls_back_to_wait() {
        let mut server = spawn(&["sh", "-c", "sleep 0.2; exit 3"]);
        let (tx, rx) = channel::bounded::<()>(1);
        drop(tx);

        let stopped = wait_for_exit(&mut server, &rx).unwrap();
        assert!(matches!(stopped, Stopped::Exited(status) if status.code() == Some(3)));
    }

    #[test]
    fn test_drop_stops_running_server() {
        let server = spawn(&["sleep", "30"]);
        let pid = server.id();
        drop(server);
        assert!(!is_alive(pid));
    }
}
