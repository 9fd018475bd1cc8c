// src/exec/process.rs

//! Handle over one spawned child OS process.
//!
//! The `tokio::process::Child` is owned by a detached supervising task; the
//! [`ExternalProcess`] handles observe it through a `watch` channel that is
//! published exactly once, when the process reaches *finished*. This keeps
//! every query on the handle non-blocking and lock-free, and makes the handle
//! cheap to clone.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::process::Child;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Exit status of a finished process. Stable once published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitOutcome {
    pub code: i32,
    pub message: String,
}

enum TermRequest {
    /// Ask the process to stop (SIGTERM on unix).
    Graceful,
    /// Kill the process outright.
    Forceful,
}

struct ProcessHandle {
    pid: Option<u32>,
    status: watch::Receiver<Option<ExitOutcome>>,
    control: mpsc::Sender<TermRequest>,
    term_requested: AtomicBool,
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // Last handle gone with the child still alive: kill it so abandoned
        // spawns never leak a running process.
        if self.status.borrow().is_none() {
            let _ = self.control.try_send(TermRequest::Forceful);
        }
    }
}

/// Cloneable handle over one spawn of an OS process.
#[derive(Clone)]
pub struct ExternalProcess {
    inner: Arc<ProcessHandle>,
}

impl std::fmt::Debug for ExternalProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalProcess")
            .field("pid", &self.inner.pid)
            .field("finished", &self.is_finished())
            .finish()
    }
}

impl ExternalProcess {
    /// Take ownership of a freshly spawned child and start supervising it.
    pub(crate) fn supervise(child: Child) -> Self {
        let pid = child.id();
        let (status_tx, status_rx) = watch::channel(None);
        let (control_tx, control_rx) = mpsc::channel(4);

        tokio::spawn(supervise_child(child, status_tx, control_rx));

        Self {
            inner: Arc::new(ProcessHandle {
                pid,
                status: status_rx,
                control: control_tx,
                term_requested: AtomicBool::new(false),
            }),
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.inner.pid
    }

    /// True iff the OS process has exited (normally or due to destroy).
    pub fn is_finished(&self) -> bool {
        self.inner.status.borrow().is_some()
    }

    pub fn is_running(&self) -> bool {
        !self.is_finished()
    }

    /// Request termination. Non-blocking, infallible, idempotent once the
    /// process is finished.
    ///
    /// The first call asks for graceful termination; any later call while the
    /// process is still alive escalates to a forceful kill. A child that
    /// traps the graceful signal is therefore stopped by a retried destroy.
    pub fn destroy(&self) {
        if self.is_finished() {
            return;
        }
        let request = if self.inner.term_requested.swap(true, Ordering::SeqCst) {
            TermRequest::Forceful
        } else {
            TermRequest::Graceful
        };
        let _ = self.inner.control.try_send(request);
    }

    /// Wait until *finished* or until `budget` elapses. A zero budget means
    /// "no wait". Returns `is_finished()` at the moment of return.
    pub async fn wait_for(&self, budget: Duration) -> bool {
        if budget.is_zero() {
            return self.is_finished();
        }
        let mut status = self.inner.status.clone();
        let _ = tokio::time::timeout(budget, status.wait_for(|s| s.is_some())).await;
        self.is_finished()
    }

    /// Wait until *finished*, with no deadline.
    pub async fn wait_forever(&self) {
        let mut status = self.inner.status.clone();
        let _ = status.wait_for(|s| s.is_some()).await;
    }

    /// Exit status; `Some` exactly from the moment the process is finished.
    pub fn exit_outcome(&self) -> Option<ExitOutcome> {
        self.inner.status.borrow().clone()
    }
}

async fn supervise_child(
    mut child: Child,
    status_tx: watch::Sender<Option<ExitOutcome>>,
    mut control_rx: mpsc::Receiver<TermRequest>,
) {
    let pid = child.id();
    let outcome = loop {
        tokio::select! {
            res = child.wait() => break exit_outcome_of(res),
            request = control_rx.recv() => match request {
                Some(TermRequest::Graceful) => {
                    debug!(?pid, "requesting graceful termination");
                    request_graceful_stop(&mut child);
                }
                Some(TermRequest::Forceful) => {
                    debug!(?pid, "killing child process");
                    if let Err(err) = child.start_kill() {
                        warn!(?pid, error = %err, "failed to kill child process");
                    }
                }
                None => {
                    // Every handle was dropped; reap the orphan.
                    let _ = child.start_kill();
                    break exit_outcome_of(child.wait().await);
                }
            },
        }
    };
    debug!(?pid, code = outcome.code, "child process finished");
    let _ = status_tx.send(Some(outcome));
}

fn exit_outcome_of(res: std::io::Result<std::process::ExitStatus>) -> ExitOutcome {
    match res {
        Ok(status) => match status.code() {
            Some(code) => ExitOutcome {
                code,
                message: format!("process exited with code {code}"),
            },
            None => ExitOutcome {
                code: -1,
                message: signal_message(status),
            },
        },
        Err(err) => ExitOutcome {
            code: -1,
            message: format!("failed to collect exit status: {err}"),
        },
    }
}

#[cfg(unix)]
fn signal_message(status: std::process::ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => format!("process terminated by signal {signal}"),
        None => "process terminated without exit code".to_string(),
    }
}

#[cfg(not(unix))]
fn signal_message(_status: std::process::ExitStatus) -> String {
    "process terminated without exit code".to_string()
}

#[cfg(unix)]
fn request_graceful_stop(child: &mut Child) {
    match child.id() {
        Some(pid) => {
            // SIGTERM; a later Forceful request falls back to SIGKILL.
            let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
            if rc != 0 {
                warn!(pid, "failed to deliver SIGTERM");
            }
        }
        None => debug!("graceful stop requested for already-reaped child"),
    }
}

#[cfg(not(unix))]
fn request_graceful_stop(child: &mut Child) {
    // No portable graceful signal; fall through to a kill.
    let _ = child.start_kill();
}
