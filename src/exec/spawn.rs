// src/exec/spawn.rs

//! Spawning of child OS processes from task commands.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::io::AsyncRead;
use tokio::process::Command;
use tracing::{debug, info};

use crate::exec::process::ExternalProcess;
use crate::exec::subst;

/// Why a spawn attempt produced no process.
///
/// The display text of these variants is what callers surface verbatim as the
/// *failure* message of a submission.
#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("command is empty after substitution")]
    EmptyCommand,

    #[error("command is unparseable: {0}")]
    UnparseableCommand(String),

    #[error("working directory does not exist or is not a directory: {0}")]
    BadWorkingDirectory(PathBuf),

    #[error("failed to start process: {0}")]
    SpawnRejected(#[from] std::io::Error),
}

/// Spawns child processes for task definitions.
///
/// Holds the supervisor's invocation directory, which backs the `user.dir`
/// substitution variable for the whole supervisor lifetime.
#[derive(Debug)]
pub struct ProcessSpawner {
    invocation_dir: PathBuf,
}

impl ProcessSpawner {
    pub fn new() -> Self {
        Self {
            invocation_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Substitute variables, validate the working directory, and start the
    /// process. On error no process exists.
    ///
    /// On success the returned handle is already supervised: its exit will be
    /// observed and its stdout/stderr are drained to a null sink.
    pub fn spawn(&self, command: &str, directory: &str) -> Result<ExternalProcess, SpawnError> {
        let vars = subst::substitution_map(&self.invocation_dir);

        let directory = subst::substitute(directory, &vars);
        let workdir = Path::new(&directory);
        if !workdir.is_dir() {
            return Err(SpawnError::BadWorkingDirectory(workdir.to_path_buf()));
        }

        let command = subst::substitute(command, &vars);
        let argv = shlex::split(&command)
            .ok_or_else(|| SpawnError::UnparseableCommand(command.clone()))?;
        let (program, args) = argv.split_first().ok_or(SpawnError::EmptyCommand)?;

        let mut child = Command::new(program)
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // A child whose pipes are not read blocks on a full buffer; pump both
        // streams to a null sink on background tasks.
        drain_to_sink(child.stdout.take());
        drain_to_sink(child.stderr.take());

        info!(pid = ?child.id(), %command, %directory, "started child process");
        Ok(ExternalProcess::supervise(child))
    }
}

impl Default for ProcessSpawner {
    fn default() -> Self {
        Self::new()
    }
}

fn drain_to_sink<R>(stream: Option<R>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    if let Some(mut stream) = stream {
        tokio::spawn(async move {
            let mut sink = tokio::io::sink();
            if let Err(err) = tokio::io::copy(&mut stream, &mut sink).await {
                debug!(error = %err, "output drain ended with error");
            }
        });
    }
}
