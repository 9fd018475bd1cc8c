// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod manager;
pub mod outcome;
pub mod registry;
pub mod task;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::manager::{ConsoleObserver, TaskManager, TaskManagerOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - task-list loading
/// - the task manager + watchdog
/// - submission of every listed process
/// - waiting for an ENTER line on stdin (or Ctrl-C)
/// - cleanup: cancelling every registered task
pub async fn run(args: CliArgs) -> Result<()> {
    let list = load_and_validate(&args.input)
        .with_context(|| format!("failed to process task list '{}'", args.input))?;

    let manager = TaskManager::start(Arc::new(ConsoleObserver), TaskManagerOptions::default())?;

    for entry in list.processes() {
        let detail = entry.to_task_detail()?;
        println!("Starting: {}", detail.name());
        let report = manager.submit(detail).await;
        match report.value {
            Some(task_id) => debug!(task_id, name = entry.name, "task submitted"),
            None => println!(
                "Failed to start '{}' (result: {}; message: {})",
                entry.name, report.outcome, report.message
            ),
        }
    }

    wait_for_stop_signal().await?;

    println!("Cleanup Start ...");
    for task_id in manager.all_task_ids() {
        let report = manager.cancel(&task_id).await;
        println!(
            "Cleanup (taskId: {}; result: {}; message: {})",
            task_id, report.outcome, report.message
        );
    }
    println!("Cleanup Done!");

    manager.shutdown().await;
    Ok(())
}

/// Block until the user presses ENTER or the process receives Ctrl-C.
async fn wait_for_stop_signal() -> Result<()> {
    use std::io::Write;

    print!("Press ENTER to stop the application ...");
    std::io::stdout().flush().ok();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tokio::select! {
        line = lines.next_line() => {
            line.context("reading from stdin")?;
            info!("stop requested from stdin");
        }
        res = tokio::signal::ctrl_c() => {
            res.context("listening for Ctrl+C")?;
            println!();
            info!("stop requested via Ctrl+C");
        }
    }
    Ok(())
}
