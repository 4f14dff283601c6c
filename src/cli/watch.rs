// ABOUTME: CLI watch command - stream the checked-out branch until Ctrl-C
//
// Prints the branch once on start, then a line per branch switch.

use anyhow::Result;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::OutputFormat;
use crate::git::{BranchWatcher, Repository};

const CHANNEL_CAPACITY: usize = 16;

/// Run the watcher, printing every delivered branch name
pub async fn execute(repo: Arc<Repository>, format: OutputFormat) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();

    let mut watcher = BranchWatcher::start(Arc::clone(&repo), tx, cancel.clone()).await?;
    info!(root = %repo.root().display(), "Watching for branch changes, press Ctrl-C to stop");

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received");
            interrupt.cancel();
        }
    });

    let mut stdout = io::stdout();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            branch = rx.recv() => match branch {
                Some(branch) => {
                    writeln!(stdout, "{}", render_branch(&branch, format))?;
                    stdout.flush()?;
                }
                None => break,
            },
        }
    }

    watcher.stop().await;
    Ok(())
}

fn render_branch(branch: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => branch.to_string(),
        OutputFormat::Json => serde_json::json!({ "branch": branch }).to_string(),
    }
}
