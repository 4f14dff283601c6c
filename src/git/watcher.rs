// ABOUTME: Background task that reports the checked-out branch and every later change to it
// ABOUTME: Debounces bursts of .git writes and stops on cancellation or subscription close

//! Branch watcher.
//!
//! The watcher moves through three states:
//!
//! ```text
//!  starting ──(branch read, first value sent, .git subscribed)──▶ watching
//!  watching ──(cancelled | event source closed | receiver dropped)──▶ stopped
//! ```
//!
//! Setup problems in `starting` are returned from [`BranchWatcher::start`].
//! While `watching`, a write under `.git` triggers a drain of any queued
//! events, a short settle delay and a single re-read of the branch. A value is
//! only sent when it differs from the last one delivered.
//!
//! # Usage
//!
//! ```ignore
//! let (tx, mut rx) = tokio::sync::mpsc::channel(16);
//! let cancel = CancellationToken::new();
//! let mut watcher = BranchWatcher::start(Arc::clone(&repo), tx, cancel.clone()).await?;
//!
//! while let Some(branch) = rx.recv().await {
//!     println!("on {branch}");
//! }
//!
//! watcher.stop().await;
//! ```

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::repository::{RepoError, Repository};

type EventResult = notify::Result<Event>;

/// Handle to a running branch watcher task
pub struct BranchWatcher {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl BranchWatcher {
    /// Read the current branch, deliver it on `notify`, subscribe to `.git`
    /// and spawn the watch loop.
    ///
    /// The task stops when `cancel` (or this handle) is cancelled, when the
    /// filesystem subscription closes, or when the receiver is dropped.
    pub async fn start(
        repo: Arc<Repository>,
        notify: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<Self, RepoError> {
        let branch = read_branch(&repo).await?;
        notify
            .send(branch.clone())
            .await
            .map_err(|_| RepoError::NotifyClosed)?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |result: EventResult| {
                // The loop may already have exited; nothing left to tell
                let _ = events_tx.send(result);
            },
            Config::default(),
        )?;

        let git_dir = repo.git_dir();
        watcher.watch(&git_dir, RecursiveMode::NonRecursive)?;
        info!(git_dir = %git_dir.display(), branch = %branch, "Branch watcher started");

        let cancel = cancel.child_token();
        let handle = tokio::spawn(watch_loop(
            repo,
            watcher,
            branch,
            events_rx,
            notify,
            cancel.clone(),
        ));

        Ok(Self {
            cancel,
            handle: Some(handle),
        })
    }

    /// Cancel the task and wait for it to finish
    pub async fn stop(&mut self) {
        self.cancel.cancel();

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Branch watcher task did not shut down cleanly");
            }
        }

        info!("Branch watcher stopped");
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Token that stops this watcher when cancelled
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl Drop for BranchWatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Only content writes count; metadata touches and renames alone do not
fn is_write(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Other)
    )
}

async fn read_branch(repo: &Arc<Repository>) -> Result<String, RepoError> {
    let repo = Arc::clone(repo);
    tokio::task::spawn_blocking(move || repo.current_branch()).await?
}

/// `_subscription` keeps the filesystem watcher alive for as long as the loop runs
async fn watch_loop<S: Send + 'static>(
    repo: Arc<Repository>,
    _subscription: S,
    mut branch: String,
    mut events: mpsc::UnboundedReceiver<EventResult>,
    notify: mpsc::Sender<String>,
    cancel: CancellationToken,
) {
    let settle = repo.settle_interval();
    debug!(settle_ms = %settle.as_millis(), "Branch watch loop started");

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => {
                debug!("Branch watch loop received shutdown signal");
                break;
            }
            next = events.recv() => match next {
                Some(event) => event,
                None => {
                    debug!("Filesystem event source closed");
                    break;
                }
            },
        };

        match event {
            Ok(event) if is_write(&event.kind) => {
                let mut coalesced = 0usize;
                while events.try_recv().is_ok() {
                    coalesced += 1;
                }

                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(settle) => {}
                }

                let current = match read_branch(&repo).await {
                    Ok(current) => current,
                    Err(e) => {
                        warn!(error = %e, "Could not re-read branch, keeping {}", branch);
                        continue;
                    }
                };

                if current == branch {
                    debug!(coalesced, "Branch unchanged after .git write");
                    continue;
                }

                info!(from = %branch, to = %current, coalesced, "Branch changed");
                branch = current;

                tokio::select! {
                    () = cancel.cancelled() => break,
                    sent = notify.send(branch.clone()) => {
                        if sent.is_err() {
                            debug!("Branch receiver dropped");
                            break;
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, "Filesystem watcher error"),
        }
    }

    debug!("Branch watch loop ended");
}
