/// Reconciler task.
///
/// Runs a [`Reconciler`] inside one tokio task fed by two watch channels: the
/// authoritative snapshot and the in-flight mutation log. Each change runs
/// the matching reaction to completion before the next is looked at, then the
/// whole reconciled board is published in one `send_replace`. The task stops
/// when either input channel closes.
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{DisplayedBoard, Reconciler};
use crate::clock::Clock;
use crate::mutation::Mutation;
use crate::types::BoardData;

pub struct ReconcilerHandle {
    displayed: watch::Receiver<DisplayedBoard>,
    task: JoinHandle<()>,
}

impl ReconcilerHandle {
    pub fn subscribe(&self) -> watch::Receiver<DisplayedBoard> {
        self.displayed.clone()
    }

    pub fn current(&self) -> DisplayedBoard {
        self.displayed.borrow().clone()
    }

    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the task to stop (after its inputs close).
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            if !e.is_cancelled() {
                log::error!("reconciler task failed: {}", e);
            }
        }
    }
}

/// Reconcile the current inputs once, then keep reconciling on every change.
pub fn spawn_reconciler<C>(
    mut reconciler: Reconciler<C>,
    mut snapshots: watch::Receiver<BoardData>,
    mut pending: watch::Receiver<Vec<Mutation>>,
) -> ReconcilerHandle
where
    C: Clock + 'static,
{
    let snapshot = snapshots.borrow_and_update().clone();
    let log = pending.borrow_and_update().clone();
    reconciler.on_snapshot(&snapshot, &log);

    let (tx, rx) = watch::channel(reconciler.displayed().clone());
    let board_id = snapshot.board.id;

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    let log = pending.borrow().clone();
                    reconciler.on_snapshot(&snapshot, &log);
                }
                changed = pending.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let log = pending.borrow_and_update().clone();
                    if reconciler.on_mutations(&log).is_none() {
                        continue;
                    }
                }
            }
            tx.send_replace(reconciler.displayed().clone());
        }
        log::debug!("reconciler for board {} stopped", board_id);
    });

    ReconcilerHandle { displayed: rx, task }
}
