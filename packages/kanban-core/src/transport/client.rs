/// One open board as seen by one account.
///
/// Ties the pieces together: submissions go into the registry, are shown
/// optimistically, are sent to storage, and the board is re-fetched once the
/// call settles.
use std::sync::Arc;

use super::registry::{Outcome, Port, SubmissionId, SubmissionRegistry};
use crate::clock::{Clock, SystemClock};
use crate::config::ReconcilerConfig;
use crate::mutation::extract::mutation_log;
use crate::mutation::Mutation;
use crate::reconcile::identity::ChangeSummary;
use crate::reconcile::{DisplayedBoard, Reconciler};
use crate::storage::{BoardStorage, StorageError};
use crate::types::{AccountId, BoardData, Id};

pub struct BoardClient<C: Clock = SystemClock> {
    storage: Arc<dyn BoardStorage>,
    account: AccountId,
    board_id: Id,
    registry: SubmissionRegistry,
    reconciler: Reconciler<C>,
}

impl BoardClient<SystemClock> {
    pub fn open(
        storage: Arc<dyn BoardStorage>,
        account: &str,
        board_id: &str,
        config: ReconcilerConfig,
    ) -> Result<Self, StorageError> {
        Self::open_with_clock(storage, account, board_id, config, SystemClock)
    }
}

impl<C: Clock> BoardClient<C> {
    /// Fetch the board and reconcile it once. Fails if the board cannot be
    /// loaded at all.
    pub fn open_with_clock(
        storage: Arc<dyn BoardStorage>,
        account: &str,
        board_id: &str,
        config: ReconcilerConfig,
        clock: C,
    ) -> Result<Self, StorageError> {
        let snapshot = storage.fetch_board(account, board_id)?;
        let mut reconciler = Reconciler::with_clock(config, clock, &snapshot);
        reconciler.on_snapshot(&snapshot, &[]);
        Ok(Self {
            storage,
            account: account.to_string(),
            board_id: board_id.to_string(),
            registry: SubmissionRegistry::new(),
            reconciler,
        })
    }

    pub fn displayed(&self) -> &DisplayedBoard {
        self.reconciler.displayed()
    }

    pub fn registry(&self) -> &SubmissionRegistry {
        &self.registry
    }

    /// Current in-flight mutation log.
    pub fn pending(&self) -> Vec<Mutation> {
        mutation_log(&self.registry)
    }

    /// Timestamp to stamp new inputs with.
    pub fn now_ms(&self) -> u64 {
        self.reconciler.clock().now_ms()
    }

    /// Record a call as in flight and show it optimistically.
    pub fn begin<A: Port>(&mut self, input: A) -> SubmissionId {
        let id = self.registry.submit(input);
        self.reconciler.on_mutations(&mutation_log(&self.registry));
        id
    }

    /// The call behind `id` finished: settle it and re-fetch the board.
    pub fn complete(&mut self, id: SubmissionId, outcome: Outcome) -> Option<ChangeSummary> {
        if let Outcome::Failed(reason) = &outcome {
            log::warn!("submission {} failed: {}", id.get(), reason);
        }
        self.registry.settle(id, outcome);
        self.refresh()
    }

    /// Send one input through to storage and wait for it to settle.
    pub fn submit<A: Port>(&mut self, input: A) -> Result<SubmissionId, StorageError> {
        let mutation = input.to_mutation();
        let id = self.begin(input);
        let result = self
            .storage
            .apply_mutation(&self.account, &self.board_id, &mutation);
        let outcome = match &result {
            Ok(()) => Outcome::Confirmed,
            Err(e) => Outcome::Failed(e.to_string()),
        };
        self.complete(id, outcome);
        result.map(|_| id)
    }

    /// Re-fetch the board and replay what is still in flight.
    ///
    /// A failed fetch keeps the last good view and returns `None`.
    pub fn refresh(&mut self) -> Option<ChangeSummary> {
        let snapshot = match self.storage.fetch_board(&self.account, &self.board_id) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Failed to fetch board {}: {}", self.board_id, e);
                return None;
            }
        };
        Some(self.apply_snapshot(&snapshot))
    }

    /// Reconcile against a snapshot obtained elsewhere (e.g. a push).
    pub fn apply_snapshot(&mut self, snapshot: &BoardData) -> ChangeSummary {
        let summary = self
            .reconciler
            .on_snapshot(snapshot, &mutation_log(&self.registry));
        self.registry.prune_settled();
        summary
    }
}
