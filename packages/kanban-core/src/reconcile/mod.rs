//! Board reconciler.
//!
//! Owns what the user currently sees: the latest authoritative snapshot with
//! every in-flight mutation replayed on top. Two reactions keep it current:
//!
//! - [`Reconciler::on_snapshot`] runs when a fresh snapshot arrives. It replays
//!   the whole in-flight log over the snapshot.
//! - [`Reconciler::on_mutations`] runs when the in-flight log changes. It
//!   replays only mutations newer than the last reconciliation, over the
//!   current view. Disabled when optimistic updates are off.
//!
//! Both re-derive from the full log, so the view converges to the same state
//! whichever of "new snapshot" and "new mutation" is observed first.

pub mod driver;
pub mod identity;

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::ReconcilerConfig;
use crate::mutation::reduce;
use crate::mutation::Mutation;
use crate::types::{Board, BoardData, Column, Note};
use identity::{reconcile_items, ChangeSummary};

/// The reconciled board as the view renders it.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedBoard {
    pub board: Board,
    pub columns: Vec<Arc<Column>>,
    pub notes: Vec<Arc<Note>>,
    /// Time of the last reconciliation (ms). Mutations at or before it are
    /// already reflected in `columns`/`notes`.
    pub timestamp: u64,
}

impl DisplayedBoard {
    /// Columns ordered by their fractional key.
    pub fn sorted_columns(&self) -> Vec<Arc<Column>> {
        let mut columns = self.columns.clone();
        columns.sort_by(|a, b| a.order.total_cmp(&b.order));
        columns
    }

    /// Notes of one column ordered by their fractional key.
    pub fn notes_in_column(&self, column: &str) -> Vec<Arc<Note>> {
        let mut notes: Vec<Arc<Note>> = self
            .notes
            .iter()
            .filter(|n| n.column == column)
            .cloned()
            .collect();
        notes.sort_by(|a, b| a.order.total_cmp(&b.order));
        notes
    }

    pub fn find_note(&self, id: &str) -> Option<&Arc<Note>> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn find_column(&self, id: &str) -> Option<&Arc<Column>> {
        self.columns.iter().find(|c| c.id == id)
    }
}

pub struct Reconciler<C: Clock = SystemClock> {
    config: ReconcilerConfig,
    clock: C,
    store: DisplayedBoard,
}

impl Reconciler<SystemClock> {
    pub fn new(config: ReconcilerConfig, initial: &BoardData) -> Self {
        Self::with_clock(config, SystemClock, initial)
    }
}

impl<C: Clock> Reconciler<C> {
    /// Start from `initial` as-is; the first reconciliation happens on the
    /// first reaction.
    pub fn with_clock(config: ReconcilerConfig, clock: C, initial: &BoardData) -> Self {
        let store = DisplayedBoard {
            board: initial.board.clone(),
            columns: initial.columns.iter().cloned().map(Arc::new).collect(),
            notes: initial.notes.iter().cloned().map(Arc::new).collect(),
            timestamp: 0,
        };
        Self {
            config,
            clock,
            store,
        }
    }

    pub fn displayed(&self) -> &DisplayedBoard {
        &self.store
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn optimistic(&self) -> bool {
        self.config.optimistic_updates
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// A fresh authoritative snapshot arrived: replay the whole in-flight log.
    pub fn on_snapshot(&mut self, snapshot: &BoardData, pending: &[Mutation]) -> ChangeSummary {
        let derived = reduce::apply(pending, &snapshot.notes, &snapshot.columns);
        let summary = self.commit(snapshot.board.clone(), derived);
        log::debug!(
            "reconciled board {} from snapshot with {} pending: +{} ~{} -{}",
            snapshot.board.id,
            pending.len(),
            summary.added,
            summary.modified,
            summary.removed
        );
        summary
    }

    /// The in-flight log changed: apply what is newer than the last
    /// reconciliation on top of the current view.
    ///
    /// Returns `None` when nothing was applied (optimistic updates off, or no
    /// mutation newer than the view).
    pub fn on_mutations(&mut self, pending: &[Mutation]) -> Option<ChangeSummary> {
        if !self.config.optimistic_updates {
            return None;
        }
        let fresh: Vec<Mutation> = pending
            .iter()
            .filter(|m| m.timestamp() > self.store.timestamp)
            .cloned()
            .collect();
        if fresh.is_empty() {
            return None;
        }

        let notes: Vec<Note> = self.store.notes.iter().map(|n| Note::clone(n)).collect();
        let columns: Vec<Column> = self.store.columns.iter().map(|c| Column::clone(c)).collect();
        let derived = reduce::apply(&fresh, &notes, &columns);
        let summary = self.commit(self.store.board.clone(), derived);
        log::debug!(
            "optimistically applied {} mutation(s) to board {}",
            fresh.len(),
            self.store.board.id
        );
        Some(summary)
    }

    /// Swap in columns, notes and timestamp together.
    fn commit(&mut self, board: Board, derived: reduce::Snapshot) -> ChangeSummary {
        let (columns, column_changes) = reconcile_items(&self.store.columns, derived.columns);
        let (notes, note_changes) = reconcile_items(&self.store.notes, derived.notes);
        self.store = DisplayedBoard {
            board,
            columns,
            notes,
            timestamp: self.clock.now_ms(),
        };
        column_changes.merge(note_changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::order::rank_one;

    fn board() -> Board {
        Board {
            id: "b".to_string(),
            title: "Board".to_string(),
            color: "bg-primary-200".to_string(),
        }
    }

    fn column(id: &str, order: f64) -> Column {
        Column {
            id: id.to_string(),
            board: "b".to_string(),
            title: id.to_string(),
            order,
        }
    }

    fn note(id: &str, column: &str, order: f64) -> Note {
        Note {
            id: id.to_string(),
            board: "b".to_string(),
            column: column.to_string(),
            order,
            body: id.to_string(),
        }
    }

    fn snapshot(columns: Vec<Column>, notes: Vec<Note>) -> BoardData {
        BoardData {
            board: board(),
            columns,
            notes,
        }
    }

    fn create_note(id: &str, order: f64, timestamp: u64) -> Mutation {
        Mutation::CreateNote {
            id: id.to_string(),
            board: "b".to_string(),
            column: "c1".to_string(),
            body: id.to_string(),
            order,
            timestamp,
        }
    }

    fn ids(notes: &[Arc<Note>]) -> Vec<String> {
        notes.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_snapshot_replays_pending_on_top() {
        let clock = ManualClock::new(50);
        let base = snapshot(vec![column("c1", 1.0)], vec![note("n1", "c1", 1.0)]);
        let mut reconciler = Reconciler::with_clock(ReconcilerConfig::default(), clock, &base);

        reconciler.on_snapshot(&base, &[create_note("n2", 2.0, 60)]);
        assert_eq!(ids(&reconciler.displayed().notes), vec!["n1", "n2"]);
        assert_eq!(reconciler.displayed().timestamp, 50);
    }

    #[test]
    fn test_snapshot_keeps_identity_of_unchanged_notes() {
        let clock = ManualClock::new(10);
        let base = snapshot(vec![column("c1", 1.0)], vec![note("n1", "c1", 1.0), note("n2", "c1", 2.0)]);
        let mut reconciler = Reconciler::with_clock(ReconcilerConfig::default(), clock, &base);
        let before = reconciler.displayed().clone();

        let mut next = base.clone();
        next.notes[1].body = "edited elsewhere".to_string();
        let summary = reconciler.on_snapshot(&next, &[]);

        let after = reconciler.displayed();
        assert!(Arc::ptr_eq(&before.notes[0], &after.notes[0]));
        assert!(!Arc::ptr_eq(&before.notes[1], &after.notes[1]));
        assert!(Arc::ptr_eq(&before.columns[0], &after.columns[0]));
        assert_eq!(summary.modified, 1);
    }

    #[test]
    fn test_mutations_apply_only_newer_than_view() {
        let clock = ManualClock::new(100);
        let base = snapshot(vec![column("c1", 1.0)], vec![]);
        let mut reconciler =
            Reconciler::with_clock(ReconcilerConfig::default(), clock.clone(), &base);
        reconciler.on_snapshot(&base, &[]);

        // Older than the view: already reflected (or superseded) by the snapshot.
        assert!(reconciler.on_mutations(&[create_note("old", 1.0, 90)]).is_none());
        assert!(reconciler.displayed().notes.is_empty());

        clock.set(130);
        let summary = reconciler
            .on_mutations(&[create_note("old", 1.0, 90), create_note("new", 2.0, 120)])
            .unwrap();
        assert_eq!(summary.added, 1);
        assert_eq!(ids(&reconciler.displayed().notes), vec!["new"]);
        assert_eq!(reconciler.displayed().timestamp, 130);

        // The same log again is a no-op: everything is older than the view now.
        assert!(reconciler
            .on_mutations(&[create_note("new", 2.0, 120)])
            .is_none());
    }

    #[test]
    fn test_mutation_stamped_before_snapshot_waits_for_next_snapshot() {
        let clock = ManualClock::new(101);
        let base = snapshot(vec![column("c1", 1.0)], vec![]);
        let mut reconciler =
            Reconciler::with_clock(ReconcilerConfig::default(), clock.clone(), &base);

        // The snapshot reaction ran at 101 before the mutation stamped 100
        // reached the log, so the view skips it.
        reconciler.on_snapshot(&base, &[]);
        let late = create_note("late", 1.0, 100);
        assert!(reconciler.on_mutations(&[late.clone()]).is_none());
        assert!(reconciler.displayed().notes.is_empty());

        // The next snapshot replays the whole log and shows it.
        clock.set(140);
        reconciler.on_snapshot(&base, &[late]);
        assert_eq!(ids(&reconciler.displayed().notes), vec!["late"]);
    }

    #[test]
    fn test_server_only_mode_ignores_mutations() {
        let clock = ManualClock::new(0);
        let base = snapshot(vec![column("c1", 1.0)], vec![]);
        let mut reconciler =
            Reconciler::with_clock(ReconcilerConfig::server_only(), clock, &base);

        assert!(!reconciler.optimistic());
        assert!(reconciler.on_mutations(&[create_note("n1", 1.0, 5)]).is_none());
        assert!(reconciler.displayed().notes.is_empty());
    }

    #[test]
    fn test_convergence_regardless_of_snapshot_history() {
        let pending = vec![
            create_note("p1", 3.0, 200),
            Mutation::EditNote {
                id: "n1".to_string(),
                body: "mine".to_string(),
                timestamp: 210,
            },
        ];
        let s0 = snapshot(vec![column("c1", 1.0)], vec![note("n1", "c1", 1.0)]);
        let mut s1 = s0.clone();
        s1.notes.push(note("server", "c1", 2.0));

        let clock = ManualClock::new(300);
        let mut stepwise = Reconciler::with_clock(ReconcilerConfig::default(), clock.clone(), &s0);
        stepwise.on_snapshot(&s0, &pending);
        stepwise.on_snapshot(&s1, &pending);

        let mut direct = Reconciler::with_clock(ReconcilerConfig::default(), clock, &s1);
        direct.on_snapshot(&s1, &pending);

        let as_values = |r: &Reconciler<ManualClock>| -> Vec<Note> {
            r.displayed().notes.iter().map(|n| Note::clone(n)).collect()
        };
        assert_eq!(as_values(&stepwise), as_values(&direct));
        assert_eq!(as_values(&direct).len(), 3);
    }

    #[test]
    fn test_added_note_is_not_duplicated_after_confirmation() {
        let clock = ManualClock::new(50);
        let base = snapshot(vec![column("c1", 1.0)], vec![]);
        let mut reconciler =
            Reconciler::with_clock(ReconcilerConfig::default(), clock.clone(), &base);
        reconciler.on_snapshot(&base, &[]);

        let order = rank_one(None, None).unwrap();
        let pending = vec![create_note("N1", order, 100)];
        clock.set(101);
        reconciler.on_mutations(&pending);
        let shown = reconciler.displayed().notes_in_column("c1");
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].order, 1.0);

        // Server confirms; the snapshot now carries N1 and the submission is
        // still reported pending for one more cycle.
        let confirmed = snapshot(vec![column("c1", 1.0)], vec![note("N1", "c1", 1.0)]);
        clock.set(150);
        reconciler.on_snapshot(&confirmed, &pending);
        assert_eq!(ids(&reconciler.displayed().notes), vec!["N1"]);

        reconciler.on_snapshot(&confirmed, &[]);
        assert_eq!(ids(&reconciler.displayed().notes), vec!["N1"]);
    }

    #[test]
    fn test_sorted_views() {
        let base = snapshot(
            vec![column("c2", 2.0), column("c1", 0.5)],
            vec![note("n2", "c1", 2.0), note("n1", "c1", 1.0), note("x", "c2", 1.0)],
        );
        let reconciler = Reconciler::new(ReconcilerConfig::default(), &base);
        let displayed = reconciler.displayed();

        let column_ids: Vec<String> = displayed.sorted_columns().iter().map(|c| c.id.clone()).collect();
        assert_eq!(column_ids, vec!["c1", "c2"]);
        assert_eq!(ids(&displayed.notes_in_column("c1")), vec!["n1", "n2"]);
        assert!(displayed.find_note("x").is_some());
        assert!(displayed.find_column("c3").is_none());
    }
}
