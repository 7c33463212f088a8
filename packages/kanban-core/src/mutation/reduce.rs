/// Mutation reducer.
///
/// Replays mutations over a columns/notes snapshot in timestamp order. Equal
/// timestamps keep their relative input order.
///
/// Per mutation:
/// - create: append unless an item with that id already exists
///   (columns get `order = len + 1`, notes keep the supplied order)
/// - edit / rename: overwrite body / title
/// - move: overwrite column + order (note) or order (column)
/// - delete: remove
///
/// Any mutation whose target is missing is skipped. A stale edit racing a
/// delete is expected, not an error.
use serde::{Deserialize, Serialize};

use super::Mutation;
use crate::types::{Column, Note};

/// Columns and notes, the part of a board that mutations touch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub columns: Vec<Column>,
    pub notes: Vec<Note>,
}

/// Apply `mutations` to copies of `notes` and `columns`.
pub fn apply(mutations: &[Mutation], notes: &[Note], columns: &[Column]) -> Snapshot {
    let mut snapshot = Snapshot {
        columns: columns.to_vec(),
        notes: notes.to_vec(),
    };
    apply_in_place(mutations, &mut snapshot.notes, &mut snapshot.columns);
    snapshot
}

/// Apply `mutations` directly to `notes` and `columns`.
/// Returns the number of mutations that changed something.
pub fn apply_in_place(
    mutations: &[Mutation],
    notes: &mut Vec<Note>,
    columns: &mut Vec<Column>,
) -> usize {
    let mut ordered: Vec<&Mutation> = mutations.iter().collect();
    // stable: ties stay in input order
    ordered.sort_by_key(|m| m.timestamp());

    let mut applied = 0;
    for mutation in ordered {
        if apply_one(mutation, notes, columns) {
            applied += 1;
        } else {
            log::trace!(
                "skipped {} on {} (timestamp {})",
                mutation.kind(),
                mutation.target(),
                mutation.timestamp()
            );
        }
    }
    applied
}

fn apply_one(mutation: &Mutation, notes: &mut Vec<Note>, columns: &mut Vec<Column>) -> bool {
    match mutation {
        Mutation::CreateNote {
            id,
            board,
            column,
            body,
            order,
            ..
        } => {
            if notes.iter().any(|n| &n.id == id) {
                return false;
            }
            notes.push(Note {
                id: id.clone(),
                board: board.clone(),
                column: column.clone(),
                order: *order,
                body: body.clone(),
            });
            true
        }
        Mutation::EditNote { id, body, .. } => match notes.iter_mut().find(|n| &n.id == id) {
            Some(note) => {
                note.body = body.clone();
                true
            }
            None => false,
        },
        Mutation::MoveNote {
            id, column, order, ..
        } => match notes.iter_mut().find(|n| &n.id == id) {
            Some(note) => {
                note.column = column.clone();
                note.order = *order;
                true
            }
            None => false,
        },
        Mutation::DeleteNote { id, .. } => match notes.iter().position(|n| &n.id == id) {
            Some(index) => {
                notes.remove(index);
                true
            }
            None => false,
        },
        Mutation::CreateColumn {
            id, board, title, ..
        } => {
            if columns.iter().any(|c| &c.id == id) {
                return false;
            }
            let order = columns.len() as f64 + 1.0;
            columns.push(Column {
                id: id.clone(),
                board: board.clone(),
                title: title.clone(),
                order,
            });
            true
        }
        Mutation::RenameColumn { id, title, .. } => {
            match columns.iter_mut().find(|c| &c.id == id) {
                Some(column) => {
                    column.title = title.clone();
                    true
                }
                None => false,
            }
        }
        Mutation::MoveColumn { id, order, .. } => match columns.iter_mut().find(|c| &c.id == id) {
            Some(column) => {
                column.order = *order;
                true
            }
            None => false,
        },
        Mutation::DeleteColumn { id, .. } => match columns.iter().position(|c| &c.id == id) {
            Some(index) => {
                columns.remove(index);
                true
            }
            None => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(id: &str, order: f64) -> Column {
        Column {
            id: id.to_string(),
            board: "b".to_string(),
            title: id.to_uppercase(),
            order,
        }
    }

    fn note(id: &str, column: &str, order: f64) -> Note {
        Note {
            id: id.to_string(),
            board: "b".to_string(),
            column: column.to_string(),
            order,
            body: format!("body of {}", id),
        }
    }

    fn create_note(id: &str, timestamp: u64) -> Mutation {
        Mutation::CreateNote {
            id: id.to_string(),
            board: "b".to_string(),
            column: "c1".to_string(),
            body: "new".to_string(),
            order: 1.0,
            timestamp,
        }
    }

    fn edit_note(id: &str, body: &str, timestamp: u64) -> Mutation {
        Mutation::EditNote {
            id: id.to_string(),
            body: body.to_string(),
            timestamp,
        }
    }

    #[test]
    fn test_empty_mutations_is_identity() {
        let notes = vec![note("n1", "c1", 1.0), note("n2", "c1", 2.0)];
        let columns = vec![column("c1", 1.0)];
        let result = apply(&[], &notes, &columns);
        assert_eq!(result.notes, notes);
        assert_eq!(result.columns, columns);
    }

    #[test]
    fn test_create_note_is_idempotent() {
        let base = vec![note("n0", "c1", 1.0)];
        let once = apply(&[create_note("n1", 5)], &base, &[]);
        let twice = apply(&[create_note("n1", 5), create_note("n1", 5)], &base, &[]);
        assert_eq!(once, twice);
        assert_eq!(once.notes.len(), 2);

        // Replaying on top of a snapshot that already has the note adds nothing.
        let again = apply(&[create_note("n1", 5)], &once.notes, &once.columns);
        assert_eq!(again, once);
    }

    #[test]
    fn test_timestamp_order_not_input_order() {
        let forward = apply(&[create_note("a", 5), edit_note("a", "x", 10)], &[], &[]);
        let backward = apply(&[edit_note("a", "x", 10), create_note("a", 5)], &[], &[]);
        assert_eq!(forward, backward);
        assert_eq!(forward.notes[0].body, "x");
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let result = apply(
            &[edit_note("n1", "first", 3), edit_note("n1", "second", 3)],
            &[note("n1", "c1", 1.0)],
            &[],
        );
        assert_eq!(result.notes[0].body, "second");
    }

    #[test]
    fn test_missing_targets_are_skipped() {
        let notes = vec![note("n1", "c1", 1.0)];
        let columns = vec![column("c1", 1.0)];
        let mutations = vec![
            edit_note("ghost", "boo", 1),
            Mutation::MoveNote {
                id: "ghost".to_string(),
                column: "c1".to_string(),
                order: 4.0,
                timestamp: 2,
            },
            Mutation::DeleteNote {
                id: "ghost".to_string(),
                timestamp: 3,
            },
            Mutation::RenameColumn {
                id: "ghost".to_string(),
                title: "x".to_string(),
                timestamp: 4,
            },
            Mutation::MoveColumn {
                id: "ghost".to_string(),
                order: 9.0,
                timestamp: 5,
            },
            Mutation::DeleteColumn {
                id: "ghost".to_string(),
                timestamp: 6,
            },
        ];

        let mut out_notes = notes.clone();
        let mut out_columns = columns.clone();
        let applied = apply_in_place(&mutations, &mut out_notes, &mut out_columns);
        assert_eq!(applied, 0);
        assert_eq!(out_notes, notes);
        assert_eq!(out_columns, columns);
    }

    #[test]
    fn test_edit_after_delete_is_noop() {
        let result = apply(
            &[
                Mutation::DeleteNote {
                    id: "n1".to_string(),
                    timestamp: 1,
                },
                edit_note("n1", "late edit", 2),
            ],
            &[note("n1", "c1", 1.0)],
            &[],
        );
        assert!(result.notes.is_empty());
    }

    #[test]
    fn test_move_note_across_columns() {
        let result = apply(
            &[Mutation::MoveNote {
                id: "n1".to_string(),
                column: "c2".to_string(),
                order: 0.5,
                timestamp: 1,
            }],
            &[note("n1", "c1", 1.0)],
            &[column("c1", 1.0), column("c2", 2.0)],
        );
        assert_eq!(result.notes[0].column, "c2");
        assert_eq!(result.notes[0].order, 0.5);
    }

    #[test]
    fn test_column_lifecycle() {
        let result = apply(
            &[
                Mutation::CreateColumn {
                    id: "c2".to_string(),
                    board: "b".to_string(),
                    title: "Doing".to_string(),
                    timestamp: 1,
                },
                Mutation::RenameColumn {
                    id: "c2".to_string(),
                    title: "Done".to_string(),
                    timestamp: 2,
                },
                Mutation::MoveColumn {
                    id: "c2".to_string(),
                    order: 0.5,
                    timestamp: 3,
                },
                Mutation::DeleteColumn {
                    id: "c1".to_string(),
                    timestamp: 4,
                },
            ],
            &[],
            &[column("c1", 1.0)],
        );
        assert_eq!(result.columns.len(), 1);
        assert_eq!(result.columns[0].id, "c2");
        assert_eq!(result.columns[0].title, "Done");
        assert_eq!(result.columns[0].order, 0.5);
    }

    #[test]
    fn test_created_column_appends_order() {
        let result = apply(
            &[Mutation::CreateColumn {
                id: "c3".to_string(),
                board: "b".to_string(),
                title: "Later".to_string(),
                timestamp: 1,
            }],
            &[],
            &[column("c1", 1.0), column("c2", 2.0)],
        );
        assert_eq!(result.columns[2].order, 3.0);
    }
}
