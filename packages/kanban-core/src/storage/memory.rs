/// In-process board storage.
///
/// Holds the tables behind a RwLock. Writes run against a copy that replaces
/// the live tables only when the operation succeeds.
use std::sync::RwLock;

use super::tables::BoardTables;
use super::{StorageError, TableStore};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<BoardTables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: BoardTables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl TableStore for MemoryStorage {
    fn read_tables<R>(&self, f: impl FnOnce(&BoardTables) -> R) -> R {
        f(&self.tables.read().unwrap())
    }

    fn write_tables<R>(
        &self,
        f: impl FnOnce(&mut BoardTables) -> Result<R, StorageError>,
    ) -> Result<R, StorageError> {
        let mut tables = self.tables.write().unwrap();
        let mut draft = tables.clone();
        let result = f(&mut draft)?;
        *tables = draft;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::Mutation;
    use crate::storage::BoardStorage;

    #[test]
    fn test_apply_mutations_through_storage() {
        let storage = MemoryStorage::new();
        let board = storage.create_board("alice", "Home", "bg-base-200").unwrap();

        let mutations = vec![
            Mutation::CreateColumn {
                id: "c1".to_string(),
                board: board.id.clone(),
                title: "Todo".to_string(),
                timestamp: 1,
            },
            Mutation::CreateNote {
                id: "n1".to_string(),
                board: "ignored".to_string(),
                column: "c1".to_string(),
                body: "Water plants".to_string(),
                order: 1.0,
                timestamp: 2,
            },
            Mutation::EditNote {
                id: "n1".to_string(),
                body: "Water all plants".to_string(),
                timestamp: 3,
            },
            Mutation::RenameColumn {
                id: "c1".to_string(),
                title: "Today".to_string(),
                timestamp: 4,
            },
        ];
        for m in &mutations {
            storage.apply_mutation("alice", &board.id, m).unwrap();
        }

        let data = storage.fetch_board("alice", &board.id).unwrap();
        assert_eq!(data.columns[0].title, "Today");
        assert_eq!(data.notes[0].body, "Water all plants");
        assert_eq!(data.notes[0].board, board.id);
    }

    #[test]
    fn test_failed_write_leaves_tables_untouched() {
        let storage = MemoryStorage::new();
        let board = storage.create_board("alice", "Home", "").unwrap();
        storage.create_column("alice", &board.id, "c1", "Todo").unwrap();

        let err = storage
            .apply_mutation(
                "alice",
                &board.id,
                &Mutation::MoveNote {
                    id: "ghost".to_string(),
                    column: "c1".to_string(),
                    order: 1.0,
                    timestamp: 1,
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(storage.fetch_board("alice", &board.id).unwrap().columns.len(), 1);
    }

    #[test]
    fn test_storage_is_object_safe() {
        let storage: std::sync::Arc<dyn BoardStorage> = std::sync::Arc::new(MemoryStorage::new());
        assert!(storage.list_boards("nobody").is_empty());
    }
}
