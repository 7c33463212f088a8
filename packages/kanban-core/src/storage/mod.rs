pub mod local;
pub mod memory;
pub mod tables;

use crate::mutation::Mutation;
use crate::session::{AccountRecord, AccountStore, AuthError};
use crate::types::{Board, BoardData, BoardInfo, Column, Note, Order};
use tables::BoardTables;

/// Abstract storage trait for board backends.
/// Implementations: MemoryStorage (process memory), LocalStorage (JSON file).
///
/// Every call is made on behalf of an account; boards of other accounts
/// behave as if they did not exist.
pub trait BoardStorage: Send + Sync {
    fn list_boards(&self, account: &str) -> Vec<BoardInfo>;

    fn create_board(&self, account: &str, title: &str, color: &str) -> Result<Board, StorageError>;

    fn rename_board(&self, account: &str, board_id: &str, title: &str) -> Result<Board, StorageError>;

    /// Delete a board with all its columns and notes.
    fn delete_board(&self, account: &str, board_id: &str) -> Result<(), StorageError>;

    /// Authoritative snapshot of one board.
    fn fetch_board(&self, account: &str, board_id: &str) -> Result<BoardData, StorageError>;

    /// Append a column (`order` = current column count + 1).
    fn create_column(
        &self,
        account: &str,
        board_id: &str,
        id: &str,
        title: &str,
    ) -> Result<Column, StorageError>;

    fn rename_column(&self, account: &str, board_id: &str, id: &str, title: &str) -> Result<(), StorageError>;

    fn move_column(&self, account: &str, board_id: &str, id: &str, order: Order) -> Result<(), StorageError>;

    /// Delete a column and the notes inside it.
    fn delete_column(&self, account: &str, board_id: &str, id: &str) -> Result<(), StorageError>;

    /// Insert or overwrite a note.
    fn upsert_note(&self, account: &str, board_id: &str, note: Note) -> Result<(), StorageError>;

    fn edit_note(&self, account: &str, board_id: &str, id: &str, body: &str) -> Result<(), StorageError>;

    fn move_note(
        &self,
        account: &str,
        board_id: &str,
        id: &str,
        column: &str,
        order: Order,
    ) -> Result<(), StorageError>;

    fn delete_note(&self, account: &str, board_id: &str, id: &str) -> Result<(), StorageError>;

    /// Pick up changes made to the backing store outside this process.
    /// Returns true when something new was loaded.
    fn reload(&self) -> Result<bool, StorageError>;

    /// Route a mutation to the matching operation. The board in the path wins
    /// over any board id carried by the mutation.
    fn apply_mutation(
        &self,
        account: &str,
        board_id: &str,
        mutation: &Mutation,
    ) -> Result<(), StorageError> {
        match mutation {
            Mutation::CreateColumn { id, title, .. } => {
                self.create_column(account, board_id, id, title).map(|_| ())
            }
            Mutation::RenameColumn { id, title, .. } => {
                self.rename_column(account, board_id, id, title)
            }
            Mutation::MoveColumn { id, order, .. } => self.move_column(account, board_id, id, *order),
            Mutation::DeleteColumn { id, .. } => self.delete_column(account, board_id, id),
            Mutation::CreateNote {
                id,
                column,
                body,
                order,
                ..
            } => self.upsert_note(
                account,
                board_id,
                Note {
                    id: id.clone(),
                    board: board_id.to_string(),
                    column: column.clone(),
                    order: *order,
                    body: body.clone(),
                },
            ),
            Mutation::EditNote { id, body, .. } => self.edit_note(account, board_id, id, body),
            Mutation::MoveNote {
                id, column, order, ..
            } => self.move_note(account, board_id, id, column, *order),
            Mutation::DeleteNote { id, .. } => self.delete_note(account, board_id, id),
        }
    }
}

/// Backends that keep the whole data set as [`BoardTables`] and only differ
/// in how they guard and persist it.
pub trait TableStore: Send + Sync {
    fn read_tables<R>(&self, f: impl FnOnce(&BoardTables) -> R) -> R;

    /// Run `f` against the tables. Changes are kept only if `f` succeeds.
    fn write_tables<R>(
        &self,
        f: impl FnOnce(&mut BoardTables) -> Result<R, StorageError>,
    ) -> Result<R, StorageError>;

    /// Re-read the tables from their backing file, if there is one.
    fn refresh_tables(&self) -> Result<bool, StorageError> {
        Ok(false)
    }
}

impl<T: TableStore> BoardStorage for T {
    fn list_boards(&self, account: &str) -> Vec<BoardInfo> {
        self.read_tables(|t| t.list_boards(account))
    }

    fn create_board(&self, account: &str, title: &str, color: &str) -> Result<Board, StorageError> {
        let board = self.write_tables(|t| Ok(t.create_board(account, title, color)))?;
        log::info!("Created board {} for account {}", board.id, account);
        Ok(board)
    }

    fn rename_board(&self, account: &str, board_id: &str, title: &str) -> Result<Board, StorageError> {
        self.write_tables(|t| t.rename_board(account, board_id, title))
    }

    fn delete_board(&self, account: &str, board_id: &str) -> Result<(), StorageError> {
        self.write_tables(|t| t.delete_board(account, board_id))?;
        log::info!("Deleted board {} for account {}", board_id, account);
        Ok(())
    }

    fn fetch_board(&self, account: &str, board_id: &str) -> Result<BoardData, StorageError> {
        self.read_tables(|t| t.fetch_board(account, board_id))
    }

    fn create_column(
        &self,
        account: &str,
        board_id: &str,
        id: &str,
        title: &str,
    ) -> Result<Column, StorageError> {
        self.write_tables(|t| t.create_column(account, board_id, id, title))
    }

    fn rename_column(&self, account: &str, board_id: &str, id: &str, title: &str) -> Result<(), StorageError> {
        self.write_tables(|t| t.rename_column(account, board_id, id, title))
    }

    fn move_column(&self, account: &str, board_id: &str, id: &str, order: Order) -> Result<(), StorageError> {
        self.write_tables(|t| t.move_column(account, board_id, id, order))
    }

    fn delete_column(&self, account: &str, board_id: &str, id: &str) -> Result<(), StorageError> {
        self.write_tables(|t| t.delete_column(account, board_id, id))
    }

    fn upsert_note(&self, account: &str, board_id: &str, note: Note) -> Result<(), StorageError> {
        self.write_tables(|t| t.upsert_note(account, board_id, note))
    }

    fn edit_note(&self, account: &str, board_id: &str, id: &str, body: &str) -> Result<(), StorageError> {
        self.write_tables(|t| t.edit_note(account, board_id, id, body))
    }

    fn move_note(
        &self,
        account: &str,
        board_id: &str,
        id: &str,
        column: &str,
        order: Order,
    ) -> Result<(), StorageError> {
        self.write_tables(|t| t.move_note(account, board_id, id, column, order))
    }

    fn delete_note(&self, account: &str, board_id: &str, id: &str) -> Result<(), StorageError> {
        self.write_tables(|t| t.delete_note(account, board_id, id))
    }

    fn reload(&self) -> Result<bool, StorageError> {
        self.refresh_tables()
    }
}

impl<T: TableStore> AccountStore for T {
    fn find_account(&self, email: &str) -> Option<AccountRecord> {
        self.read_tables(|t| t.find_account(email).cloned())
    }

    fn insert_account(&self, record: AccountRecord) -> Result<(), AuthError> {
        self.write_tables(|t| t.insert_account(record))
            .map_err(|e| match e {
                StorageError::AccountExists(_) => AuthError::AccountExists,
                other => AuthError::Storage(other.to_string()),
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Account already exists: {0}")]
    AccountExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data file: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::BoardNotFound(_) | StorageError::ColumnNotFound(_) | StorageError::NoteNotFound(_)
        )
    }
}
