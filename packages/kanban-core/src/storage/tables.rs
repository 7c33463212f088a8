/// Relational tables: accounts, boards (with owning account), columns, notes.
///
/// Every operation is scoped to an account and a board. A board owned by a
/// different account is reported as not found, same as a missing one.
use serde::{Deserialize, Serialize};

use super::StorageError;
use crate::order;
use crate::session::AccountRecord;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardRow {
    pub account: AccountId,
    #[serde(flatten)]
    pub board: Board,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardTables {
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
    #[serde(default)]
    pub boards: Vec<BoardRow>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl BoardTables {
    fn owned(&self, account: &str, board_id: &str) -> Result<&BoardRow, StorageError> {
        self.boards
            .iter()
            .find(|row| row.board.id == board_id && row.account == account)
            .ok_or_else(|| StorageError::BoardNotFound(board_id.to_string()))
    }

    fn column_mut(&mut self, board_id: &str, id: &str) -> Result<&mut Column, StorageError> {
        self.columns
            .iter_mut()
            .find(|c| c.id == id && c.board == board_id)
            .ok_or_else(|| StorageError::ColumnNotFound(id.to_string()))
    }

    fn note_mut(&mut self, board_id: &str, id: &str) -> Result<&mut Note, StorageError> {
        self.notes
            .iter_mut()
            .find(|n| n.id == id && n.board == board_id)
            .ok_or_else(|| StorageError::NoteNotFound(id.to_string()))
    }

    fn require_column(&self, board_id: &str, id: &str) -> Result<(), StorageError> {
        if self.columns.iter().any(|c| c.id == id && c.board == board_id) {
            Ok(())
        } else {
            Err(StorageError::ColumnNotFound(id.to_string()))
        }
    }

    pub fn find_account(&self, email: &str) -> Option<&AccountRecord> {
        self.accounts.iter().find(|a| a.account.email == email)
    }

    /// Add an account. Emails are unique.
    pub fn insert_account(&mut self, record: AccountRecord) -> Result<(), StorageError> {
        if self.find_account(&record.account.email).is_some() {
            return Err(StorageError::AccountExists(record.account.email));
        }
        self.accounts.push(record);
        Ok(())
    }

    pub fn list_boards(&self, account: &str) -> Vec<BoardInfo> {
        self.boards
            .iter()
            .filter(|row| row.account == account)
            .map(|row| BoardInfo {
                id: row.board.id.clone(),
                title: row.board.title.clone(),
                color: row.board.color.clone(),
                column_count: self.columns.iter().filter(|c| c.board == row.board.id).count(),
                note_count: self.notes.iter().filter(|n| n.board == row.board.id).count(),
            })
            .collect()
    }

    pub fn create_board(&mut self, account: &str, title: &str, color: &str) -> Board {
        let board = Board {
            id: new_id(),
            title: title.to_string(),
            color: color.to_string(),
        };
        self.boards.push(BoardRow {
            account: account.to_string(),
            board: board.clone(),
        });
        board
    }

    pub fn rename_board(
        &mut self,
        account: &str,
        board_id: &str,
        title: &str,
    ) -> Result<Board, StorageError> {
        self.owned(account, board_id)?;
        let row = self
            .boards
            .iter_mut()
            .find(|row| row.board.id == board_id)
            .ok_or_else(|| StorageError::BoardNotFound(board_id.to_string()))?;
        row.board.title = title.to_string();
        Ok(row.board.clone())
    }

    /// Remove a board together with its columns and notes.
    pub fn delete_board(&mut self, account: &str, board_id: &str) -> Result<(), StorageError> {
        self.owned(account, board_id)?;
        self.boards.retain(|row| row.board.id != board_id);
        self.columns.retain(|c| c.board != board_id);
        self.notes.retain(|n| n.board != board_id);
        Ok(())
    }

    /// Board with its columns ordered by `order`.
    pub fn fetch_board(&self, account: &str, board_id: &str) -> Result<BoardData, StorageError> {
        let row = self.owned(account, board_id)?;
        let mut columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|c| c.board == board_id)
            .cloned()
            .collect();
        columns.sort_by(|a, b| a.order.total_cmp(&b.order));
        let notes = self
            .notes
            .iter()
            .filter(|n| n.board == board_id)
            .cloned()
            .collect();
        Ok(BoardData {
            board: row.board.clone(),
            columns,
            notes,
        })
    }

    /// Append a column. Re-creating an existing id returns the stored column.
    pub fn create_column(
        &mut self,
        account: &str,
        board_id: &str,
        id: &str,
        title: &str,
    ) -> Result<Column, StorageError> {
        self.owned(account, board_id)?;
        if let Some(existing) = self.columns.iter().find(|c| c.id == id && c.board == board_id) {
            return Ok(existing.clone());
        }
        let count = self.columns.iter().filter(|c| c.board == board_id).count();
        let column = Column {
            id: id.to_string(),
            board: board_id.to_string(),
            title: title.to_string(),
            order: order::append_order(count),
        };
        self.columns.push(column.clone());
        Ok(column)
    }

    pub fn rename_column(
        &mut self,
        account: &str,
        board_id: &str,
        id: &str,
        title: &str,
    ) -> Result<(), StorageError> {
        self.owned(account, board_id)?;
        self.column_mut(board_id, id)?.title = title.to_string();
        Ok(())
    }

    pub fn move_column(
        &mut self,
        account: &str,
        board_id: &str,
        id: &str,
        order: Order,
    ) -> Result<(), StorageError> {
        self.owned(account, board_id)?;
        self.column_mut(board_id, id)?.order = order;
        Ok(())
    }

    /// Remove a column and every note in it.
    pub fn delete_column(
        &mut self,
        account: &str,
        board_id: &str,
        id: &str,
    ) -> Result<(), StorageError> {
        self.owned(account, board_id)?;
        self.require_column(board_id, id)?;
        self.columns.retain(|c| !(c.id == id && c.board == board_id));
        self.notes.retain(|n| !(n.column == id && n.board == board_id));
        Ok(())
    }

    /// Insert or overwrite a note by id.
    pub fn upsert_note(
        &mut self,
        account: &str,
        board_id: &str,
        note: Note,
    ) -> Result<(), StorageError> {
        self.owned(account, board_id)?;
        self.require_column(board_id, &note.column)?;
        let note = Note {
            board: board_id.to_string(),
            ..note
        };
        match self.notes.iter_mut().find(|n| n.id == note.id && n.board == board_id) {
            Some(existing) => *existing = note,
            None => self.notes.push(note),
        }
        Ok(())
    }

    pub fn edit_note(
        &mut self,
        account: &str,
        board_id: &str,
        id: &str,
        body: &str,
    ) -> Result<(), StorageError> {
        self.owned(account, board_id)?;
        self.note_mut(board_id, id)?.body = body.to_string();
        Ok(())
    }

    pub fn move_note(
        &mut self,
        account: &str,
        board_id: &str,
        id: &str,
        column: &str,
        order: Order,
    ) -> Result<(), StorageError> {
        self.owned(account, board_id)?;
        self.require_column(board_id, column)?;
        let note = self.note_mut(board_id, id)?;
        note.column = column.to_string();
        note.order = order;
        Ok(())
    }

    pub fn delete_note(
        &mut self,
        account: &str,
        board_id: &str,
        id: &str,
    ) -> Result<(), StorageError> {
        self.owned(account, board_id)?;
        let before = self.notes.len();
        self.notes.retain(|n| !(n.id == id && n.board == board_id));
        if self.notes.len() == before {
            return Err(StorageError::NoteNotFound(id.to_string()));
        }
        Ok(())
    }
}
