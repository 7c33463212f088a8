use serde::{Deserialize, Serialize};

pub type Id = String;
pub type AccountId = String;
/// Fractional ordering key. Siblings sort ascending by it.
pub type Order = f64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: Id,
    pub board: Id,
    pub title: String,
    pub order: Order,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Id,
    pub board: Id,
    pub column: Id,
    pub order: Order,
    pub body: String,
}

/// Authoritative snapshot of one board as the storage layer returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardData {
    pub board: Board,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl BoardData {
    pub fn empty(board: Board) -> Self {
        Self {
            board,
            columns: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn find_column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn find_note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Notes of one column, ordered by their fractional key.
    pub fn notes_in_column(&self, column: &str) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.iter().filter(|n| n.column == column).collect();
        notes.sort_by(|a, b| a.order.total_cmp(&b.order));
        notes
    }
}

/// Summary row for board listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardInfo {
    pub id: Id,
    pub title: String,
    pub color: String,
    pub column_count: usize,
    pub note_count: usize,
}

/// Generate a fresh client-side identifier (random UUID).
pub fn new_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
