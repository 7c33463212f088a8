/// Call arguments of the eight submission ports.
///
/// Each port takes its own argument shape, mirroring what the UI passes when
/// it fires the action. The transport keeps these inputs around while the
/// call is in flight; the extractor turns them into [`Mutation`]s.
use serde::{Deserialize, Serialize};

use super::{Mutation, MutationKind};
use crate::types::{Id, Order};

/// Arguments of one submission port.
pub trait MutationInput: Clone + Send + Sync + 'static {
    const KIND: MutationKind;

    fn timestamp(&self) -> u64;

    fn to_mutation(&self) -> Mutation;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateColumnInput {
    pub id: Id,
    pub board: Id,
    pub title: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameColumnInput {
    pub id: Id,
    pub title: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveColumnInput {
    pub column: Id,
    pub order: Order,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteColumnInput {
    pub id: Id,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNoteInput {
    pub id: Id,
    pub board: Id,
    pub column: Id,
    pub body: String,
    pub order: Order,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditNoteInput {
    pub id: Id,
    pub content: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveNoteInput {
    pub note: Id,
    pub column: Id,
    pub order: Order,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteNoteInput {
    pub id: Id,
    pub timestamp: u64,
}

impl MutationInput for CreateColumnInput {
    const KIND: MutationKind = MutationKind::CreateColumn;

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn to_mutation(&self) -> Mutation {
        Mutation::CreateColumn {
            id: self.id.clone(),
            board: self.board.clone(),
            title: self.title.clone(),
            timestamp: self.timestamp,
        }
    }
}

impl MutationInput for RenameColumnInput {
    const KIND: MutationKind = MutationKind::RenameColumn;

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn to_mutation(&self) -> Mutation {
        Mutation::RenameColumn {
            id: self.id.clone(),
            title: self.title.clone(),
            timestamp: self.timestamp,
        }
    }
}

impl MutationInput for MoveColumnInput {
    const KIND: MutationKind = MutationKind::MoveColumn;

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn to_mutation(&self) -> Mutation {
        Mutation::MoveColumn {
            id: self.column.clone(),
            order: self.order,
            timestamp: self.timestamp,
        }
    }
}

impl MutationInput for DeleteColumnInput {
    const KIND: MutationKind = MutationKind::DeleteColumn;

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn to_mutation(&self) -> Mutation {
        Mutation::DeleteColumn {
            id: self.id.clone(),
            timestamp: self.timestamp,
        }
    }
}

impl MutationInput for CreateNoteInput {
    const KIND: MutationKind = MutationKind::CreateNote;

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn to_mutation(&self) -> Mutation {
        Mutation::CreateNote {
            id: self.id.clone(),
            board: self.board.clone(),
            column: self.column.clone(),
            body: self.body.clone(),
            order: self.order,
            timestamp: self.timestamp,
        }
    }
}

impl MutationInput for EditNoteInput {
    const KIND: MutationKind = MutationKind::EditNote;

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn to_mutation(&self) -> Mutation {
        Mutation::EditNote {
            id: self.id.clone(),
            body: self.content.clone(),
            timestamp: self.timestamp,
        }
    }
}

impl MutationInput for MoveNoteInput {
    const KIND: MutationKind = MutationKind::MoveNote;

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn to_mutation(&self) -> Mutation {
        Mutation::MoveNote {
            id: self.note.clone(),
            column: self.column.clone(),
            order: self.order,
            timestamp: self.timestamp,
        }
    }
}

impl MutationInput for DeleteNoteInput {
    const KIND: MutationKind = MutationKind::DeleteNote;

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn to_mutation(&self) -> Mutation {
        Mutation::DeleteNote {
            id: self.id.clone(),
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_note_content_becomes_body() {
        let input = EditNoteInput {
            id: "n1".to_string(),
            content: "hello".to_string(),
            timestamp: 9,
        };
        assert_eq!(
            input.to_mutation(),
            Mutation::EditNote {
                id: "n1".to_string(),
                body: "hello".to_string(),
                timestamp: 9
            }
        );
    }

    #[test]
    fn test_move_inputs_target_the_moved_item() {
        let note = MoveNoteInput {
            note: "n1".to_string(),
            column: "c2".to_string(),
            order: 1.5,
            timestamp: 3,
        };
        let column = MoveColumnInput {
            column: "c1".to_string(),
            order: 0.5,
            timestamp: 4,
        };
        assert_eq!(note.to_mutation().target(), "n1");
        assert_eq!(column.to_mutation().target(), "c1");
        assert_eq!(MoveNoteInput::KIND, note.to_mutation().kind());
        assert_eq!(MoveColumnInput::KIND, column.to_mutation().kind());
    }
}
