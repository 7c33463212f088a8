//! Typed board mutations.
//!
//! A mutation is one user action against a board, stamped with the client
//! time (milliseconds) at which it was made. The timestamp is the only
//! ordering key between mutations of different kinds.

pub mod input;
pub mod extract;
pub mod reduce;

use serde::{Deserialize, Serialize};

use crate::types::{Id, Order};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    CreateColumn {
        id: Id,
        board: Id,
        title: String,
        timestamp: u64,
    },
    RenameColumn {
        id: Id,
        title: String,
        timestamp: u64,
    },
    MoveColumn {
        id: Id,
        order: Order,
        timestamp: u64,
    },
    DeleteColumn {
        id: Id,
        timestamp: u64,
    },
    CreateNote {
        id: Id,
        board: Id,
        column: Id,
        body: String,
        order: Order,
        timestamp: u64,
    },
    EditNote {
        id: Id,
        body: String,
        timestamp: u64,
    },
    MoveNote {
        id: Id,
        column: Id,
        order: Order,
        timestamp: u64,
    },
    DeleteNote {
        id: Id,
        timestamp: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    CreateColumn,
    RenameColumn,
    MoveColumn,
    DeleteColumn,
    CreateNote,
    EditNote,
    MoveNote,
    DeleteNote,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::CreateColumn => "createColumn",
            MutationKind::RenameColumn => "renameColumn",
            MutationKind::MoveColumn => "moveColumn",
            MutationKind::DeleteColumn => "deleteColumn",
            MutationKind::CreateNote => "createNote",
            MutationKind::EditNote => "editNote",
            MutationKind::MoveNote => "moveNote",
            MutationKind::DeleteNote => "deleteNote",
        }
    }
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::CreateColumn { .. } => MutationKind::CreateColumn,
            Mutation::RenameColumn { .. } => MutationKind::RenameColumn,
            Mutation::MoveColumn { .. } => MutationKind::MoveColumn,
            Mutation::DeleteColumn { .. } => MutationKind::DeleteColumn,
            Mutation::CreateNote { .. } => MutationKind::CreateNote,
            Mutation::EditNote { .. } => MutationKind::EditNote,
            Mutation::MoveNote { .. } => MutationKind::MoveNote,
            Mutation::DeleteNote { .. } => MutationKind::DeleteNote,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            Mutation::CreateColumn { timestamp, .. }
            | Mutation::RenameColumn { timestamp, .. }
            | Mutation::MoveColumn { timestamp, .. }
            | Mutation::DeleteColumn { timestamp, .. }
            | Mutation::CreateNote { timestamp, .. }
            | Mutation::EditNote { timestamp, .. }
            | Mutation::MoveNote { timestamp, .. }
            | Mutation::DeleteNote { timestamp, .. } => *timestamp,
        }
    }

    /// Id of the column or note the mutation targets.
    pub fn target(&self) -> &str {
        match self {
            Mutation::CreateColumn { id, .. }
            | Mutation::RenameColumn { id, .. }
            | Mutation::MoveColumn { id, .. }
            | Mutation::DeleteColumn { id, .. }
            | Mutation::CreateNote { id, .. }
            | Mutation::EditNote { id, .. }
            | Mutation::MoveNote { id, .. }
            | Mutation::DeleteNote { id, .. } => id,
        }
    }

    pub fn targets_note(&self) -> bool {
        matches!(
            self,
            Mutation::CreateNote { .. }
                | Mutation::EditNote { .. }
                | Mutation::MoveNote { .. }
                | Mutation::DeleteNote { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_json_shape() {
        let m = Mutation::MoveNote {
            id: "n1".to_string(),
            column: "c1".to_string(),
            order: 3.0,
            timestamp: 42,
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["type"], "moveNote");
        assert_eq!(json["id"], "n1");
        assert_eq!(json["timestamp"], 42);
    }

    #[test]
    fn test_mutation_parses_tagged_json() {
        let m: Mutation =
            serde_json::from_str(r#"{"type":"deleteColumn","id":"c9","timestamp":7}"#).unwrap();
        assert_eq!(
            m,
            Mutation::DeleteColumn {
                id: "c9".to_string(),
                timestamp: 7
            }
        );
        assert_eq!(m.kind(), MutationKind::DeleteColumn);
        assert_eq!(m.kind().to_string(), "deleteColumn");
        assert_eq!(m.target(), "c9");
        assert!(!m.targets_note());
    }
}
