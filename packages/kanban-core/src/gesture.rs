/// Drag-and-drop and form helpers.
///
/// Turns "the user dropped X here" into the port input to submit, using the
/// orders of the items around the drop point. Returns `None` when the drop
/// would leave everything where it is.
use crate::mutation::input::{CreateColumnInput, CreateNoteInput, MoveColumnInput, MoveNoteInput};
use crate::order::{self, RankError};
use crate::types::{new_id, Column, Note};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GestureError {
    #[error("cannot place item: {0}")]
    Rank(#[from] RankError),
}

/// Which half of the target card the pointer was over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEdge {
    Top,
    Bottom,
}

/// A note dropped onto another note. `previous`/`next` are the target's
/// neighbours in its column.
pub fn drop_note_on_note(
    dragged: &str,
    target: &Note,
    previous: Option<&Note>,
    next: Option<&Note>,
    edge: DropEdge,
    timestamp: u64,
) -> Result<Option<MoveNoteInput>, GestureError> {
    if dragged == target.id {
        return Ok(None);
    }
    let order = match edge {
        DropEdge::Top => {
            if previous.is_some_and(|p| p.id == dragged) {
                return Ok(None);
            }
            order::rank_one(previous.map(|p| p.order), Some(target.order))?
        }
        DropEdge::Bottom => {
            if next.is_some_and(|n| n.id == dragged) {
                return Ok(None);
            }
            order::rank_one(Some(target.order), next.map(|n| n.order))?
        }
    };
    Ok(Some(MoveNoteInput {
        note: dragged.to_string(),
        column: target.column.clone(),
        order,
        timestamp,
    }))
}

/// A note dropped on a column's body: append after its last note.
/// `notes_in_column` must be ordered.
pub fn drop_note_on_column(
    dragged: &str,
    column: &Column,
    notes_in_column: &[&Note],
    timestamp: u64,
) -> Result<Option<MoveNoteInput>, GestureError> {
    if notes_in_column.iter().any(|n| n.id == dragged) {
        return Ok(None);
    }
    let order = order::rank_one(notes_in_column.last().map(|n| n.order), None)?;
    Ok(Some(MoveNoteInput {
        note: dragged.to_string(),
        column: column.id.clone(),
        order,
        timestamp,
    }))
}

/// A column dropped into the gap between `left` and `right`.
pub fn drop_column_in_gap(
    dragged: &str,
    left: Option<&Column>,
    right: Option<&Column>,
    timestamp: u64,
) -> Result<Option<MoveColumnInput>, GestureError> {
    if left.is_some_and(|c| c.id == dragged) || right.is_some_and(|c| c.id == dragged) {
        return Ok(None);
    }
    let order = order::rank_one(left.map(|c| c.order), right.map(|c| c.order))?;
    Ok(Some(MoveColumnInput {
        column: dragged.to_string(),
        order,
        timestamp,
    }))
}

/// Input for the "add note" form at the bottom of a column.
pub fn new_note(
    board: &str,
    column: &str,
    body: &str,
    sibling_count: usize,
    timestamp: u64,
) -> CreateNoteInput {
    CreateNoteInput {
        id: new_id(),
        board: board.to_string(),
        column: column.to_string(),
        body: body.to_string(),
        order: order::append_order(sibling_count),
        timestamp,
    }
}

/// Input for the "add column" form.
pub fn new_column(board: &str, title: &str, timestamp: u64) -> CreateColumnInput {
    CreateColumnInput {
        id: new_id(),
        board: board.to_string(),
        title: title.to_string(),
        timestamp,
    }
}
