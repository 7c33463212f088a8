/// Identity-preserving merge of a recomputed item list into the displayed one.
///
/// Items are matched by id. When the new value equals the displayed value the
/// displayed `Arc` is reused, so a view comparing pointers only re-renders
/// what actually changed. Output order follows the new list.
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{Column, Note};

/// Something with a stable id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Column {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Note {
    fn key(&self) -> &str {
        &self.id
    }
}

/// What a merge did, per item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl ChangeSummary {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.modified == 0 && self.removed == 0
    }

    pub fn merge(self, other: ChangeSummary) -> ChangeSummary {
        ChangeSummary {
            added: self.added + other.added,
            modified: self.modified + other.modified,
            removed: self.removed + other.removed,
            unchanged: self.unchanged + other.unchanged,
        }
    }
}

/// Merge `next` into `previous`, reusing previous allocations for equal items.
pub fn reconcile_items<T>(previous: &[Arc<T>], next: Vec<T>) -> (Vec<Arc<T>>, ChangeSummary)
where
    T: Keyed + PartialEq,
{
    let by_key: HashMap<&str, &Arc<T>> = previous.iter().map(|item| (item.key(), item)).collect();
    let mut summary = ChangeSummary::default();
    let mut seen = 0;

    let merged = next
        .into_iter()
        .map(|item| match by_key.get(item.key()) {
            Some(existing) if ***existing == item => {
                seen += 1;
                summary.unchanged += 1;
                Arc::clone(existing)
            }
            Some(_) => {
                seen += 1;
                summary.modified += 1;
                Arc::new(item)
            }
            None => {
                summary.added += 1;
                Arc::new(item)
            }
        })
        .collect();

    summary.removed = by_key.len().saturating_sub(seen);
    (merged, summary)
}
