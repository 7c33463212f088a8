/// In-flight submission tracking.
///
/// Every call into a submission port is recorded here with its original input
/// until the caller drops it. A submission is pending from `submit` until
/// `settle`; settled submissions stay visible (with their outcome) until
/// `prune_settled` clears them.
use std::sync::atomic::{AtomicU64, Ordering};

use crate::mutation::input::*;
use crate::mutation::MutationKind;

static NEXT_SUBMISSION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(u64);

impl SubmissionId {
    fn next() -> Self {
        Self(NEXT_SUBMISSION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Pending,
    Settled,
    Failed(String),
}

/// How a submission ended, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Confirmed,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Submission<A> {
    pub id: SubmissionId,
    pub input: A,
    pub status: SubmissionStatus,
}

impl<A> Submission<A> {
    pub fn pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }
}

/// Submissions of a single port, in submit order.
#[derive(Debug, Clone)]
pub struct SubmissionQueue<A> {
    entries: Vec<Submission<A>>,
}

impl<A> Default for SubmissionQueue<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A: MutationInput> SubmissionQueue<A> {
    pub fn values(&self) -> impl Iterator<Item = &Submission<A>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, input: A) -> SubmissionId {
        let id = SubmissionId::next();
        self.entries.push(Submission {
            id,
            input,
            status: SubmissionStatus::Pending,
        });
        id
    }

    fn settle(&mut self, id: SubmissionId, status: &SubmissionStatus) -> bool {
        match self.entries.iter_mut().find(|s| s.id == id) {
            Some(entry) if entry.pending() => {
                entry.status = status.clone();
                true
            }
            _ => false,
        }
    }

    fn prune_settled(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|s| s.pending());
        before - self.entries.len()
    }

    fn pending_count(&self) -> usize {
        self.entries.iter().filter(|s| s.pending()).count()
    }
}

/// Routes a port input type to its queue inside the registry.
pub trait Port: MutationInput {
    fn queue(registry: &SubmissionRegistry) -> &SubmissionQueue<Self>;
    fn queue_mut(registry: &mut SubmissionRegistry) -> &mut SubmissionQueue<Self>;
}

macro_rules! ports {
    ($($field:ident: $input:ty),* $(,)?) => {
        /// One submission queue per mutation kind.
        #[derive(Debug, Clone, Default)]
        pub struct SubmissionRegistry {
            $(pub $field: SubmissionQueue<$input>,)*
        }

        $(
            impl Port for $input {
                fn queue(registry: &SubmissionRegistry) -> &SubmissionQueue<Self> {
                    &registry.$field
                }

                fn queue_mut(registry: &mut SubmissionRegistry) -> &mut SubmissionQueue<Self> {
                    &mut registry.$field
                }
            }
        )*

        impl SubmissionRegistry {
            /// Mark a submission as settled or failed. Returns false when the id
            /// is unknown or already settled.
            pub fn settle(&mut self, id: SubmissionId, outcome: Outcome) -> bool {
                let status = match outcome {
                    Outcome::Confirmed => SubmissionStatus::Settled,
                    Outcome::Failed(reason) => SubmissionStatus::Failed(reason),
                };
                $(if self.$field.settle(id, &status) { return true; })*
                false
            }

            /// Drop every submission that is no longer pending.
            pub fn prune_settled(&mut self) -> usize {
                0 $(+ self.$field.prune_settled())*
            }

            pub fn pending_count(&self) -> usize {
                0 $(+ self.$field.pending_count())*
            }
        }
    };
}

ports! {
    create_column: CreateColumnInput,
    rename_column: RenameColumnInput,
    move_column: MoveColumnInput,
    delete_column: DeleteColumnInput,
    create_note: CreateNoteInput,
    edit_note: EditNoteInput,
    move_note: MoveNoteInput,
    delete_note: DeleteNoteInput,
}

impl SubmissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new in-flight call on the port matching `A`.
    pub fn submit<A: Port>(&mut self, input: A) -> SubmissionId {
        let id = A::queue_mut(self).push(input);
        log::debug!("submission {} pending on {}", id.get(), A::KIND);
        id
    }

    pub fn queue<A: Port>(&self) -> &SubmissionQueue<A> {
        A::queue(self)
    }

    pub fn kind_of(&self, id: SubmissionId) -> Option<MutationKind> {
        fn has<A: Port>(registry: &SubmissionRegistry, id: SubmissionId) -> bool {
            A::queue(registry).values().any(|s| s.id == id)
        }
        [
            (has::<CreateColumnInput>(self, id), CreateColumnInput::KIND),
            (has::<RenameColumnInput>(self, id), RenameColumnInput::KIND),
            (has::<MoveColumnInput>(self, id), MoveColumnInput::KIND),
            (has::<DeleteColumnInput>(self, id), DeleteColumnInput::KIND),
            (has::<CreateNoteInput>(self, id), CreateNoteInput::KIND),
            (has::<EditNoteInput>(self, id), EditNoteInput::KIND),
            (has::<MoveNoteInput>(self, id), MoveNoteInput::KIND),
            (has::<DeleteNoteInput>(self, id), DeleteNoteInput::KIND),
        ]
        .into_iter()
        .find_map(|(found, kind)| found.then_some(kind))
    }
}
