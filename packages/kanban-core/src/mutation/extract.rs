/// Mutation log extraction.
///
/// Projects the registry's in-flight submissions into one flat list of
/// [`Mutation`]s. Settled and failed submissions are skipped. The output is
/// grouped by port, not sorted; the reducer orders by timestamp.
use super::input::MutationInput;
use super::Mutation;
use crate::transport::registry::{Port, Submission, SubmissionRegistry};

/// Mutations of every still-pending submission in `submissions`.
pub fn extract_pending<'a, A, I>(submissions: I) -> impl Iterator<Item = Mutation> + 'a
where
    A: MutationInput,
    I: IntoIterator<Item = &'a Submission<A>>,
    I::IntoIter: 'a,
{
    submissions
        .into_iter()
        .filter(|s| s.pending())
        .map(|s| s.input.to_mutation())
}

fn push_port<A: Port>(registry: &SubmissionRegistry, out: &mut Vec<Mutation>) {
    out.extend(extract_pending(registry.queue::<A>().values()));
}

/// The full in-flight mutation log across all eight ports.
pub fn mutation_log(registry: &SubmissionRegistry) -> Vec<Mutation> {
    use super::input::*;

    let mut mutations = Vec::with_capacity(registry.pending_count());
    push_port::<CreateNoteInput>(registry, &mut mutations);
    push_port::<EditNoteInput>(registry, &mut mutations);
    push_port::<MoveNoteInput>(registry, &mut mutations);
    push_port::<DeleteNoteInput>(registry, &mut mutations);
    push_port::<CreateColumnInput>(registry, &mut mutations);
    push_port::<RenameColumnInput>(registry, &mut mutations);
    push_port::<MoveColumnInput>(registry, &mut mutations);
    push_port::<DeleteColumnInput>(registry, &mut mutations);
    mutations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::input::*;
    use crate::mutation::MutationKind;
    use crate::transport::registry::Outcome;

    #[test]
    fn test_empty_registry_yields_empty_log() {
        assert!(mutation_log(&SubmissionRegistry::new()).is_empty());
    }

    #[test]
    fn test_log_skips_settled_submissions() {
        let mut registry = SubmissionRegistry::new();
        let settled = registry.submit(EditNoteInput {
            id: "n1".to_string(),
            content: "old".to_string(),
            timestamp: 1,
        });
        registry.submit(EditNoteInput {
            id: "n1".to_string(),
            content: "new".to_string(),
            timestamp: 2,
        });
        registry.settle(settled, Outcome::Confirmed);

        let log = mutation_log(&registry);
        assert_eq!(
            log,
            vec![Mutation::EditNote {
                id: "n1".to_string(),
                body: "new".to_string(),
                timestamp: 2
            }]
        );
    }

    #[test]
    fn test_log_covers_every_port() {
        let mut registry = SubmissionRegistry::new();
        registry.submit(CreateColumnInput {
            id: "c1".to_string(),
            board: "b".to_string(),
            title: "Todo".to_string(),
            timestamp: 1,
        });
        registry.submit(RenameColumnInput {
            id: "c1".to_string(),
            title: "Doing".to_string(),
            timestamp: 2,
        });
        registry.submit(MoveColumnInput {
            column: "c1".to_string(),
            order: 0.5,
            timestamp: 3,
        });
        registry.submit(DeleteColumnInput {
            id: "c0".to_string(),
            timestamp: 4,
        });
        registry.submit(CreateNoteInput {
            id: "n1".to_string(),
            board: "b".to_string(),
            column: "c1".to_string(),
            body: "Note".to_string(),
            order: 1.0,
            timestamp: 5,
        });
        registry.submit(EditNoteInput {
            id: "n1".to_string(),
            content: "Edited".to_string(),
            timestamp: 6,
        });
        registry.submit(MoveNoteInput {
            note: "n1".to_string(),
            column: "c1".to_string(),
            order: 2.0,
            timestamp: 7,
        });
        registry.submit(DeleteNoteInput {
            id: "n0".to_string(),
            timestamp: 8,
        });

        let log = mutation_log(&registry);
        assert_eq!(log.len(), 8);
        let mut kinds: Vec<MutationKind> = log.iter().map(Mutation::kind).collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds.dedup();
        assert_eq!(kinds.len(), 8);
    }

    #[test]
    fn test_extract_pending_on_plain_slice() {
        let mut registry = SubmissionRegistry::new();
        let first = registry.submit(DeleteNoteInput {
            id: "a".to_string(),
            timestamp: 1,
        });
        registry.submit(DeleteNoteInput {
            id: "b".to_string(),
            timestamp: 2,
        });
        registry.settle(first, Outcome::Failed("offline".to_string()));

        let targets: Vec<String> = extract_pending(registry.delete_note.values())
            .map(|m| m.target().to_string())
            .collect();
        assert_eq!(targets, vec!["b".to_string()]);
    }
}
