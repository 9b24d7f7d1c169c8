//! Skip-aware navigation resolution.
//!
//! Every function here is pure: the answer depends only on the graph, the
//! starting page and the accumulated state passed in. Broken references and
//! skip cycles never fail; they resolve to `None` and emit a warning.

use hashbrown::HashSet;

use crate::graph::Graph;
use crate::node::{Next, Node, NodeId};
use crate::state::AccumulatedState;

/// Returns the node's direct successor without applying any skip logic.
#[must_use]
pub fn resolve_next(node: &Node, state: &AccumulatedState) -> Option<NodeId> {
    match node.next.as_ref()? {
        Next::Fixed(id) => Some(id.clone()),
        Next::Computed(router) => router.route(state),
    }
}

/// Returns true if the page exists and its skip predicate holds.
#[must_use]
pub fn should_skip(graph: &Graph, id: &str, state: &AccumulatedState) -> bool {
    graph
        .get_node(id)
        .and_then(|node| node.should_skip.as_ref())
        .is_some_and(|predicate| predicate.evaluate(state))
}

/// Walks forward from `id` (inclusive) to the first page that is not skipped.
///
/// Returns `None` when a skipped page has no successor, when a successor is
/// not part of the graph, or when the walk revisits a page.
#[must_use]
pub fn next_non_skipped(graph: &Graph, id: &NodeId, state: &AccumulatedState) -> Option<NodeId> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut cursor = id.clone();

    loop {
        if !visited.insert(cursor.clone()) {
            tracing::warn!(
                page = %cursor,
                start = %id,
                "skip cycle detected while resolving next page"
            );
            return None;
        }
        if !should_skip(graph, &cursor, state) {
            return Some(cursor);
        }

        let node = graph.get_node(&cursor)?;
        let next = resolve_next(node, state)?;
        if !graph.contains(&next) {
            tracing::warn!(
                page = %cursor,
                target = %next,
                "skipped page points at unknown next page"
            );
            return None;
        }
        cursor = next;
    }
}

/// Resolves the page after `current`, skipping pages whose predicate holds.
///
/// The direct successor is itself subject to the skip walk.
#[must_use]
pub fn get_next_page(graph: &Graph, current: &str, state: &AccumulatedState) -> Option<NodeId> {
    let node = graph.get_node(current)?;
    let next = resolve_next(node, state)?;
    if !graph.contains(&next) {
        tracing::warn!(page = %current, target = %next, "next page is not part of the graph");
        return None;
    }
    next_non_skipped(graph, &next, state)
}

/// Walks backwards through previous fallbacks from `id` (exclusive) to the
/// first page that is not skipped.
///
/// Only skipped pages are walked through, so a page that falls back to itself
/// resolves to itself unless it is skipped.
#[must_use]
pub fn previous_non_skipped(
    graph: &Graph,
    id: &NodeId,
    state: &AccumulatedState,
) -> Option<NodeId> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    visited.insert(id.clone());
    let mut cursor = id.clone();

    loop {
        let previous = graph.get_node(&cursor)?.previous_fallback.clone()?;
        if !graph.contains(&previous) {
            tracing::warn!(
                page = %cursor,
                target = %previous,
                "previous fallback is not part of the graph"
            );
            return None;
        }
        if !should_skip(graph, &previous, state) {
            return Some(previous);
        }
        if !visited.insert(previous.clone()) {
            tracing::warn!(
                page = %previous,
                start = %id,
                "skip cycle detected while resolving previous page"
            );
            return None;
        }
        cursor = previous;
    }
}

/// Resolves the page before `current`, skipping pages whose predicate holds.
#[must_use]
pub fn get_previous_page(graph: &Graph, current: &str, state: &AccumulatedState) -> Option<NodeId> {
    let node = graph.get_node(current)?;
    let previous = node.previous_fallback.as_ref()?;
    if !graph.contains(previous) {
        tracing::warn!(
            page = %current,
            target = %previous,
            "previous fallback is not part of the graph"
        );
        return None;
    }
    previous_non_skipped(graph, &node.id, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> Graph {
        Graph::build(
            [
                Node::new("a").with_next("b"),
                Node::new("b").with_next("c").with_previous("a"),
                Node::new("c").with_previous("b"),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn resolve_next_without_successor_is_none() {
        let graph = linear();
        let last = graph.get_node("c").unwrap();
        assert_eq!(resolve_next(last, &AccumulatedState::new()), None);
    }

    #[test]
    fn should_skip_is_false_for_missing_page() {
        assert!(!should_skip(&linear(), "zzz", &AccumulatedState::new()));
    }

    #[test]
    fn next_and_previous_on_plain_chain() {
        let graph = linear();
        let state = AccumulatedState::new();

        assert_eq!(get_next_page(&graph, "a", &state), Some("b".into()));
        assert_eq!(get_next_page(&graph, "c", &state), None);
        assert_eq!(get_previous_page(&graph, "c", &state), Some("b".into()));
        assert_eq!(get_previous_page(&graph, "a", &state), None);
    }

    #[test]
    fn self_referencing_previous_resolves_to_itself() {
        let graph = Graph::build([Node::new("a").with_previous("a")], None).unwrap();
        let state = AccumulatedState::new();

        let start = NodeId::from("a");
        assert_eq!(previous_non_skipped(&graph, &start, &state), Some(start));
        assert_eq!(get_previous_page(&graph, "a", &state), Some("a".into()));
    }

    #[test]
    fn next_non_skipped_is_inclusive() {
        let graph = linear();
        let start = NodeId::from("b");
        assert_eq!(
            next_non_skipped(&graph, &start, &AccumulatedState::new()),
            Some(start)
        );
    }
}
