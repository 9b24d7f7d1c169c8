//! Tests for graph construction.
//!
//! These tests verify:
//! - Registration order and default entry point
//! - Explicit entry point override
//! - Fatal configuration errors
//! - The fluent builder

use pageflow_graph::graph::{ConfigurationError, Graph};
use pageflow_graph::node::{Node, NodeId};

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_graph_has_no_entry() {
    let graph = Graph::build([], None).unwrap();

    assert!(graph.is_empty());
    assert_eq!(graph.node_count(), 0);
    assert!(graph.entry_point().is_none());
}

#[test]
fn nodes_keep_registration_order() {
    let graph = Graph::build([Node::new("z"), Node::new("a"), Node::new("m")], None).unwrap();

    let ids: Vec<&str> = graph.node_ids().map(NodeId::as_str).collect();
    assert_eq!(ids, vec!["z", "a", "m"]);
}

#[test]
fn first_registered_node_is_default_entry() {
    let graph = Graph::build([Node::new("intro"), Node::new("details")], None).unwrap();
    assert_eq!(graph.entry_point().map(NodeId::as_str), Some("intro"));
}

#[test]
fn explicit_entry_point_wins() {
    let graph = Graph::build(
        [Node::new("intro"), Node::new("details")],
        Some("details".into()),
    )
    .unwrap();

    assert!(graph.is_entry_point("details"));
    assert!(!graph.is_entry_point("intro"));
}

#[test]
fn lookup_by_id() {
    let graph = Graph::build([Node::new("a").with_next("b"), Node::new("b")], None).unwrap();

    assert!(graph.contains("a"));
    assert!(!graph.contains("zzz"));
    assert_eq!(
        graph.get_node("a").and_then(Node::fixed_next).map(NodeId::as_str),
        Some("b")
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn duplicate_node_is_fatal() {
    let result = Graph::build([Node::new("a"), Node::new("b"), Node::new("a")], None);

    assert!(matches!(
        result,
        Err(ConfigurationError::DuplicateNode(ref id)) if id == "a"
    ));
}

#[test]
fn unknown_entry_point_is_fatal() {
    let result = Graph::build([Node::new("a")], Some("zzz".into()));

    let err = result.unwrap_err();
    assert_eq!(err, ConfigurationError::UnknownEntryPoint("zzz".into()));
    assert_eq!(err.to_string(), "entry point references unknown node: zzz");
}

#[test]
fn explicit_entry_point_on_empty_graph_is_fatal() {
    let result = Graph::build([], Some("start".into()));
    assert!(matches!(result, Err(ConfigurationError::UnknownEntryPoint(_))));
}

#[test]
fn duplicate_error_display() {
    let err = ConfigurationError::DuplicateNode("intro".into());
    assert_eq!(format!("{err}"), "duplicate node id: intro");
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn builder_chains_pages() {
    let graph = Graph::builder()
        .add_page(Node::new("a").with_next("b"))
        .add_page(Node::new("b").with_previous("a").with_next("c"))
        .add_page(Node::new("c").with_previous("b"))
        .entry_point("b")
        .build()
        .unwrap();

    assert_eq!(graph.node_count(), 3);
    assert!(graph.is_entry_point("b"));
}

#[test]
fn builder_reports_duplicates() {
    let result = Graph::builder()
        .add_page(Node::new("a"))
        .add_page(Node::new("a"))
        .build();

    assert!(matches!(result, Err(ConfigurationError::DuplicateNode(_))));
}
