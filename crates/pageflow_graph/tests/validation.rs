//! Tests for graph validation.
//!
//! These tests verify `Graph::validate()` and the standalone `validate()`:
//! - Entry point validation
//! - Dangling next/previous references
//! - Error display formatting

use pageflow_graph::graph::{Graph, ValidationError, validate};
use pageflow_graph::node::{Node, NodeId};

// ─────────────────────────────────────────────────────────────────────────────
// Entry Point Validation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_empty_graph_fails() {
    let graph = Graph::new();
    let errors = graph.validate().unwrap_err();

    assert!(
        errors
            .iter()
            .any(|err| matches!(err, ValidationError::NoEntryPoint))
    );
}

#[test]
fn validate_unknown_entry_point_before_build() {
    let nodes = [Node::new("a")];
    let entry = NodeId::from("zzz");

    let errors = validate(&nodes, Some(&entry)).unwrap_err();
    assert_eq!(errors, vec![ValidationError::InvalidEntryPoint(entry)]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Valid Graph Structures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_linear_graph_succeeds() {
    let graph = Graph::build(
        [
            Node::new("a").with_next("b"),
            Node::new("b").with_previous("a"),
        ],
        None,
    )
    .unwrap();

    let result = graph.validate();
    assert!(result.is_ok(), "Validation failed: {:?}", result.err());
}

#[test]
fn computed_successors_are_not_checked() {
    let graph = Graph::build(
        [Node::new("a").with_computed_next(|_| Some("anywhere"))],
        None,
    )
    .unwrap();

    assert!(graph.validate().is_ok());
}

// ─────────────────────────────────────────────────────────────────────────────
// Dangling References
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_reports_every_dangling_reference() {
    let graph = Graph::build(
        [
            Node::new("a").with_next("ghost"),
            Node::new("b").with_previous("phantom").with_next("a"),
        ],
        None,
    )
    .unwrap();

    let errors = graph.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors.contains(&ValidationError::DanglingNext {
        node: "a".into(),
        target: "ghost".into(),
    }));
    assert!(errors.contains(&ValidationError::DanglingPrevious {
        node: "b".into(),
        target: "phantom".into(),
    }));
}

#[test]
fn validate_does_not_mutate() {
    let graph = Graph::build([Node::new("a").with_next("ghost")], None).unwrap();

    let first = graph.validate();
    let second = graph.validate();
    assert_eq!(first, second);
    assert_eq!(graph.node_count(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Error Display Formatting
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validation_error_no_entry_point_display() {
    let err = ValidationError::NoEntryPoint;
    assert_eq!(format!("{err}"), "graph has no entry point");
}

#[test]
fn validation_error_invalid_entry_point_display() {
    let err = ValidationError::InvalidEntryPoint("start".into());
    assert_eq!(format!("{err}"), "entry point references invalid node: start");
}

#[test]
fn validation_error_dangling_display() {
    let next = ValidationError::DanglingNext {
        node: "a".into(),
        target: "ghost".into(),
    };
    assert_eq!(format!("{next}"), "node a has next pointing to invalid node: ghost");

    let previous = ValidationError::DanglingPrevious {
        node: "b".into(),
        target: "phantom".into(),
    };
    assert_eq!(
        format!("{previous}"),
        "node b has previous fallback pointing to invalid node: phantom"
    );
}
