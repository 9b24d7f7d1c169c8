//! Graph structure and builder API.
//!
//! The `Graph` is the immutable-after-build set of pages a flow is made of,
//! plus the page the flow starts at.

use hashbrown::{HashMap, HashSet};

use crate::node::{Next, Node, NodeId};
use crate::resolver::resolve_next;
use crate::state::AccumulatedState;

/// Errors that make a graph impossible to construct.
///
/// These are programmer errors and are reported by [`Graph::build`] before
/// any navigation happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Two pages were registered with the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),
    /// The explicit entry point is not one of the registered pages.
    #[error("entry point references unknown node: {0}")]
    UnknownEntryPoint(NodeId),
}

/// A directed graph of pages defining a multi-step flow.
///
/// Each graph contains:
/// - **Nodes**: Pages, in registration order
/// - **Entry**: The page a fresh flow starts at
///
/// # Example
///
/// ```
/// use pageflow_graph::graph::Graph;
/// use pageflow_graph::node::Node;
///
/// let graph = Graph::builder()
///     .add_page(Node::new("intro").with_next("details"))
///     .add_page(Node::new("details").with_previous("intro"))
///     .build()
///     .unwrap();
///
/// assert_eq!(graph.entry_point().map(|id| id.as_str()), Some("intro"));
/// ```
#[derive(Debug, Default)]
pub struct Graph {
    /// All pages in registration order.
    nodes: Vec<Node>,
    /// Position of each page in `nodes`.
    index: HashMap<NodeId, usize>,
    /// Page a fresh flow starts at.
    entry: Option<NodeId>,
}

impl Graph {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for fluent graph construction.
    #[must_use]
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Builds a graph from pages in registration order.
    ///
    /// The first registered page becomes the entry point unless
    /// `entry_point` names one explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateNode`] if two pages share an id,
    /// and [`ConfigurationError::UnknownEntryPoint`] if the explicit entry
    /// point is not among the pages.
    pub fn build(
        nodes: impl IntoIterator<Item = Node>,
        entry_point: Option<NodeId>,
    ) -> Result<Self, ConfigurationError> {
        let mut graph = Self {
            entry: entry_point,
            ..Self::default()
        };

        for node in nodes {
            graph.register(node)?;
        }

        if let Some(entry) = &graph.entry
            && !graph.contains(entry)
        {
            return Err(ConfigurationError::UnknownEntryPoint(entry.clone()));
        }

        Ok(graph)
    }

    fn register(&mut self, node: Node) -> Result<(), ConfigurationError> {
        if self.index.contains_key(&node.id) {
            return Err(ConfigurationError::DuplicateNode(node.id));
        }

        // Set as entry if first node
        if self.entry.is_none() {
            self.entry = Some(node.id.clone());
        }

        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Returns all pages in registration order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the ids of all pages in registration order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|node| &node.id)
    }

    /// Returns the entry point, if the graph has one.
    #[must_use]
    pub fn entry_point(&self) -> Option<&NodeId> {
        self.entry.as_ref()
    }

    /// Returns true if `id` is the entry point.
    #[must_use]
    pub fn is_entry_point(&self, id: &str) -> bool {
        self.entry.as_ref().is_some_and(|entry| entry == id)
    }

    /// Returns the number of pages in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Gets a page by id.
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    /// Returns true if a page with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns every page id in flow order.
    ///
    /// The order is the entry point's chain of previous fallbacks (furthest
    /// first), then the entry point, then its chain of successors, then every
    /// page not reached that way in registration order. Computed successors
    /// are evaluated against empty state.
    #[must_use]
    pub fn traversal_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut seen: HashSet<NodeId> = HashSet::with_capacity(self.nodes.len());

        if let Some(entry) = self.entry.as_ref().and_then(|id| self.get_node(id)) {
            seen.insert(entry.id.clone());

            let mut predecessors = Vec::new();
            let mut cursor = entry.previous_fallback.as_ref();
            while let Some(node) = cursor.and_then(|id| self.get_node(id)) {
                if !seen.insert(node.id.clone()) {
                    break;
                }
                predecessors.push(node.id.clone());
                cursor = node.previous_fallback.as_ref();
            }
            order.extend(predecessors.into_iter().rev());
            order.push(entry.id.clone());

            let empty = AccumulatedState::new();
            let mut cursor = resolve_next(entry, &empty);
            while let Some(node) = cursor.as_deref().and_then(|id| self.get_node(id)) {
                if !seen.insert(node.id.clone()) {
                    break;
                }
                order.push(node.id.clone());
                cursor = resolve_next(node, &empty);
            }
        }

        for node in &self.nodes {
            if seen.insert(node.id.clone()) {
                order.push(node.id.clone());
            }
        }

        order
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation API
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates the graph's references without mutating anything.
    ///
    /// Dangling references are tolerated at runtime (resolution degrades to
    /// "no page"), so this is a static check callers opt into.
    ///
    /// # Example
    ///
    /// ```
    /// use pageflow_graph::graph::Graph;
    /// use pageflow_graph::node::Node;
    ///
    /// let graph = Graph::build([Node::new("a").with_next("missing")], None).unwrap();
    ///
    /// if let Err(errors) = graph.validate() {
    ///     for error in errors {
    ///         eprintln!("Validation error: {error}");
    ///     }
    /// }
    /// ```
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validate(&self.nodes, self.entry.as_ref())
    }
}

/// Validates pages and an entry point before (or without) building a graph.
///
/// Checks that an entry point exists and refers to a page, and that every
/// fixed successor and previous fallback refers to a page. Computed
/// successors cannot be checked statically.
///
/// # Errors
///
/// Returns every problem found.
pub fn validate(nodes: &[Node], entry_point: Option<&NodeId>) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Build a set of valid node IDs for quick lookup
    let valid_nodes: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();

    match entry_point.or_else(|| nodes.first().map(|node| &node.id)) {
        None => errors.push(ValidationError::NoEntryPoint),
        Some(entry) if !valid_nodes.contains(entry.as_str()) => {
            errors.push(ValidationError::InvalidEntryPoint(entry.clone()));
        }
        Some(_) => {}
    }

    for node in nodes {
        if let Some(Next::Fixed(target)) = &node.next
            && !valid_nodes.contains(target.as_str())
        {
            errors.push(ValidationError::DanglingNext {
                node: node.id.clone(),
                target: target.clone(),
            });
        }
        if let Some(target) = &node.previous_fallback
            && !valid_nodes.contains(target.as_str())
        {
            errors.push(ValidationError::DanglingPrevious {
                node: node.id.clone(),
                target: target.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Referential problems found by [`Graph::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The graph has no entry point.
    NoEntryPoint,
    /// The entry point references an invalid node.
    InvalidEntryPoint(NodeId),
    /// A fixed successor references an invalid node.
    DanglingNext {
        /// The page holding the reference.
        node: NodeId,
        /// The missing target.
        target: NodeId,
    },
    /// A previous fallback references an invalid node.
    DanglingPrevious {
        /// The page holding the reference.
        node: NodeId,
        /// The missing target.
        target: NodeId,
    },
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValidationError::NoEntryPoint => write!(f, "graph has no entry point"),
            ValidationError::InvalidEntryPoint(id) => {
                write!(f, "entry point references invalid node: {id}")
            }
            ValidationError::DanglingNext { node, target } => {
                write!(f, "node {node} has next pointing to invalid node: {target}")
            }
            ValidationError::DanglingPrevious { node, target } => {
                write!(
                    f,
                    "node {node} has previous fallback pointing to invalid node: {target}"
                )
            }
        }
    }
}

impl core::error::Error for ValidationError {}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Fluent front end over [`Graph::build`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    entry: Option<NodeId>,
}

impl GraphBuilder {
    /// Registers a page.
    pub fn add_page(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Overrides the default (first registered) entry point.
    pub fn entry_point(&mut self, id: impl Into<NodeId>) -> &mut Self {
        self.entry = Some(id.into());
        self
    }

    /// Builds the graph, leaving the builder empty.
    ///
    /// # Errors
    ///
    /// See [`Graph::build`].
    pub fn build(&mut self) -> Result<Graph, ConfigurationError> {
        Graph::build(core::mem::take(&mut self.nodes), self.entry.take())
    }
}
