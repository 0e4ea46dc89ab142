//! Graph builder with efficient edge handling
//!
//! This module provides a mutable graph builder that uses FxHashMap
//! for O(1) edge lookups during construction.

use crate::nlp::tokenizer::TokenStream;
use crate::types::CooccurrenceWeighting;
use rustc_hash::FxHashMap;

/// A node in the graph builder
#[derive(Debug, Clone)]
pub struct BuilderNode {
    /// The normalized term for this node
    pub term: String,
    /// Adjacency list: target node ID -> edge weight
    pub edges: FxHashMap<u32, f64>,
}

impl BuilderNode {
    /// Create a new node
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            edges: FxHashMap::default(),
        }
    }

    /// Sum of the weights of all edges touching this node
    pub fn weighted_degree(&self) -> f64 {
        self.edges.values().sum()
    }
}

/// A mutable graph builder optimized for incremental construction
#[derive(Debug, Default)]
pub struct GraphBuilder {
    /// Maps term -> node ID
    term_to_id: FxHashMap<String, u32>,
    /// Node storage
    nodes: Vec<BuilderNode>,
}

impl GraphBuilder {
    /// Create a new empty graph builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph builder with pre-allocated capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            term_to_id: FxHashMap::with_capacity_and_hasher(node_capacity, Default::default()),
            nodes: Vec::with_capacity(node_capacity),
        }
    }

    /// Get or create a node for the given term, returning its ID
    pub fn get_or_create_node(&mut self, term: &str) -> u32 {
        if let Some(&id) = self.term_to_id.get(term) {
            return id;
        }

        let id = self.nodes.len() as u32;
        self.term_to_id.insert(term.to_string(), id);
        self.nodes.push(BuilderNode::new(term));
        id
    }

    /// Add `weight` to the edge between two nodes
    ///
    /// If the edge doesn't exist, it's created.
    pub fn increment_edge(&mut self, from: u32, to: u32, weight: f64) {
        if from == to {
            return; // No self-loops
        }

        // Add edge in both directions (undirected graph)
        if let Some(node) = self.nodes.get_mut(from as usize) {
            *node.edges.entry(to).or_insert(0.0) += weight;
        }
        if let Some(node) = self.nodes.get_mut(to as usize) {
            *node.edges.entry(from).or_insert(0.0) += weight;
        }
    }

    /// Build a co-occurrence graph from a token stream
    ///
    /// Every distinct term becomes a node whose ID equals its term ID, even
    /// when it never co-occurs with anything. Two tokens at most
    /// `window_size` apart in the stream share an edge; stop-words removed
    /// by the tokenizer do not occupy window slots.
    pub fn from_stream(
        stream: &TokenStream,
        window_size: usize,
        weighting: CooccurrenceWeighting,
    ) -> Self {
        let mut builder = Self::with_capacity(stream.num_terms());
        for term in stream.terms() {
            builder.get_or_create_node(term);
        }

        let tokens = stream.tokens();
        for j in 0..tokens.len() {
            let window_end = j
                .saturating_add(window_size)
                .saturating_add(1)
                .min(tokens.len());
            for k in (j + 1)..window_end {
                builder.increment_edge(tokens[j].term, tokens[k].term, weighting.weight(k - j));
            }
        }

        builder
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Sum of all edge weights (counting each undirected edge once)
    pub fn total_edge_weight(&self) -> f64 {
        self.nodes.iter().map(BuilderNode::weighted_degree).sum::<f64>() / 2.0
    }

    /// Get a node by ID
    pub fn get_node(&self, id: u32) -> Option<&BuilderNode> {
        self.nodes.get(id as usize)
    }

    /// Get a node ID by term
    pub fn get_node_id(&self, term: &str) -> Option<u32> {
        self.term_to_id.get(term).copied()
    }

    /// Weight of the edge between two nodes, 0 if absent
    pub fn edge_weight(&self, a: u32, b: u32) -> f64 {
        self.get_node(a)
            .and_then(|n| n.edges.get(&b).copied())
            .unwrap_or(0.0)
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &BuilderNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::stopwords::StopwordFilter;
    use crate::nlp::tokenizer::Tokenizer;

    fn stream(text: &str) -> TokenStream {
        Tokenizer::new().stream(text)
    }

    fn edge_count(builder: &GraphBuilder) -> usize {
        builder.nodes().map(|(_, n)| n.edges.len()).sum::<usize>() / 2
    }

    fn build(text: &str, window: usize) -> GraphBuilder {
        GraphBuilder::from_stream(&stream(text), window, CooccurrenceWeighting::Count)
    }

    #[test]
    fn test_graph_builder_basic() {
        let mut builder = GraphBuilder::new();

        let id_a = builder.get_or_create_node("hate");
        let id_b = builder.get_or_create_node("speech");
        let id_c = builder.get_or_create_node("hate"); // duplicate

        assert_eq!(id_a, id_c);
        assert_ne!(id_a, id_b);
        assert_eq!(builder.node_count(), 2);
    }

    #[test]
    fn test_edge_incrementing() {
        let mut builder = GraphBuilder::new();

        let id_a = builder.get_or_create_node("hate");
        let id_b = builder.get_or_create_node("speech");

        builder.increment_edge(id_a, id_b, 1.0);
        builder.increment_edge(id_a, id_b, 1.0);

        // Should have weight 2.0 in both directions
        assert_eq!(builder.get_node(id_a).unwrap().edges.get(&id_b), Some(&2.0));
        assert_eq!(builder.get_node(id_b).unwrap().edges.get(&id_a), Some(&2.0));
    }

    #[test]
    fn test_self_loops_prevented() {
        let mut builder = GraphBuilder::new();
        let id_a = builder.get_or_create_node("test");

        builder.increment_edge(id_a, id_a, 1.0);

        let node = builder.get_node(id_a).unwrap();
        assert!(node.edges.is_empty());
    }

    #[test]
    fn test_cooccurrence_counts() {
        let builder = build("cat dog cat bird dog cat", 2);

        let cat = builder.get_node_id("cat").unwrap();
        let dog = builder.get_node_id("dog").unwrap();
        let bird = builder.get_node_id("bird").unwrap();

        assert_eq!(builder.node_count(), 3);
        assert_eq!(edge_count(&builder), 3);
        assert_eq!(builder.edge_weight(cat, dog), 4.0);
        assert_eq!(builder.edge_weight(dog, bird), 2.0);
        assert_eq!(builder.edge_weight(cat, bird), 2.0);
        assert_eq!(builder.total_edge_weight(), 8.0);
    }

    #[test]
    fn test_window_of_one_links_neighbours_only() {
        let builder = build("a b c", 1);

        assert_eq!(builder.edge_weight(0, 1), 1.0);
        assert_eq!(builder.edge_weight(1, 2), 1.0);
        assert_eq!(builder.edge_weight(0, 2), 0.0);
    }

    #[test]
    fn test_node_ids_follow_term_ids() {
        let s = stream("zeta alpha zeta mu");
        let builder = GraphBuilder::from_stream(&s, 2, CooccurrenceWeighting::Count);

        for (id, term) in s.terms().iter().enumerate() {
            assert_eq!(builder.get_node(id as u32).unwrap().term, *term);
        }
    }

    #[test]
    fn test_repeated_token_single_isolated_node() {
        let builder = build("spam spam spam spam", 3);

        assert_eq!(builder.node_count(), 1);
        assert_eq!(edge_count(&builder), 0);
    }

    #[test]
    fn test_isolated_node_kept() {
        let builder = build("solo", 2);

        assert_eq!(builder.node_count(), 1);
        assert!(builder.get_node(0).unwrap().edges.is_empty());
    }

    #[test]
    fn test_removed_stopwords_do_not_occupy_window() {
        let tokenizer = Tokenizer::with_stopwords(StopwordFilter::from_list(&["of"]));
        let s = tokenizer.stream("rise of trolls");
        let builder = GraphBuilder::from_stream(&s, 1, CooccurrenceWeighting::Count);

        let rise = builder.get_node_id("rise").unwrap();
        let trolls = builder.get_node_id("trolls").unwrap();
        assert_eq!(builder.edge_weight(rise, trolls), 1.0);
        assert_eq!(builder.get_node_id("of"), None);
    }

    #[test]
    fn test_inverse_distance_weighting() {
        let s = stream("a b c");
        let builder = GraphBuilder::from_stream(&s, 2, CooccurrenceWeighting::InverseDistance);

        assert_eq!(builder.edge_weight(0, 1), 1.0);
        assert_eq!(builder.edge_weight(0, 2), 0.5);
    }

    #[test]
    fn test_wider_window_never_decreases_total_weight() {
        let text = "online abuse targets women online and abuse spreads fast when \
                    platforms ignore abuse reports from women";
        let s = stream(text);

        for weighting in [CooccurrenceWeighting::Count, CooccurrenceWeighting::InverseDistance] {
            let mut previous = 0.0;
            for window in 1..=8 {
                let total = GraphBuilder::from_stream(&s, window, weighting).total_edge_weight();
                assert!(total >= previous, "window {window} decreased total weight");
                previous = total;
            }
        }
    }

    #[test]
    fn test_unbounded_window_links_every_pair() {
        let s = stream("cat dog cat bird dog cat");
        let full = GraphBuilder::from_stream(&s, s.len(), CooccurrenceWeighting::Count);
        let unbounded = GraphBuilder::from_stream(&s, usize::MAX, CooccurrenceWeighting::Count);

        assert_eq!(unbounded.total_edge_weight(), full.total_edge_weight());
        assert_eq!(edge_count(&unbounded), 3);
        for a in 0..3 {
            for b in 0..3 {
                assert_eq!(unbounded.edge_weight(a, b), full.edge_weight(a, b));
            }
        }
        let narrow = GraphBuilder::from_stream(&s, 2, CooccurrenceWeighting::Count);
        assert!(unbounded.total_edge_weight() >= narrow.total_edge_weight());
    }

    #[test]
    fn test_empty_stream_empty_graph() {
        let builder = build("", 3);
        assert!(builder.is_empty());
        assert_eq!(builder.total_edge_weight(), 0.0);
    }
}
