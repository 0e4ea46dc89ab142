//! Standard PageRank algorithm
//!
//! Power iteration with a uniform teleport term:
//!
//! `new(n) = (1 - d) / N + d * sum over neighbors m of score(m) * w(m, n) / W(m)`
//!
//! where `W(m)` is the total edge weight of `m`. Isolated nodes receive only
//! the teleport floor. The vector is rescaled to unit mass after every
//! iteration, which is a no-op unless isolated nodes leak mass.

use super::PageRankResult;
use crate::graph::csr::CsrGraph;
use crate::types::TextRankConfig;

/// Standard PageRank implementation
#[derive(Debug, Clone)]
pub struct StandardPageRank {
    /// Damping factor (typically 0.85)
    pub damping: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Convergence threshold on the largest per-node change
    pub threshold: f64,
}

impl Default for StandardPageRank {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            threshold: 1e-6,
        }
    }
}

impl StandardPageRank {
    /// Create a new StandardPageRank with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Take damping, iteration cap and threshold from a ranking config
    pub fn from_config(config: &TextRankConfig) -> Self {
        Self {
            damping: config.damping,
            max_iterations: config.max_iterations,
            threshold: config.convergence_threshold,
        }
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Run PageRank on a graph
    ///
    /// Returns the result even if convergence wasn't achieved, with `converged=false`.
    pub fn run(&self, graph: &CsrGraph) -> PageRankResult {
        let n = graph.num_nodes;
        if n == 0 {
            return PageRankResult::new(vec![], 0, 0.0, true);
        }

        let mut scores = vec![1.0 / n as f64; n];
        let mut new_scores = vec![0.0; n];

        let teleport = (1.0 - self.damping) / n as f64;
        let mut iterations = 0;
        let mut delta = f64::MAX;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;

            new_scores.fill(teleport);

            // Propagate scores through edges
            for (node, &node_score) in scores.iter().enumerate() {
                let total_weight = graph.node_total_weight(node as u32);

                if total_weight > 0.0 {
                    for (neighbor, weight) in graph.neighbors(node as u32) {
                        new_scores[neighbor as usize] +=
                            self.damping * node_score * weight / total_weight;
                    }
                }
            }

            // Teleport keeps every entry positive, so the sum is never zero
            let sum: f64 = new_scores.iter().sum();
            for score in &mut new_scores {
                *score /= sum;
            }

            delta = scores
                .iter()
                .zip(new_scores.iter())
                .map(|(old, new)| (old - new).abs())
                .fold(0.0, f64::max);

            std::mem::swap(&mut scores, &mut new_scores);

            if delta <= self.threshold {
                converged = true;
                break;
            }
        }

        PageRankResult::new(scores, iterations, delta, converged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::GraphBuilder;

    fn build_triangle_graph() -> CsrGraph {
        let mut builder = GraphBuilder::new();
        let a = builder.get_or_create_node("a");
        let b = builder.get_or_create_node("b");
        let c = builder.get_or_create_node("c");

        builder.increment_edge(a, b, 1.0);
        builder.increment_edge(b, c, 1.0);
        builder.increment_edge(c, a, 1.0);

        CsrGraph::from_builder(&builder)
    }

    fn build_star_graph() -> CsrGraph {
        // Hub connected to 3 spokes
        let mut builder = GraphBuilder::new();
        let hub = builder.get_or_create_node("hub");
        let s1 = builder.get_or_create_node("s1");
        let s2 = builder.get_or_create_node("s2");
        let s3 = builder.get_or_create_node("s3");

        builder.increment_edge(hub, s1, 1.0);
        builder.increment_edge(hub, s2, 1.0);
        builder.increment_edge(hub, s3, 1.0);

        CsrGraph::from_builder(&builder)
    }

    fn build_graph_with_isolated_node() -> CsrGraph {
        let mut builder = GraphBuilder::new();
        let a = builder.get_or_create_node("a");
        let b = builder.get_or_create_node("b");
        builder.get_or_create_node("loner");
        builder.increment_edge(a, b, 2.0);

        CsrGraph::from_builder(&builder)
    }

    #[test]
    fn test_triangle_graph_equal_scores() {
        let result = StandardPageRank::new().run(&build_triangle_graph());

        assert!(result.converged);
        let expected = 1.0 / 3.0;
        for score in &result.scores {
            assert!((score - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_star_graph_hub_highest() {
        let result = StandardPageRank::new().run(&build_star_graph());

        assert!(result.converged);
        let hub_score = result.scores[0];
        for &score in &result.scores[1..] {
            assert!(hub_score > score);
        }
    }

    #[test]
    fn test_scores_sum_to_one() {
        let graphs = [
            build_triangle_graph(),
            build_star_graph(),
            build_graph_with_isolated_node(),
        ];

        for graph in &graphs {
            for damping in [0.05, 0.5, 0.85, 0.99] {
                let result = StandardPageRank::new().with_damping(damping).run(graph);
                let sum: f64 = result.scores.iter().sum();
                assert!((sum - 1.0).abs() < 1e-9, "sum {sum} for damping {damping}");
                assert!(result.scores.iter().all(|&s| s >= 0.0));
            }
        }
    }

    #[test]
    fn test_isolated_node_gets_floor_only() {
        let result = StandardPageRank::new().run(&build_graph_with_isolated_node());

        assert!(result.converged);
        assert_eq!(result.scores[0], result.scores[1]);
        assert!(result.scores[2] < result.scores[0]);
        // Floor term relative to a connected node: (1-d)/N vs (1-d)/N + d*s
        let ratio = result.scores[2] / result.scores[0];
        assert!(ratio < 0.5);
    }

    #[test]
    fn test_single_node_converges_in_one_iteration() {
        let mut builder = GraphBuilder::new();
        builder.get_or_create_node("spam");
        let graph = CsrGraph::from_builder(&builder);

        let result = StandardPageRank::new().run(&graph);

        assert!(result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.scores, vec![1.0]);
    }

    #[test]
    fn test_empty_graph() {
        let result = StandardPageRank::new().run(&CsrGraph::default());

        assert!(result.converged);
        assert_eq!(result.iterations, 0);
        assert!(result.scores.is_empty());
    }

    #[test]
    fn test_max_iterations_returns_partial() {
        let result = StandardPageRank::new()
            .with_max_iterations(1)
            .with_threshold(1e-12)
            .run(&build_star_graph());

        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
        assert!(result.delta > 1e-12);
        assert_eq!(result.scores.len(), 4);
    }

    #[test]
    fn test_converged_delta_within_threshold() {
        // Triangle with a pendant node
        let mut builder = GraphBuilder::new();
        let a = builder.get_or_create_node("a");
        let b = builder.get_or_create_node("b");
        let c = builder.get_or_create_node("c");
        let d = builder.get_or_create_node("d");
        builder.increment_edge(a, b, 1.0);
        builder.increment_edge(b, c, 1.0);
        builder.increment_edge(c, a, 1.0);
        builder.increment_edge(c, d, 1.0);

        let result = StandardPageRank::new()
            .with_threshold(1e-8)
            .run(&CsrGraph::from_builder(&builder));

        assert!(result.converged);
        assert!(result.delta <= 1e-8);
        assert!(result.iterations > 1);
        assert_eq!(result.top_n(1)[0].0, c);
    }

    #[test]
    fn test_damping_factor() {
        let graph = build_star_graph();

        // Lower damping = more teleportation = more uniform scores
        let result_low = StandardPageRank::new().with_damping(0.5).run(&graph);
        let result_high = StandardPageRank::new().with_damping(0.95).run(&graph);

        let hub_advantage_low = result_low.scores[0] - result_low.scores[1];
        let hub_advantage_high = result_high.scores[0] - result_high.scores[1];

        assert!(hub_advantage_high > hub_advantage_low);
    }

    #[test]
    fn test_deterministic() {
        let graph = build_star_graph();
        let pr = StandardPageRank::new();

        let first = pr.run(&graph);
        let second = pr.run(&graph);
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_config() {
        let cfg = TextRankConfig::default()
            .with_damping(0.7)
            .with_max_iterations(12)
            .with_convergence_threshold(1e-4);
        let pr = StandardPageRank::from_config(&cfg);

        assert_eq!(pr.damping, 0.7);
        assert_eq!(pr.max_iterations, 12);
        assert_eq!(pr.threshold, 1e-4);
    }
}
