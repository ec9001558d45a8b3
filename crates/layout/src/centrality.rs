use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::VecDeque;

/// Brandes' betweenness centrality over an unweighted undirected graph.
///
/// Scores are indexed like `graph.node_indices()` and normalised by
/// `1 / ((n - 1)(n - 2))` when there are more than two nodes.
pub fn betweenness<N, E>(graph: &UnGraph<N, E>) -> Vec<f64> {
    let n = graph.node_count();
    let mut centrality = vec![0.0; n];

    for s in 0..n {
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut distance: Vec<Option<usize>> = vec![None; n];
        sigma[s] = 1.0;
        distance[s] = Some(0);

        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let next = distance[v].map(|d| d + 1);

            for w in graph.neighbors(NodeIndex::new(v)).map(|w| w.index()) {
                if distance[w].is_none() {
                    distance[w] = next;
                    queue.push_back(w);
                }
                if distance[w] == next {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Accumulate dependencies in reverse BFS order
        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
        for c in &mut centrality {
            *c *= scale;
        }
    }

    centrality
}
