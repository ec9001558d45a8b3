use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use rand::Rng;

use crate::backend::Position;

const MIN_DISTANCE: f64 = 0.01;

/// Fruchterman-Reingold spring embedder with linear cooling.
#[derive(Debug, Clone)]
pub struct SpringLayout {
    /// Optimal edge length; larger values push nodes further apart.
    pub k: f64,
    pub iterations: usize,
    /// Stop early once the mean per-node move drops below this.
    pub threshold: f64,
}

impl SpringLayout {
    pub fn new(k: f64, iterations: usize) -> Self {
        Self {
            k,
            iterations,
            threshold: 1e-4,
        }
    }

    /// Positions indexed like `graph.node_indices()`, rescaled so the layout
    /// is centred on (0.5, 0.5) with a largest deviation of 0.5.
    pub fn run<N, E, R: Rng>(&self, graph: &UnGraph<N, E>, rng: &mut R) -> Vec<Position> {
        let n = graph.node_count();
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![Position::CENTER];
        }

        let mut adjacent = vec![vec![false; n]; n];
        for edge in graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            adjacent[a][b] = true;
            adjacent[b][a] = true;
        }

        let mut pos: Vec<[f64; 2]> = (0..n)
            .map(|_| [rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)])
            .collect();

        // Temperature starts at a tenth of the initial extent
        let extent = |axis: usize| {
            let (lo, hi) = pos.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
                (lo.min(p[axis]), hi.max(p[axis]))
            });
            hi - lo
        };
        let mut t = extent(0).max(extent(1)) * 0.1;
        let dt = t / (self.iterations as f64 + 1.0);
        let k = self.k;

        for _ in 0..self.iterations {
            let mut moves = vec![[0.0f64; 2]; n];

            for i in 0..n {
                let mut disp = [0.0f64; 2];
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let delta = [pos[i][0] - pos[j][0], pos[i][1] - pos[j][1]];
                    let distance = delta[0].hypot(delta[1]).max(MIN_DISTANCE);

                    // Repulsion between every pair, attraction along edges
                    let attraction = if adjacent[i][j] { distance / k } else { 0.0 };
                    let coefficient = k * k / (distance * distance) - attraction;
                    disp[0] += delta[0] * coefficient;
                    disp[1] += delta[1] * coefficient;
                }

                let mut length = disp[0].hypot(disp[1]);
                if length < MIN_DISTANCE {
                    length = 0.1;
                }
                moves[i] = [disp[0] * t / length, disp[1] * t / length];
            }

            let mut total_move = 0.0;
            for (p, m) in pos.iter_mut().zip(&moves) {
                p[0] += m[0];
                p[1] += m[1];
                total_move += m[0].hypot(m[1]);
            }

            t -= dt;
            if total_move / (n as f64) < self.threshold {
                break;
            }
        }

        rescale(&pos)
    }
}

fn rescale(pos: &[[f64; 2]]) -> Vec<Position> {
    let n = pos.len() as f64;
    let mean = [
        pos.iter().map(|p| p[0]).sum::<f64>() / n,
        pos.iter().map(|p| p[1]).sum::<f64>() / n,
    ];

    let limit = pos
        .iter()
        .flat_map(|p| [(p[0] - mean[0]).abs(), (p[1] - mean[1]).abs()])
        .fold(0.0f64, f64::max);

    pos.iter()
        .map(|p| {
            if limit > 0.0 {
                Position::new(
                    0.5 + (p[0] - mean[0]) / limit * 0.5,
                    0.5 + (p[1] - mean[1]) / limit * 0.5,
                )
            } else {
                Position::CENTER
            }
        })
        .collect()
}
