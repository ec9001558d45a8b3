use rand::Rng;
use std::f64::consts::TAU;

use crate::backend::Position;

/// Share of the outward push removed from the best-connected node.
pub const HUB_PULL: f64 = 0.7;

/// Push `position` away from the centre by `1 + factor`, where
/// `factor = 1 - (degree / max_degree) * HUB_PULL`.
///
/// Low-degree nodes move out the most, hubs the least. A node exactly at the
/// centre stays put. A `max_degree` of zero is treated as one.
pub fn degree_biased(position: Position, degree: usize, max_degree: usize) -> Position {
    let max_degree = max_degree.max(1) as f64;
    let factor = 1.0 - (degree as f64 / max_degree) * HUB_PULL;

    let dx = position.x - Position::CENTER.x;
    let dy = position.y - Position::CENTER.y;
    let distance = dx.hypot(dy);
    if distance == 0.0 {
        return position;
    }

    let new_distance = distance * (1.0 + factor);
    Position::new(
        Position::CENTER.x + dx / distance * new_distance,
        Position::CENTER.y + dy / distance * new_distance,
    )
}

/// Placement for a node the layout did not cover: radius in [0.8, 1.0] around
/// the centre at a uniformly random angle.
pub fn outer_ring<R: Rng>(rng: &mut R) -> Position {
    let radius = rng.gen_range(0.8..=1.0);
    let angle = rng.gen_range(0.0..TAU);
    Position::new(
        Position::CENTER.x + radius * angle.cos(),
        Position::CENTER.y + radius * angle.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn radius(p: Position) -> f64 {
        p.distance_to(Position::CENTER)
    }

    #[test]
    fn test_center_node_is_not_moved() {
        assert_eq!(degree_biased(Position::CENTER, 0, 5), Position::CENTER);
        assert_eq!(degree_biased(Position::CENTER, 5, 5), Position::CENTER);
    }

    #[test]
    fn test_leaf_moves_further_than_hub() {
        let start = Position::new(0.7, 0.5);

        let leaf = degree_biased(start, 0, 4);
        let hub = degree_biased(start, 4, 4);

        assert!((radius(leaf) - 0.4).abs() < 1e-12);
        assert!((radius(hub) - 0.26).abs() < 1e-12);
        // Direction is preserved
        assert!((leaf.y - 0.5).abs() < 1e-12);
        assert!(leaf.x > hub.x);
    }

    #[test]
    fn test_zero_max_degree_is_guarded() {
        let moved = degree_biased(Position::new(0.5, 0.6), 0, 0);
        assert!(moved.x.is_finite() && moved.y.is_finite());
        assert!((radius(moved) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_radius_never_shrinks() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let start = Position::new(rng.gen_range(-1.0..2.0), rng.gen_range(-1.0..2.0));
            let max_degree = rng.gen_range(0..10);
            let degree = rng.gen_range(0..=max_degree);

            let moved = degree_biased(start, degree, max_degree);
            assert!(radius(moved) >= radius(start) - 1e-12);
        }
    }

    #[test]
    fn test_outer_ring_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let r = radius(outer_ring(&mut rng));
            assert!((0.8 - 1e-9..=1.0 + 1e-9).contains(&r));
        }
    }
}
