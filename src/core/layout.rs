use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ChartError, ChartResult};

/// How the force-directed layout seeds its initial node positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LayoutSeedPolicy {
    /// Same seed for every request: identical graphs always get identical
    /// layouts.
    Fixed { seed: u64 },
    /// Seed derived from the node and edge set: reproducible per graph, but
    /// different graphs do not share a starting configuration.
    PerRequest,
    /// Fresh entropy per call; layouts are not reproducible.
    Unseeded,
}

impl Default for LayoutSeedPolicy {
    fn default() -> Self {
        Self::Fixed {
            seed: DEFAULT_LAYOUT_SEED,
        }
    }
}

pub const DEFAULT_LAYOUT_SEED: u64 = 42;

impl LayoutSeedPolicy {
    /// Resolves the concrete seed for one graph; `None` means unseeded.
    #[must_use]
    pub fn resolve(self, nodes: &[String], edges: &[(usize, usize)]) -> Option<u64> {
        match self {
            Self::Fixed { seed } => Some(seed),
            Self::PerRequest => Some(graph_seed(nodes, edges)),
            Self::Unseeded => None,
        }
    }
}

/// First 8 bytes (little endian) of a SHA-256 over the length-prefixed node
/// names and the edge endpoints; stable across builds and Rust releases.
fn graph_seed(nodes: &[String], edges: &[(usize, usize)]) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update((nodes.len() as u64).to_le_bytes());
    for node in nodes {
        hasher.update((node.len() as u64).to_le_bytes());
        hasher.update(node.as_bytes());
    }
    hasher.update((edges.len() as u64).to_le_bytes());
    for &(source, target) in edges {
        hasher.update((source as u64).to_le_bytes());
        hasher.update((target as u64).to_le_bytes());
    }
    let digest = hasher.finalize();
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringLayoutParams {
    pub iterations: usize,
    /// Preferred edge length, in the same unit as the initial unit square.
    pub optimal_distance: f64,
}

impl Default for SpringLayoutParams {
    fn default() -> Self {
        Self {
            iterations: 50,
            optimal_distance: 2.0,
        }
    }
}

const MIN_DISTANCE: f64 = 0.01;

/// Fruchterman-Reingold force-directed layout.
///
/// Returns one position per node, centered on the origin and scaled so the
/// largest coordinate magnitude is 1. Edges are treated as undirected.
pub fn spring_layout(
    node_count: usize,
    edges: &[(usize, usize)],
    params: SpringLayoutParams,
    seed: Option<u64>,
) -> ChartResult<Vec<(f64, f64)>> {
    if node_count == 0 {
        return Err(ChartError::render("layout needs at least one node"));
    }
    if !params.optimal_distance.is_finite() || params.optimal_distance <= 0.0 {
        return Err(ChartError::render("layout optimal distance must be finite and > 0"));
    }
    if let Some(&(source, target)) = edges
        .iter()
        .find(|(source, target)| *source >= node_count || *target >= node_count)
    {
        return Err(ChartError::render(format!(
            "layout edge ({source}, {target}) references a missing node"
        )));
    }
    if node_count == 1 {
        return Ok(vec![(0.0, 0.0)]);
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut positions: Vec<(f64, f64)> = (0..node_count)
        .map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
        .collect();

    let mut adjacency = vec![false; node_count * node_count];
    for &(source, target) in edges {
        if source != target {
            adjacency[source * node_count + target] = true;
            adjacency[target * node_count + source] = true;
        }
    }

    let k = params.optimal_distance;
    let mut temperature = 0.1;
    let cooling = temperature / (params.iterations as f64 + 1.0);
    let mut displacement = vec![(0.0, 0.0); node_count];

    for _ in 0..params.iterations {
        displacement.fill((0.0, 0.0));
        for i in 0..node_count {
            for j in 0..node_count {
                if i == j {
                    continue;
                }
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                let distance = dx.hypot(dy).max(MIN_DISTANCE);
                let attraction = if adjacency[i * node_count + j] {
                    distance / k
                } else {
                    0.0
                };
                let force = k * k / (distance * distance) - attraction;
                displacement[i].0 += dx * force;
                displacement[i].1 += dy * force;
            }
        }

        for (position, (dx, dy)) in positions.iter_mut().zip(&displacement) {
            let length = dx.hypot(*dy).max(MIN_DISTANCE);
            position.0 += dx * temperature / length;
            position.1 += dy * temperature / length;
        }
        temperature -= cooling;
    }

    Ok(rescale_to_unit(positions))
}

fn rescale_to_unit(mut positions: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    let count = positions.len() as f64;
    let mean_x = positions.iter().map(|(x, _)| x).sum::<f64>() / count;
    let mean_y = positions.iter().map(|(_, y)| y).sum::<f64>() / count;
    for position in &mut positions {
        position.0 -= mean_x;
        position.1 -= mean_y;
    }

    let extent = positions
        .iter()
        .map(|(x, y)| x.abs().max(y.abs()))
        .fold(0.0_f64, f64::max);
    if extent > 0.0 {
        for position in &mut positions {
            position.0 /= extent;
            position.1 /= extent;
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::{LayoutSeedPolicy, SpringLayoutParams, spring_layout};

    #[test]
    fn single_node_sits_at_origin() {
        let positions =
            spring_layout(1, &[], SpringLayoutParams::default(), Some(1)).expect("layout");
        assert_eq!(positions, vec![(0.0, 0.0)]);
    }

    #[test]
    fn positions_are_normalized() {
        let positions = spring_layout(
            4,
            &[(0, 1), (1, 2)],
            SpringLayoutParams::default(),
            Some(7),
        )
        .expect("layout");
        let max = positions
            .iter()
            .map(|(x, y)| x.abs().max(y.abs()))
            .fold(0.0_f64, f64::max);
        assert!((max - 1.0).abs() < 1e-9);
    }

    #[test]
    fn per_request_seed_depends_on_graph() {
        let nodes = vec!["A".to_owned(), "B".to_owned()];
        let first = LayoutSeedPolicy::PerRequest.resolve(&nodes, &[(0, 1)]);
        let second = LayoutSeedPolicy::PerRequest.resolve(&nodes, &[]);
        assert!(first.is_some());
        assert_ne!(first, second);
        assert_eq!(LayoutSeedPolicy::Unseeded.resolve(&nodes, &[]), None);
    }

    #[test]
    fn per_request_seed_is_pinned() {
        let nodes = vec!["A".to_owned(), "B".to_owned()];
        assert_eq!(
            LayoutSeedPolicy::PerRequest.resolve(&nodes, &[(0, 1)]),
            Some(5_304_289_162_793_830_934)
        );
        assert_eq!(
            LayoutSeedPolicy::PerRequest.resolve(&nodes, &[]),
            Some(3_308_699_910_646_427_896)
        );
    }

    #[test]
    fn rejects_out_of_range_edges() {
        assert!(spring_layout(2, &[(0, 5)], SpringLayoutParams::default(), Some(1)).is_err());
    }
}
