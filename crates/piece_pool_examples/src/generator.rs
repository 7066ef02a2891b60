//! Minimal breadth-first structure generator driven by a [`PiecePool`].
//!
//! Pieces are attached without rotation or collision checks; the point is to exercise the
//! pool protocol the way a real generator would.
use std::collections::{BTreeMap, VecDeque};

use glam::IVec3;
use piece_pool::prelude::{Connector, PiecePool, PieceId, PlacedPiece};
use rand::RngCore;

/// Limits for a generation run.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Maximum number of pieces, the starting piece included.
    pub max_pieces: usize,
    /// Pieces at this depth get no children.
    pub max_depth: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_pieces: 64,
            max_depth: 8,
        }
    }
}

impl GeneratorConfig {
    pub fn with_max_pieces(mut self, max_pieces: usize) -> Self {
        self.max_pieces = max_pieces;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedPiece {
    pub name: String,
    pub placed: PlacedPiece,
}

#[derive(Clone, Debug, Default)]
pub struct GeneratedStructure {
    pub pieces: Vec<GeneratedPiece>,
}

impl GeneratedStructure {
    pub fn counts_by_name(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for piece in &self.pieces {
            *counts.entry(piece.name.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn max_depth(&self) -> u32 {
        self.pieces
            .iter()
            .map(|p| p.placed.depth)
            .max()
            .unwrap_or(0)
    }
}

/// Draws an index proportionally to `weights`. Returns `None` when all weights are zero.
pub fn pick_weighted<R: RngCore>(weights: &[u32], rng: &mut R) -> Option<usize> {
    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if total == 0 {
        return None;
    }

    let mut roll = rng.next_u64() % total;
    for (i, &w) in weights.iter().enumerate() {
        let w = u64::from(w);
        if roll < w {
            return Some(i);
        }
        roll -= w;
    }
    None
}

struct Chosen {
    id: PieceId,
    name: String,
    connectors: Vec<Connector>,
}

/// Resets `pool` and grows one structure from a weighted starting piece.
pub fn generate<P: PiecePool, R: RngCore>(
    pool: &mut P,
    config: &GeneratorConfig,
    rng: &mut R,
) -> GeneratedStructure {
    pool.reset();
    let mut out = GeneratedStructure::default();
    if config.max_pieces == 0 {
        return out;
    }

    let start = {
        let starting = pool.starting_pieces();
        let weights: Vec<u32> = starting
            .iter()
            .map(|p| pool.starting_piece_weight(p))
            .collect();
        pick_weighted(&weights, rng).map(|i| Chosen {
            id: starting[i].id(),
            name: starting[i].name().to_owned(),
            connectors: starting[i].connectors().to_vec(),
        })
    };
    let Some(start) = start else {
        return out;
    };

    pool.piece_placed(start.id);
    let root = PlacedPiece::new(start.id, IVec3::ZERO, 0);
    out.pieces.push(GeneratedPiece {
        name: start.name,
        placed: root,
    });
    let mut open: VecDeque<(PlacedPiece, Connector)> =
        start.connectors.into_iter().map(|c| (root, c)).collect();

    while let Some((parent, connector)) = open.pop_front() {
        if out.pieces.len() >= config.max_pieces {
            break;
        }
        if parent.depth >= config.max_depth {
            continue;
        }

        let chosen = {
            let candidates = pool.pieces_with_connector(connector.connector_type);
            let weights: Vec<u32> = candidates
                .iter()
                .map(|p| pool.piece_weight(&parent, &connector, p))
                .collect();
            pick_weighted(&weights, rng).map(|i| Chosen {
                id: candidates[i].id(),
                name: candidates[i].name().to_owned(),
                connectors: candidates[i].connectors().to_vec(),
            })
        };
        let Some(chosen) = chosen else {
            continue;
        };
        let Some(joint) = chosen
            .connectors
            .iter()
            .copied()
            .find(|c| c.connector_type == connector.connector_type)
        else {
            continue;
        };

        let target = parent.coords + connector.position + connector.direction.unit();
        let placed = PlacedPiece::new(chosen.id, target - joint.position, parent.depth + 1)
            .with_connector(joint);
        pool.piece_placed(chosen.id);
        out.pieces.push(GeneratedPiece {
            name: chosen.name,
            placed,
        });
        open.extend(
            chosen
                .connectors
                .into_iter()
                .filter(|c| *c != joint)
                .map(|c| (placed, c)),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use piece_pool::prelude::{Direction, PieceDef, PrefabPiecePool};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn pool() -> PrefabPiecePool {
        PrefabPiecePool::from_defs(
            &[
                PieceDef::new("road", [1, 1, 3])
                    .with_connector(1, [0, 0, 0], Direction::ZNeg)
                    .with_connector(1, [0, 0, 2], Direction::ZPos)
                    .with_weight(10)
                    .with_depth_weight(2),
                PieceDef::new("tower", [3, 9, 3])
                    .with_connector(1, [1, 0, 0], Direction::ZNeg)
                    .with_weight(10)
                    .with_max_occurrences(1),
            ],
            &[PieceDef::new("plaza", [5, 1, 5])
                .with_connector(1, [2, 0, 0], Direction::ZNeg)
                .with_connector(1, [2, 0, 4], Direction::ZPos)],
        )
    }

    struct FixedRng(u64);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.0.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 8];
            }
        }
    }

    #[test]
    fn weighted_pick_follows_weights() {
        assert_eq!(pick_weighted(&[3, 1], &mut FixedRng(0)), Some(0));
        assert_eq!(pick_weighted(&[3, 1], &mut FixedRng(3)), Some(1));
        assert_eq!(pick_weighted(&[0, 5], &mut FixedRng(0)), Some(1));
        assert_eq!(pick_weighted(&[0, 0], &mut FixedRng(0)), None);
        assert_eq!(pick_weighted(&[], &mut FixedRng(0)), None);
    }

    #[test]
    fn generation_respects_occurrence_limits_and_budget() {
        let mut pool = pool();
        let config = GeneratorConfig::default().with_max_pieces(20).with_max_depth(6);
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let structure = generate(&mut pool, &config, &mut rng);
            let counts = structure.counts_by_name();
            assert_eq!(counts.get("plaza"), Some(&1));
            assert!(counts.get("tower").copied().unwrap_or(0) <= 1);
            assert!(structure.pieces.len() <= 20);
            assert!(structure.max_depth() <= 6);
        }
    }

    #[test]
    fn same_seed_gives_same_structure() {
        let mut pool = pool();
        let config = GeneratorConfig::default();
        let a = generate(&mut pool, &config, &mut StdRng::seed_from_u64(7));
        let b = generate(&mut pool, &config, &mut StdRng::seed_from_u64(7));
        let names = |s: &GeneratedStructure| s.pieces.iter().map(|p| p.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn shared_catalog_runs_generate_independently() {
        let pool = pool();
        let config = GeneratorConfig::default();
        let mut first = pool.catalog().start_run();
        let mut second = pool.catalog().start_run();
        let a = generate(&mut first, &config, &mut StdRng::seed_from_u64(1));
        let b = generate(&mut second, &config, &mut StdRng::seed_from_u64(1));
        assert_eq!(a.pieces.len(), b.pieces.len());
    }

    #[test]
    fn empty_pool_generates_nothing() {
        let mut pool = PrefabPiecePool::new();
        let structure = generate(&mut pool, &GeneratorConfig::default(), &mut FixedRng(0));
        assert!(structure.pieces.is_empty());
    }
}
