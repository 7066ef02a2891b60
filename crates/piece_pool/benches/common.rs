use std::time::Duration;

use criterion::{Criterion, Throughput};
use piece_pool::prelude::{Direction, PieceDef, PrefabPiecePool};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Pool of `count` random pieces, each with up to four connectors of `connector_types` types.
pub fn make_pool(count: usize, connector_types: i32, seed: u64) -> PrefabPiecePool {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut defs = Vec::with_capacity(count);

    for i in 0..count {
        let mut def = PieceDef::new(format!("P{}", i), [5, 4, 5])
            .with_weight(1 + rng.random::<u32>() % 100)
            .with_depth_weight((rng.random::<u32>() % 10) as i32);
        let connectors = 1 + rng.random::<u32>() % 4;
        for c in 0..connectors {
            let t = (rng.random::<u32>() % connector_types as u32) as i32;
            let dir = Direction::ALL[(c as usize) % Direction::ALL.len()];
            def = def.with_connector(t, [2, 0, 0], dir);
        }
        if rng.random::<u32>() % 4 == 0 {
            def = def.with_max_occurrences(3);
        }
        defs.push(def);
    }

    PrefabPiecePool::from_defs(&defs, &[])
}
