use piece_pool::prelude::*;
use piece_pool_examples::{generate, GeneratorConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    // Defaults to the bundled village catalog
    let path = args.next().unwrap_or_else(|| {
        concat!(env!("CARGO_MANIFEST_DIR"), "/assets/village.cubeset.json").to_owned()
    });
    let seed = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(2025);

    let mut pool = PrefabPiecePool::new();
    let report = pool.try_load_from_cubeset_file(&path, true)?;
    println!(
        "{}: {} pieces, {} starting pieces, {} skipped",
        path, report.pieces_loaded, report.starting_pieces_loaded, report.pieces_skipped
    );
    if let Some(usage) = pool.metadata("intendedUse") {
        println!("intended use: {usage}");
    }

    let config = GeneratorConfig::default()
        .with_max_pieces(40)
        .with_max_depth(6);
    let mut rng = StdRng::seed_from_u64(seed);
    let structure = generate(&mut pool, &config, &mut rng);

    for piece in &structure.pieces {
        let p = piece.placed;
        println!(
            "{:>2} {:<12} at ({:>4}, {:>3}, {:>4})",
            p.depth, piece.name, p.coords.x, p.coords.y, p.coords.z
        );
    }
    for (name, count) in structure.counts_by_name() {
        println!("{name}: {count}");
    }

    Ok(())
}
