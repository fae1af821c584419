//! Terrain generator binary — builds a terrain, prints stats, writes a heightmap image.
//!
//! Usage: cargo run --release --bin generate_terrain -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>     JSON terrain config (flags below override it)
//!   --size <N>          Grid size, 2^n + 1 (default: 129)
//!   --roughness <R>     Per-octave roughness (default: 0.5)
//!   --seed <SEED>       Random seed (default: 12345)
//!   --xz <S>            Grid spacing in world units (default: 0.5)
//!   --y <S>             Height scale (default: 10.0)
//!   --uv <S>            Texture repeats across the terrain (default: 8.0)
//!   --no-smooth         Skip the Gaussian smoothing pass
//!   --out <PATH>        Grayscale heightmap output (default: heightmap.png)
//!   --scatter <N>       Place N points in valleys and print them

use std::path::PathBuf;
use std::time::Instant;

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use heightmesh::core::logging;
use heightmesh::terrain::{save_grayscale, scatter_in_valleys, ScatterParams, TerrainConfig};

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> heightmesh::core::Result<()> {
    let mut config = match parse_str_arg(args, "--config") {
        Some(path) => TerrainConfig::load(&PathBuf::from(path))?,
        None => TerrainConfig::default(),
    };
    if let Some(size) = parse_usize_arg(args, "--size") {
        config.size = size;
    }
    if let Some(roughness) = parse_f32_arg(args, "--roughness") {
        config.roughness = roughness;
    }
    if let Some(seed) = parse_u64_arg(args, "--seed") {
        config.seed = seed;
    }
    if let Some(xz) = parse_f32_arg(args, "--xz") {
        config.xz_scale = xz;
    }
    if let Some(y) = parse_f32_arg(args, "--y") {
        config.y_scale = y;
    }
    if let Some(uv) = parse_f32_arg(args, "--uv") {
        config.uv_scale = uv;
    }
    if args.iter().any(|a| a == "--no-smooth") {
        config.smooth = false;
    }
    let out = parse_str_arg(args, "--out").unwrap_or_else(|| "heightmap.png".to_string());
    let scatter = parse_usize_arg(args, "--scatter").unwrap_or(0);

    println!("=== Heightmesh Terrain Generator ===");
    println!("Size:      {}x{}", config.size, config.size);
    println!("Roughness: {}", config.roughness);
    println!("Seed:      {}", config.seed);
    println!("Scales:    xz {}, y {}, uv {}", config.xz_scale, config.y_scale, config.uv_scale);
    println!("Smooth:    {}", config.smooth);
    println!();

    let start = Instant::now();
    let terrain = config.build()?;
    let elapsed = start.elapsed();

    let bounds = terrain.metadata.bounds();
    println!("Built in {:.1}ms", elapsed.as_secs_f64() * 1000.0);
    println!("Vertices:  {}", terrain.mesh.positions.len());
    println!("Triangles: {}", terrain.mesh.triangle_count());
    println!("Bounds:    {:?} .. {:?}", bounds.min, bounds.max);
    println!("Extent:    {:?} around {:?}", bounds.size(), bounds.center());

    let center = terrain.surface_point(Vec2::splat(0.5))?;
    println!("Center surface point: {:?}", center);

    save_grayscale(&terrain.heightfield, &PathBuf::from(&out))?;
    println!("Heightmap: {}", out);

    if scatter > 0 {
        let params = ScatterParams { count: scatter, attempts: scatter * 32, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
        let points = scatter_in_valleys(&terrain.mesh, &terrain.metadata, &params, &mut rng);
        println!();
        println!("Valley points ({}):", points.len());
        for p in points {
            println!("  {:8.3} {:8.3} {:8.3}", p.x, p.y, p.z);
        }
    }

    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
