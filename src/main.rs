//! CLI inspector: decode voxel-model files, synthesize meshes, report stats.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use golem_grid::{Palette, VoxelGrid};
use golem_io::{decode, grid_from_model, palette_from_file};
use golem_mesh_cpu::MeshStore;
use golem_tilemap::{TileMap, TileRef};

#[derive(Parser, Debug)]
#[command(name = "golem", version, about = "Inspect voxel-model files")]
struct Args {
    /// Voxel model file to load
    file: PathBuf,

    /// Center each mesh on the origin instead of the minimum corner
    #[arg(long)]
    centered: bool,

    /// Skip quads on the outer grid boundary
    #[arg(long)]
    no_boundaries: bool,

    /// Replace the file palette with a TOML tile table
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Also place the models in a demo tile row and report placements
    #[arg(long)]
    tilemap: bool,

    /// Spacing between tile placements
    #[arg(long, default_value_t = 8.0)]
    tile_size: f32,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence logging entirely
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(args: &Args) {
    let level = if args.quiet {
        log::LevelFilter::Off
    } else {
        match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    // RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let bytes = fs::read(&args.file)?;
    let data = decode(&bytes)?;
    println!(
        "{}: {} model(s), palette: {}",
        args.file.display(),
        data.models.len(),
        if data.custom_palette { "custom" } else { "default" }
    );

    let palette = match &args.palette {
        Some(path) => Palette::from_path(path)?,
        None => palette_from_file(&data),
    };
    log::info!("palette with {} tiles", palette.len());

    let mut store = MeshStore::new();
    let mut grids: Vec<VoxelGrid> = Vec::new();
    for (i, model) in data.models.iter().enumerate() {
        let Some(mut grid) = grid_from_model(model, palette.clone()) else {
            log::warn!("model {} has a zero dimension, skipped", i);
            continue;
        };
        grid.centered = args.centered;
        grid.show_boundaries = !args.no_boundaries;
        let id = golem_mesh_cpu::synthesize_grid_mesh(&mut grid, &mut store);
        let mesh = store.get(id).ok_or("mesh store lost a fresh handle")?;
        println!(
            "model {}: {}x{}x{} cells, {} voxel(s) -> mesh #{}: {} vertices, {} triangles",
            i,
            grid.sx,
            grid.sy,
            grid.sz,
            model.voxels.len(),
            id,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        grids.push(grid);
    }

    if args.tilemap && !grids.is_empty() {
        report_tilemap(grids, args.tile_size, &mut store);
    }
    Ok(())
}

/// Lays the models out in one row, each quarter-turned one step further
/// about +Z, and reports the resulting placement records.
fn report_tilemap(grids: Vec<VoxelGrid>, tile_size: f32, store: &mut MeshStore) {
    let mut tiles = vec![VoxelGrid::cube(Palette::reserved_only(), 1)];
    tiles.extend(grids);
    let count = tiles.len() - 1;

    let mut map = TileMap::new(tiles, count, 1, 1, tile_size);
    for x in 0..count {
        let cell = TileRef {
            index: x as u16 + 1,
            rot: golem_symmetry::rot_z(x as u32 % 4) as u16,
        };
        if let Err(e) = map.set_raw(x as i32, 0, 0, cell) {
            log::warn!("tile placement failed: {}", e);
        }
    }

    let placements = map.renderables(store);
    println!("tilemap: {} placement(s), spacing {}", placements.len(), tile_size);
    for p in placements {
        let o = p.transform.transform_point(golem_geom::Vec3::ZERO);
        println!("  mesh #{} at ({:.1}, {:.1}, {:.1})", p.mesh, o.x, o.y, o.z);
    }
}
