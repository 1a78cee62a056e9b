//! Inspect command - load one tile and summarize its layers.

use mapscii::cache::CacheStats;
use mapscii::coord::{tile_to_lat_lon, TileId};
use mapscii::tile::Tile;
use std::sync::Arc;
use std::time::Instant;

use super::common::{open_source, SourceArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the inspect command.
pub struct InspectArgs {
    pub tile: TileId,
    pub source: SourceArgs,
}

/// Run the inspect command.
pub fn run(args: InspectArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("inspect");

    let config = args.source.to_config();
    let sheet = Arc::new(args.source.load_style()?);
    let source = open_source(&config, sheet)?;

    let (lat, lon) = tile_to_lat_lon(&args.tile);
    println!("Tile {} (north-west corner {:.5}, {:.5})", args.tile, lat, lon);
    println!("Source: {}", config.source());
    println!();

    let start = Instant::now();
    let tile = runner.block_on(source.get_tile(args.tile.z, args.tile.x, args.tile.y))?;
    let elapsed = start.elapsed();

    print_layers(&tile);
    println!();
    println!("Loaded in {:.2}s", elapsed.as_secs_f64());
    print_stats(&source.stats());

    Ok(())
}

fn print_layers(tile: &Tile) {
    let mut names: Vec<&String> = tile.layers.keys().collect();
    names.sort();

    if names.is_empty() {
        println!("No styled layers");
        return;
    }

    println!("{:<24} {:>7} {:>7} {:>7}", "Layer", "Extent", "Nodes", "Labels");
    for name in names {
        let Some(layer) = tile.layer(name) else {
            continue;
        };
        let labels = layer.nodes().filter(|node| node.label.is_some()).count();
        println!(
            "{:<24} {:>7} {:>7} {:>7}",
            name,
            layer.extent,
            layer.len(),
            labels
        );
    }
    println!("{:<24} {:>7} {:>7}", "Total", "", tile.node_count());
}

fn print_stats(stats: &CacheStats) {
    println!(
        "Cache: {} hits, {} misses ({:.0}% hit rate), {} entries",
        stats.memory_hits,
        stats.memory_misses,
        stats.memory_hit_rate() * 100.0,
        stats.memory_entry_count
    );
    println!(
        "Backend: {} fetches ({} bytes), {} archive reads, {} persisted reads",
        stats.fetches, stats.bytes_fetched, stats.archive_reads, stats.persisted_reads
    );
}
