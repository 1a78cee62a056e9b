//! mapscii CLI - Command-line interface
//!
//! Loads single vector tiles through the mapscii library and either
//! summarizes them or renders them once to the terminal.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use commands::common::SourceArgs;
use commands::inspect::InspectArgs;
use commands::render::RenderArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "mapscii")]
#[command(version = mapscii::VERSION)]
#[command(about = "Vector tile maps for the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load one tile and print its layers and node counts
    Inspect {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Load one tile and print it as a braille (or ASCII) frame
    Render {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        source: SourceArgs,

        /// Frame width in pixels (2 per terminal column)
        #[arg(long, default_value = "160")]
        width: usize,

        /// Frame height in pixels (4 per terminal row)
        #[arg(long, default_value = "96")]
        height: usize,

        /// Use block characters instead of braille
        #[arg(long)]
        ascii: bool,
    },
}

/// Tile selection, either by id or by geographic position.
#[derive(clap::Args)]
struct LocationArgs {
    /// Tile id as z/x/y
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    tile: Option<String>,

    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Zoom level used with --lat/--lon
    #[arg(long, default_value = "2")]
    zoom: u8,
}

impl LocationArgs {
    fn resolve(&self) -> Result<mapscii::coord::TileId, CliError> {
        match (&self.tile, self.lat, self.lon) {
            (Some(tile), _, _) => commands::common::parse_tile_id(tile),
            (None, Some(lat), Some(lon)) => {
                Ok(mapscii::coord::lat_lon_to_tile(lat, lon, self.zoom)?)
            }
            _ => Err(CliError::Args(
                "either --tile z/x/y or --lat and --lon is required".to_string(),
            )),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { location, source } => location
            .resolve()
            .and_then(|tile| commands::inspect::run(InspectArgs { tile, source })),
        Commands::Render {
            location,
            source,
            width,
            height,
            ascii,
        } => location.resolve().and_then(|tile| {
            commands::render::run(RenderArgs {
                tile,
                source,
                width,
                height,
                ascii,
            })
        }),
    };

    if let Err(e) = result {
        e.exit();
    }
}
