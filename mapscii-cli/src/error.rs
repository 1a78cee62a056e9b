//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use mapscii::coord::CoordError;
use mapscii::source::TileSourceError;
use mapscii::style::StyleError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid command-line arguments
    Args(String),
    /// Failed to load the style sheet
    Style(StyleError),
    /// Coordinates outside the map
    Coord(CoordError),
    /// Failed to create the tile source
    SourceCreation(TileSourceError),
    /// Failed to load a tile
    Tile(TileSourceError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::SourceCreation(TileSourceError::UnsupportedSource(_)) => {
                eprintln!();
                eprintln!("Sources must be one of:");
                eprintln!("  1. A tile server URL, e.g. http://mapscii.me/");
                eprintln!("  2. A local MBTiles archive, e.g. ./planet.mbtiles");
            }
            CliError::Tile(TileSourceError::Fetch { .. }) => {
                eprintln!();
                eprintln!("Check your network connection or try another --source.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Args(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::Style(e) => write!(f, "Failed to load style: {}", e),
            CliError::Coord(e) => write!(f, "Invalid location: {}", e),
            CliError::SourceCreation(e) => write!(f, "Failed to open tile source: {}", e),
            CliError::Tile(e) => write!(f, "{}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Style(e) => Some(e),
            CliError::Coord(e) => Some(e),
            CliError::SourceCreation(e) => Some(e),
            CliError::Tile(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TileSourceError> for CliError {
    fn from(e: TileSourceError) -> Self {
        CliError::Tile(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}

impl From<StyleError> for CliError {
    fn from(e: StyleError) -> Self {
        CliError::Style(e)
    }
}
