//! Common types and utilities shared across CLI commands.

use clap::Args;
use mapscii::config::{defaults, MapConfig};
use mapscii::coord::{TileId, MAX_ZOOM};
use mapscii::source::TileSource;
use mapscii::style::StyleSheet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::CliError;

/// Style applied when `--style` is not given.
pub const DEFAULT_STYLE: &str = include_str!("../../styles/dark.json");

/// Tile source and styling options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Tile server base URL or path to a .mbtiles archive
    #[arg(long, default_value = defaults::DEFAULT_SOURCE)]
    pub source: String,

    /// Number of built tiles kept in memory
    #[arg(long, default_value_t = defaults::DEFAULT_CACHE_SIZE)]
    pub cache_size: usize,

    /// Do not store downloaded tiles on disk
    #[arg(long)]
    pub no_persist: bool,

    /// Preferred label language (name_<lang> property)
    #[arg(long, default_value = defaults::DEFAULT_LANGUAGE)]
    pub language: String,

    /// Mapbox GL style JSON (defaults to the built-in dark style)
    #[arg(long)]
    pub style: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = defaults::DEFAULT_HTTP_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl SourceArgs {
    /// Map the arguments onto a library configuration.
    pub fn to_config(&self) -> MapConfig {
        MapConfig::new()
            .with_source(self.source.as_str())
            .with_cache_size(self.cache_size)
            .with_persist_downloaded_tiles(!self.no_persist)
            .with_language(self.language.as_str())
            .with_http_timeout_secs(self.timeout)
    }

    /// Load the selected style sheet.
    pub fn load_style(&self) -> Result<StyleSheet, CliError> {
        let sheet = match &self.style {
            Some(path) => StyleSheet::from_path(path)?,
            None => StyleSheet::from_json(DEFAULT_STYLE)?,
        };
        Ok(sheet)
    }
}

/// Open a tile source for `config`, styled by `sheet`.
pub fn open_source(config: &MapConfig, sheet: Arc<StyleSheet>) -> Result<TileSource, CliError> {
    TileSource::open(config, sheet).map_err(CliError::SourceCreation)
}

/// Parse a `z/x/y` tile id.
pub fn parse_tile_id(s: &str) -> Result<TileId, CliError> {
    let invalid = || CliError::Args(format!("invalid tile id '{}' (expected z/x/y)", s));

    let mut parts = s.trim().split('/');
    let (Some(z), Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let z: u8 = z.parse().map_err(|_| invalid())?;
    let x: u32 = x.parse().map_err(|_| invalid())?;
    let y: u32 = y.parse().map_err(|_| invalid())?;

    if z > MAX_ZOOM {
        return Err(CliError::Args(format!(
            "zoom {} exceeds maximum {}",
            z, MAX_ZOOM
        )));
    }
    let n = 1u64 << z;
    if u64::from(x) >= n || u64::from(y) >= n {
        return Err(CliError::Args(format!(
            "tile {}/{}/{} is outside the {}x{} grid of zoom {}",
            z, x, y, n, n, z
        )));
    }

    Ok(TileId::new(z, x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tile_id() {
        assert_eq!(parse_tile_id("2/1/3").unwrap(), TileId::new(2, 1, 3));
        assert_eq!(parse_tile_id(" 0/0/0 ").unwrap(), TileId::new(0, 0, 0));
    }

    #[test]
    fn test_parse_tile_id_rejects_malformed() {
        assert!(parse_tile_id("2/1").is_err());
        assert!(parse_tile_id("2/1/3/4").is_err());
        assert!(parse_tile_id("a/b/c").is_err());
    }

    #[test]
    fn test_parse_tile_id_rejects_outside_grid() {
        assert!(parse_tile_id("1/2/0").is_err());
        assert!(parse_tile_id("30/0/0").is_err());
    }

    #[test]
    fn test_default_style_parses() {
        let sheet = StyleSheet::from_json(DEFAULT_STYLE).unwrap();
        assert!(!sheet.is_empty());
        assert_eq!(sheet.background_color(), Some("#000000"));
    }

    #[test]
    fn test_to_config() {
        let args = SourceArgs {
            source: "./planet.mbtiles".to_string(),
            cache_size: 4,
            no_persist: true,
            language: "de".to_string(),
            style: None,
            timeout: 5,
        };
        let config = args.to_config();
        assert_eq!(config.source(), "./planet.mbtiles");
        assert_eq!(config.cache_size(), 4);
        assert!(!config.persist_downloaded_tiles());
        assert_eq!(config.language(), "de");
        assert_eq!(config.http_timeout_secs(), 5);
    }
}
