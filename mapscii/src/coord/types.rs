//! Coordinate type definitions

use std::fmt;
use thiserror::Error;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels served by vector tile sources
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 22;

/// Identifies one vector tile in the slippy map grid.
///
/// The `Display` form (`z-x-y`) doubles as the memory cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    /// Zoom level
    pub z: u8,
    /// X coordinate (west to east)
    pub x: u32,
    /// Y coordinate (north to south, XYZ scheme)
    pub y: u32,
}

impl TileId {
    /// Create a new tile id.
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Row index of this tile in the TMS scheme used by MBTiles archives.
    ///
    /// TMS counts rows from the south edge, XYZ from the north edge.
    #[inline]
    pub fn tms_y(&self) -> u32 {
        let rows = 1u64 << self.z.min(31);
        (rows - 1).saturating_sub(u64::from(self.y)) as u32
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.z, self.x, self.y)
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is outside the Web Mercator range
    #[error(
        "Invalid latitude: {0} (must be between {min} and {max})",
        min = MIN_LAT,
        max = MAX_LAT
    )]
    InvalidLatitude(f64),
    /// Longitude is outside valid range
    #[error(
        "Invalid longitude: {0} (must be between {min} and {max})",
        min = MIN_LON,
        max = MAX_LON
    )]
    InvalidLongitude(f64),
    /// Zoom level is outside valid range
    #[error(
        "Invalid zoom level: {0} (must be between {min} and {max})",
        min = MIN_ZOOM,
        max = MAX_ZOOM
    )]
    InvalidZoom(u8),
}
