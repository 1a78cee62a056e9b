//! Coordinate conversion module
//!
//! Converts between geographic coordinates (latitude/longitude) and the
//! Web Mercator tile ids used to request vector tiles.

mod types;

pub use types::{CoordError, TileId, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM};

use std::f64::consts::PI;

/// Converts geographic coordinates to the id of the tile containing them.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 22)
#[inline]
pub fn lat_lon_to_tile(lat: f64, lon: f64, zoom: u8) -> Result<TileId, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let n = 2.0_f64.powi(i32::from(zoom));
    let max_index = n - 1.0;

    // lon = 180 lands exactly on the east edge; clamp into the last column
    let x = ((lon + 180.0) / 360.0 * n).min(max_index) as u32;

    let lat_rad = lat * PI / 180.0;
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).clamp(0.0, max_index) as u32;

    Ok(TileId { z: zoom, x, y })
}

/// Converts a tile id back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's north-west corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileId) -> (f64, f64) {
    let n = 2.0_f64.powi(i32::from(tile.z));

    let lon = f64::from(tile.x) / n * 360.0 - 180.0;

    let y = f64::from(tile.y) / n;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan() * 180.0 / PI;

    (lat, lon)
}

#[cfg(test)]
mod tests;
