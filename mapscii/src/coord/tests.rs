//! Tests for coordinate conversion

use super::*;

#[test]
fn test_berlin_at_zoom_10() {
    // Berlin: 52.52°N, 13.405°E
    let tile = lat_lon_to_tile(52.52, 13.405, 10).unwrap();
    assert_eq!(tile.x, 550);
    assert_eq!(tile.y, 335);
    assert_eq!(tile.z, 10);
}

#[test]
fn test_equator_prime_meridian() {
    // At zoom 1: 2×2 tiles, 0°/0° sits on the shared corner → (1, 1)
    let tile = lat_lon_to_tile(0.0, 0.0, 1).unwrap();
    assert_eq!(tile.x, 1);
    assert_eq!(tile.y, 1);
}

#[test]
fn test_east_edge_clamped_into_last_column() {
    let tile = lat_lon_to_tile(0.0, 180.0, 2).unwrap();
    assert_eq!(tile.x, 3);
}

#[test]
fn test_invalid_latitude() {
    let result = lat_lon_to_tile(90.0, 0.0, 10);
    assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
}

#[test]
fn test_invalid_longitude() {
    let result = lat_lon_to_tile(0.0, -181.0, 10);
    assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
}

#[test]
fn test_invalid_zoom() {
    let result = lat_lon_to_tile(0.0, 0.0, 23);
    assert!(matches!(result, Err(CoordError::InvalidZoom(23))));
}

#[test]
fn test_tile_to_lat_lon_origin() {
    let (lat, lon) = tile_to_lat_lon(&TileId::new(0, 0, 0));
    assert!((lat - MAX_LAT).abs() < 1e-6);
    assert!((lon - MIN_LON).abs() < 1e-9);
}

#[test]
fn test_roundtrip_at_different_zooms() {
    let lat = 51.5074; // London
    let lon = -0.1278;

    for zoom in [0, 5, 10, 15, 18] {
        let tile = lat_lon_to_tile(lat, lon, zoom).unwrap();
        let (converted_lat, converted_lon) = tile_to_lat_lon(&tile);

        // North-west corner, so allow a whole tile of drift
        let tile_size_degrees = 360.0 / 2.0_f64.powi(i32::from(zoom));

        assert!(
            (converted_lat - lat).abs() < tile_size_degrees,
            "Zoom {}: lat diff {} exceeds tile size {}",
            zoom,
            (converted_lat - lat).abs(),
            tile_size_degrees
        );
        assert!((converted_lon - lon).abs() < tile_size_degrees);
    }
}

#[test]
fn test_tile_id_display_is_cache_key() {
    assert_eq!(TileId::new(5, 10, 12).to_string(), "5-10-12");
}

#[test]
fn test_tms_y_flip() {
    assert_eq!(TileId::new(0, 0, 0).tms_y(), 0);
    assert_eq!(TileId::new(2, 1, 0).tms_y(), 3);
    assert_eq!(TileId::new(2, 1, 3).tms_y(), 0);
}
