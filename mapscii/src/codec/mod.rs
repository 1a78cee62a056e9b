//! Vector tile decoding.
//!
//! Turns a raw tile payload into typed layers of features, independent of
//! any style:
//!
//! ```text
//! raw bytes ──▶ gunzip (only if 1f 8b) ──▶ protobuf ──▶ DecodedTile
//!                                                       ├── layer "water"   { extent, features }
//!                                                       └── layer "road"    { extent, features }
//! ```
//!
//! Decoding is eager: geometry command streams and tag tables are resolved
//! here so a malformed tile fails as a whole instead of mid-render.

mod error;
mod geometry;
pub(crate) mod proto;
mod types;

pub use error::CodecError;
pub use geometry::decode_geometry;
pub use types::{
    DecodedLayer, DecodedTile, Feature, FeatureKind, Point, PropertyValue, Ring, DEFAULT_EXTENT,
};

use flate2::read::GzDecoder;
use prost::Message;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Read;

/// First two bytes of every gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Returns true when the payload starts with the gzip magic number.
#[inline]
pub fn is_gzipped(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

fn gunzip(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut decoder = GzDecoder::new(data);
    let mut inflated = Vec::with_capacity(data.len() * 4);
    decoder
        .read_to_end(&mut inflated)
        .map_err(CodecError::Decompression)?;
    Ok(inflated)
}

/// Decode a raw tile payload.
///
/// # Errors
///
/// * [`CodecError::Decompression`] - gzip-prefixed payload failed to inflate
/// * [`CodecError::CorruptTile`] - protobuf, tag table or geometry is malformed
pub fn decode(raw: &[u8]) -> Result<DecodedTile, CodecError> {
    let payload: Cow<'_, [u8]> = if is_gzipped(raw) {
        Cow::Owned(gunzip(raw)?)
    } else {
        Cow::Borrowed(raw)
    };

    let tile = proto::Tile::decode(payload.as_ref())?;

    let layers = tile
        .layers
        .into_iter()
        .map(decode_layer)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedTile { layers })
}

fn decode_layer(layer: proto::Layer) -> Result<DecodedLayer, CodecError> {
    let values: Vec<Option<PropertyValue>> = layer.values.iter().map(convert_value).collect();

    let features = layer
        .features
        .iter()
        .map(|feature| decode_feature(feature, &layer.keys, &values, &layer.name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedLayer {
        extent: layer.extent.unwrap_or(DEFAULT_EXTENT),
        version: layer.version,
        name: layer.name,
        features,
    })
}

fn decode_feature(
    feature: &proto::Feature,
    keys: &[String],
    values: &[Option<PropertyValue>],
    layer_name: &str,
) -> Result<Feature, CodecError> {
    if feature.tags.len() % 2 != 0 {
        return Err(CodecError::corrupt(format!(
            "odd tag count in layer '{}'",
            layer_name
        )));
    }

    let mut properties = HashMap::with_capacity(feature.tags.len() / 2);
    for pair in feature.tags.chunks_exact(2) {
        let key = keys.get(pair[0] as usize).ok_or_else(|| {
            CodecError::corrupt(format!(
                "tag key index {} out of range in layer '{}'",
                pair[0], layer_name
            ))
        })?;
        let value = values.get(pair[1] as usize).ok_or_else(|| {
            CodecError::corrupt(format!(
                "tag value index {} out of range in layer '{}'",
                pair[1], layer_name
            ))
        })?;
        if let Some(value) = value {
            properties.insert(key.clone(), value.clone());
        }
    }

    let kind = match proto::GeomType::try_from(feature.r#type.unwrap_or(0)) {
        Ok(proto::GeomType::Point) => FeatureKind::Point,
        Ok(proto::GeomType::Linestring) => FeatureKind::LineString,
        Ok(proto::GeomType::Polygon) => FeatureKind::Polygon,
        _ => FeatureKind::Unknown,
    };

    Ok(Feature {
        id: feature.id,
        kind,
        geometry: decode_geometry(&feature.geometry)?,
        properties,
    })
}

fn convert_value(value: &proto::Value) -> Option<PropertyValue> {
    if let Some(s) = &value.string_value {
        return Some(PropertyValue::String(s.clone()));
    }
    if let Some(b) = value.bool_value {
        return Some(PropertyValue::Bool(b));
    }
    value
        .double_value
        .or(value.float_value.map(f64::from))
        .or(value.int_value.map(|n| n as f64))
        .or(value.sint_value.map(|n| n as f64))
        .or(value.uint_value.map(|n| n as f64))
        .map(PropertyValue::Number)
}

#[cfg(test)]
pub(crate) mod tests {
    pub(crate) use super::geometry::tests::{command, param};
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn string_value(s: &str) -> proto::Value {
        proto::Value {
            string_value: Some(s.to_string()),
            ..Default::default()
        }
    }

    /// Encode a single-layer tile with the given features as protobuf bytes.
    ///
    /// Each feature is `(wire type, [(key, value)], geometry commands)`.
    pub(crate) fn encode_layer(
        name: &str,
        extent: u32,
        features: &[(i32, Vec<(&str, &str)>, Vec<u32>)],
    ) -> Vec<u8> {
        let mut keys: Vec<String> = Vec::new();
        let mut values: Vec<proto::Value> = Vec::new();
        let mut encoded = Vec::new();

        for (kind, props, geometry) in features {
            let mut tags = Vec::new();
            for (key, value) in props {
                let key_idx = keys.iter().position(|k| k == key).unwrap_or_else(|| {
                    keys.push(key.to_string());
                    keys.len() - 1
                });
                values.push(string_value(value));
                tags.push(key_idx as u32);
                tags.push((values.len() - 1) as u32);
            }
            encoded.push(proto::Feature {
                id: None,
                tags,
                r#type: Some(*kind),
                geometry: geometry.clone(),
            });
        }

        let tile = proto::Tile {
            layers: vec![proto::Layer {
                version: 2,
                name: name.to_string(),
                features: encoded,
                keys,
                values,
                extent: Some(extent),
            }],
        };
        tile.encode_to_vec()
    }

    /// Geometry for a single point.
    pub(crate) fn point_geometry(x: i32, y: i32) -> Vec<u32> {
        vec![command(1, 1), param(x), param(y)]
    }

    pub(crate) fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decode_preserves_extent() {
        let raw = encode_layer("water", 8192, &[(3, vec![], point_geometry(1, 1))]);
        let tile = decode(&raw).unwrap();
        assert_eq!(tile.layers.len(), 1);
        assert_eq!(tile.layers[0].name, "water");
        assert_eq!(tile.layers[0].extent, 8192);
        assert_eq!(tile.layers[0].version, 2);
    }

    #[test]
    fn test_decode_default_extent() {
        let tile = proto::Tile {
            layers: vec![proto::Layer {
                version: 2,
                name: "empty".to_string(),
                ..Default::default()
            }],
        };
        let decoded = decode(&tile.encode_to_vec()).unwrap();
        assert_eq!(decoded.layers[0].extent, DEFAULT_EXTENT);
    }

    #[test]
    fn test_decode_gzipped_payload() {
        let raw = encode_layer(
            "place_label",
            4096,
            &[(1, vec![("name", "Berlin")], point_geometry(100, 200))],
        );
        let compressed = gzip(&raw);
        assert!(is_gzipped(&compressed));

        let tile = decode(&compressed).unwrap();
        let feature = &tile.layer("place_label").unwrap().features[0];
        assert_eq!(feature.kind, FeatureKind::Point);
        assert_eq!(feature.string_property("name"), Some("Berlin"));
        assert_eq!(feature.geometry, vec![vec![Point::new(100, 200)]]);
    }

    #[test]
    fn test_plain_payload_is_not_decompressed() {
        let raw = encode_layer("road", 4096, &[]);
        assert!(!is_gzipped(&raw));
        assert_eq!(decode(&raw).unwrap().layers[0].name, "road");
    }

    #[test]
    fn test_broken_gzip_is_decompression_error() {
        let result = decode(&[0x1f, 0x8b, 0x00, 0x01, 0x02]);
        assert!(matches!(result, Err(CodecError::Decompression(_))));
    }

    #[test]
    fn test_garbage_is_corrupt_tile() {
        let result = decode(&[0xff, 0xff, 0xff, 0xff, 0xff]);
        assert!(matches!(result, Err(CodecError::CorruptTile { .. })));
    }

    #[test]
    fn test_unknown_geometry_type_is_carried() {
        let raw = encode_layer(
            "misc",
            4096,
            &[
                (0, vec![], point_geometry(1, 1)),
                (9, vec![], point_geometry(2, 2)),
            ],
        );
        let tile = decode(&raw).unwrap();
        let kinds: Vec<_> = tile.layers[0].features.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FeatureKind::Unknown, FeatureKind::Unknown]);
    }

    #[test]
    fn test_wire_types_map_to_kinds() {
        let raw = encode_layer(
            "mixed",
            4096,
            &[
                (1, vec![], point_geometry(1, 1)),
                (2, vec![], point_geometry(1, 1)),
                (3, vec![], point_geometry(1, 1)),
            ],
        );
        let tile = decode(&raw).unwrap();
        let kinds: Vec<_> = tile.layers[0].features.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FeatureKind::Point,
                FeatureKind::LineString,
                FeatureKind::Polygon
            ]
        );
    }

    #[test]
    fn test_out_of_range_tag_is_corrupt() {
        let tile = proto::Tile {
            layers: vec![proto::Layer {
                version: 2,
                name: "bad".to_string(),
                features: vec![proto::Feature {
                    tags: vec![0, 5],
                    r#type: Some(1),
                    geometry: point_geometry(0, 0),
                    ..Default::default()
                }],
                keys: vec!["name".to_string()],
                values: vec![],
                extent: Some(4096),
            }],
        };
        let result = decode(&tile.encode_to_vec());
        assert!(matches!(result, Err(CodecError::CorruptTile { .. })));
    }

    #[test]
    fn test_numeric_values_and_sort_key() {
        let tile = proto::Tile {
            layers: vec![proto::Layer {
                version: 2,
                name: "poi_label".to_string(),
                features: vec![proto::Feature {
                    tags: vec![0, 0, 1, 1],
                    r#type: Some(1),
                    geometry: point_geometry(0, 0),
                    ..Default::default()
                }],
                keys: vec!["localrank".to_string(), "scalerank".to_string()],
                values: vec![
                    proto::Value {
                        int_value: Some(0),
                        ..Default::default()
                    },
                    proto::Value {
                        uint_value: Some(3),
                        ..Default::default()
                    },
                ],
                extent: Some(4096),
            }],
        };
        let decoded = decode(&tile.encode_to_vec()).unwrap();
        let feature = &decoded.layers[0].features[0];
        assert_eq!(
            feature.property("scalerank"),
            Some(&PropertyValue::Number(3.0))
        );
        // localrank 0 falls through to scalerank
        assert_eq!(feature.sort_key(), Some(3.0));
    }
}
