//! Decoded, style-independent tile data.

use std::collections::HashMap;
use std::fmt;

/// Coordinate space size used when a layer omits its extent.
pub const DEFAULT_EXTENT: u32 = 4096;

/// Geometry kind of a feature.
///
/// Wire types outside `1..=3` decode to `Unknown`; such features are kept
/// so styling can decide to drop them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Unknown,
    Point,
    LineString,
    Polygon,
}

impl FeatureKind {
    /// Name used by style filters (`$type`).
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Unknown => "Unknown",
            FeatureKind::Point => "Point",
            FeatureKind::LineString => "LineString",
            FeatureKind::Polygon => "Polygon",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tile-local integer coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A connected sequence of points.
pub type Ring = Vec<Point>;

/// Scalar property value attached to a feature.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl PropertyValue {
    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric payload, if this is a number value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// One decoded geometric record.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Optional feature id
    pub id: Option<u64>,
    /// Geometry kind
    pub kind: FeatureKind,
    /// Rings of tile-local points; for polygons ring 0 is the outer boundary
    pub geometry: Vec<Ring>,
    /// Feature attributes
    pub properties: HashMap<String, PropertyValue>,
}

impl Feature {
    /// Look up a property by key.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Look up a string property by key.
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(PropertyValue::as_str)
    }

    /// Draw-order key: `localrank`, falling back to `scalerank`.
    ///
    /// A zero `localrank` counts as unset.
    pub fn sort_key(&self) -> Option<f64> {
        let rank = |key| self.property(key).and_then(PropertyValue::as_f64);
        rank("localrank")
            .filter(|r| *r != 0.0)
            .or_else(|| rank("scalerank"))
    }
}

/// One decoded layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLayer {
    pub name: String,
    /// Coordinate space size declared by the tile
    pub extent: u32,
    pub version: u32,
    pub features: Vec<Feature>,
}

/// All layers of a decoded tile, in wire order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedTile {
    pub layers: Vec<DecodedLayer>,
}

impl DecodedTile {
    /// Find a layer by name.
    pub fn layer(&self, name: &str) -> Option<&DecodedLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }
}
