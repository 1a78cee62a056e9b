//! Styled, indexed tile data.

use crate::codec::{Feature, Ring};
use crate::coord::TileId;
use crate::index::{Bbox, Bounded, SpatialIndex};
use crate::style::Style;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

/// One drawable unit of a styled feature.
///
/// Fills produce a single node spanning all of the feature's rings; every
/// other style produces one node per ring.
#[derive(Debug, Clone)]
pub struct StyledNode {
    /// Source feature, shared between the nodes built from it
    pub feature: Arc<Feature>,
    /// Style the feature matched
    pub style: Arc<Style>,
    /// Bounds in tile-local coordinates (ring 0 for fills)
    pub bbox: Bbox,
    /// Quantized xterm-256 color, when the style provides a usable one
    pub color: Option<u8>,
    /// Label text for symbol styles
    pub label: Option<String>,
    /// Draw-order key copied from the feature
    pub sort_key: Option<f64>,
    rings: Range<usize>,
}

impl StyledNode {
    pub(crate) fn new(
        feature: Arc<Feature>,
        style: Arc<Style>,
        bbox: Bbox,
        rings: Range<usize>,
    ) -> Self {
        let sort_key = feature.sort_key();
        Self {
            feature,
            style,
            bbox,
            color: None,
            label: None,
            sort_key,
            rings,
        }
    }

    /// Rings this node draws.
    pub fn rings(&self) -> &[Ring] {
        &self.feature.geometry[self.rings.clone()]
    }
}

impl Bounded for StyledNode {
    fn bbox(&self) -> Bbox {
        self.bbox
    }
}

/// A named layer of styled nodes.
#[derive(Debug)]
pub struct Layer {
    pub name: String,
    /// Coordinate space size declared by the tile
    pub extent: u32,
    index: SpatialIndex<StyledNode>,
}

impl Layer {
    pub fn new(name: impl Into<String>, extent: u32, nodes: Vec<StyledNode>) -> Self {
        Self {
            name: name.into(),
            extent,
            index: SpatialIndex::from_items(nodes),
        }
    }

    /// Nodes intersecting `bbox`, ascending by sort key.
    ///
    /// Nodes without a sort key come first; ties keep index order.
    pub fn query(&self, bbox: &Bbox) -> Vec<&StyledNode> {
        let mut nodes: Vec<&StyledNode> = self.index.search(bbox).collect();
        nodes.sort_by(|a, b| {
            a.sort_key
                .partial_cmp(&b.sort_key)
                .unwrap_or(Ordering::Equal)
        });
        nodes
    }

    pub fn nodes(&self) -> impl Iterator<Item = &StyledNode> + '_ {
        self.index.iter()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// A fully built tile. Immutable once constructed; shared as `Arc<Tile>`.
#[derive(Debug)]
pub struct Tile {
    pub id: TileId,
    pub layers: HashMap<String, Layer>,
}

impl Tile {
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Total number of nodes over all layers.
    pub fn node_count(&self) -> usize {
        self.layers.values().map(Layer::len).sum()
    }
}
