//! Decoded tile → styled, indexed tile.

use super::{Layer, StyledNode, Tile};
use crate::codec::{DecodedTile, Feature, PropertyValue};
use crate::color::hex_to_ansi256;
use crate::coord::TileId;
use crate::index::Bbox;
use crate::style::{ColorValue, Style, StyleKind, Styler};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Property keys tried, after the language-specific name, for labels.
const LABEL_FALLBACK_KEYS: [&str; 3] = ["name_en", "name", "house_num"];

/// Turns decoded tiles into [`Tile`]s.
///
/// Each feature is styled through the [`Styler`]; unstyled features are
/// dropped. Styled features become [`StyledNode`]s with a bounding box, a
/// quantized color and, for symbol styles, a label. All nodes of a layer
/// are bulk-loaded into one spatial index.
pub struct TileIndexBuilder {
    styler: Arc<dyn Styler>,
    language: String,
}

impl TileIndexBuilder {
    /// Create a builder.
    ///
    /// # Arguments
    ///
    /// * `styler` - Style resolver
    /// * `language` - Preferred label language (`name_{language}`)
    pub fn new(styler: Arc<dyn Styler>, language: impl Into<String>) -> Self {
        Self {
            styler,
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Build a tile from its decoded layers.
    pub fn build(&self, id: TileId, decoded: DecodedTile) -> Tile {
        // Quantization memo, scoped to this build
        let mut colors: HashMap<String, Option<u8>> = HashMap::new();
        let mut layers = HashMap::with_capacity(decoded.layers.len());
        let mut total_nodes = 0;
        let mut dropped = 0;

        for decoded_layer in decoded.layers {
            let mut nodes = Vec::new();

            for feature in decoded_layer.features {
                let Some(style) = self.styler.style_for(&decoded_layer.name, &feature) else {
                    dropped += 1;
                    continue;
                };

                let color = style
                    .color()
                    .and_then(ColorValue::resolve)
                    .and_then(|hex| {
                        *colors
                            .entry(hex.to_string())
                            .or_insert_with(|| hex_to_ansi256(hex))
                    });
                let label = match style.kind {
                    StyleKind::Symbol => self.label_for(&feature),
                    _ => None,
                };

                for mut node in Self::nodes_for(Arc::new(feature), style) {
                    node.color = color;
                    node.label = label.clone();
                    nodes.push(node);
                }
            }

            total_nodes += nodes.len();
            layers.insert(
                decoded_layer.name.clone(),
                Layer::new(decoded_layer.name, decoded_layer.extent, nodes),
            );
        }

        debug!(
            tile = %id,
            layers = layers.len(),
            nodes = total_nodes,
            unstyled = dropped,
            "Built tile index"
        );

        Tile { id, layers }
    }

    /// Label text: `name_{lang}`, `name_en`, `name`, then `house_num`.
    ///
    /// Empty strings count as unset and fall through to the next key.
    fn label_for(&self, feature: &Feature) -> Option<String> {
        let preferred = format!("name_{}", self.language);
        let label = std::iter::once(preferred.as_str())
            .chain(LABEL_FALLBACK_KEYS)
            .find_map(|key| match feature.property(key)? {
                PropertyValue::String(s) if !s.is_empty() => Some(s.clone()),
                PropertyValue::Number(n) => Some(n.to_string()),
                PropertyValue::String(_) | PropertyValue::Bool(_) => None,
            });
        label
    }

    fn nodes_for(feature: Arc<Feature>, style: Arc<Style>) -> Vec<StyledNode> {
        if style.kind == StyleKind::Fill {
            let Some(bbox) = feature.geometry.first().and_then(|ring| Bbox::from_points(ring))
            else {
                return Vec::new();
            };
            let rings = 0..feature.geometry.len();
            return vec![StyledNode::new(feature, style, bbox, rings)];
        }

        feature
            .geometry
            .iter()
            .enumerate()
            .filter_map(|(i, ring)| Some((i, Bbox::from_points(ring)?)))
            .map(|(i, bbox)| {
                StyledNode::new(Arc::clone(&feature), Arc::clone(&style), bbox, i..i + 1)
            })
            .collect()
    }
}
