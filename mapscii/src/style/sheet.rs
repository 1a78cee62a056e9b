//! Mapbox GL style documents.

use super::filter::Filter;
use super::types::{ColorValue, Paint, Style, StyleKind};
use super::{StyleError, Styler};
use crate::codec::Feature;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    layers: Vec<RawLayer>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawLayer {
    id: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(rename = "source-layer", default)]
    source_layer: Option<String>,
    #[serde(default)]
    filter: Option<Value>,
    #[serde(default)]
    paint: Option<Value>,
    #[serde(rename = "ref", default)]
    reference: Option<String>,
    #[serde(default)]
    minzoom: Option<f64>,
    #[serde(default)]
    maxzoom: Option<f64>,
}

impl RawLayer {
    /// Fill every field this layer omits from `base`.
    fn inherit(&mut self, base: &RawLayer) {
        if self.kind.is_none() {
            self.kind = base.kind.clone();
        }
        if self.source_layer.is_none() {
            self.source_layer = base.source_layer.clone();
        }
        if self.filter.is_none() {
            self.filter = base.filter.clone();
        }
        if self.paint.is_none() {
            self.paint = base.paint.clone();
        }
        if self.minzoom.is_none() {
            self.minzoom = base.minzoom;
        }
        if self.maxzoom.is_none() {
            self.maxzoom = base.maxzoom;
        }
    }
}

#[derive(Debug)]
struct Rule {
    style: Arc<Style>,
    filter: Option<Filter>,
}

impl Rule {
    fn applies_to(&self, feature: &Feature) -> bool {
        self.filter.as_ref().map_or(true, |f| f.matches(feature))
    }
}

/// A loaded style document acting as a [`Styler`].
///
/// Styles are grouped by `source-layer` in declaration order; the first
/// style whose filter matches a feature wins.
///
/// # Example
///
/// ```
/// use mapscii::style::{StyleSheet, Styler};
///
/// let sheet = StyleSheet::from_json(r##"{
///     "layers": [
///         {"id": "bg", "type": "background", "paint": {"background-color": "#111"}},
///         {"id": "water", "type": "fill", "source-layer": "water",
///          "paint": {"fill-color": "#0000ff"}}
///     ]
/// }"##).unwrap();
///
/// assert_eq!(sheet.background_color(), Some("#111"));
/// assert_eq!(sheet.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct StyleSheet {
    name: Option<String>,
    by_layer: HashMap<String, Vec<Rule>>,
    by_id: HashMap<String, Arc<Style>>,
    background: Option<ColorValue>,
}

impl StyleSheet {
    /// Parse a style document from a JSON string.
    ///
    /// # Errors
    ///
    /// * [`StyleError::Json`] - the document is not a style object
    /// * [`StyleError::UnknownRef`] - a `ref` names a layer not declared earlier
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        let document: RawDocument = serde_json::from_str(json)?;
        let mut declared: HashMap<String, RawLayer> = HashMap::new();
        let mut sheet = StyleSheet {
            name: document.name,
            ..Default::default()
        };

        for mut raw in document.layers {
            if let Some(reference) = raw.reference.clone() {
                let base = declared
                    .get(&reference)
                    .ok_or_else(|| StyleError::UnknownRef {
                        layer: raw.id.clone(),
                        reference,
                    })?;
                raw.inherit(base);
            }

            let kind = raw
                .kind
                .as_deref()
                .map(StyleKind::parse)
                .unwrap_or_else(|| StyleKind::Other(String::new()));
            let paint = raw.paint.as_ref().map(Paint::from_json).unwrap_or_default();

            if kind == StyleKind::Background && sheet.background.is_none() {
                sheet.background = paint.background_color.clone();
            }

            let style = Arc::new(Style {
                id: raw.id.clone(),
                kind,
                paint,
                min_zoom: raw.minzoom,
                max_zoom: raw.maxzoom,
            });

            if let Some(source_layer) = &raw.source_layer {
                sheet
                    .by_layer
                    .entry(source_layer.clone())
                    .or_default()
                    .push(Rule {
                        style: Arc::clone(&style),
                        filter: raw.filter.as_ref().map(Filter::from_json),
                    });
            }

            sheet.by_id.insert(raw.id.clone(), style);
            declared.insert(raw.id.clone(), raw);
        }

        debug!(
            styles = sheet.by_id.len(),
            source_layers = sheet.by_layer.len(),
            "Loaded style sheet"
        );

        Ok(sheet)
    }

    /// Read and parse a style document from disk.
    pub fn from_path(path: &Path) -> Result<Self, StyleError> {
        let json = std::fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Document `name`, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Color of the first `background` layer.
    pub fn background_color(&self) -> Option<&str> {
        self.background.as_ref().and_then(ColorValue::resolve)
    }

    /// Look up a style by its id.
    pub fn style(&self, id: &str) -> Option<Arc<Style>> {
        self.by_id.get(id).cloned()
    }

    /// Number of declared styles.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Styler for StyleSheet {
    fn style_for(&self, layer: &str, feature: &Feature) -> Option<Arc<Style>> {
        self.by_layer
            .get(layer)?
            .iter()
            .find(|rule| rule.applies_to(feature))
            .map(|rule| Arc::clone(&rule.style))
    }
}
