//! Style descriptors consumed by the tile builder.

use serde_json::Value;
use std::collections::HashMap;

/// Rendering type of a style layer.
///
/// Types this crate does not render keep their name in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Fill,
    Line,
    Symbol,
    Background,
    Other(String),
}

impl StyleKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "fill" => StyleKind::Fill,
            "line" => StyleKind::Line,
            "symbol" => StyleKind::Symbol,
            "background" => StyleKind::Background,
            other => StyleKind::Other(other.to_string()),
        }
    }
}

/// A paint color: either a plain value or a zoom-stop table.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorValue {
    Scalar(String),
    /// `(zoom, color)` pairs in declaration order
    Stops(Vec<(f64, String)>),
}

impl ColorValue {
    /// Color string to render with.
    ///
    /// Stop tables always resolve to their first stop, whatever the zoom.
    /// Zoom interpolation is not implemented.
    pub fn resolve(&self) -> Option<&str> {
        match self {
            ColorValue::Scalar(color) => Some(color),
            ColorValue::Stops(stops) => stops.first().map(|(_, color)| color.as_str()),
        }
    }

    /// Interpret a JSON paint value; unrecognized shapes yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(color) => Some(ColorValue::Scalar(color.clone())),
            Value::Object(map) => {
                let stops = map
                    .get("stops")?
                    .as_array()?
                    .iter()
                    .filter_map(|stop| {
                        let pair = stop.as_array()?;
                        let zoom = pair.first()?.as_f64()?;
                        let color = pair.get(1)?.as_str()?;
                        Some((zoom, color.to_string()))
                    })
                    .collect::<Vec<_>>();
                Some(ColorValue::Stops(stops))
            }
            _ => None,
        }
    }
}

/// Named paint properties of a style.
///
/// The color keys the renderer understands are typed; everything else is
/// kept verbatim in `other`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paint {
    pub line_color: Option<ColorValue>,
    pub fill_color: Option<ColorValue>,
    pub text_color: Option<ColorValue>,
    pub background_color: Option<ColorValue>,
    pub other: HashMap<String, Value>,
}

impl Paint {
    /// Build from a JSON `paint` object; non-objects give an empty paint.
    pub fn from_json(value: &Value) -> Self {
        let mut paint = Paint::default();
        let Some(map) = value.as_object() else {
            return paint;
        };

        for (key, value) in map {
            let slot = match key.as_str() {
                "line-color" => &mut paint.line_color,
                "fill-color" => &mut paint.fill_color,
                "text-color" => &mut paint.text_color,
                "background-color" => &mut paint.background_color,
                _ => {
                    paint.other.insert(key.clone(), value.clone());
                    continue;
                }
            };
            *slot = ColorValue::from_json(value);
        }

        paint
    }

    pub fn with_line_color(mut self, color: ColorValue) -> Self {
        self.line_color = Some(color);
        self
    }

    pub fn with_fill_color(mut self, color: ColorValue) -> Self {
        self.fill_color = Some(color);
        self
    }

    pub fn with_text_color(mut self, color: ColorValue) -> Self {
        self.text_color = Some(color);
        self
    }
}

/// A resolved style descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub id: String,
    pub kind: StyleKind,
    pub paint: Paint,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

impl Style {
    pub fn new(id: impl Into<String>, kind: StyleKind) -> Self {
        Self {
            id: id.into(),
            kind,
            paint: Paint::default(),
            min_zoom: None,
            max_zoom: None,
        }
    }

    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    /// The color a feature is drawn with:
    /// `line-color`, then `fill-color`, then `text-color`.
    pub fn color(&self) -> Option<&ColorValue> {
        self.paint
            .line_color
            .as_ref()
            .or(self.paint.fill_color.as_ref())
            .or(self.paint.text_color.as_ref())
    }

    /// Whether the style's zoom range includes `zoom`.
    pub fn visible_at(&self, zoom: f64) -> bool {
        self.min_zoom.map_or(true, |min| zoom >= min)
            && self.max_zoom.map_or(true, |max| zoom < max)
    }
}
