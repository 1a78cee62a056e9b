//! Overlap-free label placement.
//!
//! Labels are placed greedily in draw order: each accepted label reserves a
//! padded footprint in character-cell space, and later labels whose
//! footprint touches a reservation are rejected. The placer is cleared at
//! the start of every render pass.

use crate::codec::Feature;
use crate::index::{Bbox, Bounded, SpatialIndex, WideTreeParams};
use std::sync::{Arc, Weak};
use unicode_width::UnicodeWidthStr;

/// Padding, in cells, reserved around each label.
pub const DEFAULT_LABEL_MARGIN: u32 = 5;

/// A reserved label footprint.
#[derive(Debug, Clone)]
pub struct PlacedLabel {
    pub bbox: Bbox,
    /// Feature the label belongs to; not kept alive by the placer
    pub feature: Weak<Feature>,
}

impl Bounded for PlacedLabel {
    fn bbox(&self) -> Bbox {
        self.bbox
    }
}

/// Greedy label placer over a spatial index of reserved footprints.
#[derive(Debug, Default)]
pub struct LabelPlacer {
    index: SpatialIndex<PlacedLabel, WideTreeParams>,
}

impl LabelPlacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every reservation.
    pub fn clear(&mut self) {
        self.index.clear();
    }

    /// Map a braille pixel position to its character cell.
    #[inline]
    pub fn project(px: f64, py: f64) -> (f64, f64) {
        ((px / 2.0).floor(), (py / 4.0).floor())
    }

    /// Footprint of `text` anchored at pixel `(px, py)`.
    pub fn footprint(text: &str, px: f64, py: f64, margin: u32) -> Bbox {
        let (cx, cy) = Self::project(px, py);
        let margin = f64::from(margin);
        let width = text.width() as f64;
        Bbox::new(
            cx - margin,
            cy - margin / 2.0,
            cx + margin + width,
            cy + margin / 2.0,
        )
    }

    /// Reserve room for `text` at pixel `(px, py)`.
    ///
    /// Returns false, leaving the placer untouched, when the footprint
    /// intersects an existing reservation.
    pub fn try_place(
        &mut self,
        text: &str,
        px: f64,
        py: f64,
        feature: &Arc<Feature>,
        margin: u32,
    ) -> bool {
        let bbox = Self::footprint(text, px, py, margin);
        if self.index.collides(&bbox) {
            return false;
        }

        self.index.insert(PlacedLabel {
            bbox,
            feature: Arc::downgrade(feature),
        });
        true
    }

    /// Whether `text` could be placed at `(px, py)` right now.
    pub fn would_fit(&self, text: &str, px: f64, py: f64, margin: u32) -> bool {
        !self.index.collides(&Self::footprint(text, px, py, margin))
    }

    /// Reservations intersecting `bbox` (cell space).
    pub fn placed_in(&self, bbox: &Bbox) -> impl Iterator<Item = &PlacedLabel> + '_ {
        self.index.search(bbox)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
