//! Axis-aligned rectangles.

use crate::codec::Point;

/// Closed axis-aligned rectangle `[min_x, max_x] × [min_y, max_y]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bbox {
    /// Creates a rectangle, swapping bounds given in the wrong order.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// Smallest rectangle covering `points`; `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let start = Bbox {
            min_x: f64::from(first.x),
            min_y: f64::from(first.y),
            max_x: f64::from(first.x),
            max_y: f64::from(first.y),
        };
        Some(rest.iter().fold(start, |bbox, p| {
            let (x, y) = (f64::from(p.x), f64::from(p.y));
            Bbox {
                min_x: bbox.min_x.min(x),
                min_y: bbox.min_y.min(y),
                max_x: bbox.max_x.max(x),
                max_y: bbox.max_y.max(y),
            }
        }))
    }

    /// Inclusive intersection test; rectangles sharing an edge intersect.
    #[inline]
    pub fn intersects(&self, other: &Bbox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
