//! Feature styling.
//!
//! The tile builder only talks to the [`Styler`] trait. [`StyleSheet`] is
//! the stock implementation backed by a Mapbox GL style document; tests and
//! embedders can supply their own (closures implement the trait too).

mod error;
mod filter;
mod sheet;
mod types;

pub use error::StyleError;
pub use filter::{CompareOp, Filter};
pub use sheet::StyleSheet;
pub use types::{ColorValue, Paint, Style, StyleKind};

use crate::codec::Feature;
use std::sync::Arc;

/// Resolves the style a feature is drawn with.
///
/// Returning `None` excludes the feature from the tile.
pub trait Styler: Send + Sync {
    fn style_for(&self, layer: &str, feature: &Feature) -> Option<Arc<Style>>;
}

impl<F> Styler for F
where
    F: Fn(&str, &Feature) -> Option<Arc<Style>> + Send + Sync,
{
    fn style_for(&self, layer: &str, feature: &Feature) -> Option<Arc<Style>> {
        self(layer, feature)
    }
}
