//! Render command - draw one tile into a raster buffer and print the frame.
//!
//! Drawing happens in three passes over the tile's layers (fills, then
//! lines, then symbols) so labels land on top of geometry. Labels are
//! placed greedily; a label whose footprint collides with an earlier one
//! is dropped.

use mapscii::codec::Point;
use mapscii::color::hex_to_ansi256;
use mapscii::coord::TileId;
use mapscii::index::Bbox;
use mapscii::label::LabelPlacer;
use mapscii::raster::RasterBuffer;
use mapscii::style::StyleKind;
use mapscii::tile::{StyledNode, Tile};
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

use super::common::{open_source, SourceArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Color used when a style resolves to no usable color.
const FALLBACK_COLOR: u8 = 250;

/// Arguments for the render command.
pub struct RenderArgs {
    pub tile: TileId,
    pub source: SourceArgs,
    pub width: usize,
    pub height: usize,
    pub ascii: bool,
}

/// Run the render command.
pub fn run(args: RenderArgs) -> Result<(), CliError> {
    if args.width < 2 || args.height < 4 {
        return Err(CliError::Args(format!(
            "canvas {}x{} is smaller than one character cell (2x4)",
            args.width, args.height
        )));
    }

    let runner = CliRunner::new()?;
    runner.log_startup("render");

    let config = args.source.to_config().with_braille(!args.ascii);
    let sheet = Arc::new(args.source.load_style()?);
    let background = sheet.background_color().and_then(hex_to_ansi256);
    let source = open_source(&config, Arc::clone(&sheet))?;

    let tile = runner.block_on(source.get_tile(args.tile.z, args.tile.x, args.tile.y))?;

    let mut canvas = RasterBuffer::new(args.width, args.height);
    canvas.set_braille(config.use_braille());
    if let Some(color) = background {
        canvas.set_global_background(color);
    }

    let mut placer = LabelPlacer::new();
    let labels = draw_tile(&mut canvas, &mut placer, &tile, config.label_margin());
    debug!(tile = %tile.id, nodes = tile.node_count(), labels, "Tile rendered");

    println!("{}", canvas.frame());
    Ok(())
}

/// Which styles a pass draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Fill,
    Line,
    Symbol,
}

impl Pass {
    fn accepts(self, kind: &StyleKind) -> bool {
        matches!(
            (self, kind),
            (Pass::Fill, StyleKind::Fill)
                | (Pass::Line, StyleKind::Line)
                | (Pass::Symbol, StyleKind::Symbol)
        )
    }
}

/// Draw every visible node of `tile` onto `canvas`.
///
/// Returns the number of labels placed.
pub fn draw_tile(
    canvas: &mut RasterBuffer,
    placer: &mut LabelPlacer,
    tile: &Tile,
    label_margin: u32,
) -> usize {
    placer.clear();
    let zoom = f64::from(tile.id.z);

    let mut names: Vec<&String> = tile.layers.keys().collect();
    names.sort();

    let mut labels = 0;
    for pass in [Pass::Fill, Pass::Line, Pass::Symbol] {
        for name in &names {
            let Some(layer) = tile.layer(name) else {
                continue;
            };
            let extent = f64::from(layer.extent.max(1));
            let view = Bbox::new(0.0, 0.0, extent, extent);
            let scale = Scale::new(canvas, extent);

            for node in layer.query(&view) {
                if !pass.accepts(&node.style.kind) || !node.style.visible_at(zoom) {
                    continue;
                }
                let color = node.color.unwrap_or(FALLBACK_COLOR);
                match pass {
                    Pass::Fill => fill_rings(canvas, node, &scale, color),
                    Pass::Line => {
                        for ring in node.rings() {
                            draw_polyline(canvas, ring, &scale, color);
                        }
                    }
                    Pass::Symbol => {
                        if draw_symbol(canvas, placer, node, &scale, color, label_margin) {
                            labels += 1;
                        }
                    }
                }
            }
        }
    }
    labels
}

/// Maps tile-local coordinates onto canvas pixels.
struct Scale {
    x: f64,
    y: f64,
}

impl Scale {
    fn new(canvas: &RasterBuffer, extent: f64) -> Self {
        Self {
            x: canvas.width() as f64 / extent,
            y: canvas.height() as f64 / extent,
        }
    }

    fn project(&self, point: &Point) -> (f64, f64) {
        (f64::from(point.x) * self.x, f64::from(point.y) * self.y)
    }

    fn pixel(&self, point: &Point) -> (i32, i32) {
        let (x, y) = self.project(point);
        (x.floor() as i32, y.floor() as i32)
    }
}

fn draw_polyline(canvas: &mut RasterBuffer, ring: &[Point], scale: &Scale, color: u8) {
    match ring {
        [] => {}
        [only] => {
            let (x, y) = scale.pixel(only);
            canvas.set_pixel(x, y, color);
        }
        _ => {
            for pair in ring.windows(2) {
                let (x0, y0) = scale.pixel(&pair[0]);
                let (x1, y1) = scale.pixel(&pair[1]);
                draw_line(canvas, x0, y0, x1, y1, color);
            }
        }
    }
}

/// Bresenham line; pixels outside the canvas are clipped by the buffer.
fn draw_line(canvas: &mut RasterBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u8) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        canvas.set_pixel(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Even-odd scanline fill over all rings of a fill node; holes stay empty.
fn fill_rings(canvas: &mut RasterBuffer, node: &StyledNode, scale: &Scale, color: u8) {
    let rings: Vec<Vec<(f64, f64)>> = node
        .rings()
        .iter()
        .map(|ring| ring.iter().map(|p| scale.project(p)).collect())
        .collect();

    let (min_y, max_y) = rings
        .iter()
        .flatten()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    if min_y > max_y {
        return;
    }

    let top = (min_y.floor() as i32).max(0);
    let bottom = (max_y.ceil() as i32).min(canvas.height() as i32 - 1);
    let mut crossings = Vec::new();

    for py in top..=bottom {
        let scan = f64::from(py) + 0.5;
        crossings.clear();

        for ring in &rings {
            for (i, &(x0, y0)) in ring.iter().enumerate() {
                let (x1, y1) = ring[(i + 1) % ring.len()];
                if (y0 <= scan) != (y1 <= scan) {
                    crossings.push(x0 + (scan - y0) / (y1 - y0) * (x1 - x0));
                }
            }
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            for px in clamp_span(span[0], span[1], canvas.width()) {
                canvas.set_pixel(px, py, color);
            }
        }
    }
}

/// Pixel columns covered by a fill span, limited to the canvas width.
fn clamp_span(start: f64, end: f64, width: usize) -> Range<i32> {
    let width = i32::try_from(width).unwrap_or(i32::MAX);
    let start = (start.round() as i32).max(0);
    let end = (end.round() as i32).min(width);
    start..end.max(start)
}

/// Draw a symbol node's label, or a single dot when it has none.
///
/// Returns true when a label was placed.
fn draw_symbol(
    canvas: &mut RasterBuffer,
    placer: &mut LabelPlacer,
    node: &StyledNode,
    scale: &Scale,
    color: u8,
    margin: u32,
) -> bool {
    let Some(anchor) = node.rings().first().and_then(|ring| ring.first()) else {
        return false;
    };
    let (px, py) = scale.project(anchor);

    let Some(text) = node.label.as_deref() else {
        let (x, y) = scale.pixel(anchor);
        canvas.set_pixel(x, y, color);
        return false;
    };

    if !placer.try_place(text, px, py, &node.feature, margin) {
        return false;
    }
    let (cx, cy) = LabelPlacer::project(px, py);
    canvas.write_text(text, cx as i32, cy as i32, color, true);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapscii::codec::{DecodedLayer, DecodedTile, Feature, FeatureKind, PropertyValue};
    use mapscii::style::{ColorValue, Paint, Style, Styler};
    use mapscii::tile::TileIndexBuilder;
    use std::collections::HashMap;

    fn feature(kind: FeatureKind, geometry: Vec<Vec<Point>>, name: Option<&str>) -> Feature {
        let mut properties = HashMap::new();
        if let Some(name) = name {
            properties.insert("name".to_string(), PropertyValue::String(name.to_string()));
        }
        Feature {
            id: None,
            kind,
            geometry,
            properties,
        }
    }

    fn build(features: Vec<Feature>, kind: StyleKind) -> Tile {
        let style = Arc::new(
            Style::new("test", kind)
                .with_paint(Paint::default().with_line_color(ColorValue::Scalar("#ff0000".into()))),
        );
        let styler: Arc<dyn Styler> =
            Arc::new(move |_: &str, _: &Feature| Some(Arc::clone(&style)));
        let decoded = DecodedTile {
            layers: vec![DecodedLayer {
                name: "layer".to_string(),
                extent: 64,
                version: 2,
                features,
            }],
        };
        TileIndexBuilder::new(styler, "en").build(TileId::new(0, 0, 0), decoded)
    }

    fn lit_cells(canvas: &RasterBuffer) -> usize {
        let mut lit = 0;
        for cy in 0..canvas.rows() as i32 {
            for cx in 0..canvas.columns() as i32 {
                if canvas.cell_mask(cx, cy).unwrap_or(0) != 0 {
                    lit += 1;
                }
            }
        }
        lit
    }

    #[test]
    fn test_draw_line_endpoints() {
        let mut canvas = RasterBuffer::new(8, 8);
        draw_line(&mut canvas, 0, 0, 7, 7, 1);
        assert_eq!(canvas.cell_mask(0, 0), Some(0x01 | 0x10));
        assert_eq!(canvas.cell_mask(1, 0), Some(0x04 | 0x80));
        assert_eq!(canvas.cell_mask(3, 1), Some(0x04 | 0x80));
        assert_eq!(canvas.cell_mask(3, 0), Some(0));
    }

    #[test]
    fn test_line_pass_draws_diagonal() {
        let tile = build(
            vec![feature(
                FeatureKind::LineString,
                vec![vec![Point::new(0, 0), Point::new(63, 63)]],
                None,
            )],
            StyleKind::Line,
        );
        let mut canvas = RasterBuffer::new(16, 16);
        let mut placer = LabelPlacer::new();
        draw_tile(&mut canvas, &mut placer, &tile, 0);

        assert_ne!(canvas.cell_mask(0, 0), Some(0));
        assert_ne!(canvas.cell_mask(7, 3), Some(0));
        assert_eq!(canvas.cell_mask(7, 0), Some(0));
    }

    #[test]
    fn test_fill_pass_covers_square() {
        let square = vec![
            Point::new(0, 0),
            Point::new(64, 0),
            Point::new(64, 64),
            Point::new(0, 64),
            Point::new(0, 0),
        ];
        let tile = build(
            vec![feature(FeatureKind::Polygon, vec![square], None)],
            StyleKind::Fill,
        );
        let mut canvas = RasterBuffer::new(8, 8);
        let mut placer = LabelPlacer::new();
        draw_tile(&mut canvas, &mut placer, &tile, 0);

        assert_eq!(lit_cells(&canvas), canvas.columns() * canvas.rows());
        assert_eq!(canvas.cell_mask(0, 0), Some(0xFF));
    }

    #[test]
    fn test_clamp_span() {
        assert_eq!(clamp_span(-1.0e9, 1.0e9, 16), 0..16);
        assert_eq!(clamp_span(2.4, 5.6, 16), 2..6);
        assert_eq!(clamp_span(20.0, 30.0, 16), 20..20);
        assert!(clamp_span(-30.0, -20.0, 16).is_empty());
    }

    #[test]
    fn test_fill_beyond_tile_bounds_is_clipped() {
        let square = vec![
            Point::new(-4_000_000, -4_000_000),
            Point::new(4_000_000, -4_000_000),
            Point::new(4_000_000, 4_000_000),
            Point::new(-4_000_000, 4_000_000),
            Point::new(-4_000_000, -4_000_000),
        ];
        let tile = build(
            vec![feature(FeatureKind::Polygon, vec![square], None)],
            StyleKind::Fill,
        );
        let mut canvas = RasterBuffer::new(8, 8);
        let mut placer = LabelPlacer::new();
        draw_tile(&mut canvas, &mut placer, &tile, 0);

        assert_eq!(lit_cells(&canvas), canvas.columns() * canvas.rows());
    }

    #[test]
    fn test_colliding_labels_are_dropped() {
        let tile = build(
            vec![
                feature(FeatureKind::Point, vec![vec![Point::new(10, 10)]], Some("Berlin")),
                feature(FeatureKind::Point, vec![vec![Point::new(11, 10)]], Some("Potsdam")),
                feature(FeatureKind::Point, vec![vec![Point::new(10, 60)]], Some("Leipzig")),
            ],
            StyleKind::Symbol,
        );
        let mut canvas = RasterBuffer::new(128, 128);
        let mut placer = LabelPlacer::new();
        let placed = draw_tile(&mut canvas, &mut placer, &tile, 1);

        assert_eq!(placed, 2);
        assert_eq!(placer.len(), 2);
        assert!(canvas.frame().contains('B') || canvas.frame().contains('P'));
        assert!(canvas.frame().contains("Leipzig"));
    }

    #[test]
    fn test_unlabeled_symbol_draws_dot() {
        let tile = build(
            vec![feature(FeatureKind::Point, vec![vec![Point::new(0, 0)]], None)],
            StyleKind::Symbol,
        );
        let mut canvas = RasterBuffer::new(8, 8);
        let mut placer = LabelPlacer::new();
        let placed = draw_tile(&mut canvas, &mut placer, &tile, 0);

        assert_eq!(placed, 0);
        assert_eq!(canvas.cell_mask(0, 0), Some(0x01));
    }
}
