//! Geometry command stream decoding.
//!
//! A feature's geometry is a flat `u32` stream of command integers
//! (`id | count << 3`) each followed by `count` zig-zag encoded
//! `(dx, dy)` parameter pairs. The cursor position carries across rings.

use super::error::CodecError;
use super::types::{Point, Ring};

const MOVE_TO: u32 = 1;
const LINE_TO: u32 = 2;
const CLOSE_PATH: u32 = 7;

#[inline]
fn zigzag(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Decode a command stream into rings.
///
/// Every MoveTo point opens a new ring, so a multi-point yields one
/// single-point ring per point. ClosePath repeats the ring's first point.
pub fn decode_geometry(commands: &[u32]) -> Result<Vec<Ring>, CodecError> {
    let mut rings = Vec::new();
    let mut ring: Ring = Vec::new();
    let (mut x, mut y) = (0i32, 0i32);
    let mut i = 0;

    while i < commands.len() {
        let command = commands[i];
        i += 1;

        let id = command & 0x7;
        let count = (command >> 3) as usize;

        match id {
            MOVE_TO | LINE_TO => {
                for _ in 0..count {
                    let (Some(&px), Some(&py)) = (commands.get(i), commands.get(i + 1)) else {
                        return Err(CodecError::corrupt("truncated geometry parameters"));
                    };
                    i += 2;

                    x = x.wrapping_add(zigzag(px));
                    y = y.wrapping_add(zigzag(py));

                    if id == MOVE_TO && !ring.is_empty() {
                        rings.push(std::mem::take(&mut ring));
                    }
                    ring.push(Point { x, y });
                }
            }
            CLOSE_PATH => {
                if let Some(first) = ring.first().copied() {
                    ring.push(first);
                }
            }
            other => {
                return Err(CodecError::corrupt(format!(
                    "unknown geometry command {}",
                    other
                )));
            }
        }
    }

    if !ring.is_empty() {
        rings.push(ring);
    }

    Ok(rings)
}
