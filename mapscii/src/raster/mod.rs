//! Terminal raster output.
//!
//! [`RasterBuffer`] packs 2×4 pixels into one character cell using the
//! braille block (U+2800–U+28FF), with a block-character fallback for
//! terminals without braille glyphs. Cell `(x >> 1) + (width >> 1) * (y >> 2)`
//! holds the dots of pixel `(x, y)`:
//!
//! ```text
//!   x&1:  0     1
//! y&3=0  0x01  0x08
//! y&3=1  0x02  0x10
//! y&3=2  0x04  0x20
//! y&3=3  0x40  0x80
//! ```

mod ascii;
mod buffer;

pub use buffer::{RasterBuffer, DELIMITER, TERM_RESET};

/// Dot bit for pixel `(x, y)` within its cell, indexed `[y & 3][x & 1]`.
pub const BRAILLE_MAP: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];
