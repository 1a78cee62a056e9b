//! Block-character fallback for braille cells.

use std::sync::OnceLock;

/// Candidate glyphs and the dot masks they resemble, in priority order.
///
/// Masks use the braille bit layout of [`super::BRAILLE_MAP`].
const CANDIDATES: [(char, u8); 8] = [
    ('▀', 0x01 | 0x08 | 0x02 | 0x10),
    ('▄', 0x04 | 0x20 | 0x40 | 0x80),
    ('■', 0x02 | 0x10 | 0x04 | 0x20),
    ('▌', 0x01 | 0x02 | 0x04 | 0x40),
    ('▐', 0x08 | 0x10 | 0x20 | 0x80),
    ('▓', 0x01 | 0x10 | 0x04 | 0x80),
    ('▓', 0x08 | 0x02 | 0x20 | 0x40),
    ('█', 0xff),
];

/// Glyph for every 8-dot mask.
pub(crate) fn ascii_table() -> &'static [char; 256] {
    static TABLE: OnceLock<[char; 256]> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

fn build_table() -> [char; 256] {
    let mut table = [' '; 256];
    for mask in 1..=255u8 {
        let mut best = ' ';
        let mut best_overlap = 0;
        for (glyph, candidate) in CANDIDATES {
            let overlap = (mask & candidate).count_ones();
            if overlap > best_overlap {
                best_overlap = overlap;
                best = glyph;
            }
        }
        table[usize::from(mask)] = best;
    }
    table
}
