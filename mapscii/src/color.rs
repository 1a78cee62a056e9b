//! Hex color to xterm-256 palette quantization.
//!
//! Only the portable part of the palette is searched: the 6×6×6 cube
//! (16–231) and the grayscale ramp (232–255). Indices 0–15 depend on the
//! terminal theme, and index 0 doubles as "no color" in the raster buffer.

/// First palette index considered by [`hex_to_ansi256`].
const FIRST_PORTABLE_INDEX: u8 = 16;

/// Parse `#rgb` or `#rrggbb` (leading `#` optional) into components.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.is_ascii() {
        return None;
    }

    match digits.len() {
        3 => {
            let mut channels = digits
                .chars()
                .map(|c| c.to_digit(16).map(|v| (v * 17) as u8));
            Some((channels.next()??, channels.next()??, channels.next()??))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

/// RGB value of an xterm-256 palette index (16–255).
///
/// Indices below 16 are mapped onto the grayscale ramp start; they are never
/// produced by [`hex_to_ansi256`].
pub fn ansi256_to_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => (0, 0, 0),
        16..=231 => {
            let idx = index - 16;
            // Cube levels: 0, 95, 135, 175, 215, 255
            let level = |i: u8| if i == 0 { 0 } else { 55 + 40 * i };
            (level(idx / 36), level((idx % 36) / 6), level(idx % 6))
        }
        232..=255 => {
            let v = 8 + 10 * (index - 232);
            (v, v, v)
        }
    }
}

/// Nearest palette index by squared RGB distance.
pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    let mut best_index = FIRST_PORTABLE_INDEX;
    let mut best_distance = u32::MAX;

    for index in FIRST_PORTABLE_INDEX..=255 {
        let (pr, pg, pb) = ansi256_to_rgb(index);
        let dr = i32::from(r) - i32::from(pr);
        let dg = i32::from(g) - i32::from(pg);
        let db = i32::from(b) - i32::from(pb);
        let distance = (dr * dr + dg * dg + db * db) as u32;

        if distance < best_distance {
            best_distance = distance;
            best_index = index;
            if distance == 0 {
                break;
            }
        }
    }

    best_index
}

/// Quantize a hex color string to the nearest xterm-256 index.
///
/// Returns `None` for strings that are not `#rgb`/`#rrggbb`.
pub fn hex_to_ansi256(hex: &str) -> Option<u8> {
    let (r, g, b) = parse_hex(hex)?;
    Some(rgb_to_ansi256(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        assert_eq!(parse_hex("#ff8000"), Some((255, 128, 0)));
        assert_eq!(parse_hex("00ff00"), Some((0, 255, 0)));
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(parse_hex("#f00"), Some((255, 0, 0)));
        assert_eq!(parse_hex("#abc"), Some((0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn test_parse_invalid_hex() {
        assert_eq!(parse_hex("#ggg"), None);
        assert_eq!(parse_hex("#ff00"), None);
        assert_eq!(parse_hex("red"), None);
        assert_eq!(parse_hex("#ffé00"), None);
    }

    #[test]
    fn test_exact_cube_colors() {
        assert_eq!(hex_to_ansi256("#ff0000"), Some(196));
        assert_eq!(hex_to_ansi256("#00ff00"), Some(46));
        assert_eq!(hex_to_ansi256("#0000ff"), Some(21));
        assert_eq!(hex_to_ansi256("#ffffff"), Some(231));
        assert_eq!(hex_to_ansi256("#000000"), Some(16));
    }

    #[test]
    fn test_gray_prefers_ramp() {
        assert_eq!(hex_to_ansi256("#808080"), Some(244));
    }

    #[test]
    fn test_never_returns_system_colors() {
        for hex in ["#000000", "#800000", "#c0c0c0", "#123456"] {
            let index = hex_to_ansi256(hex).unwrap();
            assert!(index >= 16, "{} mapped to system color {}", hex, index);
        }
    }

    #[test]
    fn test_palette_roundtrip() {
        for index in 16..=255u8 {
            let (r, g, b) = ansi256_to_rgb(index);
            let back = rgb_to_ansi256(r, g, b);
            assert_eq!(ansi256_to_rgb(back), (r, g, b));
        }
    }
}
