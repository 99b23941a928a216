//! Color and frame primitives
//!
//! A `Frame` is one complete set of per-LED colors for one point in time.
//! Frames always have length equal to the configured LED count; producing a
//! frame of any other length is a caller bug, not something downstream code
//! repairs by truncating or padding.
//!
//! Color strings are validated at the boundary: `parse_hex` accepts the
//! strict `#RRGGBB` form and rejects everything else. After parsing, each
//! component is a `u8`, so out-of-range values are unrepresentable.

use crate::error::{Error, Result};

/// One RGB pixel, 8 bits per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// All components off
    pub const BLACK: Color = Color::new(0, 0, 0);

    /// Full white
    pub const WHITE: Color = Color::new(255, 255, 255);

    /// Create a color from component values
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

/// One complete set of per-LED colors for one point in time
pub type Frame = Vec<Color>;

/// Parse a strict `#RRGGBB` hexadecimal color string.
///
/// Both upper- and lowercase hex digits are accepted. Anything else
/// (missing `#`, wrong length, non-hex characters) is rejected with a
/// validation error naming the received value.
pub fn parse_hex(s: &str) -> Result<Color> {
    let malformed = || {
        Error::Validation(format!(
            "expected a color in the format #RRGGBB, received '{}'",
            s
        ))
    };

    let hex = s.strip_prefix('#').ok_or_else(malformed)?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| malformed())?;
    let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| malformed())?;
    let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| malformed())?;
    Ok(Color::new(r, g, b))
}

/// All-off frame of the given length
pub fn black_frame(led_count: usize) -> Frame {
    vec![Color::BLACK; led_count]
}

/// Tile `colors` across a strip of `led_count` pixels in blocks of `block`
/// consecutive pixels per color, cycling through the list until the strip
/// is full. The final block is cut short if `led_count` is not a multiple
/// of `block`.
pub fn spread(colors: &[Color], led_count: usize, block: usize) -> Frame {
    debug_assert!(!colors.is_empty());
    debug_assert!(block > 0);

    let mut frame = Frame::with_capacity(led_count);
    let mut index = 0;
    while frame.len() < led_count {
        let take = block.min(led_count - frame.len());
        frame.extend(std::iter::repeat(colors[index % colors.len()]).take(take));
        index += 1;
    }
    frame
}

/// Rotate a frame right by `n` pixels (the last `n` move to the front).
pub fn rotate_right(frame: &mut Frame, n: usize) {
    if frame.is_empty() {
        return;
    }
    let n = n % frame.len();
    frame.rotate_right(n);
}

/// Component-wise linear interpolation between two colors.
///
/// `t` is clamped to `[0, 1]`; `t = 0` yields `a`, `t = 1` yields `b`.
pub fn lerp(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| -> u8 { (f32::from(x) + (f32::from(y) - f32::from(x)) * t).round() as u8 };
    Color::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_valid() {
        assert_eq!(parse_hex("#FF00AA").unwrap(), Color::new(255, 0, 170));
        assert_eq!(parse_hex("#ff00aa").unwrap(), Color::new(255, 0, 170));
        assert_eq!(parse_hex("#000000").unwrap(), Color::BLACK);
        assert_eq!(parse_hex("#FFFFFF").unwrap(), Color::WHITE);
    }

    #[test]
    fn test_parse_hex_rejects_malformed() {
        for bad in ["FF00AA", "#FF00A", "#FF00AAB", "#ZZZZZZ", "", "#", "#GG0000"] {
            let err = parse_hex(bad).unwrap_err();
            assert!(
                err.to_string().contains(bad),
                "error for {:?} should name the value: {}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_spread_fills_exact_length() {
        let colors = [Color::new(1, 0, 0), Color::new(0, 2, 0)];
        let frame = spread(&colors, 10, 3);
        assert_eq!(frame.len(), 10);
        // Blocks: 3x(1,0,0), 3x(0,2,0), 3x(1,0,0), 1x(0,2,0)
        assert_eq!(frame[0], Color::new(1, 0, 0));
        assert_eq!(frame[3], Color::new(0, 2, 0));
        assert_eq!(frame[6], Color::new(1, 0, 0));
        assert_eq!(frame[9], Color::new(0, 2, 0));
    }

    #[test]
    fn test_rotate_right_wraps() {
        let mut frame = vec![Color::new(1, 0, 0), Color::new(2, 0, 0), Color::new(3, 0, 0)];
        rotate_right(&mut frame, 1);
        assert_eq!(
            frame,
            vec![Color::new(3, 0, 0), Color::new(1, 0, 0), Color::new(2, 0, 0)]
        );
        rotate_right(&mut frame, 3); // full rotation is identity
        assert_eq!(frame[0], Color::new(3, 0, 0));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::new(0, 100, 200);
        let b = Color::new(255, 0, 100);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert_eq!(lerp(a, b, 0.5), Color::new(128, 50, 150));
    }
}
