//! Animation engine
//!
//! Every pattern is a concrete type implementing [`Animation`]: a uniform
//! "produce the next frame" contract plus a `run` loop appropriate to its
//! category. Static patterns (solid color, off) transmit once and return;
//! dynamic patterns (fade, scroll, strobe, scroll_strobe) loop at their
//! tick rate until the shared shutdown flag clears.
//!
//! [`build`] is the factory: it selects a variant by name and validates its
//! arguments up front, so nothing in the per-frame hot path can fail on
//! malformed input.

pub mod dynamics;
pub mod statics;

pub use dynamics::{Fade, Scroll, ScrollStrobe, Strobe};
pub use statics::{Off, SolidColor};

use crate::color::{parse_hex, Color, Frame};
use crate::error::{Error, Result};
use crate::opc::packet::MAX_PIXELS;
use crate::opc::FrameSink;
use std::sync::atomic::AtomicBool;

/// One frame-producing strategy.
///
/// `next_frame` is deterministic given the variant's internal state and
/// always yields a frame of the configured LED count. `run` drives the
/// pattern against a sink: terminal for static variants, looping until
/// `running` clears for dynamic ones.
pub trait Animation {
    /// Produce the next frame, advancing any internal phase
    fn next_frame(&mut self) -> Frame;

    /// Drive this pattern against `sink` until done (static) or until
    /// `running` is cleared (dynamic)
    fn run(&mut self, sink: &mut dyn FrameSink, running: &AtomicBool) -> Result<()>;
}

/// Named optional arguments accepted by the factory
#[derive(Debug, Clone, Default)]
pub struct PatternArgs {
    /// Single color, `#RRGGBB` (required by `solid_color`)
    pub color: Option<String>,
    /// Color list, each `#RRGGBB` (required by `fade`, `scroll`,
    /// `scroll_strobe`)
    pub colors: Option<Vec<String>>,
    /// Tick rate override in frames per second (dynamic variants only)
    pub speed: Option<f64>,
}

/// Names accepted by [`build`], for callers that enumerate patterns
pub fn pattern_names() -> &'static [&'static str] {
    &["solid_color", "off", "fade", "scroll", "strobe", "scroll_strobe"]
}

/// Create an animation by name, validating its arguments.
///
/// Unknown names and malformed arguments fail here with an error naming
/// the offending value; no fallback variant is ever selected silently.
pub fn build(name: &str, led_count: usize, args: &PatternArgs) -> Result<Box<dyn Animation>> {
    // The wire format's 16-bit length field caps the frame size; reject
    // here so encoding stays total over everything the factory hands out.
    if led_count == 0 || led_count > MAX_PIXELS {
        return Err(Error::Validation(format!(
            "expected an LED count between 1 and {}, received {}",
            MAX_PIXELS, led_count
        )));
    }

    match name {
        "solid_color" => {
            let color = require_color(args)?;
            Ok(Box::new(SolidColor::new(led_count, color)))
        }
        "off" => Ok(Box::new(Off::new(led_count))),
        "fade" => {
            let colors = require_colors(args)?;
            let mut fade = Fade::new(led_count, colors);
            if let Some(speed) = validated_speed(args)? {
                fade.set_speed(speed);
            }
            Ok(Box::new(fade))
        }
        "scroll" => {
            let colors = require_colors(args)?;
            let mut scroll = Scroll::new(led_count, colors);
            if let Some(speed) = validated_speed(args)? {
                scroll.set_speed(speed);
            }
            Ok(Box::new(scroll))
        }
        "strobe" => {
            let mut strobe = Strobe::new(led_count);
            if let Some(speed) = validated_speed(args)? {
                strobe.set_speed(speed);
            }
            Ok(Box::new(strobe))
        }
        "scroll_strobe" => {
            let colors = require_colors(args)?;
            let mut pattern = ScrollStrobe::new(led_count, colors);
            if let Some(speed) = validated_speed(args)? {
                pattern.set_speed(speed);
            }
            Ok(Box::new(pattern))
        }
        other => Err(Error::UnknownPattern(other.to_string())),
    }
}

fn require_color(args: &PatternArgs) -> Result<Color> {
    match &args.color {
        Some(value) => parse_hex(value),
        None => Err(Error::Validation(
            "expected a color in the format #RRGGBB, received none".to_string(),
        )),
    }
}

fn require_colors(args: &PatternArgs) -> Result<Vec<Color>> {
    let values = match &args.colors {
        Some(values) if !values.is_empty() => values,
        _ => {
            return Err(Error::Validation(format!(
                "expected a non-empty list of #RRGGBB colors, received {:?}",
                args.colors
            )))
        }
    };
    values.iter().map(|value| parse_hex(value)).collect()
}

fn validated_speed(args: &PatternArgs) -> Result<Option<f64>> {
    match args.speed {
        None => Ok(None),
        Some(speed) if speed.is_finite() && speed > 0.0 => Ok(Some(speed)),
        Some(speed) => Err(Error::Validation(format!(
            "expected a positive tick rate, received {}",
            speed
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEDS: usize = 16;

    #[test]
    fn test_solid_color_requires_color() {
        let err = build("solid_color", LEDS, &PatternArgs::default()).err().unwrap();
        assert!(err.to_string().contains("none"), "{}", err);
    }

    #[test]
    fn test_solid_color_rejects_malformed_color() {
        let args = PatternArgs {
            color: Some("#ZZZZZZ".to_string()),
            ..Default::default()
        };
        let err = build("solid_color", LEDS, &args).err().unwrap();
        assert!(err.to_string().contains("#ZZZZZZ"), "{}", err);
    }

    #[test]
    fn test_solid_color_produces_constant_frame() {
        let args = PatternArgs {
            color: Some("#FF00AA".to_string()),
            ..Default::default()
        };
        let mut anim = build("solid_color", LEDS, &args).unwrap();
        for _ in 0..3 {
            let frame = anim.next_frame();
            assert_eq!(frame.len(), LEDS);
            assert!(frame.iter().all(|&c| c == Color::new(255, 0, 170)));
        }
    }

    #[test]
    fn test_unknown_pattern_names_the_value() {
        let err = build("not_a_pattern", LEDS, &PatternArgs::default()).err().unwrap();
        assert!(err.to_string().contains("not_a_pattern"), "{}", err);
    }

    #[test]
    fn test_color_list_must_be_non_empty_and_well_formed() {
        let empty = PatternArgs {
            colors: Some(vec![]),
            ..Default::default()
        };
        assert!(build("fade", LEDS, &empty).is_err());

        let missing = PatternArgs::default();
        assert!(build("scroll", LEDS, &missing).is_err());

        let malformed = PatternArgs {
            colors: Some(vec!["#00FF00".to_string(), "green".to_string()]),
            ..Default::default()
        };
        let err = build("scroll_strobe", LEDS, &malformed).err().unwrap();
        assert!(err.to_string().contains("green"), "{}", err);
    }

    #[test]
    fn test_speed_must_be_positive() {
        let args = PatternArgs {
            speed: Some(0.0),
            ..Default::default()
        };
        let err = build("strobe", LEDS, &args).err().unwrap();
        assert!(err.to_string().contains('0'), "{}", err);

        let negative = PatternArgs {
            colors: Some(vec!["#112233".to_string()]),
            speed: Some(-4.0),
            ..Default::default()
        };
        assert!(build("fade", LEDS, &negative).is_err());
    }

    #[test]
    fn test_led_count_must_fit_the_length_field() {
        let args = PatternArgs {
            color: Some("#123456".to_string()),
            ..Default::default()
        };

        let err = build("solid_color", 0, &args).err().unwrap();
        assert!(err.to_string().contains('0'), "{}", err);

        let oversized = MAX_PIXELS + 1;
        let err = build("solid_color", oversized, &args).err().unwrap();
        assert!(err.to_string().contains(&oversized.to_string()), "{}", err);

        assert!(build("solid_color", MAX_PIXELS, &args).is_ok());
    }

    #[test]
    fn test_every_listed_pattern_is_buildable() {
        let args = PatternArgs {
            color: Some("#123456".to_string()),
            colors: Some(vec!["#FF0000".to_string(), "#0000FF".to_string()]),
            speed: None,
        };
        for name in pattern_names() {
            build(name, LEDS, &args).unwrap();
        }
    }
}
