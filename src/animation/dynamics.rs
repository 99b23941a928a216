//! Dynamic patterns: continuously evolving frames
//!
//! Each variant advances an internal phase on every `next_frame` call. The
//! shared run loop transmits one frame per tick and sleeps `1/speed`
//! seconds between ticks; processing time is not subtracted, so the real
//! rate drifts slightly below nominal. There is no terminal state: the loop
//! exits only when the shutdown flag clears.
//!
//! Transport policy: self-heal. A failed send is logged and the loop keeps
//! ticking; the client re-dials on the next send, so a controller restart
//! heals without operator action.

use crate::color::{black_frame, lerp, rotate_right, spread, Color, Frame};
use crate::error::Result;
use crate::opc::{FrameSink, CHANNEL_BROADCAST};
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use super::Animation;

/// Consecutive pixels per color when tiling a color list across the strip
const SCROLL_BLOCK: usize = 10;

/// Interpolation steps between two colors of a fade
const FADE_STEPS: u32 = 30;

fn run_dynamic(
    anim: &mut dyn Animation,
    speed: f64,
    sink: &mut dyn FrameSink,
    running: &AtomicBool,
) -> Result<()> {
    let period = Duration::from_secs_f64(1.0 / speed);
    while running.load(Ordering::Relaxed) {
        let frame = anim.next_frame();
        if !sink.send(&frame, CHANNEL_BROADCAST) {
            warn!("Frame send failed; retrying on the next tick");
        }
        // Re-check before sleeping so a shutdown that arrived during the
        // send is not delayed by a full tick.
        if !running.load(Ordering::Relaxed) {
            break;
        }
        thread::sleep(period);
    }
    Ok(())
}

/// Smooth interpolation through a list of colors, whole strip at once
pub struct Fade {
    led_count: usize,
    colors: Vec<Color>,
    speed: f64,
    index: usize,
    step: u32,
}

impl Fade {
    /// Default tick rate (frames per second)
    pub const DEFAULT_SPEED: f64 = 30.0;

    pub fn new(led_count: usize, colors: Vec<Color>) -> Self {
        debug_assert!(!colors.is_empty());
        Fade {
            led_count,
            colors,
            speed: Self::DEFAULT_SPEED,
            index: 0,
            step: 0,
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }
}

impl Animation for Fade {
    fn next_frame(&mut self) -> Frame {
        let from = self.colors[self.index];
        let to = self.colors[(self.index + 1) % self.colors.len()];
        let t = self.step as f32 / FADE_STEPS as f32;
        let color = lerp(from, to, t);

        self.step += 1;
        if self.step >= FADE_STEPS {
            self.step = 0;
            self.index = (self.index + 1) % self.colors.len();
        }

        vec![color; self.led_count]
    }

    fn run(&mut self, sink: &mut dyn FrameSink, running: &AtomicBool) -> Result<()> {
        let speed = self.speed;
        run_dynamic(self, speed, sink, running)
    }
}

/// Color list tiled across the strip, shifted one pixel per tick
pub struct Scroll {
    pixels: Frame,
    speed: f64,
}

impl Scroll {
    /// Default tick rate (frames per second)
    pub const DEFAULT_SPEED: f64 = 8.0;

    pub fn new(led_count: usize, colors: Vec<Color>) -> Self {
        Scroll {
            pixels: spread(&colors, led_count, SCROLL_BLOCK),
            speed: Self::DEFAULT_SPEED,
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }
}

impl Animation for Scroll {
    fn next_frame(&mut self) -> Frame {
        let frame = self.pixels.clone();
        rotate_right(&mut self.pixels, 1);
        frame
    }

    fn run(&mut self, sink: &mut dyn FrameSink, running: &AtomicBool) -> Result<()> {
        let speed = self.speed;
        run_dynamic(self, speed, sink, running)
    }
}

/// Full white and all off on alternating ticks
pub struct Strobe {
    led_count: usize,
    speed: f64,
    lit: bool,
}

impl Strobe {
    /// Default tick rate (frames per second)
    pub const DEFAULT_SPEED: f64 = 10.0;

    pub fn new(led_count: usize) -> Self {
        Strobe {
            led_count,
            speed: Self::DEFAULT_SPEED,
            lit: true,
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }
}

impl Animation for Strobe {
    fn next_frame(&mut self) -> Frame {
        let frame = if self.lit {
            vec![Color::WHITE; self.led_count]
        } else {
            black_frame(self.led_count)
        };
        self.lit = !self.lit;
        frame
    }

    fn run(&mut self, sink: &mut dyn FrameSink, running: &AtomicBool) -> Result<()> {
        let speed = self.speed;
        run_dynamic(self, speed, sink, running)
    }
}

/// Scrolling color list interleaved with all-off frames, two pixels of
/// shift per lit frame
pub struct ScrollStrobe {
    led_count: usize,
    pixels: Frame,
    speed: f64,
    lit: bool,
}

impl ScrollStrobe {
    /// Default tick rate (frames per second)
    pub const DEFAULT_SPEED: f64 = 20.0;

    pub fn new(led_count: usize, colors: Vec<Color>) -> Self {
        ScrollStrobe {
            led_count,
            pixels: spread(&colors, led_count, SCROLL_BLOCK),
            speed: Self::DEFAULT_SPEED,
            lit: true,
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }
}

impl Animation for ScrollStrobe {
    fn next_frame(&mut self) -> Frame {
        if self.lit {
            self.lit = false;
            let frame = self.pixels.clone();
            rotate_right(&mut self.pixels, 2);
            frame
        } else {
            self.lit = true;
            black_frame(self.led_count)
        }
    }

    fn run(&mut self, sink: &mut dyn FrameSink, running: &AtomicBool) -> Result<()> {
        let speed = self.speed;
        run_dynamic(self, speed, sink, running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::MockSink;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Instant;

    const LEDS: usize = 24;

    fn palette() -> Vec<Color> {
        vec![Color::new(255, 0, 0), Color::new(0, 0, 255)]
    }

    #[test]
    fn test_frames_always_match_led_count() {
        let mut anims: Vec<Box<dyn Animation>> = vec![
            Box::new(Fade::new(LEDS, palette())),
            Box::new(Scroll::new(LEDS, palette())),
            Box::new(Strobe::new(LEDS)),
            Box::new(ScrollStrobe::new(LEDS, palette())),
        ];
        for anim in &mut anims {
            for _ in 0..100 {
                assert_eq!(anim.next_frame().len(), LEDS);
            }
        }
    }

    #[test]
    fn test_fade_passes_through_palette_colors() {
        let mut fade = Fade::new(LEDS, palette());

        let first = fade.next_frame();
        assert!(first.iter().all(|&c| c == Color::new(255, 0, 0)));

        // FADE_STEPS more calls land exactly on the next palette color.
        for _ in 0..FADE_STEPS - 1 {
            fade.next_frame();
        }
        let next = fade.next_frame();
        assert!(next.iter().all(|&c| c == Color::new(0, 0, 255)));
    }

    #[test]
    fn test_scroll_shifts_one_pixel_per_tick() {
        let mut scroll = Scroll::new(LEDS, palette());
        let first = scroll.next_frame();
        let second = scroll.next_frame();

        let mut expected = first.clone();
        rotate_right(&mut expected, 1);
        assert_eq!(second, expected);
    }

    #[test]
    fn test_strobe_alternates_white_and_black() {
        let mut strobe = Strobe::new(LEDS);
        assert_eq!(strobe.next_frame(), vec![Color::WHITE; LEDS]);
        assert_eq!(strobe.next_frame(), black_frame(LEDS));
        assert_eq!(strobe.next_frame(), vec![Color::WHITE; LEDS]);
    }

    #[test]
    fn test_scroll_strobe_interleaves_black() {
        let mut anim = ScrollStrobe::new(LEDS, palette());
        let lit = anim.next_frame();
        assert_ne!(lit, black_frame(LEDS));
        assert_eq!(anim.next_frame(), black_frame(LEDS));

        let mut expected = lit;
        rotate_right(&mut expected, 2);
        assert_eq!(anim.next_frame(), expected);
    }

    #[test]
    fn test_run_ticks_at_configured_rate() {
        let mut strobe = Strobe::new(LEDS);
        strobe.set_speed(10.0); // 100ms per tick

        let running = Arc::new(AtomicBool::new(true));
        let mut sink = MockSink::new();
        sink.stop_after(3, Arc::clone(&running));

        let start = Instant::now();
        strobe.run(&mut sink, &running).unwrap();
        let elapsed = start.elapsed();

        assert_eq!(sink.sent_count(), 3);
        // The third send clears the flag, so two full 100ms sleeps remain;
        // generous upper bound for scheduler noise.
        assert!(elapsed >= Duration::from_millis(180), "{:?}", elapsed);
        assert!(elapsed <= Duration::from_millis(700), "{:?}", elapsed);
    }

    #[test]
    fn test_shutdown_is_not_delayed_by_a_full_tick() {
        let mut strobe = Strobe::new(LEDS);
        strobe.set_speed(0.5); // one tick every two seconds

        let running = Arc::new(AtomicBool::new(true));
        let mut sink = MockSink::new();
        sink.stop_after(1, Arc::clone(&running));

        let start = Instant::now();
        strobe.run(&mut sink, &running).unwrap();
        // The flag cleared during the first send; the loop must exit
        // without serving the two-second sleep.
        assert!(start.elapsed() < Duration::from_millis(500), "{:?}", start.elapsed());
    }

    #[test]
    fn test_run_keeps_looping_through_transport_failures() {
        let mut fade = Fade::new(LEDS, palette());
        fade.set_speed(200.0);

        let running = Arc::new(AtomicBool::new(true));
        let mut sink = MockSink::new();
        sink.set_fail(true);
        sink.stop_after(5, Arc::clone(&running));

        // Self-heal policy: failures never abort a dynamic run.
        fade.run(&mut sink, &running).unwrap();
        assert_eq!(sink.sent_count(), 5);
    }
}
