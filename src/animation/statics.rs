//! Static patterns: a single unmoving frame
//!
//! A static run performs a fixed transition sequence: two all-off frames
//! (clearing residual state on double-buffered hardware), a short pause for
//! a perceptible fade-in, then the target pattern once. Terminal after one
//! transmission.
//!
//! Transport policy: any send failure aborts the run. A half-applied static
//! pattern is user-visible and the run is cheap to re-issue.

use crate::color::{black_frame, Color, Frame};
use crate::error::{Error, Result};
use crate::opc::{FrameSink, CHANNEL_BROADCAST};
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;

use super::Animation;

/// Pause between the clearing frames and the target pattern
const FADE_IN_PAUSE: Duration = Duration::from_millis(300);

fn run_static(pattern: &Frame, led_count: usize, sink: &mut dyn FrameSink) -> Result<()> {
    let black = black_frame(led_count);

    // Clear twice: hardware double-buffering means one write may only
    // update the back buffer.
    for _ in 0..2 {
        if !sink.send(&black, CHANNEL_BROADCAST) {
            return Err(Error::Transport(
                "failed to clear strip before static pattern".to_string(),
            ));
        }
    }

    thread::sleep(FADE_IN_PAUSE);

    if !sink.send(pattern, CHANNEL_BROADCAST) {
        return Err(Error::Transport(
            "failed to write static pattern".to_string(),
        ));
    }
    Ok(())
}

/// Every LED set to one color
pub struct SolidColor {
    led_count: usize,
    color: Color,
}

impl SolidColor {
    pub fn new(led_count: usize, color: Color) -> Self {
        SolidColor { led_count, color }
    }

    fn pattern(&self) -> Frame {
        vec![self.color; self.led_count]
    }
}

impl Animation for SolidColor {
    fn next_frame(&mut self) -> Frame {
        self.pattern()
    }

    fn run(&mut self, sink: &mut dyn FrameSink, _running: &AtomicBool) -> Result<()> {
        run_static(&self.pattern(), self.led_count, sink)
    }
}

/// Every LED off
pub struct Off {
    led_count: usize,
}

impl Off {
    pub fn new(led_count: usize) -> Self {
        Off { led_count }
    }
}

impl Animation for Off {
    fn next_frame(&mut self) -> Frame {
        black_frame(self.led_count)
    }

    fn run(&mut self, sink: &mut dyn FrameSink, _running: &AtomicBool) -> Result<()> {
        run_static(&black_frame(self.led_count), self.led_count, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::MockSink;
    use std::sync::atomic::AtomicBool;

    const LEDS: usize = 8;

    #[test]
    fn test_static_run_clears_twice_then_writes_pattern() {
        let mut sink = MockSink::new();
        let running = AtomicBool::new(true);
        let mut anim = SolidColor::new(LEDS, Color::new(255, 0, 170));

        anim.run(&mut sink, &running).unwrap();

        let frames = sink.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], black_frame(LEDS));
        assert_eq!(frames[1], black_frame(LEDS));
        assert_eq!(frames[2], vec![Color::new(255, 0, 170); LEDS]);
    }

    #[test]
    fn test_static_run_aborts_on_transport_failure() {
        let mut sink = MockSink::new();
        sink.set_fail(true);
        let running = AtomicBool::new(true);
        let mut anim = SolidColor::new(LEDS, Color::WHITE);

        let err = anim.run(&mut sink, &running).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        // Aborted on the very first failed send.
        assert_eq!(sink.sent_count(), 1);
    }

    #[test]
    fn test_off_pattern_is_all_black() {
        let mut anim = Off::new(LEDS);
        assert_eq!(anim.next_frame(), black_frame(LEDS));
    }
}
