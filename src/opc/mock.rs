//! Mock frame sink for testing
//!
//! Records every frame pushed through it so tests can assert on the exact
//! transmission sequence of an animation run. Can be told to fail sends
//! (to exercise transport-failure policies) and to clear a shutdown flag
//! after a fixed number of sends (to bound otherwise-endless dynamic loops).

use crate::color::{Color, Frame};
use crate::opc::FrameSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mock sink for unit testing animation runs
#[derive(Clone, Default)]
pub struct MockSink {
    inner: Arc<Mutex<MockSinkInner>>,
}

#[derive(Default)]
struct MockSinkInner {
    sent: Vec<(u8, Frame)>,
    fail: bool,
    stop_after: Option<(usize, Arc<AtomicBool>)>,
}

impl MockSink {
    /// Create a new mock sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames sent so far, with their channels, in order
    pub fn sent(&self) -> Vec<(u8, Frame)> {
        let inner = self.inner.lock().unwrap();
        inner.sent.clone()
    }

    /// Just the frames, without channels
    pub fn frames(&self) -> Vec<Frame> {
        let inner = self.inner.lock().unwrap();
        inner.sent.iter().map(|(_, f)| f.clone()).collect()
    }

    /// Number of sends attempted so far
    pub fn sent_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.sent.len()
    }

    /// Make subsequent sends report transport failure
    pub fn set_fail(&self, fail: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail = fail;
    }

    /// Clear `flag` once `count` sends have been recorded. Used to stop a
    /// dynamic run loop from inside the test.
    pub fn stop_after(&self, count: usize, flag: Arc<AtomicBool>) {
        let mut inner = self.inner.lock().unwrap();
        inner.stop_after = Some((count, flag));
    }
}

impl FrameSink for MockSink {
    fn send(&mut self, frame: &[Color], channel: u8) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.sent.push((channel, frame.to_vec()));
        if let Some((count, ref flag)) = inner.stop_after {
            if inner.sent.len() >= count {
                flag.store(false, Ordering::Relaxed);
            }
        }
        !inner.fail
    }
}
