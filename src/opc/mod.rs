//! Open Pixel Control streaming layer
//!
//! Three pieces:
//! - [`packet`]: pure encode/decode between frames and OPC wire bytes
//! - [`client`]: the TCP client that owns the one connection to the
//!   controller process
//! - [`mock`]: an in-memory [`FrameSink`] for unit testing animation runs
//!
//! The [`FrameSink`] trait is the seam between the animation engine and the
//! transport: animations push frames into a sink without knowing whether
//! bytes go to a socket or a test buffer.

pub mod client;
pub mod mock;
pub mod packet;

pub use client::OpcClient;
pub use mock::MockSink;

use crate::color::Color;

/// Channel value addressing every strip on the controller
pub const CHANNEL_BROADCAST: u8 = 0;

/// Destination for encoded pixel frames.
///
/// `send` reports transport failure as `false` rather than an error: the
/// caller (the animation run loop) decides whether a failed tick aborts the
/// run or is retried on the next one. Implementations do not retry
/// internally and expect no reply from the receiver.
pub trait FrameSink {
    /// Push one frame to the given channel. Returns `false` on transport
    /// failure.
    fn send(&mut self, frame: &[Color], channel: u8) -> bool;
}
