//! Open Pixel Control packet encoding
//!
//! # Wire Format
//!
//! One frame message, as consumed by the fcserver controller process:
//!
//! ```text
//! ┌───────────┬───────────┬──────────────────┬──────────────────────┐
//! │ Channel   │ Command   │ Length (2 bytes) │ Payload (variable)   │
//! │ 1 byte    │ 1 byte    │ Big-endian u16   │ 3 bytes per pixel    │
//! └───────────┴───────────┴──────────────────┴──────────────────────┘
//! ```
//!
//! - **Channel**: sub-address on the controller; `0` broadcasts to all
//! - **Command**: `0x00` = set pixel colors (the only command this crate
//!   emits)
//! - **Length**: `3 * pixel_count`, network byte order
//! - **Payload**: one `(R, G, B)` triple per pixel, in frame order
//!
//! The controller sends no reply to a set-pixel-colors message.
//!
//! Encoding is a total function over valid frames. Decoding exists for
//! testability and tooling; the controller itself is a black-box consumer.

use crate::color::{Color, Frame};
use crate::error::{Error, Result};

/// OPC command: set pixel colors
pub const CMD_SET_PIXEL_COLORS: u8 = 0x00;

/// Fixed header size in bytes
pub const HEADER_LEN: usize = 4;

/// Largest frame expressible in the 16-bit length field
pub const MAX_PIXELS: usize = (u16::MAX as usize) / 3;

/// Encode a frame as one set-pixel-colors message.
///
/// Never fails for frames of up to [`MAX_PIXELS`] pixels; larger frames
/// cannot be represented in the length field and are a caller bug.
pub fn encode(frame: &[Color], channel: u8) -> Vec<u8> {
    debug_assert!(frame.len() <= MAX_PIXELS);

    let payload_len = (frame.len() * 3) as u16;
    let mut bytes = Vec::with_capacity(HEADER_LEN + frame.len() * 3);
    bytes.push(channel);
    bytes.push(CMD_SET_PIXEL_COLORS);
    bytes.extend_from_slice(&payload_len.to_be_bytes());
    for pixel in frame {
        bytes.push(pixel.r);
        bytes.push(pixel.g);
        bytes.push(pixel.b);
    }
    bytes
}

/// Decode one set-pixel-colors message back into `(channel, frame)`.
///
/// Exact inverse of [`encode`]: rejects short buffers, unknown commands,
/// and length fields that disagree with the actual payload.
pub fn decode(bytes: &[u8]) -> Result<(u8, Frame)> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::InvalidPacket(format!(
            "message too short: {} bytes, need at least {}",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let channel = bytes[0];
    let command = bytes[1];
    if command != CMD_SET_PIXEL_COLORS {
        return Err(Error::InvalidPacket(format!(
            "unknown command {:#04x}",
            command
        )));
    }

    let payload_len = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;
    let payload = &bytes[HEADER_LEN..];
    if payload.len() != payload_len {
        return Err(Error::InvalidPacket(format!(
            "length field says {} payload bytes, got {}",
            payload_len,
            payload.len()
        )));
    }
    if payload_len % 3 != 0 {
        return Err(Error::InvalidPacket(format!(
            "payload length {} is not a multiple of 3",
            payload_len
        )));
    }

    let frame = payload
        .chunks_exact(3)
        .map(|p| Color::new(p[0], p[1], p[2]))
        .collect();
    Ok((channel, frame))
}
