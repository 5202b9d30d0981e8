//! Fixed-size frame codec.
//!
//! Wire format (request and response alike):
//! ```text
//! ┌────────┬────────────────────────────────────┐
//! │ Opcode │ Payload (7 B, opcode-specific)     │
//! │  1 B   │ big-endian integers / fixed 8.8    │
//! └────────┴────────────────────────────────────┘
//! ```
//!
//! Every field type has an explicit `put_*` / `get_*` pair operating at a
//! byte offset, so the layouts in [`engine`](super::engine) read like the
//! opcode table.

use crate::error::CommsError;

/// Size of every request and every response.
pub const FRAME_LEN: usize = 8;

/// One 8-byte protocol frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame(pub [u8; FRAME_LEN]);

impl Frame {
    /// A frame carrying only `opcode`, payload zeroed.
    pub const fn with_opcode(opcode: u8) -> Self {
        let mut bytes = [0; FRAME_LEN];
        bytes[0] = opcode;
        Self(bytes)
    }

    pub const fn opcode(&self) -> u8 {
        self.0[0]
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }
}

impl From<[u8; FRAME_LEN]> for Frame {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }
}

/// Take the first [`FRAME_LEN`] bytes of `bytes`; trailing bytes are ignored.
impl TryFrom<&[u8]> for Frame {
    type Error = CommsError;

    fn try_from(bytes: &[u8]) -> Result<Self, CommsError> {
        let head = bytes.get(..FRAME_LEN).ok_or(CommsError::ShortFrame)?;
        let mut frame = [0u8; FRAME_LEN];
        frame.copy_from_slice(head);
        Ok(Self(frame))
    }
}

// ── u16 big-endian ────────────────────────────────────────────

pub fn put_u16_be(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

pub fn get_u16_be(buf: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buf[offset], buf[offset + 1]])
}

// ── u32 big-endian ────────────────────────────────────────────

pub fn put_u32_be(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

pub fn get_u32_be(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

// ── fixed 8.8 ─────────────────────────────────────────────────
//
// byte0 = integer part truncated to u8
// byte1 = 255 * fractional part, truncated to u8
//
// Truncation only, never rounding: hosts decode with `int + frac / 255`
// and compare against values produced by the same rule. Negative values
// are outside the encoding; the saturating float cast maps them to 0.

/// Encode `value` as fixed 8.8.
pub fn fixed8_8(value: f32) -> [u8; 2] {
    let int = value as u8;
    let frac = (255.0 * (value - value.floor())) as u8;
    [int, frac]
}

/// Largest value [`unfixed8_8`] can produce (`255 + 255/255`).
pub const FIXED8_8_MAX: f32 = 256.0;

/// Decode a fixed 8.8 pair.
pub fn unfixed8_8(int: u8, frac: u8) -> f32 {
    int as f32 + frac as f32 / 255.0
}

pub fn put_fixed8_8(buf: &mut [u8], offset: usize, value: f32) {
    buf[offset..offset + 2].copy_from_slice(&fixed8_8(value));
}

pub fn get_fixed8_8(buf: &[u8], offset: usize) -> f32 {
    unfixed8_8(buf[offset], buf[offset + 1])
}
