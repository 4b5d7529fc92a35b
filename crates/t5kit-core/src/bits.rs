// crates/t5kit-core/src/bits.rs

use crate::error::{Result, T5Error};

/// Pack `len` consecutive bits starting at `start` into an integer,
/// most-significant bit first.
///
/// `len > 32` returns 0. This is a documented compatibility quirk, not an
/// error: every historical caller relied on the silent zero, and the
/// detection semantics were validated against it. Bounds against the slice
/// length are NOT checked here; callers guarantee `start + len <= bits.len()`.
pub fn extract_field(bits: &[u8], start: usize, len: usize) -> u32 {
    if len > 32 {
        return 0;
    }
    let mut out: u32 = 0;
    for k in 0..len {
        out = (out << 1) | u32::from(bits[start + k] & 1);
    }
    out
}

/// A demodulated bit sequence with an explicit length. Values are 0/1 only.
///
/// The buffer is produced by a demodulator frontend and read by the layout
/// validators and metadata decoders. Checked reads go through [`field`];
/// reading past the end is an error, never a wrap.
///
/// [`field`]: BitBuffer::field
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bits: Vec<u8>,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Wrap a raw bit vector. Anything nonzero is normalized to 1.
    pub fn from_bits(bits: Vec<u8>) -> Self {
        let bits = bits.into_iter().map(|b| b & 1).collect();
        Self { bits }
    }

    pub fn zeroed(len: usize) -> Self {
        Self { bits: vec![0; len] }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Bounds-checked field read, MSB first.
    pub fn field(&self, start: usize, len: usize) -> Result<u32> {
        let need = start
            .checked_add(len)
            .ok_or(T5Error::BufferTooShort { need: usize::MAX, have: self.bits.len() })?;
        if need > self.bits.len() {
            return Err(T5Error::BufferTooShort { need, have: self.bits.len() });
        }
        Ok(extract_field(&self.bits, start, len))
    }

    /// Unchecked variant with the historical contract of [`extract_field`].
    pub fn field_unchecked(&self, start: usize, len: usize) -> u32 {
        extract_field(&self.bits, start, len)
    }

    /// Write `len` bits of `value` at `start`, MSB first. Grows the buffer
    /// if needed. Inverse of [`field`]; used by the simulator and tests.
    pub fn set_field(&mut self, start: usize, len: usize, value: u32) {
        assert!(len <= 32, "set_field width must be <= 32");
        if start + len > self.bits.len() {
            self.bits.resize(start + len, 0);
        }
        for k in 0..len {
            let bit = (value >> (len - 1 - k)) & 1;
            self.bits[start + k] = bit as u8;
        }
    }

    /// Flip every bit in place.
    pub fn invert(&mut self) {
        for b in &mut self.bits {
            *b ^= 1;
        }
    }

    /// Render `len` bits from `start` as a '0'/'1' string (clamped to the
    /// buffer end), for operator-facing block tables.
    pub fn bin_string(&self, start: usize, len: usize) -> String {
        let end = (start + len).min(self.bits.len());
        self.bits[start.min(end)..end]
            .iter()
            .map(|b| if *b == 0 { '0' } else { '1' })
            .collect()
    }
}

/// In-place PSK1 -> PSK2 bit-domain transform: a PSK2 bit is 1 where the
/// PSK1 stream changes level. The first output bit is defined as 0.
pub fn psk1_to_psk2(buffer: &mut BitBuffer) {
    let bits = &mut buffer.bits;
    if bits.is_empty() {
        return;
    }
    let mut last = bits[0];
    for i in 1..bits.len() {
        let cur = bits[i];
        bits[i] = u8::from(cur != last);
        last = cur;
    }
    bits[0] = 0;
}
