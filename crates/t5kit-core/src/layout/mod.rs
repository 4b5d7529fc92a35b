// crates/t5kit-core/src/layout/mod.rs
//
// Structural validation of candidate configuration words. The demodulator's
// framing recovery leaves the block start ambiguous, so there is no fixed
// offset to parse at: each validator scans a small offset window and accepts
// the first offset whose bits satisfy every layout constraint (reserved bits
// zero, known modulation code, tag-stored rate equal to the measured clock).

mod q5;
mod t55x7;

use crate::bits::BitBuffer;
use crate::config::{BitRate, ChipVariant, Modulation};

/// First candidate offset for the configuration word.
pub const SCAN_START: usize = 28;
/// One past the last candidate offset.
pub const SCAN_END: usize = 64;

/// Accepted offset/rate/variant triple for one modulation hypothesis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LayoutMatch {
    pub offset: u8,
    pub bit_rate: BitRate,
    pub variant: ChipVariant,
}

/// Test whether any offset in the scan window holds a structurally valid
/// configuration word for `hypothesis`, given the clock divisor measured on
/// the raw capture. Tries the T55x7 layout first, then falls back to Q5.
///
/// Deterministic: ties inside one layout are resolved by ascending offset.
pub fn validate_standard_layout(
    bits: &BitBuffer,
    hypothesis: Modulation,
    measured_clock: u16,
) -> Option<LayoutMatch> {
    if bits.len() < SCAN_END {
        return None;
    }
    t55x7::scan(bits, hypothesis, measured_clock)
        .or_else(|| q5::scan(bits, hypothesis, measured_clock))
}

/// Iterate candidate offsets, stopping early once a full 32-bit word no
/// longer fits in the buffer.
fn offsets(bits: &BitBuffer) -> impl Iterator<Item = usize> + '_ {
    (SCAN_START..SCAN_END).take_while(|idx| idx + 32 <= bits.len())
}
