// crates/t5kit-core/src/layout/q5.rs

use crate::bits::BitBuffer;
use crate::config::{BitRate, ChipVariant, Modulation};

use super::{offsets, LayoutMatch};

/// Q5 master key nibble. Unlike the T55x7 there is no test-mode alternative:
/// anything but 0x6 disqualifies the offset outright.
const Q5_SAFER_KEY: u32 = 0x6;

// 3-bit modulation codes stored in a Q5 configuration word. Narrower table
// than the T55x7; note NRZ and Biphase land on different codes, and
// Biphase-a does not exist at all.
fn modulation_code_matches(hypothesis: Modulation, code: u32) -> bool {
    match hypothesis {
        Modulation::Fsk
        | Modulation::Fsk1
        | Modulation::Fsk1a
        | Modulation::Fsk2
        | Modulation::Fsk2a => (4..=5).contains(&code),
        Modulation::Ask => code == 0,
        Modulation::Psk1 => code == 1,
        Modulation::Psk2 => code == 2,
        Modulation::Psk3 => code == 3,
        Modulation::Nrz => code == 7,
        Modulation::Biphase => code == 6,
        Modulation::BiphaseA => false,
    }
}

/// Scan the offset window for a valid Q5 configuration word.
///
/// Field walk relative to the candidate offset:
///   safer 4 | reserved 8 | page-select 1, fast-write 1 | rate 5 |
///   aor 1, pwd 1, psk-cf 2, inverse 1 | mod-code 3 | max-block 3 | st 1
///
/// The 5-bit rate code maps to a physical divisor as `code * 2 + 2`; any
/// even divisor in 8..=128 is acceptable, table rate or not, as long as it
/// equals the measured clock. A zero max-block is definitionally invalid: a
/// working tag always has at least one block.
pub(super) fn scan(
    bits: &BitBuffer,
    hypothesis: Modulation,
    measured_clock: u16,
) -> Option<LayoutMatch> {
    for idx in offsets(bits) {
        if bits.field_unchecked(idx, 28) == 0 {
            continue;
        }

        let safer = bits.field_unchecked(idx, 4);
        if safer != Q5_SAFER_KEY {
            continue;
        }
        let reserved = bits.field_unchecked(idx + 4, 8);
        if reserved != 0 {
            continue;
        }

        let divisor = bits.field_unchecked(idx + 14, 5) as u16 * 2 + 2;
        let bit_rate = match BitRate::from_q5_divisor(divisor) {
            Some(r) => r,
            None => continue,
        };

        let mod_code = bits.field_unchecked(idx + 24, 3);
        let max_block = bits.field_unchecked(idx + 27, 3);
        if max_block == 0 {
            continue;
        }

        if !modulation_code_matches(hypothesis, mod_code) {
            continue;
        }
        if divisor != measured_clock {
            continue;
        }

        return Some(LayoutMatch {
            offset: idx as u8,
            bit_rate,
            variant: ChipVariant::Q5,
        });
    }
    None
}
