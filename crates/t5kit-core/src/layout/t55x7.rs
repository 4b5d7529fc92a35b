// crates/t5kit-core/src/layout/t55x7.rs

use crate::bits::BitBuffer;
use crate::config::{BitRate, ChipVariant, Modulation};

use super::{offsets, LayoutMatch};

// 5-bit modulation codes stored in a T55x7 configuration word.
const MOD_DIRECT_NRZ: u32 = 0x00;
const MOD_PSK1: u32 = 0x01;
const MOD_PSK2: u32 = 0x02;
const MOD_PSK3: u32 = 0x03;
const MOD_FSK_FIRST: u32 = 0x04;
const MOD_FSK_LAST: u32 = 0x07;
const MOD_MANCHESTER: u32 = 0x08;
const MOD_BIPHASE: u32 = 0x10;
const MOD_BIPHASE_CDP: u32 = 0x18;

/// The FSK sub-variants collapse onto the contiguous code range 4..=7; the
/// field-clock pair, not the configuration word, tells them apart. Every
/// other hypothesis must match its code exactly.
fn modulation_code_matches(hypothesis: Modulation, code: u32) -> bool {
    match hypothesis {
        Modulation::Fsk
        | Modulation::Fsk1
        | Modulation::Fsk1a
        | Modulation::Fsk2
        | Modulation::Fsk2a => (MOD_FSK_FIRST..=MOD_FSK_LAST).contains(&code),
        Modulation::Ask => code == MOD_MANCHESTER,
        Modulation::Nrz => code == MOD_DIRECT_NRZ,
        Modulation::Psk1 => code == MOD_PSK1,
        Modulation::Psk2 => code == MOD_PSK2,
        Modulation::Psk3 => code == MOD_PSK3,
        Modulation::Biphase => code == MOD_BIPHASE,
        Modulation::BiphaseA => code == MOD_BIPHASE_CDP,
    }
}

/// Scan the offset window for a valid T55x7 configuration word.
///
/// Field walk relative to the candidate offset:
///   safer 4 | reserved 4 | xt-rate 3 | rate 3 | extended 1 | mod-code 5 |
///   psk-cf 2, skip 1 | nml01 1 | skip 5 | nml02 2
///
/// Reserved must be zero always. xt-rate, nml01 and nml02 must be zero
/// unless extended mode is active, which requires the extended flag plus a
/// password (0x6) or test-mode (0x9) safer key.
pub(super) fn scan(
    bits: &BitBuffer,
    hypothesis: Modulation,
    measured_clock: u16,
) -> Option<LayoutMatch> {
    for idx in offsets(bits) {
        // An all-zero window can never be a config word; skip cheaply.
        if bits.field_unchecked(idx, 28) == 0 {
            continue;
        }

        let safer = bits.field_unchecked(idx, 4);
        let reserved = bits.field_unchecked(idx + 4, 4);
        if reserved != 0 {
            continue;
        }

        let xt_rate = bits.field_unchecked(idx + 8, 3);
        let rate_code = bits.field_unchecked(idx + 11, 3);
        let extended = bits.field_unchecked(idx + 14, 1);
        let mod_code = bits.field_unchecked(idx + 15, 5);
        let nml01 = bits.field_unchecked(idx + 23, 1);
        let nml02 = bits.field_unchecked(idx + 29, 2);

        let extended_mode = (safer == 0x6 || safer == 0x9) && extended == 1;
        if !extended_mode && (nml01 != 0 || nml02 != 0 || xt_rate != 0) {
            continue;
        }

        if !modulation_code_matches(hypothesis, mod_code) {
            continue;
        }

        let bit_rate = match BitRate::from_code(rate_code as u8) {
            Some(r) => r,
            None => continue,
        };
        if bit_rate.divisor() != measured_clock {
            continue;
        }

        return Some(LayoutMatch {
            offset: idx as u8,
            bit_rate,
            variant: ChipVariant::T55x7,
        });
    }
    None
}
