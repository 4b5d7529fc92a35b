// crates/t5kit-core/src/decode/mod.rs

pub mod info;
pub mod trace;

use crate::bits::{psk1_to_psk2, BitBuffer};
use crate::config::{Modulation, TagConfig};
use crate::demod::{psk_trimmed, DemodFrontend, DemodRequest};
use crate::error::{Result, T5Error};

/// Re-demodulate a freshly acquired capture under the active configuration.
///
/// This is the single-hypothesis counterpart of the scanner: the modulation
/// is already known, so the one matching demodulator runs with the config's
/// rate and polarity plus the family-specific extras (FSK field-clock pair,
/// PSK settle trim, PSK2/PSK3 transition transform).
pub fn decode_block(
    frontend: &dyn DemodFrontend,
    samples: &[u8],
    config: &TagConfig,
) -> Result<BitBuffer> {
    let clock = config.bit_rate.divisor();
    let invert = config.inverted;

    let bits = match config.modulation {
        Modulation::Fsk => {
            let req = DemodRequest::Fsk { clock, invert, fc1: 0, fc2: 0 };
            frontend.demod(samples, &req)
        }
        Modulation::Fsk1 | Modulation::Fsk1a => {
            let req = DemodRequest::Fsk { clock, invert, fc1: 8, fc2: 5 };
            frontend.demod(samples, &req)
        }
        Modulation::Fsk2 | Modulation::Fsk2a => {
            let req = DemodRequest::Fsk { clock, invert, fc1: 10, fc2: 8 };
            frontend.demod(samples, &req)
        }
        Modulation::Ask => {
            let req = DemodRequest::Ask { clock, invert, max_err: 1 };
            frontend.demod(samples, &req)
        }
        Modulation::Nrz => {
            let req = DemodRequest::Nrz { clock, invert, max_err: 1 };
            frontend.demod(samples, &req)
        }
        Modulation::Biphase | Modulation::BiphaseA => {
            let req = DemodRequest::Biphase { clock, invert, max_err: 1 };
            frontend.demod(samples, &req)
        }
        Modulation::Psk1 => {
            let req = DemodRequest::Psk { clock, invert, max_err: 6 };
            frontend.demod(psk_trimmed(samples), &req)
        }
        Modulation::Psk2 | Modulation::Psk3 => {
            // Polarity cannot affect the transition domain; always demod
            // non-inverted, then transform.
            let req = DemodRequest::Psk { clock, invert: false, max_err: 6 };
            frontend.demod(psk_trimmed(samples), &req).map(|mut bits| {
                psk1_to_psk2(&mut bits);
                bits
            })
        }
    };

    bits.ok_or(T5Error::DemodulationFailed(config.modulation.as_str()))
}

/// Pack the 32-bit block value at the configured offset.
pub fn block_value(bits: &BitBuffer, offset: usize) -> Result<u32> {
    bits.field(offset, 32)
}
