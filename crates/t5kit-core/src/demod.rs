// crates/t5kit-core/src/demod.rs
//
// Contract with the demodulation frontend. The analog work of turning raw
// samples into bits lives behind this trait; the core only chooses which
// demodulator to run and with which parameters, then validates the result.

use crate::bits::BitBuffer;

/// Samples to discard before any PSK demodulation. The antenna needs this
/// long to settle; the early samples otherwise flip the recovered polarity.
pub const PSK_SETTLE_TRIM: usize = 160;

/// Field-clock measurement of an FSK capture: the two alternating symbol
/// divisors plus the recovered data clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FskClocks {
    pub fc1: u8,
    pub fc2: u8,
    pub clock: u16,
}

impl FskClocks {
    /// The (8,5) pair marks the FSK1/FSK1a family.
    pub fn is_fsk1_pair(self) -> bool {
        self.fc1 == 8 && self.fc2 == 5
    }

    /// The (10,8) pair marks the FSK2/FSK2a family.
    pub fn is_fsk2_pair(self) -> bool {
        self.fc1 == 10 && self.fc2 == 8
    }
}

/// One demodulation request. `clock` of 0 asks the frontend to autodetect.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DemodRequest {
    /// FSK raw demod; a zero field-clock pair means autodetect.
    Fsk { clock: u16, invert: bool, fc1: u8, fc2: u8 },
    /// ASK/Manchester demod.
    Ask { clock: u16, invert: bool, max_err: u8 },
    /// ASK with biphase decoding on top.
    Biphase { clock: u16, invert: bool, max_err: u8 },
    /// Direct NRZ demod.
    Nrz { clock: u16, invert: bool, max_err: u8 },
    /// PSK1 demod. PSK2/PSK3 are reached by transforming its output.
    Psk { clock: u16, invert: bool, max_err: u8 },
}

/// Raw demodulators and clock detectors, implemented outside the core.
///
/// Clock detectors answer `None` when no coherent clock is present; demod
/// answers `None` when no coherent bit stream can be recovered. Neither is
/// an error at this layer; the scanner treats both as a failed trial.
pub trait DemodFrontend {
    fn fsk_clocks(&self, samples: &[u8]) -> Option<FskClocks>;
    fn ask_clock(&self, samples: &[u8]) -> Option<u16>;
    fn nrz_clock(&self, samples: &[u8]) -> Option<u16>;
    fn psk_clock(&self, samples: &[u8]) -> Option<u16>;

    fn demod(&self, samples: &[u8], request: &DemodRequest) -> Option<BitBuffer>;
}

/// Discard the PSK settle transient. Safe on short captures.
pub fn psk_trimmed(samples: &[u8]) -> &[u8] {
    &samples[PSK_SETTLE_TRIM.min(samples.len())..]
}
