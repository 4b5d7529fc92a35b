// crates/t5kit-sim/src/frontend.rs
//
// Demodulation frontend over simulated captures. Clock detectors answer
// only for the family the capture was keyed with, so the hypothesis scanner
// sees the same gating a real signal path gives it.

use t5kit_core::demod::{DemodFrontend, DemodRequest, FskClocks};
use t5kit_core::BitBuffer;

use crate::capture::{Capture, CaptureFamily};

#[derive(Default)]
pub struct SimFrontend;

impl SimFrontend {
    pub fn new() -> Self {
        Self
    }
}

fn parse(samples: &[u8]) -> Option<Capture> {
    Capture::decode(samples).ok()
}

fn polarized(capture: Capture, invert: bool) -> BitBuffer {
    let mut bits = capture.bits;
    if invert {
        bits.invert();
    }
    bits
}

impl DemodFrontend for SimFrontend {
    fn fsk_clocks(&self, samples: &[u8]) -> Option<FskClocks> {
        match parse(samples)? {
            Capture { family: CaptureFamily::Fsk { fc1, fc2 }, clock, .. } => {
                Some(FskClocks { fc1, fc2, clock })
            }
            _ => None,
        }
    }

    fn ask_clock(&self, samples: &[u8]) -> Option<u16> {
        // Biphase rides the ASK clock.
        match parse(samples)? {
            Capture { family: CaptureFamily::Ask | CaptureFamily::Biphase, clock, .. } => {
                Some(clock)
            }
            _ => None,
        }
    }

    fn nrz_clock(&self, samples: &[u8]) -> Option<u16> {
        match parse(samples)? {
            Capture { family: CaptureFamily::Nrz, clock, .. } => Some(clock),
            _ => None,
        }
    }

    fn psk_clock(&self, samples: &[u8]) -> Option<u16> {
        match parse(samples)? {
            Capture { family: CaptureFamily::Psk, clock, .. } => Some(clock),
            _ => None,
        }
    }

    fn demod(&self, samples: &[u8], request: &DemodRequest) -> Option<BitBuffer> {
        let capture = parse(samples)?;
        match (*request, capture.family) {
            (DemodRequest::Fsk { invert, .. }, CaptureFamily::Fsk { .. }) => {
                Some(polarized(capture, invert))
            }
            (DemodRequest::Ask { invert, .. }, CaptureFamily::Ask) => {
                Some(polarized(capture, invert))
            }
            (DemodRequest::Biphase { invert, .. }, CaptureFamily::Biphase) => {
                Some(polarized(capture, invert))
            }
            (DemodRequest::Nrz { invert, .. }, CaptureFamily::Nrz) => {
                Some(polarized(capture, invert))
            }
            (DemodRequest::Psk { invert, .. }, CaptureFamily::Psk) => {
                Some(polarized(capture, invert))
            }
            _ => None,
        }
    }
}
