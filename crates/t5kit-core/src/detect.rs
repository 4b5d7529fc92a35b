// crates/t5kit-core/src/detect.rs
//
// Modulation hypothesis scanner. Runs the frontend demodulators under a
// fixed trial matrix (modulation family x polarity) and keeps every trial
// whose output structurally validates as a configuration word. There is no
// ranking: one survivor is committed, several are handed back to the
// operator, because a wrong automatic pick risks an unsafe password write
// later.

use crate::bits::{psk1_to_psk2, BitBuffer};
use crate::config::{BitRate, ChipVariant, Modulation, TagConfig};
use crate::demod::{psk_trimmed, DemodFrontend, DemodRequest, FskClocks};
use crate::layout::{validate_standard_layout, LayoutMatch};

/// One surviving trial. Discarded after the scan unless it is the unique
/// survivor promoted into the active configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CandidateMatch {
    pub modulation: Modulation,
    pub bit_rate: BitRate,
    pub inverted: bool,
    pub offset: u8,
    pub variant: ChipVariant,
    pub block0: u32,
}

impl CandidateMatch {
    pub fn into_config(self) -> TagConfig {
        TagConfig {
            variant: self.variant,
            modulation: self.modulation,
            bit_rate: self.bit_rate,
            inverted: self.inverted,
            offset: self.offset,
            block0: self.block0,
        }
    }
}

/// Outcome of a scan over one capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionResult {
    Unique(TagConfig),
    Ambiguous(Vec<CandidateMatch>),
    NoMatch,
}

fn candidate(
    modulation: Modulation,
    inverted: bool,
    m: LayoutMatch,
    bits: &BitBuffer,
) -> CandidateMatch {
    CandidateMatch {
        modulation,
        bit_rate: m.bit_rate,
        inverted,
        offset: m.offset,
        variant: m.variant,
        block0: bits.field_unchecked(m.offset as usize, 32),
    }
}

/// Refine a generic FSK hit into the sub-variant implied by the measured
/// field-clock pair and the trial polarity. Unknown pairs stay generic.
fn fsk_variant(clocks: FskClocks, inverted: bool) -> Modulation {
    match (clocks.is_fsk1_pair(), clocks.is_fsk2_pair(), inverted) {
        (true, _, false) => Modulation::Fsk1a,
        (true, _, true) => Modulation::Fsk1,
        (_, true, false) => Modulation::Fsk2,
        (_, true, true) => Modulation::Fsk2a,
        _ => Modulation::Fsk,
    }
}

/// The non-FSK trial families. Each gates itself on its own clock detector
/// and contributes candidates independently, so their order never changes
/// the classification, only the candidate listing order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TrialFamily {
    Ask,
    Nrz,
    Psk,
}

const FAMILY_ORDER: [TrialFamily; 3] = [TrialFamily::Ask, TrialFamily::Nrz, TrialFamily::Psk];

/// Scan one raw capture for the tag's modulation, rate, polarity and block
/// offset. Pure with respect to configuration state: committing the unique
/// survivor is the caller's decision.
pub fn detect(frontend: &dyn DemodFrontend, samples: &[u8]) -> DetectionResult {
    let mut hits: Vec<CandidateMatch> = Vec::new();

    if let Some(clocks) = frontend.fsk_clocks(samples) {
        fsk_trials(frontend, samples, clocks, &mut hits);
    } else {
        for family in FAMILY_ORDER {
            family_trials(frontend, samples, family, &mut hits);
        }
    }

    classify(hits)
}

fn classify(hits: Vec<CandidateMatch>) -> DetectionResult {
    match hits.len() {
        0 => DetectionResult::NoMatch,
        1 => DetectionResult::Unique(hits[0].into_config()),
        _ => DetectionResult::Ambiguous(hits),
    }
}

fn family_trials(
    frontend: &dyn DemodFrontend,
    samples: &[u8],
    family: TrialFamily,
    hits: &mut Vec<CandidateMatch>,
) {
    match family {
        TrialFamily::Ask => {
            if let Some(clock) = frontend.ask_clock(samples) {
                ask_trials(frontend, samples, clock, hits);
            }
        }
        TrialFamily::Nrz => {
            if let Some(clock) = frontend.nrz_clock(samples) {
                nrz_trials(frontend, samples, clock, hits);
            }
        }
        TrialFamily::Psk => {
            let trimmed = psk_trimmed(samples);
            if let Some(clock) = frontend.psk_clock(trimmed) {
                psk_trials(frontend, trimmed, clock, hits);
            }
        }
    }
}

fn fsk_trials(
    frontend: &dyn DemodFrontend,
    samples: &[u8],
    clocks: FskClocks,
    hits: &mut Vec<CandidateMatch>,
) {
    for invert in [false, true] {
        let req = DemodRequest::Fsk { clock: 0, invert, fc1: 0, fc2: 0 };
        if let Some(bits) = frontend.demod(samples, &req) {
            if let Some(m) = validate_standard_layout(&bits, Modulation::Fsk, clocks.clock) {
                hits.push(candidate(fsk_variant(clocks, invert), invert, m, &bits));
            }
        }
    }
}

fn ask_trials(
    frontend: &dyn DemodFrontend,
    samples: &[u8],
    clock: u16,
    hits: &mut Vec<CandidateMatch>,
) {
    for invert in [false, true] {
        let req = DemodRequest::Ask { clock: 0, invert, max_err: 1 };
        if let Some(bits) = frontend.demod(samples, &req) {
            if let Some(m) = validate_standard_layout(&bits, Modulation::Ask, clock) {
                hits.push(candidate(Modulation::Ask, invert, m, &bits));
            }
        }
    }
    // Biphase rides the ASK clock: normal polarity decodes as biphase,
    // inverted as biphase-a (CDP).
    for (invert, hypothesis) in [(false, Modulation::Biphase), (true, Modulation::BiphaseA)] {
        let req = DemodRequest::Biphase { clock: 0, invert, max_err: 2 };
        if let Some(bits) = frontend.demod(samples, &req) {
            if let Some(m) = validate_standard_layout(&bits, hypothesis, clock) {
                hits.push(candidate(hypothesis, invert, m, &bits));
            }
        }
    }
}

fn nrz_trials(
    frontend: &dyn DemodFrontend,
    samples: &[u8],
    clock: u16,
    hits: &mut Vec<CandidateMatch>,
) {
    for invert in [false, true] {
        let req = DemodRequest::Nrz { clock: 0, invert, max_err: 1 };
        if let Some(bits) = frontend.demod(samples, &req) {
            if let Some(m) = validate_standard_layout(&bits, Modulation::Nrz, clock) {
                hits.push(candidate(Modulation::Nrz, invert, m, &bits));
            }
        }
    }
}

/// PSK trials run on the settle-trimmed capture. PSK2 and PSK3 have no
/// polarity of their own: both re-demodulate as PSK1 and apply the
/// transition transform, differing only in the layout code they must match.
fn psk_trials(
    frontend: &dyn DemodFrontend,
    trimmed: &[u8],
    clock: u16,
    hits: &mut Vec<CandidateMatch>,
) {
    for invert in [false, true] {
        let req = DemodRequest::Psk { clock: 0, invert, max_err: 6 };
        if let Some(bits) = frontend.demod(trimmed, &req) {
            if let Some(m) = validate_standard_layout(&bits, Modulation::Psk1, clock) {
                hits.push(candidate(Modulation::Psk1, invert, m, &bits));
            }
        }
    }
    for hypothesis in [Modulation::Psk2, Modulation::Psk3] {
        let req = DemodRequest::Psk { clock: 0, invert: false, max_err: 6 };
        if let Some(mut bits) = frontend.demod(trimmed, &req) {
            psk1_to_psk2(&mut bits);
            if let Some(m) = validate_standard_layout(&bits, hypothesis, clock) {
                hits.push(candidate(hypothesis, false, m, &bits));
            }
        }
    }
}
