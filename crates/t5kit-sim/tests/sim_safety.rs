// crates/t5kit-sim/tests/sim_safety.rs
//
// Password safety protocol: reads check the tag's password bit before ever
// sending password reference bits; writes never do.

use t5kit_core::{
    BitRate, ChipVariant, DetectionResult, Modulation, Page, Session, T5Error, TagConfig,
    WriteRequest,
};
use t5kit_sim::{SimDevice, SimFrontend, SimTag};

const PWD: u32 = 0x5A17_C0DE;

fn ask_config() -> TagConfig {
    TagConfig {
        variant: ChipVariant::T55x7,
        modulation: Modulation::Ask,
        bit_rate: BitRate::from_divisor(32).unwrap(),
        ..TagConfig::default()
    }
}

fn open_session(tag: SimTag) -> Session<SimDevice, SimFrontend> {
    Session::new(SimDevice::new(tag), SimFrontend::new())
}

#[test]
fn password_read_downgrades_when_the_bit_is_clear() {
    let tag = SimTag::new(ask_config());
    let block0 = tag.config().block0;
    let mut session = open_session(tag);

    // Password and page 1 requested, but the tag is not protected: both are
    // dropped and the read lands on page 0 without reference bits.
    let out = session
        .read_block(Page::One, 0, Some(PWD), false)
        .expect("downgraded read");
    assert_eq!(out.page, Page::Zero);
    assert_eq!(out.value, block0);
    assert_eq!(session.device_mut().risky_reads(), 0);
}

#[test]
fn safety_check_aborts_when_detection_fails() {
    let mut tag = SimTag::new(ask_config());
    tag.set_password(PWD);
    let mut session = open_session(tag);

    // The protected tag answers the passwordless probe with noise, so the
    // bit cannot be assessed and the read must not proceed.
    match session.read_block(Page::Zero, 1, Some(PWD), false) {
        Err(T5Error::SafetyCheckFailed(_)) => {}
        other => panic!("expected safety abort, got {other:?}"),
    }
    assert_eq!(session.device_mut().risky_reads(), 0);
}

#[test]
fn reset_read_on_a_protected_tag_yields_noise() {
    let mut tag = SimTag::new(ask_config());
    tag.set_password(PWD);
    let mut session = open_session(tag);

    session.reset_read().expect("reset");
    assert_eq!(session.detect_held(), DetectionResult::NoMatch);

    // After a correct wakeup the same reset stream decodes.
    session.wakeup(PWD).expect("wakeup");
    session.reset_read().expect("reset");
    assert!(matches!(session.detect_held(), DetectionResult::Unique(_)));
}

#[test]
fn override_reads_a_protected_tag() {
    let mut tag = SimTag::new(ask_config());
    tag.set_password(PWD);
    let expected_config = *tag.config();
    let mut session = open_session(tag);
    session.set_config(expected_config);

    let out = session
        .read_block(Page::Zero, 7, Some(PWD), true)
        .expect("override read");
    assert_eq!(out.value, PWD);
}

#[test]
fn wrong_password_read_fails_to_demodulate() {
    let mut tag = SimTag::new(ask_config());
    tag.set_password(PWD);
    let expected_config = *tag.config();
    let mut session = open_session(tag);
    session.set_config(expected_config);

    match session.read_block(Page::Zero, 1, Some(0x0BAD_0BAD), true) {
        Err(T5Error::DemodulationFailed(_)) => {}
        other => panic!("expected garbled stream, got {other:?}"),
    }
}

#[test]
fn writes_skip_the_safety_check() {
    // A password write at an unprotected tag goes straight through; the
    // session never probes the config block first.
    let tag = SimTag::new(ask_config());
    let mut session = open_session(tag);
    let req = WriteRequest { page: Page::Zero, block: 5, data: 0xAA55_AA55, password: Some(PWD) };
    session.write_block(&req).expect("write");
    assert_eq!(session.device_mut().tag().page0()[5], 0xAA55_AA55);
    assert_eq!(session.device_mut().risky_reads(), 0);
}

#[test]
fn wrong_password_write_loses_its_ack() {
    let mut tag = SimTag::new(ask_config());
    tag.set_password(PWD);
    let mut session = open_session(tag);

    let req = WriteRequest { page: Page::Zero, block: 5, data: 1, password: Some(0x0BAD_0BAD) };
    assert!(matches!(session.write_block(&req), Err(T5Error::WriteNotAcknowledged)));

    let req = WriteRequest { page: Page::Zero, block: 5, data: 2, password: Some(PWD) };
    session.write_block(&req).expect("write with correct password");
    assert_eq!(session.device_mut().tag().page0()[5], 2);
}

#[test]
fn wakeup_opens_regular_reads_on_a_protected_tag() {
    let mut tag = SimTag::new(ask_config());
    tag.set_password(PWD);
    let mut session = open_session(tag);

    session.wakeup(PWD).expect("wakeup");
    match session.detect(None).expect("acquisition") {
        DetectionResult::Unique(found) => assert_eq!(found.modulation, Modulation::Ask),
        other => panic!("expected detection after wakeup, got {other:?}"),
    }
    let out = session.read_block(Page::Zero, 7, None, false).expect("read");
    assert_eq!(out.value, PWD);
}
