// crates/t5kit-sim/tests/sim_dump.rs

use t5kit_core::{
    BitRate, ChipVariant, DetectionResult, Modulation, Page, Session, T5Error, TagConfig,
    WriteRequest,
};
use t5kit_sim::{SimDevice, SimFrontend, SimTag};

fn ask_session() -> Session<SimDevice, SimFrontend> {
    let config = TagConfig {
        variant: ChipVariant::T55x7,
        modulation: Modulation::Ask,
        bit_rate: BitRate::from_divisor(32).unwrap(),
        ..TagConfig::default()
    };
    let mut session = Session::new(SimDevice::new(SimTag::new(config)), SimFrontend::new());
    match session.detect(None).expect("acquisition") {
        DetectionResult::Unique(_) => session,
        other => panic!("setup detection failed: {other:?}"),
    }
}

#[test]
fn read_block_returns_the_stored_word() {
    let mut session = ask_session();
    session.device_mut().tag_mut().set_block(false, 5, 0xDEAD_BEEF);
    let out = session.read_block(Page::Zero, 5, None, false).expect("read");
    assert_eq!(out.value, 0xDEAD_BEEF);
    assert_eq!(out.binary.len(), 32);
    assert_eq!(out.binary, format!("{:032b}", 0xDEAD_BEEFu32));
}

#[test]
fn write_then_read_roundtrip() {
    let mut session = ask_session();
    let req = WriteRequest { page: Page::Zero, block: 6, data: 0x1122_3344, password: None };
    session.write_block(&req).expect("write");
    let out = session.read_block(Page::Zero, 6, None, false).expect("read");
    assert_eq!(out.value, 0x1122_3344);
}

#[test]
fn block_numbers_above_seven_are_rejected() {
    let mut session = ask_session();
    let req = WriteRequest { page: Page::Zero, block: 8, data: 0, password: None };
    assert!(matches!(session.write_block(&req), Err(T5Error::BlockOutOfRange(8))));
    assert!(matches!(
        session.read_block(Page::Zero, 9, None, false),
        Err(T5Error::BlockOutOfRange(9))
    ));
}

#[test]
fn dump_tolerates_a_dead_block() {
    let mut session = ask_session();
    session.device_mut().force_timeout(Page::Zero, 3);

    let report = session.dump(None, false);
    assert_eq!(report.entries.len(), 12);
    assert_eq!(report.succeeded(), 11);

    let failed = report
        .entries
        .iter()
        .find(|e| e.outcome.is_err())
        .expect("one failed entry");
    assert_eq!(failed.page, Page::Zero);
    assert_eq!(failed.block, 3);
    assert!(matches!(failed.outcome, Err(T5Error::AcquisitionTimeout)));
}

#[test]
fn dump_covers_both_pages() {
    let mut session = ask_session();
    let report = session.dump(None, false);
    assert_eq!(report.succeeded(), 12);
    let page1_blocks: Vec<u8> = report
        .entries
        .iter()
        .filter(|e| e.page == Page::One)
        .map(|e| e.block)
        .collect();
    assert_eq!(page1_blocks, vec![0, 1, 2, 3]);
}

#[test]
fn wipe_restores_factory_defaults() {
    let mut session = ask_session();
    session.device_mut().tag_mut().set_block(false, 4, 0xCAFE_F00D);

    let results = session.wipe();
    assert_eq!(results.len(), 8);
    assert!(results.iter().all(|(_, r)| r.is_ok()));

    let tag = session.device_mut().tag();
    assert_eq!(tag.page0()[0], t5kit_core::session::WIPE_CONFIG_WORD);
    for block in 1..8 {
        assert_eq!(tag.page0()[block], 0, "block {block} must be zeroed");
    }
    // The rewritten config word re-keys the tag to stock ASK RF/32.
    assert_eq!(tag.config().modulation, Modulation::Ask);
    assert_eq!(tag.config().bit_rate.divisor(), 32);
}

#[test]
fn failed_wipe_blocks_are_reported_not_fatal() {
    let mut session = ask_session();
    session.device_mut().force_write_failure(Page::Zero, 2);

    let results = session.wipe();
    let (block, outcome) = &results[2];
    assert_eq!(*block, 2);
    assert!(matches!(outcome, Err(T5Error::WriteNotAcknowledged)));
    assert_eq!(results.iter().filter(|(_, r)| r.is_ok()).count(), 7);
}
