// crates/t5kit-core/tests/bitfield_roundtrip.rs

use t5kit_core::bits::{extract_field, BitBuffer};

fn lcg_next(x: &mut u64) -> u64 {
    // deterministic, not crypto
    *x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
    *x
}

fn random_bits(seed: &mut u64, n: usize) -> Vec<u8> {
    (0..n).map(|_| (lcg_next(seed) >> 63) as u8).collect()
}

#[test]
fn extract_inject_roundtrip_all_widths() {
    let mut seed: u64 = 0x1234_5678_9abc_def0;
    let bits = random_bits(&mut seed, 128);
    let buffer = BitBuffer::from_bits(bits);

    for len in 1usize..=32 {
        for _ in 0..8 {
            let start = (lcg_next(&mut seed) as usize) % (128 - len);
            let value = buffer.field(start, len).expect("in bounds");

            let mut reinjected = BitBuffer::zeroed(128);
            reinjected.set_field(start, len, value);
            assert_eq!(
                reinjected.field(start, len).unwrap(),
                value,
                "start={start} len={len}"
            );
        }
    }
}

#[test]
fn oversized_width_yields_zero_not_a_crash() {
    let bits = vec![1u8; 64];
    assert_eq!(extract_field(&bits, 0, 33), 0);
    assert_eq!(extract_field(&bits, 10, 40), 0);

    let buffer = BitBuffer::from_bits(bits);
    assert_eq!(buffer.field(0, 33).unwrap(), 0);
}

#[test]
fn checked_read_past_end_is_an_error() {
    let buffer = BitBuffer::zeroed(64);
    assert!(buffer.field(40, 32).is_err());
    assert!(buffer.field(64, 1).is_err());
    assert!(buffer.field(33, 31).is_ok());
}

#[test]
fn set_field_grows_and_is_msb_first() {
    let mut buffer = BitBuffer::new();
    buffer.set_field(4, 8, 0xA5);
    assert_eq!(buffer.len(), 12);
    assert_eq!(buffer.field(4, 8).unwrap(), 0xA5);
    assert_eq!(buffer.as_slice()[4], 1); // MSB of 0xA5
    assert_eq!(buffer.as_slice()[11], 1); // LSB of 0xA5
}
