// crates/t5kit-core/src/decode/trace.rs

use crate::bits::BitBuffer;
use crate::error::{Result, T5Error};

/// Allocation class every genuine traceability block carries (ISO/IEC
/// 15963-1). Anything else means the selected modulation hypothesis was
/// wrong, and decoding must stop instead of printing garbage.
pub const EXPECTED_ACL: u8 = 0xE0;

/// Manufacturing traceability data from page 1, blocks 0-1.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraceData {
    pub block1: u32,
    pub block2: u32,
    pub acl: u8,
    pub mfc: u8,
    pub cid: u8,
    pub icr: u8,
    pub year: u16,
    pub quarter: u8,
    pub lot_id: u16,
    pub wafer: u8,
    pub die: u16,
}

/// Anchor of the traceability stream. The +32 shift for offsets above 5
/// compensates a framing artifact observed on real page 1 reads; it is an
/// empirically derived heuristic, not a protocol constant, and must not be
/// "fixed" without hardware validation.
pub fn trace_anchor(offset: usize) -> usize {
    if offset > 5 {
        offset + 32
    } else {
        offset
    }
}

/// Decode the traceability block pair anchored at the active offset.
/// `current_year` resolves the 4-bit BCD manufacturing year into a decade.
pub fn decode_traceability(
    bits: &BitBuffer,
    offset: usize,
    current_year: u16,
) -> Result<TraceData> {
    let start = trace_anchor(offset);
    let block1 = bits.field(start, 32)?;
    let block2 = bits.field(start + 32, 32)?;

    let mut at = start;
    let mut take = |len: usize| {
        let v = bits.field_unchecked(at, len);
        at += len;
        v
    };

    let acl = take(8) as u8;
    if acl != EXPECTED_ACL {
        return Err(T5Error::InconsistentAllocationClass(acl));
    }

    let mfc = take(8) as u8;
    let cid = take(5) as u8;
    let icr = take(3) as u8;
    let year = resolve_year(take(4) as u8, current_year);
    let quarter = take(2) as u8;
    let lot_id = take(14) as u16;
    let wafer = take(5) as u8;
    let die = take(15) as u16;

    Ok(TraceData {
        block1,
        block2,
        acl,
        mfc,
        cid,
        icr,
        year,
        quarter,
        lot_id,
        wafer,
        die,
    })
}

/// The tag stores only the final year digit (BCD). Pick the most recent
/// decade from 2000 on that does not land in the future.
pub fn resolve_year(bcd: u8, current_year: u16) -> u16 {
    let digit = u16::from(bcd.min(9));
    let mut year = 2000 + digit;
    while year + 10 <= current_year {
        year += 10;
    }
    year
}
