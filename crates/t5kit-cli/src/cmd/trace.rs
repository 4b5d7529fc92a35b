// crates/t5kit-cli/src/cmd/trace.rs

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Args;
use t5kit_core::ChipVariant;

#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Simulated tag file (.t5s)
    #[arg(long)]
    pub tag: String,

    /// Use this .t5c configuration instead of detecting
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run(args: TraceArgs) -> Result<()> {
    let mut session = super::open_session(&args.tag)?;
    super::establish_config(&mut session, args.config.as_deref())?;

    if session.config().variant == ChipVariant::Q5 {
        eprintln!("note: Q5 page 1 does not carry Atmel traceability; decoding anyway");
    }

    let trace = session.read_trace(false, current_year())?;

    eprintln!("--- trace information ---");
    eprintln!(
        " ACL allocation class (ISO/IEC 15963-1) : 0x{:02X} ({})",
        trace.acl, trace.acl
    );
    eprintln!(
        " MFC manufacturer ID  (ISO/IEC 7816-6)  : 0x{:02X} ({}) - {}",
        trace.mfc,
        trace.mfc,
        mfc_name(trace.mfc)
    );
    eprintln!(
        " CID                                    : 0x{:02X} ({}) - {}",
        trace.cid,
        trace.cid,
        cid_name(trace.cid)
    );
    eprintln!(" ICR IC revision                        : {}", trace.icr);
    eprintln!(" manufactured");
    eprintln!("     year/quarter : {}/{}", trace.year, trace.quarter);
    eprintln!("     lot ID       : {}", trace.lot_id);
    eprintln!("     wafer number : {}", trace.wafer);
    eprintln!("     die number   : {}", trace.die);
    eprintln!(" raw data - page 1");
    eprintln!("     block 1 : 0x{:08X}", trace.block1);
    eprintln!("     block 2 : 0x{:08X}", trace.block2);
    Ok(())
}

fn mfc_name(mfc: u8) -> &'static str {
    match mfc {
        0x15 => "Atmel Corporation",
        _ => "unknown",
    }
}

fn cid_name(cid: u8) -> &'static str {
    match cid {
        1 => "ATA5577M1",
        2 => "ATA5577M2",
        _ => "unknown",
    }
}

fn current_year() -> u16 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    civil_year_from_days((secs / 86_400) as i64)
}

/// Gregorian year for a day count since 1970-01-01 (days-from-civil,
/// inverted).
fn civil_year_from_days(days: i64) -> u16 {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    if m <= 2 {
        (y + 1) as u16
    } else {
        y as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn civil_year_handles_epoch_and_leap_boundaries() {
        assert_eq!(civil_year_from_days(0), 1970);
        assert_eq!(civil_year_from_days(365), 1971);
        // 2000-02-29 is day 11016.
        assert_eq!(civil_year_from_days(11_016), 2000);
        // 2026-01-01 is day 20454.
        assert_eq!(civil_year_from_days(20_454), 2026);
    }
}
