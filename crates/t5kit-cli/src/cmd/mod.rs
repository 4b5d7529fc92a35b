// crates/t5kit-cli/src/cmd/mod.rs

pub mod config;
pub mod detect;
pub mod dump;
pub mod info;
pub mod offsets;
pub mod read;
pub mod resetread;
pub mod sim_tag;
pub mod trace;
pub mod wakeup;
pub mod wipe;
pub mod write;

use anyhow::{bail, Context, Result};
use t5kit_core::{DetectionResult, Session};
use t5kit_sim::{SimDevice, SimFrontend};

pub(crate) type SimSession = Session<SimDevice, SimFrontend>;

pub(crate) fn open_session(tag_path: &str) -> Result<SimSession> {
    let tag = crate::io::tag_file::load_tag(tag_path)?;
    Ok(Session::new(SimDevice::new(tag), SimFrontend::new()))
}

/// Establish the active configuration: an explicit .t5c file wins, otherwise
/// a detection pass must come back unique.
pub(crate) fn establish_config(
    session: &mut SimSession,
    config_path: Option<&str>,
) -> Result<()> {
    if let Some(path) = config_path {
        let config = crate::io::config_file::load_config(path)?;
        session.set_config(config);
        return Ok(());
    }
    match session.detect(None)? {
        DetectionResult::Unique(_) => Ok(()),
        DetectionResult::Ambiguous(candidates) => bail!(
            "detection is ambiguous ({} candidates); resolve with `detect` and pass --config",
            candidates.len()
        ),
        DetectionResult::NoMatch => {
            bail!("no modulation matched; pass --config with a known configuration")
        }
    }
}

/// Accept `0x`-prefixed hex or plain decimal.
pub(crate) fn parse_u32(s: &str) -> Result<u32> {
    let t = s.trim();
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("bad hex value '{s}'"))
    } else {
        t.parse::<u32>().with_context(|| format!("bad value '{s}'"))
    }
}

pub(crate) fn parse_password(s: Option<&str>) -> Result<Option<u32>> {
    s.map(parse_u32).transpose()
}

pub(crate) fn print_block_header() {
    eprintln!(" blk | hex data   | binary");
    eprintln!(" ----+------------+---------------------------------");
}

pub(crate) fn print_block_row(block: u8, value: u32, binary: &str) {
    eprintln!("  {block:02} | 0x{value:08X} | {binary}");
}
