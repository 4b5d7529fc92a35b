// crates/t5kit-cli/src/cmd/offsets.rs
//
// Sweep every framing offset over one block capture and print the 32-bit
// window at each, for manual inspection when detection cannot decide.

use anyhow::{bail, Result};
use clap::Args;
use t5kit_core::decode::decode_block;
use t5kit_core::{BitBuffer, Page, TagConfig};
use t5kit_sim::{Capture, SimFrontend};

use crate::io::{capture_file, config_file};

#[derive(Args, Debug)]
pub struct OffsetsArgs {
    /// Simulated tag file (.t5s)
    #[arg(long)]
    pub tag: Option<String>,

    /// Existing capture file (.lfc) to sweep instead of acquiring
    #[arg(long)]
    pub r#in: Option<String>,

    /// Block number to acquire (tag mode)
    #[arg(long, default_value_t = 0)]
    pub block: u8,

    /// Use this .t5c configuration instead of detecting
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run(args: OffsetsArgs) -> Result<()> {
    let (bits, active) = match (&args.tag, &args.r#in) {
        (Some(tag_path), None) => {
            let mut session = super::open_session(tag_path)?;
            super::establish_config(&mut session, args.config.as_deref())?;
            session.read_block(Page::Zero, args.block, None, false)?;
            (session.held_bits().clone(), Some(session.config().offset))
        }
        (None, Some(capture_path)) => {
            let samples = capture_file::load_capture(capture_path)?;
            match args.config.as_deref() {
                Some(config_path) => {
                    let config: TagConfig = config_file::load_config(config_path)?;
                    let bits = decode_block(&SimFrontend::new(), &samples, &config)?;
                    (bits, Some(config.offset))
                }
                // No keying known: sweep the raw capture bits as stored.
                None => match Capture::decode(&samples) {
                    Ok(capture) => (capture.bits, None),
                    Err(e) => bail!("{capture_path}: {e}"),
                },
            }
        }
        _ => bail!("pass exactly one of --tag or --in"),
    };

    sweep(&bits, active);
    Ok(())
}

fn sweep(bits: &BitBuffer, active: Option<u8>) {
    eprintln!(" off | hex data   | binary");
    eprintln!(" ----+------------+---------------------------------");
    for offset in 0..64usize {
        if offset + 32 > bits.len() {
            break;
        }
        let marker = if active == Some(offset as u8) { "  <- offset" } else { "" };
        eprintln!(
            "  {:02} | 0x{:08X} | {}{}",
            offset,
            bits.field_unchecked(offset, 32),
            bits.bin_string(offset, 32),
            marker
        );
    }
}
