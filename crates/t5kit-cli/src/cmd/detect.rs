// crates/t5kit-cli/src/cmd/detect.rs

use anyhow::{bail, Result};
use clap::Args;
use t5kit_core::detect::detect;
use t5kit_core::device::CONFIG_BLOCK;
use t5kit_core::{DetectionResult, Page, TagDevice};
use t5kit_sim::{SimDevice, SimFrontend};

use crate::io::{capture_file, config_file, tag_file};

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Simulated tag file (.t5s) to acquire from
    #[arg(long)]
    pub tag: Option<String>,

    /// Existing capture file (.lfc) to scan instead of acquiring
    #[arg(long)]
    pub r#in: Option<String>,

    /// Password to acquire with (hex or decimal)
    #[arg(long)]
    pub password: Option<String>,

    /// Write the detected configuration to a .t5c file
    #[arg(long)]
    pub save_config: Option<String>,

    /// Write the raw acquisition to a .lfc capture file
    #[arg(long)]
    pub save_capture: Option<String>,
}

pub fn run(args: DetectArgs) -> Result<()> {
    let samples = match (&args.tag, &args.r#in) {
        (Some(tag_path), None) => {
            let mut device = SimDevice::new(tag_file::load_tag(tag_path)?);
            let password = super::parse_password(args.password.as_deref())?;
            device.acquire(Page::Zero, CONFIG_BLOCK, password)?
        }
        (None, Some(capture_path)) => capture_file::load_capture(capture_path)?,
        _ => bail!("pass exactly one of --tag or --in"),
    };
    if let Some(path) = &args.save_capture {
        capture_file::save_capture(path, &samples)?;
    }

    match detect(&SimFrontend::new(), &samples) {
        DetectionResult::Unique(config) => {
            eprintln!("--- detected configuration ---");
            eprintln!("{config}");
            if let Some(path) = &args.save_config {
                config_file::save_config(path, &config)?;
                eprintln!("saved      : {path}");
            }
            Ok(())
        }
        DetectionResult::Ambiguous(candidates) => {
            eprintln!("--- ambiguous: {} candidates ---", candidates.len());
            eprintln!(" mod        | rate   | inv | off | chip      | block0");
            eprintln!(" -----------+--------+-----+-----+-----------+-----------");
            for c in &candidates {
                eprintln!(
                    " {:<10} | RF/{:<4} | {:<3} | {:>3} | {:<9} | 0x{:08X}",
                    c.modulation.as_str(),
                    c.bit_rate.divisor(),
                    if c.inverted { "yes" } else { "no" },
                    c.offset,
                    c.variant.as_str(),
                    c.block0,
                );
            }
            bail!("ambiguous detection; pick one and write it with `config`")
        }
        DetectionResult::NoMatch => bail!("no modulation matched"),
    }
}
