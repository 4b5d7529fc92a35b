// crates/t5kit-cli/src/cmd/config.rs

use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;
use t5kit_core::{BitRate, ChipVariant, Modulation, TagConfig};

use crate::io::config_file;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// The .t5c configuration file
    #[arg(long)]
    pub path: String,

    #[arg(long)]
    pub chip: Option<String>,

    #[arg(long)]
    pub modulation: Option<String>,

    /// Data rate as RF divisor
    #[arg(long)]
    pub rate: Option<u16>,

    #[arg(long)]
    pub inverted: Option<bool>,

    #[arg(long)]
    pub offset: Option<u8>,

    #[arg(long)]
    pub block0: Option<String>,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let mut config = if std::path::Path::new(&args.path).exists() {
        config_file::load_config(&args.path)?
    } else {
        TagConfig::default()
    };

    let mut changed = false;
    if let Some(chip) = &args.chip {
        config.variant = config_file::parse_chip(chip)?;
        changed = true;
    }
    if let Some(modulation) = &args.modulation {
        config.modulation = Modulation::from_str(modulation).map_err(anyhow::Error::msg)?;
        changed = true;
    }
    if let Some(rate) = args.rate {
        config.bit_rate = rate_for(config.variant, rate)?;
        changed = true;
    }
    if let Some(inverted) = args.inverted {
        config.inverted = inverted;
        changed = true;
    }
    if let Some(offset) = args.offset {
        config.offset = offset;
        changed = true;
    }
    if let Some(block0) = &args.block0 {
        config.block0 = super::parse_u32(block0)?;
        changed = true;
    }

    if changed {
        config_file::save_config(&args.path, &config)?;
    }
    eprintln!("{config}");
    Ok(())
}

/// T55x7 rates come from the fixed table; Q5 accepts any even divisor.
pub(crate) fn rate_for(variant: ChipVariant, divisor: u16) -> Result<BitRate> {
    match variant {
        ChipVariant::T55x7 => BitRate::from_divisor(divisor)
            .with_context(|| format!("RF/{divisor} is not a standard T55x7 rate")),
        ChipVariant::Q5 => BitRate::from_q5_divisor(divisor)
            .with_context(|| format!("RF/{divisor} is not an even rate in 8..=128")),
    }
}
