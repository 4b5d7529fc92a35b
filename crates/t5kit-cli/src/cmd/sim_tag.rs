// crates/t5kit-cli/src/cmd/sim_tag.rs

use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use t5kit_core::{Modulation, TagConfig};
use t5kit_sim::SimTag;

use crate::io::{config_file, tag_file};

#[derive(Args, Debug)]
pub struct SimArgs {
    #[command(subcommand)]
    pub cmd: SimCmd,
}

#[derive(Subcommand, Debug)]
pub enum SimCmd {
    /// Create a simulated tag file
    New(NewArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Output .t5s tag file
    #[arg(long)]
    pub out: String,

    /// Chip variant: T55x7 or Q5
    #[arg(long, default_value = "T55x7")]
    pub chip: String,

    /// Modulation: FSK1/FSK1a/FSK2/FSK2a/ASK/PSK1/PSK2/PSK3/NRZ/BI/BIa
    #[arg(long, default_value = "ASK")]
    pub modulation: String,

    /// Data rate as RF divisor (T55x7: 8/16/32/40/50/64/100/128; Q5: any
    /// even divisor in 8..=128)
    #[arg(long, default_value_t = 32)]
    pub rate: u16,

    /// Put the tag in password mode with this password (hex or decimal)
    #[arg(long)]
    pub password: Option<String>,

    /// Preload a user block, repeatable: --data 1=0x11223344
    #[arg(long)]
    pub data: Vec<String>,
}

pub fn run(args: SimArgs) -> anyhow::Result<()> {
    match args.cmd {
        SimCmd::New(args) => new_tag(args),
    }
}

fn new_tag(args: NewArgs) -> Result<()> {
    let variant = config_file::parse_chip(&args.chip)?;
    let config = TagConfig {
        variant,
        modulation: Modulation::from_str(&args.modulation).map_err(anyhow::Error::msg)?,
        bit_rate: super::config::rate_for(variant, args.rate)?,
        ..TagConfig::default()
    };

    let mut tag = SimTag::new(config);
    if let Some(password) = &args.password {
        tag.set_password(super::parse_u32(password)?);
    }
    for entry in &args.data {
        let (block, value) = parse_data_entry(entry)?;
        tag.set_block(false, block, value);
    }

    tag_file::save_tag(&args.out, &tag)?;
    eprintln!("--- new simulated tag ---");
    eprintln!("{}", tag.config());
    eprintln!("file       : {}", args.out);
    Ok(())
}

fn parse_data_entry(entry: &str) -> Result<(u8, u32)> {
    let Some((block, value)) = entry.split_once('=') else {
        bail!("bad --data entry '{entry}' (expected blk=value)");
    };
    let block: u8 = block.trim().parse().with_context(|| format!("bad block in '{entry}'"))?;
    if !(1..=6).contains(&block) {
        bail!("--data block must be 1..=6, got {block}");
    }
    Ok((block, super::parse_u32(value)?))
}
