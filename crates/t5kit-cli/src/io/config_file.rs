// crates/t5kit-cli/src/io/config_file.rs
//
// .t5c persisted tag configuration, key=value text.

use std::str::FromStr;

use anyhow::{bail, Context, Result};
use t5kit_core::{BitRate, ChipVariant, Modulation, TagConfig};

pub fn parse_chip(s: &str) -> Result<ChipVariant> {
    match s {
        "T55x7" => Ok(ChipVariant::T55x7),
        "Q5" | "T5555" => Ok(ChipVariant::Q5),
        other => bail!("unknown chip '{other}' (expected T55x7 or Q5)"),
    }
}

fn chip_name(v: ChipVariant) -> &'static str {
    match v {
        ChipVariant::T55x7 => "T55x7",
        ChipVariant::Q5 => "Q5",
    }
}

pub fn save_config(path: &str, config: &TagConfig) -> Result<()> {
    let text = format!(
        "chip={}\nmodulation={}\nrate={}\ninverted={}\noffset={}\nblock0=0x{:08X}\n",
        chip_name(config.variant),
        config.modulation.as_str(),
        config.bit_rate.divisor(),
        u8::from(config.inverted),
        config.offset,
        config.block0,
    );
    std::fs::write(path, text).with_context(|| format!("write config {path}"))
}

pub fn load_config(path: &str) -> Result<TagConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read config {path}"))?;
    let mut config = TagConfig::default();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            bail!("{path}:{}: expected key=value", lineno + 1);
        };
        match key.trim() {
            "chip" => config.variant = parse_chip(value.trim())?,
            "modulation" => {
                config.modulation = Modulation::from_str(value.trim())
                    .map_err(|e| anyhow::anyhow!("{path}:{}: {e}", lineno + 1))?
            }
            "rate" => {
                let divisor: u16 = value.trim().parse().context("bad rate")?;
                config.bit_rate = BitRate::from_divisor(divisor)
                    .or_else(|| BitRate::from_q5_divisor(divisor))
                    .with_context(|| format!("{path}: RF/{divisor} is not a valid rate"))?
            }
            "inverted" => config.inverted = value.trim() != "0",
            "offset" => config.offset = value.trim().parse().context("bad offset")?,
            "block0" => config.block0 = crate::cmd::parse_u32(value.trim())?,
            other => bail!("{path}:{}: unknown key '{other}'", lineno + 1),
        }
    }
    Ok(config)
}
