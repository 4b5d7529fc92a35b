// crates/t5kit-cli/src/io/tag_file.rs
//
// .t5s simulated tag state. Layout (little-endian):
// MAGIC[4] = "T5S1"
// version:u8
// variant:u8  modulation:u8  rate_divisor:u16  inverted:u8  offset:u8  protected:u8
// password:u32
// page0: 8 x u32
// page1: 4 x u32
// crc32:u32  (over everything before it)

use anyhow::{bail, Context, Result};
use t5kit_core::{BitRate, ChipVariant, Modulation, TagConfig};
use t5kit_sim::SimTag;

const MAGIC: &[u8; 4] = b"T5S1";
const VERSION: u8 = 1;

pub fn save_tag(path: &str, tag: &SimTag) -> Result<()> {
    let c = tag.config();
    let mut b = Vec::with_capacity(80);
    b.extend_from_slice(MAGIC);
    b.push(VERSION);
    b.push(variant_code(c.variant));
    b.push(modulation_code(c.modulation));
    b.extend_from_slice(&c.bit_rate.divisor().to_le_bytes());
    b.push(u8::from(c.inverted));
    b.push(c.offset);
    b.push(u8::from(tag.protected()));
    b.extend_from_slice(&tag.password().to_le_bytes());
    for w in tag.page0() {
        b.extend_from_slice(&w.to_le_bytes());
    }
    for w in tag.page1() {
        b.extend_from_slice(&w.to_le_bytes());
    }
    let crc = crc32fast::hash(&b);
    b.extend_from_slice(&crc.to_le_bytes());

    std::fs::write(path, b).with_context(|| format!("write tag {path}"))?;
    Ok(())
}

pub fn load_tag(path: &str) -> Result<SimTag> {
    let bytes = std::fs::read(path).with_context(|| format!("read tag {path}"))?;
    if bytes.len() < 4 || &bytes[0..4] != MAGIC {
        bail!("{path}: not a .t5s tag file");
    }
    let mut i = 4usize;

    let version = read_u8(&bytes, &mut i)?;
    if version != VERSION {
        bail!("{path}: unsupported tag file version {version}");
    }
    let variant = variant_from_code(read_u8(&bytes, &mut i)?)?;
    let modulation = modulation_from_code(read_u8(&bytes, &mut i)?)?;
    let rate_divisor = read_u16(&bytes, &mut i)?;
    let bit_rate = BitRate::from_divisor(rate_divisor)
        .or_else(|| BitRate::from_q5_divisor(rate_divisor))
        .with_context(|| format!("{path}: bad rate divisor {rate_divisor}"))?;
    let inverted = read_u8(&bytes, &mut i)? != 0;
    let offset = read_u8(&bytes, &mut i)?;
    let protected = read_u8(&bytes, &mut i)? != 0;
    let password = read_u32(&bytes, &mut i)?;

    let mut page0 = [0u32; 8];
    for w in &mut page0 {
        *w = read_u32(&bytes, &mut i)?;
    }
    let mut page1 = [0u32; 4];
    for w in &mut page1 {
        *w = read_u32(&bytes, &mut i)?;
    }

    let crc_expected = read_u32(&bytes, &mut i)?;
    let crc_actual = crc32fast::hash(&bytes[..i - 4]);
    if crc_expected != crc_actual {
        bail!("{path}: tag file crc mismatch");
    }

    let config = TagConfig {
        variant,
        modulation,
        bit_rate,
        inverted,
        offset,
        block0: page0[0],
    };
    Ok(SimTag::with_state(config, page0, page1, password, protected))
}

fn variant_code(v: ChipVariant) -> u8 {
    match v {
        ChipVariant::T55x7 => 0,
        ChipVariant::Q5 => 1,
    }
}

fn variant_from_code(code: u8) -> Result<ChipVariant> {
    Ok(match code {
        0 => ChipVariant::T55x7,
        1 => ChipVariant::Q5,
        other => bail!("unknown chip variant code {other}"),
    })
}

fn modulation_code(m: Modulation) -> u8 {
    match m {
        Modulation::Fsk => 0,
        Modulation::Fsk1 => 1,
        Modulation::Fsk1a => 2,
        Modulation::Fsk2 => 3,
        Modulation::Fsk2a => 4,
        Modulation::Ask => 5,
        Modulation::Psk1 => 6,
        Modulation::Psk2 => 7,
        Modulation::Psk3 => 8,
        Modulation::Nrz => 9,
        Modulation::Biphase => 10,
        Modulation::BiphaseA => 11,
    }
}

fn modulation_from_code(code: u8) -> Result<Modulation> {
    Ok(match code {
        0 => Modulation::Fsk,
        1 => Modulation::Fsk1,
        2 => Modulation::Fsk1a,
        3 => Modulation::Fsk2,
        4 => Modulation::Fsk2a,
        5 => Modulation::Ask,
        6 => Modulation::Psk1,
        7 => Modulation::Psk2,
        8 => Modulation::Psk3,
        9 => Modulation::Nrz,
        10 => Modulation::Biphase,
        11 => Modulation::BiphaseA,
        other => bail!("unknown modulation code {other}"),
    })
}

fn read_u8(bytes: &[u8], i: &mut usize) -> Result<u8> {
    if bytes.len() < *i + 1 {
        bail!("tag file truncated");
    }
    let v = bytes[*i];
    *i += 1;
    Ok(v)
}

fn read_u16(bytes: &[u8], i: &mut usize) -> Result<u16> {
    if bytes.len() < *i + 2 {
        bail!("tag file truncated");
    }
    let v = u16::from_le_bytes(bytes[*i..*i + 2].try_into().unwrap());
    *i += 2;
    Ok(v)
}

fn read_u32(bytes: &[u8], i: &mut usize) -> Result<u32> {
    if bytes.len() < *i + 4 {
        bail!("tag file truncated");
    }
    let v = u32::from_le_bytes(bytes[*i..*i + 4].try_into().unwrap());
    *i += 4;
    Ok(v)
}
