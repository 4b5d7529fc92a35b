// crates/t5kit-core/src/decode/info.rs

use crate::bits::BitBuffer;
use crate::config::BitRate;
use crate::error::Result;

/// Fixed-layout projection of the page 0 configuration word. Read-only:
/// decoding never touches the active configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConfigBlock {
    pub raw: u32,
    pub safer: u8,
    pub reserved: u8,
    pub data_rate_code: u8,
    pub extended: bool,
    pub modulation_code: u8,
    pub psk_clock: u8,
    pub answer_on_request: bool,
    pub one_time_pad: bool,
    pub max_block: u8,
    pub password_mode: bool,
    pub sequence_terminator: bool,
    pub fast_write: bool,
    pub inverse_data: bool,
    pub por_delay: bool,
}

/// Decode the configuration word anchored at the active offset.
pub fn decode_config_block(bits: &BitBuffer, offset: usize) -> Result<ConfigBlock> {
    // One checked read up front; the field walk below stays in bounds.
    let raw = bits.field(offset, 32)?;

    let mut at = offset;
    let mut take = |len: usize| {
        let v = bits.field_unchecked(at, len);
        at += len;
        v
    };

    Ok(ConfigBlock {
        raw,
        safer: take(4) as u8,
        reserved: take(7) as u8,
        data_rate_code: take(3) as u8,
        extended: take(1) == 1,
        modulation_code: take(5) as u8,
        psk_clock: take(2) as u8,
        answer_on_request: take(1) == 1,
        one_time_pad: take(1) == 1,
        max_block: take(3) as u8,
        password_mode: take(1) == 1,
        sequence_terminator: take(1) == 1,
        fast_write: take(1) == 1,
        inverse_data: take(1) == 1,
        por_delay: take(1) == 1,
    })
}

impl ConfigBlock {
    pub fn data_rate(&self) -> Option<BitRate> {
        BitRate::from_code(self.data_rate_code)
    }

    /// Operator description of the safer/master key nibble.
    pub fn safer_str(&self) -> String {
        match self.safer {
            6 => format!("{} - passwd", self.safer),
            9 => format!("{} - testmode", self.safer),
            other => other.to_string(),
        }
    }

    /// Operator description of the 5-bit modulation code.
    pub fn modulation_str(&self) -> String {
        let s = match self.modulation_code {
            0 => "DIRECT (ASK/NRZ)",
            1 => "PSK 1 phase change when input changes",
            2 => "PSK 2 phase change on bitclk if input high",
            3 => "PSK 3 phase change on rising edge of input",
            4 => "FSK 1 RF/8  RF/5",
            5 => "FSK 2 RF/8  RF/10",
            6 => "FSK 1a RF/5  RF/8",
            7 => "FSK 2a RF/10  RF/8",
            8 => "Manchester",
            16 => "Biphase",
            17 => "Reserved",
            24 => "Biphase a - AKA Conditional Dephase Encoding(CDP)",
            _ => return format!("0x{:02X} (Unknown)", self.modulation_code),
        };
        format!("{} - {}", self.modulation_code, s)
    }
}
