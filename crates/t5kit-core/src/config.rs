// crates/t5kit-core/src/config.rs

use std::fmt;
use std::str::FromStr;

/// The two chip families that share the nominal block layout but encode
/// modulation codes and field widths differently.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ChipVariant {
    #[default]
    T55x7,
    Q5,
}

impl ChipVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ChipVariant::T55x7 => "T55x7",
            ChipVariant::Q5 => "T5555(Q5)",
        }
    }
}

/// Keying scheme. FSK1/FSK1a/FSK2/FSK2a share the generic FSK layout code
/// on the tag; they are told apart only by the measured field-clock pair,
/// never by the configuration block itself.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Modulation {
    Fsk,
    Fsk1,
    Fsk1a,
    Fsk2,
    Fsk2a,
    #[default]
    Ask,
    Psk1,
    Psk2,
    Psk3,
    Nrz,
    Biphase,
    BiphaseA,
}

impl Modulation {
    pub fn as_str(self) -> &'static str {
        match self {
            Modulation::Fsk => "FSK",
            Modulation::Fsk1 => "FSK1",
            Modulation::Fsk1a => "FSK1a",
            Modulation::Fsk2 => "FSK2",
            Modulation::Fsk2a => "FSK2a",
            Modulation::Ask => "ASK",
            Modulation::Psk1 => "PSK1",
            Modulation::Psk2 => "PSK2",
            Modulation::Psk3 => "PSK3",
            Modulation::Nrz => "DIRECT/NRZ",
            Modulation::Biphase => "BIPHASE",
            Modulation::BiphaseA => "BIPHASEa (CDP)",
        }
    }

    pub fn is_fsk(self) -> bool {
        matches!(
            self,
            Modulation::Fsk
                | Modulation::Fsk1
                | Modulation::Fsk1a
                | Modulation::Fsk2
                | Modulation::Fsk2a
        )
    }
}

impl FromStr for Modulation {
    type Err = String;

    /// Operator-facing names as accepted on the command line.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "FSK" => Ok(Modulation::Fsk),
            "FSK1" => Ok(Modulation::Fsk1),
            "FSK1a" => Ok(Modulation::Fsk1a),
            "FSK2" => Ok(Modulation::Fsk2),
            "FSK2a" => Ok(Modulation::Fsk2a),
            "ASK" => Ok(Modulation::Ask),
            "PSK1" => Ok(Modulation::Psk1),
            "PSK2" => Ok(Modulation::Psk2),
            "PSK3" => Ok(Modulation::Psk3),
            "NRZ" => Ok(Modulation::Nrz),
            "BI" => Ok(Modulation::Biphase),
            "BIa" => Ok(Modulation::BiphaseA),
            other => Err(format!("unknown modulation '{other}'")),
        }
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag-stored data bit rate, as the RF-carrier divisor.
///
/// A T55x7 word stores a 3-bit code into [`BitRate::TABLE`]; a Q5 word
/// stores any even divisor in 8..=128 as `(divisor - 2) / 2`, so the rate
/// is carried here as the divisor itself. The tag-stored rate must always
/// cross-check against the clock the frontend measured on the raw capture;
/// the validators enforce that.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitRate(u16);

impl BitRate {
    /// RF/divisor table indexed by the T55x7 rate code.
    pub const TABLE: [u16; 8] = [8, 16, 32, 40, 50, 64, 100, 128];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::TABLE.get(code as usize).map(|&d| Self(d))
    }

    /// A divisor from the T55x7 table.
    pub fn from_divisor(divisor: u16) -> Option<Self> {
        Self::TABLE.contains(&divisor).then_some(Self(divisor))
    }

    /// Any divisor a Q5 rate field can hold: even, 8..=128.
    pub fn from_q5_divisor(divisor: u16) -> Option<Self> {
        (divisor % 2 == 0 && (8..=128).contains(&divisor)).then_some(Self(divisor))
    }

    /// The 3-bit T55x7 rate code, when the divisor is a table rate.
    pub fn code(self) -> Option<u8> {
        Self::TABLE.iter().position(|&d| d == self.0).map(|i| i as u8)
    }

    pub fn divisor(self) -> u16 {
        self.0
    }
}

impl Default for BitRate {
    fn default() -> Self {
        Self(Self::TABLE[0])
    }
}

impl fmt::Display for BitRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{code} - RF/{}", self.0),
            None => write!(f, "RF/{}", self.0),
        }
    }
}

/// The active tag configuration: which chip variant produced the capture,
/// how its bits are keyed, and where the logical block starts in the
/// demodulated stream.
///
/// Owned by the session that drives the tag; refined by the hypothesis
/// scanner on a unique detection, or set explicitly by the operator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TagConfig {
    pub variant: ChipVariant,
    pub modulation: Modulation,
    pub bit_rate: BitRate,
    pub inverted: bool,
    /// Bit index 0..64 where the block begins, left over from framing
    /// ambiguity in the demodulator's sync recovery.
    pub offset: u8,
    /// Raw 32-bit configuration word as read at `offset`.
    pub block0: u32,
}

impl fmt::Display for TagConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chip Type  : {}", self.variant.as_str())?;
        writeln!(f, "Modulation : {}", self.modulation)?;
        writeln!(f, "Bit Rate   : {}", self.bit_rate)?;
        writeln!(f, "Inverted   : {}", if self.inverted { "Yes" } else { "No" })?;
        writeln!(f, "Offset     : {}", self.offset)?;
        write!(f, "Block0     : 0x{:08X}", self.block0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_code_divisor_roundtrip() {
        for code in 0u8..=7 {
            let r = BitRate::from_code(code).unwrap();
            assert_eq!(BitRate::from_divisor(r.divisor()), Some(r));
            assert_eq!(r.code(), Some(code));
        }
        assert_eq!(BitRate::from_code(8), None);
        assert_eq!(BitRate::from_divisor(33), None);
    }

    #[test]
    fn q5_rates_are_not_confined_to_the_table() {
        let r = BitRate::from_q5_divisor(10).unwrap();
        assert_eq!(r.divisor(), 10);
        assert_eq!(r.code(), None);
        assert_eq!(r.to_string(), "RF/10");
        assert_eq!(BitRate::from_divisor(10), None);

        assert_eq!(BitRate::from_q5_divisor(9), None);
        assert_eq!(BitRate::from_q5_divisor(6), None);
        assert_eq!(BitRate::from_q5_divisor(130), None);
    }

    #[test]
    fn default_config_matches_power_on_assumptions() {
        let c = TagConfig::default();
        assert_eq!(c.variant, ChipVariant::T55x7);
        assert_eq!(c.modulation, Modulation::Ask);
        assert!(!c.inverted);
        assert_eq!(c.offset, 0);
        assert_eq!(c.block0, 0);
    }
}
