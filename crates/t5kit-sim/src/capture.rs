// crates/t5kit-sim/src/capture.rs
//
// Binary container for one simulated antenna capture. A capture is what the
// simulated reader hands back from an acquisition and what the simulated
// frontend demodulates; it can also be written to disk and replayed.
//
// Layout:
// settle[160]          zero bytes, the antenna settle transient
// MAGIC[4]             b"LFC1"
// version:u8
// family:u8
// fc1:u8 fc2:u8        zero unless family is FSK
// clock:u16            RF divisor measured on the carrier (little-endian)
// bit_count:u32        little-endian
// bits[]               MSB-first packed bit stream
// crc32:u32            over MAGIC..bits, little-endian
//
// Decoding scans for the magic instead of assuming a fixed position, so a
// capture stays parseable after the settle prefix has been trimmed off.

use t5kit_core::BitBuffer;
use thiserror::Error;

/// Length of the settle transient prefixed to every capture.
pub const SETTLE_LEN: usize = 160;

const MAGIC: &[u8; 4] = b"LFC1";
const VERSION: u8 = 1;
const MAGIC_SCAN_WINDOW: usize = 512;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CaptureError {
    #[error("no capture magic found")]
    BadMagic,
    #[error("unsupported capture version {0}")]
    UnsupportedVersion(u8),
    #[error("unknown modulation family code {0}")]
    UnknownFamily(u8),
    #[error("capture truncated: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },
    #[error("capture crc mismatch")]
    CrcMismatch,
}

/// Modulation family the capture was keyed with. The frontend only answers
/// clock queries and demod requests for the matching family.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CaptureFamily {
    Ask,
    Fsk { fc1: u8, fc2: u8 },
    Psk,
    Nrz,
    Biphase,
}

impl CaptureFamily {
    fn code(self) -> u8 {
        match self {
            CaptureFamily::Ask => 0,
            CaptureFamily::Fsk { .. } => 1,
            CaptureFamily::Psk => 2,
            CaptureFamily::Nrz => 3,
            CaptureFamily::Biphase => 4,
        }
    }

    fn field_clocks(self) -> (u8, u8) {
        match self {
            CaptureFamily::Fsk { fc1, fc2 } => (fc1, fc2),
            _ => (0, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    pub family: CaptureFamily,
    pub clock: u16,
    pub bits: BitBuffer,
}

impl Capture {
    pub fn new(family: CaptureFamily, clock: u16, bits: BitBuffer) -> Self {
        Self { family, clock, bits }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; SETTLE_LEN];
        out.extend_from_slice(MAGIC);
        out.push(VERSION);
        out.push(self.family.code());
        let (fc1, fc2) = self.family.field_clocks();
        out.push(fc1);
        out.push(fc2);
        out.extend_from_slice(&self.clock.to_le_bytes());
        out.extend_from_slice(&(self.bits.len() as u32).to_le_bytes());
        out.extend_from_slice(&pack_bits(self.bits.as_slice()));

        let crc = crc32fast::hash(&out[SETTLE_LEN..]);
        out.extend_from_slice(&crc.to_le_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CaptureError> {
        let at = bytes
            .windows(MAGIC.len())
            .take(MAGIC_SCAN_WINDOW)
            .position(|w| w == MAGIC)
            .ok_or(CaptureError::BadMagic)?;
        let mut i = at + MAGIC.len();

        let version = read_u8(bytes, &mut i)?;
        if version != VERSION {
            return Err(CaptureError::UnsupportedVersion(version));
        }

        let family_code = read_u8(bytes, &mut i)?;
        let fc1 = read_u8(bytes, &mut i)?;
        let fc2 = read_u8(bytes, &mut i)?;
        let family = match family_code {
            0 => CaptureFamily::Ask,
            1 => CaptureFamily::Fsk { fc1, fc2 },
            2 => CaptureFamily::Psk,
            3 => CaptureFamily::Nrz,
            4 => CaptureFamily::Biphase,
            other => return Err(CaptureError::UnknownFamily(other)),
        };

        let clock = read_u16(bytes, &mut i)?;
        let bit_count = read_u32(bytes, &mut i)? as usize;
        let packed_len = (bit_count + 7) / 8;
        need(bytes, i, packed_len)?;
        let bits = unpack_bits(&bytes[i..i + packed_len], bit_count);
        i += packed_len;

        let crc_expected = read_u32(bytes, &mut i)?;
        let crc_actual = crc32fast::hash(&bytes[at..i - 4]);
        if crc_expected != crc_actual {
            return Err(CaptureError::CrcMismatch);
        }

        Ok(Self { family, clock, bits: BitBuffer::from_bits(bits) })
    }
}

/// Pack a 0/1 bit vector MSB-first: the first bit becomes the MSB of
/// output[0], bits flow left to right byte by byte.
pub fn pack_bits(bits: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; (bits.len() + 7) / 8];
    for (cursor, &bit) in bits.iter().enumerate() {
        if bit & 1 == 1 {
            out[cursor / 8] |= 1u8 << (7 - cursor % 8);
        }
    }
    out
}

/// Inverse of [`pack_bits`] for the same bit count.
pub fn unpack_bits(packed: &[u8], bit_count: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(bit_count);
    for cursor in 0..bit_count {
        out.push((packed[cursor / 8] >> (7 - cursor % 8)) & 1);
    }
    out
}

fn need(bytes: &[u8], i: usize, n: usize) -> Result<(), CaptureError> {
    if bytes.len() < i + n {
        return Err(CaptureError::Truncated { need: i + n, have: bytes.len() });
    }
    Ok(())
}

fn read_u8(bytes: &[u8], i: &mut usize) -> Result<u8, CaptureError> {
    need(bytes, *i, 1)?;
    let v = bytes[*i];
    *i += 1;
    Ok(v)
}

fn read_u16(bytes: &[u8], i: &mut usize) -> Result<u16, CaptureError> {
    need(bytes, *i, 2)?;
    let v = u16::from_le_bytes(bytes[*i..*i + 2].try_into().unwrap());
    *i += 2;
    Ok(v)
}

fn read_u32(bytes: &[u8], i: &mut usize) -> Result<u32, CaptureError> {
    need(bytes, *i, 4)?;
    let v = u32::from_le_bytes(bytes[*i..*i + 4].try_into().unwrap());
    *i += 4;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_is_msb_first() {
        let bits = vec![1, 0, 1, 1, 0, 0, 0, 1, 1];
        let packed = pack_bits(&bits);
        assert_eq!(packed, vec![0xB1, 0x80]);
        assert_eq!(unpack_bits(&packed, bits.len()), bits);
    }

    #[test]
    fn magic_is_found_after_settle_trim() {
        let capture = Capture::new(
            CaptureFamily::Psk,
            32,
            BitBuffer::from_bits(vec![1, 0, 1]),
        );
        let bytes = capture.encode();
        assert_eq!(Capture::decode(&bytes), Ok(capture.clone()));
        assert_eq!(Capture::decode(&bytes[SETTLE_LEN..]), Ok(capture));
    }
}
