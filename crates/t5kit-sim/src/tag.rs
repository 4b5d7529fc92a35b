// crates/t5kit-sim/src/tag.rs
//
// In-memory model of one tag: 8 blocks of page 0, 4 blocks of page 1 and a
// ground-truth keying. The tag synthesizes the bit stream a real read would
// demodulate, so every layer above the frontend is exercised for real.

use t5kit_core::decode::trace::trace_anchor;
use t5kit_core::{BitBuffer, ChipVariant, Modulation, TagConfig};

use crate::capture::{Capture, CaptureFamily};

/// Framing offset every synthesized stream uses.
pub const DEFAULT_OFFSET: u8 = 32;

const BLOCK_REPEATS: usize = 3;

pub struct SimTag {
    config: TagConfig,
    page0: [u32; 8],
    page1: [u32; 4],
    password: u32,
    protected: bool,
}

impl SimTag {
    /// Build a tag keyed per `config`. The polarity is normalized to the
    /// convention the keying implies (FSK1/FSK2a/BIPHASEa read inverted,
    /// their siblings do not, PSK2/PSK3 have none) and block 0 is
    /// synthesized to a structurally valid configuration word.
    pub fn new(mut config: TagConfig) -> Self {
        config.inverted = match config.modulation {
            Modulation::Fsk1 | Modulation::Fsk2a | Modulation::BiphaseA => true,
            Modulation::Fsk | Modulation::Fsk1a | Modulation::Fsk2 | Modulation::Biphase => false,
            Modulation::Psk2 | Modulation::Psk3 => false,
            _ => config.inverted,
        };
        if config.offset == 0 {
            config.offset = DEFAULT_OFFSET;
        }
        config.block0 = config_word(&config, false);

        let mut page0 = [0u32; 8];
        page0[0] = config.block0;
        let (block1, block2) = default_trace_blocks();
        Self {
            config,
            page0,
            page1: [block1, block2, 0, 0],
            password: 0,
            protected: false,
        }
    }

    /// Rebuild a tag from persisted state, trusting it as-is.
    pub fn with_state(
        config: TagConfig,
        page0: [u32; 8],
        page1: [u32; 4],
        password: u32,
        protected: bool,
    ) -> Self {
        Self { config, page0, page1, password, protected }
    }

    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    pub fn page0(&self) -> &[u32; 8] {
        &self.page0
    }

    pub fn page1(&self) -> &[u32; 4] {
        &self.page1
    }

    pub fn password(&self) -> u32 {
        self.password
    }

    pub fn protected(&self) -> bool {
        self.protected
    }

    /// Enable password mode: the password lands in page 0 block 7 and the
    /// configuration word gets the password safer key and the PWD bit.
    pub fn set_password(&mut self, password: u32) {
        self.password = password;
        self.protected = true;
        self.page0[7] = password;
        self.config.block0 = config_word(&self.config, true);
        self.page0[0] = self.config.block0;
    }

    pub fn set_block(&mut self, page1: bool, block: u8, value: u32) {
        if page1 {
            self.page1[block as usize] = value;
        } else {
            self.page0[block as usize] = value;
        }
    }

    pub fn set_trace_blocks(&mut self, block1: u32, block2: u32) {
        self.page1[0] = block1;
        self.page1[1] = block2;
    }

    /// Store one block write. A write to the page 0 configuration block
    /// re-keys the tag like the silicon would.
    pub fn store(&mut self, page1: bool, block: u8, value: u32) {
        self.set_block(page1, block, value);
        if !page1 && block == 0 {
            self.apply_config_word(value);
        }
        if !page1 && block == 7 && self.protected {
            self.password = value;
        }
    }

    /// Synthesize the capture one acquisition returns.
    pub fn capture_for(&self, page1: bool, block: u8, regular_read: bool) -> Capture {
        let stream = if regular_read {
            if page1 {
                self.page1_stream()
            } else {
                self.page0_stream()
            }
        } else if page1 {
            self.block_stream(self.page1[block as usize])
        } else {
            self.block_stream(self.page0[block as usize])
        };
        Capture::new(self.family(), self.config.bit_rate.divisor(), self.keyed(stream))
    }

    fn family(&self) -> CaptureFamily {
        match self.config.modulation {
            Modulation::Fsk | Modulation::Fsk1 | Modulation::Fsk1a => {
                CaptureFamily::Fsk { fc1: 8, fc2: 5 }
            }
            Modulation::Fsk2 | Modulation::Fsk2a => CaptureFamily::Fsk { fc1: 10, fc2: 8 },
            Modulation::Ask => CaptureFamily::Ask,
            Modulation::Psk1 | Modulation::Psk2 | Modulation::Psk3 => CaptureFamily::Psk,
            Modulation::Nrz => CaptureFamily::Nrz,
            Modulation::Biphase | Modulation::BiphaseA => CaptureFamily::Biphase,
        }
    }

    /// One addressed block repeats on the wire; the framing offset shifts
    /// where the first complete word lands.
    fn block_stream(&self, word: u32) -> BitBuffer {
        let offset = self.config.offset as usize;
        let mut bits = BitBuffer::zeroed(offset);
        for r in 0..BLOCK_REPEATS {
            bits.set_field(offset + 32 * r, 32, word);
        }
        bits
    }

    /// Page 0 regular-read stream: blocks 0..=7 back to back.
    fn page0_stream(&self) -> BitBuffer {
        let offset = self.config.offset as usize;
        let mut bits = BitBuffer::zeroed(offset);
        for (i, &word) in self.page0.iter().enumerate() {
            bits.set_field(offset + 32 * i, 32, word);
        }
        bits
    }

    /// Page 1 regular-read stream. The traceability pair lands where the
    /// trace decoder anchors for this offset, reproducing the framing
    /// artifact seen on hardware.
    fn page1_stream(&self) -> BitBuffer {
        let anchor = trace_anchor(self.config.offset as usize);
        let mut bits = BitBuffer::zeroed(anchor);
        bits.set_field(anchor, 32, self.page1[0]);
        bits.set_field(anchor + 32, 32, self.page1[1]);
        bits.set_field(anchor + 64, 8, 0);
        bits
    }

    /// Apply the keying the stream physically carries: PSK2/PSK3 words live
    /// in the transition domain and are integrated down to the PSK1 level
    /// stream the demodulator recovers; everything else is a straight
    /// polarity choice.
    fn keyed(&self, mut bits: BitBuffer) -> BitBuffer {
        match self.config.modulation {
            Modulation::Psk2 | Modulation::Psk3 => transitions_to_levels(&bits),
            _ => {
                if self.config.inverted {
                    bits.invert();
                }
                bits
            }
        }
    }

    /// Re-key from a freshly written configuration word, T55x7 layout. An
    /// unknown modulation code leaves the keying untouched, like a chip
    /// whose analog front stays in its last valid mode.
    fn apply_config_word(&mut self, word: u32) {
        self.config.block0 = word;
        if self.config.variant != ChipVariant::T55x7 {
            return;
        }
        let mut bits = BitBuffer::zeroed(32);
        bits.set_field(0, 32, word);

        let rate_code = bits.field_unchecked(11, 3) as u8;
        let mod_code = bits.field_unchecked(15, 5) as u8;
        self.protected = bits.field_unchecked(27, 1) == 1;

        if let Some(rate) = t5kit_core::BitRate::from_code(rate_code) {
            self.config.bit_rate = rate;
        }
        if let Some(modulation) = t55x7_modulation(mod_code) {
            self.config.modulation = modulation;
            self.config.inverted = matches!(
                modulation,
                Modulation::Fsk1 | Modulation::Fsk2a | Modulation::BiphaseA
            );
        }
    }
}

/// Synthesize a structurally valid configuration word for the keying.
fn config_word(config: &TagConfig, protected: bool) -> u32 {
    let mut w = BitBuffer::zeroed(32);
    match config.variant {
        ChipVariant::T55x7 => {
            if protected {
                w.set_field(0, 4, 6);
            }
            // A T55x7 word can only express table rates.
            w.set_field(11, 3, u32::from(config.bit_rate.code().unwrap_or(2)));
            w.set_field(15, 5, u32::from(t55x7_code(config.modulation)));
            w.set_field(24, 3, 7); // max block
            if protected {
                w.set_field(27, 1, 1);
            }
        }
        ChipVariant::Q5 => {
            w.set_field(0, 4, 6);
            let divisor = u32::from(config.bit_rate.divisor());
            w.set_field(14, 5, (divisor - 2) / 2);
            w.set_field(24, 3, u32::from(q5_code(config.modulation)));
            w.set_field(27, 3, 7); // max block
        }
    }
    w.field_unchecked(0, 32)
}

fn t55x7_code(modulation: Modulation) -> u8 {
    match modulation {
        Modulation::Nrz => 0,
        Modulation::Psk1 => 1,
        Modulation::Psk2 => 2,
        Modulation::Psk3 => 3,
        Modulation::Fsk | Modulation::Fsk1 => 4,
        Modulation::Fsk2 => 5,
        Modulation::Fsk1a => 6,
        Modulation::Fsk2a => 7,
        Modulation::Ask => 8,
        Modulation::Biphase => 0x10,
        Modulation::BiphaseA => 0x18,
    }
}

fn q5_code(modulation: Modulation) -> u8 {
    match modulation {
        Modulation::Ask => 0,
        Modulation::Psk1 => 1,
        Modulation::Psk2 => 2,
        Modulation::Psk3 => 3,
        Modulation::Fsk | Modulation::Fsk1 | Modulation::Fsk1a => 4,
        Modulation::Fsk2 | Modulation::Fsk2a => 5,
        // Q5 has no BIPHASEa code; fold it onto plain biphase.
        Modulation::Biphase | Modulation::BiphaseA => 6,
        Modulation::Nrz => 7,
    }
}

fn t55x7_modulation(code: u8) -> Option<Modulation> {
    Some(match code {
        0 => Modulation::Nrz,
        1 => Modulation::Psk1,
        2 => Modulation::Psk2,
        3 => Modulation::Psk3,
        4 => Modulation::Fsk1,
        5 => Modulation::Fsk2,
        6 => Modulation::Fsk1a,
        7 => Modulation::Fsk2a,
        8 => Modulation::Ask,
        0x10 => Modulation::Biphase,
        0x18 => Modulation::BiphaseA,
        _ => return None,
    })
}

/// Inverse of the PSK1 -> PSK2 transition transform: walk the transition
/// stream and toggle a level on each 1, starting low.
fn transitions_to_levels(bits: &BitBuffer) -> BitBuffer {
    let mut out = Vec::with_capacity(bits.len());
    let mut level = 0u8;
    for (i, &t) in bits.as_slice().iter().enumerate() {
        if i > 0 && t == 1 {
            level ^= 1;
        }
        out.push(level);
    }
    BitBuffer::from_bits(out)
}

/// A plausible Atmel traceability pair: ACL 0xE0, MFC 0x15 (Atmel),
/// CID 1 (ATA5577M1).
fn default_trace_blocks() -> (u32, u32) {
    let mut bits = BitBuffer::zeroed(64);
    let mut at = 0;
    let mut put = |len: usize, value: u32| {
        bits.set_field(at, len, value);
        at += len;
    };
    put(8, 0xE0);
    put(8, 0x15);
    put(5, 1);
    put(3, 1);
    put(4, 3); // year digit
    put(2, 2); // quarter
    put(14, 0x0ABC);
    put(5, 9);
    put(15, 0x1234);
    (bits.field_unchecked(0, 32), bits.field_unchecked(32, 32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use t5kit_core::BitRate;

    fn ask_config() -> TagConfig {
        TagConfig {
            modulation: Modulation::Ask,
            bit_rate: BitRate::from_divisor(32).unwrap(),
            ..TagConfig::default()
        }
    }

    #[test]
    fn block0_word_round_trips_through_the_info_decoder() {
        let tag = SimTag::new(ask_config());
        let mut bits = BitBuffer::zeroed(32);
        bits.set_field(0, 32, tag.config().block0);
        let cb = t5kit_core::decode::info::decode_config_block(&bits, 0).unwrap();
        assert_eq!(cb.data_rate_code, 2);
        assert_eq!(cb.modulation_code, 8);
        assert_eq!(cb.max_block, 7);
        assert!(!cb.password_mode);
    }

    #[test]
    fn password_mode_sets_safer_and_pwd_bit() {
        let mut tag = SimTag::new(ask_config());
        tag.set_password(0xDEAD_BEEF);
        let mut bits = BitBuffer::zeroed(32);
        bits.set_field(0, 32, tag.config().block0);
        let cb = t5kit_core::decode::info::decode_config_block(&bits, 0).unwrap();
        assert_eq!(cb.safer, 6);
        assert!(cb.password_mode);
        assert_eq!(tag.page0()[7], 0xDEAD_BEEF);
    }

    #[test]
    fn writing_block0_rekeys_the_tag() {
        let mut tag = SimTag::new(ask_config());
        let mut w = BitBuffer::zeroed(32);
        w.set_field(11, 3, 4); // RF/50
        w.set_field(15, 5, 0); // NRZ
        tag.store(false, 0, w.field_unchecked(0, 32));
        assert_eq!(tag.config().modulation, Modulation::Nrz);
        assert_eq!(tag.config().bit_rate.divisor(), 50);
    }

    #[test]
    fn polarity_is_normalized_per_keying() {
        let mut c = ask_config();
        c.modulation = Modulation::Fsk1;
        c.bit_rate = BitRate::from_divisor(50).unwrap();
        assert!(SimTag::new(c).config().inverted);
        c.modulation = Modulation::Fsk1a;
        assert!(!SimTag::new(c).config().inverted);
    }
}
