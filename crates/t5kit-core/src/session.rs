// crates/t5kit-core/src/session.rs
//
// Read/write orchestration against one tag. The session is the single owner
// of the active configuration, the last raw capture and the last demodulated
// bit buffer; every operation runs to completion before the next starts, so
// no interleaving ever touches these in flight.

use crate::bits::BitBuffer;
use crate::config::TagConfig;
use crate::decode::info::{decode_config_block, ConfigBlock};
use crate::decode::trace::{decode_traceability, TraceData};
use crate::decode::{block_value, decode_block};
use crate::demod::DemodFrontend;
use crate::detect::{detect, DetectionResult};
use crate::device::{Page, TagDevice, WriteRequest, CONFIG_BLOCK, REGULAR_READ_MODE_BLOCK};
use crate::error::{Result, T5Error};

/// Default block 0 content restored by a wipe.
pub const WIPE_CONFIG_WORD: u32 = 0x0008_8040;

/// One successfully read block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadOutcome {
    pub page: Page,
    pub block: u8,
    pub value: u32,
    /// The 32 block bits as a '0'/'1' string, for operator tables.
    pub binary: String,
}

#[derive(Debug)]
pub struct DumpEntry {
    pub page: Page,
    pub block: u8,
    pub outcome: Result<ReadOutcome>,
}

/// Result of a full-card dump: 8 blocks of page 0 followed by 4 blocks of
/// page 1. Per-block failures are recorded, never propagated to siblings.
#[derive(Debug, Default)]
pub struct DumpReport {
    pub entries: Vec<DumpEntry>,
}

impl DumpReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_ok()).count()
    }
}

pub struct Session<D, F> {
    device: D,
    frontend: F,
    config: TagConfig,
    samples: Vec<u8>,
    bits: BitBuffer,
}

impl<D: TagDevice, F: DemodFrontend> Session<D, F> {
    pub fn new(device: D, frontend: F) -> Self {
        Self {
            device,
            frontend,
            config: TagConfig::default(),
            samples: Vec::new(),
            bits: BitBuffer::new(),
        }
    }

    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TagConfig) {
        self.config = config;
    }

    pub fn held_bits(&self) -> &BitBuffer {
        &self.bits
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Acquire one block capture into the session.
    pub fn acquire(&mut self, page: Page, block: u8, password: Option<u32>) -> Result<()> {
        self.samples = self.device.acquire(page, block, password)?;
        Ok(())
    }

    /// Acquire the configuration block and scan it for the tag's modulation.
    pub fn detect(&mut self, password: Option<u32>) -> Result<DetectionResult> {
        self.acquire(Page::Zero, CONFIG_BLOCK, password)?;
        Ok(self.detect_held())
    }

    /// Scan the capture already held by the session. A unique survivor is
    /// committed as the active configuration; ambiguity is handed back
    /// untouched for the operator to resolve.
    pub fn detect_held(&mut self) -> DetectionResult {
        let result = detect(&self.frontend, &self.samples);
        if let DetectionResult::Unique(config) = &result {
            self.config = *config;
        }
        result
    }

    /// Read one block, honoring the password safety protocol.
    ///
    /// A password read against a tag whose password bit is clear can damage
    /// the tag, so unless `override_safety` is set the session first reads
    /// the configuration block without a password and checks the bit: a
    /// failed detection aborts (the risk cannot be assessed), and a clear
    /// bit silently downgrades to an ordinary page 0 read.
    pub fn read_block(
        &mut self,
        page: Page,
        block: u8,
        password: Option<u32>,
        override_safety: bool,
    ) -> Result<ReadOutcome> {
        if block > 7 && block != REGULAR_READ_MODE_BLOCK {
            return Err(T5Error::BlockOutOfRange(block));
        }

        let mut page = page;
        let mut password = password;

        if password.is_some() && !override_safety {
            self.acquire(Page::Zero, CONFIG_BLOCK, None)?;
            match self.detect_held() {
                DetectionResult::Unique(_) => {
                    let bits = decode_block(&self.frontend, &self.samples, &self.config)?;
                    let info = decode_config_block(&bits, self.config.offset as usize)?;
                    if !info.password_mode {
                        password = None;
                        page = Page::Zero;
                    }
                }
                _ => {
                    return Err(T5Error::SafetyCheckFailed(
                        "could not detect whether the password bit is set in the config block",
                    ))
                }
            }
        }

        self.acquire(page, block, password)?;
        self.bits = decode_block(&self.frontend, &self.samples, &self.config)?;

        let offset = self.config.offset as usize;
        let value = block_value(&self.bits, offset)?;
        Ok(ReadOutcome {
            page,
            block,
            value,
            binary: self.bits.bin_string(offset, 32),
        })
    }

    /// Write one block. No safety pre-check: writes trust the caller's
    /// password claim (historical asymmetry with reads). The bounded ack
    /// wait lives in the device; a timeout is final, never retried.
    pub fn write_block(&mut self, request: &WriteRequest) -> Result<()> {
        if request.block > 7 {
            return Err(T5Error::BlockOutOfRange(request.block));
        }
        self.device.write_block(request)
    }

    /// Dump all 8 blocks of page 0 and all 4 of page 1, tolerating
    /// per-block failures.
    pub fn dump(&mut self, password: Option<u32>, override_safety: bool) -> DumpReport {
        let mut report = DumpReport::default();
        for block in 0..8 {
            let outcome = self.read_block(Page::Zero, block, password, override_safety);
            report.entries.push(DumpEntry { page: Page::Zero, block, outcome });
        }
        for block in 0..4 {
            let outcome = self.read_block(Page::One, block, password, override_safety);
            report.entries.push(DumpEntry { page: Page::One, block, outcome });
        }
        report
    }

    /// Decode the configuration block fields. Acquires a fresh capture
    /// unless `from_held` reuses the one already in the session.
    pub fn read_info(&mut self, from_held: bool) -> Result<ConfigBlock> {
        if !from_held {
            self.acquire(Page::Zero, CONFIG_BLOCK, None)?;
        }
        self.bits = decode_block(&self.frontend, &self.samples, &self.config)?;
        decode_config_block(&self.bits, self.config.offset as usize)
    }

    /// Decode the page 1 traceability blocks.
    pub fn read_trace(&mut self, from_held: bool, current_year: u16) -> Result<TraceData> {
        if !from_held {
            self.acquire(Page::One, REGULAR_READ_MODE_BLOCK, None)?;
        }
        self.bits = decode_block(&self.frontend, &self.samples, &self.config)?;
        decode_traceability(&self.bits, self.config.offset as usize, current_year)
    }

    /// Send the AOR wakeup and leave the field energized.
    pub fn wakeup(&mut self, password: u32) -> Result<()> {
        self.device.wakeup(password)
    }

    /// Reset the tag's read head and capture the ensuing stream.
    pub fn reset_read(&mut self) -> Result<()> {
        self.samples = self.device.reset_read()?;
        Ok(())
    }

    /// Restore factory defaults: the stock config word into block 0 (with
    /// the blank password, which works whether or not the password bit is
    /// set), then zero blocks 1-7. Per-block failures are reported, not
    /// fatal.
    pub fn wipe(&mut self) -> Vec<(u8, Result<()>)> {
        let mut results = Vec::with_capacity(8);

        let req = WriteRequest {
            page: Page::Zero,
            block: 0,
            data: WIPE_CONFIG_WORD,
            password: Some(0),
        };
        results.push((0, self.write_block(&req)));

        for block in 1..8 {
            let req = WriteRequest { page: Page::Zero, block, data: 0, password: None };
            results.push((block, self.write_block(&req)));
        }
        results
    }
}
