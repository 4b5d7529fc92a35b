// crates/t5kit-sim/src/device.rs
//
// Simulated reader. Deterministic by construction: forced failures are
// injected per block, and the noise a confused tag answers with comes from a
// seeded generator, never the OS.

use std::collections::HashSet;

use t5kit_core::device::REGULAR_READ_MODE_BLOCK;
use t5kit_core::{Page, Result, T5Error, TagDevice, WriteRequest};

use crate::capture::SETTLE_LEN;
use crate::tag::SimTag;

const NOISE_LEN: usize = 256;

pub struct SimDevice {
    tag: SimTag,
    forced_timeouts: HashSet<(u8, u8)>,
    forced_write_failures: HashSet<(u8, u8)>,
    risky_reads: u32,
    awake: bool,
    noise_seed: u64,
}

impl SimDevice {
    pub fn new(tag: SimTag) -> Self {
        Self {
            tag,
            forced_timeouts: HashSet::new(),
            forced_write_failures: HashSet::new(),
            risky_reads: 0,
            awake: false,
            noise_seed: 0x5EED_0F0F_1234_5678,
        }
    }

    pub fn tag(&self) -> &SimTag {
        &self.tag
    }

    pub fn tag_mut(&mut self) -> &mut SimTag {
        &mut self.tag
    }

    /// Make the next acquisitions of this block time out.
    pub fn force_timeout(&mut self, page: Page, block: u8) {
        self.forced_timeouts.insert((page.number(), block));
    }

    /// Make writes to this block lose their ack.
    pub fn force_write_failure(&mut self, page: Page, block: u8) {
        self.forced_write_failures.insert((page.number(), block));
    }

    /// Number of acquisitions that sent a password to a tag whose password
    /// bit is clear. The safety protocol exists to keep this at zero.
    pub fn risky_reads(&self) -> u32 {
        self.risky_reads
    }

    /// A capture-shaped burst with no parseable container in it. High bit
    /// forced so no byte can alias the capture magic.
    fn noise(&mut self) -> Vec<u8> {
        let mut out = vec![0u8; SETTLE_LEN];
        for _ in 0..NOISE_LEN {
            self.noise_seed = self
                .noise_seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            out.push((self.noise_seed >> 56) as u8 | 0x80);
        }
        out
    }
}

impl TagDevice for SimDevice {
    fn acquire(&mut self, page: Page, block: u8, password: Option<u32>) -> Result<Vec<u8>> {
        if self.forced_timeouts.contains(&(page.number(), block)) {
            return Err(T5Error::AcquisitionTimeout);
        }
        let page1 = page == Page::One;
        let regular = block == REGULAR_READ_MODE_BLOCK;
        if page1 && !regular && block > 3 {
            return Err(T5Error::BlockOutOfRange(block));
        }

        match password {
            Some(p) => {
                if !self.tag.protected() {
                    // The dangerous case: password reference bits sent at a
                    // tag that treats them as data. The stream comes back
                    // garbled.
                    self.risky_reads += 1;
                    return Ok(self.noise());
                }
                if p != self.tag.password() {
                    return Ok(self.noise());
                }
            }
            None => {
                if self.tag.protected() && !self.awake {
                    return Ok(self.noise());
                }
            }
        }

        Ok(self.tag.capture_for(page1, block, regular).encode())
    }

    fn write_block(&mut self, request: &WriteRequest) -> Result<()> {
        let key = (request.page.number(), request.block);
        if self.forced_write_failures.contains(&key) {
            return Err(T5Error::WriteNotAcknowledged);
        }
        let page1 = request.page == Page::One;
        if page1 && request.block > 3 {
            return Err(T5Error::BlockOutOfRange(request.block));
        }
        if self.tag.protected() && request.password != Some(self.tag.password()) {
            return Err(T5Error::WriteNotAcknowledged);
        }
        self.tag.store(page1, request.block, request.data);
        Ok(())
    }

    fn wakeup(&mut self, password: u32) -> Result<()> {
        // Fire and forget: a wrong password is simply ignored by the tag.
        if self.tag.protected() && password == self.tag.password() {
            self.awake = true;
        }
        Ok(())
    }

    fn reset_read(&mut self) -> Result<Vec<u8>> {
        if self.tag.protected() && !self.awake {
            return Ok(self.noise());
        }
        Ok(self.tag.capture_for(false, REGULAR_READ_MODE_BLOCK, true).encode())
    }
}
