// crates/t5kit-core/src/device.rs
//
// Contract with the reader hardware. Every exchange is request/bounded-wait/
// response; a missed deadline surfaces as a timeout error and is never
// retried at this layer.

use crate::error::Result;

/// Block number of the configuration word on page 0.
pub const CONFIG_BLOCK: u8 = 0;

/// Pseudo block number selecting the continuous regular-read stream instead
/// of one addressed block.
pub const REGULAR_READ_MODE_BLOCK: u8 = 0xFF;

/// Memory page selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Page {
    Zero,
    One,
}

impl Page {
    pub fn number(self) -> u8 {
        match self {
            Page::Zero => 0,
            Page::One => 1,
        }
    }
}

/// One block write, password included when the tag is in password mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WriteRequest {
    pub page: Page,
    pub block: u8,
    pub data: u32,
    pub password: Option<u32>,
}

/// The physical reader. `acquire` powers the field, reads the requested
/// block (or the regular-read stream) and returns the raw sample capture;
/// it fails with `AcquisitionTimeout` when the device stays silent.
pub trait TagDevice {
    fn acquire(&mut self, page: Page, block: u8, password: Option<u32>) -> Result<Vec<u8>>;

    /// Bounded-wait write; a missing ack is `WriteNotAcknowledged`.
    fn write_block(&mut self, request: &WriteRequest) -> Result<()>;

    /// Fire-and-forget AOR wakeup; leaves the reader field energized.
    fn wakeup(&mut self, password: u32) -> Result<()>;

    /// Send the reset command, then sample the ensuing stream.
    fn reset_read(&mut self) -> Result<Vec<u8>>;
}
