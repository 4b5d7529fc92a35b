// crates/t5kit-cli/src/io/capture_file.rs

use anyhow::{Context, Result};
use t5kit_sim::Capture;

/// Save raw capture bytes as a .lfc file.
pub fn save_capture(path: &str, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("write capture {path}"))
}

/// Load a .lfc capture, verifying the container parses before handing the
/// raw bytes on.
pub fn load_capture(path: &str) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).with_context(|| format!("read capture {path}"))?;
    Capture::decode(&bytes).map_err(|e| anyhow::anyhow!("{path}: {e}"))?;
    Ok(bytes)
}
