pub mod capture;
pub mod device;
pub mod frontend;
pub mod tag;

pub use crate::capture::{Capture, CaptureError, CaptureFamily};
pub use crate::device::SimDevice;
pub use crate::frontend::SimFrontend;
pub use crate::tag::{SimTag, DEFAULT_OFFSET};
