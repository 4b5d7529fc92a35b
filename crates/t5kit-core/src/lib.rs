pub mod bits;
pub mod config;
pub mod decode;
pub mod demod;
pub mod detect;
pub mod device;
pub mod error;
pub mod layout;
pub mod session;

pub use crate::bits::BitBuffer;
pub use crate::config::{BitRate, ChipVariant, Modulation, TagConfig};
pub use crate::detect::{CandidateMatch, DetectionResult};
pub use crate::device::{Page, TagDevice, WriteRequest};
pub use crate::error::{Result, T5Error};
pub use crate::session::Session;
