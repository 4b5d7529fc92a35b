// crates/t5kit-cli/src/io/mod.rs

pub mod capture_file;
pub mod config_file;
pub mod tag_file;
