// crates/t5kit-cli/src/cmd/write.rs

use anyhow::Result;
use clap::Args;
use t5kit_core::{Page, WriteRequest};

use crate::io::tag_file;

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Simulated tag file (.t5s)
    #[arg(long)]
    pub tag: String,

    /// Block number 0..=7
    #[arg(long)]
    pub block: u8,

    /// 32-bit block data (hex or decimal)
    #[arg(long)]
    pub data: String,

    /// Write to page 1 instead of page 0
    #[arg(long, default_value_t = false)]
    pub page1: bool,

    /// Password (hex or decimal)
    #[arg(long)]
    pub password: Option<String>,
}

pub fn run(args: WriteArgs) -> Result<()> {
    let mut session = super::open_session(&args.tag)?;
    let request = WriteRequest {
        page: if args.page1 { Page::One } else { Page::Zero },
        block: args.block,
        data: super::parse_u32(&args.data)?,
        password: super::parse_password(args.password.as_deref())?,
    };
    session.write_block(&request)?;
    tag_file::save_tag(&args.tag, session.device_mut().tag())?;

    eprintln!(
        "wrote page {} block {:02} = 0x{:08X}",
        request.page.number(),
        request.block,
        request.data
    );
    Ok(())
}
