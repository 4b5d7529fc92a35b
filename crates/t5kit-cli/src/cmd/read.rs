// crates/t5kit-cli/src/cmd/read.rs

use anyhow::Result;
use clap::Args;
use t5kit_core::Page;

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Simulated tag file (.t5s)
    #[arg(long)]
    pub tag: String,

    /// Block number 0..=7
    #[arg(long)]
    pub block: u8,

    /// Read from page 1 instead of page 0
    #[arg(long, default_value_t = false)]
    pub page1: bool,

    /// Password (hex or decimal)
    #[arg(long)]
    pub password: Option<String>,

    /// Skip the password safety check
    #[arg(long, default_value_t = false)]
    pub r#override: bool,

    /// Use this .t5c configuration instead of detecting
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run(args: ReadArgs) -> Result<()> {
    let mut session = super::open_session(&args.tag)?;
    super::establish_config(&mut session, args.config.as_deref())?;

    let page = if args.page1 { Page::One } else { Page::Zero };
    let password = super::parse_password(args.password.as_deref())?;
    let out = session.read_block(page, args.block, password, args.r#override)?;

    eprintln!("--- page {} ---", out.page.number());
    super::print_block_header();
    super::print_block_row(out.block, out.value, &out.binary);
    Ok(())
}
