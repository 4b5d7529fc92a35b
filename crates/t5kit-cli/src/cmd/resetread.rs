// crates/t5kit-cli/src/cmd/resetread.rs

use anyhow::Result;
use clap::Args;
use t5kit_core::DetectionResult;

#[derive(Args, Debug)]
pub struct ResetreadArgs {
    /// Simulated tag file (.t5s)
    #[arg(long)]
    pub tag: String,
}

pub fn run(args: ResetreadArgs) -> Result<()> {
    let mut session = super::open_session(&args.tag)?;
    session.reset_read()?;
    eprintln!("read head reset, regular-read stream captured");

    // The stream starts at block 0, so a plain scan tells whether the tag
    // answered and with what keying.
    match session.detect_held() {
        DetectionResult::Unique(config) => {
            eprintln!("stream decodes as:");
            eprintln!("{config}");
        }
        _ => eprintln!("stream did not decode; tag silent or modulation unknown"),
    }
    Ok(())
}
