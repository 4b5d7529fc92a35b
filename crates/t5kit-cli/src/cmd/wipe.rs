// crates/t5kit-cli/src/cmd/wipe.rs

use anyhow::Result;
use clap::Args;

use crate::io::tag_file;

#[derive(Args, Debug)]
pub struct WipeArgs {
    /// Simulated tag file (.t5s)
    #[arg(long)]
    pub tag: String,
}

pub fn run(args: WipeArgs) -> Result<()> {
    let mut session = super::open_session(&args.tag)?;

    eprintln!("--- wipe ---");
    let results = session.wipe();
    let mut failed = 0usize;
    for (block, outcome) in &results {
        match outcome {
            Ok(()) => eprintln!(" block {block:02} : ok"),
            Err(e) => {
                eprintln!(" block {block:02} : FAILED ({e})");
                failed += 1;
            }
        }
    }
    tag_file::save_tag(&args.tag, session.device_mut().tag())?;

    if failed == 0 {
        eprintln!("tag restored to factory defaults");
    } else {
        eprintln!("{failed} block(s) failed; tag state may be partial");
    }
    Ok(())
}
