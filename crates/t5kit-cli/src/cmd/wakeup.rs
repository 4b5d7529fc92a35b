// crates/t5kit-cli/src/cmd/wakeup.rs

use anyhow::Result;
use clap::Args;
use t5kit_core::DetectionResult;

#[derive(Args, Debug)]
pub struct WakeupArgs {
    /// Simulated tag file (.t5s)
    #[arg(long)]
    pub tag: String,

    /// AOR password (hex or decimal)
    #[arg(long)]
    pub password: String,
}

pub fn run(args: WakeupArgs) -> Result<()> {
    let mut session = super::open_session(&args.tag)?;
    session.wakeup(super::parse_u32(&args.password)?)?;
    eprintln!("wakeup sent, field stays energized");

    // One detection pass tells whether the tag answered.
    match session.detect(None)? {
        DetectionResult::Unique(config) => {
            eprintln!("tag is awake:");
            eprintln!("{config}");
        }
        _ => eprintln!("tag did not answer; wrong password or no AOR tag in the field"),
    }
    Ok(())
}
