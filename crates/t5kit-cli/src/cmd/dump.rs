// crates/t5kit-cli/src/cmd/dump.rs

use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Simulated tag file (.t5s)
    #[arg(long)]
    pub tag: String,

    /// Password (hex or decimal)
    #[arg(long)]
    pub password: Option<String>,

    /// Skip the password safety check
    #[arg(long, default_value_t = false)]
    pub r#override: bool,

    /// Use this .t5c configuration instead of detecting
    #[arg(long)]
    pub config: Option<String>,

    /// Write the 12 block values to a raw binary file (full dumps only)
    #[arg(long)]
    pub out: Option<String>,
}

pub fn run(args: DumpArgs) -> Result<()> {
    let mut session = super::open_session(&args.tag)?;
    super::establish_config(&mut session, args.config.as_deref())?;

    let password = super::parse_password(args.password.as_deref())?;
    let report = session.dump(password, args.r#override);

    let mut last_page = None;
    for entry in &report.entries {
        if last_page != Some(entry.page) {
            eprintln!("--- page {} ---", entry.page.number());
            super::print_block_header();
            last_page = Some(entry.page);
        }
        match &entry.outcome {
            Ok(out) => super::print_block_row(out.block, out.value, &out.binary),
            Err(e) => eprintln!("  {:02} | <no response: {e}>", entry.block),
        }
    }
    eprintln!("{}/{} blocks read", report.succeeded(), report.entries.len());

    if let Some(path) = &args.out {
        if report.succeeded() == report.entries.len() {
            let mut bytes = Vec::with_capacity(48);
            for entry in &report.entries {
                if let Ok(out) = &entry.outcome {
                    bytes.extend_from_slice(&out.value.to_le_bytes());
                }
            }
            std::fs::write(path, bytes)?;
            eprintln!("saved      : {path}");
        } else {
            eprintln!("not saving {path}: dump is incomplete");
        }
    }
    Ok(())
}
