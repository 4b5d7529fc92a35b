// crates/t5kit-cli/src/main.rs

use clap::{Parser, Subcommand};

mod cmd;
mod io;

#[derive(Parser)]
#[command(name = "t5kit-cli")]
#[command(about = "T55x7 / T5555(Q5) LF tag toolkit", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print or update a persisted tag configuration (.t5c)
    Config(cmd::config::ConfigArgs),

    /// Detect modulation, rate, polarity and offset from a tag or capture
    Detect(cmd::detect::DetectArgs),

    /// Decode and print the page 0 configuration block fields
    Info(cmd::info::InfoArgs),

    /// Decode and print the page 1 traceability data
    Trace(cmd::trace::TraceArgs),

    /// Sweep all framing offsets over a block capture
    Offsets(cmd::offsets::OffsetsArgs),

    /// Read one block
    Read(cmd::read::ReadArgs),

    /// Write one block
    Write(cmd::write::WriteArgs),

    /// Dump all 8 + 4 blocks
    Dump(cmd::dump::DumpArgs),

    /// Send an AOR wakeup with a password
    Wakeup(cmd::wakeup::WakeupArgs),

    /// Reset the read head and scan the ensuing stream
    Resetread(cmd::resetread::ResetreadArgs),

    /// Restore factory defaults
    Wipe(cmd::wipe::WipeArgs),

    /// Simulated tag tools (.t5s)
    Sim(cmd::sim_tag::SimArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Config(args) => cmd::config::run(args),
        Commands::Detect(args) => cmd::detect::run(args),
        Commands::Info(args) => cmd::info::run(args),
        Commands::Trace(args) => cmd::trace::run(args),
        Commands::Offsets(args) => cmd::offsets::run(args),
        Commands::Read(args) => cmd::read::run(args),
        Commands::Write(args) => cmd::write::run(args),
        Commands::Dump(args) => cmd::dump::run(args),
        Commands::Wakeup(args) => cmd::wakeup::run(args),
        Commands::Resetread(args) => cmd::resetread::run(args),
        Commands::Wipe(args) => cmd::wipe::run(args),
        Commands::Sim(args) => cmd::sim_tag::run(args),
    }
}
