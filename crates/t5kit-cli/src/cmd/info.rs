// crates/t5kit-cli/src/cmd/info.rs

use anyhow::{bail, Result};
use clap::Args;
use t5kit_core::decode::info::{decode_config_block, ConfigBlock};
use t5kit_core::decode::decode_block;
use t5kit_sim::SimFrontend;

use crate::io::{capture_file, config_file};

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Simulated tag file (.t5s)
    #[arg(long)]
    pub tag: Option<String>,

    /// Existing capture file (.lfc) to decode instead of acquiring
    #[arg(long)]
    pub r#in: Option<String>,

    /// Use this .t5c configuration instead of detecting
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let info = match (&args.tag, &args.r#in) {
        (Some(tag_path), None) => {
            let mut session = super::open_session(tag_path)?;
            super::establish_config(&mut session, args.config.as_deref())?;
            session.read_info(false)?
        }
        (None, Some(capture_path)) => {
            let Some(config_path) = &args.config else {
                bail!("--in needs --config to know the keying and offset");
            };
            let config = config_file::load_config(config_path)?;
            let samples = capture_file::load_capture(capture_path)?;
            let bits = decode_block(&SimFrontend::new(), &samples, &config)?;
            decode_config_block(&bits, config.offset as usize)?
        }
        _ => bail!("pass exactly one of --tag or --in"),
    };

    print_info(&info);
    Ok(())
}

fn yes_no(v: bool) -> &'static str {
    if v {
        "Yes"
    } else {
        "No"
    }
}

fn print_info(cb: &ConfigBlock) {
    let rate = match cb.data_rate() {
        Some(r) => format!("{r}"),
        None => format!("{} (non-standard)", cb.data_rate_code),
    };
    eprintln!("--- configuration & tag information ---");
    eprintln!(" Safer key                 : {}", cb.safer_str());
    eprintln!(" reserved                  : {}", cb.reserved);
    eprintln!(" data bit rate             : {rate}");
    eprintln!(" eXtended mode             : {}", yes_no(cb.extended));
    eprintln!(" modulation                : {}", cb.modulation_str());
    eprintln!(" PSK clock frequency       : {}", cb.psk_clock);
    eprintln!(" AOR - answer on request   : {}", yes_no(cb.answer_on_request));
    eprintln!(" OTP - one time pad        : {}", yes_no(cb.one_time_pad));
    eprintln!(" max block                 : {}", cb.max_block);
    eprintln!(" password mode             : {}", yes_no(cb.password_mode));
    eprintln!(" sequence terminator       : {}", yes_no(cb.sequence_terminator));
    eprintln!(" fast write                : {}", yes_no(cb.fast_write));
    eprintln!(" inverse data              : {}", yes_no(cb.inverse_data));
    eprintln!(" POR delay                 : {}", yes_no(cb.por_delay));
    eprintln!(" raw                       : 0x{:08X}", cb.raw);
}
