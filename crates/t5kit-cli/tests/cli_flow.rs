// crates/t5kit-cli/tests/cli_flow.rs
//
// End-to-end command flows against simulated tag files.

use std::path::Path;
use std::process::{Command, Output};

fn t5kit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_t5kit-cli"))
        .args(args)
        .output()
        .expect("spawn t5kit-cli")
}

fn run_ok(args: &[&str]) -> String {
    let out = t5kit(args);
    assert!(
        out.status.success(),
        "command {args:?} failed: status={:?}\nstdout:\n{}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn path_str(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).to_str().unwrap().to_owned()
}

fn new_ask_tag(dir: &tempfile::TempDir, extra: &[&str]) -> String {
    let tag = path_str(dir, "tag.t5s");
    let mut args = vec!["sim", "new", "--out", &tag];
    args.extend_from_slice(extra);
    run_ok(&args);
    tag
}

#[test]
fn sim_new_detect_and_read_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let tag = new_ask_tag(&dir, &["--data", "2=0x1234ABCD"]);
    let config = path_str(&dir, "tag.t5c");

    let detect_out = run_ok(&["detect", "--tag", &tag, "--save-config", &config]);
    assert!(detect_out.contains("ASK"), "detect output:\n{detect_out}");
    assert!(detect_out.contains("RF/32"), "detect output:\n{detect_out}");
    assert!(Path::new(&config).exists());

    let read_out = run_ok(&["read", "--tag", &tag, "--block", "2", "--config", &config]);
    assert!(read_out.contains("0x1234ABCD"), "read output:\n{read_out}");
}

#[test]
fn write_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let tag = new_ask_tag(&dir, &[]);

    run_ok(&["write", "--tag", &tag, "--block", "5", "--data", "0xAA55AA55"]);
    let read_out = run_ok(&["read", "--tag", &tag, "--block", "5"]);
    assert!(read_out.contains("0xAA55AA55"), "read output:\n{read_out}");
}

#[test]
fn dump_prints_both_pages() {
    let dir = tempfile::tempdir().unwrap();
    let tag = new_ask_tag(&dir, &[]);

    let dump_out = run_ok(&["dump", "--tag", &tag]);
    assert!(dump_out.contains("--- page 0 ---"), "dump output:\n{dump_out}");
    assert!(dump_out.contains("--- page 1 ---"), "dump output:\n{dump_out}");
    assert!(dump_out.contains("12/12 blocks read"), "dump output:\n{dump_out}");
}

#[test]
fn wipe_restores_the_stock_config_word() {
    let dir = tempfile::tempdir().unwrap();
    let tag = new_ask_tag(&dir, &["--modulation", "PSK1", "--data", "3=0xCAFEF00D"]);

    run_ok(&["wipe", "--tag", &tag]);
    let read_out = run_ok(&["read", "--tag", &tag, "--block", "0"]);
    assert!(read_out.contains("0x00088040"), "read output:\n{read_out}");
    let read_out = run_ok(&["read", "--tag", &tag, "--block", "3"]);
    assert!(read_out.contains("0x00000000"), "read output:\n{read_out}");
}

#[test]
fn info_and_trace_report_tag_identity() {
    let dir = tempfile::tempdir().unwrap();
    let tag = new_ask_tag(&dir, &[]);

    let info_out = run_ok(&["info", "--tag", &tag]);
    assert!(info_out.contains("Manchester"), "info output:\n{info_out}");
    assert!(info_out.contains("max block                 : 7"), "info output:\n{info_out}");

    let trace_out = run_ok(&["trace", "--tag", &tag]);
    assert!(trace_out.contains("Atmel Corporation"), "trace output:\n{trace_out}");
    assert!(trace_out.contains("ATA5577M1"), "trace output:\n{trace_out}");
}

#[test]
fn saved_capture_detects_offline() {
    let dir = tempfile::tempdir().unwrap();
    let tag = new_ask_tag(&dir, &[]);
    let capture = path_str(&dir, "block0.lfc");

    run_ok(&["detect", "--tag", &tag, "--save-capture", &capture]);
    let detect_out = run_ok(&["detect", "--in", &capture]);
    assert!(detect_out.contains("ASK"), "offline detect output:\n{detect_out}");
}

#[test]
fn resetread_scans_the_regular_read_stream() {
    let dir = tempfile::tempdir().unwrap();
    let tag = new_ask_tag(&dir, &[]);

    let out = run_ok(&["resetread", "--tag", &tag]);
    assert!(out.contains("read head reset"), "resetread output:\n{out}");
    assert!(out.contains("ASK"), "resetread output:\n{out}");
}

#[test]
fn offsets_sweep_marks_the_framing_offset() {
    let dir = tempfile::tempdir().unwrap();
    let tag = new_ask_tag(&dir, &[]);

    let out = run_ok(&["offsets", "--tag", &tag]);
    assert!(out.contains("<- offset"), "offsets output:\n{out}");
}

#[test]
fn q5_tag_with_nonstandard_rate_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let tag = path_str(&dir, "q5.t5s");
    run_ok(&[
        "sim", "new", "--out", &tag, "--chip", "Q5", "--rate", "10", "--data", "4=0xFEEDBEEF",
    ]);

    let detect_out = run_ok(&["detect", "--tag", &tag]);
    assert!(detect_out.contains("T5555(Q5)"), "detect output:\n{detect_out}");
    assert!(detect_out.contains("RF/10"), "detect output:\n{detect_out}");

    let read_out = run_ok(&["read", "--tag", &tag, "--block", "4"]);
    assert!(read_out.contains("0xFEEDBEEF"), "read output:\n{read_out}");
}

#[test]
fn protected_tag_stays_silent_without_wakeup() {
    let dir = tempfile::tempdir().unwrap();
    let tag = new_ask_tag(&dir, &["--password", "0x5A17C0DE"]);

    // No password and no config: detection cannot see through the silence.
    let out = t5kit(&["read", "--tag", &tag, "--block", "0"]);
    assert!(!out.status.success(), "read should fail on a silent protected tag");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no modulation matched"), "stderr:\n{stderr}");
}
