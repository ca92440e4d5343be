//! Runs the `drawcov` binary with visited data piped through stdin.

mod common;

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use common::{MAPINFO, SYMS, read_png};
use tempfile::TempDir;

const RED: [u8; 3] = [255, 0, 0];

/// Working directory holding a default `guest-last` guest.
fn workdir() -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    fs::create_dir(dir.path().join("guest-last")).unwrap();
    fs::write(dir.path().join("guest-last/mapinfo"), MAPINFO).unwrap();
    fs::write(dir.path().join("guest-last/syms"), SYMS).unwrap();
    dir
}

fn run_with_stdin(cwd: &Path, args: &[&str], input: &str) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_drawcov"))
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn drawcov");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(
        output.status.success(),
        "drawcov {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_default_guest_reads_ranges_from_stdin() {
    let dir = workdir();
    run_with_stdin(dir.path(), &[], "0x400000-0x40000a\n\n0x400100-0x400104\n");

    let image = read_png(&dir.path().join("cov-0x400000-target.png"));
    assert_eq!(image.count(RED), 14);
    assert_eq!(image.pixel(9, 0), RED);
    assert_eq!(image.pixel(0x100, 0), RED);
    assert!(dir.path().join("cov-0x7f0000000000.png").exists());
}

#[test]
fn test_dash_reads_instruction_trace_from_stdin() {
    let dir = workdir();
    run_with_stdin(
        dir.path(),
        &["-i", "-", "-o", "out"],
        "0x400000\n0x400004\n0x400008\n",
    );

    // The final address has no successor, so only two 4-byte steps are drawn.
    let image = read_png(&dir.path().join("out/cov-0x400000-target.png"));
    assert_eq!(image.count(RED), 8);
    assert_eq!(image.pixel(7, 0), RED);
    assert_ne!(image.pixel(8, 0), RED);
}

#[test]
fn test_dash_reads_ranges_with_explicit_guest() {
    let dir = workdir();
    run_with_stdin(
        dir.path(),
        &["guest-last", "-v", "-", "-o", "out"],
        "0x400010-0x400020\n",
    );

    let image = read_png(&dir.path().join("out/cov-0x400000-target.png"));
    assert_eq!(image.count(RED), 16);
    assert_eq!(image.pixel(0x10, 0), RED);
}
