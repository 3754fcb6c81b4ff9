use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn bandbrot() -> Command {
    Command::cargo_bin("bandbrot").unwrap()
}

#[test]
fn renders_a_tga_and_reports_the_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.tga");
    bandbrot()
        .args(&["-o", path.to_str().unwrap(), "-s", "48x32", "-t", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Computing the Mandelbrot set took"));
    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 18 + 48 * 32 * 3);
    assert_eq!(&bytes[12..16], &[48, 0, 32, 0]);
}

#[test]
fn colors_and_window_come_from_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orange.tga");
    // A window entirely inside the main cardioid: every pixel is inside.
    bandbrot()
        .args(&[
            "-o",
            path.to_str().unwrap(),
            "-s",
            "8x8",
            "-l",
            "-0.2,0.1",
            "-r",
            "0.0,-0.1",
            "--inside",
            "orange",
            "--outside",
            "#0000ff",
        ])
        .assert()
        .success();
    let bytes = fs::read(&path).unwrap();
    assert!(bytes[18..].chunks(3).all(|bgr| bgr == [0x00, 0xA5, 0xFF]));
}

#[test]
fn negative_thread_counts_fall_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("neg.tga");
    bandbrot()
        .args(&["-o", path.to_str().unwrap(), "-s", "16x16", "-t", "-2"])
        .assert()
        .success();
    assert!(path.exists());
}

#[test]
fn ppm_extension_writes_a_pixmap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.ppm");
    bandbrot()
        .args(&["-o", path.to_str().unwrap(), "-s", "10x10"])
        .assert()
        .success();
    assert!(fs::read(&path).unwrap().starts_with(b"P6"));
}

#[test]
fn zero_size_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.tga");
    bandbrot()
        .args(&["-o", path.to_str().unwrap(), "-s", "0x10"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid render configuration"));
    assert!(!path.exists());
}

#[test]
fn unwritable_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("dir.tga");
    bandbrot()
        .args(&["-o", path.to_str().unwrap(), "-s", "8x8"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Could not write image"));
}

#[test]
fn unknown_color_is_rejected_by_the_parser() {
    bandbrot()
        .args(&["-o", "unused.tga", "--inside", "mauve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown color"));
}

#[test]
fn output_is_required() {
    bandbrot().assert().failure();
}
