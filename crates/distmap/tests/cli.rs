#![cfg(feature = "cli")]

use std::path::Path;

use assert_cmd::Command;
use distmap::ChannelDump;
use image::{GrayImage, ImageReader, Luma};
use predicates::prelude::*;

/// 9x7 mask, object everywhere except pixel (4, 3).
fn write_mask(path: &Path) {
    let img = GrayImage::from_fn(9, 7, |x, y| Luma([if (x, y) == (4, 3) { 0 } else { 255 }]));
    img.save(path).expect("write mask");
}

fn distmap() -> Command {
    Command::cargo_bin("distmap").expect("binary")
}

#[test]
fn edt_writes_a_scaled_png_and_a_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mask = dir.path().join("mask.png");
    let out = dir.path().join("dist.png");
    write_mask(&mask);

    distmap()
        .args(["edt", "--border", "object", "--scale", "10", "--input"])
        .arg(&mask)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sizes\"").and(predicate::str::contains("\"channels\"")));

    let img = ImageReader::open(&out)
        .expect("open")
        .decode()
        .expect("decode")
        .to_luma16();
    assert_eq!(img.dimensions(), (9, 7));
    assert_eq!(img.get_pixel(4, 3)[0], 0);
    assert_eq!(img.get_pixel(8, 3)[0], 40);
    // sqrt(2) * 10 rounds to 14.
    assert_eq!(img.get_pixel(5, 4)[0], 14);
}

#[test]
fn vdt_writes_one_channel_per_axis() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mask = dir.path().join("mask.png");
    let out = dir.path().join("vectors.json");
    write_mask(&mask);

    distmap()
        .args(["vdt", "--method", "true", "--border", "object", "--input"])
        .arg(&mask)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&out).expect("read");
    let dump: ChannelDump = serde_json::from_str(&raw).expect("json");
    assert_eq!(dump.sizes, vec![9, 7]);
    assert_eq!(dump.channels.len(), 2);
    // Pixel (6, 3) points two steps back along x.
    assert_eq!(dump.channels[0][6 + 9 * 3], -2.0);
    assert_eq!(dump.channels[1][6 + 9 * 3], 0.0);
}

#[test]
fn run_reads_a_json_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mask = dir.path().join("mask.png");
    let grey = dir.path().join("grey.png");
    let out = dir.path().join("gdt.json");
    let config = dir.path().join("config.json");
    write_mask(&mask);
    GrayImage::from_pixel(9, 7, Luma([2]))
        .save(&grey)
        .expect("write grey");
    let cfg = serde_json::json!({
        "transform": "grey",
        "metric": { "connected": 1 },
        "output": "both",
        "input_path": mask,
        "grey_path": grey,
        "output_path": out,
    });
    std::fs::write(&config, cfg.to_string()).expect("write config");

    distmap()
        .arg("run")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let dump: ChannelDump =
        serde_json::from_str(&std::fs::read_to_string(&out).expect("read")).expect("json");
    assert_eq!(dump.channels.len(), 2);
    // Three city-block steps at grey 2.
    assert_eq!(dump.channels[0][1 + 9 * 3], 6.0);
    assert_eq!(dump.channels[1][1 + 9 * 3], 3.0);
}

#[test]
fn unknown_method_is_rejected() {
    distmap()
        .args(["edt", "--method", "closest", "--input", "missing.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("closest"));
}

#[test]
fn demo_reports_every_method() {
    distmap()
        .args(["demo", "--size", "17"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"separable\"")
                .and(predicate::str::contains("\"brute force\"")),
        );
}
