//! Integration tests for the `tactus` binary.

use std::process::Command;
use tactus_io::{WavSpec, read_wav, write_wav};

fn tactus_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tactus"))
}

fn write_tone(path: &std::path::Path, frames: usize) {
    let samples: Vec<f32> = (0..frames * 2)
        .map(|i| ((i / 2) as f32 * 0.05).sin() * 0.5)
        .collect();
    write_wav(
        path,
        &samples,
        WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 32,
        },
    )
    .unwrap();
}

#[test]
fn cli_help_lists_commands() {
    let output = tactus_bin().arg("--help").output().expect("failed to run tactus --help");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["render", "live", "devices"] {
        assert!(stdout.contains(command), "help should mention '{command}'");
    }
}

#[test]
fn cli_render_with_default_gesture() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_tone(&input, 22050);

    let status = tactus_bin()
        .args(["render", input.to_str().unwrap(), output.to_str().unwrap()])
        .output()
        .expect("failed to run tactus render");
    assert!(status.status.success(), "{}", String::from_utf8_lossy(&status.stderr));

    let (samples, spec) = read_wav(&output).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert!(samples.len() >= 22050 * 2);
    assert!(samples.iter().any(|s| s.abs() > 0.01), "rendered output is silent");
}

#[test]
fn cli_render_with_script_and_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    let script = dir.path().join("swipe.toml");
    let config = dir.path().join("instrument.toml");
    write_tone(&input, 8820);

    std::fs::write(
        &script,
        r#"
tail_ms = 50

[[event]]
at_ms = 0
touch = "down"
x = 100
y = 500

[[event]]
at_ms = 60
touch = "move"
x = 300
y = 500

[[event]]
at_ms = 120
touch = "up"
x = 500
y = 500
"#,
    )
    .unwrap();
    std::fs::write(
        &config,
        r#"
[audio]
block_size = 256

[mode]
space = "impulse"
"#,
    )
    .unwrap();

    let status = tactus_bin()
        .args([
            "render",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--script",
            script.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--bit-depth",
            "16",
        ])
        .output()
        .expect("failed to run tactus render");
    assert!(status.status.success(), "{}", String::from_utf8_lossy(&status.stderr));

    let (samples, spec) = read_wav(&output).unwrap();
    assert_eq!(spec.bits_per_sample, 16);
    // 170 ms at 44.1 kHz, rounded up to whole blocks.
    assert!(samples.len() >= 7497 * 2);
}

#[test]
fn cli_render_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let status = tactus_bin()
        .args([
            "render",
            dir.path().join("missing.wav").to_str().unwrap(),
            dir.path().join("out.wav").to_str().unwrap(),
        ])
        .output()
        .expect("failed to run tactus render");
    assert!(!status.status.success());
}

#[test]
fn cli_render_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let config = dir.path().join("bad.toml");
    write_tone(&input, 1000);
    std::fs::write(&config, "[audio]\nblock_size = 3\n").unwrap();

    let status = tactus_bin()
        .args([
            "render",
            input.to_str().unwrap(),
            dir.path().join("out.wav").to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run tactus render");
    assert!(!status.status.success());
    assert!(String::from_utf8_lossy(&status.stderr).contains("block_size"));
}
