//! Integration tests for the sobel-batch CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Command isolated from the developer's own config and environment.
fn sobel_batch(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sobel-batch").unwrap();
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("SOBEL_BATCH_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

fn write_gradient_png(path: &Path) {
    image::GrayImage::from_fn(12, 9, |x, y| image::Luma([(x * 20 + y * 3) as u8]))
        .save(path)
        .unwrap();
}

/// Temp dir with `in/` holding two PNGs and a text file, plus an empty `out/`.
fn image_fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    fs::create_dir(&input).unwrap();
    write_gradient_png(&input.join("a.png"));
    write_gradient_png(&input.join("b.png"));
    fs::write(input.join("notes.txt"), "not an image").unwrap();
    temp_dir
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let temp_dir = TempDir::new().unwrap();
    sobel_batch(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch Sobel edge detection"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let temp_dir = TempDir::new().unwrap();
    sobel_batch(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sobel-batch"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let temp_dir = TempDir::new().unwrap();
    sobel_batch(temp_dir.path())
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_run_writes_prefixed_edge_maps() {
    let temp_dir = image_fixture();

    sobel_batch(temp_dir.path())
        .args(["run", "--input", "in", "--output", "out", "--create-output-dir"])
        .args(["--pattern", "*.png", "--mode", "parallel", "--workers", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 2 succeeded"))
        .stdout(predicate::str::contains("a.png processed on [worker-"))
        .stdout(predicate::str::contains("output size 108 pixels"))
        .stdout(predicate::str::contains("Total [Parallel] execution time:"));

    let out = temp_dir.path().join("out");
    for name in ["sobeled a.png", "sobeled b.png"] {
        let edges = image::open(out.join(name)).unwrap();
        assert_eq!((edges.width(), edges.height()), (12, 9));
    }
    assert!(!out.join("sobeled notes.txt").exists());
    assert!(temp_dir.path().join("in/a.png").exists());
}

#[test]
fn test_strategies_write_identical_files() {
    let temp_dir = image_fixture();

    for (mode, dir) in [("sequential", "seq"), ("fan-out", "fan")] {
        sobel_batch(temp_dir.path())
            .args(["run", "-i", "in", "-o", dir, "--create-output-dir", "--pattern", "*.png"])
            .args(["--mode", mode, "--no-progress"])
            .assert()
            .success();
    }

    for name in ["sobeled a.png", "sobeled b.png"] {
        let sequential = fs::read(temp_dir.path().join("seq").join(name)).unwrap();
        let fan_out = fs::read(temp_dir.path().join("fan").join(name)).unwrap();
        assert_eq!(sequential, fan_out, "{name}");
    }
}

#[test]
fn test_corrupt_image_is_reported_but_others_succeed() {
    let temp_dir = image_fixture();
    fs::write(temp_dir.path().join("in/c.png"), b"definitely not a png").unwrap();

    sobel_batch(temp_dir.path())
        .args(["run", "-i", "in", "-o", "out", "--create-output-dir", "--pattern", "*.png"])
        .args(["--mode", "sequential"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("2 of 3 succeeded"))
        .stdout(predicate::str::contains("c.png"))
        .stderr(predicate::str::contains("1 of 3 images failed"));

    assert!(temp_dir.path().join("out/sobeled a.png").exists());
    assert!(!temp_dir.path().join("out/sobeled c.png").exists());
}

#[test]
fn test_missing_input_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    sobel_batch(temp_dir.path())
        .args(["run", "--input", "nowhere", "--output", ".", "--pattern", "*.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input directory"));
}

#[test]
fn test_missing_output_directory_fails_without_flag() {
    let temp_dir = image_fixture();
    sobel_batch(temp_dir.path())
        .args(["run", "--input", "in", "--output", "missing", "--pattern", "*.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("output directory"));
}

#[test]
fn test_repository_config_is_applied() {
    let temp_dir = image_fixture();
    fs::write(
        temp_dir.path().join("sobel-batch.toml"),
        "[batch]\ninput_dir = \"in\"\noutput_dir = \"edges\"\npattern = \"*.png\"\noutput_prefix = \"edge_\"\ncreate_output_dir = true\n\n[execution]\nmode = \"fan-out\"\n",
    )
    .unwrap();

    sobel_batch(temp_dir.path())
        .args(["run", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("processed on [task-"));

    assert!(temp_dir.path().join("edges/edge_a.png").exists());
}

#[test]
fn test_compare_runs_every_strategy() {
    let temp_dir = image_fixture();
    sobel_batch(temp_dir.path())
        .args(["compare", "-i", "in", "-o", "out", "--create-output-dir", "--pattern", "*.png"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total [Sequential]"))
        .stdout(predicate::str::contains("Total [Parallel]"))
        .stdout(predicate::str::contains("Total [FanOut]"));
}

#[test]
fn test_user_config_under_home_is_applied() {
    let temp_dir = TempDir::new().unwrap();
    let user_dir = temp_dir.path().join(".config/sobel-batch");
    fs::create_dir_all(&user_dir).unwrap();
    fs::write(user_dir.join("config.toml"), "[batch]\noutput_prefix = \"edge_\"\n").unwrap();

    sobel_batch(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("output_prefix = \"edge_\""));
}

/// Test configuration functionality
#[test]
fn test_config_show() {
    let temp_dir = TempDir::new().unwrap();
    sobel_batch(temp_dir.path())
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pattern\": \"*.jpg\""))
        .stdout(predicate::str::contains("\"output_prefix\": \"sobeled \""));

    sobel_batch(temp_dir.path())
        .env("SOBEL_BATCH_EXECUTION__MODE", "fan-out")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode = \"fan-out\""));
}
