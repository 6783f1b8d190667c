//! CLI end-to-end tests
//!
//! Tests for the clipforge command-line interface. None of these need ffmpeg:
//! they cover argument validation, raw audio concatenation, dry runs, and
//! config handling.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the clipforge binary, run inside `dir` so no stray
/// `./clipforge.toml` is picked up.
#[allow(deprecated)]
fn clipforge_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("clipforge").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn test_cli_no_args_shows_help() {
    let temp = tempdir().unwrap();
    clipforge_cmd(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_lists_operations() {
    let temp = tempdir().unwrap();
    clipforge_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clipforge"))
        .stdout(predicate::str::contains("speed-up"))
        .stdout(predicate::str::contains("audio-slice"));
}

#[test]
fn test_cli_version() {
    let temp = tempdir().unwrap();
    clipforge_cmd(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clipforge"));

    clipforge_cmd(temp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_tools_command() {
    let temp = tempdir().unwrap();
    clipforge_cmd(temp.path())
        .arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffmpeg"))
        .stdout(predicate::str::contains("ffprobe"));
}

#[cfg(unix)]
#[test]
fn test_cli_check_tools_uses_configured_path() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().unwrap();
    let tool = temp.path().join("ffmpeg-custom");
    fs::write(&tool, "#!/bin/sh\necho 'ffmpeg version 9.9-custom'\n").unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    let config_file = temp.path().join("config.toml");
    fs::write(
        &config_file,
        format!("[tools]\nffmpeg_path = {:?}\n", tool.to_str().unwrap()),
    )
    .unwrap();

    clipforge_cmd(temp.path())
        .args(["--config", config_file.to_str().unwrap(), "check-tools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9.9-custom"))
        .stdout(predicate::str::contains(tool.to_str().unwrap()));
}

#[test]
fn test_cli_cut_inverted_range() {
    let temp = tempdir().unwrap();
    clipforge_cmd(temp.path())
        .args(["cut", "in.mp4", "10", "4", "out.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid range"));
    assert!(!temp.path().join("out.mp4").exists());
}

#[test]
fn test_cli_speed_up_rejects_slow_factor() {
    let temp = tempdir().unwrap();
    clipforge_cmd(temp.path())
        .args(["speed-up", "WeChat.mp4", "v_acc.mp4", "--factor", "0.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_cli_slow_down_with_audio_limit() {
    let temp = tempdir().unwrap();
    clipforge_cmd(temp.path())
        .args(["slow-down", "WeChat.mp4", "v_sl.mp4", "-f", "0.4", "--with-audio"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[0.5, 1]"));
}

#[test]
fn test_cli_audio_hint_flags_conflict() {
    let temp = tempdir().unwrap();
    clipforge_cmd(temp.path())
        .args(["slow-down", "a.mp4", "b.mp4", "--with-audio", "--no-audio"])
        .assert()
        .failure();
}

#[test]
fn test_cli_nonexistent_input() {
    let temp = tempdir().unwrap();
    clipforge_cmd(temp.path())
        .args(["cut", "/nonexistent/path/movie.mp4", "0", "1", "out.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_probe_nonexistent_file() {
    let temp = tempdir().unwrap();
    clipforge_cmd(temp.path())
        .args(["probe", "/nonexistent/path/movie.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exist"));
}

#[test]
fn test_cli_audio_slice_bad_mark() {
    let temp = tempdir().unwrap();
    clipforge_cmd(temp.path())
        .args(["audio-slice", "AR.mp3", "0:58", "0:10", "ar_audio.mp3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid range"));
}

#[test]
fn test_cli_audio_concat_appends_bytes() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("my_audio.mp3"), b"ID3-one").unwrap();
    fs::write(temp.path().join("ts.mp3"), b"-two").unwrap();

    clipforge_cmd(temp.path())
        .args(["audio-concat", "-o", "concatenate.mp3", "my_audio.mp3", "ts.mp3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Audio Concatenate"));

    let output = fs::read(temp.path().join("concatenate.mp3")).unwrap();
    assert_eq!(output, b"ID3-one-two");
}

#[test]
fn test_cli_existing_output_needs_overwrite() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.mp3"), b"new").unwrap();
    fs::write(temp.path().join("out.mp3"), b"old").unwrap();

    clipforge_cmd(temp.path())
        .args(["audio-concat", "-o", "out.mp3", "a.mp3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read(temp.path().join("out.mp3")).unwrap(), b"old");

    clipforge_cmd(temp.path())
        .args(["--overwrite", "audio-concat", "-o", "out.mp3", "a.mp3"])
        .assert()
        .success();
    assert_eq!(fs::read(temp.path().join("out.mp3")).unwrap(), b"new");
}

#[test]
fn test_cli_dry_run_writes_nothing() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.mp3"), b"one").unwrap();

    clipforge_cmd(temp.path())
        .args(["--dry-run", "audio-concat", "-o", "out.mp3", "a.mp3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN]"));
    assert!(!temp.path().join("out.mp3").exists());
}

#[test]
fn test_cli_run_job_file() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.mp3"), b"aa").unwrap();
    fs::write(temp.path().join("b.mp3"), b"bb").unwrap();
    fs::write(
        temp.path().join("jobs.toml"),
        r#"
[[jobs]]
type = "audio_concatenate"
inputs = ["a.mp3", "b.mp3"]
output = "ab.mp3"

[[jobs]]
type = "audio_concatenate"
inputs = ["b.mp3", "a.mp3"]
output = "ba.mp3"
"#,
    )
    .unwrap();

    clipforge_cmd(temp.path())
        .args(["run", "jobs.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jobs to execute: 2"))
        .stdout(predicate::str::contains("Processing complete!"));

    assert_eq!(fs::read(temp.path().join("ab.mp3")).unwrap(), b"aabb");
    assert_eq!(fs::read(temp.path().join("ba.mp3")).unwrap(), b"bbaa");
}

#[test]
fn test_cli_run_rejects_invalid_job() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("jobs.toml"),
        r#"
[[jobs]]
type = "change_speed"
input = "WeChat.mp4"
factor = 0.9
direction = "speed_up"
output = "v_acc.mp4"
"#,
    )
    .unwrap();

    clipforge_cmd(temp.path())
        .args(["run", "jobs.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Job 1"));
}

#[test]
fn test_cli_run_dry_run_uses_config_jobs() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");
    fs::write(
        &config_file,
        r#"
[engine]
slow_frame_rate = 16

[[jobs]]
type = "cut"
input = "Elon.mp4"
start = 0.5
end = 846.0
output = "out.mp4"
"#,
    )
    .unwrap();

    clipforge_cmd(temp.path())
        .args(["--config", config_file.to_str().unwrap(), "--dry-run", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Cut"))
        .stdout(predicate::str::contains("[DRY RUN]"));
}

#[test]
fn test_cli_validate_config() {
    let temp = tempdir().unwrap();
    let good = temp.path().join("good.toml");
    fs::write(&good, "[engine]\ntimeout_secs = 600\n").unwrap();
    let bad = temp.path().join("bad.toml");
    fs::write(&bad, "[engine]\nslow_frame_rate = 0\n").unwrap();

    clipforge_cmd(temp.path())
        .args(["validate", good.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Timeout: 600s"));

    clipforge_cmd(temp.path())
        .args(["validate", bad.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slow_frame_rate"));
}
