//! Integration tests for configuration and job file loading.

use clipforge::config::{load_config, load_config_or_default, load_jobs, Config};
use clipforge_av::{MediaOperation, SpeedDirection};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn defaults_without_a_file() {
    let config = Config::default();
    assert!(config.tools.ffmpeg_path.is_none());
    assert_eq!(config.engine.slow_frame_rate, 16);
    assert!(config.engine.timeout().is_none());
    assert!(!config.engine.overwrite);
    assert!(config.jobs.is_empty());

    let options = config.engine.action_options();
    assert_eq!(options.slow_frame_rate, 16);
    assert!(!options.overwrite);
}

#[test]
fn full_config_round_trip() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("clipforge.toml");
    fs::write(
        &path,
        r#"
[tools]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"

[engine]
timeout_secs = 120
slow_frame_rate = 24
overwrite = true

[[jobs]]
type = "audio_slice"
input = "AR.mp3"
start = "0:00"
end = "0:58"
output = "ar_audio.mp3"

[[jobs]]
type = "change_speed"
input = "WeChat.mp4"
factor = 0.5
direction = "slow_down"
has_audio = true
output = "v_sl.mp4"
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(
        config.tools.ffmpeg_path.as_deref(),
        Some(std::path::Path::new("/opt/ffmpeg/bin/ffmpeg"))
    );
    assert_eq!(config.engine.timeout(), Some(Duration::from_secs(120)));
    assert!(config.engine.action_options().overwrite);
    assert_eq!(config.jobs.len(), 2);
    assert_eq!(config.jobs[0].name(), "Audio Slice");
    assert_eq!(
        config.jobs[1],
        MediaOperation::ChangeSpeed {
            input: "WeChat.mp4".into(),
            factor: 0.5,
            direction: SpeedDirection::SlowDown,
            has_audio: Some(true),
            output: "v_sl.mp4".into(),
        }
    );

    // Explicit path wins over default locations.
    let again = load_config_or_default(Some(&path)).unwrap();
    assert_eq!(again.engine.slow_frame_rate, 24);
}

#[test]
fn invalid_engine_settings_are_rejected() {
    let temp = tempdir().unwrap();

    let path = temp.path().join("zero_fps.toml");
    fs::write(&path, "[engine]\nslow_frame_rate = 0\n").unwrap();
    assert!(load_config(&path).is_err());

    let path = temp.path().join("zero_timeout.toml");
    fs::write(&path, "[engine]\ntimeout_secs = 0\n").unwrap();
    assert!(load_config(&path).is_err());
}

#[test]
fn invalid_jobs_are_rejected_on_load() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        r#"
[[jobs]]
type = "cut"
input = "in.mp4"
start = 10.0
end = 4.0
output = "out.mp4"
"#,
    )
    .unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("invalid range"), "{err:#}");
}

#[test]
fn unknown_operation_type_fails_to_parse() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("jobs.toml");
    fs::write(
        &path,
        r#"
[[jobs]]
type = "transmogrify"
input = "in.mp4"
output = "out.mp4"
"#,
    )
    .unwrap();

    let err = load_jobs(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse job file"));
}

#[test]
fn job_file_preserves_order() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("jobs.toml");
    fs::write(
        &path,
        r#"
[[jobs]]
type = "extract_audio"
video = "game.mp4"
output = "AR.mp3"

[[jobs]]
type = "extract_silent_video"
video = "with_audio.mp4"
output = "without_audio.mp4"

[[jobs]]
type = "add_audio"
audio = "ar_audio.mp3"
video = "out.mp4"
output = "out_with_audio.mp4"

[[jobs]]
type = "audio_speed"
input = "my_audio.mp3"
factor = 2.0
direction = "speed_up"
output = "yyy.mp3"
"#,
    )
    .unwrap();

    let jobs = load_jobs(&path).unwrap().jobs;
    let names: Vec<_> = jobs.iter().map(MediaOperation::name).collect();
    assert_eq!(
        names,
        [
            "Extract Audio",
            "Extract Silent Video",
            "Add Audio",
            "Audio Speed-Up"
        ]
    );
}
