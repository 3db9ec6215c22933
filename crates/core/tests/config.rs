use stream_relay::{
    StreamConfig,
    config::{ConfigError, DEFAULT_MAX_BYTES},
    video::Framerate,
};

fn channel_json(input: &str) -> String {
    format!(
        r#"{{
            "input": {input:?},
            "date": "11-04-2017",
            "beginTime": "20:17:30",
            "jumpTo": "20:18:00",
            "frameRate": 25,
            "loopOnEos": true,
            "maxBytes": 1000000
        }}"#
    )
}

#[test]
fn parses_a_full_channel() {
    let config: StreamConfig = serde_json::from_str(&channel_json("/tmp/out.mp4")).unwrap();

    assert_eq!(config.input.to_str(), Some("/tmp/out.mp4"));
    assert_eq!(config.date.as_deref(), Some("11-04-2017"));
    assert_eq!(config.frame_rate, Framerate::new(25, 1));
    assert!(config.loop_on_eos);
    assert_eq!(config.max_bytes, 1_000_000);
    assert_eq!(config.seek_target().unwrap().nseconds(), 30_000_000_000);
}

#[test]
fn optional_fields_have_service_defaults() {
    let config: StreamConfig = serde_json::from_str(
        r#"{"input": "/tmp/out.mp4", "beginTime": "00:00:00", "jumpTo": "00:01:00"}"#,
    )
    .unwrap();

    assert_eq!(config.date, None);
    assert_eq!(config.frame_rate, Framerate::new(29, 1));
    assert!(!config.loop_on_eos);
    assert_eq!(config.max_bytes, DEFAULT_MAX_BYTES);
    assert_eq!(config.seek_target().unwrap().nseconds(), 60_000_000_000);
}

#[test]
fn jump_before_the_recording_starts_is_an_error() {
    let config: StreamConfig = serde_json::from_str(
        r#"{"input": "/tmp/out.mp4", "beginTime": "10:00:00", "jumpTo": "09:59:59"}"#,
    )
    .unwrap();

    assert!(matches!(config.seek_target(), Err(ConfigError::Time(_))));
}

#[test]
fn malformed_times_fail_to_load() {
    let res: Result<StreamConfig, _> = serde_json::from_str(
        r#"{"input": "/tmp/out.mp4", "beginTime": "8am", "jumpTo": "00:00:00"}"#,
    );

    assert!(res.is_err());
}

#[test]
fn unreachable_input_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.mp4");

    let config: StreamConfig =
        serde_json::from_str(&channel_json(missing.to_str().unwrap())).unwrap();

    let err = config.check_input().unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Can't access {}", missing.display())
    );
}

#[test]
fn reachable_input_passes_the_check() {
    let dir = tempfile::tempdir().unwrap();
    let asset = dir.path().join("out.mp4");
    std::fs::File::create(&asset).unwrap();

    let config: StreamConfig =
        serde_json::from_str(&channel_json(asset.to_str().unwrap())).unwrap();

    assert!(config.check_input().is_ok());
}

#[test]
fn loads_from_a_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("channel.json");
    std::fs::write(&path, channel_json("/tmp/out.mp4")).unwrap();

    let config = StreamConfig::from_json_file(&path).unwrap();
    assert_eq!(config.jump_to.to_string(), "20:18:00");
}
