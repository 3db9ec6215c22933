//! The per channel configuration the relay is bootstrapped from
//!
//! A channel names a recorded asset, the time of day the recording began
//! and the time of day playback should resume from. The file format is
//! JSON with camelCase keys, matching what the surrounding service
//! writes.

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    time::{TimeError, TimeOfDay, Timestamp},
    video::Framerate,
};

/// The `max-bytes` capacity handed to a session's source element when the
/// channel does not set its own limit, matching the appsrc default
pub const DEFAULT_MAX_BYTES: u64 = 200_000;

/// Stores the possible errors raised while loading or validating a
/// channel configuration, all of which abort session start
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configured asset path does not resolve to a readable file
    #[error("Can't access {}", .0.display())]
    Inaccessible(PathBuf),
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One channel of the re-streaming service
///
/// ```
/// use stream_relay::StreamConfig;
///
/// let config: StreamConfig = serde_json::from_str(
///     r#"{
///         "input": "/tmp/data/videos/bunny.mp4",
///         "beginTime": "08:00:00",
///         "jumpTo": "08:30:00"
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(
///     config.seek_target().unwrap().nseconds(),
///     30 * 60 * 1_000_000_000,
/// );
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConfig {
    /// Path to the recorded asset to stream
    pub input: PathBuf,
    /// The day the asset was recorded on. Carried for operators, never
    /// interpreted by the relay
    #[serde(default)]
    pub date: Option<String>,
    /// The time of day at which the recording begins
    pub begin_time: TimeOfDay,
    /// The time of day playback should resume from
    pub jump_to: TimeOfDay,
    /// The rate the relayed stream is clocked at
    #[serde(default)]
    pub frame_rate: Framerate,
    /// Whether reaching the end of the asset seeks back to the jump-to
    /// point instead of letting the session end there
    #[serde(default)]
    pub loop_on_eos: bool,
    /// Buffering capacity handed to every session's source element
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

impl StreamConfig {
    /// Reads a channel configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(File::open(path)?)?)
    }

    /// The offset into the asset that every stream start seeks to
    ///
    /// Computed once at bootstrap and reused for the channel's lifetime;
    /// a jump-to before the asset start is a configuration error.
    pub fn seek_target(&self) -> Result<Timestamp, ConfigError> {
        Ok(self.jump_to.seek_target(self.begin_time)?)
    }

    /// Checks the asset is reachable, before any pipeline state exists
    pub fn check_input(&self) -> Result<(), ConfigError> {
        if self.input.exists() {
            Ok(())
        } else {
            Err(ConfigError::Inaccessible(self.input.clone()))
        }
    }
}
