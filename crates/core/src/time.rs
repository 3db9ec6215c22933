//! Time arithmetic for the relay clock and the channel schedule
//!
//! Everything here counts nanoseconds, the unit GStreamer buffers carry,
//! so offsets computed from the configuration can be handed straight to
//! the pipeline.

use std::{
    fmt::Display,
    ops::{Add, Deref, Sub},
    str::FromStr,
};

use serde::Deserialize;
use thiserror::Error;

/// The number of nanoseconds in a second.
pub const ONE_SECOND_NANOS: u64 = 1_000_000_000;
/// The number of nanoseconds in a minute.
pub const ONE_MINUTE_NANOS: u64 = 60 * ONE_SECOND_NANOS;
/// The number of nanoseconds in an hour.
pub const ONE_HOUR_NANOS: u64 = 60 * ONE_MINUTE_NANOS;

/// Wrapper for a position on the output clock, helping to convert between
/// `u64` (the nanoseconds) and [gst::ClockTime]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn new(nanoseconds: u64) -> Self {
        Self(nanoseconds)
    }

    pub const fn from_secs(seconds: u64) -> Self {
        Self(seconds * ONE_SECOND_NANOS)
    }

    pub const fn nseconds(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Timestamp(value)
    }
}

impl From<Timestamp> for u64 {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

impl From<Timestamp> for gst::ClockTime {
    fn from(value: Timestamp) -> Self {
        gst::ClockTime::from_nseconds(value.0)
    }
}

impl Deref for Timestamp {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Add for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Self) -> Self::Output {
        Timestamp(self.0.add(rhs.0))
    }
}

impl Sub for Timestamp {
    type Output = Timestamp;

    fn sub(self, rhs: Self) -> Self::Output {
        Timestamp(self.0.sub(rhs.0))
    }
}

/// Stores the possible errors that may be encountered when reading the
/// times out of a channel schedule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The string was too short or did not have colons in the `HH:MM:SS`
    /// positions
    #[error("expected an HH:MM:SS string, got {0:?}")]
    BadFormat(String),
    /// A field between the colons was not two digits
    #[error("time field {0:?} is not a two digit number")]
    BadField(String),
    /// The requested playback start lies before the start of the
    /// recording, so it has no position within the file
    #[error("jump-to time {jump_to} is before the asset start time {begin}")]
    JumpBeforeStart { begin: TimeOfDay, jump_to: TimeOfDay },
}

/// A wall clock time of day, stored as the offset from midnight
///
/// This is the form the channel schedule speaks in: the recording carries
/// the time of day it started at, and the operator picks the time of day
/// playback should resume from. Field ranges are not checked beyond the
/// two digit shape, matching what the schedule format guarantees.
///
/// ```
/// use stream_relay::time::TimeOfDay;
///
/// let t: TimeOfDay = "01:02:03".parse().unwrap();
/// assert_eq!(t.since_midnight().nseconds(), 3_723_000_000_000);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay(Timestamp);

impl TimeOfDay {
    /// The offset of this time from midnight of the same day
    pub const fn since_midnight(&self) -> Timestamp {
        self.0
    }

    /// The offset into the asset that playback has to seek to so that it
    /// resumes at `self`, given the asset itself begins at `begin`
    ///
    /// Both times are on the same day, so a jump-to before the asset
    /// start has no position within the file and is reported as an error
    /// rather than wrapping around.
    pub fn seek_target(&self, begin: TimeOfDay) -> Result<Timestamp, TimeError> {
        self.0
            .nseconds()
            .checked_sub(begin.0.nseconds())
            .map(Timestamp::new)
            .ok_or(TimeError::JumpBeforeStart {
                begin,
                jump_to: *self,
            })
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    /// Reads an `HH:MM:SS` string with the colons at fixed positions,
    /// ignoring anything past the seconds field
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.as_bytes();
        if b.len() < 8 || b[2] != b':' || b[5] != b':' {
            return Err(TimeError::BadFormat(s.to_string()));
        }

        let field = |at: usize| -> Result<u64, TimeError> {
            match (b[at], b[at + 1]) {
                (d1 @ b'0'..=b'9', d2 @ b'0'..=b'9') => {
                    Ok((d1 - b'0') as u64 * 10 + (d2 - b'0') as u64)
                }
                _ => Err(TimeError::BadField(
                    String::from_utf8_lossy(&b[at..at + 2]).into_owned(),
                )),
            }
        };

        Ok(TimeOfDay(Timestamp::new(
            ONE_HOUR_NANOS * field(0)? + ONE_MINUTE_NANOS * field(3)? + ONE_SECOND_NANOS * field(6)?,
        )))
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.0.nseconds() / ONE_SECOND_NANOS;
        write!(
            f,
            "{:02}:{:02}:{:02}",
            total / 3600,
            total / 60 % 60,
            total % 60
        )
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
