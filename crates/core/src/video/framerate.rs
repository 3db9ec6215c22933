use std::fmt::Display;

use serde::Deserialize;

use crate::time::{ONE_SECOND_NANOS, Timestamp};

/// Wrapper object for the target output framerate aiming to provide a
/// clearer interface and make conversions easier.
///
/// The relay does not care what rate frames are decoded at; this is the
/// rate the synthetic output clock ticks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framerate(u64, u64);

impl Framerate {
    /// To create a new framerate, you define the number of frames for a
    /// given number of seconds. For example, 60fps would be
    /// `Framerate::new(60, 1)`
    pub const fn new(frames: u64, seconds: u64) -> Self {
        Self(frames, seconds)
    }

    /// The number of frames per the given number of seconds (see [Self::seconds])
    pub const fn frames(&self) -> u64 {
        self.0
    }

    /// The number of seconds which has the given number of frames (see [Self::frames])
    pub const fn seconds(&self) -> u64 {
        self.1
    }

    /// The position of the frame with the given index on the output clock
    ///
    /// Computed as `frame * seconds * 1e9 / frames` with a 128 bit
    /// intermediate, truncating like `gst_util_uint64_scale`, so the
    /// clock stays drift free for rates which do not divide a second
    /// evenly.
    pub fn position(&self, frame: u64) -> Timestamp {
        let nanos = frame as u128 * self.1 as u128 * ONE_SECOND_NANOS as u128 / self.0 as u128;
        Timestamp::new(nanos as u64)
    }

    /// The duration carried by the frame with the given index, sized so
    /// that `position(frame) + interval(frame) == position(frame + 1)`
    pub fn interval(&self, frame: u64) -> Timestamp {
        self.position(frame + 1) - self.position(frame)
    }
}

impl Default for Framerate {
    fn default() -> Self {
        Framerate(29, 1)
    }
}

impl Display for Framerate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, self.1)
    }
}

impl From<Framerate> for (u64, u64) {
    fn from(value: Framerate) -> Self {
        (value.frames(), value.seconds())
    }
}

impl<'de> Deserialize<'de> for Framerate {
    /// Configurations spell the rate as a whole number of frames per
    /// second
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Framerate::new(u64::deserialize(deserializer)?, 1))
    }
}
