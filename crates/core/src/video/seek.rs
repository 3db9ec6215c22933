//! Lifecycle driven seeking to the channel's start offset

use tracing::warn;

use crate::time::Timestamp;

use super::StreamError;

/// The pipeline lifecycle notifications the seek controller reacts to;
/// everything else on the bus is ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// Data flow for the asset has started
    Started,
    /// The asset ran out of frames
    EndOfStream,
}

/// An absolute, flushing, rate preserving seek on whatever is playing the
/// asset
pub trait Seekable {
    fn seek_to(&self, target: Timestamp) -> Result<(), StreamError>;
}

/// Drives playback to the precomputed target offset on lifecycle events
///
/// The target is resolved once, at configuration time; every stream start
/// lands on the same absolute point rather than a re-derived one, so a
/// restarted session replays from the configured time of day.
#[derive(Debug, Clone, Copy)]
pub struct SeekController {
    target: Timestamp,
    loop_on_eos: bool,
}

impl SeekController {
    pub const fn new(target: Timestamp, loop_on_eos: bool) -> Self {
        Self {
            target,
            loop_on_eos,
        }
    }

    /// The offset every triggered seek lands on
    pub const fn target(&self) -> Timestamp {
        self.target
    }

    /// Handles one lifecycle event
    ///
    /// A stream start always seeks to the target. End of stream does so
    /// only when the channel is configured to loop, and otherwise lets
    /// the session end at the end of the file. The handler never detaches
    /// itself, whatever the outcome.
    pub fn handle<P: Seekable>(&self, event: StreamEvent, pipe: &P) {
        match event {
            StreamEvent::Started => self.apply(pipe),
            StreamEvent::EndOfStream if self.loop_on_eos => self.apply(pipe),
            StreamEvent::EndOfStream => {}
        }
    }

    /// Single attempt per triggering event; a rejected seek leaves the
    /// pipeline playing from wherever it currently is
    fn apply<P: Seekable>(&self, pipe: &P) {
        if let Err(e) = pipe.seek_to(self.target) {
            warn!("seek to {} rejected: {e}", self.target);
        }
    }
}
