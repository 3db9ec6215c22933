//! The demand driven bridge between the shared decode sink and a
//! session's source element
//!
//! Decoded frames arrive with whatever timing the decoder produced them
//! at; the relay throws those labels away and stamps each frame with the
//! next slot on a synthetic constant rate clock, so the outbound stream
//! is constant rate no matter how the decode side jitters.

use gst_app::{AppSink, AppSrc, AppSrcCallbacks};
use tracing::warn;

use crate::time::Timestamp;

use super::Framerate;

/// Pull-one-or-none access to decoded frames
///
/// The relay only ever asks for a single frame at a time. An
/// implementation may block until one is ready; it returns [None] once
/// the underlying stream has nothing to hand out, and the relay will
/// simply ask again on the next demand cycle.
pub trait FrameSource {
    type Frame;

    fn pull_frame(&mut self) -> Option<Self::Frame>;
}

/// The labels assigned to one relayed frame by the output clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTiming {
    pub pts: Timestamp,
    pub duration: Timestamp,
}

/// Per session relay state: a handle on the shared decode sink plus the
/// running output clock
///
/// One context exists per attached session and is dropped with it. The
/// clock starts at zero and only ever moves forward; restarting a session
/// means building a fresh context.
#[derive(Debug)]
pub struct SessionContext<S> {
    source: S,
    rate: Framerate,
    frames_out: u64,
}

impl<S: FrameSource> SessionContext<S> {
    pub const fn new(source: S, rate: Framerate) -> Self {
        Self {
            source,
            rate,
            frames_out: 0,
        }
    }

    /// The number of frames relayed so far
    pub const fn frames_out(&self) -> u64 {
        self.frames_out
    }

    /// The labels the next relayed frame will carry
    pub fn next_timing(&self) -> FrameTiming {
        FrameTiming {
            pts: self.rate.position(self.frames_out),
            duration: self.rate.interval(self.frames_out),
        }
    }

    /// Pulls a single frame from the decode sink and stamps it with the
    /// next slot on the output clock
    ///
    /// When the sink has nothing to give (end of stream, or not in a
    /// state that produces data) the clock is left untouched and [None]
    /// is returned; the next demand cycle tries again.
    pub fn pull_next(&mut self) -> Option<(S::Frame, FrameTiming)> {
        let frame = self.source.pull_frame()?;
        let timing = self.next_timing();
        self.frames_out += 1;
        Some((frame, timing))
    }
}

/// [FrameSource] over the shared appsink all sessions read from
///
/// [AppSink::pull_sample] blocks until the decode side has a frame ready,
/// which is the only backpressure in the relay; it fails once the sink is
/// at end of stream or taken out of the playing states, which the relay
/// treats as "nothing to hand out".
#[derive(Debug, Clone)]
pub struct DecodeSink(AppSink);

impl DecodeSink {
    pub const fn new(sink: AppSink) -> Self {
        Self(sink)
    }
}

impl FrameSource for DecodeSink {
    type Frame = gst::Sample;

    fn pull_frame(&mut self) -> Option<gst::Sample> {
        self.0.pull_sample().ok()
    }
}

/// Wires a [SessionContext] to the `need-data` demand signal of a
/// session's appsrc
///
/// Every time the outbound side is ready for more data this relays
/// exactly one re-stamped buffer, or nothing when the decode sink is dry.
/// The callback runs on whatever thread the source element drives its
/// demand signal from. A push the appsrc refuses is reported and dropped
/// rather than ending the session.
pub fn attach_relay(appsrc: &AppSrc, mut ctx: SessionContext<DecodeSink>) {
    appsrc.set_callbacks(
        AppSrcCallbacks::builder()
            .need_data(move |appsrc, _| {
                let Some((sample, timing)) = ctx.pull_next() else {
                    return;
                };

                let Some(mut buffer) = sample.buffer_owned() else {
                    return;
                };

                {
                    let buffer = buffer.make_mut();
                    buffer.set_pts(gst::ClockTime::from(timing.pts));
                    buffer.set_duration(gst::ClockTime::from(timing.duration));
                }

                if let Err(e) = appsrc.push_buffer(buffer) {
                    warn!("session refused a frame at {}: {e}", timing.pts);
                }
            })
            .build(),
    );
}
