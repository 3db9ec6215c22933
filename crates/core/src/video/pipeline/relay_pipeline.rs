use glib::object::{Cast, IsA};
use gst::prelude::{ElementExt, GstBinExt};
use gst_app::{AppSink, AppSrc};
use tracing::debug;

use crate::{
    config::StreamConfig,
    video::{
        DecodeSink, Framerate, RelayError, SeekController, SessionContext, StreamError,
        StreamEvent, attach_relay,
    },
};

use super::{Pipeline, RelayPipelineBuilder};

/// The element name a session gives its source element so the relay can
/// find and configure it
pub const SESSION_SRC_NAME: &str = "relay-src";

/// Process wide state for one streaming channel
///
/// Holds the decode pipeline, the name of the shared decode sink every
/// session reads from, and the seek controller bound to the channel's
/// start offset. Built once at bootstrap; the media server attaches and
/// detaches sessions against it for as long as the process serves the
/// channel.
///
/// ## Examples
///
/// ```no_run
/// use stream_relay::{RelayPipeline, StreamConfig};
///
/// stream_relay::gst::init().unwrap();
///
/// let config = StreamConfig::from_json_file("channel.json").unwrap();
/// let relay = RelayPipeline::from_config(&config).unwrap();
///
/// let _watch = relay.watch_bus().unwrap();
/// relay.play().unwrap();
/// // hand `relay` to the media server, which calls `configure_session`
/// // with each new session's element tree
/// ```
#[derive(Debug)]
pub struct RelayPipeline {
    pipe: Pipeline,
    decode_sink: String,
    rate: Framerate,
    max_bytes: u64,
    controller: SeekController,
}

impl RelayPipeline {
    pub(crate) fn new(
        pipe: Pipeline,
        decode_sink: String,
        rate: Framerate,
        max_bytes: u64,
        controller: SeekController,
    ) -> Self {
        Self {
            pipe,
            decode_sink,
            rate,
            max_bytes,
            controller,
        }
    }

    /// Uses the builder API to bring up the channel with its configured
    /// defaults
    pub fn from_config(config: &StreamConfig) -> Result<RelayPipeline, RelayError> {
        RelayPipelineBuilder::from_config(config)?.build()
    }

    /// Sets the pipeline to the [gst::State::Playing] state
    pub fn play(&self) -> Result<(), StreamError> {
        self.pipe.play()
    }

    /// Sets the pipeline to the [gst::State::Paused] state
    pub fn pause(&self) -> Result<(), StreamError> {
        self.pipe.pause()
    }

    /// Sets the pipeline to the [gst::State::Null] state
    ///
    /// This is required to stop any memory leaks when the channel ends
    pub fn close(&self) -> Result<(), StreamError> {
        self.pipe.close()
    }

    /// The seek controller bound to this channel's start offset
    pub const fn controller(&self) -> &SeekController {
        &self.controller
    }

    /// Returns the shared [AppSink] from the stored information about the
    /// sink. This is assumed to never fail, relying on the setup to be
    /// correct
    pub fn decode_sink(&self) -> AppSink {
        self.pipe
            .raw()
            .by_name(&self.decode_sink)
            .expect("Decode sink element not found")
            .downcast::<AppSink>()
            .expect("Sink element is expected to be an appsink!")
    }

    /// Installs the lifecycle handler on the pipeline bus
    ///
    /// Every stream start seeks to the channel's start offset; end of
    /// stream seeks again only when the channel loops. The handler stays
    /// attached for the life of the returned guard and ignores all other
    /// bus traffic. Dispatch happens on the main loop the surrounding
    /// server runs, never on a streaming thread.
    pub fn watch_bus(&self) -> Result<gst::bus::BusWatchGuard, glib::BoolError> {
        let bus = self
            .pipe
            .raw()
            .bus()
            .expect("Failed to get pipeline bus. Shouldn't happen!");

        let pipe = self.pipe.clone();
        let controller = self.controller;

        bus.add_watch(move |_, msg| {
            match msg.view() {
                gst::MessageView::StreamStart(_) => controller.handle(StreamEvent::Started, &pipe),
                gst::MessageView::Eos(_) => controller.handle(StreamEvent::EndOfStream, &pipe),
                _ => {}
            }

            glib::ControlFlow::Continue
        })
    }

    /// Configures a freshly created session to be fed by this channel
    ///
    /// Called by the media server whenever a client attaches: looks up
    /// the session's source element by [SESSION_SRC_NAME], switches it to
    /// explicit timestamps, hands it the decode side's buffering capacity
    /// and installs a fresh [SessionContext] on its demand signal, with
    /// the output clock back at zero.
    ///
    /// Teardown is the server's side of the contract: demand delivery
    /// must stop before the session's elements are dropped.
    pub fn configure_session<B: IsA<gst::Bin>>(&self, session: &B) -> Result<(), RelayError> {
        let appsrc = session
            .by_name(SESSION_SRC_NAME)
            .ok_or(RelayError::MissingElement(SESSION_SRC_NAME))?
            .downcast::<AppSrc>()
            .expect("Session source is expected to be an appsrc!");

        appsrc.set_format(gst::Format::Time);
        appsrc.set_max_bytes(self.max_bytes);

        let ctx = SessionContext::new(DecodeSink::new(self.decode_sink()), self.rate);
        attach_relay(&appsrc, ctx);

        debug!("session source configured at {} fps", self.rate);
        Ok(())
    }
}
