//! This stores the builder for [RelayPipeline]

use glib::object::Cast;
use gst::{ElementFactory, element_factory::ElementBuilder, prelude::GstObjectExt};
use gst_app::{AppSink, app_sink::AppSinkBuilder};

use crate::{
    config::StreamConfig,
    time::Timestamp,
    video::{Framerate, RelayError, SeekController},
};

use super::{Pipeline, RelayPipeline};

pub type BuilderError = glib::BoolError;

/// Assembles the decode side of one channel: a `playbin` pointed at the
/// recorded asset, draining into a named appsink that every attached
/// session pulls its frames from.
///
/// ## Examples
///
/// ### Bring up a channel from its configuration
///
/// ```no_run
/// use stream_relay::{StreamConfig, video::RelayPipelineBuilder};
///
/// stream_relay::gst::init().unwrap();
///
/// let config = StreamConfig::from_json_file("channel.json").unwrap();
/// let relay = RelayPipelineBuilder::from_config(&config).unwrap().build().unwrap();
/// ```
///
/// ### Use a custom sink name
///
/// ```no_run
/// use stream_relay::{StreamConfig, video::RelayPipelineBuilder};
///
/// stream_relay::gst::init().unwrap();
///
/// # let config = StreamConfig::from_json_file("channel.json").unwrap();
/// let relay = RelayPipelineBuilder::from_config(&config)
///     .unwrap()
///     .with_decode_sink_name("my_decode_sink")
///     .build()
///     .unwrap();
/// ```
///
/// ## Pipeline created
///
/// ```txt
/// playbin uri=file://<input> video-sink=<decode sink appsink>
/// ```
///
/// The appsink is synced to the clock so decode is paced like a player
/// would pace it, and sessions pull from it on demand.
pub struct RelayPipelineBuilder<'a> {
    /// The playback element for the recorded asset
    pub src: ElementBuilder<'a>,
    /// The shared sink sessions pull decoded frames from
    pub decode_sink: AppSinkBuilder,

    rate: Framerate,
    target: Timestamp,
    max_bytes: u64,
    loop_on_eos: bool,
}

impl RelayPipelineBuilder<'_> {
    /// Starts a builder for the given channel, checking the asset is
    /// reachable and resolving the seek target before any element exists
    pub fn from_config(config: &StreamConfig) -> Result<Self, RelayError> {
        config.check_input()?;
        let target = config.seek_target()?;

        Ok(Self {
            src: ElementFactory::make("playbin")
                .property("uri", format!("file://{}", config.input.display())),
            decode_sink: AppSink::builder().name("decode-sink").sync(true),
            rate: config.frame_rate,
            target,
            max_bytes: config.max_bytes,
            loop_on_eos: config.loop_on_eos,
        })
    }

    /// Sets the appsink name sessions look the decode sink up by
    pub fn with_decode_sink_name<S: ToString>(mut self, sink_name: S) -> Self {
        self.decode_sink = self.decode_sink.name(sink_name.to_string());
        self
    }

    /// Overrides the output rate the channel configuration asked for
    pub fn with_frame_rate(mut self, rate: Framerate) -> Self {
        self.rate = rate;
        self
    }

    /// Puts all the arguments into a [RelayPipeline] object to then be
    /// used by the media server's session hooks
    pub fn build(self) -> Result<RelayPipeline, RelayError> {
        let decode_sink = self.decode_sink.build();
        let decode_sink_name = decode_sink.name().to_string();

        let playbin = self.src.property("video-sink", decode_sink.clone()).build()?;
        let pipe = playbin
            .downcast::<gst::Pipeline>()
            .expect("playbin is expected to be a pipeline!");

        Ok(RelayPipeline::new(
            Pipeline::from(pipe),
            decode_sink_name,
            self.rate,
            self.max_bytes,
            SeekController::new(self.target, self.loop_on_eos),
        ))
    }
}
