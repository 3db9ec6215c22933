//! Stores basic wrappers around the GStreamer library

use gst::{
    MessageView, SeekFlags, StateChangeSuccess,
    prelude::{ElementExt, ElementExtManual},
};

use crate::{
    time::Timestamp,
    video::{Seekable, StreamError},
};

/// Drain all messages from the bus, keeping track of eos and error.
/// (This prevents messages piling up and causing memory leaks)
pub fn get_bus_errors(bus: &gst::Bus) -> impl Iterator<Item = glib::Error> + '_ {
    let errs_warns = [gst::MessageType::Error, gst::MessageType::Warning];

    std::iter::from_fn(move || bus.pop_filtered(&errs_warns).map(into_glib_error))
}

fn into_glib_error(msg: gst::Message) -> glib::Error {
    match msg.view() {
        MessageView::Error(e) => e.error(),
        MessageView::Warning(w) => w.error(),
        _ => {
            panic!("Only Warning and Error messages can be converted into GstreamerError")
        }
    }
}

fn change_state_blocking(pipeline: &gst::Pipeline, new_state: gst::State) -> Result<(), StreamError> {
    let timeout = gst::ClockTime::SECOND;

    let state_change_error = match pipeline.set_state(new_state) {
        Ok(StateChangeSuccess::Success | StateChangeSuccess::NoPreroll) => return Ok(()),
        Ok(StateChangeSuccess::Async) => {
            let (result, _curr, _pending) = pipeline.state(timeout);
            match result {
                Ok(StateChangeSuccess::Success | StateChangeSuccess::NoPreroll) => return Ok(()),

                // state change failed within timeout. Treat as error
                Ok(StateChangeSuccess::Async) => None,
                Err(e) => Some(e),
            }
        }

        Err(e) => Some(e),
    };

    // If there was any error then return that.
    // If no error but timed out then say so.
    // If no error and no timeout then any report will do.
    let error: glib::Error =
        match get_bus_errors(&pipeline.bus().expect("failed to get gst bus")).next() {
            Some(e) => e,
            _ => {
                if let Some(_e) = state_change_error {
                    glib::Error::new(gst::CoreError::TooLazy, "Gstreamer State Change Error")
                } else {
                    glib::Error::new(gst::CoreError::TooLazy, "Internal Gstreamer error")
                }
            }
        };

    if new_state == gst::State::Null {
        return Err(error);
    }

    // Before returning, close down the pipeline to prevent memory leaks.
    // But if the pipeline can't close, cause a panic (preferable to memory leak)
    match change_state_blocking(pipeline, gst::State::Null) {
        Ok(()) => Err(error),
        Err(e) => panic!("{e:?}"),
    }
}

/// This is a friendly wrapper around [gst::Pipeline]
///
/// Note this does not implement [Drop] so that it can be cloned into the
/// bus watch and shared; call [Self::close] when the channel is done with
/// it
#[derive(Debug, Clone)]
pub struct Pipeline(pub(super) gst::Pipeline);

impl Pipeline {
    pub const fn raw(&self) -> &gst::Pipeline {
        &self.0
    }

    /// Sets the pipeline to the [gst::State::Paused] state
    pub fn pause(&self) -> Result<(), StreamError> {
        change_state_blocking(&self.0, gst::State::Paused)
    }

    /// Sets the pipeline to the [gst::State::Playing] state
    pub fn play(&self) -> Result<(), StreamError> {
        change_state_blocking(&self.0, gst::State::Playing)
    }

    /// Sets the pipeline to the [gst::State::Null] state
    ///
    /// This is required to stop any memory leaks when the pipeline ends
    pub fn close(&self) -> Result<(), StreamError> {
        change_state_blocking(&self.0, gst::State::Null)
    }

    /// Flushing seek to an absolute position, keeping the playback rate
    ///
    /// Anything buffered but not yet played is discarded so output
    /// resumes exactly at the target.
    pub fn seek_flushing(&self, target: Timestamp) -> Result<(), StreamError> {
        self.0
            .seek_simple(SeekFlags::FLUSH, gst::ClockTime::from(target))
            .map_err(|e| glib::Error::new(gst::CoreError::Seek, &e.message))
    }
}

impl Seekable for Pipeline {
    fn seek_to(&self, target: Timestamp) -> Result<(), StreamError> {
        self.seek_flushing(target)
    }
}

impl From<gst::Pipeline> for Pipeline {
    fn from(value: gst::Pipeline) -> Self {
        Self(value)
    }
}
