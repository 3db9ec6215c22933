#![allow(dead_code)]

use std::{collections::VecDeque, sync::Mutex};

use stream_relay::{
    time::Timestamp,
    video::{FrameSource, Seekable, StreamError},
};

/// A scripted stand in for the shared decode sink: each pull consumes one
/// entry, with [None] modelling a demand cycle where nothing was ready
pub struct ScriptedSource {
    script: VecDeque<Option<u32>>,
}

impl ScriptedSource {
    pub fn new<I: IntoIterator<Item = Option<u32>>>(script: I) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// A source with `frames` numbered frames ready and nothing after
    pub fn ready(frames: u32) -> Self {
        Self::new((0..frames).map(Some))
    }
}

impl FrameSource for ScriptedSource {
    type Frame = u32;

    fn pull_frame(&mut self) -> Option<u32> {
        self.script.pop_front().flatten()
    }
}

/// Records every seek it is asked for, optionally refusing them all
pub struct RecordingPipe {
    seeks: Mutex<Vec<Timestamp>>,
    reject: bool,
}

impl RecordingPipe {
    pub fn new() -> Self {
        Self {
            seeks: Mutex::new(Vec::new()),
            reject: false,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::new()
        }
    }

    pub fn seeks(&self) -> Vec<Timestamp> {
        self.seeks.lock().unwrap().clone()
    }
}

impl Seekable for RecordingPipe {
    fn seek_to(&self, target: Timestamp) -> Result<(), StreamError> {
        self.seeks.lock().unwrap().push(target);

        if self.reject {
            Err(glib::Error::new(
                gst::CoreError::Seek,
                "scripted seek rejection",
            ))
        } else {
            Ok(())
        }
    }
}
