pub mod config;
pub mod time;
pub mod video;

pub use config::StreamConfig;
pub use time::{TimeOfDay, Timestamp};
pub use video::RelayPipeline;

pub use gst;
