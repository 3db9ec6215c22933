use thiserror::Error;

use crate::config::ConfigError;

use super::pipeline::BuilderError;

pub type StreamError = glib::Error;

/// These are all the different types of errors which could arise while
/// bringing up or driving a relay.
///
/// While not always used directly, it can be useful when you are doing
/// everything in one function and just want a catch all.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Builder(#[from] BuilderError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// The session's element tree does not carry a source element under
    /// the name the relay looks it up by
    #[error("no element named {0:?} in the session")]
    MissingElement(&'static str),
}
