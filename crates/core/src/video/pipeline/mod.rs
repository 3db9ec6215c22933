mod builder;
mod relay_pipeline;
pub mod wrappers;

pub use builder::*;
pub use relay_pipeline::*;
pub use wrappers::*;
