//! CLI library components for the pending-lab analysis tool.

pub mod logging;
pub mod pipeline;
pub mod summary;
