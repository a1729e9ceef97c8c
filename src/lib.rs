pub mod chart;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod types;

pub use error::{ChartError, Result};
pub use pipeline::{Pipeline, PipelineOutput, PipelineReport};
pub use types::{CleanTable, Domain, Record};
