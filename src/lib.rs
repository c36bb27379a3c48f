pub mod anonymize;
pub mod config;
pub mod dedup;
pub mod error;
pub mod flatten;
pub mod lookup;
pub mod model;
pub mod rank;
pub mod reader;
pub mod writer;

pub use config::PipelineConfig;
pub use error::{CleanError, Result};
pub use model::Table;
