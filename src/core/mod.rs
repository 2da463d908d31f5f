pub mod etl;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod fixtures;

pub use crate::domain::model::{OrderRecord, RunReport, RunResult, TransformResult};
pub use crate::domain::ports::{ConfigProvider, PageSource, Pipeline, Storage};
pub use crate::utils::error::Result;
