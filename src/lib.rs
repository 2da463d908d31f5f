pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{http::HttpPageFetcher, storage::LocalStorage};
pub use config::toml_config::TomlConfig;
pub use self::core::{etl::EtlEngine, pipeline::OrderPipeline};
pub use domain::model::{FailurePolicy, FetchFailure, OrderRecord, RunReport};
pub use utils::error::{EtlError, Result};
