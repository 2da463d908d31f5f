#[cfg(feature = "cli")]
pub mod cli;
pub mod dry_run;
pub mod toml_config;

pub const DEFAULT_ENDPOINT: &str = "https://www.amazon.es/gp/css/order-history";
pub const DEFAULT_OUTPUT_PATH: &str = ".";
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;
