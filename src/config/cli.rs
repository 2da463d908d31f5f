use super::toml_config::TomlConfig;
use super::{DEFAULT_CONCURRENT_REQUESTS, DEFAULT_ENDPOINT, DEFAULT_OUTPUT_PATH};
use crate::domain::model::FailurePolicy;
use crate::domain::ports::{ConfigProvider, DEFAULT_PAGE_SIZE};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_filters, validate_non_empty_string, validate_path, validate_positive_number,
    validate_required_field, validate_url, Validate,
};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "order-history-etl")]
#[command(about = "Scrape order history pages into JSON and tab-delimited files")]
pub struct CliConfig {
    /// Path to a TOML configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<String>,

    /// Order history page URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Session cookie copied from a logged-in browser
    #[arg(long, env = "ORDER_HISTORY_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Order filters to scrape, e.g. year-2020,year-2019
    #[arg(long, value_delimiter = ',')]
    pub filters: Vec<String>,

    /// Orders listed per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Maximum number of requests in flight
    #[arg(long)]
    pub concurrent_requests: Option<usize>,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Directory for output.json and output.csv
    #[arg(long)]
    pub output_path: Option<String>,

    /// Write whatever succeeded instead of aborting on the first failed filter
    #[arg(long)]
    pub keep_going: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Show what would be scraped without sending any request
    #[arg(long)]
    pub dry_run: bool,
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn credential(&self) -> &str {
        self.cookie.as_deref().unwrap_or("")
    }

    fn filters(&self) -> &[String] {
        &self.filters
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }

    fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn failure_policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", self.endpoint())?;
        let cookie = validate_required_field("cookie", &self.cookie)?;
        validate_non_empty_string("cookie", cookie)?;
        validate_filters("filters", &self.filters)?;
        validate_positive_number("page_size", self.page_size() as usize, 1)?;
        validate_positive_number("concurrent_requests", self.concurrent_requests(), 1)?;
        validate_path("output_path", self.output_path())?;
        Ok(())
    }
}

impl TomlConfig {
    /// 命令列參數覆蓋設定檔中的值（只覆蓋有明確指定的部分）
    pub fn apply_cli_overrides(&mut self, cli: &CliConfig) {
        if let Some(endpoint) = &cli.endpoint {
            self.source.endpoint = endpoint.clone();
        }
        if let Some(cookie) = &cli.cookie {
            self.source.cookie = Some(cookie.clone());
        }
        if let Some(timeout) = cli.timeout_seconds {
            self.source.timeout_seconds = Some(timeout);
        }
        if !cli.filters.is_empty() {
            self.extract.filters = cli.filters.clone();
        }
        if let Some(page_size) = cli.page_size {
            self.extract.page_size = Some(page_size);
        }
        if let Some(concurrent) = cli.concurrent_requests {
            self.extract.concurrent_requests = Some(concurrent);
        }
        if let Some(output_path) = &cli.output_path {
            self.load.output_path = output_path.clone();
        }
        if cli.keep_going {
            self.error_handling
                .get_or_insert_with(Default::default)
                .on_failure = Some(FailurePolicy::Continue);
        }
    }
}
