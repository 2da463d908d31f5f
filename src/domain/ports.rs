use crate::domain::model::{FailurePolicy, RunResult, SelectorConfig, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_JSON_FILENAME: &str = "output.json";
pub const DEFAULT_CSV_FILENAME: &str = "output.csv";

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn credential(&self) -> &str;
    fn filters(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn concurrent_requests(&self) -> usize;

    fn page_size(&self) -> u32 {
        DEFAULT_PAGE_SIZE
    }

    fn request_timeout(&self) -> Option<Duration> {
        None
    }

    fn extra_headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn selectors(&self) -> SelectorConfig {
        SelectorConfig::default()
    }

    fn json_filename(&self) -> &str {
        DEFAULT_JSON_FILENAME
    }

    fn csv_filename(&self) -> &str {
        DEFAULT_CSV_FILENAME
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Abort
    }
}

/// 依 filter 與頁碼取得原始 HTML
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, filter: &str, page_index: u32) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RunResult>;
    async fn transform(&self, data: RunResult) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<Vec<String>>;
}
