use crate::domain::ports::{ConfigProvider, PageSource};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// 帶 cookie 的訂單歷史頁面抓取器
///
/// 所有 filter 共用同一個 semaphore，限制同時進行中的請求數。
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
    endpoint: String,
    credential: String,
    page_size: u32,
    headers: Vec<(String, String)>,
    semaphore: Arc<Semaphore>,
}

impl HttpPageFetcher {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        credential: impl Into<String>,
        page_size: u32,
        max_in_flight: usize,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            credential: credential.into(),
            page_size,
            headers: Vec::new(),
            semaphore: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let fetcher = Self::new(
            client,
            config.endpoint(),
            config.credential(),
            config.page_size(),
            config.concurrent_requests(),
        );

        Ok(config
            .extra_headers()
            .into_iter()
            .fold(fetcher, |fetcher, (name, value)| fetcher.with_header(name, value)))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn start_index(&self, page_index: u32) -> u64 {
        u64::from(page_index) * u64::from(self.page_size)
    }
}

#[async_trait]
impl PageSource for HttpPageFetcher {
    async fn fetch_page(&self, filter: &str, page_index: u32) -> Result<String> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| EtlError::ProcessingError {
                message: format!("Request limiter closed: {}", e),
            })?;

        let mut request = self
            .client
            .get(&self.endpoint)
            .header(COOKIE, self.credential.as_str())
            .query(&[
                ("orderFilter", filter.to_string()),
                ("startIndex", self.start_index(page_index).to_string()),
            ]);

        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        tracing::debug!(
            "📡 [filter=\"{}\" page={}] response status: {}",
            filter,
            page_index,
            response.status()
        );

        let markup = response.error_for_status()?.text().await?;
        Ok(markup)
    }
}
