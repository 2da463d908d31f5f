use crate::adapters::http::HttpPageFetcher;
use crate::core::orchestrator::FilterOrchestrator;
use crate::core::output::{to_json, to_tsv};
use crate::core::parser::OrderSelectors;
use crate::core::{ConfigProvider, PageSource, Pipeline, RunResult, Storage, TransformResult};
use crate::domain::model::FailurePolicy;
use crate::utils::error::Result;
use futures::future::{join_all, try_join_all};
use std::path::Path;

/// 依設定抓取所有 filter 並輸出 JSON 與 TSV
pub struct OrderPipeline<S: Storage, C: ConfigProvider, P: PageSource> {
    storage: S,
    config: C,
    orchestrator: FilterOrchestrator<P>,
}

impl<S: Storage, C: ConfigProvider> OrderPipeline<S, C, HttpPageFetcher> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let fetcher = HttpPageFetcher::from_config(&config)?;
        Self::with_source(storage, config, fetcher)
    }
}

impl<S: Storage, C: ConfigProvider, P: PageSource> OrderPipeline<S, C, P> {
    pub fn with_source(storage: S, config: C, source: P) -> Result<Self> {
        let selectors = OrderSelectors::new(&config.selectors())?;
        let orchestrator = FilterOrchestrator::new(source, selectors, config.page_size());

        Ok(Self {
            storage,
            config,
            orchestrator,
        })
    }

    fn output_location(&self, filename: &str) -> String {
        Path::new(self.config.output_path())
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, P: PageSource> Pipeline for OrderPipeline<S, C, P> {
    async fn extract(&self) -> Result<RunResult> {
        let filters = self.config.filters();
        tracing::info!(
            "🚀 Scraping {} filter(s), at most {} request(s) in flight",
            filters.len(),
            self.config.concurrent_requests()
        );

        let mut result = RunResult::default();

        match self.config.failure_policy() {
            FailurePolicy::Abort => {
                let per_filter =
                    try_join_all(filters.iter().map(|f| self.orchestrator.fetch_orders(f))).await?;

                result.records = per_filter.into_iter().flatten().flatten().collect();
            }
            FailurePolicy::Continue => {
                let outcomes = join_all(
                    filters
                        .iter()
                        .map(|f| self.orchestrator.fetch_orders_tolerant(f)),
                )
                .await;

                for outcome in outcomes {
                    result.records.extend(outcome.rows.into_iter().flatten());
                    result.failures.extend(outcome.failures);
                }
            }
        }

        tracing::info!(
            "📦 Extracted {} order record(s), {} failure(s)",
            result.records.len(),
            result.failures.len()
        );
        Ok(result)
    }

    async fn transform(&self, data: RunResult) -> Result<TransformResult> {
        let json_output = to_json(&data.records)?;
        let tsv_output = to_tsv(&data.records)?;

        Ok(TransformResult {
            records: data.records,
            json_output,
            tsv_output,
            failures: data.failures,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<Vec<String>> {
        let json_name = self.config.json_filename();
        let csv_name = self.config.csv_filename();

        self.storage
            .write_file(json_name, result.json_output.as_bytes())
            .await?;
        tracing::debug!("💾 Wrote {} ({} bytes)", json_name, result.json_output.len());

        self.storage
            .write_file(csv_name, result.tsv_output.as_bytes())
            .await?;
        tracing::debug!("💾 Wrote {} ({} bytes)", csv_name, result.tsv_output.len());

        Ok(vec![
            self.output_location(json_name),
            self.output_location(csv_name),
        ])
    }
}
