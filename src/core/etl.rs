use crate::core::{Pipeline, RunReport};
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        tracing::info!("Starting order history scrape...");

        // Extract
        let raw_data = self.pipeline.extract().await?;

        // Transform
        tracing::debug!("Serializing {} records", raw_data.records.len());
        let transformed = self.pipeline.transform(raw_data).await?;
        let records_written = transformed.records.len();
        let failures = transformed.failures.clone();

        // Load：兩個檔案都寫完才算成功
        let output_paths = self.pipeline.load(transformed).await?;
        for path in &output_paths {
            tracing::info!("📁 Output saved to: {}", path);
        }

        tracing::info!(
            "⏱️ Finished in {:?}: {} record(s) written",
            started.elapsed(),
            records_written
        );

        Ok(RunReport {
            output_paths,
            records_written,
            failures,
        })
    }
}
