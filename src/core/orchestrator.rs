use crate::core::parser::{parse_orders, parse_page_count, OrderSelectors};
use crate::domain::model::{FetchFailure, FilterOutcome, PageRows};
use crate::domain::ports::PageSource;
use crate::utils::error::{EtlError, Result};
use futures::future::{join_all, try_join_all};

/// 單一 filter 的抓取流程：第 0 頁取得頁數，其餘頁面並行抓取
pub struct FilterOrchestrator<P: PageSource> {
    source: P,
    selectors: OrderSelectors,
    page_size: u32,
}

impl<P: PageSource> FilterOrchestrator<P> {
    pub fn new(source: P, selectors: OrderSelectors, page_size: u32) -> Self {
        Self {
            source,
            selectors,
            page_size,
        }
    }

    /// 抓取第 0 頁並解析頁數，回傳頁數與第 0 頁的 HTML
    async fn first_page(&self, filter: &str) -> Result<(u32, String)> {
        tracing::info!("📡 Fetching page count [filter=\"{}\"]", filter);
        let markup = self.source.fetch_page(filter, 0).await?;

        let page_count = parse_page_count(&markup, &self.selectors, self.page_size)
            .ok_or_else(|| EtlError::PageCountUnavailable {
                filter: filter.to_string(),
            })?;

        tracing::info!("📄 [filter=\"{}\"] {} page(s) to fetch", filter, page_count);
        Ok((page_count, markup))
    }

    async fn fetch_rows(&self, filter: &str, page_index: u32) -> Result<PageRows> {
        tracing::info!("📡 Fetching [filter=\"{}\" page={}]", filter, page_index);
        let markup = self.source.fetch_page(filter, page_index).await?;
        Ok(self.parse_rows(filter, page_index, &markup))
    }

    fn parse_rows(&self, filter: &str, page_index: u32, markup: &str) -> PageRows {
        let rows = parse_orders(markup, &self.selectors);
        let kept = rows.iter().filter(|row| row.is_some()).count();

        tracing::info!(
            "✅ Done [filter=\"{}\" page={}] {} of {} row(s) kept",
            filter,
            page_index,
            kept,
            rows.len()
        );

        rows
    }

    /// 抓取一個 filter 的所有頁面
    ///
    /// 結果依頁碼排列，與請求完成的先後無關。任何一頁失敗即整個 filter 失敗。
    pub async fn fetch_orders(&self, filter: &str) -> Result<PageRows> {
        let (page_count, first_markup) = self.first_page(filter).await?;

        // 第 0 頁已經抓過，不再重複請求
        let mut rows = self.parse_rows(filter, 0, &first_markup);
        let remaining =
            try_join_all((1..page_count).map(|page| self.fetch_rows(filter, page))).await?;

        rows.extend(remaining.into_iter().flatten());
        Ok(rows)
    }

    /// 容錯版本：失敗的頁面記錄為 `FetchFailure`，成功頁面的資料照常保留
    pub async fn fetch_orders_tolerant(&self, filter: &str) -> FilterOutcome {
        let (page_count, first_markup) = match self.first_page(filter).await {
            Ok(first) => first,
            Err(e) => {
                tracing::warn!("⚠️ [filter=\"{}\"] skipped: {}", filter, e);
                return FilterOutcome {
                    rows: Vec::new(),
                    failures: vec![FetchFailure {
                        filter: filter.to_string(),
                        page: None,
                        message: e.to_string(),
                    }],
                };
            }
        };

        let mut outcome = FilterOutcome {
            rows: self.parse_rows(filter, 0, &first_markup),
            failures: Vec::new(),
        };

        let pages = join_all((1..page_count).map(|page| async move {
            (page, self.fetch_rows(filter, page).await)
        }))
        .await;

        for (page, result) in pages {
            match result {
                Ok(rows) => outcome.rows.extend(rows),
                Err(e) => {
                    tracing::warn!("⚠️ [filter=\"{}\" page={}] failed: {}", filter, page, e);
                    outcome.failures.push(FetchFailure {
                        filter: filter.to_string(),
                        page: Some(page),
                        message: e.to_string(),
                    });
                }
            }
        }

        outcome
    }
}
