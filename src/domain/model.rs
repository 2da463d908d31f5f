use serde::{Deserialize, Serialize};

/// 單筆訂單項目：標題與原始價格字串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub title: String,
    /// 頁面上的原始價格 token（例如 `12,99`），不做正規化
    pub price: String,
}

impl OrderRecord {
    /// 欄位名稱，依序作為 TSV 標頭
    pub const FIELDS: [&'static str; 2] = ["title", "price"];

    pub fn new(title: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
        }
    }
}

/// 單一頁面解析結果，格式錯誤的列保留為 `None`
pub type PageRows = Vec<Option<OrderRecord>>;

/// 失敗時的處理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 任何 filter 失敗即中止整個執行，不寫出任何檔案
    #[default]
    Abort,
    /// 記錄失敗的 filter / 頁面，仍寫出成功的部分
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub filter: String,
    /// `None` 表示在分頁前就失敗（第 0 頁或頁數無法取得）
    pub page: Option<u32>,
    pub message: String,
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.page {
            Some(page) => write!(
                f,
                "[filter=\"{}\" page={}] {}",
                self.filter, page, self.message
            ),
            None => write!(f, "[filter=\"{}\"] {}", self.filter, self.message),
        }
    }
}

/// 單一 filter 在容錯模式下的結果
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub rows: PageRows,
    pub failures: Vec<FetchFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub records: Vec<OrderRecord>,
    pub failures: Vec<FetchFailure>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<OrderRecord>,
    pub json_output: String,
    pub tsv_output: String,
    pub failures: Vec<FetchFailure>,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_paths: Vec<String>,
    pub records_written: usize,
    pub failures: Vec<FetchFailure>,
}

impl RunReport {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// 部分成功時以 2 結束，讓呼叫端能分辨不完整的輸出
    pub fn exit_code(&self) -> i32 {
        if self.is_partial() {
            2
        } else {
            0
        }
    }
}

pub const DEFAULT_ORDER_ROW_SELECTOR: &str =
    ".order .a-fixed-left-grid > .a-fixed-left-grid-inner > .a-fixed-left-grid-col.a-col-right";
pub const DEFAULT_ORDER_COUNT_SELECTOR: &str = ".num-orders";
pub const DEFAULT_TITLE_SELECTOR: &str = ".a-row > a";
pub const DEFAULT_PRICE_SELECTOR: &str = ".a-row > span.a-size-small.a-color-price";

/// 頁面結構的 CSS selector 設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub order_row: String,
    pub order_count: String,
    pub title: String,
    pub price: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            order_row: DEFAULT_ORDER_ROW_SELECTOR.to_string(),
            order_count: DEFAULT_ORDER_COUNT_SELECTOR.to_string(),
            title: DEFAULT_TITLE_SELECTOR.to_string(),
            price: DEFAULT_PRICE_SELECTOR.to_string(),
        }
    }
}
