//! HTML 解析：訂單數量與訂單列
//!
//! 每頁只解析一次，之後所有查詢都在該頁的 element 範圍內進行。

use crate::domain::model::{OrderRecord, PageRows, SelectorConfig};
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

// 模仿 parseInt / parseFloat 只看開頭的數字
static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?(\d+)").expect("valid integer pattern"));
static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(Infinity|\d+(\.\d*)?|\.\d+)").expect("valid float pattern")
});

/// 編譯後的 selector，整個執行期間共用
#[derive(Debug, Clone)]
pub struct OrderSelectors {
    order_row: Selector,
    order_count: Selector,
    title: Selector,
    price: Selector,
}

impl OrderSelectors {
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            order_row: compile(&config.order_row)?,
            order_count: compile(&config.order_count)?,
            title: compile(&config.title)?,
            price: compile(&config.price)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| EtlError::SelectorError {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

fn element_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .flat_map(|el| el.text())
        .collect()
}

/// 解析訂單總數並換算成頁數（無條件進位）
///
/// 找不到元素、沒有數字、或總數為 0 時回傳 `None`。
pub fn parse_page_count(markup: &str, selectors: &OrderSelectors, page_size: u32) -> Option<u32> {
    let document = Html::parse_document(markup);
    let element = document.select(&selectors.order_count).next()?;
    let text: String = element.text().collect();

    let amount = text.split_whitespace().next()?;
    let digits = LEADING_INTEGER.captures(amount)?.get(1)?.as_str();
    let total: u64 = digits.parse().ok()?;

    if total == 0 || page_size == 0 {
        return None;
    }

    u32::try_from(total.div_ceil(u64::from(page_size))).ok()
}

/// 解析一頁中的所有訂單列
///
/// 回傳的順序與頁面相同；價格欄缺少第二個 token 或不是數字的列以 `None` 保留。
pub fn parse_orders(markup: &str, selectors: &OrderSelectors) -> PageRows {
    let document = Html::parse_document(markup);

    document
        .select(&selectors.order_row)
        .map(|row| parse_row(row, selectors))
        .collect()
}

fn parse_row(row: ElementRef<'_>, selectors: &OrderSelectors) -> Option<OrderRecord> {
    let title = element_text(row, &selectors.title);
    let raw_price = element_text(row, &selectors.price);

    // 第一個 token 是幣別符號
    let price = raw_price.split_whitespace().nth(1)?;
    if !is_numeric_price(price) {
        return None;
    }

    Some(OrderRecord::new(title.trim(), price))
}

/// 逗號小數點先換成句點，只要開頭能讀出浮點數就算數字
pub fn is_numeric_price(token: &str) -> bool {
    let normalized = token.replacen(',', ".", 1);
    LEADING_FLOAT.is_match(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::{listing_page, order_row};

    fn selectors() -> OrderSelectors {
        OrderSelectors::new(&SelectorConfig::default()).unwrap()
    }

    #[test]
    fn test_page_count_rounds_up() {
        let sel = selectors();
        assert_eq!(parse_page_count(&listing_page(Some("25 orders"), &[]), &sel, 10), Some(3));
        assert_eq!(parse_page_count(&listing_page(Some("30 orders"), &[]), &sel, 10), Some(3));
        assert_eq!(parse_page_count(&listing_page(Some("31 pedidos"), &[]), &sel, 10), Some(4));
    }

    #[test]
    fn test_page_count_single_order() {
        let page = listing_page(Some("1 order"), &[]);
        assert_eq!(parse_page_count(&page, &selectors(), 10), Some(1));
    }

    #[test]
    fn test_page_count_zero_or_missing_is_none() {
        let sel = selectors();
        assert_eq!(parse_page_count(&listing_page(Some("0 orders"), &[]), &sel, 10), None);
        assert_eq!(parse_page_count(&listing_page(None, &[]), &sel, 10), None);
        assert_eq!(parse_page_count(&listing_page(Some("   "), &[]), &sel, 10), None);
        assert_eq!(parse_page_count(&listing_page(Some("orders"), &[]), &sel, 10), None);
    }

    #[test]
    fn test_page_count_reads_leading_digits_only() {
        let page = listing_page(Some("12abc orders"), &[]);
        assert_eq!(parse_page_count(&page, &selectors(), 10), Some(2));
    }

    #[test]
    fn test_page_count_with_custom_page_size() {
        let page = listing_page(Some("25 orders"), &[]);
        assert_eq!(parse_page_count(&page, &selectors(), 5), Some(5));
    }

    #[test]
    fn test_parse_orders_keeps_markup_order_and_holes() {
        let page = listing_page(
            Some("3 orders"),
            &[
                order_row("  Book A ", "$ 12,99"),
                order_row("Bad Row", "$"),
                order_row("Book B", "EUR 7.50"),
            ],
        );

        let rows = parse_orders(&page, &selectors());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], Some(OrderRecord::new("Book A", "12,99")));
        assert_eq!(rows[1], None);
        assert_eq!(rows[2], Some(OrderRecord::new("Book B", "7.50")));
    }

    #[test]
    fn test_parse_orders_drops_non_numeric_price() {
        let page = listing_page(None, &[order_row("Gift card", "EUR abc")]);
        assert_eq!(parse_orders(&page, &selectors()), vec![None]);
    }

    #[test]
    fn test_parse_orders_stores_price_verbatim() {
        let page = listing_page(None, &[order_row("Lamp", "EUR 12,50")]);
        let rows = parse_orders(&page, &selectors());
        assert_eq!(rows[0].as_ref().unwrap().price, "12,50");
    }

    #[test]
    fn test_parse_orders_without_rows() {
        let page = listing_page(Some("0 orders"), &[]);
        assert!(parse_orders(&page, &selectors()).is_empty());
    }

    #[test]
    fn test_rows_outside_order_container_are_ignored() {
        let page = r#"<html><body>
            <div class="a-fixed-left-grid-col a-col-right">
              <div class="a-row"><a>Stray</a></div>
              <div class="a-row"><span class="a-size-small a-color-price">$ 1,00</span></div>
            </div>
        </body></html>"#;
        assert!(parse_orders(page, &selectors()).is_empty());
    }

    #[test]
    fn test_is_numeric_price() {
        assert!(is_numeric_price("12,50"));
        assert!(is_numeric_price("12.50"));
        assert!(is_numeric_price("12,99€"));
        assert!(is_numeric_price(",5"));
        assert!(!is_numeric_price("abc"));
        assert!(!is_numeric_price(""));
        assert!(!is_numeric_price("€12"));
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let config = SelectorConfig {
            order_row: "div[".to_string(),
            ..SelectorConfig::default()
        };

        match OrderSelectors::new(&config) {
            Err(EtlError::SelectorError { selector, .. }) => assert_eq!(selector, "div["),
            other => panic!("expected selector error, got {:?}", other.map(|_| ())),
        }
    }
}
