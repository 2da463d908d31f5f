//! 測試用的訂單列表頁面

/// 一筆符合預設 selector 結構的訂單列
pub fn order_row(title: &str, price: &str) -> String {
    format!(
        r#"<div class="order">
  <div class="a-fixed-left-grid">
    <div class="a-fixed-left-grid-inner">
      <div class="a-fixed-left-grid-col a-col-left"><img src="item.jpg"></div>
      <div class="a-fixed-left-grid-col a-col-right">
        <div class="a-row"><a class="a-link-normal" href="/item">{}</a></div>
        <div class="a-row"><span class="a-size-small a-color-price">{}</span></div>
      </div>
    </div>
  </div>
</div>"#,
        title, price
    )
}

/// 完整頁面；`count` 為 `None` 時不輸出訂單數量元素
pub fn listing_page(count: Option<&str>, rows: &[String]) -> String {
    let count = count
        .map(|text| format!(r#"<span class="num-orders">{}</span>"#, text))
        .unwrap_or_default();

    format!(
        "<html><head><title>Your Orders</title></head><body>\n{}\n{}\n</body></html>",
        count,
        rows.join("\n")
    )
}
