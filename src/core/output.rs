use crate::domain::model::OrderRecord;
use crate::utils::error::{EtlError, Result};

/// 兩格縮排的 JSON 陣列
pub fn to_json(records: &[OrderRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Tab 分隔輸出，第一列為欄位名稱
///
/// 沒有資料時仍會輸出標頭。欄位內含 tab、引號或換行時由 csv writer 加上引號。
pub fn to_tsv(records: &[OrderRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(OrderRecord::FIELDS)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush TSV writer: {}", e),
    })?;

    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("TSV output is not valid UTF-8: {}", e),
    })
}
