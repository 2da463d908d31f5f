use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use url::Url;

/// 每個 filter 第一個請求 (startIndex=0) 的完整 URL，依 filter 順序
pub fn first_request_urls<C: ConfigProvider>(config: &C) -> Result<Vec<Url>> {
    config
        .filters()
        .iter()
        .map(|filter| {
            Url::parse_with_params(
                config.endpoint(),
                &[("orderFilter", filter.as_str()), ("startIndex", "0")],
            )
            .map_err(|e| EtlError::InvalidConfigValueError {
                field: "endpoint".to_string(),
                value: config.endpoint().to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;

    fn config(endpoint: &str) -> TomlConfig {
        let content = format!(
            r#"
[source]
endpoint = "{}"
cookie = "session-id=abc"

[extract]
filters = ["year-2020", "months-3"]
"#,
            endpoint
        );
        TomlConfig::from_toml_str(&content).unwrap()
    }

    #[test]
    fn test_first_request_urls_follow_filter_order() {
        let urls = first_request_urls(&config("https://orders.example.com/history")).unwrap();

        let urls: Vec<String> = urls.iter().map(Url::to_string).collect();
        assert_eq!(
            urls,
            vec![
                "https://orders.example.com/history?orderFilter=year-2020&startIndex=0",
                "https://orders.example.com/history?orderFilter=months-3&startIndex=0",
            ]
        );
    }

    #[test]
    fn test_existing_query_is_kept() {
        let urls = first_request_urls(&config("https://orders.example.com/history?ie=UTF8"))
            .unwrap();

        assert_eq!(
            urls[0].as_str(),
            "https://orders.example.com/history?ie=UTF8&orderFilter=year-2020&startIndex=0"
        );
    }

    #[test]
    fn test_invalid_endpoint_is_reported() {
        let result = first_request_urls(&config("not a url"));

        assert!(matches!(
            result,
            Err(EtlError::InvalidConfigValueError { field, .. }) if field == "endpoint"
        ));
    }
}
