//! Export and import document format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::dedupe_preserving_order;

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub urls: Vec<String>,
    #[serde(rename = "exportDate")]
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExportDocument {
    pub fn new(urls: Vec<String>, exported_at: DateTime<Utc>) -> Self {
        Self {
            urls,
            export_date: exported_at,
            version: EXPORT_VERSION.to_string(),
        }
    }

    /// File name embedding the export time in Unix milliseconds.
    pub fn filename(&self) -> String {
        format!("videowall_{}.json", self.export_date.timestamp_millis())
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("invalid json: {0}")]
    Parse(String),
    #[error("document has no `urls` array")]
    MissingUrls,
}

/// Extracts the address list from an import document.
///
/// Any JSON object with an array-valued `urls` field is accepted; other
/// fields are ignored. Elements are not type-checked: strings are taken as-is
/// and anything else is kept as its JSON text. Repeated addresses are dropped.
pub fn parse_import(text: &str) -> Result<Vec<String>, ImportError> {
    let document: Value =
        serde_json::from_str(text).map_err(|err| ImportError::Parse(err.to_string()))?;
    let Some(Value::Array(items)) = document.get("urls") else {
        return Err(ImportError::MissingUrls);
    };
    let urls = items
        .iter()
        .map(|item| match item {
            Value::String(url) => url.clone(),
            other => other.to_string(),
        })
        .collect();
    Ok(dedupe_preserving_order(urls))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn export_uses_camel_case_date_and_fixed_version() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let doc = ExportDocument::new(vec!["a.m3u8".to_string()], at);
        let value: Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["version"], "1.0");
        assert_eq!(value["urls"][0], "a.m3u8");
        assert!(value["exportDate"].as_str().unwrap().starts_with("2024-05-01T12:00:00"));
        assert_eq!(doc.filename(), "videowall_1714564800000.json");
    }

    #[test]
    fn import_rejects_missing_or_non_array_urls() {
        assert_eq!(parse_import("{}"), Err(ImportError::MissingUrls));
        assert_eq!(
            parse_import(r#"{"urls": "a.m3u8"}"#),
            Err(ImportError::MissingUrls)
        );
        assert_eq!(parse_import("[1, 2]"), Err(ImportError::MissingUrls));
        assert!(matches!(parse_import("not json"), Err(ImportError::Parse(_))));
    }

    #[test]
    fn import_keeps_non_string_elements_as_text() {
        let urls = parse_import(r#"{"urls": ["a.m3u8", 7, "a.m3u8"]}"#).unwrap();
        assert_eq!(urls, vec!["a.m3u8", "7"]);
    }
}
