//! Upstream data access
//!
//! Every dataset adapter describes what it wants as a [`SourceRequest`] and
//! hands it to a [`DataSource`]. In production that is [`HttpSource`]
//! (reqwest); tests substitute canned payloads.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};

/// A loosely-typed upstream JSON record
pub type Record = Map<String, Value>;

/// A CSV row keyed by header name
pub type CsvRow = HashMap<String, String>;

/// Which upstream host a request is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    /// Hong Kong Monetary Authority public API
    Hkma,
    /// Inland Revenue Department open data (CSV)
    Ird,
    /// Hong Kong Academy of Finance
    Aof,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hkma => "hkma",
            Self::Ird => "ird",
            Self::Aof => "aof",
        }
    }
}

/// A GET request against one of the upstreams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub upstream: Upstream,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Overrides the configured default timeout
    pub timeout: Option<Duration>,
}

impl SourceRequest {
    pub fn new(upstream: Upstream, path: impl Into<String>) -> Self {
        Self {
            upstream,
            path: path.into(),
            query: Vec::new(),
            timeout: None,
        }
    }

    pub fn hkma(path: impl Into<String>) -> Self {
        Self::new(Upstream::Hkma, path)
    }

    pub fn ird(path: impl Into<String>) -> Self {
        Self::new(Upstream::Ird, path)
    }

    pub fn aof(path: impl Into<String>) -> Self {
        Self::new(Upstream::Aof, path)
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present
    pub fn query_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Look up a query parameter by key
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Something that can answer a [`SourceRequest`] with a response body
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the raw response body
    async fn fetch_text(&self, request: &SourceRequest) -> Result<String>;
}

/// reqwest-backed source pointed at the configured upstream hosts
#[derive(Clone)]
pub struct HttpSource {
    http_client: Client,
    hkma_base_url: String,
    ird_base_url: String,
    aof_base_url: String,
}

impl HttpSource {
    /// Build a source from config
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            hkma_base_url: config.hkma_base_url.trim_end_matches('/').to_string(),
            ird_base_url: config.ird_base_url.trim_end_matches('/').to_string(),
            aof_base_url: config.aof_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn base_url(&self, upstream: Upstream) -> &str {
        match upstream {
            Upstream::Hkma => &self.hkma_base_url,
            Upstream::Ird => &self.ird_base_url,
            Upstream::Aof => &self.aof_base_url,
        }
    }

    /// Full URL (without query string) for a request
    pub fn url_for(&self, request: &SourceRequest) -> String {
        format!("{}{}", self.base_url(request.upstream), request.path)
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_text(&self, request: &SourceRequest) -> Result<String> {
        let url = self.url_for(request);
        debug!("GET {} {:?}", url, request.query);

        let mut builder = self.http_client.get(&url).query(&request.query);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!("{} returned {} bytes", url, body.len());
        Ok(body)
    }
}

/// Parse a JSON body; an empty body is treated as `null`
pub fn parse_json_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

/// Fetch a request and parse the body as JSON
pub async fn fetch_json(source: &dyn DataSource, request: &SourceRequest) -> Result<Value> {
    let body = source.fetch_text(request).await?;
    parse_json_body(&body)
}

/// Fetch a request and return its records, failing on an unsuccessful header
pub async fn fetch_records(source: &dyn DataSource, request: &SourceRequest) -> Result<Vec<Record>> {
    let value = fetch_json(source, request).await?;
    let records = Envelope::from_value(value)?.into_records()?;
    debug!("{}{}: {} records", request.upstream.as_str(), request.path, records.len());
    Ok(records)
}

/// Fetch a request and parse the body as header-keyed CSV
pub async fn fetch_csv(source: &dyn DataSource, request: &SourceRequest) -> Result<Vec<CsvRow>> {
    let body = source.fetch_text(request).await?;
    let rows = parse_csv_rows(&body)?;
    debug!("{}{}: {} rows", request.upstream.as_str(), request.path, rows.len());
    Ok(rows)
}

/// The `{"header": {...}, "result": {"records": [...]}}` wrapper used by HKMA
///
/// Also accepts a bare `{"records": [...]}` object.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Envelope {
    /// `None` when the payload carried no header
    pub success: Option<bool>,
    pub err_msg: Option<String>,
    pub records: Vec<Record>,
}

impl Envelope {
    pub fn from_value(value: Value) -> Result<Self> {
        let mut object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidData(format!(
                    "Expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut envelope = Self::default();

        if let Some(Value::Object(header)) = object.get("header") {
            envelope.success = header.get("success").and_then(parse_success_flag);
            envelope.err_msg = header.get("err_msg").and_then(value_to_string);
        }

        let records = match object.remove("result") {
            Some(Value::Object(mut result)) => result.remove("records"),
            _ => object.remove("records"),
        };

        if let Some(records) = records {
            let items = match records {
                Value::Array(items) => items,
                other => {
                    return Err(Error::InvalidData(format!(
                        "Expected records to be an array, got {}",
                        json_kind(&other)
                    )))
                }
            };
            for item in items {
                match item {
                    Value::Object(record) => envelope.records.push(record),
                    other => warn!("Skipping non-object record: {}", other),
                }
            }
        }

        Ok(envelope)
    }

    /// Unwrap the records, turning `success: false` into [`Error::Upstream`]
    pub fn into_records(self) -> Result<Vec<Record>> {
        if self.success == Some(false) {
            return Err(Error::Upstream(
                self.err_msg.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        Ok(self.records)
    }
}

/// HKMA sends `success` as a boolean on most endpoints and as a string on a few
fn parse_success_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(s.trim().eq_ignore_ascii_case("true")),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse header-driven CSV into rows keyed by column name
pub fn parse_csv_rows(text: &str) -> Result<Vec<CsvRow>> {
    // IRD files are sometimes saved with a UTF-8 byte order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let mut row = CsvRow::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                row.insert(header.to_string(), value.to_string());
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_success() {
        let envelope = Envelope::from_value(json!({
            "header": {"success": true, "err_code": "0000", "err_msg": "No error found"},
            "result": {"datasize": 2, "records": [{"a": 1}, {"a": 2}]}
        }))
        .unwrap();

        assert_eq!(envelope.success, Some(true));
        assert_eq!(envelope.err_msg.as_deref(), Some("No error found"));
        assert_eq!(envelope.records.len(), 2);
        assert_eq!(envelope.into_records().unwrap()[1]["a"], json!(2));
    }

    #[test]
    fn test_envelope_string_success_flag() {
        let envelope = Envelope::from_value(json!({
            "header": {"success": "true"},
            "result": {"records": []}
        }))
        .unwrap();
        assert_eq!(envelope.success, Some(true));

        let envelope = Envelope::from_value(json!({"header": {"success": "false"}})).unwrap();
        assert_eq!(envelope.success, Some(false));
    }

    #[test]
    fn test_envelope_failure_carries_message() {
        let envelope = Envelope::from_value(json!({
            "header": {"success": false, "err_code": "0401", "err_msg": "Invalid parameter"},
            "result": {"records": []}
        }))
        .unwrap();

        match envelope.into_records() {
            Err(Error::Upstream(msg)) => assert_eq!(msg, "Invalid parameter"),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_failure_without_message() {
        let envelope = Envelope::from_value(json!({"header": {"success": false}})).unwrap();
        match envelope.into_records() {
            Err(Error::Upstream(msg)) => assert_eq!(msg, "Unknown error"),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_top_level_records() {
        let envelope = Envelope::from_value(json!({"records": [{"year": "1985"}]})).unwrap();
        assert_eq!(envelope.success, None);
        assert_eq!(envelope.into_records().unwrap().len(), 1);
    }

    #[test]
    fn test_envelope_null_and_missing_records() {
        assert!(Envelope::from_value(Value::Null).unwrap().records.is_empty());
        assert!(Envelope::from_value(json!({"header": {"success": true}}))
            .unwrap()
            .records
            .is_empty());
    }

    #[test]
    fn test_envelope_skips_non_object_records() {
        let envelope =
            Envelope::from_value(json!({"result": {"records": [{"a": 1}, 5, "x"]}})).unwrap();
        assert_eq!(envelope.records.len(), 1);
    }

    #[test]
    fn test_envelope_rejects_non_object_payload() {
        assert!(matches!(
            Envelope::from_value(json!([1, 2])),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            Envelope::from_value(json!({"result": {"records": "nope"}})),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_parse_json_body() {
        assert_eq!(parse_json_body("").unwrap(), Value::Null);
        assert_eq!(parse_json_body("  \n").unwrap(), Value::Null);
        assert_eq!(parse_json_body("{\"a\": 1}").unwrap(), json!({"a": 1}));
        assert!(matches!(parse_json_body("{invalid json}"), Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_csv_rows() {
        let rows = parse_csv_rows("Period,SD_Listed,SD_Unlisted\n202501,3554.692596,27.088813\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Period"], "202501");
        assert_eq!(rows[0]["SD_Unlisted"], "27.088813");
    }

    #[test]
    fn test_parse_csv_rows_strips_bom_and_whitespace() {
        let rows = parse_csv_rows("\u{feff}RUN_DATE, ACTIVE_MAIN_BUS\n202401 , 1500\n").unwrap();
        assert_eq!(rows[0]["RUN_DATE"], "202401");
        assert_eq!(rows[0]["ACTIVE_MAIN_BUS"], "1500");
    }

    #[test]
    fn test_parse_csv_rows_short_row() {
        let rows = parse_csv_rows("A,B,C\n1,2\n").unwrap();
        assert_eq!(rows[0].get("B").map(String::as_str), Some("2"));
        assert!(rows[0].get("C").is_none());
    }

    #[test]
    fn test_parse_csv_header_only() {
        assert!(parse_csv_rows("A,B\n").unwrap().is_empty());
    }

    #[test]
    fn test_request_builder() {
        let request = SourceRequest::hkma("/public/tender-invitations")
            .query("lang", "en")
            .query_opt("pagesize", Some(10))
            .query_opt::<u32>("offset", None)
            .timeout(Duration::from_secs(10));

        assert_eq!(request.upstream, Upstream::Hkma);
        assert_eq!(request.query_value("lang"), Some("en"));
        assert_eq!(request.query_value("pagesize"), Some("10"));
        assert_eq!(request.query_value("offset"), None);
        assert_eq!(request.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_http_source_url_for() {
        let config = Config {
            hkma_base_url: "http://localhost:1234/".to_string(),
            ..Config::default()
        };
        let source = HttpSource::new(&config).unwrap();
        let request = SourceRequest::hkma("/public/coin-cart-schedule");
        assert_eq!(
            source.url_for(&request),
            "http://localhost:1234/public/coin-cart-schedule"
        );
    }
}
