//! Licensed banks, bank branches and bank offices in Hong Kong, 1954-2002
//!
//! Published by the Hong Kong Academy of Finance (AOF). Unlike the HKMA
//! endpoints the AOF API may return `records` at the top level and reports
//! failures as an `error` field.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::Language;
use crate::source::{fetch_json, DataSource, Envelope, Record, SourceRequest};

pub const LICENSED_BANKS_PATH: &str = "/api/v1/hkimr/lic-bank-branches-and-offices";

pub const LICENSED_BANKS_TIMEOUT: Duration = Duration::from_secs(30);

/// Which series to return
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    LicensedBanks,
    BankBranches,
    BankOffices,
    #[default]
    All,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LicensedBanks => "licensed_banks",
            Self::BankBranches => "bank_branches",
            Self::BankOffices => "bank_offices",
            Self::All => "all",
        }
    }

    /// Output fields besides `year`
    fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::LicensedBanks => &["licensed_banks"],
            Self::BankBranches => &["bank_branches"],
            Self::BankOffices => &["bank_offices"],
            Self::All => &[
                "licensed_banks",
                "bank_branches",
                "bank_offices",
                "total_branches_and_offices",
                "notes",
            ],
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, Deserialize, schemars::JsonSchema)]
pub struct LicensedBanksParams {
    #[schemars(description = "Start year for filtering data (1954-2002)")]
    pub start_year: Option<i32>,

    #[schemars(description = "End year for filtering data (1954-2002)")]
    pub end_year: Option<i32>,

    #[schemars(description = "Type of data to retrieve (licensed_banks, bank_branches, bank_offices, all)")]
    pub data_type: Option<DataType>,

    #[schemars(description = "Language for data output (en, tc, sc)")]
    pub lang: Option<Language>,
}

pub fn licensed_banks_request(params: &LicensedBanksParams) -> SourceRequest {
    let data_type = params.data_type.unwrap_or_default();
    SourceRequest::aof(LICENSED_BANKS_PATH)
        .query("lang", params.lang.unwrap_or_default())
        .query_opt("start_year", params.start_year)
        .query_opt("end_year", params.end_year)
        .query_opt("data_type", (data_type != DataType::All).then_some(data_type))
        .timeout(LICENSED_BANKS_TIMEOUT)
}

fn record_year(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Apply the year window and project each record to the requested series
pub fn filter_licensed_banks(records: &[Record], params: &LicensedBanksParams) -> Vec<Record> {
    let data_type = params.data_type.unwrap_or_default();
    let start = params.start_year.map(i64::from);
    let end = params.end_year.map(i64::from);

    records
        .iter()
        .filter_map(|record| {
            let raw_year = record.get("year")?;
            let Some(year) = record_year(raw_year) else {
                warn!("Skipping licensed banks record with year {}", raw_year);
                return None;
            };
            if start.is_some_and(|s| year < s) || end.is_some_and(|e| year > e) {
                return None;
            }

            let mut out = Record::new();
            out.insert("year".to_string(), raw_year.clone());
            for field in data_type.fields() {
                let value = match (record.get(*field), *field) {
                    (Some(v), _) => v.clone(),
                    (None, "notes") => Value::String(String::new()),
                    (None, _) => Value::Null,
                };
                out.insert(field.to_string(), value);
            }
            Some(out)
        })
        .collect()
}

/// Historical licensed bank counts, optionally narrowed by year and series
pub async fn get_licensed_banks_historical_data(
    source: &dyn DataSource,
    params: LicensedBanksParams,
) -> Result<Vec<Record>> {
    let payload = fetch_json(source, &licensed_banks_request(&params)).await?;

    if let Some(error) = payload.get("error") {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(Error::Upstream(message));
    }

    let records = Envelope::from_value(payload)?.into_records()?;
    Ok(filter_licensed_banks(&records, &params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Record> {
        Envelope::from_value(json!({"records": [
            {"year": "1954", "licensed_banks": 94, "bank_branches": 3, "bank_offices": null,
             "total_branches_and_offices": 97, "notes": "Earliest figures"},
            {"year": 1980, "licensed_banks": 115, "bank_branches": 1254, "bank_offices": 0,
             "total_branches_and_offices": 1254},
            {"year": 2002, "licensed_banks": 134, "bank_branches": 1340, "bank_offices": 4,
             "total_branches_and_offices": 1344, "notes": ""},
            {"year": "unknown", "licensed_banks": 1},
            {"licensed_banks": 2}
        ]}))
        .unwrap()
        .records
    }

    #[test]
    fn test_all_fields_projection() {
        let result = filter_licensed_banks(&records(), &LicensedBanksParams::default());
        assert_eq!(result.len(), 3);
        assert_eq!(
            Value::Object(result[1].clone()),
            json!({
                "year": 1980,
                "licensed_banks": 115,
                "bank_branches": 1254,
                "bank_offices": 0,
                "total_branches_and_offices": 1254,
                "notes": ""
            })
        );
        // year is passed through as published
        assert_eq!(result[0]["year"], json!("1954"));
    }

    #[test]
    fn test_single_series_projection() {
        let params = LicensedBanksParams {
            data_type: Some(DataType::BankBranches),
            ..Default::default()
        };
        let result = filter_licensed_banks(&records(), &params);
        assert_eq!(Value::Object(result[0].clone()), json!({"year": "1954", "bank_branches": 3}));
    }

    #[test]
    fn test_year_window_is_inclusive() {
        let params = LicensedBanksParams {
            start_year: Some(1980),
            end_year: Some(2002),
            ..Default::default()
        };
        let years: Vec<_> = filter_licensed_banks(&records(), &params)
            .into_iter()
            .map(|r| r["year"].clone())
            .collect();
        assert_eq!(years, vec![json!(1980), json!(2002)]);
    }

    #[test]
    fn test_request_query() {
        let request = licensed_banks_request(&LicensedBanksParams::default());
        assert_eq!(request.query_value("lang"), Some("en"));
        assert_eq!(request.query_value("data_type"), None);
        assert_eq!(request.timeout, Some(LICENSED_BANKS_TIMEOUT));

        let request = licensed_banks_request(&LicensedBanksParams {
            start_year: Some(1990),
            data_type: Some(DataType::LicensedBanks),
            lang: Some(Language::Sc),
            ..Default::default()
        });
        assert_eq!(request.query_value("lang"), Some("sc"));
        assert_eq!(request.query_value("start_year"), Some("1990"));
        assert_eq!(request.query_value("end_year"), None);
        assert_eq!(request.query_value("data_type"), Some("licensed_banks"));
    }

    #[test]
    fn test_data_type_deserialize() {
        let params: LicensedBanksParams =
            serde_json::from_value(json!({"data_type": "bank_offices"})).unwrap();
        assert_eq!(params.data_type, Some(DataType::BankOffices));
        assert!(serde_json::from_value::<LicensedBanksParams>(json!({"data_type": "atms"})).is_err());
    }
}
