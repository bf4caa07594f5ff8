//! Hong Kong Interbank Offered Rate daily fixings (HKMA)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::filters::{str_field, DateRange};
use crate::source::{fetch_records, DataSource, Record, SourceRequest};

pub const HIBOR_DAILY_PATH: &str =
    "/public/market-data-and-statistics/monthly-statistical-bulletin/er-ir/hk-interbank-ir-daily";

#[derive(Debug, Default, Clone, Deserialize, schemars::JsonSchema)]
pub struct HiborParams {
    #[schemars(description = "Start date (YYYY-MM-DD)")]
    pub start_date: Option<String>,

    #[schemars(description = "End date (YYYY-MM-DD)")]
    pub end_date: Option<String>,
}

/// Fixings in percent per annum, copied as published; `null` where HKMA has no figure
#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct HiborFixing {
    pub date: String,
    pub overnight: Value,
    #[serde(rename = "1_week")]
    pub one_week: Value,
    #[serde(rename = "1_month")]
    pub one_month: Value,
    #[serde(rename = "3_months")]
    pub three_months: Value,
    #[serde(rename = "6_months")]
    pub six_months: Value,
    #[serde(rename = "9_months")]
    pub nine_months: Value,
    #[serde(rename = "12_months")]
    pub twelve_months: Value,
}

fn rate(record: &Record, key: &str) -> Value {
    record.get(key).cloned().unwrap_or(Value::Null)
}

/// Keep dated fixings within the range and rename the tenors
pub fn filter_hibor(records: &[Record], range: &DateRange) -> Vec<HiborFixing> {
    records
        .iter()
        .filter_map(|record| {
            let date = str_field(record, "end_of_day");
            let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()?;
            range.contains(day).then(|| HiborFixing {
                overnight: rate(record, "ir_overnight"),
                one_week: rate(record, "ir_1w"),
                one_month: rate(record, "ir_1m"),
                three_months: rate(record, "ir_3m"),
                six_months: rate(record, "ir_6m"),
                nine_months: rate(record, "ir_9m"),
                twelve_months: rate(record, "ir_12m"),
                date,
            })
        })
        .collect()
}

/// Daily HIBOR fixings, optionally bounded by date
pub async fn get_hibor_daily_stats(source: &dyn DataSource, params: HiborParams) -> Result<Vec<HiborFixing>> {
    let range = DateRange::parse(params.start_date.as_deref(), params.end_date.as_deref())?;
    let request = SourceRequest::hkma(HIBOR_DAILY_PATH).query("segment", "hibor.fixing");
    let records = fetch_records(source, &request).await?;
    Ok(filter_hibor(&records, &range))
}
