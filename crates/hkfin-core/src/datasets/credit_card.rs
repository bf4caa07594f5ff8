//! Credit card lending survey and lost-card hotlines (HKMA)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::filters::{str_field, MonthRange, YearMonth};
use crate::models::Language;
use crate::source::{fetch_records, DataSource, Record, SourceRequest};

pub const CREDIT_CARD_LENDING_PATH: &str =
    "/public/market-data-and-statistics/monthly-statistical-bulletin/banking/credit-card-lending-survey";
pub const CREDIT_CARD_HOTLINES_PATH: &str = "/public/bank-svf-info/hotlines-report-loss-credit-card";

/// Placeholder for survey figures missing from an upstream record
pub const MISSING_FIGURE: &str = "invalid data";

#[derive(Debug, Default, Clone, Deserialize, schemars::JsonSchema)]
pub struct CreditCardStatsParams {
    #[schemars(description = "Start Year")]
    pub start_year: Option<i32>,

    #[schemars(description = "Start Month")]
    pub start_month: Option<u32>,

    #[schemars(description = "End Year")]
    pub end_year: Option<i32>,

    #[schemars(description = "End Month")]
    pub end_month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct CreditCardStats {
    pub quarter: String,
    /// Number of accounts at end of period
    pub accounts_count: Value,
    /// Delinquent amount at end of period
    pub delinquent_amount: Value,
    /// Charge-off amount during the period
    pub chargeoff_amount: Value,
    /// Rollover amount during the period
    pub rollover_amount: Value,
    /// Average total receivables during the period
    pub avg_receivables: Value,
}

fn figure(record: &Record, key: &str) -> Value {
    record
        .get(key)
        .cloned()
        .unwrap_or_else(|| Value::String(MISSING_FIGURE.to_string()))
}

/// Filter survey quarters against the month window and rename the figures
pub fn filter_credit_card_stats(records: &[Record], params: &CreditCardStatsParams) -> Vec<CreditCardStats> {
    let range = MonthRange::new(params.start_year, params.start_month, params.end_year, params.end_month);

    records
        .iter()
        .filter_map(|record| {
            let quarter = str_field(record, "end_of_quarter");
            let Some(ym) = YearMonth::from_quarter(&quarter) else {
                warn!("Skipping credit card record with quarter {:?}", quarter);
                return None;
            };
            range.contains(ym).then(|| CreditCardStats {
                accounts_count: figure(record, "endperiod_noofaccts"),
                delinquent_amount: figure(record, "endperiod_delinquent_amt"),
                chargeoff_amount: figure(record, "during_chargeoff_amt"),
                rollover_amount: figure(record, "during_rollover_amt"),
                avg_receivables: figure(record, "during_avg_total_receivables"),
                quarter,
            })
        })
        .collect()
}

/// Credit card lending survey results
pub async fn get_credit_card_stats(
    source: &dyn DataSource,
    params: CreditCardStatsParams,
) -> Result<Vec<CreditCardStats>> {
    let records = fetch_records(source, &SourceRequest::hkma(CREDIT_CARD_LENDING_PATH)).await?;
    Ok(filter_credit_card_stats(&records, &params))
}

/// Hotlines for reporting a lost credit card, as published upstream
pub async fn get_credit_card_hotlines(source: &dyn DataSource) -> Result<Vec<Record>> {
    let request = SourceRequest::hkma(CREDIT_CARD_HOTLINES_PATH).query("lang", Language::En);
    fetch_records(source, &request).await
}
