//! Residential mortgage loans in negative equity (HKMA monthly statistical bulletin)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::filters::{str_field, MonthRange, YearMonth};
use crate::source::{fetch_records, DataSource, Record, SourceRequest};

pub const NEG_EQUITY_PATH: &str = "/public/market-data-and-statistics/monthly-statistical-bulletin/banking/residential-mortgage-loans-neg-equity";

#[derive(Debug, Default, Clone, Deserialize, schemars::JsonSchema)]
pub struct NegEquityParams {
    #[schemars(description = "Start Year")]
    pub start_year: Option<i32>,

    #[schemars(description = "Start Month")]
    pub start_month: Option<u32>,

    #[schemars(description = "End Year")]
    pub end_year: Option<i32>,

    #[schemars(description = "End Month")]
    pub end_month: Option<u32>,
}

/// One quarter of negative-equity figures
///
/// Figures are copied as published, `null` included; keys absent upstream are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct NegEquityStats {
    /// `YYYY-Qn`
    pub quarter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outstanding_loans: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outstanding_loans_ratio: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outstanding_loans_amt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outstanding_loans_amt_ratio: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsecured_portion_amt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lv_ratio: Option<Value>,
}

/// Filter quarters against the requested month window and project the figures
pub fn filter_neg_equity(records: &[Record], params: &NegEquityParams) -> Vec<NegEquityStats> {
    let range = MonthRange::new(params.start_year, params.start_month, params.end_year, params.end_month);

    records
        .iter()
        .filter_map(|record| {
            let quarter = str_field(record, "end_of_quarter");
            let Some(ym) = YearMonth::from_quarter(&quarter) else {
                warn!("Skipping negative equity record with quarter {:?}", quarter);
                return None;
            };
            range.contains(ym).then(|| NegEquityStats {
                outstanding_loans: record.get("outstanding_loans").cloned(),
                outstanding_loans_ratio: record.get("outstanding_loans_ratio").cloned(),
                outstanding_loans_amt: record.get("outstanding_loans_amt").cloned(),
                outstanding_loans_amt_ratio: record.get("outstanding_loans_amt_ratio").cloned(),
                unsecured_portion_amt: record.get("unsecured_portion_amt").cloned(),
                lv_ratio: record.get("lv_ratio").cloned(),
                quarter,
            })
        })
        .collect()
}

/// Statistics on residential mortgage loans in negative equity
pub async fn get_neg_equity_stats(
    source: &dyn DataSource,
    params: NegEquityParams,
) -> Result<Vec<NegEquityStats>> {
    let records = fetch_records(source, &SourceRequest::hkma(NEG_EQUITY_PATH)).await?;
    Ok(filter_neg_equity(&records, &params))
}
