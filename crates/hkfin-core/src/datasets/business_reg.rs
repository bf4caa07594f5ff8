//! Business registrations (IRD `BRFMBUSC.csv`)
//!
//! Monthly counts of active main businesses and newly registered main
//! businesses. Counts that are not integers are reported as a message rather
//! than failing the whole request.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::filters::{MonthRange, YearMonth};
use crate::models::Coerced;
use crate::source::{fetch_csv, CsvRow, DataSource, SourceRequest};

pub const BUSINESS_RETURNS_PATH: &str = "/datagovhk/BRFMBUSC.csv";

#[derive(Debug, Default, Clone, Deserialize, schemars::JsonSchema)]
pub struct BusinessStatsParams {
    #[schemars(description = "Start Year")]
    pub start_year: Option<i32>,

    #[schemars(description = "Start Month")]
    pub start_month: Option<u32>,

    #[schemars(description = "End Year")]
    pub end_year: Option<i32>,

    #[schemars(description = "End Month")]
    pub end_month: Option<u32>,
}

impl BusinessStatsParams {
    fn range(&self) -> MonthRange {
        MonthRange::new(self.start_year, self.start_month, self.end_year, self.end_month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct BusinessStats {
    /// `YYYY-MM`
    pub year_month: String,
    pub active_business: Coerced<i64>,
    pub new_registered_business: Coerced<i64>,
}

fn count_field(row: &CsvRow, column: &str) -> Coerced<i64> {
    let raw = row.get(column).map(String::as_str).unwrap_or("0");
    match raw.parse::<i64>() {
        Ok(n) => Coerced::Value(n),
        Err(_) => Coerced::Invalid(format!("Invalid data for {}: {}", column, raw)),
    }
}

/// Filter and normalize rows of the business returns CSV
pub fn filter_business_stats(rows: &[CsvRow], params: &BusinessStatsParams) -> Vec<BusinessStats> {
    let range = params.range();

    rows.iter()
        .filter_map(|row| {
            let run_date = row.get("RUN_DATE").map(String::as_str).unwrap_or("");
            let Some(ym) = YearMonth::from_compact(run_date) else {
                if !run_date.is_empty() {
                    warn!("Skipping business returns row with RUN_DATE {:?}", run_date);
                }
                return None;
            };
            if !range.contains(ym) {
                return None;
            }
            Some(BusinessStats {
                year_month: ym.to_dashed(),
                active_business: count_field(row, "ACTIVE_MAIN_BUS"),
                new_registered_business: count_field(row, "NEW_REG_MAIN_BUS"),
            })
        })
        .collect()
}

/// Monthly statistics on business registrations in Hong Kong
pub async fn get_business_stats(
    source: &dyn DataSource,
    params: BusinessStatsParams,
) -> Result<Vec<BusinessStats>> {
    let rows = fetch_csv(source, &SourceRequest::ird(BUSINESS_RETURNS_PATH)).await?;
    Ok(filter_business_stats(&rows, &params))
}
