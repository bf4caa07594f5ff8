//! Stamp duty collected on transfers of Hong Kong stock (IRD `Stamp_Col_ST.csv`)

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::source::{fetch_csv, CsvRow, DataSource, SourceRequest};

pub const STAMP_DUTY_PATH: &str = "/datagovhk/Stamp_Col_ST.csv";

#[derive(Debug, Default, Clone, Deserialize, schemars::JsonSchema)]
pub struct StampDutyParams {
    #[schemars(description = "Start period in YYYYMM format to filter results")]
    pub start_period: Option<String>,

    #[schemars(description = "End period in YYYYMM format to filter results")]
    pub end_period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct StampDutyStats {
    /// `YYYYMM`
    pub period: String,
    /// Stamp duty on listed stock, HK$ million
    pub sd_listed: f64,
    /// Stamp duty on unlisted stock, HK$ million
    pub sd_unlisted: f64,
}

fn amount(row: &CsvRow, column: &str, period: &str) -> Result<f64> {
    let raw = row
        .get(column)
        .ok_or_else(|| Error::InvalidData(format!("Missing {} for period {}", column, period)))?;
    raw.parse::<f64>()
        .map_err(|_| Error::InvalidData(format!("Invalid {} for period {}: {}", column, period, raw)))
}

/// Rename and coerce rows of the stamp duty CSV
pub fn normalize_stamp_duty(rows: &[CsvRow]) -> Result<Vec<StampDutyStats>> {
    rows.iter()
        .map(|row| {
            let period = row.get("Period").cloned().unwrap_or_default();
            Ok(StampDutyStats {
                sd_listed: amount(row, "SD_Listed", &period)?,
                sd_unlisted: amount(row, "SD_Unlisted", &period)?,
                period,
            })
        })
        .collect()
}

/// Keep records whose `YYYYMM` period lies within the inclusive bounds
///
/// Periods share a fixed-width format, so string comparison orders them.
pub fn filter_stamp_duty(records: Vec<StampDutyStats>, params: &StampDutyParams) -> Vec<StampDutyStats> {
    let start = params.start_period.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let end = params.end_period.as_deref().map(str::trim).filter(|s| !s.is_empty());

    records
        .into_iter()
        .filter(|r| start.map_or(true, |s| r.period.as_str() >= s))
        .filter(|r| end.map_or(true, |e| r.period.as_str() <= e))
        .collect()
}

/// Monthly stamp duty statistics with optional period filtering
pub async fn get_stamp_duty_statistics(
    source: &dyn DataSource,
    params: StampDutyParams,
) -> Result<Vec<StampDutyStats>> {
    let rows = fetch_csv(source, &SourceRequest::ird(STAMP_DUTY_PATH)).await?;
    let records = normalize_stamp_duty(&rows)?;
    Ok(filter_stamp_duty(records, &params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_csv_rows;

    const CSV: &str = "Period,SD_Listed,SD_Unlisted\n\
        202501,3554.692596,27.088813\n\
        202502,6206.47798,32.083893\n";

    fn records() -> Vec<StampDutyStats> {
        normalize_stamp_duty(&parse_csv_rows(CSV).unwrap()).unwrap()
    }

    #[test]
    fn test_normalize_renames_and_coerces() {
        let records = records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].period, "202501");
        assert_eq!(records[0].sd_listed, 3554.692596);
        assert_eq!(records[0].sd_unlisted, 27.088813);
    }

    #[test]
    fn test_filter_single_period() {
        let params = StampDutyParams {
            start_period: Some("202501".into()),
            end_period: Some("202501".into()),
        };
        let result = filter_stamp_duty(records(), &params);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].period, "202501");
    }

    #[test]
    fn test_filter_beyond_data() {
        let params = StampDutyParams {
            start_period: Some("202503".into()),
            end_period: None,
        };
        assert!(filter_stamp_duty(records(), &params).is_empty());
    }

    #[test]
    fn test_blank_bounds_are_ignored() {
        let params = StampDutyParams {
            start_period: Some(" ".into()),
            end_period: Some(String::new()),
        };
        assert_eq!(filter_stamp_duty(records(), &params).len(), 2);
    }

    #[test]
    fn test_unparseable_amount_is_error() {
        let rows = parse_csv_rows("Period,SD_Listed,SD_Unlisted\n202501,abc,1.0\n").unwrap();
        assert!(matches!(normalize_stamp_duty(&rows), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(&records()[1]).unwrap();
        assert_eq!(value["period"], "202502");
        assert_eq!(value["sd_listed"], 6206.47798);
        assert!(value.get("SD_Listed").is_none());
    }
}
