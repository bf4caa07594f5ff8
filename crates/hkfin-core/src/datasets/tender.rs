//! HKMA tender invitations and notices of award of contracts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::filters::{str_field, DateRange};
use crate::models::Language;
use crate::source::{fetch_records, DataSource, Record, SourceRequest};

pub const TENDER_PATH: &str = "/public/tender-invitations";

/// Which list to return
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum TenderSegment {
    /// Tender invitations
    #[default]
    Tender,
    /// Notices of award of contracts
    Notice,
}

impl TenderSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tender => "tender",
            Self::Notice => "notice",
        }
    }
}

impl std::fmt::Display for TenderSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, Deserialize, schemars::JsonSchema)]
pub struct TenderParams {
    #[schemars(description = "Language (en/tc/sc)")]
    pub lang: Option<Language>,

    #[schemars(description = "Type of records (tender/notice)")]
    pub segment: Option<TenderSegment>,

    #[schemars(description = "Number of records per page")]
    pub pagesize: Option<u32>,

    #[schemars(description = "Starting record offset")]
    pub offset: Option<u32>,

    #[schemars(description = "Filter records from date (YYYY-MM-DD)")]
    pub from_date: Option<String>,

    #[schemars(description = "Filter records to date (YYYY-MM-DD)")]
    pub to_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct TenderInvitations {
    pub tender_invitations: Vec<Record>,
}

/// Build the upstream request; zero page size or offset are left to upstream defaults
pub fn tender_request(params: &TenderParams, range: &DateRange) -> SourceRequest {
    SourceRequest::hkma(TENDER_PATH)
        .query("lang", params.lang.unwrap_or_default())
        .query("segment", params.segment.unwrap_or_default())
        .query_opt("pagesize", params.pagesize.filter(|n| *n > 0))
        .query_opt("offset", params.offset.filter(|n| *n > 0))
        .query_opt("from", range.start)
        .query_opt("to", range.end)
}

fn issue_date(record: &Record) -> Option<NaiveDate> {
    let raw = match str_field(record, "issue_date") {
        s if s.is_empty() => str_field(record, "date"),
        s => s,
    };
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok()
}

/// Keep records issued within the range; undated records are kept
pub fn filter_tenders(records: Vec<Record>, range: &DateRange) -> Vec<Record> {
    if range.is_open() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| issue_date(r).map_or(true, |d| range.contains(d)))
        .collect()
}

/// Tender invitations and notices from HKMA
pub async fn get_tender_invitations(
    source: &dyn DataSource,
    params: TenderParams,
) -> Result<TenderInvitations> {
    let range = DateRange::parse(params.from_date.as_deref(), params.to_date.as_deref())?;
    let records = fetch_records(source, &tender_request(&params, &range)).await?;
    let total = records.len();
    let tender_invitations = filter_tenders(records, &range);
    debug!("Tender invitations: kept {} of {}", tender_invitations.len(), total);
    Ok(TenderInvitations { tender_invitations })
}
