//! Bank branch locations of retail banks

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filters::{coord_field, matches_location, paginate, str_field};
use crate::models::Language;
use crate::source::{fetch_records, DataSource, Record, SourceRequest};

use super::atm::{DEFAULT_PAGESIZE, FULL_LIST_PAGESIZE};

pub const BRANCH_LOCATOR_PATH: &str = "/public/bank-svf-info/banks-branch-locator";

#[derive(Debug, Default, Clone, Deserialize, schemars::JsonSchema)]
pub struct BankBranchParams {
    #[schemars(description = "District name to filter results")]
    pub district: Option<String>,

    #[schemars(description = "Bank name to filter results")]
    pub bank_name: Option<String>,

    #[schemars(description = "Language for data output (en, tc, sc)")]
    pub lang: Option<Language>,

    #[schemars(description = "Number of records per page (default 100)")]
    pub pagesize: Option<u32>,

    #[schemars(description = "Starting record offset (default 0)")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct BankBranch {
    pub district: String,
    pub bank_name: String,
    pub branch_name: String,
    pub address: String,
    pub service_hours: String,
    pub latitude: f64,
    pub longitude: f64,
    pub barrier_free_access: String,
}

fn to_branch(record: &Record) -> Result<BankBranch> {
    Ok(BankBranch {
        district: str_field(record, "district"),
        bank_name: str_field(record, "bank_name"),
        branch_name: str_field(record, "branch_name"),
        address: str_field(record, "address"),
        service_hours: str_field(record, "service_hours"),
        latitude: coord_field(record, "latitude")?,
        longitude: coord_field(record, "longitude")?,
        barrier_free_access: str_field(record, "barrier_free_access"),
    })
}

pub fn filter_branches(records: &[Record], params: &BankBranchParams) -> Result<Vec<BankBranch>> {
    let matched = records
        .iter()
        .filter(|r| matches_location(r, params.district.as_deref(), params.bank_name.as_deref()))
        .map(to_branch)
        .collect::<Result<Vec<_>>>()?;

    Ok(paginate(
        matched,
        params.offset.unwrap_or(0) as usize,
        params.pagesize.unwrap_or(DEFAULT_PAGESIZE) as usize,
    ))
}

/// Branch locations in the requested language, optionally filtered
pub async fn get_bank_branch_locations(
    source: &dyn DataSource,
    params: BankBranchParams,
) -> Result<Vec<BankBranch>> {
    let request = SourceRequest::hkma(BRANCH_LOCATOR_PATH)
        .query("lang", params.lang.unwrap_or_default())
        .query("pagesize", FULL_LIST_PAGESIZE)
        .query("offset", 0);
    let records = fetch_records(source, &request).await?;
    filter_branches(&records, &params)
}
