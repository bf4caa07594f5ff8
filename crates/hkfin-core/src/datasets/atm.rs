//! ATM locations of retail banks (HKMA bank and SVF information)

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filters::{coord_field, matches_location, paginate, str_field};
use crate::models::Language;
use crate::source::{fetch_records, DataSource, Record, SourceRequest};

pub const ATM_LOCATOR_PATH: &str = "/public/bank-svf-info/banks-atm-locator";

/// Upstream page size large enough to return the whole list in one call
pub const FULL_LIST_PAGESIZE: u32 = 10_000;

pub const DEFAULT_PAGESIZE: u32 = 100;

#[derive(Debug, Default, Clone, Deserialize, schemars::JsonSchema)]
pub struct AtmParams {
    #[schemars(description = "District name to filter results")]
    pub district: Option<String>,

    #[schemars(description = "Bank name to filter results")]
    pub bank_name: Option<String>,

    #[schemars(description = "Number of records per page (default 100)")]
    pub pagesize: Option<u32>,

    #[schemars(description = "Starting record offset (default 0)")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct AtmLocation {
    pub district: String,
    pub bank_name: String,
    pub type_of_machine: String,
    pub function: String,
    pub currencies_supported: String,
    pub barrier_free_access: String,
    pub network: String,
    pub address: String,
    pub service_hours: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl AtmLocation {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            district: str_field(record, "district"),
            bank_name: str_field(record, "bank_name"),
            type_of_machine: str_field(record, "type_of_machine"),
            function: str_field(record, "function"),
            currencies_supported: str_field(record, "currencies_supported"),
            barrier_free_access: str_field(record, "barrier_free_access"),
            network: str_field(record, "network"),
            address: str_field(record, "address"),
            service_hours: str_field(record, "service_hours"),
            latitude: coord_field(record, "latitude")?,
            longitude: coord_field(record, "longitude")?,
        })
    }
}

/// Filter by district and bank, normalize, then take one page
pub fn filter_atms(records: &[Record], params: &AtmParams) -> Result<Vec<AtmLocation>> {
    let matched = records
        .iter()
        .filter(|r| matches_location(r, params.district.as_deref(), params.bank_name.as_deref()))
        .map(AtmLocation::from_record)
        .collect::<Result<Vec<_>>>()?;

    Ok(paginate(
        matched,
        params.offset.unwrap_or(0) as usize,
        params.pagesize.unwrap_or(DEFAULT_PAGESIZE) as usize,
    ))
}

/// ATM locations, optionally filtered by district and bank name
pub async fn get_atm_locations(source: &dyn DataSource, params: AtmParams) -> Result<Vec<AtmLocation>> {
    let request = SourceRequest::hkma(ATM_LOCATOR_PATH)
        .query("lang", Language::En)
        .query("pagesize", FULL_LIST_PAGESIZE)
        .query("offset", 0);
    let records = fetch_records(source, &request).await?;
    filter_atms(&records, &params)
}
