//! Fraudulent bank websites and phishing scams reported to HKMA

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::models::Language;
use crate::source::{fetch_records, DataSource, Record, SourceRequest};

pub const FRAUD_SCAMS_PATH: &str = "/public/bank-svf-info/fraudulent-bank-scams";

pub const FRAUD_SCAMS_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Default, Clone, Deserialize, schemars::JsonSchema)]
pub struct FraudScamsParams {
    #[schemars(description = "Language (en/tc/sc)")]
    pub lang: Option<Language>,
}

/// Reported scams as published; an unsuccessful response header is an error
pub async fn get_fraudulent_bank_scams(source: &dyn DataSource, params: FraudScamsParams) -> Result<Vec<Record>> {
    let request = SourceRequest::hkma(FRAUD_SCAMS_PATH)
        .query("lang", params.lang.unwrap_or_default())
        .timeout(FRAUD_SCAMS_TIMEOUT);
    fetch_records(source, &request).await
}
