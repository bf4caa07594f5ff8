//! Integration tests for hkfin-core
//!
//! These drive the public `get_*` entry points through a fixture-backed
//! `DataSource`, the same seam the MCP server uses.

use std::collections::HashMap;

use async_trait::async_trait;
use hkfin_core::{
    datasets::{self, atm, bank_branch, business_reg, credit_card, hibor, licensed_banks, neg_equity, stamp_duty, tender},
    Coerced, DataSource, Error, Language, Result, SourceRequest,
};
use serde_json::json;

/// Serves fixture bodies keyed by request path
struct FixtureSource {
    bodies: HashMap<&'static str, String>,
}

impl FixtureSource {
    fn new(bodies: &[(&'static str, String)]) -> Self {
        Self {
            bodies: bodies.iter().cloned().collect(),
        }
    }
}

#[async_trait]
impl DataSource for FixtureSource {
    async fn fetch_text(&self, request: &SourceRequest) -> Result<String> {
        self.bodies
            .get(request.path.as_str())
            .cloned()
            .ok_or_else(|| Error::NotFound(request.path.clone()))
    }
}

fn business_csv() -> String {
    "RUN_DATE,ACTIVE_MAIN_BUS,NEW_REG_MAIN_BUS\n\
     202312,1480000,11000\n\
     202401,1500000,12000\n\
     202402,1510000,n/a\n\
     202403,1520000,13000\n"
        .to_string()
}

fn stamp_duty_csv() -> String {
    "\u{feff}Period,SD_Listed,SD_Unlisted\n\
     202412,4120.5,30.1\n\
     202501,3554.692596,27.088813\n\
     202502,3999.1,25.0\n"
        .to_string()
}

fn hkma(records: serde_json::Value) -> String {
    json!({
        "header": {"success": true, "err_code": "0000", "err_msg": "No error found"},
        "result": {"datasize": records.as_array().map_or(0, Vec::len), "records": records}
    })
    .to_string()
}

fn fixtures() -> FixtureSource {
    FixtureSource::new(&[
        (business_reg::BUSINESS_RETURNS_PATH, business_csv()),
        (stamp_duty::STAMP_DUTY_PATH, stamp_duty_csv()),
        (
            neg_equity::NEG_EQUITY_PATH,
            hkma(json!([
                {"end_of_quarter": "2024-Q4", "outstanding_loans": 40741, "lv_ratio": 1.08},
                {"end_of_quarter": "2024-Q3", "outstanding_loans": 38202}
            ])),
        ),
        (
            credit_card::CREDIT_CARD_LENDING_PATH,
            hkma(json!([{"end_of_quarter": "2024-Q4", "endperiod_noofaccts": 18300000}])),
        ),
        (
            credit_card::CREDIT_CARD_HOTLINES_PATH,
            hkma(json!([{"bank": "Bank of China (Hong Kong) Limited", "hotline": "2853 8828"}])),
        ),
        (
            hibor::HIBOR_DAILY_PATH,
            hkma(json!([
                {"end_of_day": "2025-06-03", "ir_overnight": 0.02, "ir_1m": 0.61},
                {"end_of_day": "2025-06-02", "ir_overnight": 0.03, "ir_1m": 0.77}
            ])),
        ),
        (
            tender::TENDER_PATH,
            hkma(json!([
                {"title": "Provision of BI Application Support", "issue_date": "2025-06-01"},
                {"title": "Renewal of software for VDI", "issue_date": "2025-05-30"}
            ])),
        ),
        (
            atm::ATM_LOCATOR_PATH,
            hkma(json!([
                {"district": "Wan Chai", "bank_name": "Hang Seng Bank", "latitude": "22.277", "longitude": "114.173"},
                {"district": "Central", "bank_name": "Hang Seng Bank", "latitude": "22.281", "longitude": "114.158"},
                {"district": "Wan Chai", "bank_name": "DBS Bank (Hong Kong) Limited", "latitude": "22.279", "longitude": "114.172"}
            ])),
        ),
        (
            bank_branch::BRANCH_LOCATOR_PATH,
            hkma(json!([
                {"district": "Sha Tin", "bank_name": "Hang Seng Bank", "branch_name": "Sha Tin Branch",
                 "latitude": 22.381, "longitude": 114.188}
            ])),
        ),
        (
            licensed_banks::LICENSED_BANKS_PATH,
            json!({"records": [
                {"year": "1965", "licensed_banks": 86, "bank_branches": 242},
                {"year": "1995", "licensed_banks": 185, "bank_branches": 1475}
            ]})
            .to_string(),
        ),
    ])
}

// =============================================================================
// IRD CSV datasets
// =============================================================================

#[tokio::test]
async fn test_business_stats_window_and_sentinel() {
    let source = fixtures();
    let params = business_reg::BusinessStatsParams {
        start_year: Some(2024),
        start_month: Some(1),
        end_year: Some(2024),
        end_month: Some(2),
    };

    let result = datasets::get_business_stats(&source, params).await.unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].year_month, "2024-01");
    assert_eq!(result[0].active_business, Coerced::Value(1500000));
    assert!(result[1].new_registered_business.is_invalid());
}

#[tokio::test]
async fn test_stamp_duty_period_bounds() {
    let source = fixtures();
    let params = stamp_duty::StampDutyParams {
        start_period: Some("202501".into()),
        end_period: None,
    };

    let result = datasets::get_stamp_duty_statistics(&source, params).await.unwrap();
    let periods: Vec<_> = result.iter().map(|r| r.period.as_str()).collect();
    assert_eq!(periods, vec!["202501", "202502"]);
    assert_eq!(result[0].sd_listed, 3554.692596);
}

// =============================================================================
// HKMA datasets
// =============================================================================

#[tokio::test]
async fn test_neg_equity_and_credit_card() {
    let source = fixtures();

    let neg = datasets::get_neg_equity_stats(&source, Default::default()).await.unwrap();
    assert_eq!(neg.len(), 2);

    let cards = datasets::get_credit_card_stats(&source, Default::default()).await.unwrap();
    assert_eq!(cards[0].accounts_count, json!(18300000));
    assert_eq!(cards[0].rollover_amount, json!(credit_card::MISSING_FIGURE));

    let hotlines = datasets::get_credit_card_hotlines(&source).await.unwrap();
    assert_eq!(hotlines[0]["hotline"], json!("2853 8828"));
}

#[tokio::test]
async fn test_hibor_date_window() {
    let source = fixtures();
    let params = hibor::HiborParams {
        start_date: Some("2025-06-03".into()),
        end_date: Some("2025-06-03".into()),
    };
    let result = datasets::get_hibor_daily_stats(&source, params).await.unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].one_month, json!(0.61));
}

#[tokio::test]
async fn test_hibor_rejects_bad_date() {
    let source = fixtures();
    let params = hibor::HiborParams {
        start_date: Some("2025/06/03".into()),
        end_date: None,
    };
    let result = datasets::get_hibor_daily_stats(&source, params).await;
    assert!(matches!(result, Err(Error::InvalidParameter(_))));
}

#[tokio::test]
async fn test_tender_wrapped_result() {
    let source = fixtures();
    let params = tender::TenderParams {
        from_date: Some("2025-06-01".into()),
        ..Default::default()
    };
    let result = datasets::get_tender_invitations(&source, params).await.unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["tender_invitations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_atm_filter_then_page() {
    let source = fixtures();
    let params = atm::AtmParams {
        district: Some("wan chai".into()),
        pagesize: Some(1),
        offset: Some(1),
        ..Default::default()
    };
    let result = datasets::get_atm_locations(&source, params).await.unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].bank_name, "DBS Bank (Hong Kong) Limited");
    assert_eq!(result[0].latitude, 22.279);
}

#[tokio::test]
async fn test_branch_locations() {
    let source = fixtures();
    let params = bank_branch::BankBranchParams {
        lang: Some(Language::Tc),
        ..Default::default()
    };
    let result = datasets::get_bank_branch_locations(&source, params).await.unwrap();
    assert_eq!(result[0].branch_name, "Sha Tin Branch");
}

// =============================================================================
// AOF dataset
// =============================================================================

#[tokio::test]
async fn test_licensed_banks_projection() {
    let source = fixtures();
    let params = licensed_banks::LicensedBanksParams {
        end_year: Some(1970),
        data_type: Some(licensed_banks::DataType::LicensedBanks),
        ..Default::default()
    };
    let result = datasets::get_licensed_banks_historical_data(&source, params).await.unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(
        serde_json::Value::Object(result[0].clone()),
        json!({"year": "1965", "licensed_banks": 86})
    );
}

#[tokio::test]
async fn test_licensed_banks_upstream_error() {
    let source = FixtureSource::new(&[(
        licensed_banks::LICENSED_BANKS_PATH,
        json!({"error": "Dataset temporarily unavailable"}).to_string(),
    )]);
    let result = datasets::get_licensed_banks_historical_data(&source, Default::default()).await;
    match result {
        Err(Error::Upstream(msg)) => assert_eq!(msg, "Dataset temporarily unavailable"),
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_dataset_propagates() {
    let source = FixtureSource::new(&[]);
    let result = datasets::get_coin_cart(&source).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}
