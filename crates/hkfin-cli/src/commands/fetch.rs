//! Fetch command: run one adapter and print pretty JSON
//!
//! Operator smoke test for the live upstreams.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use hkfin_core::datasets::{self, *};
use hkfin_core::DataSource;

use super::{load_config, open_source};
use crate::cli::{Dataset, LocatorArgs, MonthRangeArgs};

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize result")
}

impl From<MonthRangeArgs> for BusinessStatsParams {
    fn from(a: MonthRangeArgs) -> Self {
        Self {
            start_year: a.start_year,
            start_month: a.start_month,
            end_year: a.end_year,
            end_month: a.end_month,
        }
    }
}

impl From<MonthRangeArgs> for NegEquityParams {
    fn from(a: MonthRangeArgs) -> Self {
        Self {
            start_year: a.start_year,
            start_month: a.start_month,
            end_year: a.end_year,
            end_month: a.end_month,
        }
    }
}

impl From<MonthRangeArgs> for CreditCardStatsParams {
    fn from(a: MonthRangeArgs) -> Self {
        Self {
            start_year: a.start_year,
            start_month: a.start_month,
            end_year: a.end_year,
            end_month: a.end_month,
        }
    }
}

impl From<LocatorArgs> for AtmParams {
    fn from(a: LocatorArgs) -> Self {
        Self {
            district: a.district,
            bank_name: a.bank_name,
            pagesize: a.pagesize,
            offset: a.offset,
        }
    }
}

/// Run the adapter named by `dataset` and return its result as JSON
pub async fn run_dataset(source: &dyn DataSource, dataset: Dataset) -> Result<Value> {
    let name = format!("{:?}", dataset);
    fetch_value(source, dataset)
        .await
        .with_context(|| format!("Failed to fetch {}", name))
}

async fn fetch_value(source: &dyn DataSource, dataset: Dataset) -> Result<Value> {
    match dataset {
        Dataset::BusinessStats(range) => to_json(datasets::get_business_stats(source, range.into()).await?),
        Dataset::NegEquity(range) => to_json(datasets::get_neg_equity_stats(source, range.into()).await?),
        Dataset::CreditCard(range) => to_json(datasets::get_credit_card_stats(source, range.into()).await?),
        Dataset::CreditCardHotlines => to_json(datasets::get_credit_card_hotlines(source).await?),
        Dataset::CoinCart => to_json(datasets::get_coin_cart(source).await?),
        Dataset::Tenders {
            lang,
            segment,
            pagesize,
            offset,
            from,
            to,
        } => {
            let params = TenderParams {
                lang,
                segment,
                pagesize,
                offset,
                from_date: from,
                to_date: to,
            };
            to_json(datasets::get_tender_invitations(source, params).await?)
        }
        Dataset::Hibor { start_date, end_date } => {
            let params = HiborParams { start_date, end_date };
            to_json(datasets::get_hibor_daily_stats(source, params).await?)
        }
        Dataset::Atms(locator) => to_json(datasets::get_atm_locations(source, locator.into()).await?),
        Dataset::Branches { locator, lang } => {
            let params = BankBranchParams {
                district: locator.district,
                bank_name: locator.bank_name,
                lang,
                pagesize: locator.pagesize,
                offset: locator.offset,
            };
            to_json(datasets::get_bank_branch_locations(source, params).await?)
        }
        Dataset::StampDuty {
            start_period,
            end_period,
        } => {
            let params = StampDutyParams {
                start_period,
                end_period,
            };
            to_json(datasets::get_stamp_duty_statistics(source, params).await?)
        }
        Dataset::FraudScams { lang } => {
            to_json(datasets::get_fraudulent_bank_scams(source, FraudScamsParams { lang }).await?)
        }
        Dataset::LicensedBanks {
            start_year,
            end_year,
            data_type,
            lang,
        } => {
            let params = LicensedBanksParams {
                start_year,
                end_year,
                data_type,
                lang,
            };
            to_json(datasets::get_licensed_banks_historical_data(source, params).await?)
        }
    }
}

pub async fn cmd_fetch(config_path: Option<&Path>, dataset: Dataset) -> Result<()> {
    let config = load_config(config_path)?;
    let source = open_source(&config)?;

    let value = run_dataset(source.as_ref(), dataset).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}
