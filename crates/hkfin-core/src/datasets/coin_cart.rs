//! Coin collection cart schedule (HKMA)

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::models::Language;
use crate::source::{fetch_json, DataSource, Envelope, SourceRequest};

pub const COIN_CART_PATH: &str = "/public/coin-cart-schedule";

/// The upstream payload, passed through whole
#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct CoinCartSchedule {
    pub coin_cart_schedule: Value,
}

/// Coin cart schedule in standardized format
pub async fn get_coin_cart(source: &dyn DataSource) -> Result<CoinCartSchedule> {
    let request = SourceRequest::hkma(COIN_CART_PATH).query("lang", Language::En);
    let payload = fetch_json(source, &request).await?;

    // Surface an unsuccessful header as an error, keep the payload otherwise
    Envelope::from_value(payload.clone())?.into_records()?;

    Ok(CoinCartSchedule {
        coin_cart_schedule: payload,
    })
}
