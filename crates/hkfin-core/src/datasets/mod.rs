//! One module per published dataset
//!
//! Each module exposes a params type, an output record type, a pure
//! filter/normalize function over upstream records, and an async `get_*`
//! entry point taking a [`DataSource`](crate::source::DataSource).

pub mod atm;
pub mod bank_branch;
pub mod business_reg;
pub mod coin_cart;
pub mod credit_card;
pub mod fraud_scams;
pub mod hibor;
pub mod licensed_banks;
pub mod neg_equity;
pub mod stamp_duty;
pub mod tender;

pub use atm::{get_atm_locations, AtmLocation, AtmParams};
pub use bank_branch::{get_bank_branch_locations, BankBranch, BankBranchParams};
pub use business_reg::{get_business_stats, BusinessStats, BusinessStatsParams};
pub use coin_cart::{get_coin_cart, CoinCartSchedule};
pub use credit_card::{
    get_credit_card_hotlines, get_credit_card_stats, CreditCardStats, CreditCardStatsParams,
};
pub use fraud_scams::{get_fraudulent_bank_scams, FraudScamsParams};
pub use hibor::{get_hibor_daily_stats, HiborFixing, HiborParams};
pub use licensed_banks::{get_licensed_banks_historical_data, DataType, LicensedBanksParams};
pub use neg_equity::{get_neg_equity_stats, NegEquityParams, NegEquityStats};
pub use stamp_duty::{get_stamp_duty_statistics, StampDutyParams, StampDutyStats};
pub use tender::{get_tender_invitations, TenderInvitations, TenderParams, TenderSegment};
