//! MCP tool parameter and result types
//!
//! Re-exports from hkfin_core::datasets. The adapters live in hkfin-core so
//! the CLI can run them without going through MCP.

pub use hkfin_core::datasets::{
    // Params types
    atm::AtmParams,
    bank_branch::BankBranchParams,
    business_reg::BusinessStatsParams,
    credit_card::CreditCardStatsParams,
    fraud_scams::FraudScamsParams,
    hibor::HiborParams,
    licensed_banks::{DataType, LicensedBanksParams},
    neg_equity::NegEquityParams,
    stamp_duty::StampDutyParams,
    tender::{TenderParams, TenderSegment},
    // Result types
    AtmLocation,
    BankBranch,
    BusinessStats,
    CoinCartSchedule,
    CreditCardStats,
    HiborFixing,
    NegEquityStats,
    StampDutyStats,
    TenderInvitations,
};
pub use hkfin_core::Language;
