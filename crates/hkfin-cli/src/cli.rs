//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;

use hkfin_core::datasets::{DataType, TenderSegment};
use hkfin_core::Language;

/// hkfin - Hong Kong financial open data for agents
#[derive(Parser)]
#[command(name = "hkfin")]
#[command(about = "MCP server for Hong Kong financial open data (HKMA, IRD, AOF)", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config override file (defaults to ~/.local/share/hkfin/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the MCP server (stdio unless --http is given)
    Serve {
        /// Serve streamable HTTP at /mcp instead of stdio
        #[arg(long)]
        http: bool,

        /// Host to bind to (HTTP only)
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on (HTTP only)
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// List registered tools
    Tools,

    /// Run one dataset adapter against the live upstream and print JSON
    Fetch {
        #[command(subcommand)]
        dataset: Dataset,
    },

    /// Print the effective configuration
    Config,
}

/// Optional year/month window shared by the monthly and quarterly datasets
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthRangeArgs {
    #[arg(long)]
    pub start_year: Option<i32>,

    #[arg(long)]
    pub start_month: Option<u32>,

    #[arg(long)]
    pub end_year: Option<i32>,

    #[arg(long)]
    pub end_month: Option<u32>,
}

/// Filters shared by the ATM and branch locators
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorArgs {
    /// District name (case-insensitive exact match)
    #[arg(long)]
    pub district: Option<String>,

    /// Bank name (case-insensitive exact match)
    #[arg(long)]
    pub bank_name: Option<String>,

    #[arg(long)]
    pub pagesize: Option<u32>,

    #[arg(long)]
    pub offset: Option<u32>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Dataset {
    /// Monthly business registrations (IRD)
    BusinessStats(MonthRangeArgs),

    /// Residential mortgage loans in negative equity
    NegEquity(MonthRangeArgs),

    /// Credit card lending survey
    CreditCard(MonthRangeArgs),

    /// Hotlines for reporting a lost credit card
    CreditCardHotlines,

    /// Coin collection cart schedule
    CoinCart,

    /// HKMA tender invitations and notices of award
    Tenders {
        #[arg(long, value_parser = parse_enum::<Language>)]
        lang: Option<Language>,

        /// tender or notice
        #[arg(long, value_parser = parse_enum::<TenderSegment>)]
        segment: Option<TenderSegment>,

        #[arg(long)]
        pagesize: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,

        /// YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
    },

    /// Daily HIBOR fixings
    Hibor {
        /// YYYY-MM-DD
        #[arg(long)]
        start_date: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        end_date: Option<String>,
    },

    /// ATM locations
    Atms(LocatorArgs),

    /// Bank branch locations
    Branches {
        #[command(flatten)]
        locator: LocatorArgs,

        #[arg(long, value_parser = parse_enum::<Language>)]
        lang: Option<Language>,
    },

    /// Stamp duty on stock transfers (IRD)
    StampDuty {
        /// YYYYMM
        #[arg(long)]
        start_period: Option<String>,

        /// YYYYMM
        #[arg(long)]
        end_period: Option<String>,
    },

    /// Fraudulent bank websites and phishing scams
    FraudScams {
        #[arg(long, value_parser = parse_enum::<Language>)]
        lang: Option<Language>,
    },

    /// Licensed banks, branches and offices, 1954-2002 (AOF)
    LicensedBanks {
        #[arg(long)]
        start_year: Option<i32>,

        #[arg(long)]
        end_year: Option<i32>,

        /// licensed_banks, bank_branches, bank_offices or all
        #[arg(long, value_parser = parse_enum::<DataType>)]
        data_type: Option<DataType>,

        #[arg(long, value_parser = parse_enum::<Language>)]
        lang: Option<Language>,
    },
}

/// Parse a lowercase enum argument using its serde names
pub fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.trim().to_lowercase()))
        .map_err(|_| format!("unsupported value: {}", s))
}
