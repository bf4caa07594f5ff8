//! MCP (Model Context Protocol) server for Hong Kong financial open data
//!
//! Publishes each hkfin-core dataset adapter as a read-only MCP tool. Every
//! call fetches fresh data from the upstream host; nothing is cached.
//!
//! # Transports
//!
//! - stdio, for desktop agent hosts that spawn the server as a subprocess
//! - streamable HTTP at `/mcp`, see [`crate::start_mcp_server`]
//!
//! # Available Tools
//!
//! - `get_business_stats` - Monthly business registrations (IRD)
//! - `get_neg_equity_stats` - Residential mortgages in negative equity
//! - `get_credit_card_stats` - Credit card lending survey
//! - `get_credit_card_hotlines` - Lost credit card hotlines
//! - `get_coin_cart` - Coin collection cart schedule
//! - `get_hkma_tender_invitations` - HKMA tenders and award notices
//! - `get_hibor_daily_stats` - Daily HIBOR fixings
//! - `get_atm_locations` - ATM locator
//! - `get_bank_branch_locations` - Bank branch locator
//! - `get_stamp_duty_statistics` - Stamp duty on stock transfers (IRD)
//! - `get_fraudulent_bank_scams` - Fraudulent bank websites and phishing
//! - `get_licensed_banks_historical_data` - Licensed banks 1954-2002 (AOF)

mod tools;

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool,
    },
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Serialize;
use tracing::debug;

use hkfin_core::{datasets, DataSource, Error};

pub use tools::*;

/// hkfin MCP server state
#[derive(Clone)]
pub struct HkFinanceMcpServer {
    /// Where dataset adapters fetch from
    source: Arc<dyn DataSource>,
    /// Tool router for MCP operations
    tool_router: ToolRouter<Self>,
}

impl HkFinanceMcpServer {
    /// Create a new MCP server backed by the given data source
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            tool_router: Self::tool_router(),
        }
    }

    /// Registered tools, sorted by name
    pub fn tools(&self) -> Vec<Tool> {
        let mut tools = self.tool_router.list_all();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }
}

/// Map an adapter error onto the MCP error space
fn to_mcp_error(e: Error) -> McpError {
    match e {
        Error::InvalidParameter(msg) => McpError::invalid_params(msg, None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

/// Render an adapter result as pretty-printed JSON text content
fn json_result<T: Serialize>(tool: &str, result: hkfin_core::Result<T>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => {
            let text = serde_json::to_string_pretty(&value)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            debug!("{} returned {} bytes", tool, text.len());
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
        Err(e) => {
            debug!("{} failed: {}", tool, e);
            Err(to_mcp_error(e))
        }
    }
}

#[tool_handler]
impl ServerHandler for HkFinanceMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "hkfin".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Hong Kong Finance Open Data".to_string()),
                website_url: Some("https://github.com/hkopenai/hkfin".to_string()),
                icons: None,
            },
            instructions: Some(
                "Tools for Hong Kong financial open data from the HKMA, the Inland Revenue \
                 Department and the Hong Kong Academy of Finance. Use them to look up interbank \
                 rates, mortgage and credit card statistics, bank ATM and branch locations, \
                 tender notices, stamp duty and business registration figures."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl HkFinanceMcpServer {
    #[tool(description = "Get monthly statistics on the number of new business registrations in Hong Kong")]
    async fn get_business_stats(
        &self,
        Parameters(params): Parameters<BusinessStatsParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = datasets::get_business_stats(self.source(), params).await;
        json_result("get_business_stats", result)
    }

    #[tool(description = "Get statistics on residential mortgage loans in negative equity in Hong Kong")]
    async fn get_neg_equity_stats(
        &self,
        Parameters(params): Parameters<NegEquityParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = datasets::get_neg_equity_stats(self.source(), params).await;
        json_result("get_neg_equity_stats", result)
    }

    #[tool(description = "Get credit card lending survey results in Hong Kong")]
    async fn get_credit_card_stats(
        &self,
        Parameters(params): Parameters<CreditCardStatsParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = datasets::get_credit_card_stats(self.source(), params).await;
        json_result("get_credit_card_stats", result)
    }

    #[tool(description = "Get list of hotlines for reporting loss of credit card from Hong Kong banks.")]
    async fn get_credit_card_hotlines(&self) -> Result<CallToolResult, McpError> {
        let result = datasets::get_credit_card_hotlines(self.source()).await;
        json_result("get_credit_card_hotlines", result)
    }

    #[tool(
        description = "Get coin collection cart schedule in Hong Kong. The cart can charge your electronic wallet and you no longer have to keep coins."
    )]
    async fn get_coin_cart(&self) -> Result<CallToolResult, McpError> {
        let result = datasets::get_coin_cart(self.source()).await;
        json_result("get_coin_cart", result)
    }

    #[tool(
        description = "Get information of Tender Invitation and Notice of Award of Contracts from Hong Kong Monetary Authority"
    )]
    async fn get_hkma_tender_invitations(
        &self,
        Parameters(params): Parameters<TenderParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = datasets::get_tender_invitations(self.source(), params).await;
        json_result("get_hkma_tender_invitations", result)
    }

    #[tool(description = "Get daily figures of Hong Kong Interbank Interest Rates (HIBOR) from HKMA")]
    async fn get_hibor_daily_stats(
        &self,
        Parameters(params): Parameters<HiborParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = datasets::get_hibor_daily_stats(self.source(), params).await;
        json_result("get_hibor_daily_stats", result)
    }

    #[tool(description = "Get information on Automated Teller Machines (ATMs) of retail banks in Hong Kong")]
    async fn get_atm_locations(
        &self,
        Parameters(params): Parameters<AtmParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = datasets::get_atm_locations(self.source(), params).await;
        json_result("get_atm_locations", result)
    }

    #[tool(description = "Get information on bank branch locations of retail banks in Hong Kong")]
    async fn get_bank_branch_locations(
        &self,
        Parameters(params): Parameters<BankBranchParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = datasets::get_bank_branch_locations(self.source(), params).await;
        json_result("get_bank_branch_locations", result)
    }

    #[tool(
        description = "Get monthly statistics on stamp duty collected from transfer of Hong Kong stock (both listed and unlisted)"
    )]
    async fn get_stamp_duty_statistics(
        &self,
        Parameters(params): Parameters<StampDutyParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = datasets::get_stamp_duty_statistics(self.source(), params).await;
        json_result("get_stamp_duty_statistics", result)
    }

    #[tool(description = "Get information on fraudulent bank websites and phishing scams reported to HKMA")]
    async fn get_fraudulent_bank_scams(
        &self,
        Parameters(params): Parameters<FraudScamsParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = datasets::get_fraudulent_bank_scams(self.source(), params).await;
        json_result("get_fraudulent_bank_scams", result)
    }

    #[tool(
        description = "Get historical data on licensed banks, bank branches, and bank offices in Hong Kong from 1954-2002"
    )]
    async fn get_licensed_banks_historical_data(
        &self,
        Parameters(params): Parameters<LicensedBanksParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = datasets::get_licensed_banks_historical_data(self.source(), params).await;
        json_result("get_licensed_banks_historical_data", result)
    }
}
