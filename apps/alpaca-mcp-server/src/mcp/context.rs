//! MCP Tool Execution Context
//!
//! What tool handlers get to work with: the brokerage ports and a clock.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::ports::{MarketDataPort, TradingPort};

/// Context handed to every tool handler.
#[derive(Clone)]
pub struct ToolContext {
    /// Trading API.
    pub trading: Arc<dyn TradingPort>,
    /// Market data API.
    pub market_data: Arc<dyn MarketDataPort>,
    clock: fn() -> DateTime<Utc>,
}

impl ToolContext {
    /// Create a context using the system clock.
    pub fn new(trading: Arc<dyn TradingPort>, market_data: Arc<dyn MarketDataPort>) -> Self {
        Self {
            trading,
            market_data,
            clock: Utc::now,
        }
    }

    /// Replace the clock used for relative time windows.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Current time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext").finish_non_exhaustive()
    }
}
