//! Alpaca market data adapter implementing MarketDataPort.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::application::dto::{Bar, OptionQuote, OptionSnapshot, Quote, StockSnapshot, Trade};
use crate::application::ports::{BarsQuery, FeedOptions, MarketDataPort, TradesQuery};
use crate::error::TradingError;

use super::api_types::{
    BarsPage, LatestBarResponse, LatestQuoteResponse, LatestTradeResponse, OptionQuotesResponse,
    OptionSnapshotsPage, SnapshotsResponse, TradesPage,
};
use super::config::AlpacaConfig;
use super::error::AlpacaError;
use super::http_client::AlpacaHttpClient;
use super::trading::{Query, push_opt, segment};

/// Largest page the data API serves.
const MAX_PAGE_SIZE: u32 = 10_000;

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn feed_params(feed: FeedOptions) -> Query {
    let mut query = Query::new();
    push_opt(&mut query, "feed", feed.feed);
    push_opt(&mut query, "currency", feed.currency);
    query
}

/// Page size for the next request, or `None` once `limit` is satisfied.
fn next_page_size(limit: Option<u32>, collected: usize) -> Option<u32> {
    match limit {
        Some(limit) => {
            let remaining = (limit as usize).saturating_sub(collected);
            (remaining > 0).then(|| remaining.min(MAX_PAGE_SIZE as usize) as u32)
        }
        None => Some(MAX_PAGE_SIZE),
    }
}

/// Alpaca market data API adapter.
#[derive(Debug, Clone)]
pub struct AlpacaMarketDataAdapter {
    client: AlpacaHttpClient,
}

impl AlpacaMarketDataAdapter {
    /// Create a new adapter with its own HTTP client.
    pub fn new(config: &AlpacaConfig) -> Result<Self, AlpacaError> {
        Ok(Self::with_client(AlpacaHttpClient::new(config)?))
    }

    /// Create an adapter over an existing client.
    #[must_use]
    pub const fn with_client(client: AlpacaHttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MarketDataPort for AlpacaMarketDataAdapter {
    async fn get_latest_quote(
        &self,
        symbol: String,
        feed: FeedOptions,
    ) -> Result<Quote, TradingError> {
        let path = format!("/v2/stocks/{}/quotes/latest", segment(&symbol)?);
        let response: LatestQuoteResponse =
            self.client.get_data(&path, &feed_params(feed)).await?;
        Ok(response.quote.into_quote(&symbol))
    }

    async fn get_bars(&self, query: BarsQuery) -> Result<Vec<Bar>, TradingError> {
        let path = format!("/v2/stocks/{}/bars", segment(&query.symbol)?);
        let base: Query = vec![
            ("timeframe", query.timeframe.to_string()),
            ("start", rfc3339(query.window.start)),
            ("end", rfc3339(query.window.end)),
        ];

        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;
        while let Some(page_size) = next_page_size(query.limit, bars.len()) {
            let mut params = base.clone();
            params.push(("limit", page_size.to_string()));
            push_opt(&mut params, "page_token", page_token.take());

            let page: BarsPage = self.client.get_data(&path, &params).await?;
            bars.extend(
                page.bars
                    .unwrap_or_default()
                    .into_iter()
                    .map(|b| b.into_bar(&query.symbol)),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(symbol = %query.symbol, timeframe = %query.timeframe, count = bars.len(), "Fetched bars");
        Ok(bars)
    }

    async fn get_trades(&self, query: TradesQuery) -> Result<Vec<Trade>, TradingError> {
        let path = format!("/v2/stocks/{}/trades", segment(&query.symbol)?);
        let mut base = feed_params(query.feed);
        base.push(("start", rfc3339(query.window.start)));
        base.push(("end", rfc3339(query.window.end)));
        push_opt(&mut base, "sort", query.sort);
        push_opt(&mut base, "asof", query.asof);

        let mut trades = Vec::new();
        let mut page_token: Option<String> = None;
        while let Some(page_size) = next_page_size(query.limit, trades.len()) {
            let mut params = base.clone();
            params.push(("limit", page_size.to_string()));
            push_opt(&mut params, "page_token", page_token.take());

            let page: TradesPage = self.client.get_data(&path, &params).await?;
            trades.extend(
                page.trades
                    .unwrap_or_default()
                    .into_iter()
                    .map(|t| t.into_trade(&query.symbol)),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(trades)
    }

    async fn get_latest_trade(
        &self,
        symbol: String,
        feed: FeedOptions,
    ) -> Result<Trade, TradingError> {
        let path = format!("/v2/stocks/{}/trades/latest", segment(&symbol)?);
        let response: LatestTradeResponse =
            self.client.get_data(&path, &feed_params(feed)).await?;
        Ok(response.trade.into_trade(&symbol))
    }

    async fn get_latest_bar(
        &self,
        symbol: String,
        feed: FeedOptions,
    ) -> Result<Bar, TradingError> {
        let path = format!("/v2/stocks/{}/bars/latest", segment(&symbol)?);
        let response: LatestBarResponse = self.client.get_data(&path, &feed_params(feed)).await?;
        Ok(response.bar.into_bar(&symbol))
    }

    async fn get_snapshots(
        &self,
        symbols: Vec<String>,
        feed: FeedOptions,
    ) -> Result<Vec<StockSnapshot>, TradingError> {
        let mut params = feed_params(feed);
        params.push(("symbols", symbols.join(",")));

        let mut response: SnapshotsResponse = self
            .client
            .get_data("/v2/stocks/snapshots", &params)
            .await?;

        // Keep the caller's order; symbols without data are dropped.
        Ok(symbols
            .iter()
            .filter_map(|symbol| {
                response
                    .remove(symbol)
                    .flatten()
                    .map(|snap| snap.into_snapshot(symbol))
            })
            .collect())
    }

    async fn get_option_latest_quotes(
        &self,
        symbols: Vec<String>,
        feed: Option<String>,
    ) -> Result<Vec<OptionQuote>, TradingError> {
        let mut params: Query = vec![("symbols", symbols.join(","))];
        push_opt(&mut params, "feed", feed);

        let mut response: OptionQuotesResponse = self
            .client
            .get_data("/v1beta1/options/quotes/latest", &params)
            .await?;

        Ok(symbols
            .iter()
            .filter_map(|symbol| {
                response
                    .quotes
                    .remove(symbol)
                    .map(|quote| quote.into_quote(symbol))
            })
            .collect())
    }

    async fn get_option_snapshots(
        &self,
        symbols: Vec<String>,
        feed: Option<String>,
    ) -> Result<Vec<OptionSnapshot>, TradingError> {
        let mut base: Query = vec![("symbols", symbols.join(","))];
        push_opt(&mut base, "feed", feed);

        let mut collected = std::collections::BTreeMap::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut params = base.clone();
            push_opt(&mut params, "page_token", page_token.take());

            let page: OptionSnapshotsPage = self
                .client
                .get_data("/v1beta1/options/snapshots", &params)
                .await?;
            collected.extend(page.snapshots);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(symbols
            .iter()
            .filter_map(|symbol| {
                collected
                    .remove(symbol)
                    .map(|snap| snap.into_snapshot(symbol))
            })
            .collect())
    }
}
