//! Alpaca trading adapter implementing TradingPort.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;

use crate::application::dto::{
    Account, Asset, CalendarDay, CancelResult, ClosePositionResult, CorporateAnnouncement,
    MarketClock, OptionContract, Order, Position, Watchlist,
};
use crate::application::ports::{
    AnnouncementQuery, AssetQuery, CloseAmount, OptionContractQuery, OrderQuery, OrderRequest,
    TradingPort, WatchlistUpdate,
};
use crate::error::TradingError;

use super::api_types::{
    AlpacaAsset, AlpacaCancelStatus, AlpacaCloseStatus, AlpacaOptionContractsPage,
    AlpacaOrderRequest, AlpacaOrderResponse, AlpacaWatchlist, AlpacaWatchlistRequest,
};
use super::config::{AlpacaConfig, AlpacaEnvironment};
use super::error::AlpacaError;
use super::http_client::AlpacaHttpClient;

/// Query string pairs.
pub(super) type Query = Vec<(&'static str, String)>;

/// Append `key=value` when a value is present.
pub(super) fn push_opt<V: ToString>(query: &mut Query, key: &'static str, value: Option<V>) {
    if let Some(value) = value {
        query.push((key, value.to_string()));
    }
}

/// Percent-encode a symbol or id as exactly one path segment.
///
/// `/`, `?`, `#` and `%` are escaped. Empty and dot segments are refused:
/// URL parsing folds them into the parent collection.
pub(super) fn segment(value: &str) -> Result<String, AlpacaError> {
    let value = value.trim();
    if matches!(value, "" | "." | "..") {
        return Err(AlpacaError::InvalidPathSegment(value.to_string()));
    }

    let mut url = Url::parse("http://localhost/").map_err(|e| AlpacaError::Http(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| AlpacaError::InvalidPathSegment(value.to_string()))?
        .clear()
        .push(value);
    Ok(url.path().trim_start_matches('/').to_string())
}

/// Alpaca trading API adapter.
#[derive(Debug, Clone)]
pub struct AlpacaTradingAdapter {
    client: AlpacaHttpClient,
    environment: AlpacaEnvironment,
}

impl AlpacaTradingAdapter {
    /// Create a new adapter with its own HTTP client.
    pub fn new(config: &AlpacaConfig) -> Result<Self, AlpacaError> {
        Ok(Self::with_client(
            AlpacaHttpClient::new(config)?,
            config.environment,
        ))
    }

    /// Create an adapter over an existing client.
    #[must_use]
    pub const fn with_client(client: AlpacaHttpClient, environment: AlpacaEnvironment) -> Self {
        Self {
            client,
            environment,
        }
    }

    /// Check if we're in live trading mode.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.environment.is_live()
    }
}

#[async_trait]
impl TradingPort for AlpacaTradingAdapter {
    async fn get_account(&self) -> Result<Account, TradingError> {
        Ok(self.client.get("/v2/account", &[]).await?)
    }

    async fn get_positions(&self) -> Result<Vec<Position>, TradingError> {
        Ok(self.client.get("/v2/positions", &[]).await?)
    }

    async fn get_open_position(&self, symbol: String) -> Result<Position, TradingError> {
        let path = format!("/v2/positions/{}", segment(&symbol)?);
        Ok(self.client.get(&path, &[]).await?)
    }

    async fn close_position(
        &self,
        symbol: String,
        amount: Option<CloseAmount>,
    ) -> Result<Order, TradingError> {
        let path = format!("/v2/positions/{}", segment(&symbol)?);
        let query: Query = match amount {
            Some(CloseAmount::Qty(qty)) => vec![("qty", qty.normalize().to_string())],
            Some(CloseAmount::Percentage(pct)) => {
                vec![("percentage", pct.normalize().to_string())]
            }
            None => Vec::new(),
        };

        tracing::info!(%symbol, ?amount, environment = %self.environment, "Closing position");
        let response: AlpacaOrderResponse = self.client.delete_json(&path, &query).await?;
        Ok(response.into())
    }

    async fn close_all_positions(
        &self,
        cancel_orders: bool,
    ) -> Result<Vec<ClosePositionResult>, TradingError> {
        tracing::info!(cancel_orders, environment = %self.environment, "Closing all positions");
        let statuses: Option<Vec<AlpacaCloseStatus>> = self
            .client
            .delete_json("/v2/positions", &[("cancel_orders", cancel_orders.to_string())])
            .await?;
        Ok(statuses
            .unwrap_or_default()
            .into_iter()
            .map(ClosePositionResult::from)
            .collect())
    }

    async fn get_orders(&self, query: OrderQuery) -> Result<Vec<Order>, TradingError> {
        let params = [
            ("status", query.status.as_str().to_string()),
            ("limit", query.limit.to_string()),
            ("nested", "true".to_string()),
        ];
        let orders: Vec<AlpacaOrderResponse> = self.client.get("/v2/orders", &params).await?;
        Ok(orders.into_iter().map(Order::from).collect())
    }

    async fn place_order(&self, request: OrderRequest) -> Result<Order, TradingError> {
        let body = AlpacaOrderRequest::from(&request);

        if self.is_live() {
            tracing::warn!(
                client_order_id = %request.client_order_id,
                symbol = ?body.symbol,
                legs = body.legs.len(),
                "Submitting LIVE order - this will execute real trades"
            );
        }

        tracing::info!(
            client_order_id = %request.client_order_id,
            symbol = ?body.symbol,
            side = ?body.side,
            order_type = %body.order_type,
            order_class = %body.order_class,
            qty = %body.qty,
            limit_price = ?body.limit_price,
            "Submitting order to Alpaca"
        );

        let response: AlpacaOrderResponse = self.client.post("/v2/orders", &body).await?;

        tracing::info!(
            client_order_id = %request.client_order_id,
            broker_order_id = %response.id,
            status = %response.status,
            "Order submitted successfully"
        );

        Ok(response.into())
    }

    async fn cancel_all_orders(&self) -> Result<Vec<CancelResult>, TradingError> {
        let statuses: Option<Vec<AlpacaCancelStatus>> =
            self.client.delete_json("/v2/orders", &[]).await?;
        let results: Vec<CancelResult> = statuses
            .unwrap_or_default()
            .into_iter()
            .map(CancelResult::from)
            .collect();
        tracing::info!(count = results.len(), "Canceled open orders");
        Ok(results)
    }

    async fn cancel_order(&self, order_id: String) -> Result<(), TradingError> {
        let path = format!("/v2/orders/{}", segment(&order_id)?);
        self.client.delete(&path).await?;
        tracing::info!(%order_id, "Order canceled");
        Ok(())
    }

    async fn get_asset(&self, symbol: String) -> Result<Asset, TradingError> {
        let path = format!("/v2/assets/{}", segment(&symbol)?);
        let asset: AlpacaAsset = self.client.get(&path, &[]).await?;
        Ok(asset.into())
    }

    async fn get_assets(&self, query: AssetQuery) -> Result<Vec<Asset>, TradingError> {
        let mut params = Query::new();
        push_opt(&mut params, "status", query.status);
        push_opt(&mut params, "asset_class", query.asset_class);
        push_opt(&mut params, "exchange", query.exchange);
        if !query.attributes.is_empty() {
            params.push(("attributes", query.attributes.join(",")));
        }

        let assets: Vec<AlpacaAsset> = self.client.get("/v2/assets", &params).await?;
        Ok(assets.into_iter().map(Asset::from).collect())
    }

    async fn create_watchlist(
        &self,
        name: String,
        symbols: Vec<String>,
    ) -> Result<Watchlist, TradingError> {
        let body = AlpacaWatchlistRequest {
            name,
            symbols: Some(symbols),
        };
        let list: AlpacaWatchlist = self.client.post("/v2/watchlists", &body).await?;
        Ok(list.into())
    }

    async fn get_watchlists(&self) -> Result<Vec<Watchlist>, TradingError> {
        let lists: Vec<AlpacaWatchlist> = self.client.get("/v2/watchlists", &[]).await?;
        Ok(lists.into_iter().map(Watchlist::from).collect())
    }

    async fn get_watchlist(&self, watchlist_id: String) -> Result<Watchlist, TradingError> {
        let path = format!("/v2/watchlists/{}", segment(&watchlist_id)?);
        let list: AlpacaWatchlist = self.client.get(&path, &[]).await?;
        Ok(list.into())
    }

    async fn update_watchlist(
        &self,
        watchlist_id: String,
        update: WatchlistUpdate,
    ) -> Result<Watchlist, TradingError> {
        let path = format!("/v2/watchlists/{}", segment(&watchlist_id)?);
        // The endpoint requires a name even when only the symbols change.
        let name = match update.name {
            Some(name) => name,
            None => {
                let current: AlpacaWatchlist = self.client.get(&path, &[]).await?;
                current.name
            }
        };
        let body = AlpacaWatchlistRequest {
            name,
            symbols: update.symbols,
        };
        let list: AlpacaWatchlist = self.client.put(&path, &body).await?;
        Ok(list.into())
    }

    async fn delete_watchlist(&self, watchlist_id: String) -> Result<(), TradingError> {
        let path = format!("/v2/watchlists/{}", segment(&watchlist_id)?);
        self.client.delete(&path).await?;
        Ok(())
    }

    async fn get_clock(&self) -> Result<MarketClock, TradingError> {
        Ok(self.client.get("/v2/clock", &[]).await?)
    }

    async fn get_calendar(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CalendarDay>, TradingError> {
        let params = [("start", start.to_string()), ("end", end.to_string())];
        Ok(self.client.get("/v2/calendar", &params).await?)
    }

    async fn get_option_contracts(
        &self,
        query: OptionContractQuery,
    ) -> Result<Vec<OptionContract>, TradingError> {
        let mut base = Query::new();
        base.push(("underlying_symbols", query.underlying_symbol));
        push_opt(&mut base, "expiration_date", query.expiration_date);
        push_opt(&mut base, "strike_price_gte", query.strike_price_gte);
        push_opt(&mut base, "strike_price_lte", query.strike_price_lte);
        push_opt(&mut base, "type", query.contract_type.map(|t| t.as_str()));
        push_opt(&mut base, "status", query.status);
        push_opt(&mut base, "root_symbol", query.root_symbol);

        let mut contracts = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut params = base.clone();
            if let Some(limit) = query.limit {
                let remaining = limit as usize - contracts.len();
                params.push(("limit", remaining.to_string()));
            }
            push_opt(&mut params, "page_token", page_token.take());

            let page: AlpacaOptionContractsPage =
                self.client.get("/v2/options/contracts", &params).await?;
            contracts.extend(page.option_contracts.into_iter().map(OptionContract::from));

            // Without a limit only the first page is returned.
            let wants_more = query
                .limit
                .is_some_and(|limit| contracts.len() < limit as usize);
            match page.next_page_token {
                Some(token) if wants_more && !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(contracts)
    }

    async fn get_corporate_announcements(
        &self,
        query: AnnouncementQuery,
    ) -> Result<Vec<CorporateAnnouncement>, TradingError> {
        let mut params: Query = vec![
            ("ca_types", query.ca_types.join(",")),
            ("since", query.since.to_string()),
            ("until", query.until.to_string()),
        ];
        push_opt(&mut params, "symbol", query.symbol);
        push_opt(&mut params, "cusip", query.cusip);
        push_opt(&mut params, "date_type", query.date_type);

        Ok(self
            .client
            .get("/v2/corporate_actions/announcements", &params)
            .await?)
    }
}
