use pulse_core::{
    IndexSnapshot, NewsItem, PriceHistory, PulseError, SearchResult, StockInsight, TrendingEntry,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Typed client for the dashboard backend. All endpoints are GET + JSON,
/// relative to the backend origin.
#[derive(Clone)]
pub struct PulseClient {
    base_url: String,
    client: Client,
}

impl PulseClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, PulseError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| PulseError::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PulseError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| PulseError::Decode(e.to_string()))
    }

    /// Index snapshots for the market pulse grid.
    pub async fn market_pulse(&self) -> Result<Vec<IndexSnapshot>, PulseError> {
        let body: MarketPulseResponse = self.get_json("/market-pulse", &[]).await?;
        Ok(body.indices)
    }

    /// Trending symbols with their action labels.
    pub async fn trending(&self) -> Result<Vec<TrendingEntry>, PulseError> {
        self.get_json("/trending", &[]).await
    }

    /// Symbol search. The backend returns an empty array for blank queries;
    /// the caller is expected to suppress sub-2-character queries itself.
    pub async fn search(&self, q: &str) -> Result<Vec<SearchResult>, PulseError> {
        self.get_json("/search", &[("q", q)]).await
    }

    /// Fusion insight (market label, AI block, technicals, pros/cons).
    pub async fn insight(&self, symbol: &str) -> Result<StockInsight, PulseError> {
        self.get_json("/fusion/insight", &[("symbol", symbol)]).await
    }

    /// Recent closes, keyed by date in chronological order. The backend
    /// omits `prices` entirely for symbols it has no data for.
    pub async fn price_history(&self, symbol: &str) -> Result<Option<PriceHistory>, PulseError> {
        let body: PricesResponse = self.get_json("/get_prices", &[("symbol", symbol)]).await?;
        Ok(body.prices)
    }

    /// News articles for a symbol, newest first.
    pub async fn news(&self, symbol: &str) -> Result<Vec<NewsItem>, PulseError> {
        self.get_json("/news", &[("symbol", symbol)]).await
    }
}

#[derive(Debug, Deserialize)]
struct MarketPulseResponse {
    #[serde(default)]
    indices: Vec<IndexSnapshot>,
}

#[derive(Debug, Deserialize)]
struct PricesResponse {
    #[serde(default)]
    prices: Option<PriceHistory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_pulse_response_unwraps_indices() {
        let body: MarketPulseResponse = serde_json::from_str(
            r#"{"market_pulse":"Bullish","description":"x","confidence":75,
                "indices":[{"name":"Sensex","price":"80000.00","change":"0.10%","isPositive":true}]}"#,
        )
        .unwrap();
        assert_eq!(body.indices.len(), 1);
        assert_eq!(body.indices[0].name, "Sensex");
    }

    #[test]
    fn prices_response_without_prices_is_none() {
        let body: PricesResponse =
            serde_json::from_str(r#"{"error":"Invalid stock symbol or no data available"}"#)
                .unwrap();
        assert!(body.prices.is_none());
    }

    #[test]
    fn prices_response_keeps_order() {
        let body: PricesResponse = serde_json::from_str(
            r#"{"symbol":"AAPL","prices":{"2024-01-01":100.0,"2024-01-02":105.0}}"#,
        )
        .unwrap();
        let prices = body.prices.unwrap();
        assert_eq!(prices.latest(), Some(("2024-01-02", 105.0)));
    }
}
