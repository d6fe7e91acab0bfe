use serde::{Deserialize, Deserializer, Serialize};

/// One market index card on the dashboard. Price and change arrive
/// preformatted by the backend (e.g. "24123.50", "1.23%").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub name: String,
    pub price: String,
    pub change: String,
    #[serde(rename = "isPositive")]
    pub is_positive: bool,
}

/// A trending symbol card. The backend also sends `name` and `currency`
/// fields; the currency symbol is always recomputed at render time, so
/// neither is modeled here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub symbol: String,
    pub price: String,
    pub change: String,
    #[serde(rename = "isPositive")]
    pub is_positive: bool,
    pub action: String,
}

/// A symbol search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Fusion insight for one symbol. The AI and technical blocks are optional;
/// older backends omit them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockInsight {
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub ai: Option<AiInsight>,
    #[serde(default)]
    pub technical: Option<TechnicalIndicators>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

/// RED-engine output block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInsight {
    pub regime: String,
    /// 0..1, rendered as a rounded percentage.
    pub confidence: f64,
    pub risk: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    #[serde(rename = "RSI")]
    pub rsi: f64,
    #[serde(rename = "MACD")]
    pub macd: f64,
    pub signal: String,
}

/// Date-string → close price, in the order the backend emitted the keys.
/// That order is chronological and the last entry is the latest price, so
/// deserialization goes through serde_json's order-preserving map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceHistory {
    points: Vec<(String, f64)>,
}

impl PriceHistory {
    pub fn from_points(points: Vec<(String, f64)>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, f64)> {
        self.points.iter()
    }

    /// Last entry of the mapping: (date, price).
    pub fn latest(&self) -> Option<(&str, f64)> {
        self.points.last().map(|(d, p)| (d.as_str(), *p))
    }

    pub fn dates(&self) -> Vec<&str> {
        self.points.iter().map(|(d, _)| d.as_str()).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|(_, p)| *p).collect()
    }
}

impl<'de> Deserialize<'de> for PriceHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = serde_json::Map::deserialize(deserializer)?;
        let points = map
            .into_iter()
            .filter_map(|(date, value)| value.as_f64().map(|p| (date, p)))
            .collect();
        Ok(Self { points })
    }
}

/// One news article for a symbol. Source and datetime are frequently
/// missing; the view substitutes placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_snapshot_uses_wire_field_names() {
        let snap: IndexSnapshot = serde_json::from_str(
            r#"{"name":"Nifty 50","price":"24123.50","change":"0.45%","isPositive":true}"#,
        )
        .unwrap();
        assert_eq!(snap.name, "Nifty 50");
        assert!(snap.is_positive);
    }

    #[test]
    fn trending_entry_ignores_extra_backend_fields() {
        let entry: TrendingEntry = serde_json::from_str(
            r#"{"symbol":"TCS.NS","name":"TCS.NS","price":"4100.00","change":"-0.80%",
                "isPositive":false,"currency":"INR","action":"Sell"}"#,
        )
        .unwrap();
        assert_eq!(entry.symbol, "TCS.NS");
        assert_eq!(entry.action, "Sell");
    }

    #[test]
    fn search_result_renames_type() {
        let hit: SearchResult =
            serde_json::from_str(r#"{"symbol":"AAPL","name":"Apple","type":"Common"}"#).unwrap();
        assert_eq!(hit.kind, "Common");
    }

    #[test]
    fn insight_blocks_are_optional() {
        let insight: StockInsight = serde_json::from_str(r#"{"symbol":"X"}"#).unwrap();
        assert!(insight.market.is_none());
        assert!(insight.ai.is_none());
        assert!(insight.technical.is_none());
        assert!(insight.pros.is_empty());

        let insight: StockInsight = serde_json::from_str(
            r#"{"market":"NSE",
                "ai":{"regime":"BULLISH","confidence":0.82,"risk":"MEDIUM"},
                "technical":{"RSI":61.25,"MACD":1.04,"signal":"BUY"},
                "pros":["p1"],"cons":["c1","c2"]}"#,
        )
        .unwrap();
        assert_eq!(insight.market.as_deref(), Some("NSE"));
        assert_eq!(insight.technical.unwrap().rsi, 61.25);
        assert_eq!(insight.cons.len(), 2);
    }

    #[test]
    fn price_history_preserves_key_order() {
        let history: PriceHistory = serde_json::from_str(
            r#"{"2024-01-03":103.0,"2024-01-01":100.0,"2024-01-02":105.0}"#,
        )
        .unwrap();
        assert_eq!(history.dates(), vec!["2024-01-03", "2024-01-01", "2024-01-02"]);
        assert_eq!(history.latest(), Some(("2024-01-02", 105.0)));
    }

    #[test]
    fn news_item_defaults() {
        let item: NewsItem =
            serde_json::from_str(r#"{"headline":"Markets rally"}"#).unwrap();
        assert!(item.source.is_none());
        assert!(item.datetime.is_none());
        assert_eq!(item.sentiment, "");
        assert!(item.url.is_none());
    }
}
