//! Display rules shared by the dashboard views: currency heuristics, color
//! coding, and the small text substitutions the backend leaves to the client.

use ratatui::style::Color;
use std::time::Duration;

pub const RUPEE: &str = "₹";
pub const DOLLAR: &str = "$";

/// US tickers the trending view recognizes; everything else defaults to INR.
/// This is a heuristic on the symbol string, not an authoritative venue
/// lookup: unlisted US symbols fall through to the rupee.
pub const US_TICKERS: [&str; 11] = [
    "AAPL", "TSLA", "GOOG", "NVDA", "AMZN", "MSFT", "META", "NFLX", "AMD", "SPY", "QQQ",
];

/// Markets quoted in rupees on the detail page.
const INR_MARKETS: [&str; 3] = ["INDIA", "NSE", "BSE"];

/// Index cards: Indian indices are recognized by name substring.
pub fn index_currency(name: &str) -> &'static str {
    if name.contains("Nifty") || name.contains("Sensex") {
        RUPEE
    } else {
        DOLLAR
    }
}

/// Trending cards: allow-list membership decides the symbol.
pub fn trending_currency(symbol: &str) -> &'static str {
    if US_TICKERS.contains(&symbol) {
        DOLLAR
    } else {
        RUPEE
    }
}

/// Detail page: currency follows the insight's market label.
pub fn market_currency(market: &str) -> &'static str {
    if INR_MARKETS.contains(&market) {
        RUPEE
    } else {
        DOLLAR
    }
}

pub fn change_arrow(is_positive: bool) -> &'static str {
    if is_positive {
        "▲"
    } else {
        "▼"
    }
}

pub fn change_color(is_positive: bool) -> Color {
    if is_positive {
        Color::Green
    } else {
        Color::Red
    }
}

/// Regime text color, matched on substring so "BULLISH"/"Bull Run" both hit.
pub fn regime_color(regime: &str) -> Color {
    if regime.contains("Bull") || regime.contains("BULL") {
        Color::Green
    } else if regime.contains("Bear") || regime.contains("BEAR") {
        Color::Red
    } else {
        Color::Yellow
    }
}

/// Risk gauge fill percent and color. Unknown or absent risk levels fall
/// through to the low bucket.
pub fn risk_gauge(risk: &str) -> (u16, Color) {
    match risk {
        "HIGH" => (90, Color::Red),
        "MEDIUM" => (60, Color::Yellow),
        _ => (30, Color::Green),
    }
}

/// Technical signal color; anything but BUY/SELL keeps the default style.
pub fn signal_color(signal: &str) -> Option<Color> {
    match signal {
        "BUY" => Some(Color::Green),
        "SELL" => Some(Color::Red),
        _ => None,
    }
}

pub fn sentiment_color(sentiment: &str) -> Color {
    match sentiment {
        "Positive" => Color::Green,
        "Negative" => Color::Red,
        _ => Color::DarkGray,
    }
}

/// Placeholder source for articles the news API returned without one.
pub fn news_source(source: Option<&str>) -> &str {
    source.unwrap_or("MarketWire")
}

/// Article date label: RFC 3339 timestamps collapse to the date, missing
/// datetimes render as "Recent", anything else passes through.
pub fn news_date_label(datetime: Option<&str>) -> String {
    match datetime {
        None => "Recent".to_string(),
        Some(raw) => chrono::DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

/// Per-card reveal delay for the news feed.
pub fn stagger_delay(index: usize) -> Duration {
    Duration::from_millis(index as u64 * 100)
}

pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Confidence arrives in 0..1 and renders as a rounded percentage.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_currency_follows_name_substring() {
        assert_eq!(index_currency("Nifty 50"), RUPEE);
        assert_eq!(index_currency("Nifty 500"), RUPEE);
        assert_eq!(index_currency("Sensex"), RUPEE);
        assert_eq!(index_currency("S&P 500"), DOLLAR);
        assert_eq!(index_currency("Dow Jones"), DOLLAR);
    }

    #[test]
    fn trending_currency_uses_allow_list() {
        for symbol in US_TICKERS {
            assert_eq!(trending_currency(symbol), DOLLAR, "{symbol}");
        }
        assert_eq!(trending_currency("TCS.NS"), RUPEE);
        assert_eq!(trending_currency("RELIANCE.NS"), RUPEE);
        // Non-member US listings still default to INR; documented heuristic.
        assert_eq!(trending_currency("IBM"), RUPEE);
    }

    #[test]
    fn market_currency_recognizes_indian_venues() {
        assert_eq!(market_currency("INDIA"), RUPEE);
        assert_eq!(market_currency("NSE"), RUPEE);
        assert_eq!(market_currency("BSE"), RUPEE);
        assert_eq!(market_currency("GLOBAL"), DOLLAR);
        assert_eq!(market_currency("NASDAQ"), DOLLAR);
    }

    #[test]
    fn risk_gauge_levels() {
        assert_eq!(risk_gauge("HIGH"), (90, Color::Red));
        assert_eq!(risk_gauge("MEDIUM"), (60, Color::Yellow));
        assert_eq!(risk_gauge("LOW"), (30, Color::Green));
        assert_eq!(risk_gauge("unknown"), (30, Color::Green));
        assert_eq!(risk_gauge(""), (30, Color::Green));
    }

    #[test]
    fn regime_and_signal_colors() {
        assert_eq!(regime_color("BULLISH"), Color::Green);
        assert_eq!(regime_color("Bearish"), Color::Red);
        assert_eq!(regime_color("SIDEWAYS"), Color::Yellow);
        assert_eq!(signal_color("BUY"), Some(Color::Green));
        assert_eq!(signal_color("SELL"), Some(Color::Red));
        assert_eq!(signal_color("HOLD"), None);
    }

    #[test]
    fn news_fallbacks() {
        assert_eq!(news_source(None), "MarketWire");
        assert_eq!(news_source(Some("Reuters")), "Reuters");
        assert_eq!(news_date_label(None), "Recent");
        assert_eq!(
            news_date_label(Some("2024-03-05T10:30:00Z")),
            "2024-03-05"
        );
        assert_eq!(news_date_label(Some("last week")), "last week");
    }

    #[test]
    fn stagger_grows_by_tenth_of_a_second() {
        assert_eq!(stagger_delay(0), Duration::from_millis(0));
        assert_eq!(stagger_delay(1), Duration::from_millis(100));
        assert_eq!(stagger_delay(4), Duration::from_millis(400));
    }

    #[test]
    fn price_and_confidence_formatting() {
        assert_eq!(format_price(105.0), "105.00");
        assert_eq!(format_price(4123.456), "4123.46");
        assert_eq!(format_confidence(0.824), "82%");
    }
}
