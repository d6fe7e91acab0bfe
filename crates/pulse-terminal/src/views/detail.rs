//! Stock detail page: fused insight, price chart, and the news feed.
//!
//! The whole page is fed by one background load (insight, then prices, then
//! news). Any failure in that chain collapses to a single error line; the
//! page never renders a partial result.

use crate::chart::ChartAdapter;
use crate::format;
use pulse_core::{NewsItem, PriceHistory, PulseError, StockInsight};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;
use std::time::Instant;

pub const LOAD_ERROR: &str = "Error loading data. Stock might be invalid.";
const NEWS_LIMIT: usize = 5;

/// Everything the detail page needs, fetched as one unit.
pub struct DetailData {
    pub insight: StockInsight,
    pub history: Option<PriceHistory>,
    pub news: Vec<NewsItem>,
}

enum DetailState {
    Loading,
    Error,
    Ready(DetailData),
}

pub struct StockDetailView {
    symbol: String,
    state: DetailState,
    chart: ChartAdapter,
    /// When the page became ready; drives the news feed's staggered reveal.
    loaded_at: Option<Instant>,
    news_selected: usize,
}

impl StockDetailView {
    pub fn new() -> Self {
        Self {
            symbol: String::new(),
            state: DetailState::Loading,
            chart: ChartAdapter::new(),
            loaded_at: None,
            news_selected: 0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Start loading a symbol. Clears whatever the page showed before.
    pub fn begin(&mut self, symbol: &str) {
        self.symbol = symbol.to_string();
        self.state = DetailState::Loading;
        self.chart = ChartAdapter::new();
        self.loaded_at = None;
        self.news_selected = 0;
    }

    /// Load outcome. A response for a symbol the user has already navigated
    /// away from is dropped.
    pub fn apply(&mut self, symbol: &str, result: Result<DetailData, PulseError>, now: Instant) {
        if symbol != self.symbol {
            tracing::debug!("dropping detail response for {symbol}, now on {}", self.symbol);
            return;
        }
        match result {
            Ok(data) => {
                if let Some(history) = &data.history {
                    self.chart.render(history);
                }
                self.state = DetailState::Ready(data);
                self.loaded_at = Some(now);
                self.news_selected = 0;
            }
            Err(e) => {
                tracing::warn!("detail load for {symbol} failed: {e}");
                self.state = DetailState::Error;
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.state, DetailState::Error)
    }

    pub fn chart(&self) -> &ChartAdapter {
        &self.chart
    }

    fn news(&self) -> &[NewsItem] {
        match &self.state {
            DetailState::Ready(data) => {
                let n = data.news.len().min(NEWS_LIMIT);
                &data.news[..n]
            }
            _ => &[],
        }
    }

    /// How many news cards have passed their reveal delay by `now`.
    fn revealed_news(&self, now: Instant) -> usize {
        let Some(loaded_at) = self.loaded_at else {
            return 0;
        };
        let elapsed = now.duration_since(loaded_at);
        self.news()
            .iter()
            .enumerate()
            .take_while(|(i, _)| elapsed >= format::stagger_delay(*i))
            .count()
    }

    pub fn select_news_prev(&mut self) {
        self.news_selected = self.news_selected.saturating_sub(1);
    }

    pub fn select_news_next(&mut self) {
        let len = self.news().len();
        if len > 0 {
            self.news_selected = (self.news_selected + 1).min(len - 1);
        }
    }

    /// URL of the highlighted article, for the caller to open externally.
    pub fn selected_news_url(&self) -> Option<String> {
        self.news().get(self.news_selected).and_then(|n| n.url.clone())
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, now: Instant) {
        match &self.state {
            DetailState::Loading => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.symbol));
                frame.render_widget(
                    Paragraph::new("Loading...").block(block),
                    area,
                );
            }
            DetailState::Error => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.symbol));
                frame.render_widget(
                    Paragraph::new(Span::styled(LOAD_ERROR, Style::default().fg(Color::Red)))
                        .block(block),
                    area,
                );
            }
            DetailState::Ready(data) => self.draw_ready(frame, area, data, now),
        }
    }

    fn draw_ready(&self, frame: &mut Frame, area: Rect, data: &DetailData, now: Instant) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Min(5),
            ])
            .split(area);

        self.draw_header(frame, rows[0], data);
        self.chart.draw(frame, rows[1]);
        draw_insight(frame, rows[2], &data.insight);
        self.draw_news(frame, rows[3], now);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect, data: &DetailData) {
        let market = data.insight.market.as_deref().unwrap_or("GLOBAL");
        let currency = format::market_currency(market);
        let mut spans = vec![
            Span::styled(
                self.symbol.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {market}"), Style::default().fg(Color::DarkGray)),
        ];
        if let Some((_, price)) = data.history.as_ref().and_then(|h| h.latest()) {
            spans.push(Span::raw(format!(
                "  {}{}",
                currency,
                format::format_price(price)
            )));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans))
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
    }

    fn draw_news(&self, frame: &mut Frame, area: Rect, now: Instant) {
        let outer = Block::default().borders(Borders::ALL).title(" News ");
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let news = self.news();
        if news.is_empty() {
            frame.render_widget(Paragraph::new("No specific news found."), inner);
            return;
        }

        let mut lines = Vec::new();
        for (i, item) in news.iter().take(self.revealed_news(now)).enumerate() {
            let headline_style = if i == self.news_selected {
                Style::default()
                    .fg(format::sentiment_color(&item.sentiment))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(format::sentiment_color(&item.sentiment))
            };
            lines.push(Line::from(Span::styled(item.headline.as_str(), headline_style)));
            lines.push(Line::from(Span::styled(
                format!(
                    "  {} · {}",
                    format::news_source(item.source.as_deref()),
                    format::news_date_label(item.datetime.as_deref())
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn draw_insight(frame: &mut Frame, area: Rect, insight: &StockInsight) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    draw_ai_panel(frame, columns[0], insight);
    draw_technical_panel(frame, columns[1], insight);
    draw_pros_cons(frame, columns[2], insight);
}

fn draw_ai_panel(frame: &mut Frame, area: Rect, insight: &StockInsight) {
    let block = Block::default().borders(Borders::ALL).title(" AI Insight ");
    let Some(ai) = &insight.ai else {
        frame.render_widget(Paragraph::new("No AI insight.").block(block), area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let text = vec![
        Line::from(vec![
            Span::raw("Regime: "),
            Span::styled(
                ai.regime.as_str(),
                Style::default().fg(format::regime_color(&ai.regime)),
            ),
        ]),
        Line::from(format!(
            "Confidence: {}",
            format::format_confidence(ai.confidence)
        )),
    ];
    frame.render_widget(Paragraph::new(text), rows[0]);

    let (percent, color) = format::risk_gauge(&ai.risk);
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(color))
            .percent(percent)
            .label(format!("Risk: {}", ai.risk)),
        rows[1],
    );
}

fn draw_technical_panel(frame: &mut Frame, area: Rect, insight: &StockInsight) {
    let block = Block::default().borders(Borders::ALL).title(" Technicals ");
    let Some(tech) = &insight.technical else {
        frame.render_widget(Paragraph::new("No technical data.").block(block), area);
        return;
    };

    let signal_style = match format::signal_color(&tech.signal) {
        Some(color) => Style::default().fg(color).add_modifier(Modifier::BOLD),
        None => Style::default(),
    };
    let text = vec![
        Line::from(format!("RSI:  {:.2}", tech.rsi)),
        Line::from(format!("MACD: {:.2}", tech.macd)),
        Line::from(vec![
            Span::raw("Signal: "),
            Span::styled(tech.signal.as_str(), signal_style),
        ]),
    ];
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_pros_cons(frame: &mut Frame, area: Rect, insight: &StockInsight) {
    let block = Block::default().borders(Borders::ALL).title(" Pros / Cons ");
    let mut lines = Vec::new();
    for pro in &insight.pros {
        lines.push(Line::from(Span::styled(
            format!("✓ {pro}"),
            Style::default().fg(Color::Green),
        )));
    }
    for con in &insight.cons {
        lines.push(Line::from(Span::styled(
            format!("✕ {con}"),
            Style::default().fg(Color::Red),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from("No factors listed."));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
