//! Application state and event routing.
//!
//! All network work runs in spawned tasks; results come back over one
//! unbounded channel as [`UiMsg`] values and are folded into the views on
//! the main loop. The views themselves never touch the network.

use crate::views::detail::{DetailData, StockDetailView};
use crate::views::pulse::MarketPulseView;
use crate::views::search::{SearchAction, SearchBox};
use crate::views::trending::TrendingView;
use crossterm::event::{
    Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use pulse_client::PulseClient;
use pulse_core::{IndexSnapshot, PulseError, SearchResult, TrendingEntry};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;

pub enum UiMsg {
    Pulse(Result<Vec<IndexSnapshot>, PulseError>),
    Trending(Result<Vec<TrendingEntry>, PulseError>),
    Search {
        seq: u64,
        result: Result<Vec<SearchResult>, PulseError>,
    },
    Detail {
        symbol: String,
        result: Result<DetailData, PulseError>,
    },
}

#[derive(Debug, PartialEq)]
enum Page {
    Dashboard,
    Detail,
}

pub struct App {
    client: PulseClient,
    tx: UnboundedSender<UiMsg>,
    page: Page,
    pulse: MarketPulseView,
    trending: TrendingView,
    search: SearchBox,
    detail: StockDetailView,
    should_quit: bool,
}

impl App {
    pub fn new(client: PulseClient, tx: UnboundedSender<UiMsg>) -> Self {
        Self {
            client,
            tx,
            page: Page::Dashboard,
            pulse: MarketPulseView::new(),
            trending: TrendingView::new(),
            search: SearchBox::new(),
            detail: StockDetailView::new(),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Kick off both dashboard fetches. They complete independently and
    /// each updates only its own grid.
    pub fn refresh_dashboard(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiMsg::Pulse(client.market_pulse().await));
        });

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiMsg::Trending(client.trending().await));
        });
    }

    /// Navigate to a symbol's detail page and load it. The three endpoint
    /// calls run sequentially in one task; the first failure aborts the
    /// whole load.
    pub fn open_detail(&mut self, symbol: &str) {
        self.page = Page::Detail;
        self.detail.begin(symbol);
        self.search.hide_results();
        self.search.blur();

        let client = self.client.clone();
        let tx = self.tx.clone();
        let symbol = symbol.to_string();
        tokio::spawn(async move {
            let result: Result<DetailData, PulseError> = async {
                let insight = client.insight(&symbol).await?;
                let history = client.price_history(&symbol).await?;
                let news = client.news(&symbol).await?;
                Ok(DetailData {
                    insight,
                    history,
                    news,
                })
            }
            .await;
            let _ = tx.send(UiMsg::Detail { symbol, result });
        });
    }

    fn issue_search(&self, seq: u64, query: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.search(&query).await;
            let _ = tx.send(UiMsg::Search { seq, result });
        });
    }

    /// Fold a completed fetch into the views.
    pub fn apply(&mut self, msg: UiMsg, now: Instant) {
        match msg {
            UiMsg::Pulse(result) => self.pulse.apply(result),
            UiMsg::Trending(result) => self.trending.apply(result),
            UiMsg::Search { seq, result } => self.search.apply(seq, result),
            UiMsg::Detail { symbol, result } => self.detail.apply(&symbol, result, now),
        }
    }

    /// Fires the debounced search query once its idle window has elapsed.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some((seq, query)) = self.search.poll(now) {
            self.issue_search(seq, query);
        }
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    self.should_quit = true;
                    return;
                }
                if self.search.is_focused() {
                    self.handle_search_key(key.code, now);
                } else {
                    match self.page {
                        Page::Dashboard => self.handle_dashboard_key(key.code),
                        Page::Detail => self.handle_detail_key(key.code),
                    }
                }
            }
            Event::Mouse(mouse) => {
                if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                    self.handle_click(mouse.column, mouse.row);
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode, now: Instant) {
        match code {
            KeyCode::Esc => {
                self.search.blur();
                self.search.hide_results();
            }
            KeyCode::Enter => {
                if let Some(SearchAction::Open(symbol)) = self.search.confirm() {
                    self.open_detail(&symbol);
                }
            }
            KeyCode::Up => self.search.select_prev(),
            KeyCode::Down => self.search.select_next(),
            KeyCode::Backspace => self.search.on_backspace(now),
            KeyCode::Char(c) => self.search.on_char(c, now),
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.search.focus(),
            KeyCode::Char('r') => self.refresh_dashboard(),
            KeyCode::Left => self.trending.select_prev(),
            KeyCode::Right => self.trending.select_next(),
            KeyCode::Enter => {
                if let Some(symbol) = self.trending.selected_symbol().map(String::from) {
                    self.open_detail(&symbol);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => self.page = Page::Dashboard,
            KeyCode::Char('/') => {
                self.page = Page::Dashboard;
                self.search.focus();
            }
            KeyCode::Char('r') => {
                let symbol = self.detail.symbol().to_string();
                if !symbol.is_empty() {
                    self.open_detail(&symbol);
                }
            }
            KeyCode::Up => self.detail.select_news_prev(),
            KeyCode::Down => self.detail.select_news_next(),
            KeyCode::Enter | KeyCode::Char('o') => {
                if let Some(url) = self.detail.selected_news_url() {
                    if let Err(e) = open::that(&url) {
                        tracing::warn!("failed to open {url}: {e}");
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) {
        // The search box sees every click: it decides focus and whether the
        // results panel stays open.
        if let Some(SearchAction::Open(symbol)) = self.search.handle_click(column, row) {
            self.open_detail(&symbol);
            return;
        }
        if self.page == Page::Dashboard {
            if let Some(symbol) = self.trending.symbol_at(column, row).map(String::from) {
                self.open_detail(&symbol);
            }
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, now: Instant) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(frame.area());

        self.search.draw_input(frame, rows[0]);

        match self.page {
            Page::Dashboard => {
                let panels = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(7), Constraint::Min(0)])
                    .split(rows[1]);
                self.pulse.draw(frame, panels[0]);
                self.trending.draw(frame, panels[1]);
            }
            Page::Detail => self.detail.draw(frame, rows[1], now),
        }

        // Overlay, so it must go last.
        self.search.draw_results(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(PulseClient::new("http://localhost:8000"), tx)
    }

    fn snapshot(name: &str) -> IndexSnapshot {
        IndexSnapshot {
            name: name.to_string(),
            price: "100.00".to_string(),
            change: "0.50%".to_string(),
            is_positive: true,
        }
    }

    #[tokio::test]
    async fn messages_route_to_their_views() {
        let mut app = app();
        app.apply(UiMsg::Pulse(Ok(vec![snapshot("Nifty 50")])), Instant::now());
        assert_eq!(app.pulse.cards().len(), 1);

        app.apply(
            UiMsg::Pulse(Err(PulseError::Api("down".into()))),
            Instant::now(),
        );
        assert_eq!(app.pulse.cards().len(), 1);
    }

    #[tokio::test]
    async fn opening_a_detail_page_switches_and_clears_search() {
        let mut app = app();
        app.search.focus();
        app.open_detail("AAPL");
        assert_eq!(app.page, Page::Detail);
        assert_eq!(app.detail.symbol(), "AAPL");
        assert!(!app.search.is_focused());
    }

    #[tokio::test]
    async fn esc_returns_to_the_dashboard() {
        let mut app = app();
        app.open_detail("AAPL");
        app.handle_detail_key(KeyCode::Esc);
        assert_eq!(app.page, Page::Dashboard);
    }

    #[tokio::test]
    async fn detail_response_for_the_current_symbol_lands() {
        let mut app = app();
        app.open_detail("AAPL");
        app.apply(
            UiMsg::Detail {
                symbol: "AAPL".to_string(),
                result: Err(PulseError::Status {
                    status: 404,
                    body: String::new(),
                }),
            },
            Instant::now(),
        );
        assert!(app.detail.is_error());
    }
}
