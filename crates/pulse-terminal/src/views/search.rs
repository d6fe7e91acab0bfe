//! Debounced search box with a dropdown results panel.
//!
//! Keystrokes reset a 300ms timer; only the last query in an idle window is
//! issued. Responses carry a generation number so a slow response for an
//! already-superseded query can never overwrite the panel.

use pulse_core::{PulseError, SearchResult};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use std::time::{Duration, Instant};

const DEBOUNCE_IDLE: Duration = Duration::from_millis(300);
const MIN_QUERY_CHARS: usize = 2;
const MAX_VISIBLE_RESULTS: usize = 8;

pub enum SearchAction {
    Open(String),
}

/// Pending-query timer. A new keystroke replaces the pending query and
/// restarts the idle window.
#[derive(Default)]
struct Debounce {
    pending: Option<(String, Instant)>,
}

impl Debounce {
    fn press(&mut self, query: String, now: Instant) {
        self.pending = Some((query, now));
    }

    fn clear(&mut self) {
        self.pending = None;
    }

    fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.duration_since(*at) >= DEBOUNCE_IDLE => {
                self.pending.take().map(|(q, _)| q)
            }
            _ => None,
        }
    }
}

pub struct SearchBox {
    input: String,
    focused: bool,
    debounce: Debounce,
    /// Generation of the most recently issued query.
    seq: u64,
    results: Vec<SearchResult>,
    open: bool,
    selected: usize,
    input_area: Option<Rect>,
    results_area: Option<Rect>,
}

impl SearchBox {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            focused: false,
            debounce: Debounce::default(),
            seq: 0,
            results: Vec::new(),
            open: false,
            selected: 0,
            input_area: None,
            results_area: None,
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn hide_results(&mut self) {
        self.open = false;
    }

    pub fn on_char(&mut self, c: char, now: Instant) {
        self.input.push(c);
        self.edited(now);
    }

    pub fn on_backspace(&mut self, now: Instant) {
        self.input.pop();
        self.edited(now);
    }

    fn edited(&mut self, now: Instant) {
        if self.input.chars().count() < MIN_QUERY_CHARS {
            self.debounce.clear();
            self.open = false;
        } else {
            self.debounce.press(self.input.clone(), now);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.open && !self.results.is_empty() {
            self.selected = (self.selected + 1).min(self.results.len() - 1);
        }
    }

    /// Enter on an open panel navigates to the highlighted symbol.
    pub fn confirm(&mut self) -> Option<SearchAction> {
        if !self.open {
            return None;
        }
        self.results
            .get(self.selected)
            .map(|r| SearchAction::Open(r.symbol.clone()))
    }

    /// Called on every tick: hands back the query to issue once the idle
    /// window has elapsed, tagged with its generation.
    pub fn poll(&mut self, now: Instant) -> Option<(u64, String)> {
        let query = self.debounce.poll(now)?;
        self.seq += 1;
        Some((self.seq, query))
    }

    /// Search response. Stale generations are dropped; errors are logged
    /// and leave the panel exactly as it was.
    pub fn apply(&mut self, seq: u64, result: Result<Vec<SearchResult>, PulseError>) {
        if seq != self.seq {
            tracing::debug!("dropping stale search response (gen {} < {})", seq, self.seq);
            return;
        }
        match result {
            Ok(results) if results.is_empty() => {
                self.results = results;
                self.open = false;
            }
            Ok(results) => {
                self.results = results;
                self.selected = 0;
                self.open = true;
            }
            Err(e) => tracing::warn!("search failed: {}", e),
        }
    }

    /// Mouse dispatch. A click outside both the input and the results panel
    /// hides the panel; a click on a result row navigates to it.
    pub fn handle_click(&mut self, column: u16, row: u16) -> Option<SearchAction> {
        let in_input = self.input_area.is_some_and(|r| hit(r, column, row));
        let in_results = self.open && self.results_area.is_some_and(|r| hit(r, column, row));

        if in_results {
            // Rows start under the panel's top border.
            let top = self.results_area.map(|r| r.y + 1).unwrap_or(0);
            let index = row.saturating_sub(top) as usize;
            return self.results.get(index).map(|r| {
                self.selected = index;
                SearchAction::Open(r.symbol.clone())
            });
        }

        if in_input {
            self.focused = true;
            return None;
        }

        self.open = false;
        self.focused = false;
        None
    }

    pub fn draw_input(&mut self, frame: &mut Frame, area: Rect) {
        self.input_area = Some(area);

        let style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let hint = if self.input.is_empty() && !self.focused {
            Span::styled("Search stocks (press /)", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.input.as_str())
        };
        let input = Paragraph::new(Line::from(hint))
            .block(Block::default().borders(Borders::ALL).title(" Search ").border_style(style));
        frame.render_widget(input, area);

        if self.focused {
            let cursor_x = area.x + 1 + self.input.chars().count() as u16;
            frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }

    /// Results dropdown, drawn last so it overlays the dashboard panels.
    pub fn draw_results(&mut self, frame: &mut Frame) {
        if !self.open {
            self.results_area = None;
            return;
        }
        let Some(input_area) = self.input_area else {
            self.results_area = None;
            return;
        };

        let rows = self.results.len().min(MAX_VISIBLE_RESULTS) as u16;
        let area = Rect {
            x: input_area.x,
            y: input_area.y + input_area.height,
            width: input_area.width,
            height: rows + 2,
        }
        .intersection(frame.area());
        self.results_area = Some(area);

        let lines: Vec<Line> = self
            .results
            .iter()
            .take(MAX_VISIBLE_RESULTS)
            .enumerate()
            .map(|(i, r)| {
                let style = if i == self.selected {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{:<12}", r.symbol), style),
                    Span::raw(r.name.as_str()),
                    Span::styled(format!("  [{}]", r.kind), Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }
}

fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}
