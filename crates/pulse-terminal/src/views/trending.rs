//! Trending symbols grid. Cards navigate to the detail page for their
//! symbol, by keyboard selection or mouse click.

use crate::format;
use pulse_core::{PulseError, TrendingEntry};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub struct TrendingView {
    cards: Vec<TrendingEntry>,
    selected: usize,
    // Card hit areas from the last draw, for mouse navigation.
    card_areas: Vec<(Rect, usize)>,
}

impl TrendingView {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            selected: 0,
            card_areas: Vec::new(),
        }
    }

    /// Same silent-failure policy as the pulse grid: log and keep state.
    pub fn apply(&mut self, result: Result<Vec<TrendingEntry>, PulseError>) {
        match result {
            Ok(entries) => {
                self.cards = entries;
                self.selected = 0;
            }
            Err(e) => tracing::warn!("trending refresh failed: {}", e),
        }
    }

    pub fn cards(&self) -> &[TrendingEntry] {
        &self.cards
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if !self.cards.is_empty() {
            self.selected = (self.selected + 1).min(self.cards.len() - 1);
        }
    }

    /// Symbol under the keyboard cursor, if any.
    pub fn selected_symbol(&self) -> Option<&str> {
        self.cards.get(self.selected).map(|c| c.symbol.as_str())
    }

    /// Symbol under a mouse click, if the click landed on a card.
    pub fn symbol_at(&self, column: u16, row: u16) -> Option<&str> {
        self.card_areas
            .iter()
            .find(|(rect, _)| hit(*rect, column, row))
            .and_then(|&(_, i)| self.cards.get(i))
            .map(|c| c.symbol.as_str())
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let outer = Block::default().borders(Borders::ALL).title(" Trending ");
        let inner = outer.inner(area);
        frame.render_widget(outer, area);
        self.card_areas.clear();

        if self.cards.is_empty() {
            frame.render_widget(Paragraph::new("Loading trending stocks..."), inner);
            return;
        }

        for (i, (card, slot)) in self
            .cards
            .iter()
            .zip(super::card_columns(inner, self.cards.len()))
            .enumerate()
        {
            self.card_areas.push((slot, i));
            frame.render_widget(trending_card(card, i == self.selected), slot);
        }
    }
}

fn trending_card(entry: &TrendingEntry, selected: bool) -> Paragraph<'_> {
    let currency = format::trending_currency(&entry.symbol);
    let symbol_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(entry.symbol.as_str(), symbol_style),
            Span::raw(" "),
            Span::styled(
                entry.action.as_str(),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(format!("{}{}", currency, entry.price)),
        Line::from(Span::styled(
            format!("{} {}", format::change_arrow(entry.is_positive), entry.change),
            Style::default().fg(format::change_color(entry.is_positive)),
        )),
    ];
    Paragraph::new(lines).alignment(Alignment::Center)
}

fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(symbol: &str) -> TrendingEntry {
        TrendingEntry {
            symbol: symbol.to_string(),
            price: "100.00".to_string(),
            change: "1.00%".to_string(),
            is_positive: true,
            action: "Buy".to_string(),
        }
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut view = TrendingView::new();
        view.apply(Ok(vec![entry("AAPL"), entry("TCS.NS")]));

        view.select_prev();
        assert_eq!(view.selected_symbol(), Some("AAPL"));
        view.select_next();
        view.select_next();
        view.select_next();
        assert_eq!(view.selected_symbol(), Some("TCS.NS"));
    }

    #[test]
    fn failed_refresh_keeps_prior_cards() {
        let mut view = TrendingView::new();
        view.apply(Ok(vec![entry("AAPL")]));
        view.apply(Err(PulseError::Status {
            status: 502,
            body: String::new(),
        }));
        assert_eq!(view.cards().len(), 1);
    }

    #[test]
    fn click_maps_to_card_symbol() {
        let mut view = TrendingView::new();
        view.apply(Ok(vec![entry("AAPL"), entry("TSLA")]));
        view.card_areas = vec![
            (Rect::new(0, 0, 10, 3), 0),
            (Rect::new(10, 0, 10, 3), 1),
        ];

        assert_eq!(view.symbol_at(2, 1), Some("AAPL"));
        assert_eq!(view.symbol_at(15, 1), Some("TSLA"));
        assert_eq!(view.symbol_at(25, 1), None);
    }
}
