//! Market pulse grid: one card per index snapshot.

use crate::format;
use pulse_core::{IndexSnapshot, PulseError};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub struct MarketPulseView {
    cards: Vec<IndexSnapshot>,
}

impl MarketPulseView {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Refresh outcome. Errors are logged and the prior cards stay up;
    /// the dashboard never shows a pulse error to the user.
    pub fn apply(&mut self, result: Result<Vec<IndexSnapshot>, PulseError>) {
        match result {
            Ok(indices) => self.cards = indices,
            Err(e) => tracing::warn!("market pulse refresh failed: {}", e),
        }
    }

    pub fn cards(&self) -> &[IndexSnapshot] {
        &self.cards
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let outer = Block::default().borders(Borders::ALL).title(" Market Pulse ");
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        if self.cards.is_empty() {
            frame.render_widget(Paragraph::new("Loading indices..."), inner);
            return;
        }

        for (card, slot) in self.cards.iter().zip(super::card_columns(inner, self.cards.len())) {
            frame.render_widget(index_card(card), slot);
        }
    }
}

fn index_card(idx: &IndexSnapshot) -> Paragraph<'_> {
    let currency = format::index_currency(&idx.name);
    let lines = vec![
        Line::from(Span::styled(
            idx.name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{}{}", currency, idx.price)),
        Line::from(Span::styled(
            format!("{} {}", format::change_arrow(idx.is_positive), idx.change),
            Style::default().fg(format::change_color(idx.is_positive)),
        )),
    ];
    Paragraph::new(lines).alignment(Alignment::Center)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str) -> IndexSnapshot {
        IndexSnapshot {
            name: name.to_string(),
            price: "100.00".to_string(),
            change: "0.50%".to_string(),
            is_positive: true,
        }
    }

    #[test]
    fn successful_refresh_replaces_cards() {
        let mut view = MarketPulseView::new();
        view.apply(Ok(vec![snapshot("Nifty 50"), snapshot("S&P 500")]));
        assert_eq!(view.cards().len(), 2);
    }

    #[test]
    fn failed_refresh_keeps_prior_cards() {
        let mut view = MarketPulseView::new();
        view.apply(Ok(vec![snapshot("Sensex")]));
        view.apply(Err(PulseError::Api("connection refused".into())));
        assert_eq!(view.cards().len(), 1);
        assert_eq!(view.cards()[0].name, "Sensex");
    }

    #[test]
    fn card_count_matches_input_length() {
        let mut view = MarketPulseView::new();
        let input: Vec<IndexSnapshot> =
            ["Nifty 50", "Sensex", "S&P 500", "Nifty 500"].iter().map(|n| snapshot(n)).collect();
        view.apply(Ok(input.clone()));
        assert_eq!(view.cards().len(), input.len());
    }
}
