pub mod detail;
pub mod pulse;
pub mod search;
pub mod trending;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Split an area into `n` equal-width card columns.
pub(crate) fn card_columns(area: Rect, n: usize) -> Vec<Rect> {
    let n = n.max(1) as u32;
    let constraints: Vec<Constraint> = (0..n).map(|_| Constraint::Ratio(1, n)).collect();
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}
