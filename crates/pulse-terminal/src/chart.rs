//! Price chart over ratatui's `Chart` widget. The adapter owns the single
//! live chart state for its canvas area; rendering a new history drops the
//! previous one first.

use pulse_core::PriceHistory;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};
use ratatui::Frame;

const LINE_COLOR: Color = Color::Green;
const AXIS_COLOR: Color = Color::DarkGray;

struct ChartState {
    labels: Vec<String>,
    points: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

pub struct ChartAdapter {
    state: Option<ChartState>,
}

impl ChartAdapter {
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Build the chart from a price history: x axis is the mapping's keys in
    /// order, y axis its values. Replaces whatever chart was live before.
    pub fn render(&mut self, history: &PriceHistory) {
        self.state = None;
        if history.is_empty() {
            return;
        }

        let labels: Vec<String> = history.dates().into_iter().map(String::from).collect();
        let points: Vec<(f64, f64)> = history
            .closes()
            .into_iter()
            .enumerate()
            .map(|(i, close)| (i as f64, close))
            .collect();

        let mut lo = f64::MAX;
        let mut hi = f64::MIN;
        for &(_, y) in &points {
            lo = lo.min(y);
            hi = hi.max(y);
        }
        // Flat series still needs a visible band.
        let pad = ((hi - lo) * 0.05).max(1.0);

        self.state = Some(ChartState {
            x_bounds: [0.0, (points.len().saturating_sub(1)).max(1) as f64],
            y_bounds: [lo - pad, hi + pad],
            labels,
            points,
        });
    }

    pub fn is_rendered(&self) -> bool {
        self.state.is_some()
    }

    /// X-axis labels of the live chart, in order.
    pub fn labels(&self) -> Option<&[String]> {
        self.state.as_ref().map(|s| s.labels.as_slice())
    }

    /// Y values of the live chart, in order.
    pub fn data(&self) -> Option<Vec<f64>> {
        self.state
            .as_ref()
            .map(|s| s.points.iter().map(|&(_, y)| y).collect())
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Price ");
        let Some(state) = &self.state else {
            frame.render_widget(block, area);
            return;
        };

        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(LINE_COLOR))
            .data(&state.points);

        // First and last dates are enough for a narrow terminal axis.
        let x_labels: Vec<Span> = match state.labels.as_slice() {
            [] => vec![],
            [only] => vec![Span::raw(only.clone())],
            [first, .., last] => vec![Span::raw(first.clone()), Span::raw(last.clone())],
        };
        let y_labels = vec![
            Span::raw(format!("{:.2}", state.y_bounds[0])),
            Span::raw(format!("{:.2}", state.y_bounds[1])),
        ];

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(AXIS_COLOR))
                    .bounds(state.x_bounds)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(AXIS_COLOR))
                    .bounds(state.y_bounds)
                    .labels(y_labels),
            );

        frame.render_widget(chart, area);
    }
}
