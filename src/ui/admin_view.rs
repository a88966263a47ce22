use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

use crate::governance::metrics::{self, HeatLevel};
use crate::governance::AdminState;

const BAR_WIDTH: usize = 24;
const HEATMAP_CELLS: usize = 30;

pub struct AdminView<'a> {
    pub state: &'a AdminState,
}

impl<'a> Widget for AdminView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Course Analytics ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let white = Style::default().fg(Color::White);
        let cyan = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let state = self.state;
        let view = &state.view;
        let mut lines: Vec<Line> = vec![Line::raw("")];

        lines.push(Line::from(vec![
            Span::styled("   Course  ", dim),
            Span::styled(
                format!("\u{25c2} {} \u{25b8}", view.course_id),
                white,
            ),
            Span::styled(format!("   {}", view.period), dim),
        ]));
        lines.push(Line::raw(""));

        if let Some(err) = state.error() {
            lines.push(Line::styled(
                format!("   \u{26a0} {} \u{00b7} showing reference analytics", err),
                Style::default().fg(Color::Red),
            ));
            lines.push(Line::raw(""));
        } else if state.is_pending() {
            lines.push(Line::styled("   Refreshing...", dim));
            lines.push(Line::raw(""));
        }

        // Stat cards
        lines.push(Line::from(vec![
            Span::styled("   Students ", dim),
            Span::styled(format!("{:<8}", view.unique_students), white),
            Span::styled("Events ", dim),
            Span::styled(format!("{:<8}", view.total_events), white),
            Span::styled("Compliance ", dim),
            Span::styled(
                view.compliance_rate.clone(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::raw(""));

        lines.push(Line::styled("   Usage by action", cyan));
        lines.push(Line::raw(""));
        let fractions = metrics::bar_fractions(&view.rows, Some(view.chart_total));
        for ((action, count), (_, fraction)) in view.rows.iter().zip(fractions.iter()) {
            let filled = (fraction * BAR_WIDTH as f64).round() as usize;
            let filled = filled.min(BAR_WIDTH);
            let bar = format!(
                "{}{}",
                "\u{2588}".repeat(filled),
                "\u{2591}".repeat(BAR_WIDTH - filled)
            );
            lines.push(Line::from(vec![
                Span::styled(format!("   {:<16}", action), white),
                Span::styled(bar, Style::default().fg(Color::Cyan)),
                Span::styled(format!(" {}", count), dim),
            ]));
        }
        lines.push(Line::raw(""));

        lines.push(Line::styled("   Activity, last 30 days", cyan));
        lines.push(Line::raw(""));
        for row_start in (0..HEATMAP_CELLS).step_by(10) {
            let mut spans: Vec<Span> = vec![Span::styled("   ", dim)];
            for idx in row_start..row_start + 10 {
                let color = match metrics::heatmap_cell(idx) {
                    HeatLevel::Strong => Color::Green,
                    HeatLevel::Medium => Color::Yellow,
                    HeatLevel::Weak => Color::DarkGray,
                };
                spans.push(Span::styled("\u{25a0} ", Style::default().fg(color)));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::raw(""));

        lines.push(Line::styled(
            "   Aggregates only. No student identity or content is shown here.",
            dim,
        ));

        Paragraph::new(lines).render(inner, buf);
    }
}
