use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

use crate::governance::TransparencyState;

pub struct TransparencyView<'a> {
    pub state: &'a TransparencyState,
}

impl<'a> Widget for TransparencyView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Transparency Log ")
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
        let focus_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let edit_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let state = self.state;
        let mut lines: Vec<Line> = vec![Line::raw("")];

        for (idx, (label, value)) in [
            ("Pseudonym", state.pseudonym.as_str()),
            ("Course", state.course_id.as_str()),
        ]
        .iter()
        .enumerate()
        {
            let focused = state.focus == idx;
            let editing = focused && state.editing;
            let marker = if focused { " \u{25b8} " } else { "   " };
            lines.push(Line::from(vec![
                Span::styled(marker, focus_style),
                Span::styled(
                    format!("{:<12}", label),
                    if focused { focus_style } else { dim },
                ),
                Span::styled(
                    format!("{}{}", value, if editing { "\u{2588}" } else { "" }),
                    if editing { edit_style } else { white },
                ),
            ]));
        }
        lines.push(Line::raw(""));

        if let Some(err) = state.error() {
            lines.push(Line::styled(
                format!("   \u{26a0} {} \u{00b7} showing reference aggregates", err),
                Style::default().fg(Color::Red),
            ));
            lines.push(Line::raw(""));
        } else if state.is_pending() {
            lines.push(Line::styled("   Loading log...", dim));
            lines.push(Line::raw(""));
        }

        lines.push(Line::styled(format!("   {}", state.summary()), white));
        lines.push(Line::raw(""));

        lines.push(Line::styled("   Actions on record", cyan));
        lines.push(Line::raw(""));
        let max = state
            .aggregates
            .iter()
            .map(|(_, count)| *count)
            .max()
            .unwrap_or(1)
            .max(1);
        for (action, count) in &state.aggregates {
            let filled = ((*count as f64 / max as f64) * 16.0).round() as usize;
            lines.push(Line::from(vec![
                Span::styled(format!("   {:<16}", action), white),
                Span::styled(
                    "\u{2588}".repeat(filled.min(16)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(format!(" {}", count), dim),
            ]));
        }
        lines.push(Line::raw(""));

        lines.push(Line::styled(
            "   Entries are pseudonymous. Timestamps and actions only, never content.",
            dim,
        ));

        Paragraph::new(lines).render(inner, buf);
    }
}
