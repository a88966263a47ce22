use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

use crate::governance::DashboardState;

pub struct DashboardView<'a> {
    pub state: &'a DashboardState,
}

impl<'a> Widget for DashboardView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" My AI Dashboard ")
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
        let edit_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let state = self.state;
        let mut lines: Vec<Line> = vec![Line::raw("")];

        lines.push(Line::from(vec![
            Span::styled("   Pseudonym  ", dim),
            Span::styled(
                format!(
                    "{}{}",
                    state.pseudonym,
                    if state.editing { "\u{2588}" } else { "" }
                ),
                if state.editing { edit_style } else { white },
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("   Logged     ", dim),
            Span::styled(format!("{} interactions", state.live_count), white),
        ]));
        lines.push(Line::raw(""));

        if let Some(err) = state.error() {
            lines.push(Line::styled(
                format!("   \u{26a0} {} \u{00b7} showing sample timeline", err),
                Style::default().fg(Color::Red),
            ));
            lines.push(Line::raw(""));
        } else if state.is_pending() {
            lines.push(Line::styled("   Loading timeline...", dim));
            lines.push(Line::raw(""));
        }

        lines.push(Line::styled("   Recent AI Interactions", cyan));
        lines.push(Line::raw(""));
        for entry in &state.timeline {
            let decision_style = if entry.subtitle.contains("DENY") {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };
            lines.push(Line::from(vec![
                Span::styled("   \u{25cf} ", decision_style),
                Span::styled(entry.title.clone(), white),
            ]));
            lines.push(Line::styled(format!("     {}", entry.subtitle), dim));
            lines.push(Line::raw(""));
        }

        lines.push(Line::styled(
            "   Only action metadata is recorded. Your work never leaves your machine.",
            dim,
        ));

        Paragraph::new(lines).render(inner, buf);
    }
}
