use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap};

use crate::governance::fallback::DISCLOSURE_TEMPLATE;
use crate::governance::CopilotState;

const THINKING_FRAMES: [&str; 4] = ["   ", ".  ", ".. ", "..."];

pub struct CopilotView<'a> {
    pub state: &'a CopilotState,
    pub tick_count: u64,
}

impl<'a> Widget for CopilotView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Student Copilot ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let white = Style::default().fg(Color::White);
        let cyan = Style::default().fg(Color::Cyan);
        let focus_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let edit_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let state = self.state;
        let mut lines: Vec<Line> = vec![Line::raw("")];

        // Question + course inputs
        for (idx, (label, value)) in [
            ("Question", state.question.as_str()),
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
                Span::styled(format!("{:<10}", label), if focused { focus_style } else { dim }),
                Span::styled(
                    format!("{}{}", value, if editing { "\u{2588}" } else { "" }),
                    if editing { edit_style } else { white },
                ),
            ]));
        }
        lines.push(Line::raw(""));

        if state.asked {
            lines.push(Line::from(vec![
                Span::styled("   You  ", cyan),
                Span::styled(state.question.clone(), white),
            ]));
            lines.push(Line::raw(""));
        }

        if state.is_pending() {
            let frame = THINKING_FRAMES[(self.tick_count / 8) as usize % THINKING_FRAMES.len()];
            lines.push(Line::styled(format!("   Copilot is thinking{}", frame), dim));
        } else {
            let view = &state.view;
            lines.push(Line::from(vec![
                Span::styled("   Copilot  ", Style::default().fg(Color::Magenta)),
                Span::styled(state.typewriter.visible().to_string(), white),
            ]));
            // Confidence and citations appear only once the reveal is done.
            if state.typewriter.is_complete() && !state.typewriter.is_empty() {
                lines.push(Line::raw(""));
                let badge_color = if view.confidence_pct >= 80 {
                    Color::Green
                } else if view.confidence_pct > 0 {
                    Color::Yellow
                } else {
                    Color::Red
                };
                lines.push(Line::from(vec![
                    Span::styled("   ", dim),
                    Span::styled(
                        format!(" {}% confident ", view.confidence_pct),
                        Style::default().fg(Color::Black).bg(badge_color),
                    ),
                ]));
                if let Some(flag) = &view.flag {
                    lines.push(Line::styled(
                        format!("   \u{26a0} {}", flag),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                if !view.citations.is_empty() {
                    lines.push(Line::raw(""));
                    lines.push(Line::styled("   Citations", dim));
                    for citation in &view.citations {
                        lines.push(Line::from(vec![
                            Span::styled("     \u{2022} ", dim),
                            Span::styled(citation.clone(), white),
                        ]));
                    }
                }
                lines.push(Line::raw(""));
                lines.push(Line::styled("   Suggested disclosure", dim));
                lines.push(Line::styled(format!("     {}", DISCLOSURE_TEMPLATE), cyan));
            }
        }

        Paragraph::new(lines).wrap(Wrap { trim: false }).render(inner, buf);
    }
}
