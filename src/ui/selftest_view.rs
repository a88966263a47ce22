use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap};

use crate::governance::{SelfTestState, PROBES};

const SPINNER: [&str; 4] = ["\u{25d0}", "\u{25d3}", "\u{25d1}", "\u{25d2}"];

pub struct SelfTestView<'a> {
    pub state: &'a SelfTestState,
    pub tick_count: u64,
}

impl<'a> Widget for SelfTestView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(20)])
            .split(area);

        let dim = Style::default().fg(Color::DarkGray);
        let white = Style::default().fg(Color::White);
        let focus_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let list_block = Block::default()
            .title(" Probes ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));
        let list_inner = list_block.inner(halves[0]);
        list_block.render(halves[0], buf);

        let mut list_lines: Vec<Line> = vec![Line::raw("")];
        for (idx, probe) in PROBES.iter().enumerate() {
            let focused = idx == self.state.selected;
            let marker = if focused { " \u{25b8} " } else { "   " };
            list_lines.push(Line::from(vec![
                Span::styled(marker, focus_style),
                Span::styled(probe.label(), if focused { focus_style } else { white }),
            ]));
        }
        list_lines.push(Line::raw(""));
        list_lines.push(Line::styled("   Enter runs the probe", dim));
        Paragraph::new(list_lines).render(list_inner, buf);

        let out_block = Block::default()
            .title(" Result ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        let out_inner = out_block.inner(halves[1]);
        out_block.render(halves[1], buf);

        let mut out_lines: Vec<Line> = vec![Line::raw("")];
        if self.state.is_pending() {
            let frame = SPINNER[(self.tick_count / 8) as usize % SPINNER.len()];
            out_lines.push(Line::styled(
                format!(" {} {}", frame, self.state.output),
                Style::default().fg(Color::Yellow),
            ));
        } else {
            for text_line in self.state.output.lines() {
                let style = if text_line.starts_with('\u{2705}') {
                    Style::default().fg(Color::Green)
                } else if text_line.starts_with('\u{274c}') {
                    Style::default().fg(Color::Red)
                } else {
                    white
                };
                out_lines.push(Line::styled(format!(" {}", text_line), style));
            }
        }
        Paragraph::new(out_lines)
            .wrap(Wrap { trim: false })
            .render(out_inner, buf);
    }
}
