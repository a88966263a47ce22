use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::governance::HomeState;

// Block-character EVGG banner
const BANNER: [&str; 6] = [
    "███████╗██╗   ██╗ ██████╗  ██████╗ ",
    "██╔════╝██║   ██║██╔════╝ ██╔════╝ ",
    "█████╗  ██║   ██║██║  ███╗██║  ███╗",
    "██╔══╝  ╚██╗ ██╔╝██║   ██║██║   ██║",
    "███████╗ ╚████╔╝ ╚██████╔╝╚██████╔╝",
    "╚══════╝  ╚═══╝   ╚═════╝  ╚═════╝ ",
];

pub struct HomeView<'a> {
    pub state: &'a HomeState,
}

impl<'a> Widget for HomeView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cyan = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(Color::DarkGray);
        let white = Style::default().fg(Color::White);
        let green = Style::default().fg(Color::Green);
        let yellow = Style::default().fg(Color::Yellow);

        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::raw(""));
        for banner_line in &BANNER {
            lines.push(Line::styled(*banner_line, cyan));
        }
        lines.push(Line::styled(
            "    Evaluative Governance Gateway \u{00b7} AI use, governed and visible",
            dim,
        ));
        lines.push(Line::raw(""));

        // Status card
        let rule = "\u{2500}".repeat(48);
        lines.push(Line::styled(format!("    {}", rule), dim));

        let counters = &self.state.counters;
        lines.push(Line::from(vec![
            Span::styled("    Allowed     ", dim),
            Span::styled(format!("{} interactions", counters.allowed), green),
        ]));
        lines.push(Line::from(vec![
            Span::styled("    Restricted  ", dim),
            Span::styled(format!("{} interactions", counters.restricted), yellow),
        ]));
        lines.push(Line::from(vec![
            Span::styled("    Compliance  ", dim),
            Span::styled(format!("{}%", counters.compliance_pct), white),
        ]));
        let (source, source_style) = if self.state.measured {
            ("live analytics".to_string(), dim)
        } else if let Some(err) = self.state.error() {
            (
                format!("reference values \u{00b7} {}", err),
                Style::default().fg(Color::Red),
            )
        } else {
            ("reference values, waiting for a first measurement".to_string(), dim)
        };
        lines.push(Line::from(vec![
            Span::styled("    Source      ", dim),
            Span::styled(source, source_style),
        ]));
        lines.push(Line::styled(format!("    {}", rule), dim));
        lines.push(Line::raw(""));

        lines.push(Line::styled("    Consoles", cyan));
        lines.push(Line::raw(""));
        let features: [(&str, &str); 6] = [
            ("2 Policies", "Compile a course AI policy from a form"),
            ("3 Copilot", "Ask whether an AI use is allowed"),
            ("4 Dashboard", "Your recent AI interactions"),
            ("5 Admin", "Course-level usage analytics"),
            ("6 Transparency", "Anonymized audit log"),
            ("7 Self-Test", "Probe every backend endpoint"),
        ];
        for (key, desc) in features {
            lines.push(Line::from(vec![
                Span::styled(format!("    {:<16}", key), white),
                Span::styled(desc, dim),
            ]));
        }

        Paragraph::new(lines).render(area, buf);
    }
}
