use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

pub struct HelpView;

impl Widget for HelpView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        block.render(area, buf);

        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let key_style = Style::default().fg(Color::Yellow);
        let desc_style = Style::default().fg(Color::White);

        let lines = vec![
            Line::raw(""),
            Line::styled("  Keybindings", header_style),
            Line::raw(""),
            Line::styled("  Global", header_style),
            help_line("  1-7", "Jump to a screen", key_style, desc_style),
            help_line("  Tab", "Next screen", key_style, desc_style),
            help_line("  Ctrl+Q", "Quit, even mid-edit", key_style, desc_style),
            help_line("  q", "Quit", key_style, desc_style),
            help_line("  F1", "Toggle this help", key_style, desc_style),
            Line::raw(""),
            Line::styled("  Policies", header_style),
            help_line("  Up/Down, j/k", "Move between fields", key_style, desc_style),
            help_line("  Space", "Toggle a rule", key_style, desc_style),
            help_line("  Left/Right", "Pick the course", key_style, desc_style),
            help_line("  Enter", "Edit text / compile", key_style, desc_style),
            Line::raw(""),
            Line::styled("  Copilot", header_style),
            help_line("  i", "Edit the focused field", key_style, desc_style),
            help_line("  Enter", "Ask the question", key_style, desc_style),
            Line::raw(""),
            Line::styled("  Dashboard / Transparency", header_style),
            help_line("  r", "Refetch", key_style, desc_style),
            help_line("  p", "Edit pseudonym (dashboard)", key_style, desc_style),
            Line::raw(""),
            Line::styled("  Self-Test", header_style),
            help_line("  Up/Down", "Select probe", key_style, desc_style),
            help_line("  Enter", "Run it against the backend", key_style, desc_style),
            Line::raw(""),
            Line::styled("  Press Esc to close", Style::default().fg(Color::DarkGray)),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}

fn help_line<'a>(key: &'a str, desc: &'a str, key_style: Style, desc_style: Style) -> Line<'a> {
    Line::from(vec![
        ratatui::text::Span::styled(format!("{:<24}", key), key_style),
        ratatui::text::Span::styled(desc, desc_style),
    ])
}
