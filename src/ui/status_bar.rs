use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::app::Screen;

pub struct StatusBar {
    pub screen: Screen,
    pub editing: bool,
}

impl StatusBar {
    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.editing {
            return &[("Enter", "apply"), ("Esc", "cancel")];
        }
        match self.screen {
            Screen::Home => &[
                ("1-7", "screens"),
                ("Tab", "next"),
                ("r", "refresh"),
                ("F1", "help"),
                ("q", "quit"),
            ],
            Screen::Policies => &[
                ("\u{2191}\u{2193}", "field"),
                ("Space", "toggle"),
                ("\u{2190}\u{2192}", "course"),
                ("Enter", "edit/submit"),
                ("F1", "help"),
                ("q", "quit"),
            ],
            Screen::Copilot => &[
                ("i", "edit"),
                ("\u{2191}\u{2193}", "field"),
                ("Enter", "ask"),
                ("F1", "help"),
                ("q", "quit"),
            ],
            Screen::Dashboard => &[
                ("r", "refresh"),
                ("p", "pseudonym"),
                ("F1", "help"),
                ("q", "quit"),
            ],
            Screen::Admin => &[
                ("\u{2190}\u{2192}", "course"),
                ("r", "refresh"),
                ("F1", "help"),
                ("q", "quit"),
            ],
            Screen::Transparency => &[
                ("\u{2191}\u{2193}", "field"),
                ("Enter", "edit"),
                ("r", "refresh"),
                ("F1", "help"),
                ("q", "quit"),
            ],
            Screen::SelfTest => &[
                ("\u{2191}\u{2193}", "probe"),
                ("Enter", "run"),
                ("F1", "help"),
                ("q", "quit"),
            ],
        }
    }
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        let key_style = Style::default().bg(Color::DarkGray).fg(Color::Cyan);

        for x in area.x..area.x + area.width {
            buf.cell_mut((x, area.y))
                .map(|c| c.set_style(bg_style).set_symbol(" "));
        }

        let mut x = area.x + 1;
        for (i, (key, desc)) in self.hints().iter().enumerate() {
            if i > 0 {
                if x + 3 < area.x + area.width {
                    buf.cell_mut((x + 1, area.y))
                        .map(|c| c.set_symbol("|").set_style(bg_style));
                    x += 3;
                }
            }

            for ch in key.chars() {
                if x >= area.x + area.width {
                    return;
                }
                buf.cell_mut((x, area.y))
                    .map(|c| c.set_symbol(&ch.to_string()).set_style(key_style));
                x += 1;
            }

            if x < area.x + area.width {
                x += 1;
            }

            for ch in desc.chars() {
                if x >= area.x + area.width {
                    return;
                }
                buf.cell_mut((x, area.y))
                    .map(|c| c.set_symbol(&ch.to_string()).set_style(bg_style));
                x += 1;
            }
        }
    }
}
