use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

use crate::app::{Screen, SCREENS};

pub struct TitleBar<'a> {
    pub screen: Screen,
    pub health_label: &'a str,
    pub health_online: bool,
    pub base_url: &'a str,
}

impl<'a> Widget for TitleBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let brand_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        let active_style = Style::default()
            .bg(Color::DarkGray)
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        for x in area.x..area.x + area.width {
            buf.cell_mut((x, area.y))
                .map(|c| c.set_style(bg_style).set_symbol(" "));
        }

        // Left side: EVGG · 1 Home  2 Policies ...
        let brand = " EVGG ";
        let mut x = area.x;
        for ch in brand.chars() {
            if x >= area.x + area.width {
                return;
            }
            buf.cell_mut((x, area.y))
                .map(|c| c.set_symbol(&ch.to_string()).set_style(brand_style));
            x += 1;
        }

        for (i, screen) in SCREENS.iter().enumerate() {
            let tab = format!(" {} {} ", i + 1, screen.title());
            let style = if *screen == self.screen {
                active_style
            } else {
                bg_style
            };
            for ch in tab.chars() {
                if x >= area.x + area.width {
                    return;
                }
                buf.cell_mut((x, area.y))
                    .map(|c| c.set_symbol(&ch.to_string()).set_style(style));
                x += 1;
            }
        }

        // Right side: ● online · http://localhost:8000
        let dot_color = if self.health_online {
            Color::Green
        } else if self.health_label == "offline" {
            Color::Red
        } else {
            Color::Yellow
        };
        let right = format!("\u{25cf} {} \u{00b7} {} ", self.health_label, self.base_url);
        let right_len = right.chars().count() as u16;
        if right_len < area.width {
            let start_x = area.x + area.width - right_len;
            for (i, ch) in right.chars().enumerate() {
                let rx = start_x + i as u16;
                if rx >= area.x + area.width {
                    break;
                }
                let style = if i == 0 {
                    Style::default().bg(Color::DarkGray).fg(dot_color)
                } else {
                    bg_style
                };
                buf.cell_mut((rx, area.y))
                    .map(|c| c.set_symbol(&ch.to_string()).set_style(style));
            }
        }
    }
}
