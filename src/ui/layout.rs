use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Every screen shares the same frame: title(1) | body | status(1).
pub struct ConsoleLayout {
    pub title: Rect,
    pub body: Rect,
    pub status: Rect,
}

impl ConsoleLayout {
    pub fn compute(area: Rect) -> Self {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            title: outer[0],
            body: outer[1],
            status: outer[2],
        }
    }
}
