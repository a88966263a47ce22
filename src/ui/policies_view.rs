use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

use crate::governance::{PoliciesState, PolicyField, POLICY_FIELDS};

pub struct PoliciesView<'a> {
    pub state: &'a PoliciesState,
}

impl<'a> PoliciesView<'a> {
    fn form_lines(&self) -> Vec<Line<'a>> {
        let dim = Style::default().fg(Color::DarkGray);
        let white = Style::default().fg(Color::White);
        let focus_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let edit_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let state = self.state;
        let mut lines: Vec<Line> = vec![Line::raw("")];

        for (idx, field) in POLICY_FIELDS.iter().enumerate() {
            let focused = idx == state.focus;
            let marker = if focused { " \u{25b8} " } else { "   " };
            let label_style = if focused { focus_style } else { dim };

            let line = match field {
                PolicyField::Course => Line::from(vec![
                    Span::styled(marker, focus_style),
                    Span::styled(format!("{:<22}", "Course"), label_style),
                    Span::styled(format!("\u{25c2} {} \u{25b8}", state.course_id()), white),
                ]),
                PolicyField::Title => {
                    let editing = focused && state.editing;
                    Line::from(vec![
                        Span::styled(marker, focus_style),
                        Span::styled(format!("{:<22}", "Policy title"), label_style),
                        Span::styled(
                            format!("{}{}", state.title, if editing { "\u{2588}" } else { "" }),
                            if editing { edit_style } else { white },
                        ),
                    ])
                }
                PolicyField::Instructor => {
                    let editing = focused && state.editing;
                    Line::from(vec![
                        Span::styled(marker, focus_style),
                        Span::styled(format!("{:<22}", "Instructor"), label_style),
                        Span::styled(
                            format!(
                                "{}{}",
                                state.instructor,
                                if editing { "\u{2588}" } else { "" }
                            ),
                            if editing { edit_style } else { white },
                        ),
                    ])
                }
                PolicyField::BrainstormAllowed => checkbox_line(
                    marker,
                    "Allow brainstorming",
                    state.brainstorm_allowed,
                    label_style,
                ),
                PolicyField::FullSolutionBanned => checkbox_line(
                    marker,
                    "Ban full AI solutions",
                    state.full_solution_banned,
                    label_style,
                ),
                PolicyField::ExamAiBanned => {
                    checkbox_line(marker, "Ban AI during exams", state.exam_ai_banned, label_style)
                }
                PolicyField::DisclosureRequired => checkbox_line(
                    marker,
                    "Require disclosure",
                    state.disclosure_required,
                    label_style,
                ),
                PolicyField::Submit => {
                    let label = if state.is_pending() {
                        "[ Compiling... ]"
                    } else {
                        "[ Compile policy ]"
                    };
                    Line::from(vec![
                        Span::styled(marker, focus_style),
                        Span::styled(label, if focused { focus_style } else { white }),
                    ])
                }
            };
            lines.push(line);
            lines.push(Line::raw(""));
        }

        lines
    }

    fn preview_lines(&self) -> Vec<Line<'a>> {
        let dim = Style::default().fg(Color::DarkGray);
        let white = Style::default().fg(Color::White);
        let green = Style::default().fg(Color::Green);
        let red = Style::default().fg(Color::Red);

        let state = self.state;
        let mut lines: Vec<Line> = vec![Line::raw("")];

        lines.push(Line::from(vec![
            Span::styled(" ", dim),
            Span::styled(
                format!("{} \u{00b7} {}", state.course_id(), state.title.clone()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::styled(
            format!(" Instructor: {}", state.instructor),
            dim,
        ));
        lines.push(Line::raw(""));

        let rule_line = |ok: bool, yes: &'a str, no: &'a str| -> Line<'a> {
            if ok {
                Line::from(vec![
                    Span::styled(" \u{2713} ", green),
                    Span::styled(yes, white),
                ])
            } else {
                Line::from(vec![
                    Span::styled(" \u{2717} ", red),
                    Span::styled(no, white),
                ])
            }
        };

        lines.push(rule_line(
            state.brainstorm_allowed,
            "Brainstorming with AI allowed",
            "Brainstorming with AI not allowed",
        ));
        lines.push(rule_line(
            !state.full_solution_banned,
            "Full AI solutions allowed",
            "Full AI solutions banned",
        ));
        lines.push(rule_line(
            !state.exam_ai_banned,
            "AI allowed during exams",
            "AI banned during exams",
        ));
        lines.push(Line::styled(
            if state.disclosure_required {
                " Disclosure of AI use is required"
            } else {
                " Disclosure of AI use is optional"
            },
            dim,
        ));
        lines.push(Line::raw(""));

        if let Some(err) = state.error() {
            lines.push(Line::styled(
                format!(" \u{26a0} Compile failed: {}", err),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::raw(""));
        }

        if let Some(compiled) = &state.compiled {
            lines.push(Line::styled(
                " Compiled \u{2713}",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
            for json_line in compiled.lines() {
                lines.push(Line::styled(format!("   {}", json_line), white));
            }
        }

        lines
    }
}

fn checkbox_line<'a>(marker: &'a str, label: &'a str, on: bool, label_style: Style) -> Line<'a> {
    let box_style = if on {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::styled(
            marker,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{:<22}", label), label_style),
        Span::styled(if on { "[x]" } else { "[ ]" }, box_style),
    ])
}

impl<'a> Widget for PoliciesView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let form_block = Block::default()
            .title(" Policy Builder ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));
        let form_inner = form_block.inner(halves[0]);
        form_block.render(halves[0], buf);
        let form_lines = self.form_lines();
        Paragraph::new(form_lines).render(form_inner, buf);

        let preview_block = Block::default()
            .title(" Live Preview ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        let preview_inner = preview_block.inner(halves[1]);
        preview_block.render(halves[1], buf);
        let preview_lines = self.preview_lines();
        Paragraph::new(preview_lines).render(preview_inner, buf);
    }
}
