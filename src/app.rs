use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::{Duration, Instant};

use crate::config::ConsoleConfig;
use crate::governance::client::ApiClient;
use crate::governance::health::HealthMonitor;
use crate::governance::{
    AdminState, CopilotState, DashboardState, HomeState, PoliciesState, PolicyField,
    SelfTestState, TransparencyState, COURSES, POLICY_FIELDS, PROBES,
};
use crate::ui::admin_view::AdminView;
use crate::ui::copilot_view::CopilotView;
use crate::ui::dashboard_view::DashboardView;
use crate::ui::help_view::HelpView;
use crate::ui::home_view::HomeView;
use crate::ui::layout::ConsoleLayout;
use crate::ui::policies_view::PoliciesView;
use crate::ui::selftest_view::SelfTestView;
use crate::ui::status_bar::StatusBar;
use crate::ui::title_bar::TitleBar;
use crate::ui::transparency_view::TransparencyView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Policies,
    Copilot,
    Dashboard,
    Admin,
    Transparency,
    SelfTest,
}

pub const SCREENS: [Screen; 7] = [
    Screen::Home,
    Screen::Policies,
    Screen::Copilot,
    Screen::Dashboard,
    Screen::Admin,
    Screen::Transparency,
    Screen::SelfTest,
];

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Policies => "Policies",
            Screen::Copilot => "Copilot",
            Screen::Dashboard => "Dashboard",
            Screen::Admin => "Admin",
            Screen::Transparency => "Transparency",
            Screen::SelfTest => "Self-Test",
        }
    }
}

/// Per-screen state, owned by exactly one screen at a time. Switching
/// screens drops the old tree, so a fetch still in flight when the user
/// leaves can never write into the next screen.
pub enum ScreenState {
    Home(HomeState),
    Policies(PoliciesState),
    Copilot(CopilotState),
    Dashboard(DashboardState),
    Admin(AdminState),
    Transparency(TransparencyState),
    SelfTest(SelfTestState),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Continue,
    Quit,
}

pub struct App {
    pub config: ConsoleConfig,
    client: ApiClient,
    health: HealthMonitor,
    screen: Screen,
    state: ScreenState,
    show_help: bool,
    tick_count: u64,
}

impl App {
    pub fn new(config: ConsoleConfig) -> Result<Self> {
        let client = ApiClient::new(&config.base_url)?;
        let health = HealthMonitor::new(client.clone());
        let home = HomeState::new(&client, &config.default_course);
        Ok(Self {
            config,
            client,
            health,
            screen: Screen::Home,
            state: ScreenState::Home(home),
            show_help: false,
            tick_count: 0,
        })
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let tick_rate = Duration::from_millis(16);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            self.health.poll();
            self.poll_screen();

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key)? == Action::Quit {
                            break;
                        }
                    }
                    Event::Resize(_w, _h) => {}
                    _ => {}
                }
            }

            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
                self.tick_count = self.tick_count.wrapping_add(1);
            }
        }

        Ok(())
    }

    fn poll_screen(&mut self) {
        match &mut self.state {
            ScreenState::Home(state) => state.poll(),
            ScreenState::Policies(state) => state.poll(),
            ScreenState::Copilot(state) => {
                state.poll();
                state.typewriter.tick(Instant::now());
            }
            ScreenState::Dashboard(state) => state.poll(),
            ScreenState::Admin(state) => state.poll(),
            ScreenState::Transparency(state) => state.poll(),
            ScreenState::SelfTest(state) => state.poll(),
        }
    }

    /// Replaces the whole screen subtree. Entering the same screen again
    /// also rebuilds it, which doubles as a refresh.
    fn switch_to(&mut self, screen: Screen) {
        if screen == Screen::SelfTest && !self.config.self_test_enabled {
            return;
        }
        self.state = match screen {
            Screen::Home => {
                ScreenState::Home(HomeState::new(&self.client, &self.config.default_course))
            }
            Screen::Policies => {
                ScreenState::Policies(PoliciesState::new(&self.config.default_course))
            }
            Screen::Copilot => ScreenState::Copilot(CopilotState::new(&self.config.default_course)),
            Screen::Dashboard => ScreenState::Dashboard(DashboardState::new(
                &self.client,
                &self.config.default_pseudonym,
            )),
            Screen::Admin => {
                ScreenState::Admin(AdminState::new(&self.client, &self.config.default_course))
            }
            Screen::Transparency => ScreenState::Transparency(TransparencyState::new(
                &self.client,
                &self.config.default_pseudonym,
                &self.config.default_course,
            )),
            Screen::SelfTest => ScreenState::SelfTest(SelfTestState::new()),
        };
        self.screen = screen;
    }

    fn editing(&self) -> bool {
        match &self.state {
            ScreenState::Home(_) | ScreenState::SelfTest(_) => false,
            ScreenState::Policies(state) => state.editing,
            ScreenState::Copilot(state) => state.editing,
            ScreenState::Dashboard(state) => state.editing,
            ScreenState::Admin(state) => state.editing,
            ScreenState::Transparency(state) => state.editing,
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        let layout = ConsoleLayout::compute(area);

        frame.render_widget(
            TitleBar {
                screen: self.screen,
                health_label: self.health.label(),
                health_online: self.health.is_online(),
                base_url: &self.config.base_url,
            },
            layout.title,
        );

        match &self.state {
            ScreenState::Home(state) => frame.render_widget(HomeView { state }, layout.body),
            ScreenState::Policies(state) => {
                frame.render_widget(PoliciesView { state }, layout.body)
            }
            ScreenState::Copilot(state) => frame.render_widget(
                CopilotView {
                    state,
                    tick_count: self.tick_count,
                },
                layout.body,
            ),
            ScreenState::Dashboard(state) => {
                frame.render_widget(DashboardView { state }, layout.body)
            }
            ScreenState::Admin(state) => frame.render_widget(AdminView { state }, layout.body),
            ScreenState::Transparency(state) => {
                frame.render_widget(TransparencyView { state }, layout.body)
            }
            ScreenState::SelfTest(state) => frame.render_widget(
                SelfTestView {
                    state,
                    tick_count: self.tick_count,
                },
                layout.body,
            ),
        }

        frame.render_widget(
            StatusBar {
                screen: self.screen,
                editing: self.editing(),
            },
            layout.status,
        );

        if self.show_help {
            frame.render_widget(HelpView, area);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        // Ctrl+Q always quits, even mid-edit.
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Action::Quit);
        }

        if key.code == KeyCode::F(1) {
            self.show_help = !self.show_help;
            return Ok(Action::Continue);
        }

        if self.show_help {
            if key.code == KeyCode::Esc {
                self.show_help = false;
            }
            return Ok(Action::Continue);
        }

        // Global navigation is suspended while a text field is armed, so
        // typed digits land in the field instead of switching screens.
        if !self.editing() {
            match key.code {
                KeyCode::Char('q') => return Ok(Action::Quit),
                KeyCode::Char(c @ '1'..='7') => {
                    let idx = (c as usize) - ('1' as usize);
                    self.switch_to(SCREENS[idx]);
                    return Ok(Action::Continue);
                }
                KeyCode::Tab => {
                    let idx = SCREENS.iter().position(|s| *s == self.screen).unwrap_or(0);
                    let mut next = (idx + 1) % SCREENS.len();
                    if SCREENS[next] == Screen::SelfTest && !self.config.self_test_enabled {
                        next = (next + 1) % SCREENS.len();
                    }
                    self.switch_to(SCREENS[next]);
                    return Ok(Action::Continue);
                }
                _ => {}
            }
        }

        match self.screen {
            Screen::Home => self.handle_home_key(key),
            Screen::Policies => self.handle_policies_key(key),
            Screen::Copilot => self.handle_copilot_key(key),
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Admin => self.handle_admin_key(key),
            Screen::Transparency => self.handle_transparency_key(key),
            Screen::SelfTest => self.handle_selftest_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Result<Action> {
        if let ScreenState::Home(state) = &mut self.state {
            if key.code == KeyCode::Char('r') {
                state.refresh(&self.client);
            }
        }
        Ok(Action::Continue)
    }

    fn handle_policies_key(&mut self, key: KeyEvent) -> Result<Action> {
        let ScreenState::Policies(state) = &mut self.state else {
            return Ok(Action::Continue);
        };

        if state.editing {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => state.editing = false,
                KeyCode::Backspace => {
                    match state.focused_field() {
                        PolicyField::Title => {
                            state.title.pop();
                        }
                        PolicyField::Instructor => {
                            state.instructor.pop();
                        }
                        _ => {}
                    };
                }
                KeyCode::Char(c) => match state.focused_field() {
                    PolicyField::Title => state.title.push(c),
                    PolicyField::Instructor => state.instructor.push(c),
                    _ => {}
                },
                _ => {}
            }
            return Ok(Action::Continue);
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                state.focus = (state.focus + POLICY_FIELDS.len() - 1) % POLICY_FIELDS.len();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                state.focus = (state.focus + 1) % POLICY_FIELDS.len();
            }
            KeyCode::Left | KeyCode::Right if state.focused_field() == PolicyField::Course => {
                let step = if key.code == KeyCode::Left {
                    COURSES.len() - 1
                } else {
                    1
                };
                state.course_idx = (state.course_idx + step) % COURSES.len();
            }
            KeyCode::Char(' ') => match state.focused_field() {
                PolicyField::BrainstormAllowed => {
                    state.brainstorm_allowed = !state.brainstorm_allowed
                }
                PolicyField::FullSolutionBanned => {
                    state.full_solution_banned = !state.full_solution_banned
                }
                PolicyField::ExamAiBanned => state.exam_ai_banned = !state.exam_ai_banned,
                PolicyField::DisclosureRequired => {
                    state.disclosure_required = !state.disclosure_required
                }
                _ => {}
            },
            KeyCode::Enter => match state.focused_field() {
                PolicyField::Title | PolicyField::Instructor => state.editing = true,
                PolicyField::Submit => state.submit(&self.client),
                _ => {}
            },
            _ => {}
        }
        Ok(Action::Continue)
    }

    fn handle_copilot_key(&mut self, key: KeyEvent) -> Result<Action> {
        let ScreenState::Copilot(state) = &mut self.state else {
            return Ok(Action::Continue);
        };

        if state.editing {
            match key.code {
                KeyCode::Esc => state.editing = false,
                KeyCode::Enter => {
                    state.editing = false;
                    if !state.question.trim().is_empty() {
                        state.ask(&self.client);
                    }
                }
                KeyCode::Backspace => {
                    if state.focus == 0 {
                        state.question.pop();
                    } else {
                        state.course_id.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if state.focus == 0 {
                        state.question.push(c);
                    } else {
                        state.course_id.push(c);
                    }
                }
                _ => {}
            }
            return Ok(Action::Continue);
        }

        match key.code {
            KeyCode::Up | KeyCode::Down => state.focus = 1 - state.focus.min(1),
            KeyCode::Char('i') => state.editing = true,
            KeyCode::Enter => {
                if !state.question.trim().is_empty() {
                    state.ask(&self.client);
                }
            }
            _ => {}
        }
        Ok(Action::Continue)
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<Action> {
        let ScreenState::Dashboard(state) = &mut self.state else {
            return Ok(Action::Continue);
        };

        if state.editing {
            match key.code {
                KeyCode::Esc => state.editing = false,
                KeyCode::Enter => {
                    state.editing = false;
                    state.fetch(&self.client);
                }
                KeyCode::Backspace => {
                    state.pseudonym.pop();
                }
                KeyCode::Char(c) => state.pseudonym.push(c),
                _ => {}
            }
            return Ok(Action::Continue);
        }

        match key.code {
            KeyCode::Char('r') => state.fetch(&self.client),
            KeyCode::Char('p') => state.editing = true,
            _ => {}
        }
        Ok(Action::Continue)
    }

    fn handle_admin_key(&mut self, key: KeyEvent) -> Result<Action> {
        let ScreenState::Admin(state) = &mut self.state else {
            return Ok(Action::Continue);
        };
        match key.code {
            KeyCode::Char('r') => state.fetch(&self.client),
            KeyCode::Left | KeyCode::Right => {
                let idx = COURSES
                    .iter()
                    .position(|c| *c == state.course_id)
                    .unwrap_or(0);
                let step = if key.code == KeyCode::Left {
                    COURSES.len() - 1
                } else {
                    1
                };
                state.course_id = COURSES[(idx + step) % COURSES.len()].to_string();
                state.fetch(&self.client);
            }
            _ => {}
        }
        Ok(Action::Continue)
    }

    fn handle_transparency_key(&mut self, key: KeyEvent) -> Result<Action> {
        let ScreenState::Transparency(state) = &mut self.state else {
            return Ok(Action::Continue);
        };

        if state.editing {
            match key.code {
                KeyCode::Esc => state.editing = false,
                KeyCode::Enter => {
                    state.editing = false;
                    state.fetch(&self.client);
                }
                KeyCode::Backspace => {
                    if state.focus == 0 {
                        state.pseudonym.pop();
                    } else {
                        state.course_id.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if state.focus == 0 {
                        state.pseudonym.push(c);
                    } else {
                        state.course_id.push(c);
                    }
                }
                _ => {}
            }
            return Ok(Action::Continue);
        }

        match key.code {
            KeyCode::Char('r') => state.fetch(&self.client),
            KeyCode::Up | KeyCode::Down => state.focus = 1 - state.focus.min(1),
            KeyCode::Char('i') | KeyCode::Enter => state.editing = true,
            _ => {}
        }
        Ok(Action::Continue)
    }

    fn handle_selftest_key(&mut self, key: KeyEvent) -> Result<Action> {
        let ScreenState::SelfTest(state) = &mut self.state else {
            return Ok(Action::Continue);
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                state.selected = (state.selected + PROBES.len() - 1) % PROBES.len();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                state.selected = (state.selected + 1) % PROBES.len();
            }
            KeyCode::Enter => {
                if !state.is_pending() {
                    state.run(&self.client, &self.config.default_course);
                }
            }
            _ => {}
        }
        Ok(Action::Continue)
    }
}
