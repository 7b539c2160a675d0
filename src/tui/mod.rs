//! Interactive ratatui-based session.
//!
//! The TUI opens on a start menu (example base with every input on, custom
//! base with every input off, quit). The graph screen draws the layout with a
//! `>` cursor beside the selected input; true atoms are shown in reverse
//! video. Keys: ↑/↓ move, `x` toggles the selected input, `q` returns to the
//! menu. Typing `/` opens a command line for editing the rule base
//! (`/add-input`, `/remove-input`, `/add-rule`, `/remove-rule`, `/help`,
//! `/quit`).

pub mod widgets;

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use miette::{Diagnostic, IntoDiagnostic};

use crate::config::{Config, InitialInputs};
use crate::kb::KnowledgeBase;
use crate::layout::GlyphSet;
use crate::session::Session;

/// Entries of the start menu, in display order.
pub const MENU_ITEMS: [&str; 3] = ["Example base", "Custom base", "Quit"];

const HELP: &str = "Keys: ↑/↓ move, x toggle, q menu. Commands: /add-input N, \
                    /remove-input N, /add-rule A & !B -> R, /remove-rule R, /menu, /help, /quit";

/// A line in the notes pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    System(String),
    Error {
        code: String,
        message: String,
        help: Option<String>,
    },
}

impl Note {
    pub fn system(text: impl Into<String>) -> Self {
        Note::System(text.into())
    }

    /// Capture a diagnostic's code, message and help text.
    pub fn from_diagnostic(err: &dyn Diagnostic) -> Self {
        Note::Error {
            code: err
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "regula".to_string()),
            message: err.to_string(),
            help: err.help().map(|h| h.to_string()),
        }
    }
}

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu { selected: usize },
    Graph,
}

/// TUI application state.
pub struct RegulaTui {
    kb: KnowledgeBase,
    config: Config,
    glyphs: GlyphSet,
    screen: Screen,
    session: Option<Session>,
    cursor: usize,
    input_buffer: String,
    notes: Vec<Note>,
    should_quit: bool,
}

impl RegulaTui {
    /// Create a TUI over `kb`. Each menu choice starts a fresh session on a
    /// copy of it.
    pub fn new(kb: KnowledgeBase, config: Config) -> Self {
        let glyphs = GlyphSet::for_style(config.glyphs);
        Self {
            kb,
            config,
            glyphs,
            screen: Screen::Menu { selected: 0 },
            session: None,
            cursor: 0,
            input_buffer: String::new(),
            notes: vec![Note::system("Type /help for commands.")],
            should_quit: false,
        }
    }

    /// Skip the menu and open the graph with inputs set per `initial`.
    pub fn open(&mut self, initial: InitialInputs) {
        self.session = Some(Session::new(
            self.kb.clone(),
            initial,
            self.config.inference(),
        ));
        self.cursor = 0;
        self.input_buffer.clear();
        self.screen = Screen::Graph;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the TUI event loop.
    pub fn run(&mut self) -> miette::Result<()> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal);
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut ratatui::DefaultTerminal) -> miette::Result<()> {
        let poll = Duration::from_millis(self.config.poll_interval_ms);
        loop {
            terminal
                .draw(|frame| match (self.screen, self.session.as_ref()) {
                    (Screen::Graph, Some(session)) => widgets::render_graph(
                        frame,
                        session,
                        &self.glyphs,
                        self.cursor,
                        &self.input_buffer,
                        &self.notes,
                    ),
                    (screen, _) => widgets::render_menu(frame, selected_or(screen)),
                })
                .into_diagnostic()?;

            if self.should_quit {
                break;
            }

            if event::poll(poll).into_diagnostic()? {
                if let Event::Key(key) = event::read().into_diagnostic()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    self.handle_key(key.code, key.modifiers);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if let KeyCode::Char('c') = code {
            if modifiers.contains(KeyModifiers::CONTROL) {
                self.should_quit = true;
                return;
            }
        }
        match self.screen {
            Screen::Menu { selected } => self.handle_menu_key(selected, code),
            Screen::Graph if !self.input_buffer.is_empty() => self.handle_command_key(code),
            Screen::Graph => self.handle_graph_key(code),
        }
    }

    fn handle_menu_key(&mut self, selected: usize, code: KeyCode) {
        match code {
            KeyCode::Up => {
                self.screen = Screen::Menu {
                    selected: selected.saturating_sub(1),
                };
            }
            KeyCode::Down => {
                self.screen = Screen::Menu {
                    selected: (selected + 1).min(MENU_ITEMS.len() - 1),
                };
            }
            KeyCode::Enter => match selected {
                0 => self.open(InitialInputs::AllOn),
                1 => self.open(InitialInputs::AllOff),
                _ => self.should_quit = true,
            },
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_graph_key(&mut self, code: KeyCode) {
        let count = self.session.as_ref().map_or(0, Session::input_count);
        match code {
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.cursor + 1 < count {
                    self.cursor += 1;
                }
            }
            KeyCode::Char('x') | KeyCode::Char('X') => self.toggle_selected(),
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.session = None;
                self.screen = Screen::Menu { selected: 0 };
            }
            KeyCode::Char('/') => self.input_buffer.push('/'),
            _ => {}
        }
    }

    fn handle_command_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                let input = self.input_buffer.trim().to_string();
                self.input_buffer.clear();
                if let Some(cmd) = input.strip_prefix('/') {
                    self.handle_command(cmd);
                }
            }
            KeyCode::Esc => self.input_buffer.clear(),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    fn toggle_selected(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(name) = session.input_at(self.cursor).map(str::to_string) else {
            return;
        };
        if let Err(e) = session.toggle_input(&name) {
            self.notes.push(Note::from_diagnostic(&e));
        }
    }

    /// Execute a slash command (without the leading `/`).
    pub fn handle_command(&mut self, cmd: &str) {
        let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
        let arg = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

        match parts[0] {
            "quit" | "q" => {
                self.should_quit = true;
                return;
            }
            "help" | "h" => {
                self.notes.push(Note::system(HELP));
                return;
            }
            "menu" => {
                self.session = None;
                self.screen = Screen::Menu { selected: 0 };
                return;
            }
            _ => {}
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(arg) = arg else {
            self.notes.push(Note::system(format!(
                "Usage: /{} <argument>. Type /help for commands.",
                parts[0]
            )));
            return;
        };

        let note = match parts[0] {
            "add-input" => match session.add_input(arg) {
                Ok(()) => Note::system(format!("Added input {arg}.")),
                Err(e) => Note::from_diagnostic(&e),
            },
            "remove-input" => match session.remove_input(arg) {
                Ok(report) => Note::system(removal_summary(arg, &report.removed_rules)),
                Err(e) => Note::from_diagnostic(&e),
            },
            "add-rule" => match session.add_rule_text(arg) {
                Ok(()) => Note::system(format!("Added rule {arg}.")),
                Err(e) => Note::from_diagnostic(&e),
            },
            "remove-rule" => match session.remove_rule(arg) {
                Some(report) => Note::system(removal_summary(arg, &report.removed_rules)),
                None => Note::system(format!("No rule concludes {arg}.")),
            },
            other => Note::system(format!("Unknown command: /{other}. Type /help for commands.")),
        };
        self.notes.push(note);
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let count = self.session.as_ref().map_or(0, Session::input_count);
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }
}

fn selected_or(screen: Screen) -> usize {
    match screen {
        Screen::Menu { selected } => selected,
        Screen::Graph => 0,
    }
}

fn removal_summary(name: &str, removed: &[String]) -> String {
    if removed.is_empty() {
        format!("Removed {name}.")
    } else {
        format!("Removed {name}; rules removed: {}.", removed.join(", "))
    }
}

/// Launch the TUI on `kb`.
pub fn launch(kb: KnowledgeBase, config: Config) -> miette::Result<()> {
    let mut tui = RegulaTui::new(kb, config);
    tui.run()
}

/// Launch the TUI directly on the graph screen, skipping the menu.
pub fn launch_graph(kb: KnowledgeBase, config: Config) -> miette::Result<()> {
    let initial = config.initial_inputs;
    let mut tui = RegulaTui::new(kb, config);
    tui.open(initial);
    tui.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(tui: &mut RegulaTui, code: KeyCode) {
        tui.handle_key(code, KeyModifiers::NONE);
    }

    fn type_command(tui: &mut RegulaTui, text: &str) {
        for c in text.chars() {
            press(tui, KeyCode::Char(c));
        }
        press(tui, KeyCode::Enter);
    }

    fn example_tui() -> RegulaTui {
        RegulaTui::new(KnowledgeBase::example().unwrap(), Config::default())
    }

    #[test]
    fn menu_selects_custom_base_with_inputs_off() {
        let mut tui = example_tui();
        press(&mut tui, KeyCode::Down);
        press(&mut tui, KeyCode::Enter);
        assert_eq!(tui.screen(), Screen::Graph);
        let session = tui.session().unwrap();
        assert!(session.inputs().all(|(_, on)| !on));
    }

    #[test]
    fn menu_quit_entry_and_cursor_bounds() {
        let mut tui = example_tui();
        for _ in 0..5 {
            press(&mut tui, KeyCode::Down);
        }
        assert_eq!(tui.screen(), Screen::Menu { selected: 2 });
        press(&mut tui, KeyCode::Enter);
        assert!(tui.should_quit());
    }

    #[test]
    fn x_toggles_the_selected_input() {
        let mut tui = example_tui();
        press(&mut tui, KeyCode::Enter);
        press(&mut tui, KeyCode::Down);
        press(&mut tui, KeyCode::Char('x'));
        let session = tui.session().unwrap();
        assert_eq!(session.input("B"), Some(false));
        assert!(!session.holds("R1"));
    }

    #[test]
    fn cursor_stays_within_inputs() {
        let mut tui = example_tui();
        press(&mut tui, KeyCode::Enter);
        press(&mut tui, KeyCode::Up);
        assert_eq!(tui.cursor(), 0);
        for _ in 0..10 {
            press(&mut tui, KeyCode::Down);
        }
        assert_eq!(tui.cursor(), 4);
    }

    #[test]
    fn q_returns_to_the_menu() {
        let mut tui = example_tui();
        press(&mut tui, KeyCode::Enter);
        press(&mut tui, KeyCode::Char('q'));
        assert_eq!(tui.screen(), Screen::Menu { selected: 0 });
        assert!(tui.session().is_none());
        assert!(!tui.should_quit());
    }

    #[test]
    fn slash_commands_edit_the_session() {
        let mut tui = example_tui();
        tui.open(InitialInputs::AllOn);
        type_command(&mut tui, "/add-rule R4 & !F -> R6");
        assert!(tui.session().unwrap().holds("R6"));
        type_command(&mut tui, "/add-rule G -> R7");
        type_command(&mut tui, "/remove-input G");
        let session = tui.session().unwrap();
        assert!(session.kb().find("R7").is_none());
        assert!(session.input("G").is_none());
        assert!(matches!(tui.notes().last(), Some(Note::System(text)) if text.contains("R7")));
    }

    #[test]
    fn x_inside_a_command_is_text() {
        let mut tui = example_tui();
        tui.open(InitialInputs::AllOn);
        type_command(&mut tui, "/add-input x");
        let session = tui.session().unwrap();
        assert_eq!(session.input("x"), Some(false));
        assert_eq!(session.input("A"), Some(true));
    }

    #[test]
    fn failed_commands_leave_an_error_note() {
        let mut tui = example_tui();
        tui.open(InitialInputs::AllOn);
        type_command(&mut tui, "/add-input R1");
        assert!(matches!(
            tui.notes().last(),
            Some(Note::Error { code, .. }) if code == "regula::session::derived_name"
        ));
        type_command(&mut tui, "/remove-rule nope");
        assert!(matches!(tui.notes().last(), Some(Note::System(_))));
    }

    #[test]
    fn removing_inputs_clamps_the_cursor() {
        let mut tui = example_tui();
        tui.open(InitialInputs::AllOn);
        for _ in 0..4 {
            press(&mut tui, KeyCode::Down);
        }
        type_command(&mut tui, "/remove-input E");
        assert_eq!(tui.cursor(), 3);
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let mut tui = example_tui();
        tui.open(InitialInputs::AllOff);
        tui.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(tui.should_quit());
    }
}
