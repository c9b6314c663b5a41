use std::io::{self, Stdout};
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde_json::{Map, Value};

use crate::field::{DropdownField, Validatable, ValueBinding};
use crate::io::OutputOptions;
use crate::ui::{self, UiContext};

const HELP_TEXT: &str =
    "Tab/Shift+Tab navigate • Up/Down select • Backspace clear • Ctrl+S save • Ctrl+Q quit";
const READY_STATUS: &str = "Ready. Press Ctrl+S to validate and save.";

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub auto_validate: bool,
    pub confirm_exit: bool,
    pub show_help: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            auto_validate: true,
            confirm_exit: true,
            show_help: true,
        }
    }
}

/// One named field of the session.
pub struct FormField {
    pub name: String,
    pub label: String,
    pub field: DropdownField,
}

/// Interactive session hosting dropdown fields: initializes them, drains
/// their fetches, routes keys, aggregates validity, and emits the selected
/// values.
pub struct FormUI {
    title: Option<String>,
    options: UiOptions,
    output: Option<OutputOptions>,
    fields: Vec<FormField>,
}

impl FormUI {
    pub fn new() -> Self {
        Self {
            title: None,
            options: UiOptions::default(),
            output: None,
            fields: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = Some(output);
        self
    }

    pub fn add_field(
        mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        field: DropdownField,
    ) -> Self {
        self.fields.push(FormField {
            name: name.into(),
            label: label.into(),
            field,
        });
        self
    }

    pub fn run(self) -> Result<Value> {
        let FormUI {
            title,
            options,
            output,
            fields,
        } = self;
        let mut app = App::new(fields, title, options, output);
        app.run()
    }
}

impl Default for FormUI {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    fields: Vec<FormField>,
    focus: usize,
    options: UiOptions,
    output: Option<OutputOptions>,
    title: Option<String>,
    status_message: String,
    validation_errors: usize,
    exit_armed: bool,
    should_quit: bool,
    result: Option<Value>,
}

impl App {
    fn new(
        fields: Vec<FormField>,
        title: Option<String>,
        options: UiOptions,
        output: Option<OutputOptions>,
    ) -> Self {
        let mut app = Self {
            fields,
            focus: 0,
            options,
            output,
            title,
            status_message: READY_STATUS.to_string(),
            validation_errors: 0,
            exit_armed: false,
            should_quit: false,
            result: None,
        };
        for entry in &mut app.fields {
            entry.field.init();
        }
        app
    }

    fn run(&mut self) -> Result<Value> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            self.drain_fetches();
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(self.options.tick_rate).context("failed to poll terminal events")? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    Event::Mouse(_) => {}
                    Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
                }
            }
        }

        for entry in &mut self.fields {
            entry.field.dispose();
        }

        if let Some(value) = self.result.take() {
            Ok(value)
        } else {
            Err(anyhow!("user exited without saving"))
        }
    }

    fn drain_fetches(&mut self) {
        for entry in &mut self.fields {
            entry.field.poll_options();
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let help = if self.options.show_help {
            Some(HELP_TEXT)
        } else {
            None
        };
        ui::draw(
            frame,
            UiContext {
                title: self.title.as_deref(),
                fields: &self.fields,
                focus: self.focus,
                status_message: &self.status_message,
                dirty: self.is_dirty(),
                error_count: self.validation_errors,
                help,
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    self.exit_armed = false;
                    self.on_save();
                }
                KeyCode::Char('q')
                | KeyCode::Char('Q')
                | KeyCode::Char('c')
                | KeyCode::Char('C') => {
                    self.on_exit();
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus_next(1);
                self.exit_armed = false;
            }
            KeyCode::BackTab => {
                self.focus_next(-1);
                self.exit_armed = false;
            }
            KeyCode::Esc => {
                self.exit_armed = false;
                self.status_message = READY_STATUS.to_string();
            }
            _ => {
                if let Some(entry) = self.fields.get_mut(self.focus) {
                    if entry.field.handle_key(&key) {
                        self.exit_armed = false;
                        self.status_message = format!("Editing {}", entry.label);
                        if self.options.auto_validate {
                            self.validate_current(false);
                        }
                    }
                }
            }
        }
    }

    fn focus_next(&mut self, delta: i32) {
        if self.fields.is_empty() {
            return;
        }
        let len = self.fields.len() as i32;
        self.focus = ((((self.focus as i32 + delta) % len) + len) % len) as usize;
    }

    fn is_dirty(&self) -> bool {
        self.fields.iter().any(|entry| entry.field.dirty)
    }

    fn on_save(&mut self) {
        if !self.validate_current(true) {
            return;
        }
        let value = self.collect_values();
        if let Some(output) = &self.output {
            if let Err(err) = crate::io::emit(&value, output) {
                self.status_message = format!("failed to write output: {err:#}");
                return;
            }
        }
        self.status_message = "Selections saved".to_string();
        self.result = Some(value);
        self.should_quit = true;
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.is_dirty() && !self.exit_armed {
            self.exit_armed = true;
            self.status_message =
                "Unsaved changes. Press Ctrl+Q again to quit without saving.".to_string();
            return;
        }
        self.should_quit = true;
        self.result = None;
    }

    fn validate_current(&mut self, announce: bool) -> bool {
        let mut issues = 0usize;
        for entry in &mut self.fields {
            match entry.field.validate() {
                Some(err) => {
                    issues += 1;
                    entry.field.set_error(err.to_string());
                }
                None => entry.field.clear_error(),
            }
        }
        self.validation_errors = issues;
        if announce {
            self.status_message = if issues == 0 {
                "Validation passed".to_string()
            } else {
                format!("{issues} issue(s) remaining")
            };
        }
        issues == 0
    }

    fn collect_values(&self) -> Value {
        let mut map = Map::new();
        for entry in &self.fields {
            let value = entry
                .field
                .value()
                .map(|v| Value::String(v.to_string()))
                .unwrap_or(Value::Null);
            map.insert(entry.name.clone(), value);
        }
        Value::Object(map)
    }
}

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl Deref for TerminalGuard {
    type Target = Terminal<CrosstermBackend<Stdout>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TerminalGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}
