//! Application state and event handling

mod config;
mod events;
mod state;

pub use config::{ConfigError, ThemeChoice, TuiConfig};
pub use events::{Event, EventHandler};
pub use state::{Focus, UiState};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::task::JoinHandle;
use unlatch_core::{AttemptOutcome, AuthController, AuthSnapshot, Evaluation, Toggle};

use crate::ui::{self, Theme};

/// Main application struct
pub struct App {
    /// Authentication controller
    pub controller: AuthController,

    /// Presentation state
    pub state: UiState,

    /// Visual theme
    pub theme: Theme,

    /// Loaded configuration
    pub config: TuiConfig,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Tick counter for animations
    pub tick: u64,

    /// Outstanding attempt, driven on the runtime
    attempt: Option<JoinHandle<AttemptOutcome>>,
}

impl App {
    /// Create a new application instance
    pub fn new(controller: AuthController, config: TuiConfig) -> Self {
        Self {
            controller,
            state: UiState::new(),
            theme: Theme::from_choice(config.theme),
            config,
            should_quit: false,
            tick: 0,
            attempt: None,
        }
    }

    /// Current controller state
    pub fn snapshot(&self) -> AuthSnapshot {
        self.controller.snapshot()
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventHandler,
    ) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            match events.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Apply one event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Key(_) | Event::Resize => {}
            Event::Tick => self.on_tick(),
            Event::StateChanged(snapshot) => self.state.clamp_focus(&snapshot),
            Event::Prompt(prompt) => {
                tracing::debug!("Prompt raised for {}", prompt.policy);
                self.state.prompt = Some(prompt);
            }
        }
    }

    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.state.discard_abandoned_prompt();

        if self.attempt.as_ref().is_some_and(JoinHandle::is_finished) {
            self.attempt = None;
        }
    }

    /// Handle key press events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Modal layers first: the platform prompt, then the alert
        if self.state.prompt.is_some() {
            self.handle_prompt_key(key.code);
            return;
        }

        if self.snapshot().notice.is_some() {
            self.handle_notice_key(key.code);
            return;
        }

        self.handle_screen_key(key.code);
    }

    fn handle_prompt_key(&mut self, key: KeyCode) {
        let Some(prompt) = self.state.prompt.take() else {
            return;
        };

        match key {
            KeyCode::Enter => prompt.approve(),
            KeyCode::Char('n') => prompt.reject(),
            KeyCode::Esc => prompt.cancel(),
            KeyCode::Char('e') => prompt.respond(Evaluation::system_error()),
            _ => self.state.prompt = Some(prompt),
        }
    }

    fn handle_notice_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('o') => {
                self.controller.dismiss_notice();
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_screen_key(&mut self, key: KeyCode) {
        let snapshot = self.snapshot();

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
                self.state.cycle_focus(&snapshot, true);
            }
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
                self.state.cycle_focus(&snapshot, false);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(self.state.focus),
            KeyCode::Char('a') => self.activate(Focus::Trigger),
            KeyCode::Char('c') => self.activate(Focus::CompanionDevice),
            KeyCode::Char('b') => self.activate(Focus::Biometric),
            _ => {}
        }
    }

    fn activate(&mut self, control: Focus) {
        let snapshot = self.snapshot();
        if !Focus::visible(&snapshot).contains(&control) {
            return;
        }

        self.state.clear_messages();
        match control {
            Focus::Trigger => self.toggle_authentication(),
            Focus::CompanionDevice => self
                .controller
                .set_allow_companion_device(!snapshot.options.allow_companion_device),
            Focus::Biometric => self
                .controller
                .set_allow_biometric(!snapshot.options.allow_biometric),
        }
    }

    fn toggle_authentication(&mut self) {
        if !self.controller.can_trigger() {
            self.state.status_message = Some(if self.snapshot().session.is_authenticating() {
                "Waiting for the current attempt to finish".to_string()
            } else {
                "Select at least one authentication option".to_string()
            });
            return;
        }

        match self.controller.toggle_authentication() {
            Ok(Toggle::Started(attempt)) => {
                tracing::info!("Authenticating with {}", attempt.policy());
                self.attempt = Some(tokio::spawn(attempt));
            }
            Ok(Toggle::SignedOut) | Ok(Toggle::Unavailable) => {}
            Err(e) => self.state.status_message = Some(e.to_string()),
        }
    }

    /// Wait for the outstanding attempt, if any
    pub async fn settle(&mut self) -> Option<AttemptOutcome> {
        let handle = self.attempt.take()?;
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!("Attempt task failed: {}", e);
                None
            }
        }
    }

    /// Abandon any outstanding attempt and wait for it to unwind
    pub async fn shutdown(&mut self) {
        if let Some(prompt) = self.state.prompt.take() {
            prompt.cancel();
        }
        if let Some(handle) = self.attempt.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}
