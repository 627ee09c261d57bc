//! Event handling for the TUI
//!
//! Every source the UI reacts to (keyboard, ticks, controller state and
//! platform prompts) is forwarded into one channel so the main loop has a
//! single place to wait.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use unlatch_core::{AuthSnapshot, PromptRequest};

/// Application events
#[derive(Debug)]
pub enum Event {
    /// Keyboard input
    Key(KeyEvent),
    /// Terminal resized
    Resize,
    /// Terminal tick (for animations)
    Tick,
    /// Controller published a new state
    StateChanged(AuthSnapshot),
    /// Platform is waiting for the user to answer a prompt
    Prompt(PromptRequest),
}

/// Collects events from background tasks
pub struct EventHandler {
    /// Sender for events
    sender: mpsc::UnboundedSender<Event>,
    /// Receiver for events
    receiver: mpsc::UnboundedReceiver<Event>,
    /// Tick rate for animations
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            tick_rate,
        }
    }

    fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Receive the next event
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Start the tick generator
    pub fn spawn_ticks(&self) {
        let tx = self.sender();
        let tick_rate = self.tick_rate;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });
    }

    /// Start reading keyboard and resize events from the terminal
    pub fn spawn_terminal_input(&self) {
        let tx = self.sender();

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            while let Some(event) = reader.next().await {
                let event = match event {
                    Ok(CrosstermEvent::Key(key)) => Event::Key(key),
                    Ok(CrosstermEvent::Resize(_, _)) => Event::Resize,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::error!("Terminal input error: {}", e);
                        break;
                    }
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
    }

    /// Forward controller state changes
    pub fn forward_state(&self, mut state: watch::Receiver<AuthSnapshot>) {
        let tx = self.sender();

        tokio::spawn(async move {
            while state.changed().await.is_ok() {
                let snapshot = *state.borrow_and_update();
                if tx.send(Event::StateChanged(snapshot)).is_err() {
                    break;
                }
            }
        });
    }

    /// Forward prompts raised by the platform
    pub fn forward_prompts(&self, mut prompts: mpsc::Receiver<PromptRequest>) {
        let tx = self.sender();

        tokio::spawn(async move {
            while let Some(prompt) = prompts.recv().await {
                // A prompt dropped here resolves its attempt as a platform error
                if tx.send(Event::Prompt(prompt)).is_err() {
                    break;
                }
            }
        });
    }
}
