//! Unlatch TUI - biometric / companion device sign-in
//!
//! Runs the authenticator screen against a prompt-driven platform: every
//! evaluation is raised as an on-screen prompt that the user answers from
//! the keyboard.

use std::fs::{self, File};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use unlatch_core::{AuthController, PromptAuthenticator};
use unlatch_tui::app::{EventHandler, ThemeChoice, TuiConfig};
use unlatch_tui::App;

/// Log file name under the local data directory
const LOG_FILE_NAME: &str = "unlatch.log";

#[derive(Parser)]
#[command(name = "unlatch")]
#[command(about = "Sign in with Touch ID or Apple Watch", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulate a device with no biometric enrolled
    #[arg(long)]
    no_biometric: bool,

    /// Simulate a device with no companion device in range
    #[arg(long)]
    no_companion: bool,

    /// Simulate authentication disabled by device policy
    #[arg(long)]
    platform_disabled: bool,

    /// Use the high-contrast color scheme
    #[arg(long)]
    high_contrast: bool,
}

impl Cli {
    /// Load the configuration and apply flag overrides
    fn config(&self) -> TuiConfig {
        let mut config = match &self.config {
            Some(path) => TuiConfig::load_from(path),
            None => TuiConfig::load(),
        };

        if self.no_biometric {
            config.enrollment.biometric_enrolled = false;
        }
        if self.no_companion {
            config.enrollment.companion_device_reachable = false;
        }
        if self.platform_disabled {
            config.enrollment.disabled_by_policy = true;
        }
        if self.high_contrast {
            config.theme = ThemeChoice::HighContrast;
        }

        config
    }
}

/// Application entry point with panic handling for terminal restoration
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    init_logging()?;
    tracing::info!("Starting unlatch v{}", env!("CARGO_PKG_VERSION"));

    let result = run_app(cli.config()).await;

    if let Err(e) = &result {
        tracing::error!("Application error: {}", e);
    }

    result
}

/// Log to a file so the alternate screen stays clean
fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("unlatch_tui=info,unlatch_core=info"));

    let file_layer = match log_file() {
        Ok(file) => Some(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        ),
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn log_file() -> Result<File> {
    let dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("no local data directory"))?
        .join("unlatch");
    fs::create_dir_all(&dir)?;

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))?;
    Ok(file)
}

/// Main application runner
async fn run_app(config: TuiConfig) -> Result<()> {
    let (platform, prompts) = PromptAuthenticator::channel(config.enrollment);
    let controller = AuthController::with_request(Arc::new(platform), config.evaluation_request());
    tracing::debug!("Using {} platform", controller.platform_name());

    let mut events = EventHandler::new(config.tick_rate());
    events.spawn_ticks();
    events.forward_state(controller.subscribe());
    events.forward_prompts(prompts);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Keyboard input is only read once the terminal is in raw mode
    events.spawn_terminal_input();

    let mut app = App::new(controller, config);
    let result = app.run(&mut terminal, &mut events).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
