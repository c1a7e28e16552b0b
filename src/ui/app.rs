//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::consts::cli_consts::SPLASH_SECS;
use crate::events::Event as WorkerEvent;
use crate::filters::CascadingFilter;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crate::ui::splash::render_splash;
use crate::workers::Command;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub api_url: String,
    pub live_interval: Duration,
}

impl UIConfig {
    pub fn new(with_background_color: bool, api_url: String, live_interval: Duration) -> Self {
        Self {
            with_background_color,
            api_url,
            live_interval,
        }
    }
}

/// The different screens in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Splash screen shown while the first sections load.
    Splash,
    Dashboard,
}

/// Application state
#[derive(Debug)]
pub struct App {
    /// The start time of the application, used for splash timing.
    start_time: Instant,

    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Dashboard state; collects events while the splash is still up.
    state: Box<DashboardState>,

    /// Receives events from worker tasks.
    event_receiver: mpsc::Receiver<WorkerEvent>,

    /// Sends commands to the refresh coordinator.
    command_sender: mpsc::Sender<Command>,

    /// Broadcasts shutdown signal to worker tasks.
    shutdown_sender: broadcast::Sender<()>,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        filter: CascadingFilter,
        event_receiver: mpsc::Receiver<WorkerEvent>,
        command_sender: mpsc::Sender<Command>,
        shutdown_sender: broadcast::Sender<()>,
        ui_config: UIConfig,
    ) -> Self {
        let start_time = Instant::now();
        Self {
            start_time,
            current_screen: Screen::Splash,
            state: Box::new(DashboardState::new(filter, start_time, ui_config)),
            event_receiver,
            command_sender,
            shutdown_sender,
        }
    }

    async fn send_commands(&self, commands: Vec<Command>) {
        for command in commands {
            if self.command_sender.send(command).await.is_err() {
                log::warn!("Refresh coordinator stopped; command dropped");
            }
        }
    }

    /// Returns `true` when the key asks to quit.
    async fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.current_screen == Screen::Splash {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                return true;
            }
            // Any other key skips the splash screen
            self.current_screen = Screen::Dashboard;
            return false;
        }

        if !self.state.captures_input() && matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
            return true;
        }
        let commands = self.state.handle_key(key);
        self.send_commands(commands).await;
        false
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_duration = Duration::from_secs(SPLASH_SECS);

    // Load everything once; the coordinator arms the live poller
    let initial = app.state.filter.query();
    app.send_commands(vec![Command::Initialize(initial)]).await;

    // UI event loop
    loop {
        // Queue all incoming events for processing
        while let Ok(event) = app.event_receiver.try_recv() {
            app.state.add_event(event);
        }
        app.state.update();

        terminal.draw(|f| render(f, app.current_screen, &app.state))?;

        // Handle splash-to-dashboard transition
        if app.current_screen == Screen::Splash && app.start_time.elapsed() >= splash_duration {
            app.current_screen = Screen::Dashboard;
            continue;
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                if app.handle_key(key).await {
                    // Send shutdown signal to workers
                    let _ = app.shutdown_sender.send(());
                    return Ok(());
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, screen: Screen, state: &DashboardState) {
    match screen {
        Screen::Splash => render_splash(f),
        Screen::Dashboard => render_dashboard(f, state),
    }
}
