//! Session setup and initialization

use crate::api::{ApiClient, DashboardApi};
use crate::consts::cli_consts::live_refresh;
use crate::events::Event;
use crate::filters::{CascadingFilter, FilterState, Period, RegionMap};
use crate::print_cmd_warn;
use crate::runtime::start_dashboard_workers;
use crate::workers::Command;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Resolved options for a dashboard session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub api_url: String,
    pub period: Period,
    pub live_refresh_secs: Option<u64>,
}

/// Session data for both TUI and headless modes
#[derive(Debug)]
pub struct SessionData {
    /// Event receiver for worker events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Commands for the refresh coordinator
    pub command_sender: mpsc::Sender<Command>,
    /// Join handles for worker tasks
    pub join_handles: Vec<JoinHandle<()>>,
    /// Shutdown sender to stop all workers
    pub shutdown_sender: broadcast::Sender<()>,
    /// API the workers talk to
    pub api_url: String,
    /// Interval of the background live refresh
    pub live_interval: Duration,
    /// Filters the dashboard opens with
    pub filter: CascadingFilter,
}

/// Sets up a dashboard session
///
/// This function handles all the common setup required for both TUI and headless modes:
/// 1. Creates the API client
/// 2. Sets up shutdown channel
/// 3. Starts the refresh coordinator
/// 4. Returns session data for mode-specific handling
///
/// The initial load is not requested here; each mode sends
/// `Command::Initialize` once it is ready to receive events.
pub fn setup_session(options: SessionOptions) -> Result<SessionData, Box<dyn Error>> {
    let client = ApiClient::new(options.api_url)?;
    let api_url = client.base_url().to_string();
    if let Some(secs) = options
        .live_refresh_secs
        .filter(|secs| *secs < live_refresh::MIN_INTERVAL_SECS)
    {
        print_cmd_warn!(
            "Live refresh interval too short.",
            "{}s raised to {}s",
            secs,
            live_refresh::MIN_INTERVAL_SECS
        );
    }
    let live_interval = live_refresh::interval(options.live_refresh_secs);

    // Create shutdown channel - only one shutdown signal needed
    let (shutdown_sender, _) = broadcast::channel(1);

    let handles = start_dashboard_workers(Arc::new(client), live_interval, &shutdown_sender);

    let filter = CascadingFilter::new(
        RegionMap::default(),
        FilterState {
            period: options.period,
            ..Default::default()
        },
    );

    Ok(SessionData {
        event_receiver: handles.event_receiver,
        command_sender: handles.command_sender,
        join_handles: handles.join_handles,
        shutdown_sender,
        api_url,
        live_interval,
        filter,
    })
}
