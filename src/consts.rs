pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! Configuration constants for the dashboard client, organized by
    //! functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered worker events waiting for the UI.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Maximum number of buffered UI commands waiting for the coordinator.
    pub const COMMAND_QUEUE_SIZE: usize = 32;

    // =============================================================================
    // DISPLAY CONFIGURATION
    // =============================================================================

    /// Recent transactions shown in the live panel.
    pub const MAX_RECENT_TRANSACTIONS: usize = 10;

    /// Seconds the splash screen stays up before the dashboard opens.
    pub const SPLASH_SECS: u64 = 2;

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP client configuration
    pub mod http {
        use std::time::Duration;

        /// Connect timeout for API requests (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Overall request timeout (seconds). The overview endpoint reads
        /// spreadsheets server-side and can be slow.
        pub const REQUEST_TIMEOUT_SECS: u64 = 30;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    /// Background polling of the live sections
    pub mod live_refresh {
        use std::time::Duration;

        /// Default interval between background refreshes of company status and
        /// recent transactions (seconds).
        pub const DEFAULT_INTERVAL_SECS: u64 = 300;

        /// Lower bound accepted from configuration (seconds).
        pub const MIN_INTERVAL_SECS: u64 = 30;

        /// Clamp a configured interval into the accepted range.
        pub fn interval(configured_secs: Option<u64>) -> Duration {
            let secs = configured_secs
                .unwrap_or(DEFAULT_INTERVAL_SECS)
                .max(MIN_INTERVAL_SECS);
            Duration::from_secs(secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::cli_consts::live_refresh;
    use std::time::Duration;

    #[test]
    fn test_live_interval_defaults_and_clamps() {
        assert_eq!(live_refresh::interval(None), Duration::from_secs(300));
        assert_eq!(live_refresh::interval(Some(5)), Duration::from_secs(30));
        assert_eq!(live_refresh::interval(Some(60)), Duration::from_secs(60));
    }
}
