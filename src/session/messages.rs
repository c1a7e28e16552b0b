//! Lines printed around a dashboard session
//!
//! The TUI prints these before entering and after leaving the alternate
//! screen, so they stay in the terminal scrollback. Headless mode prints
//! them around its event stream.

const CYAN: &str = "\x1b[1;36m";
const GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

/// Lifecycle points of a `cashweb start` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMessage {
    Starting { mode: String, api_url: String },
    ShuttingDown,
    Exited,
}

impl SessionMessage {
    fn text(&self) -> String {
        match self {
            Self::Starting { mode, api_url } => {
                format!("Starting {} dashboard against {}", mode, api_url)
            }
            Self::ShuttingDown => "Stopping the refresh workers...".to_string(),
            Self::Exited => "CashWeb dashboard exited successfully".to_string(),
        }
    }

    pub fn print(&self) {
        match self {
            Self::Exited => println!("{}[SUCCESS]{} {}", GREEN, RESET, self.text()),
            _ => println!("{}[INFO]{} {}", CYAN, RESET, self.text()),
        }
    }
}

pub fn print_session_starting(mode: &str, api_url: &str) {
    SessionMessage::Starting {
        mode: mode.to_string(),
        api_url: api_url.to_string(),
    }
    .print();
}

/// Printed once shutdown was broadcast, before joining the workers.
pub fn print_session_shutdown() {
    SessionMessage::ShuttingDown.print();
}

pub fn print_session_exit_success() {
    SessionMessage::Exited.print();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_names_mode_and_api() {
        let message = SessionMessage::Starting {
            mode: "headless".to_string(),
            api_url: "http://localhost:5000".to_string(),
        };
        assert_eq!(
            message.text(),
            "Starting headless dashboard against http://localhost:5000"
        );
    }
}
