//! Console output of the one-shot commands
//!
//! `set-server`, `reset` and the `exceptions` subcommands report through
//! these tagged lines instead of the dashboard's activity log. Startup
//! warnings of `start` (such as a clamped live interval) use them too.

const INFO: &str = "\x1b[1;33m[INFO]\x1b[0m";
const WARN: &str = "\x1b[1;91m[WARN]\x1b[0m";
const ERROR: &str = "\x1b[1;31m[ERROR]\x1b[0m";
const SUCCESS: &str = "\x1b[1;32m[SUCCESS]\x1b[0m";

/// `details` goes on the same line, tab separated, when not empty.
fn print_tagged(tag: &str, title: &str, details: &str) {
    if details.is_empty() {
        println!("{} {}", tag, title);
    } else {
        println!("{} {}\t {}", tag, title, details);
    }
}

/// Progress or an outcome that needs no action, e.g. an empty exception list.
pub fn print_info(title: &str, details: &str) {
    print_tagged(INFO, title, details);
}

/// A setting was adjusted instead of refused.
pub fn print_warn(title: &str, details: &str) {
    print_tagged(WARN, title, details);
}

/// A failed request or a rejected form. The API's `{error}` text, when
/// there is one, is printed on its own line.
pub fn print_error(title: &str, details: Option<&str>) {
    println!("{} {}", ERROR, title);
    if let Some(details) = details {
        println!("{} Details: {}", ERROR, details);
    }
}

/// The API accepted a save or delete, or the config file was written.
pub fn print_success(title: &str, details: &str) {
    print_tagged(SUCCESS, title, details);
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_info($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_warn($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_error($title, None)
    };
    ($title:expr, $details:expr) => {
        $crate::cli_messages::print_error($title, Some($details))
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_success($title, &format!($($details)*))
    };
}
