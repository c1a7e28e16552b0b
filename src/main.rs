mod api;
mod chart;
mod cli_messages;
mod config;
mod consts;
mod environment;
mod error_classifier;
mod events;
mod exception_commands;
mod exceptions;
mod filters;
mod logging;
mod runtime;
mod session;
mod ui;
mod workers;

use crate::api::ApiClient;
use crate::api::types::ExceptionType;
use crate::config::{Config, get_config_path};
use crate::environment::Environment;
use crate::exceptions::ExceptionForm;
use crate::filters::Period;
use crate::session::{SessionOptions, run_headless_mode, run_tui_mode, setup_session};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the cash-application dashboard
    Start {
        /// Base URL of the CashWeb API
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,

        /// Run without the terminal UI, printing events to stdout
        #[arg(long = "headless", action = ArgAction::SetTrue)]
        headless: bool,

        /// Paint a dark background behind the dashboard
        #[arg(long = "with-background", action = ArgAction::SetTrue)]
        with_background: bool,

        /// Seconds between background refreshes of the live sections
        #[arg(long, value_name = "SECS")]
        live_interval: Option<u64>,

        /// Overview period: day, week, month, quarter or year
        #[arg(long, value_name = "PERIOD", value_parser = parse_period)]
        period: Option<Period>,
    },
    /// Save the API base URL to the config file
    SetServer {
        #[arg(long, value_name = "URL")]
        url: String,
    },
    /// Delete the config file
    Reset,
    /// Manage customer exceptions without the dashboard
    Exceptions {
        /// Base URL of the CashWeb API
        #[arg(long, value_name = "URL", global = true)]
        api_url: Option<String>,

        #[command(subcommand)]
        command: ExceptionsCommand,
    },
}

#[derive(Subcommand)]
enum ExceptionsCommand {
    /// List customer exceptions
    List {
        /// Case-insensitive text matched against every column
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },
    /// Create a customer exception
    Add(ExceptionFields),
    /// Replace an existing customer exception
    Update {
        #[arg(long)]
        id: i64,

        #[command(flatten)]
        fields: ExceptionFields,
    },
    /// Delete a customer exception
    Delete {
        #[arg(long)]
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(ClapArgs)]
struct ExceptionFields {
    #[arg(long, default_value = "")]
    company_code: String,

    #[arg(long, default_value = "")]
    house_bank: String,

    #[arg(long, default_value = "")]
    currency: String,

    #[arg(long, default_value = "")]
    business_partner: String,

    /// include or exclude
    #[arg(long, value_name = "TYPE")]
    exception_type: Option<String>,

    #[arg(long, default_value = "")]
    comment: String,
}

impl ExceptionFields {
    fn into_form(self, id: Option<i64>) -> Result<ExceptionForm, Box<dyn Error>> {
        let exception_type = match self.exception_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(ExceptionType::from_str(value).map_err(|_| {
                print_cmd_error!("Exception type must be include or exclude");
                format!("Invalid exception type: {}", value)
            })?),
        };
        Ok(ExceptionForm {
            id,
            company_code: self.company_code,
            house_bank: self.house_bank,
            currency: self.currency,
            business_partner: self.business_partner,
            exception_type,
            comment: self.comment,
        })
    }
}

fn parse_period(value: &str) -> Result<Period, String> {
    Period::from_str(value).map_err(|_| {
        format!(
            "unknown period '{}', expected day, week, month, quarter or year",
            value
        )
    })
}

/// CLI flag, then config file, then `CASHWEB_ENVIRONMENT`.
fn resolve_api_url(flag: Option<String>, config: &Config) -> String {
    if let Some(url) = flag.filter(|u| !u.trim().is_empty()) {
        return url;
    }
    if let Some(url) = config.api_url.clone().filter(|u| !u.trim().is_empty()) {
        return url;
    }
    let environment = std::env::var("CASHWEB_ENVIRONMENT")
        .unwrap_or_default()
        .parse::<Environment>()
        .unwrap_or_default();
    environment.api_url()
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    log::set_max_level(logging::get_rust_log_level().into());
    let config_path = get_config_path()?;
    let args = Args::parse();
    match args.command {
        Command::Start {
            api_url,
            headless,
            with_background,
            live_interval,
            period,
        } => {
            let config = load_config(&config_path)?;
            let options = SessionOptions {
                api_url: resolve_api_url(api_url, &config),
                period: period.or(config.default_period).unwrap_or_default(),
                live_refresh_secs: live_interval.or(config.live_refresh_secs),
            };
            start(options, headless, with_background).await
        }
        Command::SetServer { url } => {
            let url = url.trim().trim_end_matches('/').to_string();
            if url.is_empty() {
                print_cmd_error!("The API URL must not be empty");
                return Err(Box::from("Empty API URL"));
            }
            let mut config = load_config(&config_path)?;
            config.api_url = Some(url.clone());
            config.save(&config_path).map_err(|e| {
                print_cmd_error!("Failed to save config.", &e.to_string());
                e
            })?;
            print_cmd_success!("API server saved.", "{}", url);
            Ok(())
        }
        Command::Reset => {
            print_cmd_info!(
                "Clearing the CashWeb configuration file...",
                "{}",
                config_path.display()
            );
            Config::clear(&config_path).map_err(Into::into)
        }
        Command::Exceptions { api_url, command } => {
            let config = load_config(&config_path)?;
            run_exceptions_command(resolve_api_url(api_url, &config), command).await
        }
    }
}

fn load_config(path: &Path) -> Result<Config, Box<dyn Error>> {
    Config::load_or_default(path).map_err(|e| {
        print_cmd_error!("Failed to read config.", &e.to_string());
        Box::from(format!("Invalid config file {}: {}", path.display(), e))
    })
}

async fn run_exceptions_command(
    api_url: String,
    command: ExceptionsCommand,
) -> Result<(), Box<dyn Error>> {
    match command {
        ExceptionsCommand::List { filter } => {
            let client = ApiClient::new(api_url)?;
            exception_commands::list_exceptions(&client, filter.as_deref()).await?;
            Ok(())
        }
        ExceptionsCommand::Add(fields) => {
            let form = fields.into_form(None)?;
            let client = ApiClient::new(api_url)?;
            exception_commands::save_exception(&client, &form).await
        }
        ExceptionsCommand::Update { id, fields } => {
            let form = fields.into_form(Some(id))?;
            let client = ApiClient::new(api_url)?;
            exception_commands::save_exception(&client, &form).await
        }
        ExceptionsCommand::Delete { id, yes } => {
            let confirmed = yes || confirm(&format!("Delete customer exception {}?", id))?;
            let client = ApiClient::new(api_url)?;
            exception_commands::delete_exception(&client, id, confirmed).await?;
            Ok(())
        }
    }
}

/// Starts the dashboard session in TUI or headless mode.
async fn start(
    options: SessionOptions,
    headless: bool,
    with_background: bool,
) -> Result<(), Box<dyn Error>> {
    let session = setup_session(options).map_err(|e| {
        print_cmd_error!("Failed to start the dashboard.", &e.to_string());
        e
    })?;

    if headless {
        run_headless_mode(session).await
    } else {
        run_tui_mode(session, with_background).await
    }
}
