//! One-shot `exceptions` subcommands
//!
//! List, add, update and delete customer exceptions without opening the
//! dashboard. Forms are validated before any request is sent.

use crate::api::DashboardApi;
use crate::api::types::CustomerException;
use crate::exceptions::{ExceptionForm, filter_exceptions};
use crate::{print_cmd_error, print_cmd_info, print_cmd_success};
use std::error::Error;

/// Prints the exceptions matching `filter` and returns how many matched.
pub async fn list_exceptions(
    api: &dyn DashboardApi,
    filter: Option<&str>,
) -> Result<usize, Box<dyn Error>> {
    let records = api.customer_exceptions().await.map_err(|e| {
        print_cmd_error!("Failed to load customer exceptions.", &e.summary());
        e
    })?;
    let visible = filter_exceptions(&records, filter.unwrap_or_default());

    if visible.is_empty() {
        print_cmd_info!("No customer exceptions found.", "");
        return Ok(0);
    }
    println!(
        "{:>6}  {:<8} {:<10} {:<8} {:<14} {:<8} {}",
        "ID", "Company", "House bank", "Currency", "Partner", "Type", "Comment"
    );
    for record in &visible {
        println!("{}", format_row(record));
    }
    Ok(visible.len())
}

fn format_row(record: &CustomerException) -> String {
    format!(
        "{:>6}  {:<8} {:<10} {:<8} {:<14} {:<8} {}",
        record.id,
        record.company_code,
        record.housebank,
        record.currency,
        record.business_partner,
        record.exception_type,
        record.comment.as_deref().unwrap_or("")
    )
}

/// Creates the exception when the form has no id, updates it otherwise.
pub async fn save_exception(
    api: &dyn DashboardApi,
    form: &ExceptionForm,
) -> Result<(), Box<dyn Error>> {
    let payload = form.validate().map_err(|e| {
        print_cmd_error!(&e.to_string());
        e
    })?;

    let result = match form.id {
        Some(id) => api.update_customer_exception(id, &payload).await,
        None => api.create_customer_exception(&payload).await,
    };
    match result {
        Ok(()) => {
            match form.id {
                Some(id) => print_cmd_success!("Customer exception updated.", "ID: {}", id),
                None => print_cmd_success!(
                    "Customer exception created.",
                    "{} / {}",
                    payload.company_code,
                    payload.business_partner
                ),
            }
            Ok(())
        }
        Err(e) => {
            print_cmd_error!("Failed to save customer exception.", &e.summary());
            Err(e.into())
        }
    }
}

/// Deletes exception `id` once `confirmed`; otherwise nothing is sent.
pub async fn delete_exception(
    api: &dyn DashboardApi,
    id: i64,
    confirmed: bool,
) -> Result<bool, Box<dyn Error>> {
    if !confirmed {
        print_cmd_info!("Delete cancelled.", "Exception {} was kept", id);
        return Ok(false);
    }
    api.delete_customer_exception(id).await.map_err(|e| {
        print_cmd_error!("Failed to delete customer exception.", &e.summary());
        e
    })?;
    print_cmd_success!("Customer exception deleted.", "ID: {}", id);
    Ok(true)
}
