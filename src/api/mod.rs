use crate::api::error::ApiError;
use crate::api::types::{
    CompanyStatus, CustomerException, ExceptionPayload, InsightKind, InsightReport,
    OverviewMetrics, Transaction, TrendSeries,
};
use crate::filters::{BankAccountOption, FilterQuery};

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub mod types;

#[cfg(test)]
use mockall::{automock, predicate::*};

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// Base URL requests are sent to.
    fn base_url(&self) -> &str;

    /// Bank accounts known to the back office, for the filter dropdowns.
    async fn filter_options(&self) -> Result<Vec<BankAccountOption>, ApiError>;

    /// Headline metrics for the overview cards.
    async fn overview(&self, query: &FilterQuery) -> Result<OverviewMetrics, ApiError>;

    /// Daily series for the trend chart.
    async fn automation_trend(&self, query: &FilterQuery) -> Result<TrendSeries, ApiError>;

    /// Today's processing state per bank account.
    async fn company_status(&self) -> Result<Vec<CompanyStatus>, ApiError>;

    /// Latest payments from today's live files.
    async fn recent_transactions(&self) -> Result<Vec<Transaction>, ApiError>;

    /// All customer exceptions.
    async fn customer_exceptions(&self) -> Result<Vec<CustomerException>, ApiError>;

    /// Creates a customer exception.
    async fn create_customer_exception(&self, payload: &ExceptionPayload)
    -> Result<(), ApiError>;

    /// Replaces the customer exception with the given id.
    async fn update_customer_exception(
        &self,
        id: i64,
        payload: &ExceptionPayload,
    ) -> Result<(), ApiError>;

    /// Deletes the customer exception with the given id.
    async fn delete_customer_exception(&self, id: i64) -> Result<(), ApiError>;

    /// One of the schemaless summary endpoints.
    async fn insight(
        &self,
        kind: InsightKind,
        query: &FilterQuery,
    ) -> Result<InsightReport, ApiError>;
}
