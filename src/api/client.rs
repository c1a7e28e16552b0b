//! CashWeb API Client
//!
//! A reqwest client for the CashWeb REST API. Every endpoint answers JSON on
//! success and `{"error": "..."}` on failure.

use crate::api::DashboardApi;
use crate::api::error::ApiError;
use crate::api::types::{
    CompanyStatus, CompanyStatusResponse, CustomerException, ExceptionListResponse,
    ExceptionPayload, FilterOptionsResponse, InsightKind, InsightReport, OverviewMetrics,
    Transaction, TransactionsResponse, TrendSeries,
};
use crate::consts::cli_consts::http;
use crate::filters::{BankAccountOption, FilterQuery};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

// Build timestamp in milliseconds since epoch
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("cashweb/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn exception_endpoint(id: i64) -> String {
        let id = id.to_string();
        format!("api/customer-exceptions/{}", urlencoding::encode(&id))
    }

    /// Current epoch millis, appended to live endpoints so proxies never cache them.
    fn cache_buster() -> (&'static str, String) {
        ("_", chrono::Utc::now().timestamp_millis().to_string())
    }

    fn with_headers(request: RequestBuilder) -> RequestBuilder {
        request
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .header("Accept", "application/json")
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        log::debug!("GET {} {:?}", url, params);
        let response = Self::with_headers(self.client.get(&url).query(params))
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        Self::decode_response(response).await
    }

    async fn send_json_no_response<B: Serialize + ?Sized>(
        &self,
        request: RequestBuilder,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = Self::with_headers(request).json(body).send().await?;
        Self::handle_response_status(response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DashboardApi for ApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn filter_options(&self) -> Result<Vec<BankAccountOption>, ApiError> {
        let response: FilterOptionsResponse = self.get_request("api/filter-options", &[]).await?;
        Ok(response.bank_accounts)
    }

    async fn overview(&self, query: &FilterQuery) -> Result<OverviewMetrics, ApiError> {
        self.get_request("api/overview", &query.overview_params())
            .await
    }

    async fn automation_trend(&self, query: &FilterQuery) -> Result<TrendSeries, ApiError> {
        self.get_request("api/automation-trend", &query.trend_params())
            .await
    }

    async fn company_status(&self) -> Result<Vec<CompanyStatus>, ApiError> {
        let response: CompanyStatusResponse = self
            .get_request("api/company-status", &[Self::cache_buster()])
            .await?;
        Ok(response.company_statuses)
    }

    async fn recent_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        let response: TransactionsResponse = self
            .get_request("api/recent-transactions", &[Self::cache_buster()])
            .await?;
        Ok(response.transactions)
    }

    async fn customer_exceptions(&self) -> Result<Vec<CustomerException>, ApiError> {
        let response: ExceptionListResponse =
            self.get_request("api/customer-exceptions", &[]).await?;
        Ok(response.into())
    }

    async fn create_customer_exception(
        &self,
        payload: &ExceptionPayload,
    ) -> Result<(), ApiError> {
        let url = self.build_url("api/customer-exceptions");
        log::debug!("POST {}", url);
        self.send_json_no_response(self.client.post(&url), payload)
            .await
    }

    async fn update_customer_exception(
        &self,
        id: i64,
        payload: &ExceptionPayload,
    ) -> Result<(), ApiError> {
        let url = self.build_url(&Self::exception_endpoint(id));
        log::debug!("PUT {}", url);
        self.send_json_no_response(self.client.put(&url), payload)
            .await
    }

    async fn delete_customer_exception(&self, id: i64) -> Result<(), ApiError> {
        let url = self.build_url(&Self::exception_endpoint(id));
        log::debug!("DELETE {}", url);
        let response = Self::with_headers(self.client.delete(&url)).send().await?;
        Self::handle_response_status(response).await?;
        Ok(())
    }

    async fn insight(
        &self,
        kind: InsightKind,
        query: &FilterQuery,
    ) -> Result<InsightReport, ApiError> {
        let params = [("period", query.period.to_string())];
        let value: serde_json::Value = self.get_request(kind.endpoint(), &params).await?;
        Ok(InsightReport::from_value(&value))
    }
}

#[cfg(test)]
/// These are ignored by default since they require a running CashWeb API.
mod live_api_tests {
    use super::*;
    use crate::environment::Environment;

    fn client() -> ApiClient {
        ApiClient::new(Environment::Local.api_url()).unwrap()
    }

    #[tokio::test]
    #[ignore] // This test requires a live API instance.
    /// Should list the bank accounts for the filters.
    async fn test_filter_options() {
        match client().filter_options().await {
            Ok(accounts) => println!("Got {} bank accounts", accounts.len()),
            Err(e) => panic!("Failed to load filter options: {}", e),
        }
    }

    #[tokio::test]
    #[ignore] // This test requires a live API instance.
    /// Should return overview metrics for the default filters.
    async fn test_overview() {
        match client().overview(&FilterQuery::default()).await {
            Ok(overview) => println!("Overview: {:?}", overview),
            Err(e) => panic!("Failed to load overview: {}", e),
        }
    }

    #[tokio::test]
    #[ignore] // This test requires a live API instance.
    /// Should return today's company status cards.
    async fn test_company_status() {
        match client().company_status().await {
            Ok(statuses) => println!("Got {} status cards", statuses.len()),
            Err(e) => panic!("Failed to load company status: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_without_double_slashes() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(
            client.build_url("/api/overview"),
            "http://localhost:5000/api/overview"
        );
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_exception_endpoint_includes_id() {
        assert_eq!(
            ApiClient::exception_endpoint(42),
            "api/customer-exceptions/42"
        );
    }

    #[tokio::test]
    /// An unreachable API surfaces as a transport error, not a panic.
    async fn test_unreachable_api_is_transport_error() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let result = client.company_status().await;
        assert!(matches!(result, Err(ApiError::Reqwest(_))));
    }
}
