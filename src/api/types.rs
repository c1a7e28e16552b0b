//! Response and request payloads of the CashWeb API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accepts `null` where a number or string is expected.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `/api/overview`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewMetrics {
    pub period: String,
    pub total_payments: u64,
    pub total_received: f64,
    pub automation_percentage: f64,
    pub automated_count: u64,
    pub manual_count: u64,
    pub unassigned_count: u64,
    pub unassigned_value: f64,
    pub assigned_percentage: f64,
    pub assigned_count: u64,
    pub total_invoices_assigned: u64,
    pub total_assigned_value: f64,
    pub value_assigned_percentage: f64,
    pub avg_auto_time_minutes: f64,
    pub avg_manual_time_minutes: f64,
}

/// `/api/automation-trend`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub paco_percentages: Vec<f64>,
    pub fran_percentages: Vec<f64>,
    pub paco_customers_percentages: Vec<f64>,
    pub fran_customers_percentages: Vec<f64>,
    pub paco_invoices: Vec<f64>,
    pub fran_invoices: Vec<f64>,
    pub payment_counts: Vec<u64>,
    pub paco_payment_counts: Vec<u64>,
    pub fran_payment_counts: Vec<u64>,
}

/// Processing state of one bank account today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    Done,
    InProcess,
    NotStarted,
    Unknown,
}

/// One card of the company-status grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyStatus {
    pub bank_account: String,
    pub company_code: String,
    pub housebank: String,
    pub currency: String,
    pub status: String,
    pub processed: u64,
    pub pending: u64,
    pub total: u64,
    pub percentage: f64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl CompanyStatus {
    pub fn processing_status(&self) -> ProcessingStatus {
        match self.status.to_lowercase().as_str() {
            "done" => ProcessingStatus::Done,
            "in process" | "in-process" => ProcessingStatus::InProcess,
            "not started" | "not-started" => ProcessingStatus::NotStarted,
            _ => ProcessingStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CompanyStatusResponse {
    pub company_statuses: Vec<CompanyStatus>,
}

/// One row of the recent-transactions list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    #[serde(deserialize_with = "null_as_default")]
    pub payment_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub business_partner: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(rename = "match", deserialize_with = "null_as_default")]
    pub match_flag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub docnumbers: String,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_date: String,
    pub company_code: String,
    pub housebank: String,
    pub currency: String,
}

impl Transaction {
    /// Matched and posted without manual intervention.
    pub fn is_automated(&self) -> bool {
        self.match_flag.eq_ignore_ascii_case("YES")
    }

    /// `Payment 123 - 0010-1050D-EUR - BP42`
    pub fn description(&self) -> String {
        let account = format!("{}-{}-{}", self.company_code, self.housebank, self.currency);
        let partner = self.business_partner.trim();
        if partner.is_empty() || partner.eq_ignore_ascii_case("nan") {
            format!("Payment {} - {}", self.payment_number, account)
        } else {
            format!("Payment {} - {} - {}", self.payment_number, account, partner)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FilterOptionsResponse {
    pub bank_accounts: Vec<crate::filters::BankAccountOption>,
}

/// Include or exclude a business partner from automatic matching.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExceptionType {
    #[serde(alias = "Include", alias = "INCLUDE")]
    Include,
    #[serde(alias = "Exclude", alias = "EXCLUDE")]
    Exclude,
}

/// Stored customer exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerException {
    pub id: i64,
    pub company_code: String,
    #[serde(alias = "house_bank")]
    pub housebank: String,
    pub currency: String,
    pub business_partner: String,
    pub exception_type: ExceptionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Body of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionPayload {
    pub company_code: String,
    pub housebank: String,
    pub currency: String,
    pub business_partner: String,
    pub exception_type: ExceptionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// The list endpoint answers either with a bare array or wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ExceptionListResponse {
    Bare(Vec<CustomerException>),
    Wrapped { exceptions: Vec<CustomerException> },
}

impl From<ExceptionListResponse> for Vec<CustomerException> {
    fn from(response: ExceptionListResponse) -> Self {
        match response {
            ExceptionListResponse::Bare(list) => list,
            ExceptionListResponse::Wrapped { exceptions } => exceptions,
        }
    }
}

/// Summary endpoints without a fixed schema, shown as key/value panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsightKind {
    Summary,
    Transactions,
    Exceptions,
    RemittanceInsights,
    MonthEndSummary,
    AutomationEfficiency,
}

impl InsightKind {
    pub const ALL: [InsightKind; 6] = [
        InsightKind::AutomationEfficiency,
        InsightKind::Exceptions,
        InsightKind::RemittanceInsights,
        InsightKind::MonthEndSummary,
        InsightKind::Summary,
        InsightKind::Transactions,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            InsightKind::Summary => "api/summary",
            InsightKind::Transactions => "api/transactions",
            InsightKind::Exceptions => "api/exceptions",
            InsightKind::RemittanceInsights => "api/remittance-insights",
            InsightKind::MonthEndSummary => "api/month-end-summary",
            InsightKind::AutomationEfficiency => "api/automation-efficiency",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            InsightKind::Summary => "Summary",
            InsightKind::Transactions => "Transactions",
            InsightKind::Exceptions => "Exceptions",
            InsightKind::RemittanceInsights => "Remittance Insights",
            InsightKind::MonthEndSummary => "Month-End Summary",
            InsightKind::AutomationEfficiency => "Automation Efficiency",
        }
    }
}

/// Flattened key/value view of an arbitrary JSON document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InsightReport {
    pub entries: Vec<(String, String)>,
}

impl InsightReport {
    pub fn from_value(value: &Value) -> Self {
        let mut entries = Vec::new();
        flatten(None, value, &mut entries);
        Self { entries }
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut Vec<(String, String)>) {
    let key = |name: &str| match prefix {
        Some(p) => format!("{p}.{name}"),
        None => name.to_string(),
    };
    match value {
        Value::Object(map) => {
            for (name, nested) in map {
                flatten(Some(&key(name)), nested, out);
            }
        }
        Value::Array(items) => {
            out.push((prefix.unwrap_or("items").to_string(), format!("{} items", items.len())));
        }
        Value::String(s) => out.push((prefix.unwrap_or("value").to_string(), s.clone())),
        Value::Null => out.push((prefix.unwrap_or("value").to_string(), "-".to_string())),
        other => out.push((prefix.unwrap_or("value").to_string(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overview_tolerates_missing_fields() {
        let overview: OverviewMetrics =
            serde_json::from_value(json!({"total_payments": 12, "automation_percentage": 75.0}))
                .unwrap();
        assert_eq!(overview.total_payments, 12);
        assert_eq!(overview.total_invoices_assigned, 0);
    }

    #[test]
    fn test_transaction_match_flag_and_description() {
        let tx: Transaction = serde_json::from_value(json!({
            "payment_number": "4711",
            "business_partner": null,
            "amount": -120.5,
            "match": "YES",
            "payment_date": "2025-03-04",
            "company_code": "0010",
            "housebank": "1050D",
            "currency": "EUR"
        }))
        .unwrap();
        assert!(tx.is_automated());
        assert_eq!(tx.description(), "Payment 4711 - 0010-1050D-EUR");
    }

    #[test]
    fn test_company_status_kinds() {
        let mut status = CompanyStatus {
            status: "In Process".to_string(),
            ..Default::default()
        };
        assert_eq!(status.processing_status(), ProcessingStatus::InProcess);
        status.status = "Done".to_string();
        assert_eq!(status.processing_status(), ProcessingStatus::Done);
    }

    #[test]
    fn test_exception_list_shapes() {
        let record = json!({
            "id": 7,
            "company_code": "0010",
            "house_bank": "1050D",
            "currency": "EUR",
            "business_partner": "BP1",
            "exception_type": "Exclude"
        });
        let bare: ExceptionListResponse =
            serde_json::from_value(json!([record.clone()])).unwrap();
        let wrapped: ExceptionListResponse =
            serde_json::from_value(json!({"exceptions": [record]})).unwrap();

        let bare: Vec<CustomerException> = bare.into();
        let wrapped: Vec<CustomerException> = wrapped.into();
        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].housebank, "1050D");
        assert_eq!(bare[0].exception_type, ExceptionType::Exclude);
    }

    #[test]
    fn test_insight_report_flattens_nested_objects() {
        let report = InsightReport::from_value(&json!({
            "efficiency": {"paco": 81.5, "fran": null},
            "top_partners": ["A", "B"],
            "status": "ok"
        }));
        assert_eq!(report.get("efficiency.paco"), Some("81.5"));
        assert_eq!(report.get("efficiency.fran"), Some("-"));
        assert_eq!(report.get("top_partners"), Some("2 items"));
        assert_eq!(report.get("status"), Some("ok"));
    }
}
