//! Dashboard filters
//!
//! Holds the period, chart and bank-account selections and keeps the region,
//! company-code and bank-account option lists consistent with each other.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Time window for the overview cards and the trend chart.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Period {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Day,
        Period::Week,
        Period::Month,
        Period::Quarter,
        Period::Year,
    ];

    /// The period after this one, wrapping around.
    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

/// Which pair of series the trend chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartMetric {
    #[default]
    AutomatedPercentage,
    CustomersPercentage,
    InvoicesPercentage,
}

impl ChartMetric {
    pub const ALL: [ChartMetric; 3] = [
        ChartMetric::AutomatedPercentage,
        ChartMetric::CustomersPercentage,
        ChartMetric::InvoicesPercentage,
    ];

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartMetric::AutomatedPercentage => "Processed Automatically",
            ChartMetric::CustomersPercentage => "Assigned to Customer Account",
            ChartMetric::InvoicesPercentage => "Invoices Assigned",
        }
    }
}

/// Named grouping of company codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Region {
    Iberia,
    France,
    #[strum(serialize = "NDX")]
    Ndx,
    #[strum(serialize = "UK")]
    Uk,
    #[strum(serialize = "BNX")]
    Bnx,
    GerAus,
    #[strum(serialize = "PLN")]
    Pln,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Iberia,
        Region::France,
        Region::Ndx,
        Region::Uk,
        Region::Bnx,
        Region::GerAus,
        Region::Pln,
    ];
}

/// Region to company-code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMap {
    entries: Vec<(Region, Vec<String>)>,
}

impl RegionMap {
    pub fn new<I, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Region, C)>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(region, codes)| (region, codes.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// Company codes configured for the region, `None` when the region has no entry.
    pub fn codes(&self, region: Region) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, codes)| codes.as_slice())
    }

    pub fn contains(&self, region: Region, company_code: &str) -> bool {
        self.codes(region)
            .is_some_and(|codes| codes.iter().any(|c| c == company_code))
    }
}

impl Default for RegionMap {
    fn default() -> Self {
        Self::new([
            (Region::Iberia, vec!["0040", "0041"]),
            (Region::France, vec!["0043"]),
            (Region::Ndx, vec!["0019", "0022", "0023", "0024"]),
            (Region::Uk, vec!["0014"]),
            (Region::Bnx, vec!["0012", "0018"]),
            (Region::GerAus, vec!["0010", "0033"]),
            (Region::Pln, vec!["0023"]),
        ])
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid bank account '{0}', expected COMPANY|HOUSEBANK|CURRENCY")]
pub struct BankAccountParseError(pub String);

/// Company code + house bank + currency triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BankAccountKey {
    pub company_code: String,
    pub house_bank: String,
    pub currency: String,
}

impl FromStr for BankAccountKey {
    type Err = BankAccountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('|').map(str::trim).collect();
        match parts.as_slice() {
            [company, bank, currency]
                if !company.is_empty() && !bank.is_empty() && !currency.is_empty() =>
            {
                Ok(Self {
                    company_code: company.to_string(),
                    house_bank: bank.to_string(),
                    currency: currency.to_string(),
                })
            }
            _ => Err(BankAccountParseError(s.to_string())),
        }
    }
}

impl Display for BankAccountKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}|{}", self.company_code, self.house_bank, self.currency)
    }
}

/// One entry of the bank-account dropdown, as served by `/api/filter-options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccountOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

impl BankAccountOption {
    pub fn company_code(&self) -> &str {
        self.value.split('|').next().unwrap_or_default()
    }

    pub fn key(&self) -> Option<BankAccountKey> {
        self.value.parse().ok()
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.value
        } else {
            &self.label
        }
    }
}

/// Current filter selections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub period: Period,
    pub chart_period: Period,
    pub chart_metric: ChartMetric,
    pub bank_account: Option<BankAccountKey>,
    pub region: Option<Region>,
    pub company_code: Option<String>,
}

/// Immutable snapshot of the filters attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterQuery {
    pub period: Period,
    pub chart_period: Period,
    pub bank_account: Option<BankAccountKey>,
    pub region: Option<Region>,
    pub company_code: Option<String>,
}

impl FilterQuery {
    /// Query parameters for `/api/overview`.
    pub fn overview_params(&self) -> Vec<(&'static str, String)> {
        self.params(self.period)
    }

    /// Query parameters for `/api/automation-trend`.
    pub fn trend_params(&self) -> Vec<(&'static str, String)> {
        self.params(self.chart_period)
    }

    fn params(&self, period: Period) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("period", period.to_string()),
            (
                "bank_account",
                self.bank_account
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
        ];
        if let Some(region) = self.region {
            params.push(("region", region.to_string()));
        }
        if let Some(code) = &self.company_code {
            params.push(("company_code", code.clone()));
        }
        params
    }
}

/// Options currently offered by the company-code and bank-account dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCandidates {
    pub company_codes: Vec<String>,
    pub bank_accounts: Vec<BankAccountOption>,
}

/// Filter selections plus the option lists derived from them.
#[derive(Debug, Clone)]
pub struct CascadingFilter {
    region_map: RegionMap,
    accounts: Vec<BankAccountOption>,
    state: FilterState,
    candidates: FilterCandidates,
}

impl CascadingFilter {
    pub fn new(region_map: RegionMap, state: FilterState) -> Self {
        let mut filter = Self {
            region_map,
            accounts: Vec::new(),
            state,
            candidates: FilterCandidates::default(),
        };
        filter.reconcile();
        filter
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn candidates(&self) -> &FilterCandidates {
        &self.candidates
    }

    /// Dropdown label of the selected bank account, if one is selected.
    pub fn bank_account_label(&self) -> Option<String> {
        let selected = self.state.bank_account.as_ref()?;
        let label = self
            .accounts
            .iter()
            .find(|o| o.key().as_ref() == Some(selected))
            .map(|o| o.display_label().to_string())
            .unwrap_or_else(|| selected.to_string());
        Some(label)
    }

    pub fn query(&self) -> FilterQuery {
        FilterQuery {
            period: self.state.period,
            chart_period: self.state.chart_period,
            bank_account: self.state.bank_account.clone(),
            region: self.state.region,
            company_code: self.state.company_code.clone(),
        }
    }

    /// Replace the bank-account list, e.g. after `/api/filter-options` answers.
    pub fn set_accounts(&mut self, accounts: Vec<BankAccountOption>) {
        self.accounts = accounts;
        self.reconcile();
    }

    pub fn set_period(&mut self, period: Period) {
        self.state.period = period;
    }

    pub fn set_chart_period(&mut self, period: Period) {
        self.state.chart_period = period;
    }

    pub fn set_chart_metric(&mut self, metric: ChartMetric) {
        self.state.chart_metric = metric;
    }

    pub fn select_region(&mut self, region: Option<Region>) {
        self.state.region = region;
        self.reconcile();
    }

    /// Select a company code. A code outside the selected region clears the
    /// region so the code alone becomes the constraint.
    pub fn select_company_code(&mut self, company_code: Option<String>) {
        if let (Some(region), Some(code)) = (self.state.region, company_code.as_deref()) {
            if self.region_map.codes(region).is_some() && !self.region_map.contains(region, code)
            {
                self.state.region = None;
            }
        }
        self.state.company_code = company_code;
        self.reconcile();
    }

    /// Select a bank account. Returns false, leaving the selection untouched,
    /// when the account is not among the current candidates.
    pub fn select_bank_account(&mut self, account: Option<BankAccountKey>) -> bool {
        if let Some(key) = &account {
            let offered = self
                .candidates
                .bank_accounts
                .iter()
                .any(|option| option.key().as_ref() == Some(key));
            if !offered {
                return false;
            }
        }
        self.state.bank_account = account;
        true
    }

    /// Drop region, company-code and bank-account selections.
    pub fn clear(&mut self) {
        self.state.bank_account = None;
        self.state.region = None;
        self.state.company_code = None;
        self.reconcile();
    }

    pub fn cycle_region(&mut self) {
        let options: Vec<Option<Region>> = std::iter::once(None)
            .chain(Region::ALL.into_iter().map(Some))
            .collect();
        let next = cycle(&options, self.state.region);
        self.select_region(next);
    }

    pub fn cycle_company_code(&mut self) {
        let options: Vec<Option<String>> = std::iter::once(None)
            .chain(self.candidates.company_codes.iter().cloned().map(Some))
            .collect();
        let next = cycle(&options, self.state.company_code.clone());
        self.select_company_code(next);
    }

    pub fn cycle_bank_account(&mut self) {
        let options: Vec<Option<BankAccountKey>> = std::iter::once(None)
            .chain(self.candidates.bank_accounts.iter().filter_map(|o| o.key().map(Some)))
            .collect();
        let next = cycle(&options, self.state.bank_account.clone());
        self.select_bank_account(next);
    }

    /// Whether a company code passes the region and company-code filters.
    pub fn matches_company(&self, company_code: &str) -> bool {
        if let Some(region) = self.state.region {
            if self.region_map.codes(region).is_some()
                && !self.region_map.contains(region, company_code)
            {
                return false;
            }
        }
        self.state
            .company_code
            .as_deref()
            .is_none_or(|selected| selected == company_code)
    }

    /// Candidate option lists for a region / company-code selection.
    pub fn resolve(&self, region: Option<Region>, company_code: Option<&str>) -> FilterCandidates {
        if let Some(codes) = region.and_then(|r| self.region_map.codes(r)) {
            let in_region = |option: &BankAccountOption| {
                codes.iter().any(|code| code == option.company_code())
            };
            let company_codes = distinct_sorted(
                self.accounts
                    .iter()
                    .filter(|o| in_region(o))
                    .map(BankAccountOption::company_code),
            );
            let bank_accounts = self
                .accounts
                .iter()
                .filter(|o| in_region(o))
                .filter(|o| company_code.is_none_or(|code| o.company_code() == code))
                .cloned()
                .collect();
            FilterCandidates {
                company_codes,
                bank_accounts,
            }
        } else if let Some(code) = company_code {
            FilterCandidates {
                company_codes: vec![code.to_string()],
                bank_accounts: self
                    .accounts
                    .iter()
                    .filter(|o| o.company_code() == code)
                    .cloned()
                    .collect(),
            }
        } else {
            FilterCandidates {
                company_codes: distinct_sorted(
                    self.accounts.iter().map(BankAccountOption::company_code),
                ),
                bank_accounts: self.accounts.clone(),
            }
        }
    }

    /// Rebuild the option lists, keeping selections still on offer.
    fn reconcile(&mut self) {
        let region_candidates = self.resolve(self.state.region, None);
        if let Some(code) = &self.state.company_code {
            let region_mapped = self
                .state
                .region
                .is_some_and(|r| self.region_map.codes(r).is_some());
            if region_mapped && !region_candidates.company_codes.contains(code) {
                self.state.company_code = None;
            }
        }

        self.candidates = self.resolve(self.state.region, self.state.company_code.as_deref());

        if let Some(selected) = &self.state.bank_account {
            let still_offered = self
                .candidates
                .bank_accounts
                .iter()
                .any(|option| option.key().as_ref() == Some(selected));
            if !still_offered {
                self.state.bank_account = None;
            }
        }
    }
}

impl Default for CascadingFilter {
    fn default() -> Self {
        Self::new(RegionMap::default(), FilterState::default())
    }
}

fn distinct_sorted<'a>(codes: impl Iterator<Item = &'a str>) -> Vec<String> {
    codes
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Next element after `current`, wrapping to the first. Unknown values restart.
fn cycle<T: Clone + PartialEq>(options: &[T], current: T) -> T {
    let position = options.iter().position(|option| *option == current);
    let next = position.map_or(0, |i| (i + 1) % options.len());
    options[next].clone()
}
