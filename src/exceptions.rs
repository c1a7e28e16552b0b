//! Customer exception editor
//!
//! The add/edit form shared by the dashboard modal and the `exceptions`
//! subcommands, plus the list filter and delete confirmation.

use crate::api::types::{CustomerException, ExceptionPayload, ExceptionType};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FormField {
    #[strum(serialize = "Company code")]
    CompanyCode,
    #[strum(serialize = "House bank")]
    HouseBank,
    #[strum(serialize = "Currency")]
    Currency,
    #[strum(serialize = "Business partner")]
    BusinessPartner,
    #[strum(serialize = "Exception type")]
    ExceptionType,
    #[strum(serialize = "Comment")]
    Comment,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::CompanyCode,
        FormField::HouseBank,
        FormField::Currency,
        FormField::BusinessPartner,
        FormField::ExceptionType,
        FormField::Comment,
    ];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(FormField),
}

/// Field values of one customer exception being added or edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExceptionForm {
    /// `None` while adding
    pub id: Option<i64>,
    pub company_code: String,
    pub house_bank: String,
    pub currency: String,
    pub business_partner: String,
    pub exception_type: Option<ExceptionType>,
    pub comment: String,
}

impl ExceptionForm {
    pub fn from_record(record: &CustomerException) -> Self {
        Self {
            id: Some(record.id),
            company_code: record.company_code.clone(),
            house_bank: record.housebank.clone(),
            currency: record.currency.clone(),
            business_partner: record.business_partner.clone(),
            exception_type: Some(record.exception_type),
            comment: record.comment.clone().unwrap_or_default(),
        }
    }

    /// Check required fields and build the request body.
    pub fn validate(&self) -> Result<ExceptionPayload, ValidationError> {
        let required = |field: FormField, value: &str| {
            let value = value.trim();
            if value.is_empty() {
                Err(ValidationError::Missing(field))
            } else {
                Ok(value.to_string())
            }
        };

        let company_code = required(FormField::CompanyCode, &self.company_code)?;
        let housebank = required(FormField::HouseBank, &self.house_bank)?;
        let currency = required(FormField::Currency, &self.currency)?.to_uppercase();
        let business_partner = required(FormField::BusinessPartner, &self.business_partner)?;
        let exception_type = self
            .exception_type
            .ok_or(ValidationError::Missing(FormField::ExceptionType))?;
        let comment = Some(self.comment.trim().to_string()).filter(|c| !c.is_empty());

        Ok(ExceptionPayload {
            company_code,
            housebank,
            currency,
            business_partner,
            exception_type,
            comment,
        })
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::CompanyCode => self.company_code.clone(),
            FormField::HouseBank => self.house_bank.clone(),
            FormField::Currency => self.currency.clone(),
            FormField::BusinessPartner => self.business_partner.clone(),
            FormField::ExceptionType => self
                .exception_type
                .map(|t| t.to_string())
                .unwrap_or_default(),
            FormField::Comment => self.comment.clone(),
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::CompanyCode => Some(&mut self.company_code),
            FormField::HouseBank => Some(&mut self.house_bank),
            FormField::Currency => Some(&mut self.currency),
            FormField::BusinessPartner => Some(&mut self.business_partner),
            FormField::Comment => Some(&mut self.comment),
            FormField::ExceptionType => None,
        }
    }

    pub fn push_char(&mut self, field: FormField, c: char) {
        if let Some(text) = self.text_mut(field) {
            text.push(c);
        }
    }

    pub fn pop_char(&mut self, field: FormField) {
        match self.text_mut(field) {
            Some(text) => {
                text.pop();
            }
            None => self.exception_type = None,
        }
    }

    /// none -> include -> exclude -> include ...
    pub fn toggle_type(&mut self) {
        self.exception_type = Some(match self.exception_type {
            Some(ExceptionType::Include) => ExceptionType::Exclude,
            _ => ExceptionType::Include,
        });
    }
}

/// Modal add/edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionEditor {
    pub form: ExceptionForm,
    pub focus: FormField,
    /// Waiting for the record to edit
    pub loading: bool,
    /// Waiting for a save to answer
    pub saving: bool,
    pub error: Option<String>,
}

impl ExceptionEditor {
    /// Empty form without an identifier.
    pub fn add() -> Self {
        Self {
            form: ExceptionForm::default(),
            focus: FormField::CompanyCode,
            loading: false,
            saving: false,
            error: None,
        }
    }

    /// Form for an existing record, filled once the record arrives.
    pub fn edit(id: i64) -> Self {
        Self {
            form: ExceptionForm {
                id: Some(id),
                ..Default::default()
            },
            loading: true,
            ..Self::add()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.form.id.is_some()
    }

    /// Populate from a fetched record. Records for another id are ignored.
    pub fn load(&mut self, record: &CustomerException) -> bool {
        if self.form.id != Some(record.id) {
            return false;
        }
        self.form = ExceptionForm::from_record(record);
        self.loading = false;
        true
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn type_char(&mut self, c: char) {
        if self.focus == FormField::ExceptionType {
            self.form.toggle_type();
        } else {
            self.form.push_char(self.focus, c);
        }
    }

    pub fn backspace(&mut self) {
        self.form.pop_char(self.focus);
    }

    /// Validate and mark the editor as saving. Nothing is marked when the
    /// form is incomplete or a previous save is still in flight.
    pub fn submit(&mut self) -> Result<Option<(Option<i64>, ExceptionPayload)>, ValidationError> {
        if self.loading || self.saving {
            return Ok(None);
        }
        let payload = self.form.validate()?;
        self.saving = true;
        self.error = None;
        Ok(Some((self.form.id, payload)))
    }

    pub fn save_failed(&mut self, error: String) {
        self.saving = false;
        self.error = Some(error);
    }
}

/// Case-insensitive substring match over every displayed column.
pub fn matches_query(record: &CustomerException, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    [
        record.company_code.as_str(),
        record.housebank.as_str(),
        record.currency.as_str(),
        record.business_partner.as_str(),
        record.comment.as_deref().unwrap_or_default(),
    ]
    .iter()
    .any(|value| value.to_lowercase().contains(&query))
        || record.exception_type.to_string().contains(&query)
}

pub fn filter_exceptions<'a>(
    records: &'a [CustomerException],
    query: &str,
) -> Vec<&'a CustomerException> {
    records
        .iter()
        .filter(|record| matches_query(record, query))
        .collect()
}

/// Exceptions tab: list filter, cursor and delete confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionListView {
    pub query: String,
    pub editing_query: bool,
    pub selected: usize,
    /// Id waiting for a y/n answer
    pub pending_delete: Option<i64>,
}

impl ExceptionListView {
    pub fn select_next(&mut self, visible: usize) {
        if visible > 0 {
            self.selected = (self.selected + 1).min(visible - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp(&mut self, visible: usize) {
        self.selected = self.selected.min(visible.saturating_sub(1));
    }

    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    /// Answer the confirmation prompt. Returns the id to delete on "yes".
    pub fn confirm_delete(&mut self, confirmed: bool) -> Option<i64> {
        let id = self.pending_delete.take()?;
        confirmed.then_some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> CustomerException {
        CustomerException {
            id,
            company_code: "0010".to_string(),
            housebank: "1050D".to_string(),
            currency: "EUR".to_string(),
            business_partner: "ACME GmbH".to_string(),
            exception_type: ExceptionType::Exclude,
            comment: Some("Pays several invoices at once".to_string()),
        }
    }

    fn filled_form() -> ExceptionForm {
        ExceptionForm::from_record(&record(1))
    }

    #[test]
    fn test_empty_business_partner_is_rejected() {
        let mut form = filled_form();
        form.business_partner = "   ".to_string();
        assert_eq!(
            form.validate(),
            Err(ValidationError::Missing(FormField::BusinessPartner))
        );
        assert_eq!(
            ValidationError::Missing(FormField::BusinessPartner).to_string(),
            "Business partner is required"
        );
    }

    #[test]
    fn test_every_required_field_is_checked() {
        let empty = ExceptionForm::default();
        assert_eq!(
            empty.validate(),
            Err(ValidationError::Missing(FormField::CompanyCode))
        );
        let mut form = filled_form();
        form.exception_type = None;
        assert_eq!(
            form.validate(),
            Err(ValidationError::Missing(FormField::ExceptionType))
        );
    }

    #[test]
    fn test_validate_trims_and_drops_empty_comment() {
        let mut form = filled_form();
        form.currency = " eur ".to_string();
        form.comment = "  ".to_string();
        let payload = form.validate().unwrap();
        assert_eq!(payload.currency, "EUR");
        assert_eq!(payload.comment, None);
    }

    #[test]
    fn test_add_opens_cleared_form() {
        let editor = ExceptionEditor::add();
        assert_eq!(editor.form, ExceptionForm::default());
        assert!(!editor.is_edit());
        assert!(!editor.loading);
    }

    #[test]
    fn test_edit_populates_only_from_matching_record() {
        let mut editor = ExceptionEditor::edit(7);
        assert!(editor.loading);
        assert!(!editor.load(&record(8)));
        assert!(editor.loading);
        assert!(editor.load(&record(7)));
        assert_eq!(editor.form.business_partner, "ACME GmbH");
        assert_eq!(editor.form.id, Some(7));
    }

    #[test]
    fn test_submit_blocks_double_save_and_reopens_on_failure() {
        let mut editor = ExceptionEditor::edit(7);
        assert_eq!(editor.submit(), Ok(None));
        editor.load(&record(7));

        let (id, payload) = editor.submit().unwrap().unwrap();
        assert_eq!(id, Some(7));
        assert_eq!(payload.exception_type, ExceptionType::Exclude);
        assert_eq!(editor.submit(), Ok(None));

        editor.save_failed("HTTP 500: boom".to_string());
        assert!(!editor.saving);
        assert_eq!(editor.error.as_deref(), Some("HTTP 500: boom"));
    }

    #[test]
    fn test_typing_into_fields() {
        let mut editor = ExceptionEditor::add();
        editor.type_char('0');
        editor.type_char('1');
        editor.backspace();
        assert_eq!(editor.form.company_code, "0");

        editor.focus = FormField::ExceptionType;
        editor.type_char(' ');
        assert_eq!(editor.form.exception_type, Some(ExceptionType::Include));
        editor.type_char(' ');
        assert_eq!(editor.form.exception_type, Some(ExceptionType::Exclude));
        editor.focus_next();
        assert_eq!(editor.focus, FormField::Comment);
        editor.focus_next();
        assert_eq!(editor.focus, FormField::CompanyCode);
    }

    #[test]
    fn test_list_filter_is_case_insensitive() {
        let mut other = record(2);
        other.business_partner = "Globex".to_string();
        other.exception_type = ExceptionType::Include;
        other.comment = None;
        let records = vec![record(1), other];

        assert_eq!(filter_exceptions(&records, "acme").len(), 1);
        assert_eq!(filter_exceptions(&records, "INCLUDE")[0].id, 2);
        assert_eq!(filter_exceptions(&records, "1050d").len(), 2);
        assert_eq!(filter_exceptions(&records, "").len(), 2);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut view = ExceptionListView::default();
        assert_eq!(view.confirm_delete(true), None);
        view.request_delete(4);
        assert_eq!(view.confirm_delete(false), None);
        assert_eq!(view.pending_delete, None);
        view.request_delete(4);
        assert_eq!(view.confirm_delete(true), Some(4));
    }
}
