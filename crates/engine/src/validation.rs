//! Payload and query validation.
//!
//! Every check here is pure: a candidate payload goes in, either a normalized
//! draft or the full list of field errors comes out. Nothing is written until
//! a draft exists, so an invalid request never partially applies.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use unicode_normalization::UnicodeNormalization;

use crate::{Money, ParseMoneyError};

pub const DESCRIPTION_MAX_CHARS: usize = 200;
pub const NOTES_MAX_CHARS: usize = 500;
pub const CATEGORY_NAME_MAX_CHARS: usize = 50;
pub const DEFAULT_PAGE_LIMIT: u64 = 100;
pub const MAX_PAGE_LIMIT: u64 = 1000;
/// Largest accepted expense amount or budget (one billion units). Keeps
/// aggregate sums over many rows far from the `i64` cents limit.
pub const MAX_AMOUNT: Money = Money::new(100_000_000_000);

/// A single rejected field with a human readable message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collection of field errors produced by one validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortcut for a failure on one field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|err| err.field == field)
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|err| format!("{}: {}", err.field, err.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// A number as it can appear in a JSON payload: a real number or a numeric
/// string such as `"12.50"`.
#[derive(Clone, Debug, PartialEq)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    fn to_money(&self) -> Result<Money, ParseMoneyError> {
        match self {
            Self::Number(value) => Money::from_f64(*value),
            Self::Text(value) => value.parse(),
        }
    }
}

/// Raw expense payload, as received.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseInput {
    pub description: Option<String>,
    pub amount: Option<NumberInput>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

/// Normalized expense ready for the store.
///
/// `date` is `None` when the payload omitted it: creation falls back to the
/// current day, updates keep the stored one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Money,
    pub category: String,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Raw category payload, as received.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub budget: Option<NumberInput>,
    pub color: Option<String>,
}

/// Normalized category ready for creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub budget: Option<Money>,
    pub color: Option<String>,
}

/// Fields of a category that an update may change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub budget: Option<Money>,
    pub color: Option<String>,
}

/// Inclusive calendar date range. Either bound may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Filters shared by listing and export.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub range: DateRange,
    /// Normalized category name.
    pub category: Option<String>,
}

/// 1-indexed page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Canonical form of a category name: trimmed, NFC, lowercase.
///
/// Used for category identity and for every category reference stored on an
/// expense or used in a filter.
pub fn normalize_category_key(value: &str) -> String {
    value.trim().nfc().collect::<String>().to_lowercase()
}

/// Parses a calendar date from `YYYY-MM-DD` or an ISO 8601 timestamp.
///
/// Timestamps with an offset are converted to UTC before the date is taken.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn amount_message(err: ParseMoneyError) -> &'static str {
    match err {
        ParseMoneyError::TooManyDecimals => "Amount cannot have more than 2 decimal places",
        ParseMoneyError::Overflow => "Amount is too large",
        ParseMoneyError::Empty | ParseMoneyError::Invalid => "Amount must be a positive number",
    }
}

pub fn validate_expense(input: &ExpenseInput) -> Result<ExpenseDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let description = non_blank(input.description.as_deref()).unwrap_or_default();
    if description.is_empty() {
        errors.push("description", "Description is required");
    } else if description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.push("description", "Description cannot exceed 200 characters");
    }

    let amount = match &input.amount {
        None => {
            errors.push("amount", "Amount must be a positive number");
            Money::ZERO
        }
        Some(raw) => match raw.to_money() {
            Ok(amount) if amount > MAX_AMOUNT => {
                errors.push(
                    "amount",
                    format!("Amount cannot exceed {}", MAX_AMOUNT.to_plain_string()),
                );
                Money::ZERO
            }
            Ok(amount) if amount.cents() >= 1 => amount,
            Ok(_) => {
                errors.push("amount", "Amount must be a positive number");
                Money::ZERO
            }
            Err(err) => {
                errors.push("amount", amount_message(err));
                Money::ZERO
            }
        },
    };

    let category = non_blank(input.category.as_deref())
        .map(normalize_category_key)
        .unwrap_or_default();
    if category.is_empty() {
        errors.push("category", "Category is required");
    }

    let date = match non_blank(input.date.as_deref()) {
        None => None,
        Some(raw) => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                errors.push("date", "Date must be a valid ISO 8601 date");
            }
            parsed
        }
    };

    let notes = non_blank(input.notes.as_deref());
    if notes.is_some_and(|n| n.chars().count() > NOTES_MAX_CHARS) {
        errors.push("notes", "Notes cannot exceed 500 characters");
    }

    errors.into_result(|| ExpenseDraft {
        description: description.to_string(),
        amount,
        category,
        date,
        notes: notes.map(ToString::to_string),
    })
}

fn validate_budget(input: Option<&NumberInput>, errors: &mut ValidationErrors) -> Option<Money> {
    let raw = input?;
    match raw.to_money() {
        Ok(budget) if budget > MAX_AMOUNT => {
            errors.push(
                "budget",
                format!("Budget cannot exceed {}", MAX_AMOUNT.to_plain_string()),
            );
            None
        }
        Ok(budget) if !budget.is_negative() => Some(budget),
        Ok(_) => {
            errors.push("budget", "Budget must be a non-negative number");
            None
        }
        Err(ParseMoneyError::TooManyDecimals) => {
            errors.push("budget", "Budget cannot have more than 2 decimal places");
            None
        }
        Err(_) => {
            errors.push("budget", "Budget must be a non-negative number");
            None
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn validate_color(input: Option<&str>, errors: &mut ValidationErrors) -> Option<String> {
    let color = input?.trim();
    if is_hex_color(color) {
        Some(color.to_string())
    } else {
        errors.push("color", "Color must be a valid hex color");
        None
    }
}

pub fn validate_category(input: &CategoryInput) -> Result<CategoryDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let raw_name = non_blank(input.name.as_deref()).unwrap_or_default();
    if raw_name.is_empty() {
        errors.push("name", "Category name is required");
    } else if raw_name.nfc().count() > CATEGORY_NAME_MAX_CHARS {
        // Counted before lowercasing, which may expand some characters.
        errors.push("name", "Category name must be between 1 and 50 characters");
    }
    let name = normalize_category_key(raw_name);

    let budget = validate_budget(input.budget.as_ref(), &mut errors);
    let color = validate_color(input.color.as_deref(), &mut errors);

    errors.into_result(|| CategoryDraft {
        name,
        budget,
        color,
    })
}

/// Validates an update of the category identified by `name`.
///
/// The name is the identity key: a body may repeat it but never change it.
pub fn validate_category_update(
    name: &str,
    input: &CategoryInput,
) -> Result<CategoryPatch, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Some(body_name) = non_blank(input.name.as_deref())
        && normalize_category_key(body_name) != normalize_category_key(name)
    {
        errors.push("name", "Category name cannot be changed");
    }

    let budget = validate_budget(input.budget.as_ref(), &mut errors);
    let color = validate_color(input.color.as_deref(), &mut errors);

    errors.into_result(|| CategoryPatch { budget, color })
}

fn query_date(
    field: &str,
    value: Option<&str>,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let raw = non_blank(value)?;
    let parsed = parse_date(raw);
    if parsed.is_none() {
        errors.push(field, format!("{field} must be a valid date"));
    }
    parsed
}

fn date_range_into(
    start: Option<&str>,
    end: Option<&str>,
    errors: &mut ValidationErrors,
) -> DateRange {
    let range = DateRange {
        start: query_date("startDate", start, errors),
        end: query_date("endDate", end, errors),
    };
    if let (Some(start), Some(end)) = (range.start, range.end)
        && start > end
    {
        errors.push("startDate", "startDate must not be after endDate");
    }
    range
}

/// Validates `startDate`/`endDate` query values.
pub fn date_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let range = date_range_into(start, end, &mut errors);
    errors.into_result(|| range)
}

/// Validates the listing/export filters.
pub fn expense_filter(
    start: Option<&str>,
    end: Option<&str>,
    category: Option<&str>,
) -> Result<ExpenseFilter, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let range = date_range_into(start, end, &mut errors);
    let category = non_blank(category).map(normalize_category_key);
    errors.into_result(|| ExpenseFilter { range, category })
}

fn positive_integer(
    field: &str,
    value: Option<&str>,
    default: u64,
    errors: &mut ValidationErrors,
) -> u64 {
    let Some(raw) = non_blank(value) else {
        return default;
    };
    match raw.parse::<u64>() {
        Ok(n) if n >= 1 => n,
        _ => {
            errors.push(field, format!("{field} must be a positive integer"));
            default
        }
    }
}

/// Validates `page`/`limit` query values.
pub fn page_request(limit: Option<&str>, page: Option<&str>) -> Result<PageRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let limit = positive_integer("limit", limit, DEFAULT_PAGE_LIMIT, &mut errors);
    if limit > MAX_PAGE_LIMIT {
        errors.push("limit", format!("limit must not exceed {MAX_PAGE_LIMIT}"));
    }
    let page = positive_integer("page", page, 1, &mut errors);
    let offset = (page - 1).checked_mul(limit);
    if offset.is_none_or(|offset| i64::try_from(offset).is_err()) {
        errors.push("page", "page is out of range");
    }
    errors.into_result(|| PageRequest { page, limit })
}
