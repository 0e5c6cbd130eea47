use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use super::domain::{Item, Receipt, ReceiptSubmission};
use super::money::{Amount, AmountError};

static DATE_PATTERN: OnceLock<Regex> = OnceLock::new();
static TIME_PATTERN: OnceLock<Regex> = OnceLock::new();

// Syntactic only and anchored at the start: month 19, day 00 and trailing text pass, day 30 and
// 31 do not.
fn date_pattern() -> &'static Regex {
    DATE_PATTERN
        .get_or_init(|| Regex::new(r"^[0-9]{4}-[0-1][1-9]-[0-2][0-9]").expect("valid regex"))
}

fn time_pattern() -> &'static Regex {
    TIME_PATTERN.get_or_init(|| Regex::new(r"^[0-2][0-9]:[0-5][0-9]").expect("valid regex"))
}

/// How far purchase dates are checked beyond the `YYYY-MM-DD` pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateValidation {
    /// Pattern match only.
    #[default]
    Lenient,
    /// Pattern match plus a real calendar date.
    Strict,
}

impl DateValidation {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" | "loose" => Some(Self::Lenient),
            "strict" | "calendar" => Some(Self::Strict),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationConfig {
    pub date_validation: DateValidation,
}

/// A single reason a submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("missing required field '{field}'")]
    MissingField { field: String },
    #[error("invalid purchase date format '{value}', expected YYYY-MM-DD")]
    InvalidDateFormat { value: String },
    #[error("purchase date '{value}' is not a calendar date")]
    InvalidCalendarDate { value: String },
    #[error("invalid purchase time format '{value}', expected HH:MM")]
    InvalidTimeFormat { value: String },
    #[error("field '{field}' is not a valid amount: {source}")]
    UnparsableNumber {
        field: String,
        #[source]
        source: AmountError,
    },
    #[error("total {total} does not match item prices sum {items_sum}")]
    TotalMismatch { total: Amount, items_sum: Amount },
    #[error("total {total} does not match item prices sum, which exceeds the largest amount")]
    ItemsSumOverflow { total: Amount },
}

impl ValidationFailure {
    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationFailure::MissingField { .. } => "missing_field",
            ValidationFailure::InvalidDateFormat { .. } => "invalid_date_format",
            ValidationFailure::InvalidCalendarDate { .. } => "invalid_calendar_date",
            ValidationFailure::InvalidTimeFormat { .. } => "invalid_time_format",
            ValidationFailure::UnparsableNumber { .. } => "unparsable_number",
            ValidationFailure::TotalMismatch { .. }
            | ValidationFailure::ItemsSumOverflow { .. } => "total_mismatch",
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationFailure::MissingField { field }
            | ValidationFailure::UnparsableNumber { field, .. } => Some(field),
            ValidationFailure::InvalidDateFormat { .. }
            | ValidationFailure::InvalidCalendarDate { .. } => Some("purchaseDate"),
            ValidationFailure::InvalidTimeFormat { .. } => Some("purchaseTime"),
            ValidationFailure::TotalMismatch { .. }
            | ValidationFailure::ItemsSumOverflow { .. } => Some("total"),
        }
    }

    pub fn view(&self) -> ValidationFailureView {
        ValidationFailureView {
            code: self.code(),
            field: self.field().map(str::to_string),
            message: self.to_string(),
        }
    }
}

/// Serializable form of a failure for HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailureView {
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// Every failure collected for one submission. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationFailure>);

impl ValidationErrors {
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.0
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|failure| failure.code() == code)
    }

    pub fn views(&self) -> Vec<ValidationFailureView> {
        self.0.iter().map(ValidationFailure::view).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, failure) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Structural and numeric checks for submitted receipts. Failures accumulate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, submission: ReceiptSubmission) -> Result<Receipt, ValidationErrors> {
        let mut failures = Vec::new();

        if submission.retailer.is_empty() {
            failures.push(ValidationFailure::MissingField {
                field: "retailer".to_string(),
            });
        }

        self.check_date(&submission.purchase_date, &mut failures);

        if !time_pattern().is_match(&submission.purchase_time) {
            failures.push(ValidationFailure::InvalidTimeFormat {
                value: submission.purchase_time.clone(),
            });
        }

        let total = parse_amount("total", &submission.total, &mut failures);

        let mut items = Vec::with_capacity(submission.items.len());
        let mut all_prices_parsed = true;
        for (index, item) in submission.items.into_iter().enumerate() {
            let field = format!("items[{index}].price");
            match parse_amount(&field, &item.price, &mut failures) {
                Some(price) => items.push(Item {
                    short_description: item.short_description,
                    price,
                }),
                None => all_prices_parsed = false,
            }
        }

        if let (Some(total), true) = (total, all_prices_parsed) {
            match Amount::checked_sum(items.iter().map(Item::price)) {
                Some(items_sum) if items_sum == total => {}
                Some(items_sum) => {
                    failures.push(ValidationFailure::TotalMismatch { total, items_sum });
                }
                None => failures.push(ValidationFailure::ItemsSumOverflow { total }),
            }
        }

        match total {
            Some(total) if failures.is_empty() => Ok(Receipt {
                retailer: submission.retailer,
                purchase_date: submission.purchase_date,
                purchase_time: submission.purchase_time,
                items,
                total,
            }),
            _ => Err(ValidationErrors(failures)),
        }
    }

    fn check_date(&self, value: &str, failures: &mut Vec<ValidationFailure>) {
        let Some(date) = date_pattern().find(value) else {
            failures.push(ValidationFailure::InvalidDateFormat {
                value: value.to_string(),
            });
            return;
        };

        if self.config.date_validation == DateValidation::Strict
            && NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d").is_err()
        {
            failures.push(ValidationFailure::InvalidCalendarDate {
                value: value.to_string(),
            });
        }
    }
}

fn parse_amount(field: &str, raw: &str, failures: &mut Vec<ValidationFailure>) -> Option<Amount> {
    match raw.parse::<Amount>() {
        Ok(amount) => Some(amount),
        Err(AmountError::Empty) => {
            failures.push(ValidationFailure::MissingField {
                field: field.to_string(),
            });
            None
        }
        Err(source) => {
            failures.push(ValidationFailure::UnparsableNumber {
                field: field.to_string(),
                source,
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipts::domain::ItemSubmission;

    fn item(description: &str, price: &str) -> ItemSubmission {
        ItemSubmission {
            short_description: description.to_string(),
            price: price.to_string(),
        }
    }

    fn submission() -> ReceiptSubmission {
        ReceiptSubmission {
            retailer: "Target".to_string(),
            purchase_date: "2022-01-01".to_string(),
            purchase_time: "13:01".to_string(),
            items: vec![item("Mountain Dew 12PK", "6.49"), item("Emils Cheese Pizza", "12.25")],
            total: "18.74".to_string(),
        }
    }

    fn codes(errors: &ValidationErrors) -> Vec<&'static str> {
        errors.failures().iter().map(ValidationFailure::code).collect()
    }

    #[test]
    fn accepts_consistent_receipt() {
        let receipt = Validator::default()
            .validate(submission())
            .expect("receipt is valid");
        assert_eq!(receipt.total(), Amount::from_cents(1874));
        assert_eq!(receipt.items().len(), 2);
        assert_eq!(receipt.purchase_day(), 1);
        assert_eq!(receipt.purchase_hour(), 13);
    }

    #[test]
    fn sums_that_drift_in_binary_floating_point_still_match() {
        let mut raw = submission();
        raw.items = vec![item("a", "0.10"), item("b", "0.20")];
        raw.total = "0.30".to_string();
        assert!(Validator::default().validate(raw).is_ok());
    }

    #[test]
    fn accepts_receipt_without_items_when_total_is_zero() {
        let mut raw = submission();
        raw.items.clear();
        raw.total = "0.00".to_string();
        assert!(Validator::default().validate(raw).is_ok());
    }

    #[test]
    fn date_pattern_is_loose() {
        let validator = Validator::default();
        for date in ["2022-19-01", "2022-01-00", "2022-02-29", "2022-01-01x", "2022-01-01T10:00"] {
            let mut raw = submission();
            raw.purchase_date = date.to_string();
            assert!(validator.validate(raw).is_ok(), "{date} should pass");
        }
        for date in ["2022-01-31", "2022-10-01", "22-01-01", "2022/01/01", " 2022-01-01"] {
            let mut raw = submission();
            raw.purchase_date = date.to_string();
            let errors = validator.validate(raw).expect_err("date rejected");
            assert_eq!(codes(&errors), vec!["invalid_date_format"], "{date}");
        }
    }

    #[test]
    fn strict_dates_require_real_calendar_days() {
        let validator = Validator::new(ValidationConfig {
            date_validation: DateValidation::Strict,
        });
        let mut raw = submission();
        raw.purchase_date = "2023-02-29".to_string();
        let errors = validator.validate(raw).expect_err("not a leap year");
        assert_eq!(codes(&errors), vec!["invalid_calendar_date"]);

        let mut raw = submission();
        raw.purchase_date = "2024-02-29".to_string();
        assert!(validator.validate(raw).is_ok());

        // only the matched prefix is checked against the calendar
        let mut raw = submission();
        raw.purchase_date = "2024-02-29T08:00".to_string();
        assert!(validator.validate(raw).is_ok());

        let mut raw = submission();
        raw.purchase_date = "2023-02-29T08:00".to_string();
        let errors = validator.validate(raw).expect_err("not a leap year");
        assert_eq!(codes(&errors), vec!["invalid_calendar_date"]);
    }

    #[test]
    fn time_pattern_accepts_hours_up_to_29() {
        let validator = Validator::default();
        for time in ["29:59", "14:30:00", "12:00pm"] {
            let mut raw = submission();
            raw.purchase_time = time.to_string();
            assert!(validator.validate(raw).is_ok(), "{time} should pass");
        }

        for time in ["30:00", "12:60", "1:00", "T12:00"] {
            let mut raw = submission();
            raw.purchase_time = time.to_string();
            let errors = validator.validate(raw).expect_err("time rejected");
            assert_eq!(codes(&errors), vec!["invalid_time_format"], "{time}");
        }
    }

    #[test]
    fn reports_total_mismatch() {
        let mut raw = submission();
        raw.total = "18.75".to_string();
        let errors = Validator::default().validate(raw).expect_err("mismatch");
        assert_eq!(
            errors.failures(),
            &[ValidationFailure::TotalMismatch {
                total: Amount::from_cents(1875),
                items_sum: Amount::from_cents(1874),
            }]
        );
    }

    #[test]
    fn item_sums_past_the_largest_amount_never_match() {
        let mut raw = submission();
        raw.items = vec![
            item("a", "184467440737095516.15"),
            item("b", "184467440737095516.15"),
        ];
        raw.total = "184467440737095516.15".to_string();
        let errors = Validator::default().validate(raw).expect_err("sum overflows");
        assert_eq!(
            errors.failures(),
            &[ValidationFailure::ItemsSumOverflow {
                total: Amount::from_cents(u64::MAX),
            }]
        );
        assert_eq!(codes(&errors), vec!["total_mismatch"]);
    }

    #[test]
    fn unparsable_price_is_reported_instead_of_mismatch() {
        let mut raw = submission();
        raw.items[1].price = "twelve".to_string();
        let errors = Validator::default().validate(raw).expect_err("bad price");
        assert_eq!(codes(&errors), vec!["unparsable_number"]);
        assert_eq!(errors.failures()[0].field(), Some("items[1].price"));
    }

    #[test]
    fn accumulates_every_failure() {
        let raw = ReceiptSubmission {
            retailer: String::new(),
            purchase_date: "01/01/2022".to_string(),
            purchase_time: "1pm".to_string(),
            items: vec![item("Gum", "1.00")],
            total: "2.00".to_string(),
        };
        let errors = Validator::default().validate(raw).expect_err("rejected");
        assert_eq!(
            codes(&errors),
            vec![
                "missing_field",
                "invalid_date_format",
                "invalid_time_format",
                "total_mismatch"
            ]
        );
        let message = errors.to_string();
        assert!(message.contains("retailer"));
        assert_eq!(message.matches("; ").count(), 3);
    }

    #[test]
    fn whitespace_retailer_is_present() {
        let mut raw = submission();
        raw.retailer = " ".to_string();
        let receipt = Validator::default().validate(raw).expect("retailer is not empty");
        assert_eq!(receipt.retailer(), " ");
    }

    #[test]
    fn missing_total_is_a_missing_field() {
        let mut raw = submission();
        raw.total.clear();
        let errors = Validator::default().validate(raw).expect_err("no total");
        assert_eq!(codes(&errors), vec!["missing_field"]);
        assert_eq!(errors.failures()[0].field(), Some("total"));
    }
}
