//! Declarative input validation.
//!
//! Each operation declares a [`Schema`]: a fixed list of [`FieldRule`]s
//! describing the type, presence and range constraints of its input fields.
//! Validating a JSON document against a schema either yields the typed field
//! values ([`ValidatedFields`]) or the full list of [`ValidationIssue`]s, one
//! per offending field, so clients can fix every problem in one round trip.
//!
//! ```
//! use bookstore_core::validation::{FieldRule, Schema};
//! use serde_json::json;
//!
//! const SCHEMA: Schema = Schema::new(&[
//!     FieldRule::string("productId").non_empty(),
//!     FieldRule::integer("quantity").min(1),
//! ]);
//!
//! assert!(SCHEMA.validate(&json!({"productId": "b1", "quantity": 2})).is_ok());
//!
//! let errors = SCHEMA.validate(&json!({"quantity": 0})).unwrap_err();
//! assert_eq!(errors.issues().len(), 2);
//! ```

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Number, Value};

/// Machine-readable classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// The field is absent or null.
    Required,
    /// The field has the wrong JSON type.
    InvalidType,
    /// The value is below the allowed minimum (or an empty string).
    TooSmall,
    /// The value is above the allowed maximum.
    TooBig,
    /// The request body is not a JSON object.
    InvalidBody,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Name of the offending field; empty for whole-document problems.
    pub field: String,
    pub code: IssueCode,
    pub message: String,
}

impl ValidationIssue {
    /// Create an issue for a named field.
    #[must_use]
    pub fn new(field: impl Into<String>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    /// Create an issue describing an unusable request body.
    #[must_use]
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::new("", IssueCode::InvalidBody, message)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// A non-empty collection of validation issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationIssue>);

impl ValidationErrors {
    /// Errors consisting of one issue.
    #[must_use]
    pub fn single(issue: ValidationIssue) -> Self {
        Self(vec![issue])
    }

    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    /// Returns true if any issue concerns `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|issue| issue.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid input")?;
        for (i, issue) in self.0.iter().enumerate() {
            f.write_str(if i == 0 { ": " } else { "; " })?;
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Type and range constraints for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// A JSON string, optionally required to be non-empty.
    String { non_empty: bool },
    /// A JSON number with no fractional part, within `[min, max]`.
    Integer { min: i64, max: i64 },
    /// Any JSON number, optionally bounded below.
    Number { min: Option<Decimal>, max: Option<Decimal> },
}

/// Declarative rule for a single required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    name: &'static str,
    kind: FieldKind,
}

impl FieldRule {
    /// A required string field.
    #[must_use]
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String { non_empty: false },
        }
    }

    /// A required integer field, bounded to the `u32` range by default.
    #[must_use]
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer {
                min: 0,
                max: u32::MAX as i64,
            },
        }
    }

    /// A required numeric field.
    #[must_use]
    pub const fn number(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Number {
                min: None,
                max: None,
            },
        }
    }

    /// Require a string field to contain at least one character.
    #[must_use]
    pub const fn non_empty(mut self) -> Self {
        if let FieldKind::String { .. } = self.kind {
            self.kind = FieldKind::String { non_empty: true };
        }
        self
    }

    /// Lower bound for an integer field.
    #[must_use]
    pub const fn min(mut self, min: i64) -> Self {
        if let FieldKind::Integer { max, .. } = self.kind {
            self.kind = FieldKind::Integer { min, max };
        }
        self
    }

    /// Inclusive bounds for a numeric field.
    #[must_use]
    pub const fn range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        if let FieldKind::Number { .. } = self.kind {
            self.kind = FieldKind::Number { min, max };
        }
        self
    }

    fn check(&self, value: Option<&Value>) -> Result<FieldValue, ValidationIssue> {
        let value = match value {
            None | Some(Value::Null) => {
                return Err(self.issue(IssueCode::Required, "is required"));
            }
            Some(value) => value,
        };

        match self.kind {
            FieldKind::String { non_empty } => {
                let Value::String(s) = value else {
                    return Err(self.issue(IssueCode::InvalidType, "expected a string"));
                };
                if non_empty && s.is_empty() {
                    return Err(self.issue(IssueCode::TooSmall, "must not be empty"));
                }
                Ok(FieldValue::String(s.clone()))
            }
            FieldKind::Integer { min, max } => {
                let Value::Number(n) = value else {
                    return Err(self.issue(IssueCode::InvalidType, "expected an integer"));
                };
                let n = integer_value(n)
                    .ok_or_else(|| self.issue(IssueCode::InvalidType, "expected an integer"))?;
                if n < i128::from(min) {
                    return Err(self.issue(
                        IssueCode::TooSmall,
                        format!("must be greater than or equal to {min}"),
                    ));
                }
                if n > i128::from(max) {
                    return Err(self.issue(
                        IssueCode::TooBig,
                        format!("must be less than or equal to {max}"),
                    ));
                }
                // Bounds above fit in i64
                i64::try_from(n)
                    .map(FieldValue::Integer)
                    .map_err(|_| self.issue(IssueCode::TooBig, "is out of range"))
            }
            FieldKind::Number { min, max } => {
                let Value::Number(n) = value else {
                    return Err(self.issue(IssueCode::InvalidType, "expected a number"));
                };
                let n = decimal_value(n)
                    .ok_or_else(|| self.issue(IssueCode::TooBig, "is out of range"))?;
                if let Some(min) = min
                    && n < min
                {
                    return Err(self.issue(
                        IssueCode::TooSmall,
                        format!("must be greater than or equal to {min}"),
                    ));
                }
                if let Some(max) = max
                    && n > max
                {
                    return Err(self.issue(
                        IssueCode::TooBig,
                        format!("must be less than or equal to {max}"),
                    ));
                }
                Ok(FieldValue::Number(n))
            }
        }
    }

    fn issue(&self, code: IssueCode, message: impl Into<String>) -> ValidationIssue {
        ValidationIssue::new(self.name, code, message)
    }
}

/// Integer view of a JSON number; floats qualify only without a fraction.
fn integer_value(n: &Number) -> Option<i128> {
    if let Some(i) = n.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(i128::from(u));
    }
    let f = n.as_f64()?;
    if f.fract() != 0.0 || !f.is_finite() || f.abs() > 1e18 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)] // checked to be integral and in range above
    Some(f as i128)
}

fn decimal_value(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    n.as_f64().and_then(|f| Decimal::try_from(f).ok())
}

/// A field value that passed its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    String(String),
    Integer(i64),
    Number(Decimal),
}

/// A named set of field rules for one operation's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    fields: &'static [FieldRule],
}

impl Schema {
    #[must_use]
    pub const fn new(fields: &'static [FieldRule]) -> Self {
        Self { fields }
    }

    /// Validate a JSON document against every rule.
    ///
    /// Fields not named by the schema are ignored.
    ///
    /// # Errors
    ///
    /// Returns every issue found. A document that is not a JSON object yields
    /// a single [`IssueCode::InvalidBody`] issue.
    pub fn validate(&self, input: &Value) -> Result<ValidatedFields, ValidationErrors> {
        let Value::Object(object) = input else {
            return Err(ValidationErrors::single(ValidationIssue::invalid_body(
                "expected a JSON object",
            )));
        };

        let mut values = HashMap::with_capacity(self.fields.len());
        let mut issues = Vec::new();
        for rule in self.fields {
            match rule.check(object.get(rule.name)) {
                Ok(value) => {
                    values.insert(rule.name, value);
                }
                Err(issue) => issues.push(issue),
            }
        }

        if issues.is_empty() {
            Ok(ValidatedFields { values })
        } else {
            Err(ValidationErrors(issues))
        }
    }
}

/// Typed access to the fields of a document that passed its [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    values: HashMap<&'static str, FieldValue>,
}

impl ValidatedFields {
    /// Take a string field.
    ///
    /// # Errors
    ///
    /// Returns a `Required` issue if the schema did not declare `name` as a string.
    pub fn take_string(&mut self, name: &'static str) -> Result<String, ValidationErrors> {
        match self.values.remove(name) {
            Some(FieldValue::String(s)) => Ok(s),
            _ => Err(missing(name)),
        }
    }

    /// Read an integer field.
    ///
    /// # Errors
    ///
    /// Returns a `Required` issue if the schema did not declare `name` as an integer.
    pub fn integer(&self, name: &'static str) -> Result<i64, ValidationErrors> {
        match self.values.get(name) {
            Some(FieldValue::Integer(i)) => Ok(*i),
            _ => Err(missing(name)),
        }
    }

    /// Read a numeric field.
    ///
    /// # Errors
    ///
    /// Returns a `Required` issue if the schema did not declare `name` as a number.
    pub fn number(&self, name: &'static str) -> Result<Decimal, ValidationErrors> {
        match self.values.get(name) {
            Some(FieldValue::Number(n)) => Ok(*n),
            _ => Err(missing(name)),
        }
    }
}

fn missing(name: &'static str) -> ValidationErrors {
    ValidationErrors::single(ValidationIssue::new(name, IssueCode::Required, "is required"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: Schema = Schema::new(&[
        FieldRule::string("productId").non_empty(),
        FieldRule::integer("quantity").min(1),
        FieldRule::number("price").range(Some(Decimal::ZERO), None),
    ]);

    fn codes(errors: &ValidationErrors) -> Vec<(&str, IssueCode)> {
        errors
            .issues()
            .iter()
            .map(|issue| (issue.field.as_str(), issue.code))
            .collect()
    }

    #[test]
    fn test_valid_document() {
        let mut fields = SCHEMA
            .validate(&json!({"productId": "b1", "quantity": 2, "price": 10.5}))
            .unwrap();

        assert_eq!(fields.take_string("productId").unwrap(), "b1");
        assert_eq!(fields.integer("quantity").unwrap(), 2);
        assert_eq!(fields.number("price").unwrap(), Decimal::new(105, 1));
    }

    #[test]
    fn test_all_issues_are_reported() {
        let errors = SCHEMA.validate(&json!({})).unwrap_err();
        assert_eq!(
            codes(&errors),
            vec![
                ("productId", IssueCode::Required),
                ("quantity", IssueCode::Required),
                ("price", IssueCode::Required),
            ]
        );
    }

    #[test]
    fn test_null_is_missing() {
        let errors = SCHEMA
            .validate(&json!({"productId": null, "quantity": 1, "price": 1}))
            .unwrap_err();
        assert_eq!(codes(&errors), vec![("productId", IssueCode::Required)]);
    }

    #[test]
    fn test_empty_string_rejected() {
        let errors = SCHEMA
            .validate(&json!({"productId": "", "quantity": 1, "price": 1}))
            .unwrap_err();
        assert_eq!(codes(&errors), vec![("productId", IssueCode::TooSmall)]);
    }

    #[test]
    fn test_wrong_types() {
        let errors = SCHEMA
            .validate(&json!({"productId": 7, "quantity": "2", "price": "10"}))
            .unwrap_err();
        assert_eq!(
            codes(&errors),
            vec![
                ("productId", IssueCode::InvalidType),
                ("quantity", IssueCode::InvalidType),
                ("price", IssueCode::InvalidType),
            ]
        );
    }

    #[test]
    fn test_integer_rules() {
        let check = |quantity: Value| {
            SCHEMA
                .validate(&json!({"productId": "b1", "quantity": quantity, "price": 1}))
                .map(|f| f.integer("quantity").unwrap())
        };

        assert_eq!(check(json!(3.0)).unwrap(), 3);
        assert!(check(json!(2.5)).unwrap_err().has_field("quantity"));
        assert_eq!(
            codes(&check(json!(0)).unwrap_err()),
            vec![("quantity", IssueCode::TooSmall)]
        );
        assert_eq!(
            codes(&check(json!(-1)).unwrap_err()),
            vec![("quantity", IssueCode::TooSmall)]
        );
        assert_eq!(
            codes(&check(json!(u64::MAX)).unwrap_err()),
            vec![("quantity", IssueCode::TooBig)]
        );
    }

    #[test]
    fn test_number_rules() {
        let errors = SCHEMA
            .validate(&json!({"productId": "b1", "quantity": 1, "price": -0.01}))
            .unwrap_err();
        assert_eq!(codes(&errors), vec![("price", IssueCode::TooSmall)]);

        assert!(
            SCHEMA
                .validate(&json!({"productId": "b1", "quantity": 1, "price": 0}))
                .is_ok()
        );
    }

    #[test]
    fn test_non_object_body() {
        let errors = SCHEMA.validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(codes(&errors), vec![("", IssueCode::InvalidBody)]);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        assert!(
            SCHEMA
                .validate(&json!({"productId": "b1", "quantity": 1, "price": 1, "extra": true}))
                .is_ok()
        );
    }

    #[test]
    fn test_accessor_for_undeclared_field() {
        let fields = SCHEMA
            .validate(&json!({"productId": "b1", "quantity": 1, "price": 1}))
            .unwrap();
        assert!(fields.integer("price").is_err());
        assert!(fields.number("nope").is_err());
    }

    #[test]
    fn test_display() {
        let errors = SCHEMA.validate(&json!({"productId": "b1"})).unwrap_err();
        assert_eq!(
            errors.to_string(),
            "invalid input: quantity: is required; price: is required"
        );
    }

    #[test]
    fn test_issue_serialization() {
        let issue = ValidationIssue::new("quantity", IssueCode::TooSmall, "must be >= 1");
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(
            value,
            json!({"field": "quantity", "code": "too_small", "message": "must be >= 1"})
        );
    }
}
