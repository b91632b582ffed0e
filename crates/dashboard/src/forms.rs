//! Form payloads and validation.
//!
//! Validation never aborts a request: every rule runs and every violation is
//! collected into [`FieldErrors`], so a form with three bad fields reports
//! all three at once. Handlers re-render the form with the full map instead
//! of failing on the first problem.
//!
//! Raw form types keep every field optional; a missing field is a violation
//! to report, not a deserialization error.

use std::collections::BTreeMap;
use std::str::FromStr;

use ledgerboard_core::{Cents, CustomerId, Email, InvoiceStatus};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Validation messages collected per form field.
///
/// Messages within a field keep the order their rules ran in; independent
/// rules stack, so an empty email reports both the required and the format
/// message.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, Vec<String>>,
}

impl FieldErrors {
    /// Record a violation against a field.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    /// `true` when no rule was violated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded against one field, empty for a clean field.
    #[must_use]
    pub fn field(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }
}

/// Raw invoice form as submitted; shared by the create and edit pages.
#[derive(Debug, Default, Deserialize)]
pub struct InvoiceForm {
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

/// Invoice fields that passed validation. The amount is already converted
/// from the dollar string to integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoicePayload {
    pub customer_id: CustomerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
}

impl InvoiceForm {
    /// Run every invoice rule and either produce a payload or the full set of
    /// violations.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] listing each violated rule by field.
    pub fn validate(&self) -> Result<InvoicePayload, FieldErrors> {
        let mut errors = FieldErrors::default();

        let customer_id = self
            .customer_id
            .as_deref()
            .and_then(|raw| CustomerId::from_str(raw).ok());
        if customer_id.is_none() {
            errors.push("customer_id", "Please select a customer.");
        }

        let amount = match self.amount.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match Decimal::from_str(raw) {
                Ok(dollars) if dollars > Decimal::ZERO => {
                    let cents = Cents::from_dollars(dollars);
                    if cents.is_none() {
                        errors.push("amount", "Please enter a valid amount.");
                    }
                    cents
                }
                Ok(_) => {
                    errors.push("amount", "Please enter an amount greater than $0.");
                    None
                }
                Err(_) => {
                    errors.push("amount", "Please enter a valid amount.");
                    None
                }
            },
            _ => {
                errors.push("amount", "Please enter a valid amount.");
                None
            }
        };

        let status = self
            .status
            .as_deref()
            .and_then(|raw| InvoiceStatus::from_str(raw).ok());
        if status.is_none() {
            errors.push("status", "Please select an invoice status.");
        }

        match (customer_id, amount, status) {
            (Some(customer_id), Some(amount), Some(status)) if errors.is_empty() => {
                Ok(InvoicePayload {
                    customer_id,
                    amount,
                    status,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Raw customer form as submitted; shared by the create and edit pages.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerForm {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Customer fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerPayload {
    pub name: String,
    pub email: Email,
}

impl CustomerForm {
    /// Run every customer rule and either produce a payload or the full set
    /// of violations.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] listing each violated rule by field.
    pub fn validate(&self) -> Result<CustomerPayload, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self.name.as_deref().unwrap_or("").trim();
        if name.is_empty() {
            errors.push("name", "Name is required.");
        }

        let raw_email = self.email.as_deref().unwrap_or("").trim();
        if raw_email.is_empty() {
            errors.push("email", "Email is required.");
        }
        let email = match Email::parse(raw_email) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push("email", "Please enter a valid email address.");
                None
            }
        };

        match email {
            Some(email) if errors.is_empty() => Ok(CustomerPayload {
                name: name.to_owned(),
                email,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw signup form as submitted.
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Signup fields that passed validation. The email is normalized to
/// lowercase so later logins resolve the same account regardless of casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupPayload {
    pub name: String,
    pub email: Email,
    pub password: String,
}

impl SignupForm {
    /// Run every signup rule and either produce a payload or the full set of
    /// violations.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] listing each violated rule by field.
    pub fn validate(&self) -> Result<SignupPayload, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self.name.as_deref().unwrap_or("").trim();
        if name.is_empty() {
            errors.push("name", "Name is required.");
        }

        let raw_email = self.email.as_deref().unwrap_or("").trim().to_lowercase();
        if raw_email.is_empty() {
            errors.push("email", "Email is required.");
        }
        let email = match Email::parse(&raw_email) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push("email", "Please enter a valid email address.");
                None
            }
        };

        let password = self.password.as_deref().unwrap_or("");
        if password.chars().count() < 6 {
            errors.push("password", "Password must be at least 6 characters long.");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(SignupPayload {
                name: name.to_owned(),
                email,
                password: password.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

/// Raw login form as submitted.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login fields that passed validation, email normalized like signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPayload {
    pub email: Email,
    pub password: String,
}

impl LoginForm {
    /// Run every login rule and either produce a payload or the full set of
    /// violations.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] listing each violated rule by field.
    pub fn validate(&self) -> Result<LoginPayload, FieldErrors> {
        let mut errors = FieldErrors::default();

        let raw_email = self.email.as_deref().unwrap_or("").trim().to_lowercase();
        if raw_email.is_empty() {
            errors.push("email", "Email is required.");
        }
        let email = match Email::parse(&raw_email) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push("email", "Please enter a valid email address.");
                None
            }
        };

        let password = self.password.as_deref().unwrap_or("");
        if password.chars().count() < 6 {
            errors.push("password", "Password must be at least 6 characters long.");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(LoginPayload {
                email,
                password: password.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn invoice_form(customer_id: &str, amount: &str, status: &str) -> InvoiceForm {
        InvoiceForm {
            customer_id: Some(customer_id.to_owned()),
            amount: Some(amount.to_owned()),
            status: Some(status.to_owned()),
        }
    }

    #[test]
    fn test_invoice_valid_form_converts_dollars_to_cents() {
        let form = invoice_form("b2f6a9d0-3c63-4b1a-9f2e-6a1f6e2d8c11", "12.34", "pending");
        let payload = form.validate().unwrap();
        assert_eq!(payload.amount.as_i64(), 1234);
        assert_eq!(payload.status, InvoiceStatus::Pending);
    }

    #[test]
    fn test_invoice_empty_form_reports_every_field() {
        let errors = InvoiceForm::default().validate().unwrap_err();
        assert_eq!(errors.field("customer_id"), ["Please select a customer."]);
        assert_eq!(errors.field("amount"), ["Please enter a valid amount."]);
        assert_eq!(errors.field("status"), ["Please select an invoice status."]);
    }

    #[test]
    fn test_invoice_zero_amount_rejected() {
        let form = invoice_form("b2f6a9d0-3c63-4b1a-9f2e-6a1f6e2d8c11", "0", "paid");
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.field("amount"),
            ["Please enter an amount greater than $0."]
        );
    }

    #[test]
    fn test_invoice_negative_amount_rejected() {
        let form = invoice_form("b2f6a9d0-3c63-4b1a-9f2e-6a1f6e2d8c11", "-5", "paid");
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.field("amount"),
            ["Please enter an amount greater than $0."]
        );
    }

    #[test]
    fn test_invoice_unparseable_amount_rejected() {
        let form = invoice_form("b2f6a9d0-3c63-4b1a-9f2e-6a1f6e2d8c11", "ten", "paid");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("amount"), ["Please enter a valid amount."]);
    }

    #[test]
    fn test_invoice_sub_cent_amount_rounds_half_away_from_zero() {
        let form = invoice_form("b2f6a9d0-3c63-4b1a-9f2e-6a1f6e2d8c11", "12.345", "paid");
        let payload = form.validate().unwrap();
        assert_eq!(payload.amount.as_i64(), 1235);
    }

    #[test]
    fn test_invoice_bad_customer_id_rejected() {
        let form = invoice_form("not-a-uuid", "12.34", "paid");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("customer_id"), ["Please select a customer."]);
    }

    #[test]
    fn test_invoice_unknown_status_rejected() {
        let form = invoice_form("b2f6a9d0-3c63-4b1a-9f2e-6a1f6e2d8c11", "12.34", "overdue");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("status"), ["Please select an invoice status."]);
    }

    #[test]
    fn test_customer_empty_email_stacks_both_messages() {
        let form = CustomerForm {
            name: Some("Ada".to_owned()),
            email: Some(String::new()),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.field("email"),
            [
                "Email is required.",
                "Please enter a valid email address."
            ]
        );
    }

    #[test]
    fn test_customer_empty_name_rejected() {
        let form = CustomerForm {
            name: Some("   ".to_owned()),
            email: Some("ada@example.com".to_owned()),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("name"), ["Name is required."]);
        assert!(errors.field("email").is_empty());
    }

    #[test]
    fn test_customer_invalid_email_rejected() {
        let form = CustomerForm {
            name: Some("Ada".to_owned()),
            email: Some("not-an-email".to_owned()),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.field("email"),
            ["Please enter a valid email address."]
        );
    }

    #[test]
    fn test_customer_valid_form_trims_fields() {
        let form = CustomerForm {
            name: Some("  Ada Lovelace  ".to_owned()),
            email: Some("  ada@example.com ".to_owned()),
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.name, "Ada Lovelace");
        assert_eq!(payload.email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_signup_short_password_rejected() {
        let form = SignupForm {
            name: Some("Ada".to_owned()),
            email: Some("ada@example.com".to_owned()),
            password: Some("12345".to_owned()),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.field("password"),
            ["Password must be at least 6 characters long."]
        );
    }

    #[test]
    fn test_signup_six_character_password_accepted() {
        let form = SignupForm {
            name: Some("Ada".to_owned()),
            email: Some("ada@example.com".to_owned()),
            password: Some("123456".to_owned()),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_signup_missing_fields_report_every_rule() {
        let errors = SignupForm::default().validate().unwrap_err();
        assert_eq!(errors.field("name"), ["Name is required."]);
        assert_eq!(
            errors.field("email"),
            [
                "Email is required.",
                "Please enter a valid email address."
            ]
        );
        assert_eq!(
            errors.field("password"),
            ["Password must be at least 6 characters long."]
        );
    }

    #[test]
    fn test_login_normalizes_email() {
        let form = LoginForm {
            email: Some("  User@Example.COM ".to_owned()),
            password: Some("secret-password".to_owned()),
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.email.as_str(), "user@example.com");
    }

    #[test]
    fn test_field_errors_unknown_field_is_empty() {
        let errors = FieldErrors::default();
        assert!(errors.field("amount").is_empty());
        assert!(errors.is_empty());
    }
}
