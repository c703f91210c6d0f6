//! Boundary checks applied before anything reaches the store. The database
//! repeats the numeric and enum rules as CHECK constraints.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::app_error::AppError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-?[0-9]{7}$").expect("phone pattern is valid"));

pub const PROVINCES: [&str; 5] = ["Sindh", "Balochistan", "Punjab", "Khyber Pakhtunkhwa", "Kashmir"];

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Eleven digits, optionally split 4-7 by a dash.
pub fn is_valid_phone_number(number: &str) -> bool {
    PHONE_RE.is_match(number)
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Not a valid Email format".to_string()))
    }
}

/// `slot` is the 1-based position used in the message ("Phone number 1 ...").
pub fn validate_phone_number(slot: u8, number: &str) -> Result<(), AppError> {
    if is_valid_phone_number(number) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Phone number {} is invalid. It must be an 11-digit number with optional dashes.",
            slot
        )))
    }
}

pub fn validate_province(province: &str) -> Result<(), AppError> {
    if PROVINCES.contains(&province) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Invalid province. Valid options are: {}",
            PROVINCES.join(", ")
        )))
    }
}

/// Fails with the names of every field whose flag is `false`.
pub fn require_fields(fields: &[(&str, bool)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Required text fields may be left out of a partial update, but never blanked.
pub fn reject_blank(fields: &[(&str, &Option<String>)]) -> Result<(), AppError> {
    let blank: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_some() && !present(value))
        .map(|(name, _)| *name)
        .collect();

    if blank.is_empty() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Fields cannot be empty: {}",
            blank.join(", ")
        )))
    }
}

/// A required text field counts as present only when it is non-blank.
pub fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Drops blank strings so optional text columns store NULL instead of "".
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn non_negative_amount(field: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "{} must be a non-negative number",
            field
        )))
    }
}

pub fn non_negative_count(field: &str, value: i32) -> Result<(), AppError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "{} must be a non-negative integer",
            field
        )))
    }
}

pub fn positive_quantity(value: i32) -> Result<(), AppError> {
    if value > 0 {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Valid quantity is required".to_string(),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        value.parse().map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid order status. Valid statuses are: {}",
                Self::ALL.map(|s| s.as_str()).join(", ")
            ))
        })
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|status| status.as_str() == s).ok_or(())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Pending,
        PaymentStatus::Completed,
        PaymentStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Failed => "Failed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        value.parse().map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid payment status. Valid statuses are: {}",
                Self::ALL.map(|s| s.as_str()).join(", ")
            ))
        })
    }
}

impl FromStr for PaymentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|status| status.as_str() == s).ok_or(())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@shop.example.pk"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("spaces in@mail.com"));
    }

    #[test]
    fn test_phone_number_format() {
        assert!(is_valid_phone_number("03001234567"));
        assert!(is_valid_phone_number("0300-1234567"));
        assert!(!is_valid_phone_number("0300-123456"));
        assert!(!is_valid_phone_number("03-001234567"));
        assert!(!is_valid_phone_number("0300_1234567"));
    }

    #[test]
    fn test_province() {
        assert!(validate_province("Punjab").is_ok());
        assert!(validate_province("Khyber Pakhtunkhwa").is_ok());

        let err = validate_province("punjab").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid province. Valid options are: Sindh, Balochistan, Punjab, Khyber Pakhtunkhwa, Kashmir"
        );
    }

    #[test]
    fn test_require_fields_names_missing() {
        assert!(require_fields(&[("email", true), ("password", true)]).is_ok());

        let err = require_fields(&[("email", false), ("password", true), ("city", false)])
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: email, city");
    }

    #[test]
    fn test_present() {
        assert!(present(&Some("x".to_string())));
        assert!(!present(&Some("   ".to_string())));
        assert!(!present(&None));
    }

    #[test]
    fn test_reject_blank_ignores_absent_fields() {
        let name = Some("Ayesha".to_string());
        let blank = Some(" ".to_string());
        assert!(reject_blank(&[("first_name", &name), ("city", &None)]).is_ok());

        let err = reject_blank(&[("first_name", &blank), ("password", &Some(String::new()))])
            .unwrap_err();
        assert_eq!(err.to_string(), "Fields cannot be empty: first_name, password");
    }

    #[test]
    fn test_numeric_bounds() {
        assert!(non_negative_amount("price", 0.0).is_ok());
        assert!(non_negative_amount("price", -0.01).is_err());
        assert!(non_negative_amount("price", f64::NAN).is_err());
        assert!(non_negative_count("stock_quantity", 0).is_ok());
        assert!(non_negative_count("stock_quantity", -1).is_err());
        assert!(positive_quantity(1).is_ok());
        assert!(positive_quantity(0).is_err());
    }

    #[test]
    fn test_order_status() {
        assert_eq!(OrderStatus::parse("Shipped").unwrap(), OrderStatus::Shipped);

        let err = OrderStatus::parse("Lost").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid order status. Valid statuses are: Pending, Shipped, Delivered, Cancelled"
        );
    }

    #[test]
    fn test_payment_status() {
        assert_eq!(PaymentStatus::parse("Failed").unwrap(), PaymentStatus::Failed);
        assert!(PaymentStatus::parse("Refunded").is_err());
        assert!(PaymentStatus::parse("pending").is_err());
    }
}
