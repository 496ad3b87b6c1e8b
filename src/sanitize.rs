//! Boundary coercion of loosely-typed compensation input.
//!
//! Employee figures arrive from form fields and stored documents where
//! a half-typed salary ("8000", "", "80k") is a normal transient state.
//! Rather than fail, such values are coerced here to a number, with 0
//! standing in for anything that is not one.  Past this point the cost
//! model only ever sees a well-formed [`CompensationProfile`].

use crate::models::CompensationProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Compensation exactly as the caller supplied it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCompensation {
    pub annual_salary: Option<Value>,
    pub annual_bonus: Option<Value>,
    pub includes_health_insurance: Option<Value>,
}

impl RawCompensation {
    pub fn sanitize(&self) -> CompensationProfile {
        CompensationProfile {
            annual_salary: coerce_number(self.annual_salary.as_ref()),
            annual_bonus: coerce_number(self.annual_bonus.as_ref()),
            includes_health_insurance: coerce_flag(self.includes_health_insurance.as_ref(), true),
        }
    }
}

/// Interpret `value` as a number, or 0 when it is missing or is not one.
///
/// Strings are read the way a form field would be: leading whitespace
/// is skipped and the longest numeric prefix is used, so `"1200.50 BMD"`
/// is 1200.5.  Non-finite results collapse to 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_leading_number(s).unwrap_or(0.0),
        _ => 0.0,
    };
    if number.is_finite() {
        number
    } else {
        0.0
    }
}

fn coerce_flag(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => match s.trim() {
            "true" => true,
            "false" => false,
            _ => default,
        },
        _ => default,
    }
}

/// The longest numeric prefix of `input` after leading whitespace, or
/// `None` when there is no digit to read.
pub(crate) fn parse_leading_number(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut valid_end = 0;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                valid_end = end + 1;
            }
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => {
                seen_exp = true;
                if matches!(bytes.get(end + 1), Some(b'+') | Some(b'-')) {
                    end += 1;
                }
            }
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    s[..valid_end].parse().ok()
}
