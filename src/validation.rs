//! Range checks for user-entered figures.
//!
//! These rules guard interactive entry (an employee form, a rates
//! settings screen, a meeting length picker).  They are deliberately
//! separate from the cost model, which accepts any number it is given.

use crate::error::ValidationError;
use crate::rates::RateConfig;
use crate::sanitize::{parse_leading_number, RawCompensation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use validator::ValidateEmail;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

pub const SALARY: Range = Range { min: 1_000.0, max: 10_000_000.0 };
pub const BONUS: Range = Range { min: 0.0, max: 10_000_000.0 };
pub const HEALTH_INSURANCE: Range = Range { min: 100.0, max: 100_000.0 };
pub const TAX_RATE: Range = Range { min: 0.0, max: 100.0 };
pub const SOCIAL_INSURANCE_WEEKLY: Range = Range { min: 0.0, max: 500.0 };
/// One minute to 24 hours.
pub const MEETING_DURATION: Range = Range { min: 1.0, max: 1_440.0 };
pub const NAME_MIN_LEN: usize = 2;

fn number(field: &'static str, value: Option<&Value>) -> Result<f64, ValidationError> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_leading_number(s),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::NotANumber { field })
}

pub fn check_range(field: &'static str, value: f64, range: Range) -> Result<(), ValidationError> {
    if value < range.min {
        return Err(ValidationError::BelowMinimum { field, min: range.min });
    }
    if value > range.max {
        return Err(ValidationError::AboveMaximum { field, max: range.max });
    }
    Ok(())
}

pub fn validate_salary(value: Option<&Value>) -> Result<f64, ValidationError> {
    let salary = number("annualSalary", value)?;
    check_range("annualSalary", salary, SALARY)?;
    Ok(salary)
}

/// A missing or blank bonus is valid and means 0.
pub fn validate_bonus(value: Option<&Value>) -> Result<f64, ValidationError> {
    match value {
        None | Some(Value::Null) => return Ok(0.0),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(0.0),
        _ => {}
    }
    let bonus = number("annualBonus", value)?;
    check_range("annualBonus", bonus, BONUS)?;
    Ok(bonus)
}

pub fn validate_duration(minutes: f64) -> Result<f64, ValidationError> {
    if !minutes.is_finite() {
        return Err(ValidationError::NotANumber { field: "durationMinutes" });
    }
    check_range("durationMinutes", minutes, MEETING_DURATION)?;
    Ok(minutes)
}

pub fn validate_name(name: Option<&str>) -> Result<(), ValidationError> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }
    if name.chars().count() < NAME_MIN_LEN {
        return Err(ValidationError::TooShort { field: "name", min_len: NAME_MIN_LEN });
    }
    Ok(())
}

pub fn validate_role(role: Option<&str>) -> Result<(), ValidationError> {
    match role.map(str::trim) {
        Some(role) if !role.is_empty() => Ok(()),
        _ => Err(ValidationError::Required { field: "role" }),
    }
}

/// Email is optional; a blank address is accepted.
pub fn validate_email(email: Option<&str>) -> Result<(), ValidationError> {
    let email = email.map(str::trim).unwrap_or_default();
    if email.is_empty() || email.to_string().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail { field: "email" })
    }
}

/// Field-keyed validation errors, empty when everything is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors(pub BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    fn record<T>(&mut self, field: &'static str, result: Result<T, ValidationError>) {
        if let Err(err) = result {
            self.0.insert(field, err.to_string());
        }
    }
}

/// Validate an employee's compensation as typed into a form.
pub fn validate_compensation(raw: &RawCompensation) -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.record("annualSalary", validate_salary(raw.annual_salary.as_ref()));
    errors.record("annualBonus", validate_bonus(raw.annual_bonus.as_ref()));
    errors
}

/// An employee record as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeForm {
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub compensation: RawCompensation,
}

pub fn validate_employee(form: &EmployeeForm) -> FieldErrors {
    let mut errors = validate_compensation(&form.compensation);
    errors.record("name", validate_name(form.name.as_deref()));
    errors.record("role", validate_role(form.role.as_deref()));
    errors.record("email", validate_email(form.email.as_deref()));
    errors
}

/// Meeting length as picked before a meeting is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingForm {
    pub duration_minutes: f64,
}

pub fn validate_meeting(form: &MeetingForm) -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.record("durationMinutes", validate_duration(form.duration_minutes));
    errors
}

/// Validate organisation-level rate overrides.
pub fn validate_rates(config: &RateConfig) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if let Some(rate) = config.payroll_tax_rate {
        errors.record("payrollTaxRate", check_range("payrollTaxRate", rate, TAX_RATE));
    }
    if let Some(rate) = config.social_insurance_rate {
        errors.record("socialInsuranceRate", check_range("socialInsuranceRate", rate, TAX_RATE));
    }
    if let Some(rate) = config.employer_pension_rate {
        errors.record("employerPensionRate", check_range("employerPensionRate", rate, TAX_RATE));
    }
    if let Some(weekly) = config.social_insurance_weekly {
        errors.record(
            "socialInsuranceWeekly",
            check_range("socialInsuranceWeekly", weekly, SOCIAL_INSURANCE_WEEKLY),
        );
    }
    if let Some(premium) = config.standard_health_insurance {
        errors.record(
            "standardHealthInsurance",
            check_range("standardHealthInsurance", premium, HEALTH_INSURANCE),
        );
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn salary_bounds() {
        assert_eq!(validate_salary(Some(&json!(80000))), Ok(80_000.0));
        assert_eq!(validate_salary(Some(&json!("80000"))), Ok(80_000.0));
        assert_eq!(validate_salary(Some(&json!(" 80000 BMD"))), Ok(80_000.0));
        assert_eq!(
            validate_salary(Some(&json!(999))),
            Err(ValidationError::BelowMinimum { field: "annualSalary", min: 1000.0 })
        );
        assert!(matches!(
            validate_salary(Some(&json!(20_000_000))),
            Err(ValidationError::AboveMaximum { .. })
        ));
        assert_eq!(
            validate_salary(Some(&json!("abc"))),
            Err(ValidationError::NotANumber { field: "annualSalary" })
        );
        assert!(validate_salary(None).is_err());
    }

    #[test]
    fn bonus_is_optional_but_not_negative() {
        assert_eq!(validate_bonus(None), Ok(0.0));
        assert_eq!(validate_bonus(Some(&json!(""))), Ok(0.0));
        assert_eq!(validate_bonus(Some(&json!(5000))), Ok(5000.0));
        assert!(matches!(
            validate_bonus(Some(&json!(-1))),
            Err(ValidationError::BelowMinimum { .. })
        ));
    }

    #[test]
    fn duration_bounds() {
        assert_eq!(validate_duration(30.0), Ok(30.0));
        assert!(validate_duration(0.5).is_err());
        assert!(validate_duration(1441.0).is_err());
        assert!(validate_duration(f64::NAN).is_err());
    }

    #[test]
    fn compensation_errors_are_keyed_by_field() {
        let raw: RawCompensation =
            serde_json::from_value(json!({"annualSalary": "12", "annualBonus": -5})).unwrap();
        let errors = validate_compensation(&raw);
        assert!(!errors.is_valid());
        assert_eq!(errors.0["annualSalary"], "annualSalary must be at least 1000");
        assert_eq!(errors.0["annualBonus"], "annualBonus must be at least 0");

        let raw: RawCompensation = serde_json::from_value(json!({"annualSalary": 90000})).unwrap();
        assert!(validate_compensation(&raw).is_valid());
    }

    #[test]
    fn number_parsing_matches_sanitize() {
        use crate::sanitize::coerce_number;
        for input in [json!("65000"), json!("72500.5 per year"), json!("1e5")] {
            assert_eq!(validate_salary(Some(&input)), Ok(coerce_number(Some(&input))));
        }
        assert_eq!(
            validate_bonus(Some(&json!("n/a"))),
            Err(ValidationError::NotANumber { field: "annualBonus" })
        );
    }

    #[test]
    fn name_role_and_email_rules() {
        assert_eq!(validate_name(None), Err(ValidationError::Required { field: "name" }));
        assert_eq!(validate_name(Some("  ")), Err(ValidationError::Required { field: "name" }));
        assert_eq!(
            validate_name(Some(" A ")),
            Err(ValidationError::TooShort { field: "name", min_len: 2 })
        );
        assert_eq!(validate_name(Some("Al")), Ok(()));

        assert_eq!(validate_role(Some("")), Err(ValidationError::Required { field: "role" }));
        assert_eq!(validate_role(Some("Engineer")), Ok(()));

        assert_eq!(validate_email(None), Ok(()));
        assert_eq!(validate_email(Some(" ")), Ok(()));
        assert_eq!(validate_email(Some("alex@example.com")), Ok(()));
        assert_eq!(
            validate_email(Some("not-an-email")),
            Err(ValidationError::InvalidEmail { field: "email" })
        );
        assert!(validate_email(Some("alex@")).is_err());
    }

    #[test]
    fn employee_form_collects_every_field() {
        let form: EmployeeForm = serde_json::from_value(json!({
            "name": "J",
            "email": "j.example.com",
            "annualSalary": 500
        }))
        .unwrap();
        let errors = validate_employee(&form);
        let fields: Vec<&str> = errors.0.keys().copied().collect();
        assert_eq!(fields, vec!["annualSalary", "email", "name", "role"]);
        assert_eq!(errors.0["role"], "role is required");

        let form: EmployeeForm = serde_json::from_value(json!({
            "name": "Jordan",
            "role": "Analyst",
            "annualSalary": "85000"
        }))
        .unwrap();
        assert!(validate_employee(&form).is_valid());
    }

    #[test]
    fn meeting_form() {
        assert!(validate_meeting(&MeetingForm { duration_minutes: 45.0 }).is_valid());
        let errors = validate_meeting(&MeetingForm { duration_minutes: 2000.0 });
        assert_eq!(errors.0["durationMinutes"], "durationMinutes cannot exceed 1440");
    }

    #[test]
    fn rate_errors() {
        let config = RateConfig {
            payroll_tax_rate: Some(120.0),
            standard_health_insurance: Some(50.0),
            ..Default::default()
        };
        let errors = validate_rates(&config);
        assert_eq!(errors.0.len(), 2);
        assert!(errors.0.contains_key("payrollTaxRate"));
        assert!(errors.0.contains_key("standardHealthInsurance"));
        assert!(validate_rates(&RateConfig::default()).is_valid());
    }
}
