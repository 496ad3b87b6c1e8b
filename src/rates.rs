//! Jurisdiction rate configuration.
//!
//! The `rates` module defines the employer-contribution rules that
//! turn a salary into a fully-loaded cost.  [`RateConfig`] is the
//! partial, caller-supplied form: every field is optional and is merged
//! field by field over a base [`JurisdictionRates`].  Resolution checks
//! the invariants (non-negative rates, at most one social insurance
//! mode) and yields the value the cost model consumes.
//!
//! Rate profiles for whole organisations or jurisdictions are stored
//! externally as JSON files and loaded with [`load_rate_profiles_from_dir`].

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Payroll tax rate in percent (Bermuda, 2025-26).
pub const DEFAULT_PAYROLL_TAX_RATE: f64 = 10.0;
/// Maximum annual compensation per employee subject to payroll tax.
pub const DEFAULT_PAYROLL_TAX_CAP: f64 = 1_000_000.0;
/// Employer social insurance contribution per employee per week.
pub const DEFAULT_SOCIAL_INSURANCE_WEEKLY: f64 = 37.65;
/// 37.65 x 52 weeks.
pub const DEFAULT_SOCIAL_INSURANCE_ANNUAL: f64 = 1957.80;
/// Standard annual health insurance premium ($500/month).
pub const DEFAULT_HEALTH_INSURANCE_ANNUAL: f64 = 6000.0;
/// 40 hours/week x 52 weeks.
pub const DEFAULT_ANNUAL_WORK_HOURS: f64 = 2080.0;
pub const WEEKS_PER_YEAR: f64 = 52.0;

/// How the per-employee payroll tax base is limited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PayrollTaxCap {
    /// Compensation above this amount is not taxed.
    Capped(f64),
    /// The whole compensation is taxed.
    Uncapped,
}

impl PayrollTaxCap {
    /// Portion of `compensation` subject to payroll tax.
    pub fn taxable(&self, compensation: f64) -> f64 {
        match *self {
            PayrollTaxCap::Capped(cap) => compensation.min(cap),
            PayrollTaxCap::Uncapped => compensation,
        }
    }
}

/// Employer social insurance contribution.
///
/// The modelled jurisdiction charges a fixed weekly sum per head.  The
/// percentage form exists for simplified estimates and comparison with
/// jurisdictions that levy a share of pay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SocialInsurance {
    FlatAnnual(f64),
    PercentOfCompensation(f64),
}

impl SocialInsurance {
    pub fn annual_amount(&self, total_compensation: f64) -> f64 {
        match *self {
            SocialInsurance::FlatAnnual(amount) => amount,
            SocialInsurance::PercentOfCompensation(rate) => total_compensation * (rate / 100.0),
        }
    }
}

/// Share of the standard health premium carried by the employer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthShare {
    /// Employer and employee split the premium equally.
    #[default]
    Half,
    /// The configured premium is already the employer's portion.
    Full,
}

impl HealthShare {
    pub fn employer_portion(&self, premium: f64) -> f64 {
        match self {
            HealthShare::Half => premium / 2.0,
            HealthShare::Full => premium,
        }
    }
}

/// Fully resolved rates, ready for [`crate::cost_model::compute_cost`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurisdictionRates {
    /// Payroll tax in percent of taxable compensation.
    pub payroll_tax_rate: f64,
    pub payroll_tax_cap: PayrollTaxCap,
    pub social_insurance: SocialInsurance,
    /// Standard annual health insurance premium before the employer share
    /// is applied.
    pub standard_health_insurance: f64,
    pub health_share: HealthShare,
    /// Employer pension contribution in percent of total compensation.
    pub employer_pension_rate: f64,
    pub annual_work_hours: f64,
}

impl Default for JurisdictionRates {
    fn default() -> Self {
        Self {
            payroll_tax_rate: DEFAULT_PAYROLL_TAX_RATE,
            payroll_tax_cap: PayrollTaxCap::Capped(DEFAULT_PAYROLL_TAX_CAP),
            social_insurance: SocialInsurance::FlatAnnual(DEFAULT_SOCIAL_INSURANCE_ANNUAL),
            standard_health_insurance: DEFAULT_HEALTH_INSURANCE_ANNUAL,
            health_share: HealthShare::Half,
            employer_pension_rate: 0.0,
            annual_work_hours: DEFAULT_ANNUAL_WORK_HOURS,
        }
    }
}

/// Caller-supplied rate overrides.
///
/// Absent fields keep the base value.  Only one of the three social
/// insurance fields may be populated; the populated one selects the
/// mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateConfig {
    pub payroll_tax_rate: Option<f64>,
    pub payroll_tax_cap: Option<PayrollTaxCap>,
    pub social_insurance_annual: Option<f64>,
    pub social_insurance_weekly: Option<f64>,
    pub social_insurance_rate: Option<f64>,
    pub standard_health_insurance: Option<f64>,
    pub health_share: Option<HealthShare>,
    pub employer_pension_rate: Option<f64>,
    pub annual_work_hours: Option<f64>,
}

impl RateConfig {
    /// Merge over the built-in defaults.
    pub fn resolve(&self) -> Result<JurisdictionRates> {
        self.resolve_over(&JurisdictionRates::default())
    }

    /// Merge over `base`, field by field, and check the result.
    pub fn resolve_over(&self, base: &JurisdictionRates) -> Result<JurisdictionRates> {
        let social_insurance = match (
            self.social_insurance_annual,
            self.social_insurance_weekly,
            self.social_insurance_rate,
        ) {
            (None, None, None) => base.social_insurance,
            (Some(annual), None, None) => SocialInsurance::FlatAnnual(annual),
            (None, Some(weekly), None) => SocialInsurance::FlatAnnual(weekly * WEEKS_PER_YEAR),
            (None, None, Some(rate)) => SocialInsurance::PercentOfCompensation(rate),
            _ => {
                return Err(EngineError::ConflictingRates(
                    "only one of socialInsuranceAnnual, socialInsuranceWeekly and socialInsuranceRate may be set"
                        .into(),
                ))
            }
        };

        let rates = JurisdictionRates {
            payroll_tax_rate: self.payroll_tax_rate.unwrap_or(base.payroll_tax_rate),
            payroll_tax_cap: self.payroll_tax_cap.unwrap_or(base.payroll_tax_cap),
            social_insurance,
            standard_health_insurance: self
                .standard_health_insurance
                .unwrap_or(base.standard_health_insurance),
            health_share: self.health_share.unwrap_or(base.health_share),
            employer_pension_rate: self.employer_pension_rate.unwrap_or(base.employer_pension_rate),
            annual_work_hours: self.annual_work_hours.unwrap_or(base.annual_work_hours),
        };
        rates.validate()?;
        Ok(rates)
    }
}

impl JurisdictionRates {
    /// Check that every rate is finite and non-negative and that the
    /// work-hour divisor is positive.
    pub fn validate(&self) -> Result<()> {
        let social = match self.social_insurance {
            SocialInsurance::FlatAnnual(v) => ("socialInsuranceAnnual", v),
            SocialInsurance::PercentOfCompensation(v) => ("socialInsuranceRate", v),
        };
        let mut checks = vec![
            ("payrollTaxRate", self.payroll_tax_rate),
            social,
            ("standardHealthInsurance", self.standard_health_insurance),
            ("employerPensionRate", self.employer_pension_rate),
        ];
        if let PayrollTaxCap::Capped(cap) = self.payroll_tax_cap {
            checks.push(("payrollTaxCap", cap));
        }
        for (field, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidRate { field, value });
            }
        }
        if !self.annual_work_hours.is_finite() || self.annual_work_hours <= 0.0 {
            return Err(EngineError::InvalidRate {
                field: "annualWorkHours",
                value: self.annual_work_hours,
            });
        }
        Ok(())
    }
}

/// A named set of rate overrides, stored as one JSON file per
/// region/version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateProfile {
    /// A region code such as `"BM"`.
    pub region: String,
    /// Version string, e.g. `"2025"` or `"2025-simplified"`.
    pub version: String,
    /// Marks the profile a bare region code resolves to.
    #[serde(default)]
    pub primary: bool,
    pub rates: RateConfig,
}

impl RateProfile {
    pub fn key(&self) -> String {
        format!("{}-{}", self.region, self.version)
    }
}

/// Load all rate profiles from a directory.
///
/// Every `.json` file is parsed as a [`RateProfile`]; files that fail to
/// parse are skipped with a warning.  A missing directory yields an
/// empty list.  Duplicate region/version combinations are not checked.
pub fn load_rate_profiles_from_dir(path: &Path) -> anyhow::Result<Vec<RateProfile>> {
    let mut profiles = Vec::new();
    if !path.is_dir() {
        tracing::warn!(dir = %path.display(), "rate profile directory not found");
        return Ok(profiles);
    }
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let file = entry.path();
        if !entry.file_type()?.is_file() || file.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        let data = std::fs::read_to_string(&file)?;
        match serde_json::from_str::<RateProfile>(&data) {
            Ok(profile) => {
                tracing::debug!(file = %file.display(), key = %profile.key(), "loaded rate profile");
                profiles.push(profile);
            }
            Err(err) => {
                tracing::warn!(file = %file.display(), error = %err, "failed to parse rate profile");
            }
        }
    }
    Ok(profiles)
}
