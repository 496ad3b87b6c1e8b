//! Compensation cost model.
//!
//! Turns an employee's salary and bonus into the fully-loaded cost the
//! employer carries: payroll tax, social insurance, the employer share
//! of health insurance and any employer pension contribution.  The
//! annual total is spread over the standard work year to give the
//! hourly and per-minute figures the meeting aggregator runs on.
//!
//! Every function here is pure.  Rates are always passed in; there is
//! no process-wide default beyond [`JurisdictionRates::default`].

use crate::models::{CompensationProfile, CostBreakdown, Employee};
use crate::rates::JurisdictionRates;
use crate::rounding::{round2, round3};
use rayon::prelude::*;

/// Compute the cost breakdown for one employee.
///
/// The steps run in a fixed order on unrounded values; rounding is
/// applied only to the returned fields.  Negative inputs are not
/// rejected and simply produce negative costs.
pub fn compute_cost(profile: &CompensationProfile, rates: &JurisdictionRates) -> CostBreakdown {
    let total_compensation = profile.annual_salary + profile.annual_bonus;

    let health_portion = if profile.includes_health_insurance {
        rates.health_share.employer_portion(rates.standard_health_insurance)
    } else {
        0.0
    };

    let taxable_compensation = rates.payroll_tax_cap.taxable(total_compensation);
    let payroll_tax = taxable_compensation * (rates.payroll_tax_rate / 100.0);

    let social_insurance = rates.social_insurance.annual_amount(total_compensation);
    let employer_pension = total_compensation * (rates.employer_pension_rate / 100.0);

    let total_annual_cost =
        total_compensation + health_portion + payroll_tax + social_insurance + employer_pension;
    let hourly_cost = total_annual_cost / rates.annual_work_hours;
    let per_minute_cost = hourly_cost / 60.0;

    tracing::debug!(
        total_compensation,
        total_annual_cost,
        per_minute_cost,
        "computed employee cost"
    );

    CostBreakdown {
        annual_salary: round2(profile.annual_salary),
        annual_bonus: round2(profile.annual_bonus),
        total_compensation: round2(total_compensation),
        taxable_compensation: round2(taxable_compensation),
        payroll_tax: round2(payroll_tax),
        social_insurance: round2(social_insurance),
        health_insurance_employer_portion: round2(health_portion),
        employer_pension: round2(employer_pension),
        total_annual_cost: round2(total_annual_cost),
        hourly_cost: round2(hourly_cost),
        per_minute_cost: round3(per_minute_cost),
        rates: *rates,
    }
}

/// Per-minute cost only, rounded to three decimals.
pub fn per_minute_cost(profile: &CompensationProfile, rates: &JurisdictionRates) -> f64 {
    compute_cost(profile, rates).per_minute_cost
}

/// Hourly cost only, rounded to two decimals.
pub fn hourly_cost(profile: &CompensationProfile, rates: &JurisdictionRates) -> f64 {
    compute_cost(profile, rates).hourly_cost
}

/// Compute breakdowns for many profiles at once.
///
/// Used when the organisation's rates change and every cached cost has
/// to be refreshed.  Profiles are independent, so the work is spread
/// across threads; the output order matches the input order.
pub fn batch_recompute(profiles: &[CompensationProfile], rates: &JurisdictionRates) -> Vec<CostBreakdown> {
    profiles
        .par_iter()
        .map(|profile| compute_cost(profile, rates))
        .collect()
}

/// Recompute and store the cached costs on each employee record.
pub fn refresh_employees(employees: Vec<Employee>, rates: &JurisdictionRates) -> Vec<Employee> {
    let refreshed: Vec<Employee> = employees
        .into_par_iter()
        .map(|mut employee| {
            let costs = compute_cost(&employee.compensation, rates);
            employee.hourly_cost = costs.hourly_cost;
            employee.per_minute_cost = costs.per_minute_cost;
            employee.total_annual_cost = costs.total_annual_cost;
            employee
        })
        .collect();
    tracing::info!(count = refreshed.len(), "refreshed employee costs");
    refreshed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{HealthShare, PayrollTaxCap, RateConfig, SocialInsurance};

    fn scenario_rates() -> JurisdictionRates {
        RateConfig {
            payroll_tax_rate: Some(10.0),
            payroll_tax_cap: Some(PayrollTaxCap::Capped(1_000_000.0)),
            social_insurance_annual: Some(1957.80),
            standard_health_insurance: Some(6000.0),
            ..Default::default()
        }
        .resolve()
        .unwrap()
    }

    #[test]
    fn reference_employee() {
        let profile = CompensationProfile::new(80_000.0).with_bonus(10_000.0);
        let cost = compute_cost(&profile, &scenario_rates());

        assert_eq!(cost.total_compensation, 90_000.0);
        assert_eq!(cost.taxable_compensation, 90_000.0);
        assert_eq!(cost.health_insurance_employer_portion, 3000.0);
        assert_eq!(cost.payroll_tax, 9000.0);
        assert_eq!(cost.social_insurance, 1957.80);
        assert_eq!(cost.employer_pension, 0.0);
        // 90000 + 3000 + 9000 + 1957.80
        assert_eq!(cost.total_annual_cost, 103_957.80);
        // 103957.80 / 2080 = 49.979711...
        assert_eq!(cost.hourly_cost, 49.98);
        // 49.979711 / 60 = 0.832995...
        assert_eq!(cost.per_minute_cost, 0.833);
    }

    #[test]
    fn full_health_share_counts_whole_premium() {
        let rates = RateConfig {
            health_share: Some(HealthShare::Full),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        let cost = compute_cost(&CompensationProfile::new(80_000.0).with_bonus(10_000.0), &rates);
        assert_eq!(cost.health_insurance_employer_portion, 6000.0);
        assert_eq!(cost.total_annual_cost, 106_957.80);
    }

    #[test]
    fn no_health_insurance() {
        let profile = CompensationProfile::new(50_000.0).with_health_insurance(false);
        let cost = compute_cost(&profile, &JurisdictionRates::default());
        assert_eq!(cost.health_insurance_employer_portion, 0.0);
        assert_eq!(cost.total_annual_cost, 50_000.0 + 5000.0 + 1957.80);
    }

    #[test]
    fn payroll_tax_is_capped() {
        let rates = RateConfig {
            payroll_tax_cap: Some(PayrollTaxCap::Capped(100_000.0)),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        let cost = compute_cost(&CompensationProfile::new(150_000.0).with_bonus(50_000.0), &rates);
        assert_eq!(cost.total_compensation, 200_000.0);
        assert_eq!(cost.taxable_compensation, 100_000.0);
        assert_eq!(cost.payroll_tax, 10_000.0);

        let uncapped = JurisdictionRates {
            payroll_tax_cap: PayrollTaxCap::Uncapped,
            ..JurisdictionRates::default()
        };
        let cost = compute_cost(&CompensationProfile::new(2_000_000.0), &uncapped);
        assert_eq!(cost.payroll_tax, 200_000.0);
    }

    #[test]
    fn percentage_social_insurance_and_pension() {
        let rates = JurisdictionRates {
            social_insurance: SocialInsurance::PercentOfCompensation(10.0),
            employer_pension_rate: 5.0,
            ..JurisdictionRates::default()
        };
        let cost = compute_cost(&CompensationProfile::new(60_000.0).with_health_insurance(false), &rates);
        assert_eq!(cost.social_insurance, 6000.0);
        assert_eq!(cost.employer_pension, 3000.0);
        assert_eq!(cost.total_annual_cost, 60_000.0 + 6000.0 + 6000.0 + 3000.0);
    }

    #[test]
    fn per_minute_cost_reconstructs_annual_total() {
        let rates = JurisdictionRates::default();
        for salary in [25_000.0, 64_321.0, 180_000.0, 999_999.0] {
            let cost = compute_cost(&CompensationProfile::new(salary).with_bonus(1234.0), &rates);
            let from_minutes = cost.per_minute_cost * 60.0 * rates.annual_work_hours;
            let from_hours = cost.hourly_cost * rates.annual_work_hours;
            // per-minute rounding is 0.0005 at most, hourly 0.005
            assert!((from_minutes - cost.total_annual_cost).abs() <= 0.0005 * 60.0 * 2080.0 + 1e-6);
            assert!((from_hours - cost.total_annual_cost).abs() <= 0.005 * 2080.0 + 1e-6);
        }
    }

    #[test]
    fn negative_salary_is_permitted() {
        let cost = compute_cost(
            &CompensationProfile::new(-10_000.0).with_health_insurance(false),
            &JurisdictionRates::default(),
        );
        assert_eq!(cost.payroll_tax, -1000.0);
        assert!(cost.per_minute_cost < 0.0);
    }

    #[test]
    fn compute_cost_is_idempotent() {
        let profile = CompensationProfile::new(72_500.0).with_bonus(3_333.33);
        let rates = JurisdictionRates::default();
        assert_eq!(compute_cost(&profile, &rates), compute_cost(&profile, &rates));
        assert_eq!(per_minute_cost(&profile, &rates), compute_cost(&profile, &rates).per_minute_cost);
        assert_eq!(hourly_cost(&profile, &rates), compute_cost(&profile, &rates).hourly_cost);
    }

    #[test]
    fn batch_preserves_order() {
        let profiles: Vec<CompensationProfile> = (1..=50)
            .map(|i| CompensationProfile::new(i as f64 * 10_000.0))
            .collect();
        let rates = JurisdictionRates::default();
        let costs = batch_recompute(&profiles, &rates);
        assert_eq!(costs.len(), profiles.len());
        for (profile, cost) in profiles.iter().zip(&costs) {
            assert_eq!(cost, &compute_cost(profile, &rates));
        }
    }

    #[test]
    fn refresh_updates_cached_costs() {
        let employee = Employee {
            id: "e1".into(),
            name: "Alex".into(),
            role: "Analyst".into(),
            email: None,
            compensation: CompensationProfile::new(80_000.0).with_bonus(10_000.0),
            hourly_cost: 0.0,
            per_minute_cost: 0.0,
            total_annual_cost: 0.0,
        };
        let refreshed = refresh_employees(vec![employee], &scenario_rates());
        assert_eq!(refreshed[0].per_minute_cost, 0.833);
        assert_eq!(refreshed[0].hourly_cost, 49.98);
        assert_eq!(refreshed[0].total_annual_cost, 103_957.80);
        assert_eq!(refreshed[0].name, "Alex");
    }
}
