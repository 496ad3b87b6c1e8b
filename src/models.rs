//! Data models for the Meeting Cost Engine.
//!
//! The `models` module defines the serialisable records that flow in
//! and out of the engine: compensation input, the per-employee cost
//! breakdown, attendees and the three meeting result shapes.  Field
//! names serialise as camelCase so the records line up with the
//! stored employee and meeting documents the engine is fed from.

use crate::rates::JurisdictionRates;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The one capability the meeting aggregator needs from an attendee.
///
/// Any record can take part in a meeting calculation by exposing its
/// cached per-minute cost; everything else about it is carried through
/// to the per-attendee results untouched.
pub trait PerMinuteCost {
    fn per_minute_cost(&self) -> f64;
}

fn default_true() -> bool {
    true
}

/// Annual compensation of one employee, already sanitised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationProfile {
    pub annual_salary: f64,
    #[serde(default)]
    pub annual_bonus: f64,
    /// Whether the employer subsidises the standard health premium.
    #[serde(default = "default_true")]
    pub includes_health_insurance: bool,
}

impl CompensationProfile {
    pub fn new(annual_salary: f64) -> Self {
        Self {
            annual_salary,
            annual_bonus: 0.0,
            includes_health_insurance: true,
        }
    }

    pub fn with_bonus(mut self, annual_bonus: f64) -> Self {
        self.annual_bonus = annual_bonus;
        self
    }

    pub fn with_health_insurance(mut self, included: bool) -> Self {
        self.includes_health_insurance = included;
        self
    }
}

/// Fully-loaded annual, hourly and per-minute cost of one employee.
///
/// Currency fields are rounded to two decimals; `per_minute_cost` to
/// three.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub annual_salary: f64,
    pub annual_bonus: f64,
    pub total_compensation: f64,
    pub taxable_compensation: f64,
    pub payroll_tax: f64,
    pub social_insurance: f64,
    pub health_insurance_employer_portion: f64,
    pub employer_pension: f64,
    pub total_annual_cost: f64,
    pub hourly_cost: f64,
    pub per_minute_cost: f64,
    /// The rates the breakdown was computed with.
    pub rates: JurisdictionRates,
}

impl PerMinuteCost for CostBreakdown {
    fn per_minute_cost(&self) -> f64 {
        self.per_minute_cost
    }
}

/// A stored employee record with its cached costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub compensation: CompensationProfile,
    #[serde(default)]
    pub hourly_cost: f64,
    #[serde(default)]
    pub per_minute_cost: f64,
    #[serde(default)]
    pub total_annual_cost: f64,
}

impl PerMinuteCost for Employee {
    fn per_minute_cost(&self) -> f64 {
        self.per_minute_cost
    }
}

/// A meeting attendee as received from an external caller.
///
/// Only `per_minute_cost` is read; the remaining fields (name, role,
/// email, ...) are kept verbatim and echoed back in the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub per_minute_cost: f64,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Attendee {
    pub fn new(per_minute_cost: f64) -> Self {
        Self {
            per_minute_cost,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

impl PerMinuteCost for Attendee {
    fn per_minute_cost(&self) -> f64 {
        self.per_minute_cost
    }
}

/// Cumulative meeting cost at a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub time_minutes: u32,
    pub cost: f64,
}

/// Cost of one attendee for a predicted duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedAttendeeCost<A> {
    #[serde(flatten)]
    pub attendee: A,
    pub cost: f64,
}

/// Pre-meeting estimate for a hypothetical duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult<A> {
    pub attendee_count: usize,
    pub total_per_minute_cost: f64,
    pub duration_minutes: f64,
    pub total_cost: f64,
    pub milestones: Vec<Milestone>,
    pub attendee_costs: Vec<PredictedAttendeeCost<A>>,
}

/// Accumulated cost of one attendee so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveAttendeeCost<A> {
    #[serde(flatten)]
    pub attendee: A,
    pub current_cost: f64,
}

/// Snapshot of a meeting in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeResult<A> {
    pub current_cost: f64,
    pub total_per_minute_cost: f64,
    pub elapsed_minutes: f64,
    pub milestones_reached: Vec<u32>,
    pub next_milestone: u32,
    pub next_milestone_cost: f64,
    pub minutes_to_next_milestone: f64,
    pub attendee_costs: Vec<LiveAttendeeCost<A>>,
}

/// Final cost of one attendee and their share of the meeting total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettledAttendeeCost<A> {
    #[serde(flatten)]
    pub attendee: A,
    pub final_cost: f64,
    /// Percentage of the meeting's per-minute cost carried by this
    /// attendee; 0 when the meeting costs nothing.
    pub percentage_of_total: f64,
}

/// Reconciliation of a finished meeting against its schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResult<A> {
    pub actual_cost: f64,
    pub scheduled_cost: f64,
    /// Positive when the meeting cost more than planned.
    pub cost_difference: f64,
    pub ran_over: bool,
    pub ended_early: bool,
    pub actual_minutes: f64,
    pub scheduled_minutes: f64,
    pub minutes_difference: f64,
    pub cost_per_minute: f64,
    pub milestones: Vec<Milestone>,
    pub attendee_costs: Vec<SettledAttendeeCost<A>>,
}

/// Anything that records how long a finished meeting ran and what it
/// cost.
pub trait CompletedMeeting {
    fn actual_cost(&self) -> f64;
    fn actual_minutes(&self) -> f64;
}

impl<A> CompletedMeeting for SettlementResult<A> {
    fn actual_cost(&self) -> f64 {
        self.actual_cost
    }

    fn actual_minutes(&self) -> f64 {
        self.actual_minutes
    }
}

/// The stored outcome of a completed meeting, as kept in meeting
/// history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingOutcome {
    #[serde(default)]
    pub actual_cost: f64,
    #[serde(default)]
    pub actual_minutes: f64,
}

impl CompletedMeeting for MeetingOutcome {
    fn actual_cost(&self) -> f64 {
        self.actual_cost
    }

    fn actual_minutes(&self) -> f64 {
        self.actual_minutes
    }
}

/// Totals and averages across a meeting history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingsSummary {
    pub total_meetings: usize,
    pub total_cost: f64,
    pub total_minutes: f64,
    pub average_cost: f64,
    pub average_duration: f64,
}
