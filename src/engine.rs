//! Meeting cost aggregation.
//!
//! The `engine` module combines the per-minute costs of a meeting's
//! attendees with a duration.  The same aggregation serves three
//! moments in a meeting's life:
//!
//! * [`predict`] before it starts, for a hypothetical duration;
//! * [`real_time`] while it runs, for the active elapsed time;
//! * [`settle`] once it ends, against the scheduled duration.
//!
//! Inputs are checked at the boundary: durations must be finite and
//! lie between 0 and [`MAX_MEETING_MINUTES`], and every attendee must
//! carry a finite per-minute cost.  An empty attendee list is valid and yields zero costs.

use crate::error::{EngineError, Result};
use crate::milestones::{build_milestones, milestones_reached, next_milestone};
use crate::models::{
    CompletedMeeting, LiveAttendeeCost, MeetingsSummary, PerMinuteCost, PredictedAttendeeCost,
    PredictionResult, RealTimeResult, SettledAttendeeCost, SettlementResult,
};
use crate::rounding::{round2, round3};
use crate::validation::MEETING_DURATION;

/// Longest duration the aggregator accepts, in minutes.
pub const MAX_MEETING_MINUTES: f64 = MEETING_DURATION.max;

fn check_minutes(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=MAX_MEETING_MINUTES).contains(&value) {
        Ok(value)
    } else {
        Err(EngineError::InvalidDuration { field, value })
    }
}

/// Sum of the attendees' per-minute costs, rejecting non-finite entries.
///
/// Duplicate attendees are counted twice.
fn total_per_minute_cost<A: PerMinuteCost>(attendees: &[A]) -> Result<f64> {
    attendees
        .iter()
        .enumerate()
        .try_fold(0.0, |sum, (index, attendee)| {
            let value = attendee.per_minute_cost();
            if value.is_finite() {
                Ok(sum + value)
            } else {
                Err(EngineError::InvalidAttendeeCost { index, value })
            }
        })
}

/// Estimate the cost of a meeting that runs for `duration_minutes`.
pub fn predict<A>(attendees: &[A], duration_minutes: f64) -> Result<PredictionResult<A>>
where
    A: PerMinuteCost + Clone,
{
    let duration_minutes = check_minutes("durationMinutes", duration_minutes)?;
    let total_per_minute = total_per_minute_cost(attendees)?;
    let total_cost = total_per_minute * duration_minutes;

    let attendee_costs = attendees
        .iter()
        .map(|attendee| PredictedAttendeeCost {
            cost: round2(attendee.per_minute_cost() * duration_minutes),
            attendee: attendee.clone(),
        })
        .collect();

    tracing::debug!(
        attendees = attendees.len(),
        duration_minutes,
        total_cost,
        "predicted meeting cost"
    );

    Ok(PredictionResult {
        attendee_count: attendees.len(),
        total_per_minute_cost: round3(total_per_minute),
        duration_minutes,
        total_cost: round2(total_cost),
        milestones: build_milestones(total_per_minute, duration_minutes),
        attendee_costs,
    })
}

/// Cost of a meeting in progress after `elapsed_minutes` of active time.
///
/// `elapsed_minutes` is usually fractional (elapsed seconds / 60) and is
/// used unrounded throughout.
pub fn real_time<A>(attendees: &[A], elapsed_minutes: f64) -> Result<RealTimeResult<A>>
where
    A: PerMinuteCost + Clone,
{
    let elapsed_minutes = check_minutes("elapsedMinutes", elapsed_minutes)?;
    let total_per_minute = total_per_minute_cost(attendees)?;
    let next = next_milestone(elapsed_minutes);

    let attendee_costs = attendees
        .iter()
        .map(|attendee| LiveAttendeeCost {
            current_cost: round2(attendee.per_minute_cost() * elapsed_minutes),
            attendee: attendee.clone(),
        })
        .collect();

    Ok(RealTimeResult {
        current_cost: round2(total_per_minute * elapsed_minutes),
        total_per_minute_cost: round3(total_per_minute),
        elapsed_minutes,
        milestones_reached: milestones_reached(elapsed_minutes),
        next_milestone: next,
        next_milestone_cost: round2(total_per_minute * f64::from(next)),
        minutes_to_next_milestone: f64::from(next) - elapsed_minutes,
        attendee_costs,
    })
}

/// Reconcile a finished meeting against its scheduled duration.
pub fn settle<A>(
    attendees: &[A],
    actual_minutes: f64,
    scheduled_minutes: f64,
) -> Result<SettlementResult<A>>
where
    A: PerMinuteCost + Clone,
{
    let actual_minutes = check_minutes("actualMinutes", actual_minutes)?;
    let scheduled_minutes = check_minutes("scheduledMinutes", scheduled_minutes)?;
    let total_per_minute = total_per_minute_cost(attendees)?;

    let actual_cost = total_per_minute * actual_minutes;
    let scheduled_cost = total_per_minute * scheduled_minutes;

    let attendee_costs = attendees
        .iter()
        .map(|attendee| {
            let rate = attendee.per_minute_cost();
            let share = if total_per_minute == 0.0 {
                0.0
            } else {
                rate / total_per_minute * 100.0
            };
            SettledAttendeeCost {
                final_cost: round2(rate * actual_minutes),
                percentage_of_total: round2(share),
                attendee: attendee.clone(),
            }
        })
        .collect();

    tracing::debug!(
        attendees = attendees.len(),
        actual_minutes,
        scheduled_minutes,
        actual_cost,
        "settled meeting cost"
    );

    Ok(SettlementResult {
        actual_cost: round2(actual_cost),
        scheduled_cost: round2(scheduled_cost),
        cost_difference: round2(actual_cost - scheduled_cost),
        ran_over: actual_minutes > scheduled_minutes,
        ended_early: actual_minutes < scheduled_minutes,
        actual_minutes,
        scheduled_minutes,
        minutes_difference: actual_minutes - scheduled_minutes,
        cost_per_minute: round3(total_per_minute),
        milestones: build_milestones(total_per_minute, actual_minutes),
        attendee_costs,
    })
}

/// Totals and averages over a set of completed meetings.
///
/// An empty history yields an all-zero summary.
pub fn summarize<M: CompletedMeeting>(meetings: &[M]) -> MeetingsSummary {
    if meetings.is_empty() {
        return MeetingsSummary::default();
    }
    let count = meetings.len() as f64;
    let total_cost: f64 = meetings.iter().map(|m| m.actual_cost()).sum();
    let total_minutes: f64 = meetings.iter().map(|m| m.actual_minutes()).sum();
    MeetingsSummary {
        total_meetings: meetings.len(),
        total_cost: round2(total_cost),
        total_minutes,
        average_cost: round2(total_cost / count),
        average_duration: (total_minutes / count).round(),
    }
}
