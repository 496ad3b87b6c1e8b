//! Milestone schedule.
//!
//! Milestones are the checkpoints at which a meeting's cumulative cost
//! is reported: a fixed base run `[1, 15, 30, ..., 120]` followed by a
//! step of 15 minutes for as long as the meeting lasts.  The schedule
//! is regenerated on every call; nothing is cached between calls.

use crate::models::Milestone;
use crate::rounding::round2;

pub const BASE_MILESTONES: [u32; 9] = [1, 15, 30, 45, 60, 75, 90, 105, 120];
/// Step between milestones once the base run is exhausted.
pub const MILESTONE_INTERVAL: u32 = 15;
/// Milestones that raise a notification by default.
pub const DEFAULT_NOTIFICATION_MILESTONES: [u32; 4] = [30, 60, 90, 120];

const LAST_BASE_MILESTONE: u32 = BASE_MILESTONES[BASE_MILESTONES.len() - 1];

/// Every milestone time `<= max_minutes`, in ascending order.
fn schedule(max_minutes: f64) -> impl Iterator<Item = u32> {
    let extended = std::iter::successors(Some(LAST_BASE_MILESTONE + MILESTONE_INTERVAL), |m| {
        m.checked_add(MILESTONE_INTERVAL)
    });
    BASE_MILESTONES
        .into_iter()
        .chain(extended)
        .take_while(move |&m| f64::from(m) <= max_minutes)
}

/// Cumulative cost at each milestone up to and including `max_minutes`.
///
/// Empty when `max_minutes < 1`.
pub fn build_milestones(per_minute_cost: f64, max_minutes: f64) -> Vec<Milestone> {
    schedule(max_minutes)
        .map(|time_minutes| Milestone {
            time_minutes,
            cost: round2(per_minute_cost * f64::from(time_minutes)),
        })
        .collect()
}

/// Milestone times already crossed at `elapsed_minutes`.
pub fn milestones_reached(elapsed_minutes: f64) -> Vec<u32> {
    schedule(elapsed_minutes).collect()
}

/// The first milestone strictly after `elapsed_minutes`.
///
/// Past the base run this is the next multiple of the interval, so a
/// next milestone always exists.
pub fn next_milestone(elapsed_minutes: f64) -> u32 {
    if let Some(&m) = BASE_MILESTONES.iter().find(|&&m| f64::from(m) > elapsed_minutes) {
        return m;
    }
    let interval = f64::from(MILESTONE_INTERVAL);
    let steps = (elapsed_minutes / interval).floor() + 1.0;
    (steps * interval) as u32
}

/// Milestones reached at `current_minutes` that had not been reached at
/// `previous_minutes`.
pub fn milestones_crossed(previous_minutes: f64, current_minutes: f64) -> Vec<u32> {
    schedule(current_minutes)
        .filter(|&m| f64::from(m) > previous_minutes)
        .collect()
}

/// Keep only the crossed milestones that should notify.
pub fn notifiable(crossed: &[u32], notify_at: &[u32]) -> Vec<u32> {
    crossed
        .iter()
        .copied()
        .filter(|m| notify_at.contains(m))
        .collect()
}
