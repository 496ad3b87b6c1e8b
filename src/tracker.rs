//! Live meeting tracking.
//!
//! A running meeting is driven by a cooperative polling loop: once per
//! interval the loop reads a monotonic clock, removes any paused time
//! and feeds the active elapsed minutes into [`real_time`].  Timing
//! lives here only; the calculator stays a pure function of the
//! elapsed value it is given.  A meeting whose active time passes
//! [`crate::engine::MAX_MEETING_MINUTES`] ends the loop with the
//! calculator's error.

use crate::error::Result;
use crate::engine::real_time;
use crate::milestones::{milestones_crossed, notifiable, DEFAULT_NOTIFICATION_MILESTONES};
use crate::models::{PerMinuteCost, RealTimeResult};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

/// Wall-clock bookkeeping for one meeting, excluding paused intervals.
#[derive(Debug, Clone)]
pub struct MeetingClock {
    started_at: Instant,
    paused_total: Duration,
    paused_since: Option<Instant>,
}

impl MeetingClock {
    pub fn start() -> Self {
        Self::start_at(Instant::now())
    }

    pub fn start_at(now: Instant) -> Self {
        Self {
            started_at: now,
            paused_total: Duration::ZERO,
            paused_since: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    /// Returns `false` if the clock was already paused.
    pub fn pause_at(&mut self, now: Instant) -> bool {
        if self.paused_since.is_some() {
            return false;
        }
        self.paused_since = Some(now);
        true
    }

    /// Returns `false` if the clock was not paused.
    pub fn resume_at(&mut self, now: Instant) -> bool {
        match self.paused_since.take() {
            Some(since) => {
                self.paused_total += now.saturating_duration_since(since);
                true
            }
            None => false,
        }
    }

    /// Total paused time, including a pause still in progress.
    pub fn paused_at(&self, now: Instant) -> Duration {
        let current = self
            .paused_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or_default();
        self.paused_total + current
    }

    pub fn active_elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
            .saturating_sub(self.paused_at(now))
    }

    /// Active elapsed time in fractional minutes.
    pub fn active_minutes_at(&self, now: Instant) -> f64 {
        self.active_elapsed_at(now).as_secs_f64() / 60.0
    }

    /// Active elapsed time rounded to whole minutes, as recorded when a
    /// meeting is ended.
    pub fn settled_minutes_at(&self, now: Instant) -> f64 {
        self.active_minutes_at(now).round()
    }
}

/// Control messages accepted by [`run_live_ticker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerCommand {
    Pause,
    Resume,
    Stop,
}

#[derive(Debug, Clone)]
pub struct TickerConfig {
    pub interval: Duration,
    /// Milestones that should raise a notification when crossed.
    pub notify_at: Vec<u32>,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            notify_at: DEFAULT_NOTIFICATION_MILESTONES.to_vec(),
        }
    }
}

/// One emitted update of a running meeting.
#[derive(Debug, Clone)]
pub struct LiveTick<A> {
    pub result: RealTimeResult<A>,
    /// Milestones crossed since the previous tick.
    pub crossed: Vec<u32>,
    /// The subset of `crossed` that should notify.
    pub notify: Vec<u32>,
}

/// Final clock readings when the ticker stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerOutcome {
    pub active: Duration,
    pub paused: Duration,
    pub settled_minutes: f64,
}

/// Drive a live meeting until stopped.
///
/// Emits a [`LiveTick`] every `config.interval` while the meeting is not
/// paused.  The loop ends on [`TickerCommand::Stop`], when the command
/// channel is closed while no ticks are wanted any more, or when the
/// tick receiver is dropped.  A pause still in progress at stop time
/// counts as paused.
pub async fn run_live_ticker<A>(
    attendees: Vec<A>,
    config: TickerConfig,
    mut commands: mpsc::Receiver<TickerCommand>,
    ticks: mpsc::Sender<LiveTick<A>>,
) -> Result<TickerOutcome>
where
    A: PerMinuteCost + Clone,
{
    let mut clock = MeetingClock::start();
    let mut interval = tokio::time::interval(config.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut previous_minutes = 0.0;
    let mut commands_open = true;

    tracing::info!(attendees = attendees.len(), "live meeting tracking started");

    loop {
        tokio::select! {
            biased;
            command = commands.recv(), if commands_open => {
                let now = Instant::now();
                match command {
                    Some(TickerCommand::Pause) => {
                        if clock.pause_at(now) {
                            tracing::debug!("meeting paused");
                        }
                    }
                    Some(TickerCommand::Resume) => {
                        if clock.resume_at(now) {
                            tracing::debug!("meeting resumed");
                        }
                    }
                    Some(TickerCommand::Stop) => break,
                    None => commands_open = false,
                }
            }
            _ = interval.tick() => {
                if clock.is_paused() {
                    continue;
                }
                let elapsed = clock.active_minutes_at(Instant::now());
                let result = real_time(&attendees, elapsed)?;
                let crossed = milestones_crossed(previous_minutes, elapsed);
                let notify = notifiable(&crossed, &config.notify_at);
                for milestone in &notify {
                    tracing::info!(milestone, cost = result.current_cost, "meeting milestone reached");
                }
                previous_minutes = elapsed;
                if ticks.send(LiveTick { result, crossed, notify }).await.is_err() {
                    tracing::debug!("tick receiver dropped");
                    break;
                }
            }
        }
    }

    let now = Instant::now();
    let outcome = TickerOutcome {
        active: clock.active_elapsed_at(now),
        paused: clock.paused_at(now),
        settled_minutes: clock.settled_minutes_at(now),
    };
    tracing::info!(
        active_secs = outcome.active.as_secs(),
        paused_secs = outcome.paused.as_secs(),
        "live meeting tracking stopped"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attendee;

    #[test]
    fn clock_excludes_paused_time() {
        let t0 = Instant::now();
        let mut clock = MeetingClock::start_at(t0);
        assert!(clock.pause_at(t0 + Duration::from_secs(60)));
        assert!(!clock.pause_at(t0 + Duration::from_secs(70)));
        assert!(clock.is_paused());
        // still paused: elapsed is frozen
        assert_eq!(clock.active_elapsed_at(t0 + Duration::from_secs(90)), Duration::from_secs(60));
        assert!(clock.resume_at(t0 + Duration::from_secs(120)));
        assert!(!clock.resume_at(t0 + Duration::from_secs(121)));

        let end = t0 + Duration::from_secs(180);
        assert_eq!(clock.active_elapsed_at(end), Duration::from_secs(120));
        assert_eq!(clock.paused_at(end), Duration::from_secs(60));
        assert_eq!(clock.active_minutes_at(end), 2.0);
    }

    #[test]
    fn settled_minutes_round_to_nearest() {
        let t0 = Instant::now();
        let clock = MeetingClock::start_at(t0);
        assert_eq!(clock.settled_minutes_at(t0 + Duration::from_secs(29 * 60 + 29)), 29.0);
        assert_eq!(clock.settled_minutes_at(t0 + Duration::from_secs(29 * 60 + 31)), 30.0);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_reports_first_milestone() {
        let (command_tx, command_rx) = mpsc::channel(4);
        let (tick_tx, mut tick_rx) = mpsc::channel(8);
        let attendees = vec![Attendee::new(1.0), Attendee::new(2.5)];
        let handle = tokio::spawn(run_live_ticker(attendees, TickerConfig::default(), command_rx, tick_tx));

        let mut crossed = Vec::new();
        let mut last = None;
        for _ in 0..=60 {
            let tick = tick_rx.recv().await.unwrap();
            crossed.extend(tick.crossed.iter().copied());
            last = Some(tick.result);
        }
        let last = last.unwrap();
        assert_eq!(last.elapsed_minutes, 1.0);
        assert_eq!(last.current_cost, 3.5);
        assert_eq!(last.milestones_reached, vec![1]);
        assert_eq!(crossed, vec![1]);

        command_tx.send(TickerCommand::Stop).await.unwrap();
        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome.paused, Duration::ZERO);
        assert_eq!(outcome.settled_minutes, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_skips_paused_time() {
        let (command_tx, command_rx) = mpsc::channel(4);
        let (tick_tx, mut tick_rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_live_ticker(
            vec![Attendee::new(6.0)],
            TickerConfig::default(),
            command_rx,
            tick_tx,
        ));

        for _ in 0..3 {
            tick_rx.recv().await.unwrap();
        }
        command_tx.send(TickerCommand::Pause).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        command_tx.send(TickerCommand::Resume).await.unwrap();

        let tick = tick_rx.recv().await.unwrap();
        assert!((tick.result.elapsed_minutes - 2.5 / 60.0).abs() < 1e-9);

        command_tx.send(TickerCommand::Stop).await.unwrap();
        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome.paused, Duration::from_millis(10_500));
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_stops_when_receiver_dropped() {
        let (_command_tx, command_rx) = mpsc::channel(1);
        let (tick_tx, tick_rx) = mpsc::channel(1);
        drop(tick_rx);
        let outcome = run_live_ticker(vec![Attendee::new(1.0)], TickerConfig::default(), command_rx, tick_tx)
            .await
            .unwrap();
        assert_eq!(outcome.active, Duration::ZERO);
    }
}
