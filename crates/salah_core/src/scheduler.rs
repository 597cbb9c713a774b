//! The reminder state machine.
//!
//! The machine owns its state and never sleeps or fetches itself: every
//! transition returns the events to announce plus a [`Command`] telling the
//! driver what to do next. A single firing horizon records that every event
//! at or before it has been handled, which keeps events from firing twice
//! no matter how late the driver wakes up.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use salah_types::{EventKind, SalahError, SalahTimesPayload, ScheduledEvent, TimeSlot};
use smallvec::SmallVec;
use std::sync::Arc;

use crate::config::ReminderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Uninitialized,
    AwaitingPayload,
    RetryPending { until: NaiveDateTime },
    Armed { at: NaiveDateTime },
    Fired,
}

/// What the driver must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Build a fresh payload for the current date.
    Refresh,
    /// Call [`ReminderScheduler::on_timer`] at this instant.
    WakeAt(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Events to announce, in firing order.
    pub fired: Vec<ScheduledEvent>,
    pub command: Command,
}

/// Which optional reminders are wanted. Adhaan reminders always are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderFilter {
    pub sunrise: bool,
    pub iqamah: bool,
}

impl Default for ReminderFilter {
    fn default() -> Self {
        Self { sunrise: true, iqamah: true }
    }
}

impl ReminderFilter {
    pub fn allows(&self, event: &ScheduledEvent) -> bool {
        match (event.slot, event.kind) {
            (TimeSlot::Sunrise, _) => self.sunrise,
            (_, EventKind::Iqamah) => self.iqamah,
            (_, EventKind::Adhaan) => true,
        }
    }
}

/// Every wanted event in the payload, sorted.
pub fn payload_events(
    payload: &SalahTimesPayload,
    filter: ReminderFilter,
) -> SmallVec<[ScheduledEvent; 33]> {
    [payload.yesterday(), payload.today(), payload.tomorrow()]
        .into_iter()
        .flat_map(|day| day.events())
        .filter(|event| filter.allows(event))
        .collect()
}

/// The first wanted event strictly after `after`.
pub fn next_event(
    payload: &SalahTimesPayload,
    after: NaiveDateTime,
    filter: ReminderFilter,
) -> Option<ScheduledEvent> {
    payload_events(payload, filter)
        .into_iter()
        .find(|event| event.firing_time > after)
}

/// Midnight after the payload's center day; the payload is stale from then on.
pub fn rollover(payload: &SalahTimesPayload) -> NaiveDateTime {
    payload.tomorrow().date().and_time(NaiveTime::MIN)
}

#[derive(Debug)]
pub struct ReminderScheduler {
    state: SchedulerState,
    payload: Option<Arc<SalahTimesPayload>>,
    horizon: Option<NaiveDateTime>,
    retry_backoff: Duration,
    filter: ReminderFilter,
    failures: u32,
}

impl ReminderScheduler {
    pub fn new(retry_backoff: Duration, filter: ReminderFilter) -> Self {
        Self {
            state: SchedulerState::Uninitialized,
            payload: None,
            horizon: None,
            retry_backoff,
            filter,
            failures: 0,
        }
    }

    pub fn from_config(config: &ReminderConfig) -> Self {
        Self::new(config.retry_backoff(), config.filter())
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Last successful payload, kept through failed refreshes.
    pub fn payload(&self) -> Option<Arc<SalahTimesPayload>> {
        self.payload.clone()
    }

    /// Consecutive failed refreshes.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn start(&mut self) -> Command {
        self.state = SchedulerState::AwaitingPayload;
        tracing::debug!("scheduler started, requesting salah times");
        Command::Refresh
    }

    pub fn on_payload(
        &mut self,
        result: Result<SalahTimesPayload, SalahError>,
        now: NaiveDateTime,
    ) -> Transition {
        match result {
            Err(err) => {
                self.failures += 1;
                let until = now + self.retry_backoff;
                tracing::warn!(
                    attempt = self.failures,
                    retry_at = %until,
                    error = %err,
                    "salah times unavailable"
                );
                self.state = SchedulerState::RetryPending { until };
                Transition { fired: Vec::new(), command: Command::WakeAt(until) }
            }
            Ok(payload) => {
                self.failures = 0;
                self.payload = Some(Arc::new(payload));
                // A payload built before midnight but delivered after it says
                // nothing about the new day; leave the horizon for the next one.
                if self.is_stale(now) {
                    return self.refresh(Vec::new());
                }
                let fired = match self.horizon {
                    None => {
                        self.horizon = Some(now);
                        Vec::new()
                    }
                    Some(_) => self.catch_up(now),
                };
                self.arm(now, fired)
            }
        }
    }

    pub fn on_timer(&mut self, now: NaiveDateTime) -> Transition {
        match self.state {
            SchedulerState::Armed { .. } | SchedulerState::Fired => {
                // Past rollover the old payload cannot tell which missed event
                // was the latest; the refreshed one catches up instead.
                if self.is_stale(now) {
                    return self.refresh(Vec::new());
                }
                self.state = SchedulerState::Fired;
                let fired = self.catch_up(now);
                self.arm(now, fired)
            }
            SchedulerState::Uninitialized
            | SchedulerState::AwaitingPayload
            | SchedulerState::RetryPending { .. } => {
                self.state = SchedulerState::AwaitingPayload;
                Transition { fired: Vec::new(), command: Command::Refresh }
            }
        }
    }

    fn is_stale(&self, now: NaiveDateTime) -> bool {
        self.payload.as_deref().is_some_and(|payload| now >= rollover(payload))
    }

    fn refresh(&mut self, fired: Vec<ScheduledEvent>) -> Transition {
        if let Some(payload) = self.payload.as_deref() {
            tracing::info!(date = %payload.date(), "day rolled over, refreshing");
        }
        self.state = SchedulerState::AwaitingPayload;
        Transition { fired, command: Command::Refresh }
    }

    /// Everything due in `(horizon, now]`, reduced to the latest instant.
    fn catch_up(&mut self, now: NaiveDateTime) -> Vec<ScheduledEvent> {
        let (Some(payload), Some(horizon)) = (self.payload.as_deref(), self.horizon) else {
            return Vec::new();
        };
        let due: SmallVec<[ScheduledEvent; 33]> = payload_events(payload, self.filter)
            .into_iter()
            .filter(|event| event.firing_time > horizon && event.firing_time <= now)
            .collect();
        self.horizon = Some(horizon.max(now));

        let Some(latest) = due.last().map(|event| event.firing_time) else {
            return Vec::new();
        };
        let skipped = due.iter().filter(|event| event.firing_time < latest).count();
        if skipped > 0 {
            tracing::info!(skipped, "reminders missed while suspended were dropped");
        }
        let fired: Vec<ScheduledEvent> =
            due.into_iter().filter(|event| event.firing_time == latest).collect();
        for event in &fired {
            tracing::info!(
                slot = %event.slot,
                kind = ?event.kind,
                at = %event.firing_time,
                "reminder due"
            );
        }
        fired
    }

    fn arm(&mut self, now: NaiveDateTime, fired: Vec<ScheduledEvent>) -> Transition {
        let Some(payload) = self.payload.as_deref() else {
            self.state = SchedulerState::AwaitingPayload;
            return Transition { fired, command: Command::Refresh };
        };

        let rollover = rollover(payload);
        if now >= rollover {
            return self.refresh(fired);
        }

        let after = self.horizon.unwrap_or(now);
        let at = match next_event(payload, after, self.filter) {
            Some(event) if event.firing_time < rollover => event.firing_time,
            _ => rollover,
        };
        tracing::debug!(%at, "armed");
        self.state = SchedulerState::Armed { at };
        Transition { fired, command: Command::WakeAt(at) }
    }
}
