//! Tokio driver for the reminder state machine.
//!
//! One task owns the scheduler, the source and the sink. It waits on a
//! single future at a time (either the payload fetch or the timer), raced
//! against the control channel so a location change drops whatever is
//! pending.

use chrono::{Local, NaiveDateTime};
use salah_network::SalahSource;
use salah_types::{SalahError, SalahTimesPayload};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::ReminderConfig;
use crate::notify::{compose, NotificationSink};
use crate::payload::build_payload;
use crate::scheduler::{Command, ReminderScheduler, Transition};

/// Longest single sleep. Waking periodically lets the loop notice wall
/// clock jumps and system suspend, which a monotonic sleep does not see.
pub const MAX_NAP: std::time::Duration = std::time::Duration::from_secs(60);

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

pub type PayloadWatch = watch::Receiver<Option<Arc<SalahTimesPayload>>>;

enum Control<S> {
    Replace(S),
    Shutdown,
}

enum Wake<S> {
    Fetched(Result<SalahTimesPayload, SalahError>),
    Timer,
    Control(Option<Control<S>>),
}

pub struct ReminderService;

impl ReminderService {
    /// Spawns the reminder loop on the current tokio runtime.
    pub fn spawn<S, N, C>(
        source: S,
        sink: N,
        clock: C,
        config: &ReminderConfig,
    ) -> ReminderHandle<S>
    where
        S: SalahSource + 'static,
        N: NotificationSink + 'static,
        C: Clock + 'static,
    {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let (payload_tx, payload_rx) = watch::channel(None);
        let runner = Runner {
            source,
            sink,
            clock,
            config: config.clone(),
            control: control_rx,
            payload: payload_tx,
        };
        let task = tokio::spawn(runner.run());
        ReminderHandle {
            control: control_tx,
            payload: payload_rx,
            task,
        }
    }
}

/// Owner-side handle to a running [`ReminderService`].
pub struct ReminderHandle<S> {
    control: mpsc::UnboundedSender<Control<S>>,
    payload: PayloadWatch,
    task: JoinHandle<()>,
}

impl<S> ReminderHandle<S> {
    /// The last successfully built payload, if any.
    pub fn current_payload(&self) -> Option<Arc<SalahTimesPayload>> {
        self.payload.borrow().clone()
    }

    /// A receiver that observes every published payload.
    pub fn subscribe(&self) -> PayloadWatch {
        self.payload.clone()
    }

    /// Switches location. Pending timers and fetches for the old source are
    /// dropped and the machine starts over.
    pub fn replace_source(&self, source: S) -> Result<(), SalahError> {
        self.control
            .send(Control::Replace(source))
            .map_err(|_| SalahError::unavailable("reminder service has stopped"))
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub async fn shutdown(self) {
        let _ = self.control.send(Control::Shutdown);
        if let Err(err) = self.task.await {
            tracing::warn!(error = %err, "reminder task ended abnormally");
        }
    }
}

struct Runner<S, N, C> {
    source: S,
    sink: N,
    clock: C,
    config: ReminderConfig,
    control: mpsc::UnboundedReceiver<Control<S>>,
    payload: watch::Sender<Option<Arc<SalahTimesPayload>>>,
}

impl<S, N, C> Runner<S, N, C>
where
    S: SalahSource,
    N: NotificationSink,
    C: Clock,
{
    async fn run(mut self) {
        tracing::info!(location = %self.source.location(), "reminder service started");
        let mut scheduler = ReminderScheduler::from_config(&self.config);
        let mut command = scheduler.start();

        loop {
            let wake = match command {
                Command::Refresh => {
                    let today = self.clock.now().date();
                    tokio::select! {
                        result = build_payload(&self.source, today) => Wake::Fetched(result),
                        control = self.control.recv() => Wake::Control(control),
                    }
                }
                Command::WakeAt(at) => {
                    let delay = (at - self.clock.now()).to_std().unwrap_or_default().min(MAX_NAP);
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => Wake::Timer,
                        control = self.control.recv() => Wake::Control(control),
                    }
                }
            };

            let transition = match wake {
                Wake::Fetched(result) => {
                    let transition = scheduler.on_payload(result, self.clock.now());
                    self.payload.send_replace(scheduler.payload());
                    transition
                }
                Wake::Timer => match command {
                    Command::WakeAt(at) if self.clock.now() < at => continue,
                    _ => scheduler.on_timer(self.clock.now()),
                },
                Wake::Control(Some(Control::Replace(source))) => {
                    tracing::info!(
                        from = %self.source.location(),
                        to = %source.location(),
                        "switching location"
                    );
                    self.source = source;
                    self.payload.send_replace(None);
                    scheduler = ReminderScheduler::from_config(&self.config);
                    command = scheduler.start();
                    continue;
                }
                Wake::Control(Some(Control::Shutdown) | None) => break,
            };

            self.deliver(&transition, &scheduler);
            command = transition.command;
        }

        tracing::info!("reminder service stopped");
    }

    fn deliver(&self, transition: &Transition, scheduler: &ReminderScheduler) {
        let Some(payload) = scheduler.payload() else {
            return;
        };
        for event in &transition.fired {
            let notification = compose(event, &payload);
            self.sink.notify(&notification.title, &notification.body);
        }
    }
}
