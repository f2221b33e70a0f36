//! Monitoring engine
//!
//! Top-level state machine driving repeated poll cycles: single-flight
//! execution, countdown bookkeeping and error surfacing. Composes the
//! aggregator, the classifier and the notifier; owns its state exclusively
//! so independent monitors never interfere (important under test).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch, RwLock};
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::config::Settings;
use crate::models::UrgentTask;
use crate::services::aggregator::TaskSource;
use crate::services::classifier::{classify, reference_today, ClassifierContext, DueDatePolicy};
use crate::services::notifier::Notifier;
use crate::utils::{MonitorError, MonitorResult};

/// Scheduler lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    /// Idle between cycles
    Running,
    /// A cycle is in flight
    Checking,
}

/// Monitor-owned state, exposed to callers as a snapshot
#[derive(Debug, Clone)]
pub struct MonitorState {
    pub phase: Phase,
    pub next_check_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Countdown display state, recomputed once per second while running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownView {
    /// Not running
    Idle,
    /// Seconds until the next scheduled cycle
    Remaining(u64),
    /// The countdown reached zero and the cycle is in flight
    InProgress,
}

impl CountdownView {
    /// Renders the countdown the way the task list header shows it
    pub fn render(&self) -> String {
        match self {
            CountdownView::Idle => "--:--".to_string(),
            CountdownView::Remaining(secs) => format!("{:02}:{:02}", secs / 60, secs % 60),
            CountdownView::InProgress => "確認中...".to_string(),
        }
    }
}

/// Everything the monitor tells the outside world goes through one channel
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// Fresh result set for rendering, in input order. Emitted before
    /// announcements start, so the list is visible while audio plays.
    TasksRefreshed { tasks: Vec<UrgentTask> },
    /// Cycle finished, announcements included; next check scheduled
    /// (None when stop() arrived mid-cycle)
    CycleCompleted { next_check_at: Option<DateTime<Utc>> },
    /// Cycle aborted by an error; the timer keeps running
    CycleFailed { message: String },
    /// Once-per-second countdown display update
    Countdown(CountdownView),
}

/// Polling monitor for urgent tasks
#[derive(Clone)]
pub struct TaskMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    settings: Settings,
    source: Arc<dyn TaskSource>,
    notifier: Notifier,
    policy: DueDatePolicy,
    state: RwLock<MonitorState>,
    checking: AtomicBool,
    events: broadcast::Sender<MonitorEvent>,
    // true = stopped. Timer loops watch this instead of being aborted,
    // so an in-flight cycle always runs to completion.
    shutdown: watch::Sender<bool>,
}

impl TaskMonitor {
    pub fn new(settings: Settings, source: Arc<dyn TaskSource>, notifier: Notifier) -> Self {
        let policy = if settings.watch.board_id.is_some() {
            DueDatePolicy::SameDayOnly
        } else {
            DueDatePolicy::IncludeOverdue
        };

        let (events, _) = broadcast::channel(64);
        let (shutdown, _) = watch::channel(true);

        Self {
            inner: Arc::new(MonitorInner {
                settings,
                source,
                notifier,
                policy,
                state: RwLock::new(MonitorState {
                    phase: Phase::Stopped,
                    next_check_at: None,
                    last_error: None,
                }),
                checking: AtomicBool::new(false),
                events,
                shutdown,
            }),
        }
    }

    /// Subscribes to cycle-completion, error and countdown events
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.inner.events.subscribe()
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> MonitorState {
        self.inner.state.read().await.clone()
    }

    /// Validates settings, runs one cycle immediately (awaited), then arms
    /// the repeating cycle timer and the 1-second countdown timer
    pub async fn start(&self) -> MonitorResult<()> {
        self.inner.settings.validate().map_err(MonitorError::Config)?;

        {
            let mut state = self.inner.state.write().await;
            if state.phase != Phase::Stopped {
                tracing::warn!("monitor already running");
                return Ok(());
            }
            state.phase = Phase::Running;
        }
        let _ = self.inner.shutdown.send(false);

        tracing::info!(
            "▶️ monitor started (interval {}ms)",
            self.poll_interval().as_millis()
        );

        // 初回チェック
        self.run_cycle().await;

        self.spawn_cycle_timer();
        self.spawn_countdown_timer();

        Ok(())
    }

    /// Cancels both timers and discards the countdown target. An in-flight
    /// cycle runs to completion and its result is still published, but no
    /// further cycle is scheduled. Safe to call when already stopped.
    pub async fn stop(&self) {
        {
            let mut state = self.inner.state.write().await;
            if state.phase == Phase::Stopped {
                return;
            }
            state.phase = Phase::Stopped;
            state.next_check_at = None;
        }
        let _ = self.inner.shutdown.send(true);
        let _ = self
            .inner
            .events
            .send(MonitorEvent::Countdown(CountdownView::Idle));

        tracing::info!("⏹️ monitor stopped");
    }

    /// Manual trigger sharing the scheduler's single-flight guard
    pub async fn check_now(&self) {
        self.run_cycle().await;
    }

    /// One fetch→classify→announce pass. An invocation arriving while a
    /// cycle is in flight is a no-op and leaves that cycle untouched.
    async fn run_cycle(&self) {
        if self
            .inner
            .checking
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("cycle already in flight, skipping tick");
            return;
        }

        let cycle_id = short_id();
        {
            let mut state = self.inner.state.write().await;
            state.phase = Phase::Checking;
        }
        tracing::debug!("[{}] cycle started", cycle_id);

        let outcome = self.execute_cycle(&cycle_id).await;

        let stopped = *self.inner.shutdown.borrow();
        let next_check_at = if stopped {
            None
        } else {
            Some(Utc::now() + chrono::Duration::milliseconds(self.poll_interval_ms() as i64))
        };

        {
            let mut state = self.inner.state.write().await;
            match &outcome {
                Ok(count) => {
                    state.last_error = None;
                    tracing::info!("[{}] cycle finished: {} urgent task(s)", cycle_id, count);
                }
                Err(e) => {
                    state.last_error = Some(e.to_string());
                    tracing::error!("[{}] cycle failed: {}", cycle_id, e);
                }
            }
            state.next_check_at = next_check_at;
            state.phase = if stopped { Phase::Stopped } else { Phase::Running };
        }

        match outcome {
            Ok(_) => {
                let _ = self
                    .inner
                    .events
                    .send(MonitorEvent::CycleCompleted { next_check_at });
            }
            Err(e) => {
                let _ = self.inner.events.send(MonitorEvent::CycleFailed {
                    message: e.to_string(),
                });
            }
        }

        self.inner.checking.store(false, Ordering::SeqCst);
    }

    async fn execute_cycle(&self, cycle_id: &str) -> MonitorResult<usize> {
        let raw_tasks = self.inner.source.fetch().await?;
        tracing::debug!("[{}] fetched {} raw task(s)", cycle_id, raw_tasks.len());

        let ctx = ClassifierContext {
            watched_user_id: self.inner.settings.watch.user_id.clone(),
            columns: self.inner.settings.columns.clone(),
            policy: self.inner.policy,
            today: reference_today(),
        };

        let urgent: Vec<UrgentTask> = raw_tasks
            .iter()
            .filter_map(|task| classify(task, &ctx))
            .collect();

        let _ = self.inner.events.send(MonitorEvent::TasksRefreshed {
            tasks: urgent.clone(),
        });

        if !urgent.is_empty() {
            let failed = self.inner.notifier.announce_all(&urgent).await;
            if failed > 0 {
                tracing::warn!(
                    "[{}] {} of {} announcement(s) failed",
                    cycle_id,
                    failed,
                    urgent.len()
                );
            }
        }

        Ok(urgent.len())
    }

    fn spawn_cycle_timer(&self) {
        let monitor = self.clone();
        let mut shutdown = self.inner.shutdown.subscribe();
        let period = self.poll_interval();

        tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        monitor.run_cycle().await;
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::debug!("cycle timer released");
        });
    }

    fn spawn_countdown_timer(&self) {
        let monitor = self.clone();
        let mut shutdown = self.inner.shutdown.subscribe();

        tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(1));

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if *shutdown.borrow() {
                            break;
                        }
                        let view = monitor.countdown_view().await;
                        let _ = monitor
                            .inner
                            .events
                            .send(MonitorEvent::Countdown(view));
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::debug!("countdown timer released");
        });
    }

    /// Remaining time until the next cycle, or the in-progress marker once
    /// the countdown reaches zero
    async fn countdown_view(&self) -> CountdownView {
        let state = self.inner.state.read().await;
        match state.phase {
            Phase::Stopped => CountdownView::Idle,
            Phase::Checking => CountdownView::InProgress,
            Phase::Running => match state.next_check_at {
                Some(at) => {
                    let remaining = (at - Utc::now()).num_seconds();
                    if remaining <= 0 {
                        CountdownView::InProgress
                    } else {
                        CountdownView::Remaining(remaining as u64)
                    }
                }
                None => CountdownView::Idle,
            },
        }
    }

    fn poll_interval_ms(&self) -> u64 {
        self.inner.settings.monitor.poll_interval_ms
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms())
    }
}

/// Short correlation id for cycle log lines
fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
