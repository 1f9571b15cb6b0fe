//! Sliding-window inactivity monitor.
//!
//! One timer task owns the `Active -> Warning -> Expired` lifecycle. A
//! single deadline is armed at a time; an activity event re-arms it instead
//! of stacking another. Token replacement rides on the `touch` hook.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// Inactivity window before forced sign-out.
    pub max_age: Duration,
    /// How long before sign-out the warning surfaces.
    pub warning_threshold: Duration,
    /// Pause between sign-out and the login redirect, so the "session
    /// expired" notice has a moment to surface.
    pub redirect_delay: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(30 * 60),
            warning_threshold: Duration::from_secs(5 * 60),
            redirect_delay: Duration::from_secs(1),
        }
    }
}

/// Capabilities the surrounding session layer exposes to the monitor.
#[async_trait]
pub trait SessionActions: Send + Sync {
    /// Terminate the session; called exactly once, when the window elapses.
    async fn sign_out(&self);

    /// Re-issuance hook, invoked on every recorded activity. Implementations
    /// decide whether and when continued use refreshes the underlying token.
    async fn touch(&self) {}
}

/// User-visible outcomes, in the order they may occur within one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Surfaced at most once per inactivity window.
    Warning { remaining: Duration },
    SignedOut,
    RedirectToLogin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Active,
    /// Warning already surfaced for the current window.
    Warning,
}

/// Handle to the running timer task. Dropping it (or calling [`shutdown`])
/// cancels every pending callback; nothing fires after teardown.
///
/// [`shutdown`]: InactivityMonitor::shutdown
pub struct InactivityMonitor {
    activity_tx: mpsc::UnboundedSender<()>,
    handle: JoinHandle<()>,
}

impl InactivityMonitor {
    pub fn start(
        config: MonitorConfig,
        actions: Arc<dyn SessionActions>,
        events: mpsc::UnboundedSender<MonitorEvent>,
    ) -> Self {
        let (activity_tx, activity_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(config, actions, events, activity_rx));
        Self {
            activity_tx,
            handle,
        }
    }

    /// Feed one user activity event (pointer press, key press, scroll, touch,
    /// click). Resets the window to "now"; safe to call at any rate.
    pub fn record_activity(&self) {
        let _ = self.activity_tx.send(());
    }

    /// Explicit teardown: cancels the pending warning and logout immediately.
    /// Re-authentication starts a fresh monitor, never resumes this one.
    pub fn shutdown(self) {
        self.handle.abort();
    }

    /// True once the monitor has signed the session out (or was torn down).
    pub fn is_terminated(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for InactivityMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    config: MonitorConfig,
    actions: Arc<dyn SessionActions>,
    events: mpsc::UnboundedSender<MonitorEvent>,
    mut activity_rx: mpsc::UnboundedReceiver<()>,
) {
    let warning_lead = config.max_age.saturating_sub(config.warning_threshold);
    let mut last_activity = Instant::now();
    let mut phase = Phase::Active;

    loop {
        let deadline = match phase {
            Phase::Active => last_activity + warning_lead,
            Phase::Warning => last_activity + config.max_age,
        };

        tokio::select! {
            received = activity_rx.recv() => {
                match received {
                    Some(()) => {
                        // Collapse a burst of same-instant events into one
                        // reset: exactly one warning and one logout stay
                        // scheduled, not N.
                        while activity_rx.try_recv().is_ok() {}
                        last_activity = Instant::now();
                        phase = Phase::Active;
                        actions.touch().await;
                    }
                    None => break,
                }
            }
            _ = sleep_until(deadline) => {
                match phase {
                    Phase::Active => {
                        tracing::debug!("inactivity warning threshold reached");
                        let _ = events.send(MonitorEvent::Warning {
                            remaining: config.warning_threshold,
                        });
                        phase = Phase::Warning;
                    }
                    Phase::Warning => {
                        tracing::info!("inactivity window elapsed; signing out");
                        actions.sign_out().await;
                        let _ = events.send(MonitorEvent::SignedOut);
                        sleep(config.redirect_delay).await;
                        let _ = events.send(MonitorEvent::RedirectToLogin);
                        break;
                    }
                }
            }
        }
    }
}
