//! Transient, auto-dismissing status messages.
//!
//! # Overview
//! [`Notifier::show`] appends a [`Notification`] to an in-memory display queue
//! and returns at once. After the notification's ttl it turns
//! [`NotificationState::Dismissing`], and after a further fixed delay it is
//! removed. Both deadlines are handled by the
//! [`DismissalScheduler`](crate::scheduler), so any number of notifications
//! run their timelines independently.
//!
//! Rendering is delegated to a [`NotificationSink`]; the queue itself is the
//! source of truth, and [`Notifier::active`] returns it in creation order.
//!
//! There is deliberately no way to cancel, edit, or look up a single
//! notification: callers fire and forget.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::scheduler::{DismissalJob, DismissalScheduler};

/// Severity of a notification, mirrored in the CSS class a browser renderer
/// would use (`notification-info`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Info,
    Success,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationState {
    Visible,
    /// The ttl has elapsed; the exit transition is running.
    Dismissing,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub level: Level,
    pub created_at: Instant,
    pub ttl: Duration,
    pub state: NotificationState,
}

/// Returned by `show`. Identifies the notification but grants no control
/// over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationHandle {
    pub id: Uuid,
    pub created_at: Instant,
}

/// A rendering target for notifications.
///
/// Hooks run on the thread that triggered the transition: `shown` inside
/// `Notifier::show`, the others inside the scheduler task. They are called
/// with the queue unlocked.
pub trait NotificationSink: Send + Sync {
    fn shown(&self, notification: &Notification);

    fn dismissing(&self, _notification: &Notification) {}

    fn removed(&self, notification: &Notification);
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn shown(&self, notification: &Notification) {
        match notification.level {
            Level::Error => tracing::error!(id = %notification.id, "{}", notification.message),
            Level::Info | Level::Success => tracing::info!(
                id = %notification.id,
                level = %notification.level,
                "{}",
                notification.message
            ),
        }
    }

    fn removed(&self, notification: &Notification) {
        tracing::debug!(id = %notification.id, "notification removed");
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn shown(&self, _notification: &Notification) {}

    fn removed(&self, _notification: &Notification) {}
}

/// State shared between `Notifier` handles and the scheduler task.
pub(crate) struct Shared {
    queue: Mutex<Vec<Notification>>,
    sink: Box<dyn NotificationSink>,
}

impl Shared {
    fn queue(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, notification: Notification) {
        self.queue().push(notification.clone());
        self.sink.shown(&notification);
    }

    pub(crate) fn begin_dismissal(&self, id: Uuid) {
        let dismissed = {
            let mut queue = self.queue();
            queue.iter_mut().find(|n| n.id == id).map(|n| {
                n.state = NotificationState::Dismissing;
                n.clone()
            })
        };
        if let Some(notification) = dismissed {
            self.sink.dismissing(&notification);
        }
    }

    pub(crate) fn remove(&self, id: Uuid) {
        let removed = {
            let mut queue = self.queue();
            queue
                .iter()
                .position(|n| n.id == id)
                .map(|index| queue.remove(index))
        };
        match removed {
            Some(notification) => self.sink.removed(&notification),
            None => tracing::warn!(%id, "notification already removed"),
        }
    }
}

/// Handle to the display queue. Cheap to clone; all clones share one queue
/// and one scheduler.
#[derive(Clone)]
pub struct Notifier {
    shared: Arc<Shared>,
    jobs: mpsc::UnboundedSender<DismissalJob>,
    ttl: Duration,
    dismiss_delay: Duration,
}

impl Notifier {
    /// Create a notifier with the default timings (3000 ms ttl, 300 ms exit).
    ///
    /// Spawns the dismissal scheduler, so this must be called from within a
    /// tokio runtime. Pass [`TracingSink`] to send notifications to the log.
    pub fn new(sink: impl NotificationSink + 'static) -> Self {
        Self::from_config(&ClientConfig::default(), sink)
    }

    pub fn from_config(config: &ClientConfig, sink: impl NotificationSink + 'static) -> Self {
        Self::with_timings(sink, config.notification_ttl, config.dismiss_delay)
    }

    pub fn with_timings(
        sink: impl NotificationSink + 'static,
        ttl: Duration,
        dismiss_delay: Duration,
    ) -> Self {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Vec::new()),
            sink: Box::new(sink),
        });
        let (jobs, receiver) = mpsc::unbounded_channel();
        tokio::spawn(DismissalScheduler::new(Arc::clone(&shared), receiver).run());

        Self {
            shared,
            jobs,
            ttl,
            dismiss_delay,
        }
    }

    /// Show `message` with the default ttl.
    pub fn show(&self, message: impl Into<String>, level: Level) -> NotificationHandle {
        self.show_with_ttl(message, level, self.ttl)
    }

    pub fn show_with_ttl(
        &self,
        message: impl Into<String>,
        level: Level,
        ttl: Duration,
    ) -> NotificationHandle {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            level,
            created_at: Instant::now(),
            ttl,
            state: NotificationState::Visible,
        };
        let handle = NotificationHandle {
            id: notification.id,
            created_at: notification.created_at,
        };

        let dismiss_at = handle.created_at + ttl;
        self.shared.insert(notification);

        let job = DismissalJob {
            id: handle.id,
            dismiss_at,
            remove_at: dismiss_at + self.dismiss_delay,
        };
        if self.jobs.send(job).is_err() {
            tracing::warn!(id = %handle.id, "dismissal scheduler is gone, notification will stay visible");
        }
        handle
    }

    /// Snapshot of the display queue, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.shared.queue().clone()
    }

    pub fn default_ttl(&self) -> Duration {
        self.ttl
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("active", &self.shared.queue().len())
            .field("ttl", &self.ttl)
            .field("dismiss_delay", &self.dismiss_delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;
    use crate::test_support::{RecordingSink, SinkEvent};

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[tokio::test(start_paused = true)]
    async fn notification_lives_for_ttl_then_dismisses_and_is_removed() {
        let notifier = Notifier::new(NoopSink);
        let handle = notifier.show("Commande livrée", Level::Success);

        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, handle.id);
        assert_eq!(active[0].state, NotificationState::Visible);

        sleep(ms(2999)).await;
        assert_eq!(notifier.active()[0].state, NotificationState::Visible);

        sleep(ms(2)).await;
        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].state, NotificationState::Dismissing);

        sleep(ms(298)).await;
        assert_eq!(notifier.active().len(), 1, "still running exit transition at 3299ms");

        sleep(ms(2)).await;
        assert!(notifier.active().is_empty(), "removed by 3301ms");
    }

    #[tokio::test(start_paused = true)]
    async fn show_is_synchronous_and_keeps_call_order() {
        let notifier = Notifier::new(NoopSink);
        let first = notifier.show("un", Level::Info);
        let second = notifier.show("deux", Level::Error);
        let third = notifier.show("trois", Level::Success);

        let ids: Vec<Uuid> = notifier.active().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_five_follows_independent_timelines() {
        let notifier = Notifier::new(NoopSink);
        for i in 0..5 {
            notifier.show(format!("message {i}"), Level::Info);
            sleep(ms(100)).await;
        }
        // t = 500ms: all five visible.
        assert_eq!(notifier.active().len(), 5);

        // t = 3050ms: the first is dismissing, the rest untouched.
        sleep(ms(2550)).await;
        let states: Vec<NotificationState> = notifier.active().iter().map(|n| n.state).collect();
        assert_eq!(states[0], NotificationState::Dismissing);
        assert!(states[1..].iter().all(|s| *s == NotificationState::Visible));

        // t = 3350ms: only the first is gone.
        sleep(ms(300)).await;
        let messages: Vec<String> = notifier.active().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["message 1", "message 2", "message 3", "message 4"]);

        // t = 3750ms: everything is gone.
        sleep(ms(400)).await;
        assert!(notifier.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn custom_ttl_is_independent_of_default() {
        let notifier = Notifier::new(NoopSink);
        let long = notifier.show_with_ttl("long", Level::Info, ms(10_000));
        notifier.show("short", Level::Info);

        sleep(ms(3400)).await;
        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, long.id);

        sleep(ms(7000)).await;
        assert!(notifier.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sink_sees_each_transition_exactly_once() {
        let sink = RecordingSink::default();
        let notifier = Notifier::new(sink.clone());
        let a = notifier.show("a", Level::Info);
        let b = notifier.show("b", Level::Error);

        sleep(ms(4000)).await;

        let events = sink.events();
        for id in [a.id, b.id] {
            for kind in [SinkEvent::Shown, SinkEvent::Dismissing, SinkEvent::Removed] {
                let count = events.iter().filter(|(e, n)| *e == kind && n.id == id).count();
                assert_eq!(count, 1, "{kind:?} for {id}");
            }
        }
        assert!(notifier.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_one_queue() {
        let notifier = Notifier::new(NoopSink);
        let clone = notifier.clone();
        clone.show("depuis le clone", Level::Info);
        assert_eq!(notifier.active().len(), 1);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn tracing_sink_logs_shown_notifications() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let notifier = Notifier::new(TracingSink);
        tracing::subscriber::with_default(subscriber, || {
            notifier.show("Erreur de connexion à l'API", Level::Error);
            notifier.show("Trajets optimisés", Level::Success);
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2, "{output}");
        assert!(lines[0].contains("ERROR") && lines[0].contains("Erreur de connexion à l'API"));
        assert!(lines[1].contains("INFO") && lines[1].contains("level=success"));
        assert_eq!(notifier.active().len(), 2);
    }

    #[test]
    fn level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Level::Success).unwrap(), "\"success\"");
        assert_eq!(Level::default(), Level::Info);
    }
}
