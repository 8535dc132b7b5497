//! Fire-and-forget notification emitter.

use std::sync::Arc;
use std::time::Duration;

use lingochat_types::config::NotificationConfig;
use lingochat_types::notification::NotificationEvent;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use super::sink::BoxNotificationSink;

/// Publishes events on background tasks so the request path never waits
/// on the sink.
///
/// Clones share the sink and the set of in-flight publishes; `shutdown` on
/// any clone drains all of them.
#[derive(Debug, Clone)]
pub struct NotificationEmitter {
    sink: Option<Arc<BoxNotificationSink>>,
    tracker: TaskTracker,
    publish_timeout: Duration,
}

impl NotificationEmitter {
    pub fn new(sink: BoxNotificationSink, publish_timeout: Duration) -> Self {
        Self {
            sink: Some(Arc::new(sink)),
            tracker: TaskTracker::new(),
            publish_timeout,
        }
    }

    pub fn from_config(sink: Option<BoxNotificationSink>, config: &NotificationConfig) -> Self {
        let timeout = Duration::from_millis(config.publish_timeout_ms);
        match sink {
            Some(sink) => Self::new(sink, timeout),
            None => Self {
                sink: None,
                tracker: TaskTracker::new(),
                publish_timeout: timeout,
            },
        }
    }

    /// An emitter with no sink. Every event is dropped with a warning.
    pub fn disabled() -> Self {
        Self::from_config(None, &NotificationConfig::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Number of publishes still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Queue an event for delivery. Returns immediately.
    pub fn emit(&self, event: NotificationEvent) {
        let Some(sink) = self.sink.as_ref().map(Arc::clone) else {
            warn!(kind = %event.kind, "Notification sink not configured, dropping event");
            return;
        };
        if self.tracker.is_closed() {
            warn!(kind = %event.kind, "Notification emitter shut down, dropping event");
            return;
        }

        let publish_timeout = self.publish_timeout;
        self.tracker.spawn(async move {
            match tokio::time::timeout(publish_timeout, sink.publish(&event)).await {
                Ok(Ok(())) => {
                    debug!(kind = %event.kind, sink = sink.name(), "Notification published");
                }
                Ok(Err(e)) => {
                    warn!(kind = %event.kind, sink = sink.name(), error = %e, "Failed to publish notification");
                }
                Err(_) => {
                    warn!(
                        kind = %event.kind,
                        sink = sink.name(),
                        timeout_ms = publish_timeout.as_millis() as u64,
                        "Notification publish timed out"
                    );
                }
            }
        });
    }

    /// Stop accepting events, wait for in-flight publishes, then close the
    /// sink.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        if let Some(sink) = &self.sink
            && let Err(e) = sink.close().await
        {
            warn!(sink = sink.name(), error = %e, "Failed to close notification sink");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use lingochat_types::notification::{NewMessagePayload, NotificationKind};

    fn event(preview: &str) -> NotificationEvent {
        NotificationEvent::new_message(NewMessagePayload::new(
            Some("user-1".into()),
            "aurora-001",
            "Aurora",
            preview,
        ))
    }

    #[tokio::test]
    async fn test_emit_publishes_in_background() {
        let sink = RecordingSink::new();
        let emitter = NotificationEmitter::new(
            BoxNotificationSink::new(sink.clone()),
            Duration::from_secs(1),
        );

        emitter.emit(event("¡Hola!"));
        emitter.emit(event("¿Qué tal?"));
        emitter.shutdown().await;

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == NotificationKind::NewMessage));
        assert!(sink.is_closed());
    }

    #[tokio::test]
    async fn test_failing_sink_is_swallowed() {
        let sink = RecordingSink::failing();
        let emitter = NotificationEmitter::new(
            BoxNotificationSink::new(sink.clone()),
            Duration::from_secs(1),
        );
        emitter.emit(event("hola"));
        emitter.shutdown().await;
        assert!(sink.events().is_empty());
        assert_eq!(emitter.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_slow_sink_times_out() {
        let sink = RecordingSink::new().with_delay(Duration::from_millis(500));
        let emitter = NotificationEmitter::new(
            BoxNotificationSink::new(sink.clone()),
            Duration::from_millis(20),
        );
        emitter.emit(event("hola"));
        tokio::time::timeout(Duration::from_millis(300), emitter.shutdown())
            .await
            .unwrap();
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_emitter_drops_events() {
        let emitter = NotificationEmitter::disabled();
        assert!(!emitter.is_enabled());
        emitter.emit(event("hola"));
        assert_eq!(emitter.in_flight(), 0);
        emitter.shutdown().await;
    }

    #[tokio::test]
    async fn test_clones_share_sink_and_drain() {
        let sink = RecordingSink::new().with_delay(Duration::from_millis(20));
        let emitter = NotificationEmitter::new(
            BoxNotificationSink::new(sink.clone()),
            Duration::from_secs(1),
        );
        let shared = emitter.clone();

        shared.emit(event("desde el clon"));
        assert_eq!(emitter.in_flight(), 1);
        emitter.shutdown().await;

        assert_eq!(sink.events().len(), 1);
        assert!(sink.is_closed());
        shared.emit(event("late"));
        assert_eq!(shared.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_emit_after_shutdown_is_dropped() {
        let sink = RecordingSink::new();
        let emitter = NotificationEmitter::new(
            BoxNotificationSink::new(sink.clone()),
            Duration::from_secs(1),
        );
        emitter.shutdown().await;
        emitter.emit(event("late"));
        assert_eq!(emitter.in_flight(), 0);
        assert!(sink.events().is_empty());
    }
}
