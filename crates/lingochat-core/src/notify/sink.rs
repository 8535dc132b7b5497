//! NotificationSink trait and its type-erased wrapper.

use std::future::Future;
use std::pin::Pin;

use lingochat_types::error::NotificationError;
use lingochat_types::notification::NotificationEvent;

/// Destination for notification events (message queue, webhook, ...).
///
/// Implementations live in lingochat-infra (e.g., `ServiceBusSink`).
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one event.
    fn publish(
        &self,
        event: &NotificationEvent,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;

    /// Release transport resources. Called once at shutdown after every
    /// in-flight publish has finished.
    fn close(&self) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// Object-safe version of [`NotificationSink`] with boxed futures.
pub trait NotificationSinkDyn: Send + Sync {
    fn name(&self) -> &str;

    fn publish_boxed<'a>(
        &'a self,
        event: &'a NotificationEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotificationError>> + Send + 'a>>;

    fn close_boxed(&self) -> Pin<Box<dyn Future<Output = Result<(), NotificationError>> + Send + '_>>;
}

impl<T: NotificationSink> NotificationSinkDyn for T {
    fn name(&self) -> &str {
        NotificationSink::name(self)
    }

    fn publish_boxed<'a>(
        &'a self,
        event: &'a NotificationEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotificationError>> + Send + 'a>> {
        Box::pin(self.publish(event))
    }

    fn close_boxed(&self) -> Pin<Box<dyn Future<Output = Result<(), NotificationError>> + Send + '_>> {
        Box::pin(self.close())
    }
}

/// Type-erased notification sink, chosen at startup.
pub struct BoxNotificationSink {
    inner: Box<dyn NotificationSinkDyn + Send + Sync>,
}

impl BoxNotificationSink {
    pub fn new<T: NotificationSink + 'static>(sink: T) -> Self {
        Self {
            inner: Box::new(sink),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn publish(&self, event: &NotificationEvent) -> Result<(), NotificationError> {
        self.inner.publish_boxed(event).await
    }

    pub async fn close(&self) -> Result<(), NotificationError> {
        self.inner.close_boxed().await
    }
}

impl std::fmt::Debug for BoxNotificationSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxNotificationSink")
            .field("name", &self.name())
            .finish()
    }
}
