//! Process-wide notification channel. Any component may publish through a
//! cloned [`Notifier`]; exactly one [`NotificationCenter`] receives, owns the
//! visible list, and decides when entries are dismissed.

use std::fmt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;
use ulid::Ulid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        };
        formatter.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: Ulid,
    pub kind: NotificationKind,
    pub message: String,
}

/// Publishing half. Cheap to clone; publishing never blocks.
#[derive(Clone, Debug)]
pub struct Notifier {
    sender: UnboundedSender<Notification>,
}

/// Creates a connected publisher and its single subscriber.
#[must_use]
pub fn channel() -> (Notifier, NotificationCenter) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        Notifier { sender },
        NotificationCenter {
            receiver,
            visible: Vec::new(),
        },
    )
}

impl Notifier {
    pub fn publish(&self, kind: NotificationKind, message: impl Into<String>) {
        let notification = Notification {
            id: Ulid::new(),
            kind,
            message: message.into(),
        };
        if self.sender.send(notification).is_err() {
            debug!("notification dropped: no subscriber");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(NotificationKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(NotificationKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.publish(NotificationKind::Info, message);
    }
}

/// Subscribing half and owner of the display list.
#[derive(Debug)]
pub struct NotificationCenter {
    receiver: UnboundedReceiver<Notification>,
    visible: Vec<Notification>,
}

impl NotificationCenter {
    /// Waits for the next notification and adds it to the visible list.
    /// Returns `None` once every `Notifier` is dropped.
    pub async fn next(&mut self) -> Option<Notification> {
        let notification = self.receiver.recv().await?;
        self.visible.push(notification.clone());
        Some(notification)
    }

    /// Drains whatever is already queued without waiting.
    pub fn drain_pending(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.receiver.try_recv() {
            self.visible.push(notification.clone());
            drained.push(notification);
        }
        drained
    }

    /// Removes a notification from the visible list.
    pub fn dismiss(&mut self, id: Ulid) -> bool {
        let before = self.visible.len();
        self.visible.retain(|notification| notification.id != id);
        self.visible.len() != before
    }

    #[must_use]
    pub fn visible(&self) -> &[Notification] {
        &self.visible
    }
}
