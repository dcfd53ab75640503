use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// A partial update to whatever the UI layer renders: only the set fields
/// change. Mirrors how an update dialog is actually driven (a progress
/// tick patches `progress`, a failure patches title/message/visibility).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticePatch {
    pub visible:       Option<bool>,
    pub title:         Option<String>,
    pub message:       Option<String>,
    pub progress:      Option<f32>,
    pub show_progress: Option<bool>,
    /// Whether the UI should offer a confirm affordance.
    pub confirmable:   Option<bool>,
    /// Whether the UI should allow dismissal.
    pub cancelable:    Option<bool>,
}

impl NoticePatch {
    pub fn progress(fraction: f32) -> Self {
        Self {
            progress: Some(fraction),
            ..Self::default()
        }
    }

    pub fn dialog(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            visible: Some(true),
            title: Some(title.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_progress_bar(mut self) -> Self {
        self.show_progress = Some(true);
        self.progress = Some(0.0);
        self.confirmable = Some(false);
        self.cancelable = Some(false);
        self
    }

    #[must_use]
    pub fn confirmable(mut self, confirmable: bool) -> Self {
        self.confirmable = Some(confirmable);
        self.show_progress = Some(false);
        self
    }

    #[must_use]
    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = Some(cancelable);
        self
    }
}

/// Receives every patch emitted while subscribed.
pub type Subscriber = Arc<dyn Fn(&NoticePatch) + Send + Sync>;

#[derive(Default)]
struct Slot {
    current: Mutex<Option<(u64, Subscriber)>>,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, Option<(u64, Subscriber)>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single-consumer publish/subscribe channel between the engine and a UI
/// layer, scoped to one updater instance.
///
/// At most one subscriber is live: subscribing again replaces the previous
/// one, so a remounted UI never receives duplicate deliveries. There is no
/// process-wide slot; every updater carries its own channel.
#[derive(Clone, Default)]
pub struct NotificationChannel {
    slot:    Arc<Slot>,
    next_id: Arc<AtomicU64>,
}

impl NotificationChannel {
    pub fn new() -> Self { Self::default() }

    /// Register `subscriber`, replacing any previous one. The returned
    /// handle detaches this registration; dropping the handle without
    /// calling [`Subscription::unsubscribe`] leaves it live.
    pub fn subscribe(&self, subscriber: Subscriber) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *self.slot.lock() = Some((id, subscriber));

        Subscription {
            slot: Arc::downgrade(&self.slot),
            id,
        }
    }

    /// Deliver a patch to the current subscriber, if any.
    pub fn emit(&self, patch: &NoticePatch) {
        // Clone the subscriber out so the callback runs without the lock.
        let subscriber = self.slot.lock().as_ref().map(|(_, s)| Arc::clone(s));
        if let Some(subscriber) = subscriber {
            subscriber(patch);
        }
    }
}

/// Handle to one channel registration.
pub struct Subscription {
    slot: Weak<Slot>,
    id:   u64,
}

impl Subscription {
    /// Stop delivery to this registration. A no-op if a later subscriber
    /// already replaced it.
    pub fn unsubscribe(self) {
        let Some(slot) = self.slot.upgrade() else { return };
        let mut current = slot.lock();
        if matches!(*current, Some((id, _)) if id == self.id) {
            *current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn collector() -> (Subscriber, Arc<Mutex<Vec<NoticePatch>>>) {
        let seen: Arc<Mutex<Vec<NoticePatch>>> = Arc::new(Mutex::new(vec![]));
        let sink = Arc::clone(&seen);
        let subscriber: Subscriber = Arc::new(move |patch: &NoticePatch| {
            sink.lock().unwrap().push(patch.clone());
        });
        (subscriber, seen)
    }

    #[test]
    fn test_emit_reaches_subscriber() {
        let channel = NotificationChannel::new();
        let (subscriber, seen) = collector();
        let _subscription = channel.subscribe(subscriber);

        channel.emit(&NoticePatch::progress(0.5));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].progress, Some(0.5));
    }

    #[test]
    fn test_second_subscriber_replaces_first() {
        let channel = NotificationChannel::new();
        let (first, first_seen) = collector();
        let (second, second_seen) = collector();

        let _a = channel.subscribe(first);
        let _b = channel.subscribe(second);
        channel.emit(&NoticePatch::progress(1.0));

        assert!(first_seen.lock().unwrap().is_empty());
        assert_eq!(second_seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let channel = NotificationChannel::new();
        let (subscriber, seen) = collector();

        let subscription = channel.subscribe(subscriber);
        subscription.unsubscribe();
        channel.emit(&NoticePatch::progress(1.0));

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_stale_unsubscribe_leaves_replacement_alone() {
        let channel = NotificationChannel::new();
        let (first, _) = collector();
        let (second, second_seen) = collector();

        let stale = channel.subscribe(first);
        let _live = channel.subscribe(second);
        stale.unsubscribe();

        channel.emit(&NoticePatch::progress(0.25));
        assert_eq!(second_seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_emit_without_subscriber_is_silent() {
        let channel = NotificationChannel::new();
        channel.emit(&NoticePatch::dialog("t", "m"));
    }
}
