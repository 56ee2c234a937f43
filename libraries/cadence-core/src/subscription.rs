//! Scoped event subscriptions
//!
//! A [`Subscription`] is the guard for one attached listener: dropping it
//! detaches the listener. [`SubscriptionSet`] attaches all four channels at
//! once and releases them together. [`EventHub`] is an in-process emitter that
//! engine implementations can use to fan notifications out to listeners.
//!
//! All listeners of one consumer forward into the same [`EventSink`], so the
//! consumer sees events in the order the engine emitted them regardless of
//! which channel they travelled on.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::Result;
use crate::events::{EngineEvent, EventChannel};
use crate::traits::EventSource;

/// Ordered queue that listeners forward events into
pub type EventSink = mpsc::UnboundedSender<EngineEvent>;

/// Receiving end of an [`EventSink`]
pub type EventStream = mpsc::UnboundedReceiver<EngineEvent>;

/// Create a connected sink/stream pair
pub fn event_queue() -> (EventSink, EventStream) {
    mpsc::unbounded_channel()
}

type Detach = Box<dyn FnOnce() + Send>;

/// Guard for one attached listener
#[must_use = "dropping a Subscription detaches the listener immediately"]
pub struct Subscription {
    channel: EventChannel,
    detach: Option<Detach>,
}

impl Subscription {
    /// Create a guard that runs `detach` exactly once when released
    pub fn new(channel: EventChannel, detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            channel,
            detach: Some(Box::new(detach)),
        }
    }

    /// Channel this listener is attached to
    pub fn channel(&self) -> EventChannel {
        self.channel
    }

    /// Detach now instead of at end of scope
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            debug!("Detaching {} listener", self.channel);
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// The four channel subscriptions of one mounted consumer
#[derive(Debug)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    /// Attach a listener for every channel, all forwarding into `sink`
    ///
    /// If any channel fails to attach, the ones already attached are released
    /// before the error is returned.
    pub fn attach(source: &dyn EventSource, sink: &EventSink) -> Result<Self> {
        let mut subscriptions = Vec::with_capacity(EventChannel::ALL.len());
        for channel in EventChannel::ALL {
            subscriptions.push(source.listen(channel, sink.clone())?);
        }
        Ok(Self { subscriptions })
    }

    /// Channels currently held
    pub fn channels(&self) -> impl Iterator<Item = EventChannel> + '_ {
        self.subscriptions.iter().map(Subscription::channel)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every subscription
    pub fn teardown(self) {
        drop(self);
    }
}

struct Listener {
    id: u64,
    channel: EventChannel,
    sink: EventSink,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<Listener>,
}

/// In-process fan-out of engine notifications
///
/// Cloning the hub shares the listener registry.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Arc<Mutex<HubInner>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every listener of its channel
    ///
    /// Listeners whose receiving side has gone away are pruned. Returns how
    /// many listeners received the event.
    pub fn emit(&self, event: EngineEvent) -> usize {
        let channel = event.channel();
        let mut inner = self.lock();
        let mut delivered = 0;
        inner.listeners.retain(|listener| {
            if listener.channel != channel {
                return true;
            }
            if listener.sink.send(event.clone()).is_ok() {
                delivered += 1;
                true
            } else {
                debug!("Pruning closed {} listener {}", channel, listener.id);
                false
            }
        });
        delivered
    }

    /// Number of attached listeners across all channels
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Number of attached listeners on one channel
    pub fn listeners_on(&self, channel: EventChannel) -> usize {
        self.lock()
            .listeners
            .iter()
            .filter(|listener| listener.channel == channel)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn detach(inner: &Weak<Mutex<HubInner>>, id: u64) {
        if let Some(inner) = inner.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.retain(|listener| listener.id != id);
        }
    }
}

impl EventSource for EventHub {
    fn listen(&self, channel: EventChannel, sink: EventSink) -> Result<Subscription> {
        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push(Listener { id, channel, sink });
            id
        };
        debug!("Attached {} listener {}", channel, id);

        let registry = Arc::downgrade(&self.inner);
        Ok(Subscription::new(channel, move || {
            EventHub::detach(&registry, id);
        }))
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::events::Progress;

    struct FailingSource {
        hub: EventHub,
        fail_on: EventChannel,
    }

    impl EventSource for FailingSource {
        fn listen(&self, channel: EventChannel, sink: EventSink) -> Result<Subscription> {
            if channel == self.fail_on {
                return Err(EngineError::Subscribe {
                    channel,
                    reason: "listener registry full".to_string(),
                });
            }
            self.hub.listen(channel, sink)
        }
    }

    #[test]
    fn dropping_subscription_detaches_listener() {
        let hub = EventHub::new();
        let (sink, mut stream) = event_queue();

        let subscription = hub.listen(EventChannel::SoundDone, sink).unwrap();
        assert_eq!(hub.listeners_on(EventChannel::SoundDone), 1);
        assert_eq!(hub.emit(EngineEvent::SoundDone), 1);
        assert_eq!(stream.try_recv().unwrap(), EngineEvent::SoundDone);

        drop(subscription);
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(hub.emit(EngineEvent::SoundDone), 0);
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn emit_only_reaches_matching_channel() {
        let hub = EventHub::new();
        let (sink, mut stream) = event_queue();
        let _done = hub.listen(EventChannel::SoundDone, sink).unwrap();

        let delivered = hub.emit(EngineEvent::ProgressUpdate(Progress::new(1.0, 10.0)));
        assert_eq!(delivered, 0);
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn set_preserves_cross_channel_order() {
        let hub = EventHub::new();
        let (sink, mut stream) = event_queue();
        let set = SubscriptionSet::attach(&hub, &sink).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(hub.listener_count(), 4);

        hub.emit(EngineEvent::ProgressUpdate(Progress::new(1.0, 10.0)));
        hub.emit(EngineEvent::SoundDone);
        hub.emit(EngineEvent::PositionChanged(Progress::new(0.0, 10.0)));

        assert_eq!(stream.try_recv().unwrap().channel(), EventChannel::ProgressUpdate);
        assert_eq!(stream.try_recv().unwrap().channel(), EventChannel::SoundDone);
        assert_eq!(stream.try_recv().unwrap().channel(), EventChannel::PositionChanged);

        set.teardown();
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn failed_attach_releases_partial_set() {
        let hub = EventHub::new();
        let source = FailingSource {
            hub: hub.clone(),
            fail_on: EventChannel::SoundDone,
        };
        let (sink, _stream) = event_queue();

        let err = SubscriptionSet::attach(&source, &sink).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Subscribe {
                channel: EventChannel::SoundDone,
                ..
            }
        ));
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn closed_stream_is_pruned_on_emit() {
        let hub = EventHub::new();
        let (sink, stream) = event_queue();
        let subscription = hub.listen(EventChannel::SoundDone, sink).unwrap();
        drop(stream);

        assert_eq!(hub.emit(EngineEvent::SoundDone), 0);
        assert_eq!(hub.listener_count(), 0);

        // Detaching an already pruned listener is harmless
        drop(subscription);
    }
}
