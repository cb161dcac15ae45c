/*
 * Named-event notification used by the widget to surface normalized native
 * callbacks ("scroll") to application code. Subscribers are keyed by a
 * monotonically increasing id so unsubscription never depends on callback
 * identity.
 *
 * [SD-Events-ReentrancyV1] Delivery snapshots the matching callbacks before
 * invoking any of them, so a subscriber may subscribe/unsubscribe or call
 * back into the widget without invalidating the iteration.
 */

use crate::types::ScrollEventData;

use std::rc::Rc;

/// Handle returned by a subscription; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Rc<dyn Fn(&ScrollEventData)>;

struct Subscriber {
    id: SubscriptionId,
    event_name: String,
    callback: Callback,
}

#[derive(Default)]
pub(crate) struct EventEmitter {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl EventEmitter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(
        &mut self,
        event_name: &str,
        callback: impl Fn(&ScrollEventData) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            event_name: event_name.to_owned(),
            callback: Rc::new(callback),
        });
        id
    }

    /// Removes a subscription. Unknown ids are ignored so tearing down in any
    /// order is safe.
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|s| s.id != id);
    }

    pub(crate) fn has_subscribers(&self, event_name: &str) -> bool {
        self.subscribers.iter().any(|s| s.event_name == event_name)
    }

    /// Clones the callbacks registered for `event_name`. Callers invoke the
    /// snapshot after releasing any interior borrow of the widget state.
    pub(crate) fn snapshot(&self, event_name: &str) -> Vec<Callback> {
        self.subscribers
            .iter()
            .filter(|s| s.event_name == event_name)
            .map(|s| Rc::clone(&s.callback))
            .collect()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViewId;
    use std::cell::Cell;

    fn event(x: f64, y: f64) -> ScrollEventData {
        ScrollEventData {
            view_id: ViewId::new(1),
            event_name: "scroll",
            scroll_x: x,
            scroll_y: y,
        }
    }

    #[test]
    fn snapshot_only_returns_matching_event_callbacks() {
        let mut emitter = EventEmitter::new();
        emitter.subscribe("scroll", |_| {});
        emitter.subscribe("layoutChanged", |_| {});
        assert_eq!(emitter.snapshot("scroll").len(), 1);
        assert_eq!(emitter.snapshot("layoutChanged").len(), 1);
        assert!(emitter.snapshot("tap").is_empty());
    }

    #[test]
    fn unsubscribe_removes_only_the_given_id() {
        let mut emitter = EventEmitter::new();
        let first = emitter.subscribe("scroll", |_| {});
        let second = emitter.subscribe("scroll", |_| {});
        emitter.unsubscribe(first);
        assert_eq!(emitter.snapshot("scroll").len(), 1);
        // Unknown or already-removed ids are a no-op.
        emitter.unsubscribe(first);
        emitter.unsubscribe(second);
        assert!(!emitter.has_subscribers("scroll"));
    }

    #[test]
    fn snapshot_callbacks_receive_the_event_payload() {
        let mut emitter = EventEmitter::new();
        let seen = Rc::new(Cell::new(0.0));
        let seen_in_cb = Rc::clone(&seen);
        emitter.subscribe("scroll", move |e| seen_in_cb.set(e.scroll_y));
        for cb in emitter.snapshot("scroll") {
            cb(&event(0.0, 42.5));
        }
        assert_eq!(seen.get(), 42.5);
    }
}
