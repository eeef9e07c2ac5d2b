//! Change notifications emitted by the sketch model.
//!
//! Delivery is synchronous: listeners run inside the mutating call, in
//! registration order, before it returns. Listeners must not re-enter the
//! model. Every event corresponds to an actual state change; no-op writes
//! are suppressed at the call sites.

use std::fmt;

/// A state change in the sketch model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchEvent {
    /// The vertex at `index` was replaced
    VertexChanged { index: usize },
    /// `count` vertices were inserted starting at `index`
    VerticesInserted { index: usize, count: usize },
    /// `count` vertices were removed starting at `index`
    VerticesRemoved { index: usize, count: usize },
    /// The sequence length changed
    VertexCountChanged { count: usize },
    /// The live vertex moved to a different position in the sequence
    CurrentVertexIndexChanged { index: usize },
    /// The coordinate of the live vertex changed (by value or by cursor move)
    CurrentCoordinateChanged,
    /// The buffer's geometry type changed
    GeometryTypeChanged,
    /// The buffer's CRS changed
    CrsChanged,
    /// The target layer reference changed
    LayerChanged,
    /// The frozen edit-guard was toggled
    FrozenChanged,
}

/// Handle returned by [`EventDispatcher::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

type EventCallback = Box<dyn FnMut(&SketchEvent)>;

/// Synchronous listener registry
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<(u64, EventCallback)>,
    next_token: u64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners are invoked in registration order.
    pub fn subscribe(&mut self, callback: impl FnMut(&SketchEvent) + 'static) -> SubscriptionToken {
        let token = self.next_token;
        self.next_token += 1;
        self.listeners.push((token, Box::new(callback)));
        SubscriptionToken(token)
    }

    /// Remove a listener. Returns false if the token is unknown.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != token.0);
        self.listeners.len() != before
    }

    /// Deliver an event to every listener, synchronously
    pub fn emit(&mut self, event: SketchEvent) {
        for (_, callback) in &mut self.listeners {
            callback(&event);
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_emit() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(move |event| sink.borrow_mut().push(*event));

        dispatcher.emit(SketchEvent::VertexCountChanged { count: 2 });
        dispatcher.emit(SketchEvent::CurrentCoordinateChanged);

        assert_eq!(
            *seen.borrow(),
            vec![
                SketchEvent::VertexCountChanged { count: 2 },
                SketchEvent::CurrentCoordinateChanged,
            ]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut dispatcher = EventDispatcher::new();
        let token = dispatcher.subscribe(move |event| sink.borrow_mut().push(*event));

        assert!(dispatcher.unsubscribe(token));
        assert!(!dispatcher.unsubscribe(token), "Second unsubscribe should report unknown token");

        dispatcher.emit(SketchEvent::FrozenChanged);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));

        let mut dispatcher = EventDispatcher::new();
        for id in 0..3 {
            let sink = Rc::clone(&order);
            dispatcher.subscribe(move |_| sink.borrow_mut().push(id));
        }

        dispatcher.emit(SketchEvent::CrsChanged);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_tokens_are_unique_across_unsubscribes() {
        let mut dispatcher = EventDispatcher::new();
        let first = dispatcher.subscribe(|_| {});
        dispatcher.unsubscribe(first);
        let second = dispatcher.subscribe(|_| {});
        assert_ne!(first, second);
    }
}
