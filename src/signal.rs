//! Single-threaded notification signals
//!
//! A [`Signal`] keeps a list of handlers. Connecting returns a
//! [`Subscription`]; the handler stays connected for as long as the
//! subscription lives and is disconnected when it is dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Handler<T> = Rc<dyn Fn(&T)>;

struct Slots<T> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
}

pub struct Signal<T> {
    slots: Rc<RefCell<Slots<T>>>,
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    #[must_use = "the handler is disconnected when the subscription is dropped"]
    pub fn connect<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            slots.handlers.push((id, Rc::new(handler)));
            id
        };

        let slots: Weak<RefCell<Slots<T>>> = Rc::downgrade(&self.slots);
        Subscription {
            disconnect: Some(Box::new(move || {
                if let Some(slots) = slots.upgrade() {
                    slots.borrow_mut().handlers.retain(|(other, _)| *other != id);
                }
            })),
        }
    }

    /// Call every connected handler in connection order.
    ///
    /// Handlers may connect or disconnect while the signal is emitting; the
    /// change takes effect from the next emission.
    pub fn emit(&self, value: &T) {
        let handlers: Vec<Handler<T>> = self
            .slots
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(value);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.slots.borrow().handlers.len()
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A connected handler; dropping it disconnects the handler
pub struct Subscription {
    disconnect: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

/// An owned set of subscriptions, disconnected together
#[derive(Default)]
pub struct Subscriptions {
    items: Vec<Subscription>,
}

impl Subscriptions {
    pub fn push(&mut self, subscription: Subscription) {
        self.items.push(subscription);
    }

    /// Disconnect everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_connected_handlers() {
        let signal: Signal<u32> = Signal::new();
        let total = Rc::new(Cell::new(0));
        let sum = Rc::clone(&total);
        let _sub = signal.connect(move |v| sum.set(sum.get() + v));
        signal.emit(&2);
        signal.emit(&3);
        assert_eq!(total.get(), 5);
    }

    #[test]
    fn test_drop_disconnects() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let sub = signal.connect(move |_| counter.set(counter.get() + 1));
        assert_eq!(signal.handler_count(), 1);
        drop(sub);
        assert_eq!(signal.handler_count(), 0);
        signal.emit(&());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_clear_disconnects_all() {
        let first: Signal<()> = Signal::new();
        let second: Signal<String> = Signal::new();
        let mut subs = Subscriptions::default();
        subs.push(first.connect(|_| {}));
        subs.push(first.connect(|_| {}));
        subs.push(second.connect(|_| {}));
        assert_eq!(subs.len(), 3);
        subs.clear();
        assert!(subs.is_empty());
        assert_eq!(first.handler_count(), 0);
        assert_eq!(second.handler_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_signal() {
        let signal: Signal<()> = Signal::new();
        let sub = signal.connect(|_| {});
        drop(signal);
        drop(sub);
    }

    #[test]
    fn test_handler_may_disconnect_during_emit() {
        let signal: Rc<Signal<()>> = Rc::new(Signal::new());
        let held: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&held);
        let sub = signal.connect(move |_| {
            slot.borrow_mut().take();
        });
        *held.borrow_mut() = Some(sub);
        signal.emit(&());
        assert_eq!(signal.handler_count(), 0);
    }
}
