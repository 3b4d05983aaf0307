//! Single-threaded event dispatch with explicit subscriptions.
//!
//! A [`Listeners`] registry hands out a [`Subscription`] for every listener it
//! accepts. The listener stays registered until the subscription is
//! unsubscribed or dropped, so a listener's lifetime is tied to whatever owns
//! its subscription.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::input::{Button, InputEvent, Key, KeyEvent, PointerEvent};

type Handler<E> = Rc<RefCell<dyn FnMut(&mut E)>>;

struct Registry<E> {
    next_id: u64,
    handlers: Vec<(u64, Handler<E>)>,
}

trait Detach {
    fn detach(&mut self, id: u64) -> bool;
}

impl<E> Detach for Registry<E> {
    fn detach(&mut self, id: u64) -> bool {
        let len = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != len
    }
}

pub struct Listeners<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: 'static> Listeners<E> {
    pub fn new() -> Self {
        let registry = Registry { next_id: 0, handlers: vec![] };
        Listeners { registry: Rc::new(RefCell::new(registry)) }
    }

    pub fn subscribe<F>(&self, handler: F) -> Subscription
        where F: FnMut(&mut E) + 'static
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let handler: Handler<E> = Rc::new(RefCell::new(handler));
        registry.handlers.push((id, handler));

        let detach: Rc<RefCell<dyn Detach>> = self.registry.clone();
        Subscription { id, registry: Some(Rc::downgrade(&detach)) }
    }

    /// Calls every listener registered when `emit` is called, in subscription
    /// order, and returns how many ran.
    ///
    /// Listeners unsubscribed by an earlier listener during the same dispatch
    /// are skipped. A listener that re-enters `emit` is not called recursively.
    pub fn emit(&self, event: &mut E) -> usize {
        let handlers: Vec<(u64, Handler<E>)> = self.registry.borrow().handlers.clone();

        let mut called = 0;
        for (id, handler) in handlers {
            if !self.is_subscribed(id) {
                continue;
            }

            if let Ok(mut handler) = handler.try_borrow_mut() {
                (&mut *handler)(event);
                called += 1;
            }
        }

        called
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.registry.borrow().handlers.iter().any(|(handler_id, _)| *handler_id == id)
    }
}

impl<E: 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.registry.borrow().handlers.len())
            .finish()
    }
}

/// A registered listener. Dropping it unregisters the listener.
#[must_use = "dropping a subscription unregisters its listener"]
pub struct Subscription {
    id: u64,
    registry: Option<Weak<RefCell<dyn Detach>>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Unregisters the listener. Returns `false` if it was already gone,
    /// either because its registry was dropped or it was never registered.
    pub fn unsubscribe(mut self) -> bool {
        self.detach()
    }

    fn detach(&mut self) -> bool {
        let id = self.id;
        self.registry.take()
            .and_then(|registry| registry.upgrade())
            .map_or(false, |registry| {
                registry.try_borrow_mut().map_or(false, |mut registry| registry.detach(id))
            })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &self.registry.as_ref().map_or(false, |r| r.strong_count() > 0))
            .finish()
    }
}

/// The document-wide target that key and pointer input is dispatched to.
#[derive(Debug, Default)]
pub struct EventTarget {
    listeners: Listeners<InputEvent>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen<F>(&self, handler: F) -> Subscription
        where F: FnMut(&mut InputEvent) + 'static
    {
        self.listeners.subscribe(handler)
    }

    /// Dispatches a key-down for `key` and returns the event as the
    /// listeners left it.
    pub fn key_down(&self, key: impl Into<Key>) -> KeyEvent {
        let mut event = InputEvent::Key(KeyEvent::new(key));
        self.listeners.emit(&mut event);
        match event {
            InputEvent::Key(event) => event,
            InputEvent::Pointer(_) => unreachable!("listeners cannot change an event's kind"),
        }
    }

    pub fn click(&self, button: Button) -> PointerEvent {
        let mut event = InputEvent::Pointer(PointerEvent::new(button));
        self.listeners.emit(&mut event);
        match event {
            InputEvent::Pointer(event) => event,
            InputEvent::Key(_) => unreachable!("listeners cannot change an event's kind"),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
