use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::events::{Listeners, Subscription};

/// A single string slot holding "where the user is", such as the fragment of
/// a page's address.
///
/// The state is shared: others may change it between reads, so readers must
/// not cache it, and writers only need a shared reference.
pub trait LocationState {
    /// The current value, without any leading `#`. Empty if unset.
    fn read(&self) -> String;

    fn write(&self, value: &str);

    /// Forces the next [`write()`](Self::write) to be observed as a change,
    /// even if it writes the current value.
    ///
    /// The default clears the value, which is enough for implementations
    /// that only notify on actual changes.
    fn announce_change(&self) {
        self.write("");
    }
}

impl<L: LocationState + ?Sized> LocationState for &L {
    fn read(&self) -> String {
        (**self).read()
    }

    fn write(&self, value: &str) {
        (**self).write(value)
    }

    fn announce_change(&self) {
        (**self).announce_change()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentChange {
    pub old: String,
    pub new: String,
}

struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    fn current(&self) -> &str {
        &self.entries[self.cursor]
    }
}

/// An in-process address fragment with a browsing history.
///
/// `Fragment` is a handle: clones share the same state, so a navigator and
/// whatever observes it can each hold one. Writing a new value pushes a
/// history entry and notifies [`on_change()`](Fragment::on_change) listeners;
/// writing the current value does neither.
///
/// Like a browser's session history, a navigator's clear-then-set write
/// leaves two entries per move. Only the newest
/// [`HISTORY_LIMIT`](Fragment::HISTORY_LIMIT) entries are kept.
#[derive(Clone)]
pub struct Fragment {
    history: Rc<RefCell<History>>,
    listeners: Rc<Listeners<FragmentChange>>,
}

impl Fragment {
    pub const HISTORY_LIMIT: usize = 1024;

    pub fn new(value: &str) -> Self {
        let history = History { entries: vec![value.to_string()], cursor: 0 };
        Fragment {
            history: Rc::new(RefCell::new(history)),
            listeners: Rc::new(Listeners::new()),
        }
    }

    /// Seeds a fragment from everything after the first `#` in `address`.
    ///
    /// ```
    /// use foil::location::{Fragment, LocationState};
    ///
    /// assert_eq!(Fragment::from_address("/talks/gleam.html#slide-3").read(), "slide-3");
    /// assert_eq!(Fragment::from_address("/talks/gleam.html").read(), "");
    /// assert_eq!(Fragment::from_address("#").read(), "");
    /// ```
    pub fn from_address(address: &str) -> Self {
        let value = address.split_once('#').map_or("", |(_, fragment)| fragment);
        Fragment::new(value)
    }

    pub fn on_change<F>(&self, listener: F) -> Subscription
        where F: FnMut(&FragmentChange) + 'static
    {
        let mut listener = listener;
        self.listeners.subscribe(move |change: &mut FragmentChange| listener(change))
    }

    /// Moves one entry back in history. Returns `false` at the oldest entry.
    pub fn back(&self) -> bool {
        self.traverse(-1)
    }

    /// Moves one entry forward in history. Returns `false` at the newest
    /// entry.
    pub fn forward(&self) -> bool {
        self.traverse(1)
    }

    /// Number of history entries, including the current one.
    pub fn history_len(&self) -> usize {
        self.history.borrow().entries.len()
    }

    fn traverse(&self, delta: isize) -> bool {
        let change = {
            let mut history = self.history.borrow_mut();
            let Some(cursor) = history.cursor.checked_add_signed(delta) else {
                return false;
            };

            if cursor >= history.entries.len() {
                return false;
            }

            let old = history.current().to_string();
            history.cursor = cursor;
            FragmentChange { old, new: history.current().to_string() }
        };

        self.notify(change);
        true
    }

    fn notify(&self, mut change: FragmentChange) {
        if change.old != change.new {
            self.listeners.emit(&mut change);
        }
    }
}

impl LocationState for Fragment {
    fn read(&self) -> String {
        self.history.borrow().current().to_string()
    }

    fn write(&self, value: &str) {
        let change = {
            let mut history = self.history.borrow_mut();
            if history.current() == value {
                return;
            }

            let old = history.current().to_string();
            let cursor = history.cursor + 1;
            history.entries.truncate(cursor);
            history.entries.push(value.to_string());
            if history.entries.len() > Self::HISTORY_LIMIT {
                history.entries.remove(0);
            }

            history.cursor = history.entries.len() - 1;
            FragmentChange { old, new: value.to_string() }
        };

        self.notify(change);
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Fragment::new("")
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let history = self.history.borrow();
        f.debug_struct("Fragment")
            .field("value", &history.current())
            .field("history", &history.entries.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
