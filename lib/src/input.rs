use std::fmt;

use derive_more::{Deref, From};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::Bindings;
use crate::error::Result;

/// A key identifier, as reported by a key-down event: `"ArrowLeft"`, `"j"`,
/// `" "` and so on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub const SPACE: &'static str = " ";

    /// Like `From<&str>`, but also accepts the names `space`, `Space` and
    /// `Spacebar` for the space key, which is awkward to spell otherwise.
    pub fn from_name(name: &str) -> Key {
        match name {
            "space" | "Space" | "Spacebar" => Key::from(Key::SPACE),
            name => Key::from(name),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Key(key.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Key::SPACE => f.write_str("Space"),
            key => f.write_str(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    default_prevented: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<Key>) -> Self {
        KeyEvent { key: key.into(), default_prevented: false }
    }

    /// Suppresses the default action for this key, e.g. scrolling the page.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Button {
    Primary,
    Auxiliary,
    Secondary,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub button: Button,
}

impl PointerEvent {
    pub fn new(button: Button) -> Self {
        PointerEvent { button }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum InputEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    Previous,
    Next,
}

/// Maps raw input to navigation intents.
#[derive(Debug, Clone)]
pub struct Keymap {
    keys: FxHashMap<Key, Intent>,
    click_advances: bool,
}

impl Keymap {
    pub fn new(bindings: &Bindings) -> Result<Self> {
        let mut keys = FxHashMap::default();
        let space = bindings.space_advances.then(|| Key::from(Key::SPACE));
        let next_keys = bindings.next.iter().chain(space.as_ref());

        for key in &bindings.previous {
            keys.insert(key.clone(), Intent::Previous);
        }

        for key in next_keys {
            if keys.insert(key.clone(), Intent::Next) == Some(Intent::Previous) {
                return err! {
                    "key is bound to both previous and next",
                    "key" => key,
                };
            }
        }

        Ok(Keymap { keys, click_advances: bindings.click_advances })
    }

    pub fn key(&self, key: &Key) -> Option<Intent> {
        self.keys.get(key).copied()
    }

    pub fn pointer(&self, event: &PointerEvent) -> Option<Intent> {
        match event.button {
            Button::Primary if self.click_advances => Some(Intent::Next),
            _ => None,
        }
    }

    /// The intent for `event`, if any. A bound key has its default action
    /// suppressed.
    pub fn handle(&self, event: &mut InputEvent) -> Option<Intent> {
        match event {
            InputEvent::Key(event) => {
                let intent = self.key(&event.key)?;
                event.prevent_default();
                Some(intent)
            }
            InputEvent::Pointer(event) => self.pointer(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keymap() -> Keymap {
        Keymap::new(&Bindings::default()).unwrap()
    }

    #[test]
    fn default_bindings() {
        let keymap = keymap();
        for key in ["k", "ArrowUp", "ArrowLeft"] {
            assert_eq!(keymap.key(&key.into()), Some(Intent::Previous), "{key}");
        }

        for key in ["j", "ArrowDown", "ArrowRight", " "] {
            assert_eq!(keymap.key(&key.into()), Some(Intent::Next), "{key}");
        }

        assert_eq!(keymap.key(&"Enter".into()), None);
        assert_eq!(keymap.key(&"K".into()), None);
    }

    #[test]
    fn only_bound_keys_are_prevented() {
        let keymap = keymap();

        let mut bound = InputEvent::from(KeyEvent::new("ArrowDown"));
        assert_eq!(keymap.handle(&mut bound), Some(Intent::Next));
        assert!(matches!(bound, InputEvent::Key(ref e) if e.default_prevented()));

        let mut unbound = InputEvent::from(KeyEvent::new("Tab"));
        assert_eq!(keymap.handle(&mut unbound), None);
        assert!(matches!(unbound, InputEvent::Key(ref e) if !e.default_prevented()));
    }

    #[test]
    fn only_primary_clicks_advance() {
        let keymap = keymap();
        assert_eq!(keymap.pointer(&PointerEvent::new(Button::Primary)), Some(Intent::Next));
        assert_eq!(keymap.pointer(&PointerEvent::new(Button::Secondary)), None);
        assert_eq!(keymap.pointer(&PointerEvent::new(Button::Auxiliary)), None);

        let bindings = Bindings { click_advances: false, ..Bindings::default() };
        let keymap = Keymap::new(&bindings).unwrap();
        assert_eq!(keymap.pointer(&PointerEvent::new(Button::Primary)), None);
    }

    #[test]
    fn space_is_optional() {
        let bindings = Bindings { space_advances: false, ..Bindings::default() };
        let keymap = Keymap::new(&bindings).unwrap();
        assert_eq!(keymap.key(&Key::from_name("space")), None);
        assert_eq!(keymap.key(&"ArrowRight".into()), Some(Intent::Next));
    }

    #[test]
    fn conflicting_bindings_are_rejected() {
        let bindings = Bindings {
            previous: vec![" ".into()],
            ..Bindings::default()
        };

        let error = Keymap::new(&bindings).unwrap_err();
        assert!(error.to_string().contains("key: Space"));
    }
}
