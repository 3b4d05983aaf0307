use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Chainable, Result};
use crate::input::{Key, Keymap};

/// Navigator settings, usually read from a TOML file.
///
/// Every field has a default, so an empty file is a valid configuration:
///
/// ```toml
/// prefix = "slide-"
/// marker = "data-slide"
/// empty_deck = "reject"
/// clamp_on_read = false
///
/// [bindings]
/// previous = ["k", "ArrowUp", "ArrowLeft"]
/// next = ["j", "ArrowDown", "ArrowRight"]
/// space_advances = true
/// click_advances = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Prefix shared by slide ids and fragment values.
    pub prefix: String,
    /// Attribute that marks an element as a slide.
    pub marker: String,
    pub empty_deck: EmptyDeck,
    /// Clamp an out-of-range fragment to the last slide when reading it.
    pub clamp_on_read: bool,
    pub bindings: Bindings,
}

/// What to do when no element qualifies as a slide.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyDeck {
    /// Refuse to navigate; starting a navigator fails.
    #[default]
    Reject,
    /// Behave as though there is exactly one slide, at index 0.
    Single,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Bindings {
    pub previous: Vec<Key>,
    pub next: Vec<Key>,
    /// Whether the space key also goes to the next slide.
    pub space_advances: bool,
    /// Whether a primary click anywhere goes to the next slide.
    pub click_advances: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            prefix: "slide-".into(),
            marker: "data-slide".into(),
            empty_deck: EmptyDeck::default(),
            clamp_on_read: false,
            bindings: Bindings::default(),
        }
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Bindings {
            previous: vec!["k".into(), "ArrowUp".into(), "ArrowLeft".into()],
            next: vec!["j".into(), "ArrowDown".into(), "ArrowRight".into()],
            space_advances: true,
            click_advances: true,
        }
    }
}

impl Settings {
    pub fn from_toml(string: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(string)
            .chain(error!("invalid navigator settings"))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        std::fs::read_to_string(path)
            .map_err(crate::error::Error::from)
            .and_then(|string| Self::from_toml(&string))
            .chain_with(|| error! {
                "failed to read settings file",
                "path" => path.display(),
            })
    }

    /// Checks the settings and returns the keymap their bindings describe.
    pub fn validate(&self) -> Result<Keymap> {
        if self.prefix.is_empty() {
            return err!("slide id prefix must not be empty");
        }

        let reserved = |c: char| c.is_whitespace() || "#\"'<>&".contains(c);
        if self.prefix.contains(reserved) {
            return err! {
                "slide id prefix contains a reserved character",
                "prefix" => &self.prefix,
                "reserved" => "whitespace # \" ' < > &",
            };
        }

        let valid_attribute = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        if self.marker.is_empty() || !self.marker.chars().all(valid_attribute) {
            return err! {
                "marker must be a plain attribute name",
                "marker" => &self.marker,
            };
        }

        Keymap::new(&self.bindings)
    }
}
