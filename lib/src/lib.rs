#![doc = svgbobdoc::transform!(
//! Keyboard and pointer navigation for HTML slide decks.
//!
//! # Overview
//!
//! A deck is a document whose slides are elements carrying a _marker_
//! attribute (`data-slide`) and an id of the form `<prefix><index>`
//! (`slide-0`, `slide-1`, ...). The position in the deck is kept in the
//! document's _location state_, the address fragment, so that history and
//! deep links work: `talk.html#slide-3` opens the fourth slide.
//!
//! A [`SlideNavigator`] owns no position of its own. Every move decodes the
//! position from the location state, computes the next one, and writes it
//! back:
//!
//! ```svgbob
//!   .-----.   next   .-----.   next         next   .------.
//!   |  0  +--------->|  1  +--------> ... -------->| last |
//!   |     |<---------+     |<-------- ... <--------+      |
//!   '-+---' previous '-----' previous     previous '---+--'
//!     | ^                                          ^   |
//!     '-' previous                            next '---'
//! ```
//!
//! `0` and `last` absorb further moves in their direction, but input keeps
//! being handled: every move is written, so a change is always observable.
//!
//! ## Driving a deck
//!
//! 1. Discover the slides: [`Document::parse()`] on existing markup, or
//!    [`Talk::document()`] for a talk written in markdown.
//! 2. Create a [`SlideNavigator`] over a [`LocationState`] such as a
//!    [`Fragment`].
//! 3. [`bind()`](SlideNavigator::bind) it to an [`EventTarget`] and dispatch
//!    key-down and click events to the target.
//!
//! ```
//! use foil::{EventTarget, Fragment, LocationState, Settings, SlideNavigator, Talk};
//!
//! let talk = Talk::parse("---\ntitle: Hi\nauthor: K\ndate: 2023.5.2\n---\n# 1\n+++\n# 2\n")?;
//! let settings = Settings::default();
//! let fragment = Fragment::from_address("/talks/hi.html");
//!
//! let target = EventTarget::new();
//! let navigator = SlideNavigator::new(fragment.clone(), talk.document(&settings), settings)?;
//! let session = navigator.bind(&target);
//!
//! assert!(target.key_down("ArrowRight").default_prevented());
//! assert_eq!(fragment.read(), "slide-1");
//!
//! session.teardown();
//! target.key_down("ArrowLeft");
//! assert_eq!(fragment.read(), "slide-1");
//! # Ok::<(), foil::error::Error>(())
//! ```
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod config;
pub mod input;
pub mod events;
pub mod location;
pub mod document;
pub mod navigator;
pub mod deck;

pub use config::{Bindings, EmptyDeck, Settings};
pub use deck::{Talk, TalkMetadata};
pub use document::{Document, Element, SlideSource};
pub use events::{EventTarget, Listeners, Subscription};
pub use input::{Button, InputEvent, Intent, Key, KeyEvent, Keymap, PointerEvent};
pub use location::{Fragment, FragmentChange, LocationState};
pub use navigator::{Session, SlideNavigator};
