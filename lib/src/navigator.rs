use std::rc::Rc;

use crate::config::{EmptyDeck, Settings};
use crate::document::SlideSource;
use crate::error::Result;
use crate::events::{EventTarget, Subscription};
use crate::input::{Intent, Keymap};
use crate::location::LocationState;
use crate::util::parse_ordinal;

/// Moves through the slides of `S`, keeping the position in `L`.
///
/// The navigator keeps no position of its own: every operation decodes the
/// position from the location state and writes the new one back, so changes
/// made elsewhere, e.g. through history, are always honored.
#[derive(Debug)]
pub struct SlideNavigator<L, S> {
    location: L,
    slides: S,
    settings: Settings,
    keymap: Keymap,
}

impl<L: LocationState, S: SlideSource> SlideNavigator<L, S> {
    /// Validates `settings` and, under [`EmptyDeck::Reject`], that `slides`
    /// contains at least one slide.
    pub fn new(location: L, slides: S, settings: Settings) -> Result<Self> {
        let keymap = settings.validate()?;
        let navigator = SlideNavigator { location, slides, settings, keymap };
        navigator.last_index()?;
        Ok(navigator)
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// Decodes the position from the location state. Anything other than the
    /// prefix followed by a non-negative integer decodes to `0`.
    ///
    /// Out-of-range positions are returned as-is unless
    /// [`Settings::clamp_on_read`] is set.
    pub fn current_index(&self) -> usize {
        let index = decode(&self.location.read(), &self.settings.prefix).unwrap_or(0);
        if !self.settings.clamp_on_read {
            return index;
        }

        match self.last_index() {
            Ok(last) => index.min(last),
            Err(_) => index,
        }
    }

    /// The largest ordinal among marked elements whose id has the prefix.
    /// Ids with an unparseable suffix are ignored.
    pub fn last_index(&self) -> Result<usize> {
        let prefix = &self.settings.prefix;
        let marker = &self.settings.marker;
        let last = self.slides.marked_ids(marker)
            .into_iter()
            .filter_map(|id| decode(id, prefix))
            .max();

        match (last, self.settings.empty_deck) {
            (Some(last), _) => Ok(last),
            (None, EmptyDeck::Single) => Ok(0),
            (None, EmptyDeck::Reject) => err! {
                "document contains no slides",
                "marker attribute" => marker,
                "id prefix" => prefix,
            },
        }
    }

    pub fn go_to_previous(&self) -> usize {
        let index = self.current_index().saturating_sub(1);
        self.commit(index);
        index
    }

    pub fn go_to_next(&self) -> Result<usize> {
        let last = self.last_index()?;
        let index = self.current_index().saturating_add(1).min(last);
        self.commit(index);
        Ok(index)
    }

    pub fn apply(&self, intent: Intent) -> Result<usize> {
        match intent {
            Intent::Previous => Ok(self.go_to_previous()),
            Intent::Next => self.go_to_next(),
        }
    }

    /// Writes `index` so that observers always see a change, even when the
    /// position did not move.
    fn commit(&self, index: usize) {
        let fragment = encode(&self.settings.prefix, index);
        self.location.announce_change();
        self.location.write(&fragment);
        tracing::debug!(%fragment, "moved to slide");
    }
}

impl<L, S> SlideNavigator<L, S>
    where L: LocationState + 'static, S: SlideSource + 'static
{
    /// Binds the navigator to every key-down and click on `target`.
    ///
    /// The binding lasts until the returned session is torn down or dropped.
    /// Listeners on the location state may read the navigator while it moves.
    pub fn bind(self, target: &EventTarget) -> Session<L, S> {
        let navigator = Rc::new(self);
        let subscription = target.listen({
            let navigator = navigator.clone();
            move |event| {
                let Some(intent) = navigator.keymap.handle(event) else {
                    return;
                };

                if let Err(e) = navigator.apply(intent) {
                    tracing::warn!(?intent, "ignoring navigation input:\n{e}");
                }
            }
        });

        Session { navigator, subscription }
    }
}

/// A navigator bound to an event target.
#[derive(Debug)]
pub struct Session<L, S> {
    navigator: Rc<SlideNavigator<L, S>>,
    subscription: Subscription,
}

impl<L, S> Session<L, S> {
    pub fn navigator(&self) -> &Rc<SlideNavigator<L, S>> {
        &self.navigator
    }

    /// Stops responding to input and returns the navigator.
    pub fn teardown(self) -> Rc<SlideNavigator<L, S>> {
        self.subscription.unsubscribe();
        self.navigator
    }
}

fn decode(value: &str, prefix: &str) -> Option<usize> {
    value.strip_prefix(prefix).and_then(parse_ordinal)
}

fn encode(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}")
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::document::{Document, Element};
    use crate::events::EventTarget;
    use crate::input::Button;
    use crate::location::{Fragment, LocationState};

    fn deck(n: usize) -> Document {
        Document::new((0..n).map(|i| {
            Element::new("section")
                .with_attribute("data-slide", None)
                .with_attribute("id", Some(format!("slide-{i}").as_str()))
        }).collect())
    }

    fn navigator(state: &str, slides: usize) -> (Fragment, SlideNavigator<Fragment, Document>) {
        let fragment = Fragment::new(state);
        let navigator = SlideNavigator::new(fragment.clone(), deck(slides), Settings::default());
        (fragment, navigator.unwrap())
    }

    #[test]
    fn malformed_state_decodes_to_zero() {
        for state in ["", "slide-", "slide", "page-3", "slide--1", "slide-+1", "slide-1a", "slide- 1", "Slide-2", "#slide-2"] {
            let (_, navigator) = navigator(state, 5);
            assert_eq!(navigator.current_index(), 0, "{state:?}");
        }
    }

    #[test]
    fn scenario_forward_to_the_ceiling() {
        let (fragment, navigator) = navigator("", 5);
        assert_eq!(navigator.current_index(), 0);

        for expected in 1..=4 {
            assert_eq!(navigator.go_to_next().unwrap(), expected);
        }

        assert_eq!(fragment.read(), "slide-4");
        assert_eq!(navigator.go_to_next().unwrap(), 4);
        assert_eq!(fragment.read(), "slide-4");
    }

    #[test]
    fn scenario_back_to_the_floor() {
        let (fragment, navigator) = navigator("slide-4", 5);
        let seen: Vec<_> = (0..5).map(|_| navigator.go_to_previous()).collect();
        assert_eq!(seen, [3, 2, 1, 0, 0]);
        assert_eq!(fragment.read(), "slide-0");
    }

    #[test]
    fn scenario_out_of_range_is_not_repaired() {
        let (fragment, navigator) = navigator("slide-99", 5);
        assert_eq!(navigator.current_index(), 99);
        assert_eq!(navigator.go_to_previous(), 98);
        assert_eq!(fragment.read(), "slide-98");
        assert_eq!(navigator.go_to_next().unwrap(), 4);
    }

    #[test]
    fn clamp_on_read_repairs_out_of_range() {
        let settings = Settings { clamp_on_read: true, ..Settings::default() };
        let navigator = SlideNavigator::new(Fragment::new("slide-99"), deck(5), settings).unwrap();
        assert_eq!(navigator.current_index(), 4);
    }

    #[test]
    fn last_index_ignores_foreign_and_malformed_ids() {
        let mut elements = deck(3).elements().to_vec();
        elements.push(Element::new("section").with_attribute("data-slide", None).with_attribute("id", Some("slide-intro")));
        elements.push(Element::new("section").with_attribute("data-slide", None).with_attribute("id", Some("title")));
        elements.push(Element::new("section").with_attribute("id", Some("slide-40")));
        elements.push(Element::new("section").with_attribute("data-slide", None).with_attribute("id", Some("slide-12")));

        let navigator = SlideNavigator::new(Fragment::default(), Document::new(elements), Settings::default());
        assert_eq!(navigator.unwrap().last_index().unwrap(), 12);
    }

    #[test]
    fn empty_deck_policy() {
        let error = SlideNavigator::new(Fragment::default(), deck(0), Settings::default()).unwrap_err();
        assert_eq!(error.message(), "document contains no slides");

        let settings = Settings { empty_deck: EmptyDeck::Single, ..Settings::default() };
        let navigator = SlideNavigator::new(Fragment::default(), deck(0), settings).unwrap();
        assert_eq!(navigator.last_index().unwrap(), 0);
        assert_eq!(navigator.go_to_next().unwrap(), 0);
        assert_eq!(navigator.go_to_previous(), 0);
    }

    #[test]
    fn every_move_signals_a_change() {
        let (fragment, navigator) = navigator("slide-0", 2);
        let changes = Rc::new(RefCell::new(vec![]));
        let _sub = fragment.on_change({
            let changes = changes.clone();
            move |change| changes.borrow_mut().push(change.new.clone())
        });

        navigator.go_to_previous();
        navigator.go_to_next().unwrap();
        navigator.go_to_next().unwrap();
        assert_eq!(*changes.borrow(), ["", "slide-0", "", "slide-1", "", "slide-1"]);
    }

    #[test]
    fn right_arrow_is_a_prevented_click() {
        let target = EventTarget::new();
        let (fragment, navigator) = navigator("slide-1", 5);
        let _session = navigator.bind(&target);

        let event = target.key_down("ArrowRight");
        assert!(event.default_prevented());
        assert_eq!(fragment.read(), "slide-2");

        target.click(Button::Primary);
        assert_eq!(fragment.read(), "slide-3");

        let event = target.key_down("Escape");
        assert!(!event.default_prevented());
        target.click(Button::Secondary);
        assert_eq!(fragment.read(), "slide-3");

        target.key_down("ArrowLeft");
        target.key_down("k");
        target.key_down(" ");
        assert_eq!(fragment.read(), "slide-2");
    }

    #[test]
    fn history_moves_are_honored() {
        let target = EventTarget::new();
        let (fragment, navigator) = navigator("", 5);
        let _session = navigator.bind(&target);

        target.key_down("j");
        target.key_down("j");
        assert_eq!(fragment.read(), "slide-2");

        // Back past the cleared entry to the previous slide.
        assert!(fragment.back());
        assert!(fragment.back());
        assert_eq!(fragment.read(), "slide-1");

        target.key_down("j");
        assert_eq!(fragment.read(), "slide-2");
    }

    #[test]
    fn teardown_stops_navigation() {
        let target = EventTarget::new();
        let (fragment, navigator) = navigator("", 3);
        let session = navigator.bind(&target);

        target.click(Button::Primary);
        let navigator = session.teardown();
        target.click(Button::Primary);

        assert_eq!(fragment.read(), "slide-1");
        assert_eq!(target.listener_count(), 0);
        assert_eq!(navigator.current_index(), 1);
    }

    #[test]
    fn change_listeners_can_read_the_bound_navigator() {
        let target = EventTarget::new();
        let (fragment, navigator) = navigator("slide-0", 2);
        let session = Rc::new(navigator.bind(&target));

        let seen = Rc::new(RefCell::new(vec![]));
        let _redraw = fragment.on_change({
            let session = Rc::downgrade(&session);
            let seen = seen.clone();
            move |_| {
                if let Some(session) = session.upgrade() {
                    let navigator = session.navigator();
                    let position = (navigator.current_index(), navigator.last_index().unwrap());
                    seen.borrow_mut().push(position);
                }
            }
        });

        target.key_down("ArrowRight");
        target.key_down("ArrowRight");
        assert_eq!(*seen.borrow(), [(0, 1), (1, 1), (0, 1), (1, 1)]);
        assert_eq!(session.navigator().location().read(), "slide-1");
    }

    #[test]
    fn failed_transitions_are_swallowed() {
        // A source whose slides disappear after startup.
        struct Vanishing(RefCell<bool>);

        impl SlideSource for Vanishing {
            fn marked_ids(&self, _: &str) -> Vec<&str> {
                match self.0.replace(false) {
                    true => vec!["slide-0", "slide-1"],
                    false => vec![],
                }
            }
        }

        let target = EventTarget::new();
        let fragment = Fragment::new("slide-0");
        let source = Vanishing(RefCell::new(true));
        let navigator = SlideNavigator::new(fragment.clone(), source, Settings::default()).unwrap();
        let _session = navigator.bind(&target);

        let event = target.key_down("ArrowDown");
        assert!(event.default_prevented());
        assert_eq!(fragment.read(), "slide-0");
        assert_eq!(fragment.history_len(), 1);
    }

    proptest! {
        #[test]
        fn well_formed_state_decodes_exactly(n in 0usize..1_000_000) {
            let (_, navigator) = navigator(&format!("slide-{n}"), 5);
            prop_assert_eq!(navigator.current_index(), n);
        }

        #[test]
        fn foreign_state_decodes_to_zero(state in "[^s].*|s[^l].*|-?[0-9]+|slide-[^0-9].*") {
            let (_, navigator) = navigator(&state, 5);
            prop_assert_eq!(navigator.current_index(), 0);
        }

        #[test]
        fn negative_suffix_decodes_to_zero(n in 1usize..1_000) {
            let (_, navigator) = navigator(&format!("slide--{n}"), 5);
            prop_assert_eq!(navigator.current_index(), 0);
        }

        #[test]
        fn floor_and_ceiling_absorb(last in 0usize..50, presses in 1usize..10) {
            let (fragment, navigator) = navigator("slide-0", last + 1);
            for _ in 0..presses {
                prop_assert_eq!(navigator.go_to_previous(), 0);
            }

            let ceiling = SlideNavigator::new(fragment.clone(), deck(last + 1), Settings::default()).unwrap();
            fragment.write(&format!("slide-{last}"));
            for _ in 0..presses {
                prop_assert_eq!(ceiling.go_to_next().unwrap(), last);
            }

            prop_assert_eq!(fragment.read(), format!("slide-{last}"));
        }

        #[test]
        fn interior_moves_by_one(last in 1usize..50, seed in 0usize..1_000) {
            let i = seed % last;
            let (fragment, navigator) = navigator(&format!("slide-{i}"), last + 1);
            prop_assert_eq!(navigator.go_to_next().unwrap(), i + 1);
            prop_assert_eq!(navigator.go_to_previous(), i);
            prop_assert_eq!(fragment.read(), format!("slide-{i}"));
        }
    }
}
