use std::io::{self, BufRead, Write};

use foil::error::{Chainable, Result};
use foil::{error, Button, Document, EventTarget, Fragment, Key, LocationState, Session, SlideNavigator, Talk};

use crate::flags::Drive;

/// One token of replayed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Key(Key),
    Click(Button),
    Back,
    Forward,
}

impl Action {
    pub fn parse(token: &str) -> Action {
        match token {
            "click" => Action::Click(Button::Primary),
            "middle-click" => Action::Click(Button::Auxiliary),
            "right-click" => Action::Click(Button::Secondary),
            "back" => Action::Back,
            "forward" => Action::Forward,
            key => Action::Key(Key::from_name(key)),
        }
    }
}

pub fn drive(cmd: Drive) -> Result<()> {
    let settings = crate::load_settings(&cmd.talk, cmd.config.as_deref())?;
    let talk = Talk::read(&cmd.talk)?;

    let at = cmd.at.as_deref().unwrap_or("");
    let fragment = Fragment::new(at.strip_prefix('#').unwrap_or(at));
    let target = EventTarget::new();
    let navigator = SlideNavigator::new(fragment, talk.document(&settings), settings)
        .chain_with(|| error! {
            "failed to start navigator",
            "talk" => cmd.talk.display(),
        })?;

    let session = navigator.bind(&target);
    let result = replay(io::stdin().lock(), io::stdout().lock(), &target, &session);
    let navigator = session.teardown();
    tracing::debug!(slide = navigator.current_index(), "finished replay");
    result
}

/// Dispatches every whitespace-separated token of `input` and writes the
/// fragment, `#`-prefixed, after each one.
pub fn replay<R, W>(
    input: R,
    mut output: W,
    target: &EventTarget,
    session: &Session<Fragment, Document>,
) -> Result<()>
    where R: BufRead, W: Write
{
    let fragment = session.navigator().location();
    for line in input.lines() {
        for token in line?.split_whitespace() {
            match Action::parse(token) {
                Action::Key(key) => { target.key_down(key); }
                Action::Click(button) => { target.click(button); }
                Action::Back => { fragment.back(); }
                Action::Forward => { fragment.forward(); }
            }

            let hash = fragment.read();
            match hash.is_empty() {
                true => writeln!(output)?,
                false => writeln!(output, "#{hash}")?,
            }
        }
    }

    output.flush()?;
    Ok(())
}
