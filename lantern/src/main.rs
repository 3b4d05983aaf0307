use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use foil::error::{Chainable, Result};
use foil::{error, Settings, Talk};

mod drive;
mod flags;

/// Settings file looked up beside a talk when none is given.
pub const CONFIG_FILE: &str = "lantern.toml";

fn main() -> ExitCode {
    let flags = flags::Lantern::from_env_or_exit();
    init_tracing(flags.verbose);

    let result = match flags.subcommand {
        flags::LanternCmd::Slides(cmd) => slides(cmd),
        flags::LanternCmd::Info(cmd) => info(cmd),
        flags::LanternCmd::Drive(cmd) => drive::drive(cmd),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn slides(cmd: flags::Slides) -> Result<()> {
    let settings = load_settings(&cmd.talk, cmd.config.as_deref())?;
    let talk = Talk::read(&cmd.talk)?;
    print!("{}", talk.markup(&settings));
    Ok(())
}

fn info(cmd: flags::Info) -> Result<()> {
    let talk = Talk::read(&cmd.talk)?;
    let manifest = talk.manifest()?;
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}

/// Reads `config` if given, else [`CONFIG_FILE`] beside `talk` if it exists,
/// else the defaults.
pub fn load_settings(talk: &Path, config: Option<&Path>) -> Result<Settings> {
    let sibling = talk.parent().map(|dir| dir.join(CONFIG_FILE));
    let path = match (config, sibling) {
        (Some(config), _) => config.to_path_buf(),
        (None, Some(sibling)) if sibling.is_file() => sibling,
        (None, _) => return Ok(Settings::default()),
    };

    tracing::debug!(path = %path.display(), "loading settings");
    Settings::read(&path).chain(error!("invalid lantern configuration"))
}
