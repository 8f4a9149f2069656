// Command interpreter: one line of console input in, one Outcome out.
//
// Outcomes are plain data — the terminal layer decides how to show a view
// switch, a result line, or a navigation. All failures are local: an error
// outcome leaves the store untouched.

use tracing::debug;

use crate::console::grammar::{self, Command, EditMode};
use crate::console::suggest::ShortcutIndex;
use crate::store::Store;
use crate::urls;

/// What the console should do after a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do (empty input, or no search engine configured).
    None,
    ShowLinks,
    ShowHome,
    ShowHelp,
    /// Trigger a forecast fetch and switch to the weather view.
    ShowWeather,
    /// Advance to the next landing background.
    CycleBackground,
    /// A result line, e.g. after a successful mutation.
    Notice(String),
    /// Inline error line; state is unchanged.
    Error(String),
    /// Open a URL (shortcut, normalized input, or search engine query).
    Navigate(String),
}

/// Parse and execute one line of input against the store.
pub fn execute(line: &str, store: &mut Store) -> Outcome {
    let value = line.trim();
    if value.is_empty() {
        return Outcome::None;
    }

    if value.starts_with('/') {
        return match grammar::parse_command(value) {
            Ok(command) => run_command(command, store),
            Err(err) => Outcome::Error(err.message()),
        };
    }

    if urls::is_about_page(value) {
        return Outcome::Error(format!(
            "error: {value} is a browser-only page. Open it from the browser address bar."
        ));
    }

    let index = ShortcutIndex::new(store.config());
    if let Some(url) = index.shortcut_url(value) {
        return Outcome::Navigate(url.to_string());
    }

    if let Some(url) = urls::normalize(value) {
        return Outcome::Navigate(url);
    }

    match urls::search_url(value, &store.config().search) {
        Some(url) => Outcome::Navigate(url),
        None => Outcome::None,
    }
}

fn run_command(command: Command, store: &mut Store) -> Outcome {
    match command {
        Command::List => Outcome::ShowLinks,
        Command::Home => Outcome::ShowHome,
        Command::Help => Outcome::ShowHelp,
        Command::Weather => Outcome::ShowWeather,
        Command::Background => Outcome::CycleBackground,

        Command::Username { name } => {
            store.set_username(&name);
            Outcome::Notice(format!("Username set to {name}."))
        }

        Command::Add { url, group } => {
            let Some(url) = urls::normalize(&url) else {
                return invalid_url("/add");
            };
            match store.add_link(&url, &group) {
                Ok(receipt) => {
                    debug!(url = %url, group = %group, "link added");
                    Outcome::Notice(format!(
                        "Added {} to {} / {}.",
                        receipt.name, receipt.tab, receipt.category
                    ))
                }
                Err(err) => Outcome::Error(err.to_string()),
            }
        }

        Command::Remove { url, group } => {
            let Some(url) = urls::normalize(&url) else {
                return invalid_url("/remove");
            };
            match store.remove_link(&url, &group) {
                Ok(receipt) => {
                    debug!(url = %url, group = %group, "link removed");
                    Outcome::Notice(format!(
                        "Removed {} from {}.",
                        receipt.name, receipt.category
                    ))
                }
                Err(err) => Outcome::Error(err.to_string()),
            }
        }

        Command::Edit { target, mode, payload } => {
            let Some(target) = urls::normalize(&target) else {
                return invalid_url("/edit");
            };
            run_edit(&target, mode, &payload, store)
        }
    }
}

fn run_edit(target: &str, mode: EditMode, payload: &str, store: &mut Store) -> Outcome {
    let result = match mode {
        EditMode::Url => {
            let Some(next_url) = urls::normalize(payload) else {
                return Outcome::Error(format!(
                    "Invalid URL. Usage: {}",
                    grammar::EDIT_URL_USAGE
                ));
            };
            store.edit_url(target, &next_url).map(|receipt| {
                format!("Updated {} in {}.", receipt.name, receipt.category)
            })
        }
        EditMode::Title => store
            .retitle(target, payload)
            .map(|receipt| format!("Renamed link in {} to {}.", receipt.category, receipt.name)),
        EditMode::Group => {
            return match store.regroup(target, payload) {
                Ok(receipt) => Outcome::Notice(format!(
                    "Moved {} from {} to {}.",
                    receipt.name, receipt.from, receipt.to
                )),
                Err(err) => Outcome::Error(err.to_string()),
            };
        }
    };

    match result {
        Ok(notice) => Outcome::Notice(notice),
        Err(err) => Outcome::Error(err.to_string()),
    }
}

fn invalid_url(name: &str) -> Outcome {
    let usage = grammar::COMMANDS
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| spec.usage)
        .unwrap_or_default();
    Outcome::Error(format!("Invalid URL. Usage: {usage}"))
}
