// Interpreter routing: commands, shortcuts, URLs, and the search fallback.

use launchpad::console::{execute, Outcome};
use launchpad::page::{Category, Link, PageConfig, SearchConfig, Tab};
use launchpad::store::Store;
use std::collections::BTreeMap;

fn sample_store() -> Store {
    let mut engines = BTreeMap::new();
    engines.insert(
        "d".to_string(),
        ("https://duckduckgo.com/?q=".to_string(), "DuckDuckGo".to_string()),
    );

    Store::new(PageConfig {
        username: "guest".into(),
        search: SearchConfig {
            engines,
            default: "d".into(),
        },
        tabs: vec![Tab {
            name: "myself".into(),
            background_url: String::new(),
            categories: vec![Category {
                name: "dev".into(),
                links: vec![Link::new("github", "https://github.com")],
            }],
        }],
        ..PageConfig::default()
    })
}

// ─── View commands ────────────────────────────────────────────────────────────

#[test]
fn view_commands_map_to_outcomes() {
    let mut store = sample_store();
    assert_eq!(execute("/list", &mut store), Outcome::ShowLinks);
    assert_eq!(execute("/home", &mut store), Outcome::ShowHome);
    assert_eq!(execute("/help", &mut store), Outcome::ShowHelp);
    assert_eq!(execute("/weather", &mut store), Outcome::ShowWeather);
    assert_eq!(execute("/background", &mut store), Outcome::CycleBackground);
}

#[test]
fn empty_input_is_a_noop() {
    let mut store = sample_store();
    assert_eq!(execute("   ", &mut store), Outcome::None);
}

#[test]
fn unknown_command_is_reported() {
    let mut store = sample_store();
    assert_eq!(
        execute("/frobnicate", &mut store),
        Outcome::Error("Command not found. Use /help for the list of available commands.".into())
    );
}

// ─── Mutations ────────────────────────────────────────────────────────────────

#[test]
fn add_normalizes_url_and_reports_placement() {
    let mut store = sample_store();
    let outcome = execute(r#"/add "crates.io" -dev"#, &mut store);
    assert_eq!(
        outcome,
        Outcome::Notice("Added crates.io to myself / dev.".into())
    );

    let link = &store.config().tabs[0].categories[0].links[1];
    assert_eq!(link.url, "https://crates.io");
    assert_eq!(link.name.as_deref(), Some("crates.io"));
}

#[test]
fn duplicate_add_is_an_error_and_leaves_count_unchanged() {
    let mut store = sample_store();
    let outcome = execute(r#"/add "github.com" -dev"#, &mut store);
    assert_eq!(
        outcome,
        Outcome::Error("That URL already exists in the selected group.".into())
    );
    assert_eq!(store.config().tabs[0].categories[0].links.len(), 1);
}

#[test]
fn add_rejects_non_url() {
    let mut store = sample_store();
    let outcome = execute(r#"/add "not a url" -dev"#, &mut store);
    assert_eq!(
        outcome,
        Outcome::Error(r#"Invalid URL. Usage: /add "url.com" -group"#.into())
    );
}

#[test]
fn add_bad_syntax_names_the_usage() {
    let mut store = sample_store();
    let outcome = execute("/add github.com -dev", &mut store);
    assert_eq!(
        outcome,
        Outcome::Error(r#"Invalid /add syntax. Usage: /add "url.com" -group"#.into())
    );
}

#[test]
fn remove_reports_name_and_category() {
    let mut store = sample_store();
    let outcome = execute(r#"/remove "github.com" -dev"#, &mut store);
    assert_eq!(outcome, Outcome::Notice("Removed github from dev.".into()));
    assert!(store.config().tabs[0].categories[0].links.is_empty());
}

#[test]
fn edit_url_payload_must_be_a_url() {
    let mut store = sample_store();
    let outcome = execute(r#"/edit "github.com" -u "not a url""#, &mut store);
    assert_eq!(
        outcome,
        Outcome::Error(r#"Invalid URL. Usage: /edit "url.com" -u "new.com""#.into())
    );
}

#[test]
fn edit_url_updates_and_renames() {
    let mut store = sample_store();
    let outcome = execute(r#"/edit "github.com" -u "www.new.com""#, &mut store);
    assert_eq!(outcome, Outcome::Notice("Updated new.com in dev.".into()));
    assert_eq!(
        store.config().tabs[0].categories[0].links[0].url,
        "https://www.new.com"
    );
}

#[test]
fn edit_group_moves_and_edit_title_renames() {
    let mut store = sample_store();
    assert_eq!(
        execute(r#"/edit "github.com" -g reading"#, &mut store),
        Outcome::Notice("Moved github from dev to reading.".into())
    );
    assert_eq!(
        execute(r#"/edit "github.com" -t "The Hub""#, &mut store),
        Outcome::Notice("Renamed link in reading to The Hub.".into())
    );
}

#[test]
fn username_command_mutates_store() {
    let mut store = sample_store();
    assert_eq!(
        execute("/username pix", &mut store),
        Outcome::Notice("Username set to pix.".into())
    );
    assert_eq!(store.config().username, "pix");
}

// ─── Navigation routing ───────────────────────────────────────────────────────

#[test]
fn exact_shortcut_navigates_to_its_url() {
    let mut store = sample_store();
    assert_eq!(
        execute("GitHub", &mut store),
        Outcome::Navigate("https://github.com".into())
    );
    assert_eq!(
        execute("https://github.com", &mut store),
        Outcome::Navigate("https://github.com".into())
    );
}

#[test]
fn bare_hostname_navigates_with_https() {
    let mut store = sample_store();
    assert_eq!(
        execute("example.com/path", &mut store),
        Outcome::Navigate("https://example.com/path".into())
    );
}

#[test]
fn free_text_falls_through_to_search() {
    let mut store = sample_store();
    assert_eq!(
        execute("foo bar", &mut store),
        Outcome::Navigate("https://duckduckgo.com/?q=foo%20bar".into())
    );
}

#[test]
fn free_text_without_engines_is_a_noop() {
    let mut store = Store::new(PageConfig::default());
    assert_eq!(execute("foo bar", &mut store), Outcome::None);
}

#[test]
fn about_pages_are_browser_only() {
    let mut store = sample_store();
    let Outcome::Error(message) = execute("about:config", &mut store) else {
        panic!("expected an error outcome");
    };
    assert!(message.contains("about:config"));
    assert!(message.contains("browser-only"));
}
