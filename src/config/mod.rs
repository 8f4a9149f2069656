use notify_debouncer_full::notify::RecommendedWatcher;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

const DEFAULT_PORT: u16 = 4400;
const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org";
// Same public key the browser start-page shipped with; override via
// LAUNCHPAD_WEATHER_KEY or config.toml for your own quota.
const DEFAULT_WEATHER_API_KEY: &str = "e33e48a1a64413cd2aa6bde6517d502a";

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// Config-save endpoint port (default: 4400).
    port: Option<u16>,
    /// Bind address for the config-save endpoint (default: "127.0.0.1").
    bind_address: Option<String>,
    /// Log level filter string, e.g. "debug", "info,launchpad=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default) | "json".
    log_format: Option<String>,
    /// Path of the page-config JSON file (default: `{data_dir}/startpage.json`).
    page_path: Option<PathBuf>,
    /// Weather provider settings (`[weather]`).
    weather: Option<TomlWeather>,
}

#[derive(Deserialize, Default)]
struct TomlWeather {
    /// Override the provider base URL (tests point this at a local stub).
    api_base_url: Option<String>,
    /// Provider API key.
    api_key: Option<String>,
    /// Location override; the page config's `temperature.location` is the
    /// usual source.
    location: Option<String>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── Settings ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct WeatherSettings {
    pub api_base_url: String,
    pub api_key: String,
    /// Overrides the page config's `temperature.location` when set.
    pub location: Option<String>,
}

/// Runtime settings, as opposed to the page configuration the console
/// edits. Built once at startup; the page config is the hot-reloadable
/// part.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    /// The page-config JSON file — the one file the save endpoint overwrites.
    pub page_path: PathBuf,
    pub port: u16,
    pub bind_address: String,
    pub log: String,
    /// "pretty" (default) | "json".
    pub log_format: String,
    pub weather: WeatherSettings,
}

impl Settings {
    /// Build settings from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        page: Option<PathBuf>,
        data_dir: Option<PathBuf>,
        port: Option<u16>,
        bind_address: Option<String>,
        log: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let toml = load_toml(&data_dir).unwrap_or_default();

        let page_path = page
            .or(toml.page_path)
            .unwrap_or_else(|| data_dir.join("startpage.json"));
        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let bind_address = bind_address
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let log_format = std::env::var("LAUNCHPAD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let toml_weather = toml.weather.unwrap_or_default();
        let api_base_url = std::env::var("LAUNCHPAD_WEATHER_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml_weather.api_base_url)
            .unwrap_or_else(|| DEFAULT_WEATHER_API_URL.to_string());
        let api_key = std::env::var("LAUNCHPAD_WEATHER_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml_weather.api_key)
            .unwrap_or_else(|| DEFAULT_WEATHER_API_KEY.to_string());
        let location = std::env::var("LAUNCHPAD_LOCATION")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml_weather.location);

        Self {
            data_dir,
            page_path,
            port,
            bind_address,
            log,
            log_format,
            weather: WeatherSettings {
                api_base_url,
                api_key,
                location,
            },
        }
    }
}

// ─── Page file watcher ────────────────────────────────────────────────────────

/// Watches the page-config file and signals the console to hot-reload the
/// tree — this is how the save endpoint and a running console compose
/// without shared state.
pub struct PageWatcher {
    // Hold the watcher alive; dropping it stops the file watch.
    _watcher:
        notify_debouncer_full::Debouncer<RecommendedWatcher, notify_debouncer_full::FileIdMap>,
}

impl PageWatcher {
    /// Start watching `page_path`. Returns `None` if the watcher could not
    /// be created (non-fatal; the console runs fine without hot-reload).
    pub fn start(page_path: &Path, tx: mpsc::Sender<()>) -> Option<Self> {
        let page_path = page_path.to_path_buf();
        let file_name = page_path.file_name()?.to_owned();
        let watch_path = page_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let watcher = notify_debouncer_full::new_debouncer(
            std::time::Duration::from_millis(500),
            None,
            move |result: notify_debouncer_full::DebounceEventResult| {
                if let Ok(events) = result {
                    use notify_debouncer_full::notify::EventKind;
                    let relevant = events.iter().any(|e| {
                        matches!(e.event.kind, EventKind::Modify(_) | EventKind::Create(_))
                            && e.event
                                .paths
                                .iter()
                                .any(|p| p.file_name() == Some(file_name.as_os_str()))
                    });
                    if relevant {
                        let _ = tx.try_send(());
                    }
                }
            },
        );

        match watcher {
            Ok(mut debouncer) => {
                use notify_debouncer_full::notify::Watcher as _;
                // Watch the parent directory since watching a non-existent
                // file fails on some platforms.
                if let Err(e) = debouncer.watcher().watch(
                    &watch_path,
                    notify_debouncer_full::notify::RecursiveMode::NonRecursive,
                ) {
                    warn!("page watcher failed to start: {e} — hot-reload disabled");
                    return None;
                }
                info!(path = %page_path.display(), "page hot-reload watcher started");
                Some(Self {
                    _watcher: debouncer,
                })
            }
            Err(e) => {
                warn!("page watcher creation failed: {e} — hot-reload disabled");
                None
            }
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/launchpad
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("launchpad");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/launchpad or ~/.local/share/launchpad
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("launchpad");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("launchpad");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\launchpad
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("launchpad");
        }
    }
    // Fallback
    PathBuf::from(".launchpad")
}
