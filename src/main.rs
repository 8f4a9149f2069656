use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use launchpad::config::Settings;
use launchpad::weather::WeatherClient;
use launchpad::{render, rest, storage, ui};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "launchpad",
    about = "Terminal start-page — bookmark tabs, weather, and a command console",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path of the page-config JSON file
    #[arg(long, env = "LAUNCHPAD_PAGE")]
    page: Option<std::path::PathBuf>,

    /// Data directory for config.toml, the default page file, and logs
    #[arg(long, env = "LAUNCHPAD_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Config-save endpoint port
    #[arg(long, env = "LAUNCHPAD_PORT")]
    port: Option<u16>,

    /// Bind address for the config-save endpoint (default: 127.0.0.1)
    #[arg(long, env = "LAUNCHPAD_BIND")]
    bind_address: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LAUNCHPAD_LOG")]
    log: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "LAUNCHPAD_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive console (default when no subcommand given).
    ///
    /// Examples:
    ///   launchpad
    ///   launchpad console
    Console,
    /// Serve the config persistence endpoint.
    ///
    /// POST /api/v1/config overwrites the page file with pretty-printed
    /// JSON; GET returns it. Pair with a running console — the console
    /// hot-reloads the file on change.
    ///
    /// Examples:
    ///   launchpad serve
    ///   launchpad serve --port 4400
    Serve,
    /// One-shot weather printout for the configured location.
    ///
    /// Examples:
    ///   launchpad weather
    ///   launchpad weather --forecast
    ///   launchpad weather --location "Manchester"
    Weather {
        /// Location override; defaults to the page config's temperature.location.
        #[arg(long)]
        location: Option<String>,
        /// Also print the 12-hour and 5-day forecast.
        #[arg(long)]
        forecast: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Arc::new(Settings::new(
        args.page,
        args.data_dir,
        args.port,
        args.bind_address,
        args.log,
    ));

    // Console mode owns stdout, so its logs always go to a file.
    let log_file = match args.command {
        None | Some(Command::Console) => Some(
            args.log_file
                .unwrap_or_else(|| settings.data_dir.join("launchpad.log")),
        ),
        _ => args.log_file,
    };
    let _file_guard = setup_logging(&settings.log, log_file.as_deref(), &settings.log_format);

    match args.command {
        None | Some(Command::Console) => {
            info!(page = %settings.page_path.display(), "starting console");
            ui::run_console(settings).await
        }
        Some(Command::Serve) => rest::serve(settings).await,
        Some(Command::Weather { location, forecast }) => {
            run_weather(&settings, location, forecast).await
        }
    }
}

// ─── One-shot weather ─────────────────────────────────────────────────────────

/// Fetch and print the current conditions (and optionally the forecast),
/// then exit. Exits nonzero when no location is configured anywhere.
async fn run_weather(
    settings: &Settings,
    location: Option<String>,
    with_forecast: bool,
) -> Result<()> {
    let page = storage::load_page(&settings.page_path).unwrap_or_default();
    let scale = page.temperature.scale;
    let location = location
        .or_else(|| settings.weather.location.clone())
        .or(page.temperature.location);

    let Some(location) = location else {
        anyhow::bail!("no location configured — set temperature.location in the page config");
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Fetching weather for {location}…"));
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let client = WeatherClient::new(settings, &location)?;
    let current = client.current().await;
    let forecast = if with_forecast {
        Some(client.forecast().await)
    } else {
        None
    };
    spinner.finish_and_clear();

    match current {
        Ok(current) => println!("{}", render::weather_line(&current, scale, &location)),
        Err(err) => {
            eprintln!("{}", render::WEATHER_UNAVAILABLE);
            return Err(err);
        }
    }

    if let Some(forecast) = forecast {
        let lines = match forecast {
            Ok(forecast) => render::weather_view(&forecast, scale, chrono::Utc::now().timestamp()),
            Err(_) => vec![render::Line::Output(render::WEATHER_UNAVAILABLE.to_string())],
        };
        for line in lines {
            println!("{}", line.to_text());
        }
    }

    Ok(())
}

// ─── Logging setup ────────────────────────────────────────────────────────────

/// Initialize the tracing subscriber.
/// If `log_file` is set, logs go to a daily-rolling file (the console owns
/// stdout, so stdout layers are skipped in file mode).
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format) or
/// `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, falls back to stdout-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("launchpad.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}
