// SPDX-License-Identifier: MIT
// The interactive terminal console — the start-page itself.
//
// A single-threaded event loop: keystrokes mutate the input line, Enter
// runs the interpreter, Tab drives autocomplete/cycling. Weather fetches
// and page hot-reloads arrive over channels and are drained between
// keystrokes, so no two mutations ever interleave.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line as UiLine, Span},
    widgets::{Block, BorderType, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::{PageWatcher, Settings};
use crate::console::{self, Outcome, ShortcutIndex};
use crate::page::PageConfig;
use crate::render::{self, Line, WEATHER_PENDING, WEATHER_UNAVAILABLE};
use crate::storage;
use crate::store::Store;
use crate::weather::{sky, CurrentConditions, Forecast, WeatherClient};

const TICK: Duration = Duration::from_millis(50);

// Palette carried over from the page theme.
const ACCENT: Color = Color::Rgb(43, 228, 145);
const ACCENT_SOFT: Color = Color::Rgb(99, 197, 234);
const INK: Color = Color::Rgb(249, 249, 249);
const PEACH: Color = Color::Rgb(250, 148, 110);
const PINK: Color = Color::Rgb(250, 90, 164);
const SKY_BLUE: Color = Color::Rgb(137, 204, 247);

enum WeatherEvent {
    Current(CurrentConditions),
    CurrentFailed,
    Forecast(Forecast),
    ForecastFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Home,
    Links,
    Help,
    Weather,
    Notice,
}

/// Run the console until the user quits (Esc or Ctrl-C).
pub async fn run_console(settings: Arc<Settings>) -> Result<()> {
    let page = match storage::load_page(&settings.page_path) {
        Ok(page) => page,
        Err(err) => {
            warn!(err = %err, "page config unavailable — starting empty");
            PageConfig::default()
        }
    };

    let (weather_tx, weather_rx) = mpsc::channel(8);
    let (reload_tx, reload_rx) = mpsc::channel(4);
    let _watcher = PageWatcher::start(&settings.page_path, reload_tx);

    let mut app = ConsoleApp::new(settings, page, weather_tx, weather_rx, reload_rx);
    app.spawn_current_fetch();
    app.spawn_forecast_fetch();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = tokio::task::block_in_place(|| app.run(&mut terminal));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

struct ConsoleApp {
    settings: Arc<Settings>,
    store: Store,
    index: ShortcutIndex,
    view: View,
    output: Vec<Line>,
    input: String,
    error: Option<String>,
    weather_line: String,
    current: Option<CurrentConditions>,
    forecast: Option<Forecast>,
    background: &'static sky::Background,
    manual_background: Option<usize>,
    forecast_pending: bool,
    scroll: u16,
    handle: tokio::runtime::Handle,
    weather_tx: mpsc::Sender<WeatherEvent>,
    weather_rx: mpsc::Receiver<WeatherEvent>,
    reload_rx: mpsc::Receiver<()>,
}

impl ConsoleApp {
    fn new(
        settings: Arc<Settings>,
        page: PageConfig,
        weather_tx: mpsc::Sender<WeatherEvent>,
        weather_rx: mpsc::Receiver<WeatherEvent>,
        reload_rx: mpsc::Receiver<()>,
    ) -> Self {
        let store = Store::new(page);
        let index = ShortcutIndex::new(store.config());
        let has_location =
            settings.weather.location.is_some() || store.config().temperature.location.is_some();
        let weather_line = if has_location {
            WEATHER_PENDING.to_string()
        } else {
            WEATHER_UNAVAILABLE.to_string()
        };

        let mut app = Self {
            settings,
            store,
            index,
            view: View::Home,
            output: Vec::new(),
            input: String::new(),
            error: None,
            weather_line,
            current: None,
            forecast: None,
            background: &sky::BACKGROUNDS[2],
            manual_background: None,
            forecast_pending: false,
            scroll: 0,
            handle: tokio::runtime::Handle::current(),
            weather_tx,
            weather_rx,
            reload_rx,
        };
        app.show_home();
        app
    }

    fn location(&self) -> Option<String> {
        self.settings
            .weather
            .location
            .clone()
            .or_else(|| self.store.config().temperature.location.clone())
    }

    // ─── Event loop ───────────────────────────────────────────────────────────

    fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) {
                        return Ok(());
                    }
                }
            }

            self.drain_weather_events();
            self.drain_reloads();
        }
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Enter => self.handle_enter(),
            KeyCode::Tab => self.handle_tab(),
            KeyCode::BackTab => self.cycle_links(true),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => {
                let max = self.output.len().saturating_sub(1) as u16;
                self.scroll = (self.scroll + 10).min(max);
            }
            KeyCode::Char(c)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.input.push(c);
            }
            _ => {}
        }
        false
    }

    fn handle_tab(&mut self) {
        if let Some(label) = self.index.suggest(&self.input) {
            self.input = label.to_string();
            return;
        }
        self.cycle_links(false);
    }

    fn cycle_links(&mut self, backwards: bool) {
        if let Some(url) = self.index.cycle(&self.input, backwards) {
            self.input = url.to_string();
        }
    }

    fn handle_enter(&mut self) {
        self.error = None;

        if self.input.trim().is_empty() {
            // The landing's enter button: continue to the links view.
            if self.view == View::Home {
                self.show_panel(View::Links, render::links_view(self.store.config()));
            }
            return;
        }

        let line = self.input.clone();
        let outcome = console::execute(&line, &mut self.store);
        self.index = ShortcutIndex::new(self.store.config());

        match outcome {
            Outcome::None => {}
            Outcome::ShowLinks => {
                self.show_panel(View::Links, render::links_view(self.store.config()))
            }
            Outcome::ShowHome => self.show_home(),
            Outcome::ShowHelp => self.show_panel(View::Help, render::help_view()),
            Outcome::ShowWeather => self.show_weather(),
            Outcome::CycleBackground => self.cycle_background(),
            Outcome::Notice(text) => self.show_panel(View::Notice, vec![Line::Output(text)]),
            Outcome::Error(text) => {
                // Keep the input so the user can fix it in place.
                self.error = Some(text);
                return;
            }
            Outcome::Navigate(url) => {
                info!(url = %url, "navigate");
                self.show_panel(View::Notice, vec![Line::Output(format!("opening {url}"))]);
            }
        }

        self.input.clear();
    }

    // ─── Views ────────────────────────────────────────────────────────────────

    fn show_home(&mut self) {
        self.view = View::Home;
        self.scroll = 0;
        self.output = render::boot_view(&self.store.config().username, &self.weather_line);
    }

    fn show_panel(&mut self, view: View, lines: Vec<Line>) {
        self.view = view;
        self.scroll = 0;
        self.output = lines;
    }

    fn show_weather(&mut self) {
        let scale = self.store.config().temperature.scale;
        let lines = match &self.forecast {
            Some(forecast) => {
                render::weather_view(forecast, scale, chrono::Utc::now().timestamp())
            }
            None => vec![Line::Output(WEATHER_PENDING.to_string())],
        };
        self.show_panel(View::Weather, lines);
        self.spawn_forecast_fetch();
    }

    fn cycle_background(&mut self) {
        let seed = self
            .manual_background
            .or_else(|| sky::position(self.background.name))
            .unwrap_or(0);
        let next = (seed + 1) % sky::BACKGROUNDS.len();
        self.manual_background = Some(next);
        self.background = &sky::BACKGROUNDS[next];
        self.show_panel(
            View::Notice,
            vec![Line::Output(format!(
                "Background set to {}.",
                self.background.name
            ))],
        );
    }

    // ─── Weather plumbing ─────────────────────────────────────────────────────

    fn spawn_current_fetch(&self) {
        let Some(location) = self.location() else {
            return;
        };
        let settings = self.settings.clone();
        let tx = self.weather_tx.clone();

        self.handle.spawn(async move {
            let event = match WeatherClient::new(&settings, &location) {
                Ok(client) => match client.current().await {
                    Ok(current) => WeatherEvent::Current(current),
                    Err(err) => {
                        warn!(err = %err, "current weather fetch failed");
                        WeatherEvent::CurrentFailed
                    }
                },
                Err(err) => {
                    warn!(err = %err, "weather client unavailable");
                    WeatherEvent::CurrentFailed
                }
            };
            let _ = tx.send(event).await;
        });
    }

    fn spawn_forecast_fetch(&mut self) {
        if self.forecast_pending {
            return;
        }
        let Some(location) = self.location() else {
            if self.view == View::Weather {
                self.output = vec![Line::Output(WEATHER_UNAVAILABLE.to_string())];
            }
            return;
        };
        self.forecast_pending = true;
        let settings = self.settings.clone();
        let tx = self.weather_tx.clone();

        self.handle.spawn(async move {
            let event = match WeatherClient::new(&settings, &location) {
                Ok(client) => match client.forecast().await {
                    Ok(forecast) => WeatherEvent::Forecast(forecast),
                    Err(err) => {
                        warn!(err = %err, "forecast fetch failed");
                        WeatherEvent::ForecastFailed
                    }
                },
                Err(err) => {
                    warn!(err = %err, "weather client unavailable");
                    WeatherEvent::ForecastFailed
                }
            };
            let _ = tx.send(event).await;
        });
    }

    fn drain_weather_events(&mut self) {
        while let Ok(event) = self.weather_rx.try_recv() {
            match event {
                WeatherEvent::Current(current) => {
                    let scale = self.store.config().temperature.scale;
                    let location = self.location().unwrap_or_default();
                    self.weather_line = render::weather_line(&current, scale, &location);
                    self.current = Some(current);
                    self.refresh_sky();
                    if self.view == View::Home {
                        self.show_home();
                    }
                }
                WeatherEvent::CurrentFailed => {
                    self.weather_line = WEATHER_UNAVAILABLE.to_string();
                    if self.view == View::Home {
                        self.show_home();
                    }
                }
                WeatherEvent::Forecast(forecast) => {
                    self.forecast_pending = false;
                    if self.view == View::Weather {
                        let scale = self.store.config().temperature.scale;
                        let now = chrono::Utc::now().timestamp();
                        self.output = render::weather_view(&forecast, scale, now);
                    }
                    self.forecast = Some(forecast);
                    self.refresh_sky();
                }
                WeatherEvent::ForecastFailed => {
                    self.forecast_pending = false;
                    if self.view == View::Weather && self.forecast.is_none() {
                        self.output = vec![Line::Output(WEATHER_UNAVAILABLE.to_string())];
                    }
                }
            }
        }
    }

    fn refresh_sky(&mut self) {
        // A manual /background choice wins over the weather.
        if self.manual_background.is_some() {
            return;
        }
        if let Some(current) = &self.current {
            let today = self.forecast.as_ref().and_then(|f| f.daily.first());
            self.background = sky::pick(current, today, chrono::Utc::now().timestamp());
        }
    }

    fn drain_reloads(&mut self) {
        let mut reloaded = false;
        while self.reload_rx.try_recv().is_ok() {
            reloaded = true;
        }
        if !reloaded {
            return;
        }

        match storage::load_page(&self.settings.page_path) {
            Ok(page) => {
                info!("page config reloaded from disk");
                self.store.replace(page);
                self.index = ShortcutIndex::new(self.store.config());
                match self.view {
                    View::Home => self.show_home(),
                    View::Links => self.output = render::links_view(self.store.config()),
                    _ => {}
                }
            }
            Err(err) => warn!(err = %err, "page reload failed — keeping current tree"),
        }
    }

    // ─── Drawing ──────────────────────────────────────────────────────────────

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT_SOFT))
            .title(" /home/start ")
            .title_bottom(format!(" sky: {} ", self.background.name));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let lines: Vec<UiLine> = self.output.iter().map(style_line).collect();
        let output = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(output, chunks[0]);

        if let Some(err) = &self.error {
            let error_line = UiLine::from(Span::styled(err.clone(), Style::default().fg(PINK)));
            frame.render_widget(Paragraph::new(error_line), chunks[1]);
        }

        frame.render_widget(Paragraph::new(self.prompt_line()), chunks[2]);
    }

    fn prompt_line(&self) -> UiLine<'_> {
        let label = render::prompt_label(&self.store.config().username);
        let mut spans = vec![
            Span::styled(
                label,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(":~", Style::default().fg(ACCENT_SOFT)),
            Span::raw("$ "),
            Span::styled(self.input.clone(), Style::default().fg(INK)),
            Span::styled("█", Style::default().fg(ACCENT)),
        ];
        if let Some(remainder) = self.suggestion_remainder() {
            spans.push(Span::styled(
                remainder,
                Style::default().fg(INK).add_modifier(Modifier::DIM),
            ));
        }
        UiLine::from(spans)
    }

    fn suggestion_remainder(&self) -> Option<String> {
        let label = self.index.suggest(&self.input)?;
        let boundary = self.input.len();
        if boundary < label.len() && label.is_char_boundary(boundary) {
            Some(label[boundary..].to_string())
        } else {
            None
        }
    }
}

fn style_line(line: &Line) -> UiLine<'static> {
    match line {
        Line::Prompt { user, command } => UiLine::from(vec![
            Span::styled(
                user.clone(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(":~", Style::default().fg(ACCENT_SOFT)),
            Span::raw("$ "),
            Span::styled(command.clone(), Style::default().fg(PEACH)),
        ]),
        Line::Output(text) => UiLine::from(Span::styled(
            text.clone(),
            Style::default().fg(SKY_BLUE),
        )),
        Line::Section(text) => UiLine::from(Span::styled(
            text.to_uppercase(),
            Style::default().fg(INK).add_modifier(Modifier::BOLD),
        )),
        Line::Subsection(text) => UiLine::from(Span::styled(
            text.to_uppercase(),
            Style::default()
                .fg(ACCENT_SOFT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::Link { label, detail } => UiLine::from(vec![
            Span::styled(label.clone(), Style::default().fg(ACCENT)),
            Span::styled(
                format!(" -> {detail}"),
                Style::default().fg(INK).add_modifier(Modifier::DIM),
            ),
        ]),
        Line::Error(text) => UiLine::from(Span::styled(text.clone(), Style::default().fg(PINK))),
    }
}
