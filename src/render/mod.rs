//! View renderer — pure functions from configuration to output lines.
//!
//! No caching, no diffing: every view transition replaces the whole output.
//! The terminal layer maps `Line` kinds onto styles; tests assert on the
//! plain-text form.

use chrono::{DateTime, Utc};

use crate::console::grammar;
use crate::page::{PageConfig, Scale};
use crate::weather::{self, Forecast};

// ─── Lines ────────────────────────────────────────────────────────────────────

/// One output line with its display kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `user@launchpad:~$ <command>` echo line.
    Prompt { user: String, command: String },
    Output(String),
    /// Tab header in the links view.
    Section(String),
    /// Category header in the links view.
    Subsection(String),
    /// `label -> detail` row (links, help entries, forecast rows).
    Link { label: String, detail: String },
    Error(String),
}

impl Line {
    /// Plain-text form, mirroring what the terminal shows.
    pub fn to_text(&self) -> String {
        match self {
            Line::Prompt { user, command } => format!("{user}:~$ {command}"),
            Line::Output(text) => text.clone(),
            Line::Section(text) | Line::Subsection(text) => text.clone(),
            Line::Link { label, detail } => format!("{label} -> {detail}"),
            Line::Error(text) => text.clone(),
        }
    }
}

/// Prompt label shown before the input caret.
pub fn prompt_label(username: &str) -> String {
    let trimmed = username.trim();
    let user = if trimmed.is_empty() { "guest" } else { trimmed };
    format!("{user}@launchpad")
}

// ─── Boot / home view ─────────────────────────────────────────────────────────

/// The landing output: boot banner, weather line, and the enter hint.
pub fn boot_view(username: &str, weather_line: &str) -> Vec<Line> {
    vec![
        Line::Prompt {
            user: prompt_label(username),
            command: "boot --profile links".to_string(),
        },
        Line::Output("Mounting quicklinks... ok".to_string()),
        Line::Output(weather_line.to_string()),
        Line::Output("Session ready. Awaiting input.".to_string()),
        Line::Output("Press Enter to open the links view.".to_string()),
    ]
}

/// Boot-view weather line for fetched current conditions.
pub fn weather_line(current: &weather::CurrentConditions, scale: Scale, location: &str) -> String {
    let temp = weather::display_temp(current.temperature as f64, scale);
    let condition = if current.condition.is_empty() {
        "Unknown".to_string()
    } else {
        weather::title_condition(&current.condition)
    };
    format!("Weather: {temp}°{scale} {condition} in {location}.")
}

pub const WEATHER_PENDING: &str = "Fetching weather...";
pub const WEATHER_UNAVAILABLE: &str = "Weather unavailable.";

// ─── Links view ───────────────────────────────────────────────────────────────

/// The full categorized link list. Categories with an empty name render
/// without a header; links without a URL are skipped.
pub fn links_view(config: &PageConfig) -> Vec<Line> {
    if config.tabs.is_empty() {
        return vec![Line::Output("No links configured.".to_string())];
    }

    let mut lines = Vec::new();
    for tab in &config.tabs {
        let name = if tab.name.is_empty() { "links" } else { &tab.name };
        lines.push(Line::Section(name.to_string()));

        for category in &tab.categories {
            if !category.name.is_empty() {
                lines.push(Line::Subsection(category.name.clone()));
            }
            for link in &category.links {
                if link.url.is_empty() {
                    continue;
                }
                lines.push(Line::Link {
                    label: link.label().to_string(),
                    detail: link.url.clone(),
                });
            }
        }
    }
    lines
}

// ─── Help view ────────────────────────────────────────────────────────────────

/// One row per grammar-table entry — the help text cannot drift from the
/// parser.
pub fn help_view() -> Vec<Line> {
    let mut lines = vec![Line::Section("Commands".to_string())];
    lines.extend(grammar::COMMANDS.iter().map(|spec| Line::Link {
        label: spec.name.to_string(),
        detail: spec.summary.to_string(),
    }));
    lines
}

// ─── Weather view ─────────────────────────────────────────────────────────────

/// Forecast view: up to 12 upcoming hours and the next 5 days. Clock labels
/// are rendered in the location's timezone via the reported offset.
pub fn weather_view(forecast: &Forecast, scale: Scale, now: i64) -> Vec<Line> {
    if forecast.hourly.is_empty() || forecast.daily.is_empty() {
        return vec![Line::Output(WEATHER_UNAVAILABLE.to_string())];
    }

    let offset = forecast.timezone_offset;
    let mut lines = vec![
        Line::Section("Weather".to_string()),
        Line::Output("Next 12 hours".to_string()),
    ];

    for entry in forecast.hourly.iter().filter(|h| h.dt >= now).take(12) {
        let temp = weather::display_temp(entry.temp, scale);
        lines.push(Line::Link {
            label: hour_label(entry.dt, offset),
            detail: format!("{temp}°{scale} {}", entry.condition),
        });
    }

    lines.push(Line::Subsection("Next 5 days".to_string()));
    for entry in forecast.daily.iter().skip(1).take(5) {
        let high = weather::display_temp(entry.temp_max, scale);
        let low = weather::display_temp(entry.temp_min, scale);
        lines.push(Line::Link {
            label: day_label(entry.dt, offset),
            detail: format!("{high}/{low}°{scale} {}", entry.condition),
        });
    }

    lines
}

fn hour_label(timestamp: i64, offset: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp + offset, 0) {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => "??:??".to_string(),
    }
}

fn day_label(timestamp: i64, offset: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp + offset, 0) {
        Some(dt) => dt.format("%a").to_string(),
        None => "???".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::{DailyEntry, HourlyEntry};

    #[test]
    fn prompt_label_falls_back_to_guest() {
        assert_eq!(prompt_label("pix"), "pix@launchpad");
        assert_eq!(prompt_label("   "), "guest@launchpad");
    }

    #[test]
    fn hour_label_applies_timezone_offset() {
        // 2021-01-01 00:00 UTC at UTC-5 renders as the previous evening.
        assert_eq!(hour_label(1609459200, -18000), "19:00");
        assert_eq!(day_label(1609459200, 0), "Fri");
    }

    #[test]
    fn weather_view_skips_past_hours_and_today() {
        let forecast = Forecast {
            timezone_offset: 0,
            hourly: (0..20)
                .map(|i| HourlyEntry {
                    dt: i * 3600,
                    temp: 10.0,
                    condition: "Clear".to_string(),
                })
                .collect(),
            daily: (0..7)
                .map(|i| DailyEntry {
                    dt: i * 86_400,
                    temp_max: 10.0,
                    temp_min: 2.0,
                    sunrise: 0,
                    sunset: 0,
                    condition: "Clear".to_string(),
                })
                .collect(),
        };

        let lines = weather_view(&forecast, Scale::C, 4 * 3600);
        let hourly_rows = lines
            .iter()
            .filter(|line| matches!(line, Line::Link { label, .. } if label.contains(':')))
            .count();
        assert_eq!(hourly_rows, 12);
        // First hourly row is the first entry at or after `now`.
        assert!(lines[2].to_text().starts_with("04:00"));

        let daily_rows = lines
            .iter()
            .filter(|line| matches!(line, Line::Link { label, .. } if !label.contains(':')))
            .count();
        assert_eq!(daily_rows, 5);
    }

    #[test]
    fn empty_forecast_is_unavailable() {
        let lines = weather_view(&Forecast::default(), Scale::C, 0);
        assert_eq!(lines, vec![Line::Output(WEATHER_UNAVAILABLE.to_string())]);
    }
}
