// Landing background selection.
//
// The startup background is derived from the live weather; /background then
// cycles the fixed list manually.

use crate::weather::{CurrentConditions, DailyEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    pub name: &'static str,
    pub asset: &'static str,
}

/// Cycle order for /background.
pub const BACKGROUNDS: &[Background] = &[
    Background { name: "storm", asset: "lightning_1.webp" },
    Background { name: "clouds", asset: "light_clouds.webp" },
    Background { name: "night-clear", asset: "cold_twinkle.gif" },
    Background { name: "night-clouds", asset: "coldnightclouds.webp" },
    Background { name: "rain", asset: "landing_rain.gif" },
];

pub fn position(name: &str) -> Option<usize> {
    BACKGROUNDS.iter().position(|b| b.name == name)
}

/// Pick a background from the live weather.
///
/// Thunderstorms win over everything; precipitation over daylight; during
/// the day any remaining condition shows clouds; at night cloud cover
/// decides between the two night skies. `today` supplies sunrise/sunset —
/// without it the night skies are assumed.
pub fn pick(current: &CurrentConditions, today: Option<&DailyEntry>, now: i64) -> &'static Background {
    let condition = current.condition.as_str();
    let description = current.description.as_str();

    let thunderstorm = condition == "thunderstorm" || description.contains("thunder");
    let precip = matches!(condition, "rain" | "drizzle" | "snow")
        || ["rain", "drizzle", "snow", "sleet"]
            .iter()
            .any(|needle| description.contains(needle));

    let sun_up = today
        .filter(|day| day.sunrise > 0 && day.sunset > 0)
        .map(|day| now >= day.sunrise && now < day.sunset)
        .unwrap_or(false);

    let partly_cloudy = (condition == "clouds"
        && ["few clouds", "scattered clouds", "partly cloudy"]
            .iter()
            .any(|needle| description.contains(needle)))
        || current
            .clouds
            .map(|cover| cover > 10 && cover < 60)
            .unwrap_or(false);
    let cloudy = condition == "clouds" || description.contains("cloud");

    if thunderstorm {
        &BACKGROUNDS[0]
    } else if precip {
        &BACKGROUNDS[4]
    } else if sun_up {
        &BACKGROUNDS[1]
    } else if cloudy || partly_cloudy {
        &BACKGROUNDS[3]
    } else {
        &BACKGROUNDS[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(condition: &str, description: &str, clouds: Option<u8>) -> CurrentConditions {
        CurrentConditions {
            temperature: 10,
            condition: condition.to_string(),
            description: description.to_string(),
            clouds,
        }
    }

    fn day(sunrise: i64, sunset: i64) -> DailyEntry {
        DailyEntry {
            dt: sunrise,
            temp_max: 10.0,
            temp_min: 0.0,
            sunrise,
            sunset,
            condition: "Clear".to_string(),
        }
    }

    #[test]
    fn thunderstorm_wins() {
        let current = conditions("thunderstorm", "thunderstorm with rain", None);
        assert_eq!(pick(&current, Some(&day(100, 200)), 150).name, "storm");
    }

    #[test]
    fn precipitation_beats_daylight() {
        let current = conditions("rain", "light rain", None);
        assert_eq!(pick(&current, Some(&day(100, 200)), 150).name, "rain");
        let sleet = conditions("clouds", "sleet showers", None);
        assert_eq!(pick(&sleet, Some(&day(100, 200)), 150).name, "rain");
    }

    #[test]
    fn daylight_shows_clouds() {
        let current = conditions("clear", "clear sky", Some(0));
        assert_eq!(pick(&current, Some(&day(100, 200)), 150).name, "clouds");
    }

    #[test]
    fn night_cloud_cover_decides() {
        let clear = conditions("clear", "clear sky", Some(0));
        assert_eq!(pick(&clear, Some(&day(100, 200)), 300).name, "night-clear");

        let cloudy = conditions("clouds", "overcast clouds", Some(95));
        assert_eq!(pick(&cloudy, Some(&day(100, 200)), 300).name, "night-clouds");

        // Partial cover counts as cloudy even with a clear condition group.
        let partial = conditions("clear", "clear sky", Some(30));
        assert_eq!(pick(&partial, Some(&day(100, 200)), 300).name, "night-clouds");
    }

    #[test]
    fn missing_forecast_assumes_night() {
        let current = conditions("clear", "clear sky", None);
        assert_eq!(pick(&current, None, 0).name, "night-clear");
    }
}
