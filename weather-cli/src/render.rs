use chrono::{DateTime, Local};
use weather_core::{WeatherSnapshot, WeatherState};

pub const LOADING: &str = "Loading weather data...";

pub fn render_snapshot(city: &str, snapshot: &WeatherSnapshot, fetched_at: DateTime<Local>) -> String {
    format!(
        "Weather in {city}\n\
         Temperature: {:.1}°C\n\
         Conditions: {}\n\
         Wind speed: {} m/s\n\
         Wind direction: {}\n\
         Humidity: {}%\n\
         Updated: {}\n",
        snapshot.temperature_c,
        snapshot.description,
        snapshot.wind_speed_mps,
        snapshot.wind_direction,
        snapshot.humidity_pct,
        fetched_at.format("%H:%M:%S"),
    )
}

pub fn render_state(city: &str, state: &WeatherState, now: DateTime<Local>) -> String {
    match state {
        WeatherState::Loading => format!("{LOADING}\n"),
        WeatherState::Loaded(snapshot) => render_snapshot(city, snapshot, now),
        WeatherState::Failed(reason) => format!("Could not load weather for {city}: {reason}\n"),
    }
}
