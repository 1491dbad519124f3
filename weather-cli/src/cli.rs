use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use tokio::sync::watch;
use weather_core::{Config, WeatherService};

use crate::render::{LOADING, render_snapshot, render_state};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default city.
    Configure,

    /// Show current weather once.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Load the default city, then keep asking for cities and re-render on every update.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json } => show(Config::load()?, city, json).await,
            Command::Interactive => interactive(Config::load()?).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    let city = Text::new("Default city:").with_default(config.default_city()).prompt()?;

    config.api_key = Some(api_key.to_string());
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(config: Config, city: Option<String>, json: bool) -> anyhow::Result<()> {
    let service = WeatherService::from_config(&config)?;
    let city = city.unwrap_or_else(|| config.default_city().to_string());

    let snapshot = service
        .refresh(&city)
        .await
        .with_context(|| format!("Failed to fetch weather for '{city}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_snapshot(&city, &snapshot, Local::now()));
    }

    Ok(())
}

async fn interactive(config: Config) -> anyhow::Result<()> {
    let service = WeatherService::from_config(&config)?;
    let (city_tx, city_rx) = watch::channel(config.default_city().to_string());

    println!("{LOADING}");
    service.spawn_refresh(config.default_city());

    let mut state_rx = service.subscribe();
    let renderer = tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = state_rx.borrow_and_update().clone();
            let city = city_rx.borrow().clone();
            println!("\n{}", render_state(&city, &state, Local::now()));
        }
    });

    loop {
        let answer = tokio::task::spawn_blocking(|| {
            Text::new("City:").with_help_message("Enter to fetch, Esc to quit").prompt()
        })
        .await?;

        let Ok(city) = answer else { break };
        if city.trim().is_empty() {
            continue;
        }

        city_tx.send_replace(city.trim().to_string());
        service.spawn_refresh(city);
    }

    renderer.abort();
    Ok(())
}
