use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, InquireError, Password, Select, Text};
use skycast_core::{
    Config, Coordinates, Direction, FixedGeolocator, ForecastProvider, Outcome, Query, Session,
    Theme, Unit, ViewState, provider_from_config,
};
use std::sync::Arc;

use crate::render::{self, ViewConfig};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather forecast viewer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, home coordinates and display defaults.
    Configure,

    /// Show the forecast for a location.
    Show {
        /// City name, postal code or "lat,lon".
        query: String,

        /// Display temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,

        /// Forecast day to show, 0 = today.
        #[arg(long)]
        day: Option<usize>,

        /// Current conditions only.
        #[arg(long)]
        compact: bool,
    },

    /// Show current conditions only (no forecast days).
    Now {
        query: String,

        #[arg(long)]
        fahrenheit: bool,
    },

    /// Show the forecast for the configured home coordinates.
    Here {
        #[arg(long)]
        fahrenheit: bool,

        #[arg(long)]
        compact: bool,
    },

    /// Prompt for locations and commands until `:quit`.
    Interactive {
        /// Look up the home coordinates before the first prompt.
        #[arg(long)]
        locate: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { query, fahrenheit, day, compact } => {
                let config = Config::load()?;
                let session = build_session(&config)?;
                apply_unit_flag(&session, fahrenheit);

                let outcome = session.submit_text(&query).await;
                finish_one_shot(&outcome)?;

                if let Some(day) = day.filter(|&d| !session.select_day(d)) {
                    eprintln!("Day {day} is outside the forecast; showing today.");
                }
                print!("{}", render::render(&session.snapshot(), view_config(compact)));
                Ok(())
            }
            Command::Now { query, fahrenheit } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let query = Query::parse(&query)?;

                let report = provider.fetch_current(&query).await?;
                let unit =
                    if fahrenheit { Unit::Fahrenheit } else { config.unit.unwrap_or_default() };
                print!("{}", render::render_report(&report, unit, initial_theme(&config), true));
                Ok(())
            }
            Command::Here { fahrenheit, compact } => {
                let config = Config::load()?;
                let session = build_session(&config)?;
                apply_unit_flag(&session, fahrenheit);

                let outcome = session.locate().await;
                finish_one_shot(&outcome)?;
                print!("{}", render::render(&session.snapshot(), view_config(compact)));
                Ok(())
            }
            Command::Interactive { locate } => {
                let config = Config::load()?;
                let session = build_session(&config)?;
                interactive(session, locate).await
            }
        }
    }
}

/// One intent typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Intent {
    Search(String),
    Here,
    Voice,
    Step(Direction),
    Day(usize),
    ToggleUnit,
    ToggleTheme,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

fn parse_intent(line: &str) -> Intent {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return Intent::Search(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("here"), None) => Intent::Here,
        (Some("voice"), None) => Intent::Voice,
        (Some("next"), None) => Intent::Step(Direction::Next),
        (Some("prev"), None) => Intent::Step(Direction::Prev),
        (Some("day"), Some(n)) => match n.parse() {
            Ok(index) => Intent::Day(index),
            Err(_) => Intent::Unknown(line.to_string()),
        },
        (Some("unit"), None) => Intent::ToggleUnit,
        (Some("theme"), None) => Intent::ToggleTheme,
        (Some("reset"), None) => Intent::Reset,
        (Some("help"), None) => Intent::Help,
        (Some("quit" | "q"), None) => Intent::Quit,
        _ => Intent::Unknown(line.to_string()),
    }
}

const HELP: &str = "\
Type a city, postal code or \"lat,lon\" to look it up.
Commands: :here  :voice  :next  :prev  :day N  :unit  :theme  :reset  :help  :quit";

async fn interactive(session: Session, locate: bool) -> anyhow::Result<()> {
    println!("{HELP}");
    if locate {
        report(&session.locate().await);
    }

    loop {
        print!("{}", render::render(&session.snapshot(), ViewConfig::full()));

        let line = match Text::new(">").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        match parse_intent(&line) {
            Intent::Search(text) => report(&session.submit_text(&text).await),
            Intent::Here => report(&session.locate().await),
            Intent::Voice => report(&session.listen().await),
            Intent::Step(direction) => {
                session.step(direction);
            }
            Intent::Day(index) => {
                if !session.select_day(index) {
                    eprintln!("No forecast day {index}.");
                }
            }
            Intent::ToggleUnit => {
                session.toggle_unit();
            }
            Intent::ToggleTheme => {
                session.toggle_theme();
            }
            Intent::Reset => session.reset(),
            Intent::Help => println!("{HELP}"),
            Intent::Quit => break,
            Intent::Unknown(input) => eprintln!("Unknown command '{input}'. Type :help."),
        }
    }

    Ok(())
}

fn report(outcome: &Outcome) {
    if let Some(notice) = outcome.notice() {
        eprintln!("{notice}");
    }
}

fn finish_one_shot(outcome: &Outcome) -> anyhow::Result<()> {
    match outcome.notice() {
        Some(notice) => bail!(notice),
        None => Ok(()),
    }
}

fn build_session(config: &Config) -> anyhow::Result<Session> {
    tracing::debug!(base_url = config.base_url(), home = ?config.home, "building session");
    let provider: Arc<dyn ForecastProvider> = Arc::from(provider_from_config(config)?);
    let state = ViewState::new(config.unit.unwrap_or_default(), initial_theme(config));

    Ok(Session::new(provider, state).with_geolocator(Arc::new(FixedGeolocator::new(config.home))))
}

fn initial_theme(config: &Config) -> Theme {
    config
        .theme
        .or_else(|| std::env::var("COLORFGBG").ok().and_then(|v| Theme::from_colorfgbg(&v)))
        .unwrap_or_default()
}

fn apply_unit_flag(session: &Session, fahrenheit: bool) {
    if fahrenheit {
        session.set_unit(Unit::Fahrenheit);
    }
}

fn view_config(compact: bool) -> ViewConfig {
    if compact { ViewConfig::compact() } else { ViewConfig::full() }
}

fn configure() -> anyhow::Result<()> {
    // Environment overrides stay out of the file.
    let mut config = Config::load_file()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("The API key cannot be empty.");
    }
    config.set_api_key(api_key.trim().to_string());

    let set_home = Confirm::new("Set home coordinates for `skycast here`?")
        .with_default(config.home.is_some())
        .prompt()?;
    if set_home {
        let latitude = CustomType::<f64>::new("Latitude:").prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:").prompt()?;
        config.home = Some(Coordinates { latitude, longitude });
    }

    let unit = Select::new("Default unit:", vec!["celsius", "fahrenheit"]).prompt()?;
    config.unit = Some(if unit == "fahrenheit" { Unit::Fahrenheit } else { Unit::Celsius });

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
