use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use clima_core::{
    AppState, Config, FetchError, FixedLocation, LocationSource, PresentationSink, UnitPreference,
    WeatherApp, WeatherRecord, provider::provider_from_config,
};
use inquire::{Confirm, Password, PasswordDisplayMode};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clima", version, about = "Current weather for a place")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct DisplayOpts {
    /// Show the temperature in Kelvin instead of Celsius.
    #[arg(long)]
    pub kelvin: bool,

    /// After showing the result, switch units once and show it again.
    #[arg(long)]
    pub toggle: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and unit preference.
    Configure,

    /// Show weather for a city name.
    City {
        /// City name, e.g. "London" or "London,uk".
        name: String,

        #[command(flatten)]
        display: DisplayOpts,
    },

    /// Show weather for a coordinate fix.
    Coords {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lon: f64,

        /// Horizontal accuracy of the fix in meters; 0 means unusable.
        #[arg(long, default_value_t = 100.0)]
        accuracy: f64,

        #[command(flatten)]
        display: DisplayOpts,
    },

    /// Print the active condition code to icon table.
    Icons,
}

/// Prints results to stdout.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl PresentationSink for TerminalSink {
    fn render(&mut self, record: &WeatherRecord, units: &UnitPreference) {
        let updated = record
            .updated_at()
            .map(|t| t.with_timezone(&chrono::Local).format(" (updated %H:%M)").to_string())
            .unwrap_or_default();

        println!(
            "{}: {}{} [{}]{}",
            record.city(),
            record.temperature(),
            units.symbol(),
            record.icon_name(),
            updated
        );
    }

    fn render_error(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::City { name, display } => {
                let mut app = build_app(&display)?;
                let fetched = app.submit_city(&name).await;
                Ok(finish(&mut app, &display, fetched))
            }
            Command::Coords { lat, lon, accuracy, display } => {
                let mut app = build_app(&display)?;
                let updates = FixedLocation::new(lat, lon, accuracy).subscribe();
                match app.follow_location(updates).await {
                    Ok(false) => {
                        anyhow::bail!("No accurate location fix (accuracy must be greater than 0)")
                    }
                    Ok(true) => Ok(finish(&mut app, &display, Ok(()))),
                    Err(err) => Ok(finish(&mut app, &display, Err(err))),
                }
            }
            Command::Icons => {
                let cfg = Config::load()?;
                let table = cfg.icon_table();
                for bucket in table.buckets() {
                    println!("{:>5}..={:<5} {}", bucket.min, bucket.max, bucket.icon);
                }
                println!("{:>13} {}", "otherwise", table.fallback());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn build_app(
    display: &DisplayOpts,
) -> anyhow::Result<WeatherApp<clima_core::OpenWeatherProvider, TerminalSink>> {
    let cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;

    let mut units = cfg.unit_preference();
    if display.kelvin {
        units.use_celsius = false;
    }

    tracing::debug!(endpoint = %cfg.endpoint, use_celsius = units.use_celsius, "starting session");

    let state = AppState::new(units, cfg.icon_table());
    Ok(WeatherApp::new(provider, TerminalSink, state))
}

/// Apply `--toggle` after a successful fetch and pick the exit code.
///
/// A failed fetch has already been shown by the sink, so it only sets the
/// exit code here.
fn finish<P, S>(
    app: &mut WeatherApp<P, S>,
    display: &DisplayOpts,
    fetched: Result<(), FetchError>,
) -> ExitCode
where
    P: clima_core::WeatherProvider,
    S: PresentationSink,
{
    match fetched {
        Ok(()) => {
            if display.toggle {
                let use_celsius = !app.state().units.use_celsius;
                app.set_units(use_celsius);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(cause = %err.failure(), "fetch failed");
            ExitCode::FAILURE
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let use_celsius = Confirm::new("Show temperatures in Celsius?")
        .with_default(cfg.use_celsius)
        .with_help_message("Answer no for Kelvin")
        .prompt()
        .context("Failed to read unit preference")?;

    cfg.set_api_key(api_key.trim().to_string());
    cfg.use_celsius = use_celsius;
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NoProvider;

    #[async_trait::async_trait]
    impl clima_core::WeatherProvider for NoProvider {
        async fn fetch_params(
            &self,
            _params: &[(String, String)],
        ) -> Result<clima_core::WeatherObservation, FetchError> {
            Err(clima_core::FetchFailure::Malformed("unused".into()).into())
        }

        async fn fetch(
            &self,
            query: &clima_core::WeatherQuery,
        ) -> Result<clima_core::WeatherObservation, FetchError> {
            self.fetch_params(&query.to_params()).await
        }
    }

    #[derive(Debug, Default)]
    struct CountingSink {
        renders: usize,
        errors: usize,
    }

    impl PresentationSink for CountingSink {
        fn render(&mut self, _record: &WeatherRecord, _units: &UnitPreference) {
            self.renders += 1;
        }

        fn render_error(&mut self, _message: &str) {
            self.errors += 1;
        }
    }

    fn display(toggle: bool) -> DisplayOpts {
        DisplayOpts { kelvin: false, toggle }
    }

    #[test]
    fn failed_fetch_maps_to_exit_code_without_rendering_again() {
        let mut app = WeatherApp::new(NoProvider, CountingSink::default(), AppState::default());
        let failed = Err(clima_core::FetchFailure::Malformed("missing main.temp".into()).into());

        let code = finish(&mut app, &display(true), failed);

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(app.sink().renders, 0);
        assert_eq!(app.sink().errors, 0);
        assert!(app.state().units.use_celsius);
    }

    #[test]
    fn successful_fetch_is_success_and_toggles_when_asked() {
        let mut app = WeatherApp::new(NoProvider, CountingSink::default(), AppState::default());

        assert_eq!(finish(&mut app, &display(false), Ok(())), ExitCode::SUCCESS);
        assert!(app.state().units.use_celsius);

        assert_eq!(finish(&mut app, &display(true), Ok(())), ExitCode::SUCCESS);
        assert!(!app.state().units.use_celsius);
    }

    #[test]
    fn parses_city() {
        let cli = Cli::try_parse_from(["clima", "city", "London", "--kelvin"]).unwrap();
        match cli.command {
            Command::City { name, display } => {
                assert_eq!(name, "London");
                assert!(display.kelvin);
                assert!(!display.toggle);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from(["clima", "coords", "51.5", "-0.1", "--accuracy", "0"]).unwrap();
        match cli.command {
            Command::Coords { lat, lon, accuracy, .. } => {
                assert_eq!(lat, 51.5);
                assert_eq!(lon, -0.1);
                assert_eq!(accuracy, 0.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn coords_default_accuracy_is_usable() {
        let cli = Cli::try_parse_from(["clima", "coords", "1", "2", "--toggle"]).unwrap();
        match cli.command {
            Command::Coords { accuracy, display, .. } => {
                assert!(accuracy > 0.0);
                assert!(display.toggle);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
