//! Glue between location updates, the provider and whatever shows results.

use tokio::sync::mpsc;

use crate::{
    error::FetchError,
    icon::IconTable,
    location::LocationEvent,
    model::{UnitPreference, WeatherQuery, WeatherRecord},
    provider::WeatherProvider,
};

pub const WEATHER_UNAVAILABLE: &str = "Weather unavailable";
pub const LOCATION_UNAVAILABLE: &str = "There was an error trying to get your location.";

/// Receives finished results for display.
pub trait PresentationSink {
    fn render(&mut self, record: &WeatherRecord, units: &UnitPreference);

    fn render_error(&mut self, message: &str);
}

/// Everything a session holds between fetches.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub record: WeatherRecord,
    pub units: UnitPreference,
    pub icons: IconTable,
}

impl AppState {
    pub fn new(units: UnitPreference, icons: IconTable) -> Self {
        Self { record: WeatherRecord::default(), units, icons }
    }
}

/// Owns the session state; every mutation goes through `&mut self`.
#[derive(Debug)]
pub struct WeatherApp<P, S> {
    provider: P,
    sink: S,
    state: AppState,
}

impl<P, S> WeatherApp<P, S>
where
    P: WeatherProvider,
    S: PresentationSink,
{
    pub fn new(provider: P, sink: S, state: AppState) -> Self {
        Self { provider, sink, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Wait for the first accurate fix, then fetch weather for it.
    ///
    /// Inaccurate fixes are skipped and failures are reported but do not end
    /// the subscription. The receiver is dropped as soon as a usable fix
    /// arrives. Returns `Ok(false)` if the source closed without one.
    pub async fn follow_location(
        &mut self,
        mut updates: mpsc::Receiver<LocationEvent>,
    ) -> Result<bool, FetchError> {
        loop {
            let Some(event) = updates.recv().await else {
                break;
            };

            match event {
                LocationEvent::Fix(fix) if fix.is_accurate() => {
                    drop(updates);
                    tracing::info!(
                        latitude = fix.latitude,
                        longitude = fix.longitude,
                        accuracy = fix.accuracy,
                        "accurate location fix"
                    );
                    let query = WeatherQuery::Coordinates { lat: fix.latitude, lon: fix.longitude };
                    self.refresh(&query).await?;
                    return Ok(true);
                }
                LocationEvent::Fix(fix) => {
                    tracing::debug!(accuracy = fix.accuracy, "ignoring inaccurate location fix");
                }
                LocationEvent::Failed(err) => {
                    tracing::warn!(error = %err, "location unavailable");
                    self.sink.render_error(LOCATION_UNAVAILABLE);
                }
            }
        }

        tracing::debug!("location source closed without an accurate fix");
        Ok(false)
    }

    pub async fn submit_city(&mut self, city: &str) -> Result<(), FetchError> {
        let query = WeatherQuery::City(city.trim().to_string());
        self.refresh(&query).await
    }

    /// Switch units, converting the shown temperature in place.
    pub fn set_units(&mut self, use_celsius: bool) {
        let AppState { record, units, .. } = &mut self.state;
        record.apply_unit_toggle(units, use_celsius);

        if self.state.record.has_data() {
            self.sink.render(&self.state.record, &self.state.units);
        }
    }

    async fn refresh(&mut self, query: &WeatherQuery) -> Result<(), FetchError> {
        match self.provider.fetch(query).await {
            Ok(observation) => {
                let AppState { record, units, icons } = &mut self.state;
                record.apply_observation(&observation, units.use_celsius, icons);
                tracing::info!(
                    city = %record.city(),
                    temperature = record.temperature(),
                    icon = %record.icon_name(),
                    "weather updated"
                );
                self.sink.render(&self.state.record, &self.state.units);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, cause = %err.failure(), "weather fetch failed");
                self.sink.render_error(WEATHER_UNAVAILABLE);
                Err(err)
            }
        }
    }
}
