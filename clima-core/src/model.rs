use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    convert::{celsius_to_kelvin, kelvin_to_celsius, raw_kelvin_to_display},
    icon::IconTable,
};

/// What to ask the provider for. The two modes never mix.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Coordinates { lat: f64, lon: f64 },
    City(String),
}

impl WeatherQuery {
    /// Query parameters for this request, without the API key.
    pub fn to_params(&self) -> Vec<(String, String)> {
        match self {
            WeatherQuery::Coordinates { lat, lon } => vec![
                ("lat".to_string(), lat.to_string()),
                ("lon".to_string(), lon.to_string()),
            ],
            WeatherQuery::City(name) => vec![("q".to_string(), name.clone())],
        }
    }
}

/// Fields extracted from one successful provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub raw_kelvin_temp: f64,
    pub city_name: String,
    pub condition_code: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPreference {
    pub use_celsius: bool,
}

impl Default for UnitPreference {
    fn default() -> Self {
        Self { use_celsius: true }
    }
}

impl UnitPreference {
    pub fn symbol(&self) -> &'static str {
        if self.use_celsius { "°C" } else { "K" }
    }
}

/// The latest observation as shown to the user.
///
/// `temperature` is already in the display unit; the raw Kelvin reading is
/// not kept. `icon_name` only changes together with `condition_code`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherRecord {
    city: String,
    temperature: i64,
    condition_code: i64,
    icon_name: String,
    updated_at: Option<DateTime<Utc>>,
}

impl WeatherRecord {
    pub fn apply_observation(
        &mut self,
        observation: &WeatherObservation,
        use_celsius: bool,
        icons: &IconTable,
    ) {
        self.temperature = raw_kelvin_to_display(observation.raw_kelvin_temp, use_celsius);
        self.city = observation.city_name.clone();
        self.condition_code = observation.condition_code;
        self.icon_name = icons.icon_for(observation.condition_code).to_string();
        self.updated_at = Some(Utc::now());
    }

    /// Switch the stored temperature to the requested unit in place.
    ///
    /// Converts the display integer, not the original reading. Does nothing
    /// when the preference already matches.
    pub fn apply_unit_toggle(&mut self, units: &mut UnitPreference, use_celsius: bool) {
        if units.use_celsius == use_celsius {
            return;
        }

        self.temperature = if use_celsius {
            kelvin_to_celsius(self.temperature)
        } else {
            celsius_to_kelvin(self.temperature)
        };
        units.use_celsius = use_celsius;
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn temperature(&self) -> i64 {
        self.temperature
    }

    pub fn condition_code(&self) -> i64 {
        self.condition_code
    }

    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// True once at least one observation has been applied.
    pub fn has_data(&self) -> bool {
        self.updated_at.is_some()
    }
}
