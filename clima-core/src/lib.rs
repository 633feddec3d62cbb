//! Core library for the `clima` weather tool.
//!
//! This crate defines:
//! - Temperature conversion and the condition code icon table
//! - The current-weather fetch pipeline (OpenWeather)
//! - Location updates as a channel subscription
//! - Session state and the orchestrator that ties it together
//! - Configuration handling
//!
//! It is used by `clima-cli`, but any front end that implements
//! [`PresentationSink`] can drive it.

pub mod app;
pub mod config;
pub mod convert;
pub mod error;
pub mod icon;
pub mod location;
pub mod model;
pub mod provider;

pub use app::{AppState, PresentationSink, WeatherApp};
pub use config::Config;
pub use error::{FetchError, FetchFailure, LocationError};
pub use icon::{IconBucket, IconTable};
pub use location::{FixedLocation, LocationEvent, LocationFix, LocationSource};
pub use model::{UnitPreference, WeatherObservation, WeatherQuery, WeatherRecord};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
