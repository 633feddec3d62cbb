//! Location updates delivered over a channel.
//!
//! A source pushes [`LocationEvent`]s; the consumer decides when it has seen
//! enough and drops the receiver, which is how a subscription ends.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::LocationError;

/// Buffered events per subscription.
pub const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in meters. Zero or negative means unusable.
    pub accuracy: f64,
}

impl LocationFix {
    pub fn is_accurate(&self) -> bool {
        self.accuracy > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    Fix(LocationFix),
    Failed(LocationError),
}

pub trait LocationSource {
    /// Start delivering events. The source stops once the receiver is dropped.
    fn subscribe(self) -> mpsc::Receiver<LocationEvent>;
}

/// Emits one preset fix and closes.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    fix: LocationFix,
}

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self { fix: LocationFix { latitude, longitude, accuracy } }
    }
}

impl LocationSource for FixedLocation {
    fn subscribe(self) -> mpsc::Receiver<LocationEvent> {
        ScriptedLocation::new(vec![LocationEvent::Fix(self.fix)]).subscribe()
    }
}

/// Replays a fixed list of events, e.g. a recorded GPS trace.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLocation {
    events: Vec<LocationEvent>,
}

impl ScriptedLocation {
    pub fn new(events: Vec<LocationEvent>) -> Self {
        Self { events }
    }
}

impl LocationSource for ScriptedLocation {
    fn subscribe(self) -> mpsc::Receiver<LocationEvent> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(async move {
            for event in self.events {
                if tx.send(event).await.is_err() {
                    tracing::debug!("location subscriber went away, stopping replay");
                    break;
                }
            }
        });
        rx
    }
}
