use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flight status in the departure lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    Scheduled,
    Boarding,
    Departed,
    Cancelled,
}

impl FlightStatus {
    /// Monotonic progression: scheduled -> boarding -> departed, with
    /// cancellation reachable from the two pre-departure states.
    pub fn can_transition_to(self, next: FlightStatus) -> bool {
        matches!(
            (self, next),
            (FlightStatus::Scheduled, FlightStatus::Boarding)
                | (FlightStatus::Boarding, FlightStatus::Departed)
                | (FlightStatus::Scheduled, FlightStatus::Cancelled)
                | (FlightStatus::Boarding, FlightStatus::Cancelled)
        )
    }
}

/// A scheduled departure, owning the ordered list of its passengers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub gate: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub status: FlightStatus,
    pub passenger_ids: Vec<String>,
}

impl Flight {
    pub fn new(
        id: String,
        airline: String,
        flight_number: String,
        gate: String,
        destination: String,
        departure_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            airline,
            flight_number,
            gate,
            destination,
            departure_time,
            status: FlightStatus::Scheduled,
            passenger_ids: Vec::new(),
        }
    }

    /// An active flight still occupies its gate and owns its flight number.
    pub fn is_active(&self) -> bool {
        !matches!(self.status, FlightStatus::Departed | FlightStatus::Cancelled)
    }
}
