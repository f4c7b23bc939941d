use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Passenger status, strictly forward-moving
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PassengerStatus {
    NotCheckedIn,
    CheckedIn,
    Boarded,
}

/// A ticketed passenger on a single flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub id: String,
    pub name: String,
    pub ticket_number: String,
    pub flight_id: String,
    pub status: PassengerStatus,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bag_ids: Vec<String>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_in_by: Option<Uuid>,
    pub boarded_at: Option<DateTime<Utc>>,
    pub boarded_by: Option<Uuid>,
}

impl Passenger {
    pub fn new(
        id: String,
        name: String,
        ticket_number: String,
        flight_id: String,
        email: Option<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            ticket_number,
            flight_id,
            status: PassengerStatus::NotCheckedIn,
            email,
            phone,
            bag_ids: Vec::new(),
            checked_in_at: None,
            checked_in_by: None,
            boarded_at: None,
            boarded_by: None,
        }
    }

    /// Record the check-in transition with its audit fields.
    pub fn check_in(&mut self, staff_id: Uuid) {
        self.status = PassengerStatus::CheckedIn;
        self.checked_in_at = Some(Utc::now());
        self.checked_in_by = Some(staff_id);
    }

    /// Record the boarding transition with its audit fields.
    pub fn board(&mut self, staff_id: Uuid) {
        self.status = PassengerStatus::Boarded;
        self.boarded_at = Some(Utc::now());
        self.boarded_by = Some(staff_id);
    }
}
