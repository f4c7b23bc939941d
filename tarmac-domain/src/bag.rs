use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a bag currently sits in the handling pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BagLocation {
    CheckIn,
    Security,
    Gate,
    Loaded,
    SecurityViolation,
}

impl BagLocation {
    /// Terminal locations admit no further movement.
    pub fn is_terminal(self) -> bool {
        matches!(self, BagLocation::Loaded | BagLocation::SecurityViolation)
    }
}

/// One append-only audit record of a bag movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub location: BagLocation,
    pub timestamp: DateTime<Utc>,
    pub handled_by: Uuid,
}

/// A checked bag, denormalizing its owner's ticket and flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bag {
    pub id: String,
    pub ticket_number: String,
    pub passenger_id: String,
    pub flight_id: String,
    pub location: BagLocation,
    pub timeline: Vec<TimelineEntry>,
}

impl Bag {
    /// A new bag always enters the pipeline at check-in.
    pub fn new(
        id: String,
        ticket_number: String,
        passenger_id: String,
        flight_id: String,
        staff_id: Uuid,
    ) -> Self {
        Self {
            id,
            ticket_number,
            passenger_id,
            flight_id,
            location: BagLocation::CheckIn,
            timeline: vec![TimelineEntry {
                location: BagLocation::CheckIn,
                timestamp: Utc::now(),
                handled_by: staff_id,
            }],
        }
    }

    /// Apply a movement, appending to the audit timeline.
    pub fn move_to(&mut self, location: BagLocation, staff_id: Uuid) {
        self.location = location;
        self.timeline.push(TimelineEntry {
            location,
            timestamp: Utc::now(),
            handled_by: staff_id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_appends() {
        let staff = Uuid::new_v4();
        let mut bag = Bag::new(
            "100001".into(),
            "1234567890".into(),
            "123456".into(),
            "AA1234_1".into(),
            staff,
        );
        assert_eq!(bag.location, BagLocation::CheckIn);
        assert_eq!(bag.timeline.len(), 1);

        bag.move_to(BagLocation::Security, staff);
        assert_eq!(bag.location, BagLocation::Security);
        assert_eq!(bag.timeline.len(), 2);
        assert_eq!(bag.timeline[1].location, BagLocation::Security);
    }

    #[test]
    fn test_terminal_locations() {
        assert!(BagLocation::Loaded.is_terminal());
        assert!(BagLocation::SecurityViolation.is_terminal());
        assert!(!BagLocation::Gate.is_terminal());
    }
}
