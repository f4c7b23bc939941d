use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A per-role message board
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Board {
    Airline,
    Gate,
    Ground,
    Admin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
}

/// Structured message bodies. Cross-role requests carry their identifiers as
/// fields so the consuming role never parses free text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessagePayload {
    Note {
        content: String,
    },
    SecurityViolation {
        bag_id: String,
        passenger_id: String,
        ticket_number: String,
        flight_number: String,
    },
    RemovalRequest {
        passenger_id: String,
        ticket_number: String,
        reason: String,
    },
    DepartureReady {
        flight_id: String,
        flight_number: String,
    },
    GateChange {
        flight_id: String,
        flight_number: String,
        old_gate: String,
        new_gate: String,
    },
}

impl MessagePayload {
    /// One-line rendering for board listings.
    pub fn summary(&self) -> String {
        match self {
            MessagePayload::Note { content } => content.clone(),
            MessagePayload::SecurityViolation {
                bag_id,
                passenger_id,
                ticket_number,
                flight_number,
            } => format!(
                "Security violation: bag {} (passenger {}, ticket {}, flight {})",
                bag_id, passenger_id, ticket_number, flight_number
            ),
            MessagePayload::RemovalRequest {
                passenger_id,
                ticket_number,
                reason,
            } => format!(
                "Removal requested for passenger {} (ticket {}): {}",
                passenger_id, ticket_number, reason
            ),
            MessagePayload::DepartureReady { flight_number, .. } => {
                format!("Flight {} is ready for departure", flight_number)
            }
            MessagePayload::GateChange {
                flight_number,
                old_gate,
                new_gate,
                ..
            } => format!(
                "Flight {} moved from gate {} to gate {}",
                flight_number, old_gate, new_gate
            ),
        }
    }
}

/// A posted board message. Immutable once posted; removal is the only update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub author: String,
    pub airline: Option<String>,
    pub payload: MessagePayload,
    pub priority: Priority,
    pub posted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_roundtrip_is_tagged() {
        let payload = MessagePayload::GateChange {
            flight_id: "AA1234_1".into(),
            flight_number: "AA1234".into(),
            old_gate: "A12".into(),
            new_gate: "B5".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "gate_change");
        assert_eq!(json["new_gate"], "B5");
    }

    #[test]
    fn test_summary_carries_identifiers() {
        let payload = MessagePayload::RemovalRequest {
            passenger_id: "123456".into(),
            ticket_number: "1234567890".into(),
            reason: "security violation".into(),
        };
        let text = payload.summary();
        assert!(text.contains("123456"));
        assert!(text.contains("1234567890"));
    }
}
