use chrono::{DateTime, Utc};
use tarmac_domain::{ids, Flight, FlightStatus};
use tarmac_store::{EntityStore, SharedStore};
use tracing::info;

use crate::error::RegistryError;

#[derive(Debug, Clone)]
pub struct NewFlight {
    pub airline: String,
    pub flight_number: String,
    pub gate: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
}

/// Result of a gate change, handed back so the calling workflow can notify
/// ground staff. The registry itself never posts messages.
#[derive(Debug, Clone)]
pub struct GateReassignment {
    pub flight_id: String,
    pub flight_number: String,
    pub old_gate: String,
    pub new_gate: String,
}

/// Flight CRUD and gate assignment rules
#[derive(Clone)]
pub struct FlightRegistry {
    store: SharedStore,
}

impl FlightRegistry {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn create_flight(&self, new: NewFlight) -> Result<Flight, RegistryError> {
        ids::validate_airline_code(&new.airline)?;
        ids::validate_flight_number(&new.flight_number)?;
        ids::validate_gate(&new.gate)?;
        if !new.flight_number.starts_with(&new.airline) {
            return Err(ids::IdError::FlightNumber.into());
        }

        let mut store = self.store.lock();

        let number_taken = store
            .flights
            .values()
            .any(|f| f.flight_number == new.flight_number && f.is_active());
        if number_taken {
            return Err(RegistryError::DuplicateFlightNumber(new.flight_number));
        }
        if gate_in_use(&store, &new.gate, None) {
            return Err(RegistryError::GateOccupied(new.gate));
        }

        let id = format!("{}_{}", new.flight_number, Utc::now().timestamp_millis());
        let flight = Flight::new(
            id.clone(),
            new.airline,
            new.flight_number,
            new.gate,
            new.destination,
            new.departure_time,
        );
        store.flights.insert(id.clone(), flight.clone());
        store.persist_flights()?;

        info!("Flight {} created at gate {}", flight.flight_number, flight.gate);
        Ok(flight)
    }

    pub fn change_gate(
        &self,
        flight_id: &str,
        new_gate: &str,
    ) -> Result<GateReassignment, RegistryError> {
        ids::validate_gate(new_gate)?;

        let mut store = self.store.lock();

        if !store.flights.contains_key(flight_id) {
            return Err(RegistryError::FlightNotFound(flight_id.to_owned()));
        }
        if gate_in_use(&store, new_gate, Some(flight_id)) {
            return Err(RegistryError::GateOccupied(new_gate.to_owned()));
        }

        let flight = store
            .flights
            .get_mut(flight_id)
            .ok_or_else(|| RegistryError::FlightNotFound(flight_id.to_owned()))?;
        let old_gate = std::mem::replace(&mut flight.gate, new_gate.to_owned());
        let reassignment = GateReassignment {
            flight_id: flight.id.clone(),
            flight_number: flight.flight_number.clone(),
            old_gate,
            new_gate: new_gate.to_owned(),
        };
        store.persist_flights()?;

        info!(
            "Flight {} moved from gate {} to gate {}",
            reassignment.flight_number, reassignment.old_gate, reassignment.new_gate
        );
        Ok(reassignment)
    }

    pub fn update_status(
        &self,
        flight_id: &str,
        new_status: FlightStatus,
    ) -> Result<Flight, RegistryError> {
        let mut store = self.store.lock();
        let flight = store
            .flights
            .get_mut(flight_id)
            .ok_or_else(|| RegistryError::FlightNotFound(flight_id.to_owned()))?;

        if !flight.status.can_transition_to(new_status) {
            return Err(RegistryError::InvalidFlightTransition {
                from: format!("{:?}", flight.status),
                to: format!("{:?}", new_status),
            });
        }

        flight.status = new_status;
        let updated = flight.clone();
        store.persist_flights()?;

        info!("Flight {} is now {:?}", updated.flight_number, updated.status);
        Ok(updated)
    }

    pub fn remove_flight(&self, flight_id: &str) -> Result<(), RegistryError> {
        let mut store = self.store.lock();
        let flight = store
            .flights
            .get(flight_id)
            .ok_or_else(|| RegistryError::FlightNotFound(flight_id.to_owned()))?;

        if !flight.passenger_ids.is_empty() {
            return Err(RegistryError::FlightHasPassengers(flight_id.to_owned()));
        }

        store.flights.remove(flight_id);
        store.persist_flights()?;
        Ok(())
    }

    pub fn get(&self, flight_id: &str) -> Result<Flight, RegistryError> {
        let store = self.store.lock();
        store
            .flights
            .get(flight_id)
            .cloned()
            .ok_or_else(|| RegistryError::FlightNotFound(flight_id.to_owned()))
    }

    pub fn list(&self) -> Vec<Flight> {
        let store = self.store.lock();
        let mut flights: Vec<Flight> = store.flights.values().cloned().collect();
        flights.sort_by_key(|f| f.departure_time);
        flights
    }

    pub fn list_by_airline(&self, airline: &str) -> Vec<Flight> {
        let store = self.store.lock();
        let mut flights: Vec<Flight> = store
            .flights
            .values()
            .filter(|f| f.airline == airline)
            .cloned()
            .collect();
        flights.sort_by_key(|f| f.departure_time);
        flights
    }
}

/// At most one active flight holds a gate at any time.
fn gate_in_use(store: &EntityStore, gate: &str, exclude_flight: Option<&str>) -> bool {
    store.flights.values().any(|f| {
        f.gate == gate && f.is_active() && exclude_flight.map_or(true, |id| f.id != id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FlightRegistry {
        FlightRegistry::new(SharedStore::in_memory())
    }

    fn new_flight(number: &str, gate: &str) -> NewFlight {
        NewFlight {
            airline: number[..2].to_owned(),
            flight_number: number.to_owned(),
            gate: gate.to_owned(),
            destination: "JFK".to_owned(),
            departure_time: Utc::now(),
        }
    }

    #[test]
    fn test_flight_lifecycle() {
        let registry = registry();
        let flight = registry.create_flight(new_flight("AA1234", "A12")).unwrap();
        assert_eq!(flight.status, FlightStatus::Scheduled);
        assert!(flight.passenger_ids.is_empty());

        registry.update_status(&flight.id, FlightStatus::Boarding).unwrap();
        registry.update_status(&flight.id, FlightStatus::Departed).unwrap();
        assert_eq!(registry.get(&flight.id).unwrap().status, FlightStatus::Departed);
    }

    #[test]
    fn test_no_skipping_status() {
        let registry = registry();
        let flight = registry.create_flight(new_flight("AA1234", "A12")).unwrap();

        let result = registry.update_status(&flight.id, FlightStatus::Departed);
        assert!(matches!(
            result,
            Err(RegistryError::InvalidFlightTransition { .. })
        ));
    }

    #[test]
    fn test_duplicate_active_flight_number() {
        let registry = registry();
        registry.create_flight(new_flight("AA1234", "A12")).unwrap();

        let result = registry.create_flight(new_flight("AA1234", "B5"));
        assert!(matches!(result, Err(RegistryError::DuplicateFlightNumber(_))));
    }

    #[test]
    fn test_departed_flight_frees_its_number_and_gate() {
        let registry = registry();
        let flight = registry.create_flight(new_flight("AA1234", "A12")).unwrap();
        registry.update_status(&flight.id, FlightStatus::Boarding).unwrap();
        registry.update_status(&flight.id, FlightStatus::Departed).unwrap();

        // Same number and same gate are both reusable once the flight departs
        registry.create_flight(new_flight("AA1234", "A12")).unwrap();
    }

    #[test]
    fn test_gate_exclusivity() {
        let registry = registry();
        registry.create_flight(new_flight("AA1234", "A12")).unwrap();

        let result = registry.create_flight(new_flight("DL5678", "A12"));
        assert!(matches!(result, Err(RegistryError::GateOccupied(_))));
    }

    #[test]
    fn test_change_gate_reports_old_and_new() {
        let registry = registry();
        let flight = registry.create_flight(new_flight("AA1234", "A12")).unwrap();
        registry.create_flight(new_flight("DL5678", "B5")).unwrap();

        let reassignment = registry.change_gate(&flight.id, "C3").unwrap();
        assert_eq!(reassignment.old_gate, "A12");
        assert_eq!(reassignment.new_gate, "C3");

        // Occupied gate rejected
        let result = registry.change_gate(&flight.id, "B5");
        assert!(matches!(result, Err(RegistryError::GateOccupied(_))));

        // Re-assigning within the same flight keeps its own gate available
        registry.change_gate(&flight.id, "C3").unwrap();
    }

    #[test]
    fn test_remove_flight_requires_no_passengers() {
        let registry = registry();
        let flight = registry.create_flight(new_flight("AA1234", "A12")).unwrap();
        registry.remove_flight(&flight.id).unwrap();
        assert!(matches!(
            registry.get(&flight.id),
            Err(RegistryError::FlightNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_inputs() {
        let registry = registry();
        assert!(registry
            .create_flight(NewFlight {
                airline: "AAA".into(),
                flight_number: "AA1234".into(),
                gate: "A12".into(),
                destination: "JFK".into(),
                departure_time: Utc::now(),
            })
            .is_err());
        assert!(registry.create_flight(new_flight("aa1234", "A12")).is_err());

        // Flight number must carry the airline prefix
        let mut mismatched = new_flight("DL1234", "A12");
        mismatched.airline = "AA".into();
        assert!(registry.create_flight(mismatched).is_err());
    }
}
