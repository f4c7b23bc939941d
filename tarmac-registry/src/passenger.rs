use tarmac_domain::{ids, BagLocation, Passenger, PassengerStatus};
use tarmac_store::SharedStore;
use tracing::info;
use uuid::Uuid;

use crate::error::RegistryError;

#[derive(Debug, Clone)]
pub struct NewPassenger {
    pub id: String,
    pub name: String,
    pub ticket_number: String,
    pub flight_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Passenger CRUD and the check-in/board state machine
#[derive(Clone)]
pub struct PassengerRegistry {
    store: SharedStore,
}

impl PassengerRegistry {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn create_passenger(&self, new: NewPassenger) -> Result<Passenger, RegistryError> {
        ids::validate_passenger_id(&new.id)?;
        ids::validate_ticket_number(&new.ticket_number)?;
        ids::validate_name(&new.name)?;
        if let Some(email) = new.email.as_deref() {
            ids::validate_email(email)?;
        }
        if let Some(phone) = new.phone.as_deref() {
            ids::validate_phone(phone)?;
        }

        let mut store = self.store.lock();

        if store.passengers.contains_key(&new.id) {
            return Err(RegistryError::DuplicatePassengerId(new.id));
        }
        let ticket_taken = store
            .passengers
            .values()
            .any(|p| p.ticket_number == new.ticket_number);
        if ticket_taken {
            // One ticket per passenger, globally
            return Err(RegistryError::DuplicateTicketNumber(new.ticket_number));
        }
        if !store.flights.contains_key(&new.flight_id) {
            return Err(RegistryError::FlightNotFound(new.flight_id));
        }

        let passenger = Passenger::new(
            new.id.clone(),
            new.name,
            new.ticket_number,
            new.flight_id.clone(),
            new.email,
            new.phone,
        );
        store.passengers.insert(new.id.clone(), passenger.clone());
        if let Some(flight) = store.flights.get_mut(&new.flight_id) {
            flight.passenger_ids.push(new.id.clone());
        }
        store.persist_passengers()?;
        store.persist_flights()?;

        info!("Passenger {} added to flight {}", passenger.id, passenger.flight_id);
        Ok(passenger)
    }

    pub fn check_in(
        &self,
        passenger_id: &str,
        staff_id: Uuid,
    ) -> Result<Passenger, RegistryError> {
        let mut store = self.store.lock();
        let passenger = store
            .passengers
            .get_mut(passenger_id)
            .ok_or_else(|| RegistryError::PassengerNotFound(passenger_id.to_owned()))?;

        if passenger.status != PassengerStatus::NotCheckedIn {
            return Err(RegistryError::InvalidTransition {
                from: passenger.status,
                to: PassengerStatus::CheckedIn,
            });
        }

        passenger.check_in(staff_id);
        let updated = passenger.clone();
        store.persist_passengers()?;

        info!("Passenger {} checked in", updated.id);
        Ok(updated)
    }

    /// Board a passenger. The bag-readiness check runs under the same store
    /// lock as the status write, so no bag can slip past it concurrently.
    pub fn board(&self, passenger_id: &str, staff_id: Uuid) -> Result<Passenger, RegistryError> {
        let mut store = self.store.lock();
        let passenger = store
            .passengers
            .get(passenger_id)
            .ok_or_else(|| RegistryError::PassengerNotFound(passenger_id.to_owned()))?;

        if passenger.status != PassengerStatus::CheckedIn {
            return Err(RegistryError::InvalidTransition {
                from: passenger.status,
                to: PassengerStatus::Boarded,
            });
        }

        // Every owned bag must be waiting at the gate; a flagged bag blocks
        // boarding until the removal workflow resolves it.
        for bag_id in &passenger.bag_ids {
            match store.bags.get(bag_id).map(|b| b.location) {
                Some(BagLocation::SecurityViolation) => {
                    return Err(RegistryError::SecurityViolationPending(
                        passenger_id.to_owned(),
                    ));
                }
                Some(BagLocation::Gate) => {}
                _ => return Err(RegistryError::BagsNotReady(passenger_id.to_owned())),
            }
        }

        let passenger = store
            .passengers
            .get_mut(passenger_id)
            .ok_or_else(|| RegistryError::PassengerNotFound(passenger_id.to_owned()))?;
        passenger.board(staff_id);
        let updated = passenger.clone();
        store.persist_passengers()?;

        info!("Passenger {} boarded", updated.id);
        Ok(updated)
    }

    /// Remove a passenger, their bags, and their seat on the flight as one
    /// atomic cascade. A missing passenger mutates nothing.
    pub fn remove_passenger(&self, passenger_id: &str) -> Result<(), RegistryError> {
        let mut store = self.store.lock();
        let passenger = store
            .passengers
            .get(passenger_id)
            .cloned()
            .ok_or_else(|| RegistryError::PassengerNotFound(passenger_id.to_owned()))?;

        for bag_id in &passenger.bag_ids {
            store.bags.remove(bag_id);
        }
        if let Some(flight) = store.flights.get_mut(&passenger.flight_id) {
            flight.passenger_ids.retain(|id| id != passenger_id);
        }
        store.passengers.remove(passenger_id);

        store.persist_bags()?;
        store.persist_flights()?;
        store.persist_passengers()?;

        info!(
            "Passenger {} removed with {} bag(s)",
            passenger_id,
            passenger.bag_ids.len()
        );
        Ok(())
    }

    pub fn get(&self, passenger_id: &str) -> Result<Passenger, RegistryError> {
        let store = self.store.lock();
        store
            .passengers
            .get(passenger_id)
            .cloned()
            .ok_or_else(|| RegistryError::PassengerNotFound(passenger_id.to_owned()))
    }

    /// Passenger-facing lookup: the id and ticket number must match as a
    /// pair. Which side failed is never disclosed.
    pub fn verify_ticket(
        &self,
        passenger_id: &str,
        ticket_number: &str,
    ) -> Result<Passenger, RegistryError> {
        let store = self.store.lock();
        store
            .passengers
            .get(passenger_id)
            .filter(|p| p.ticket_number == ticket_number)
            .cloned()
            .ok_or_else(|| RegistryError::PassengerNotFound(passenger_id.to_owned()))
    }

    pub fn find_by_ticket(&self, ticket_number: &str) -> Option<Passenger> {
        let store = self.store.lock();
        store
            .passengers
            .values()
            .find(|p| p.ticket_number == ticket_number)
            .cloned()
    }

    pub fn list(&self) -> Vec<Passenger> {
        let store = self.store.lock();
        let mut passengers: Vec<Passenger> = store.passengers.values().cloned().collect();
        passengers.sort_by(|a, b| a.id.cmp(&b.id));
        passengers
    }

    pub fn list_by_flight(&self, flight_id: &str) -> Vec<Passenger> {
        let store = self.store.lock();
        let mut passengers: Vec<Passenger> = store
            .passengers
            .values()
            .filter(|p| p.flight_id == flight_id)
            .cloned()
            .collect();
        passengers.sort_by(|a, b| a.id.cmp(&b.id));
        passengers
    }
}
