use tarmac_domain::{ids, Bag, BagLocation, PassengerStatus};
use tarmac_store::SharedStore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::RegistryError;

/// Bag CRUD and the location state machine
#[derive(Clone)]
pub struct BagRegistry {
    store: SharedStore,
}

impl BagRegistry {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Register a bag for the passenger holding `ticket_number`. The
    /// passenger must already be checked in; the bag enters at check-in.
    pub fn add_bag(
        &self,
        bag_id: &str,
        ticket_number: &str,
        staff_id: Uuid,
    ) -> Result<Bag, RegistryError> {
        ids::validate_bag_id(bag_id)?;
        ids::validate_ticket_number(ticket_number)?;

        let mut store = self.store.lock();

        if store.bags.contains_key(bag_id) {
            return Err(RegistryError::DuplicateBagId(bag_id.to_owned()));
        }

        let passenger = store
            .passengers
            .values()
            .find(|p| p.ticket_number == ticket_number)
            .ok_or_else(|| RegistryError::PassengerNotFound(ticket_number.to_owned()))?;
        if passenger.status == PassengerStatus::NotCheckedIn {
            return Err(RegistryError::PassengerNotCheckedIn(passenger.id.clone()));
        }

        let bag = Bag::new(
            bag_id.to_owned(),
            ticket_number.to_owned(),
            passenger.id.clone(),
            passenger.flight_id.clone(),
            staff_id,
        );
        let passenger_id = bag.passenger_id.clone();
        store.bags.insert(bag_id.to_owned(), bag.clone());
        if let Some(passenger) = store.passengers.get_mut(&passenger_id) {
            passenger.bag_ids.push(bag_id.to_owned());
        }
        store.persist_bags()?;
        store.persist_passengers()?;

        info!("Bag {} checked in for passenger {}", bag.id, bag.passenger_id);
        Ok(bag)
    }

    /// Move a bag along check-in -> security -> gate -> loaded, or branch
    /// security -> security-violation. A rejected move leaves the bag
    /// untouched.
    pub fn update_location(
        &self,
        bag_id: &str,
        new_location: BagLocation,
        staff_id: Uuid,
    ) -> Result<Bag, RegistryError> {
        let mut store = self.store.lock();
        let bag = store
            .bags
            .get(bag_id)
            .ok_or_else(|| RegistryError::BagNotFound(bag_id.to_owned()))?;

        match (bag.location, new_location) {
            (BagLocation::CheckIn, BagLocation::Security)
            | (BagLocation::Security, BagLocation::Gate)
            | (BagLocation::Security, BagLocation::SecurityViolation) => {}
            (BagLocation::Gate, BagLocation::Loaded) => {
                let owner = store.passengers.get(&bag.passenger_id);
                if owner.map(|p| p.status) != Some(PassengerStatus::Boarded) {
                    return Err(RegistryError::PassengerNotBoarded(bag.passenger_id.clone()));
                }
            }
            (from, to) => return Err(RegistryError::InvalidBagTransition { from, to }),
        }

        let bag = store
            .bags
            .get_mut(bag_id)
            .ok_or_else(|| RegistryError::BagNotFound(bag_id.to_owned()))?;
        bag.move_to(new_location, staff_id);
        let updated = bag.clone();
        store.persist_bags()?;

        if new_location == BagLocation::SecurityViolation {
            warn!("Bag {} flagged as a security violation", updated.id);
        } else {
            info!("Bag {} moved to {:?}", updated.id, updated.location);
        }
        Ok(updated)
    }

    /// True when the flight has no bags, or every bag is loaded. A bag in
    /// security-violation never counts as loaded.
    pub fn are_all_bags_loaded(&self, flight_id: &str) -> bool {
        let store = self.store.lock();
        store
            .bags
            .values()
            .filter(|b| b.flight_id == flight_id)
            .all(|b| b.location == BagLocation::Loaded)
    }

    /// Delete every bag a passenger owns. Part of the security-violation
    /// removal workflow and of the passenger-removal cascade.
    pub fn remove_bags_for_passenger(&self, passenger_id: &str) -> Result<usize, RegistryError> {
        let mut store = self.store.lock();
        let bag_ids = store
            .passengers
            .get(passenger_id)
            .map(|p| p.bag_ids.clone())
            .ok_or_else(|| RegistryError::PassengerNotFound(passenger_id.to_owned()))?;

        for bag_id in &bag_ids {
            store.bags.remove(bag_id);
        }
        if let Some(passenger) = store.passengers.get_mut(passenger_id) {
            passenger.bag_ids.clear();
        }
        store.persist_bags()?;
        store.persist_passengers()?;

        info!("Removed {} bag(s) for passenger {}", bag_ids.len(), passenger_id);
        Ok(bag_ids.len())
    }

    pub fn get(&self, bag_id: &str) -> Result<Bag, RegistryError> {
        let store = self.store.lock();
        store
            .bags
            .get(bag_id)
            .cloned()
            .ok_or_else(|| RegistryError::BagNotFound(bag_id.to_owned()))
    }

    pub fn list(&self) -> Vec<Bag> {
        self.filtered(|_| true)
    }

    pub fn bags_by_flight(&self, flight_id: &str) -> Vec<Bag> {
        self.filtered(|b| b.flight_id == flight_id)
    }

    pub fn bags_by_passenger(&self, passenger_id: &str) -> Vec<Bag> {
        self.filtered(|b| b.passenger_id == passenger_id)
    }

    pub fn bags_by_location(&self, location: BagLocation) -> Vec<Bag> {
        self.filtered(|b| b.location == location)
    }

    pub fn unloaded_bags(&self, flight_id: &str) -> Vec<Bag> {
        self.filtered(|b| b.flight_id == flight_id && b.location != BagLocation::Loaded)
    }

    fn filtered(&self, keep: impl Fn(&Bag) -> bool) -> Vec<Bag> {
        let store = self.store.lock();
        let mut bags: Vec<Bag> = store.bags.values().filter(|b| keep(b)).cloned().collect();
        bags.sort_by(|a, b| a.id.cmp(&b.id));
        bags
    }
}
