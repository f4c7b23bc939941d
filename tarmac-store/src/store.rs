use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use tarmac_domain::{Bag, Board, Flight, Message, Passenger, StaffMember};

use crate::backend::{MemoryBackend, StorageBackend};
use crate::StoreError;

/// Collection names, matching the keys the registries persist under.
pub mod collections {
    pub const FLIGHTS: &str = "flights";
    pub const PASSENGERS: &str = "passengers";
    pub const BAGS: &str = "bags";
    pub const USERS: &str = "users";
    pub const MESSAGES: &str = "messages";
}

/// All engine state, hydrated from the backend at open. Registries mutate
/// the maps directly and persist the touched collections before returning.
pub struct EntityStore {
    backend: Box<dyn StorageBackend>,
    pub flights: HashMap<String, Flight>,
    pub passengers: HashMap<String, Passenger>,
    pub bags: HashMap<String, Bag>,
    pub staff: HashMap<Uuid, StaffMember>,
    pub boards: HashMap<Board, Vec<Message>>,
}

impl EntityStore {
    pub fn open(backend: Box<dyn StorageBackend>) -> Result<Self, StoreError> {
        let flights = load_collection(backend.as_ref(), collections::FLIGHTS)?;
        let passengers = load_collection(backend.as_ref(), collections::PASSENGERS)?;
        let bags = load_collection(backend.as_ref(), collections::BAGS)?;
        let staff = load_collection(backend.as_ref(), collections::USERS)?;
        let boards = load_collection(backend.as_ref(), collections::MESSAGES)?;
        Ok(Self {
            backend,
            flights,
            passengers,
            bags,
            staff,
            boards,
        })
    }

    pub fn persist_flights(&self) -> Result<(), StoreError> {
        self.persist(collections::FLIGHTS, &self.flights)
    }

    pub fn persist_passengers(&self) -> Result<(), StoreError> {
        self.persist(collections::PASSENGERS, &self.passengers)
    }

    pub fn persist_bags(&self) -> Result<(), StoreError> {
        self.persist(collections::BAGS, &self.bags)
    }

    pub fn persist_staff(&self) -> Result<(), StoreError> {
        self.persist(collections::USERS, &self.staff)
    }

    pub fn persist_messages(&self) -> Result<(), StoreError> {
        self.persist(collections::MESSAGES, &self.boards)
    }

    fn persist<T: Serialize>(&self, collection: &str, value: &T) -> Result<(), StoreError> {
        self.backend.save(collection, &serde_json::to_value(value)?)
    }
}

fn load_collection<T>(backend: &dyn StorageBackend, collection: &str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match backend.load(collection)? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(T::default()),
    }
}

/// Single-writer handle over the store. Every registry operation is a
/// read-modify-write under this one lock, so cascading deletes and
/// cross-entity checks commit atomically.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<EntityStore>>,
}

impl SharedStore {
    pub fn new(store: EntityStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Fresh store over a volatile backend; the fixture entry point for tests.
    pub fn in_memory() -> Self {
        let store = EntityStore::open(Box::new(MemoryBackend::new()))
            .unwrap_or_else(|_| unreachable!("memory backend cannot fail to open"));
        Self::new(store)
    }

    pub fn lock(&self) -> MutexGuard<'_, EntityStore> {
        // A poisoned lock still holds consistent state: every operation
        // re-validates against current state before writing.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
