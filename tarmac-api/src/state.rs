use tarmac_messaging::MessageBus;
use tarmac_registry::{
    BagRegistry, FlightRegistry, PassengerRegistry, StaffDirectory,
};
use tarmac_store::SharedStore;
use tarmac_workflow::Coordinator;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub flights: FlightRegistry,
    pub passengers: PassengerRegistry,
    pub bags: BagRegistry,
    pub staff: StaffDirectory,
    pub bus: MessageBus,
    pub coordinator: Coordinator,
    pub auth: AuthConfig,
}

impl AppState {
    /// All registries share the one store handle, so every operation is a
    /// single-writer read-modify-write regardless of which route it enters
    /// through.
    pub fn new(store: SharedStore, auth: AuthConfig) -> Self {
        Self {
            flights: FlightRegistry::new(store.clone()),
            passengers: PassengerRegistry::new(store.clone()),
            bags: BagRegistry::new(store.clone()),
            staff: StaffDirectory::new(store.clone()),
            bus: MessageBus::new(store.clone()),
            coordinator: Coordinator::new(store),
            auth,
        }
    }
}
