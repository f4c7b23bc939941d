pub mod actor;
pub mod bag;
pub mod credentials;
pub mod error;
pub mod flight;
pub mod passenger;
pub mod staff;

pub use actor::ActorContext;
pub use bag::BagRegistry;
pub use error::RegistryError;
pub use flight::{FlightRegistry, GateReassignment, NewFlight};
pub use passenger::{NewPassenger, PassengerRegistry};
pub use staff::{IssuedCredentials, NewStaff, StaffDirectory};
