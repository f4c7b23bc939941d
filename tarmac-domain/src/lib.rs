pub mod bag;
pub mod flight;
pub mod ids;
pub mod message;
pub mod passenger;
pub mod staff;

pub use bag::{Bag, BagLocation, TimelineEntry};
pub use flight::{Flight, FlightStatus};
pub use message::{Board, Message, MessagePayload, Priority};
pub use passenger::{Passenger, PassengerStatus};
pub use staff::{Role, StaffMember};
