use tarmac_domain::ids::IdError;
use tarmac_domain::{BagLocation, PassengerStatus, Role};
use tarmac_store::StoreError;
use uuid::Uuid;

/// Every validation failure a registry can report. All of these are
/// recoverable, caller-visible rejections; once made they are final and
/// surfaced verbatim to the acting role.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("flight not found: {0}")]
    FlightNotFound(String),

    #[error("passenger not found: {0}")]
    PassengerNotFound(String),

    #[error("bag not found: {0}")]
    BagNotFound(String),

    #[error("staff member not found: {0}")]
    StaffNotFound(Uuid),

    #[error("an active flight already has number {0}")]
    DuplicateFlightNumber(String),

    #[error("passenger id already exists: {0}")]
    DuplicatePassengerId(String),

    #[error("ticket number already in use: {0}")]
    DuplicateTicketNumber(String),

    #[error("bag id already exists: {0}")]
    DuplicateBagId(String),

    #[error("gate {0} is already in use by another active flight")]
    GateOccupied(String),

    #[error("invalid status transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: PassengerStatus,
        to: PassengerStatus,
    },

    #[error("invalid flight status transition from {from} to {to}")]
    InvalidFlightTransition { from: String, to: String },

    #[error("invalid bag movement from {from:?} to {to:?}")]
    InvalidBagTransition {
        from: BagLocation,
        to: BagLocation,
    },

    #[error("flight {0} still has passengers")]
    FlightHasPassengers(String),

    #[error("passenger {0} has bags not yet at the gate")]
    BagsNotReady(String),

    #[error("passenger {0} has a bag flagged as a security violation")]
    SecurityViolationPending(String),

    #[error("passenger {0} must be boarded before their bags can be loaded")]
    PassengerNotBoarded(String),

    #[error("passenger {0} must be checked in before bags can be added")]
    PassengerNotCheckedIn(String),

    #[error("actor lacks authority over this entity")]
    ScopeViolation,

    #[error("the admin account cannot be removed")]
    AdminNotRemovable,

    #[error("role {0:?} requires an airline scope")]
    AirlineScopeRequired(Role),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    InvalidId(#[from] IdError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
