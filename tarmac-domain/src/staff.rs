use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff roles; each role sees exactly one message board
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    AirlineStaff,
    GateStaff,
    GroundStaff,
}

impl Role {
    /// Airline and gate staff operate under an airline scope.
    pub fn requires_airline(self) -> bool {
        matches!(self, Role::AirlineStaff | Role::GateStaff)
    }
}

/// A staff account with generated credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub airline: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Set at creation; cleared on the first successful password change.
    pub must_change_password: bool,
}
