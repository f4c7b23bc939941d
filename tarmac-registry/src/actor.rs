use tarmac_domain::Role;
use uuid::Uuid;

use crate::error::RegistryError;

/// Who is performing an operation. Authentication happens outside the
/// engine; this carries only the verified role and airline scope.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub staff_id: Uuid,
    pub username: String,
    pub role: Role,
    pub airline: Option<String>,
}

impl ActorContext {
    pub fn new(staff_id: Uuid, username: String, role: Role, airline: Option<String>) -> Self {
        Self {
            staff_id,
            username,
            role,
            airline,
        }
    }

    /// Reject actors outside the allowed roles.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), RegistryError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(RegistryError::ScopeViolation)
        }
    }

    /// Reject airline-scoped actors acting on another airline's entities.
    /// Admin and ground staff are not airline-scoped.
    pub fn require_airline(&self, airline: &str) -> Result<(), RegistryError> {
        if !self.role.requires_airline() {
            return Ok(());
        }
        match self.airline.as_deref() {
            Some(scope) if scope == airline => Ok(()),
            _ => Err(RegistryError::ScopeViolation),
        }
    }
}
