use chrono::Utc;
use tarmac_domain::{ids, Role, StaffMember};
use tarmac_store::SharedStore;
use tracing::info;
use uuid::Uuid;

use crate::credentials;
use crate::error::RegistryError;

#[derive(Debug, Clone)]
pub struct NewStaff {
    pub name: String,
    pub role: Role,
    pub airline: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A freshly created account with its one-time plain password. The password
/// is never stored and never shown again.
#[derive(Debug)]
pub struct IssuedCredentials {
    pub staff: StaffMember,
    pub password: String,
}

/// Staff accounts: generated credentials, login verification, role/airline
/// lookups. Authentication sessions live outside the engine.
#[derive(Clone)]
pub struct StaffDirectory {
    store: SharedStore,
}

impl StaffDirectory {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn create_staff(&self, new: NewStaff) -> Result<IssuedCredentials, RegistryError> {
        ids::validate_name(&new.name)?;
        if let Some(email) = new.email.as_deref() {
            ids::validate_email(email)?;
        }
        if let Some(phone) = new.phone.as_deref() {
            ids::validate_phone(phone)?;
        }
        if new.role.requires_airline() {
            match new.airline.as_deref() {
                Some(code) => ids::validate_airline_code(code)?,
                None => return Err(RegistryError::AirlineScopeRequired(new.role)),
            }
        }

        let mut store = self.store.lock();

        let mut username = credentials::generate_username(&new.name);
        let mut attempts = 0;
        while store.staff.values().any(|s| s.username == username) {
            attempts += 1;
            if attempts > 100 {
                username = format!("{}{}", username, Utc::now().timestamp_millis());
                break;
            }
            username = credentials::generate_username(&new.name);
        }

        let password = credentials::generate_password();
        let staff = StaffMember {
            id: Uuid::new_v4(),
            username,
            password_hash: credentials::hash_password(&password),
            name: new.name,
            role: new.role,
            airline: new.airline,
            email: new.email,
            phone: new.phone,
            must_change_password: true,
        };
        store.staff.insert(staff.id, staff.clone());
        store.persist_staff()?;

        info!("Staff account {} created with role {:?}", staff.username, staff.role);
        Ok(IssuedCredentials { staff, password })
    }

    /// Seed the directory with its admin account on first run. Returns the
    /// one-time credentials when an admin was created, None when one exists.
    pub fn ensure_admin(&self) -> Result<Option<IssuedCredentials>, RegistryError> {
        {
            let store = self.store.lock();
            if store.staff.values().any(|s| s.role == Role::Admin) {
                return Ok(None);
            }
        }

        let password = credentials::generate_password();
        let staff = StaffMember {
            id: Uuid::new_v4(),
            username: "admin".to_owned(),
            password_hash: credentials::hash_password(&password),
            name: "Administrator".to_owned(),
            role: Role::Admin,
            airline: None,
            email: None,
            phone: None,
            must_change_password: true,
        };

        let mut store = self.store.lock();
        store.staff.insert(staff.id, staff.clone());
        store.persist_staff()?;

        info!("Seeded admin account");
        Ok(Some(IssuedCredentials { staff, password }))
    }

    /// Pass/fail credential check; which side failed is never disclosed.
    pub fn verify_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<StaffMember, RegistryError> {
        let store = self.store.lock();
        store
            .staff
            .values()
            .find(|s| s.username == username)
            .filter(|s| credentials::verify_password(password, &s.password_hash))
            .cloned()
            .ok_or(RegistryError::InvalidCredentials)
    }

    /// Re-hash on change; the first successful change clears the
    /// must-change-password flag.
    pub fn change_password(
        &self,
        staff_id: Uuid,
        current: &str,
        new_password: &str,
    ) -> Result<(), RegistryError> {
        ids::validate_password(new_password)?;

        let mut store = self.store.lock();
        let staff = store
            .staff
            .get_mut(&staff_id)
            .ok_or(RegistryError::StaffNotFound(staff_id))?;

        if !credentials::verify_password(current, &staff.password_hash) {
            return Err(RegistryError::InvalidCredentials);
        }

        staff.password_hash = credentials::hash_password(new_password);
        staff.must_change_password = false;
        store.persist_staff()?;

        info!("Password changed for staff {}", staff_id);
        Ok(())
    }

    pub fn remove_staff(&self, staff_id: Uuid) -> Result<(), RegistryError> {
        let mut store = self.store.lock();
        let staff = store
            .staff
            .get(&staff_id)
            .ok_or(RegistryError::StaffNotFound(staff_id))?;

        if staff.role == Role::Admin {
            return Err(RegistryError::AdminNotRemovable);
        }

        store.staff.remove(&staff_id);
        store.persist_staff()?;
        Ok(())
    }

    pub fn get(&self, staff_id: Uuid) -> Result<StaffMember, RegistryError> {
        let store = self.store.lock();
        store
            .staff
            .get(&staff_id)
            .cloned()
            .ok_or(RegistryError::StaffNotFound(staff_id))
    }

    pub fn find_by_username(&self, username: &str) -> Option<StaffMember> {
        let store = self.store.lock();
        store.staff.values().find(|s| s.username == username).cloned()
    }

    pub fn list(&self) -> Vec<StaffMember> {
        let store = self.store.lock();
        let mut staff: Vec<StaffMember> = store.staff.values().cloned().collect();
        staff.sort_by(|a, b| a.username.cmp(&b.username));
        staff
    }

    pub fn list_by_role(&self, role: Role) -> Vec<StaffMember> {
        self.list().into_iter().filter(|s| s.role == role).collect()
    }

    pub fn list_by_airline(&self, airline: &str) -> Vec<StaffMember> {
        self.list()
            .into_iter()
            .filter(|s| s.airline.as_deref() == Some(airline))
            .collect()
    }
}
