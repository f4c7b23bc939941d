//! Identifier and field format rules. Generation of fresh ids is a caller
//! concern; these checks run once at insert time.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("bag id must be exactly 6 digits")]
    BagId,
    #[error("passenger id must be exactly 6 digits")]
    PassengerId,
    #[error("ticket number must be exactly 10 digits")]
    TicketNumber,
    #[error("flight number must be 2 uppercase letters followed by 4 digits, e.g. AA1234")]
    FlightNumber,
    #[error("airline code must be 2 uppercase letters")]
    AirlineCode,
    #[error("gate must be alphanumeric, e.g. A12")]
    Gate,
    #[error("password must be at least 6 characters with 1 uppercase, 1 lowercase and 1 digit")]
    Password,
    #[error("email must be in the form user@host.tld")]
    Email,
    #[error("phone must be 10 digits and must not start with 0")]
    Phone,
    #[error("name must be at least 2 letters")]
    Name,
}

fn all_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_bag_id(value: &str) -> Result<(), IdError> {
    if all_digits(value, 6) {
        Ok(())
    } else {
        Err(IdError::BagId)
    }
}

pub fn validate_passenger_id(value: &str) -> Result<(), IdError> {
    if all_digits(value, 6) {
        Ok(())
    } else {
        Err(IdError::PassengerId)
    }
}

pub fn validate_ticket_number(value: &str) -> Result<(), IdError> {
    if all_digits(value, 10) {
        Ok(())
    } else {
        Err(IdError::TicketNumber)
    }
}

pub fn validate_flight_number(value: &str) -> Result<(), IdError> {
    let bytes = value.as_bytes();
    if bytes.len() == 6
        && bytes[..2].iter().all(|b| b.is_ascii_uppercase())
        && bytes[2..].iter().all(|b| b.is_ascii_digit())
    {
        Ok(())
    } else {
        Err(IdError::FlightNumber)
    }
}

pub fn validate_airline_code(value: &str) -> Result<(), IdError> {
    if value.len() == 2 && value.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(IdError::AirlineCode)
    }
}

pub fn validate_gate(value: &str) -> Result<(), IdError> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(IdError::Gate)
    }
}

pub fn validate_password(value: &str) -> Result<(), IdError> {
    let long_enough = value.len() >= 6;
    let has_upper = value.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = value.bytes().any(|b| b.is_ascii_lowercase());
    let has_digit = value.bytes().any(|b| b.is_ascii_digit());
    if long_enough && has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(IdError::Password)
    }
}

pub fn validate_email(value: &str) -> Result<(), IdError> {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(host), None)
            if !local.is_empty()
                && host.contains('.')
                && !host.starts_with('.')
                && !host.ends_with('.')
                && !value.contains(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err(IdError::Email),
    }
}

pub fn validate_phone(value: &str) -> Result<(), IdError> {
    if all_digits(value, 10) && !value.starts_with('0') {
        Ok(())
    } else {
        Err(IdError::Phone)
    }
}

pub fn validate_name(value: &str) -> Result<(), IdError> {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        Ok(())
    } else {
        Err(IdError::Name)
    }
}
