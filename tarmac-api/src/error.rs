use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tarmac_registry::RegistryError;
use tarmac_store::StoreError;
use tarmac_workflow::WorkflowError;

#[derive(Debug)]
pub enum AppError {
    Registry(RegistryError),
    Workflow(WorkflowError),
    AuthenticationError(String),
    Anyhow(anyhow::Error),
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        // Collapse wrapped registry rejections so the status mapping below
        // stays in one place
        match err {
            WorkflowError::Registry(inner) => Self::Registry(inner),
            other => Self::Workflow(other),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Registry(RegistryError::Store(err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

fn registry_status(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::FlightNotFound(_)
        | RegistryError::PassengerNotFound(_)
        | RegistryError::BagNotFound(_)
        | RegistryError::StaffNotFound(_) => StatusCode::NOT_FOUND,

        RegistryError::DuplicateFlightNumber(_)
        | RegistryError::DuplicatePassengerId(_)
        | RegistryError::DuplicateTicketNumber(_)
        | RegistryError::DuplicateBagId(_)
        | RegistryError::GateOccupied(_)
        | RegistryError::InvalidTransition { .. }
        | RegistryError::InvalidFlightTransition { .. }
        | RegistryError::InvalidBagTransition { .. }
        | RegistryError::FlightHasPassengers(_)
        | RegistryError::BagsNotReady(_)
        | RegistryError::SecurityViolationPending(_)
        | RegistryError::PassengerNotBoarded(_)
        | RegistryError::PassengerNotCheckedIn(_)
        | RegistryError::AdminNotRemovable => StatusCode::CONFLICT,

        RegistryError::ScopeViolation => StatusCode::FORBIDDEN,
        RegistryError::InvalidCredentials => StatusCode::UNAUTHORIZED,

        RegistryError::InvalidId(_) | RegistryError::AirlineScopeRequired(_) => {
            StatusCode::BAD_REQUEST
        }

        RegistryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Registry(err) => {
                let status = registry_status(&err);
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("Internal Server Error: {}", err);
                    (status, "Internal Server Error".to_string())
                } else {
                    (status, err.to_string())
                }
            }
            AppError::Workflow(err) => {
                let status = match &err {
                    WorkflowError::MessageNotFound { .. } => StatusCode::NOT_FOUND,
                    WorkflowError::UnexpectedPayload { .. }
                    | WorkflowError::PassengerStillHasBags(_) => StatusCode::CONFLICT,
                    WorkflowError::Registry(inner) => registry_status(inner),
                    WorkflowError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("Internal Server Error: {}", err);
                    (status, "Internal Server Error".to_string())
                } else {
                    (status, err.to_string())
                }
            }
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
