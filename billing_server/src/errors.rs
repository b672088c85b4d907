use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use billing_engine::BillingError;
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Invalid request. {0}")]
    ValidationError(String),
    #[error("The request conflicts with the current state of the resource. {0}")]
    Conflict(String),
    #[error("The stored data is inconsistent. {0}")]
    IntegrityError(String),
    #[error("Unauthorized. {0}")]
    Unauthorized(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IntegrityError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<BillingError> for ServerError {
    fn from(e: BillingError) -> Self {
        match e {
            BillingError::ProductNotFound(_) | BillingError::OrderNotFound(_) | BillingError::PaymentNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            BillingError::ValidationError(msg) => Self::ValidationError(msg),
            BillingError::ModificationNoOp => Self::ValidationError(e.to_string()),
            BillingError::OrderModificationForbidden(_, _) => Self::Conflict(e.to_string()),
            BillingError::IntegrityError(_) | BillingError::ArithmeticOverflow(_) => {
                error!("💻️ {e}");
                Self::IntegrityError(e.to_string())
            },
            BillingError::DatabaseError(_) => {
                error!("💻️ {e}");
                Self::BackendError(e.to_string())
            },
        }
    }
}
