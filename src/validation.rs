use crate::error::AppError;
use crate::models::TeacherPayload;
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::Serialize;
use std::collections::HashMap;
use tracing::instrument;
use validator::{Validate, ValidationError};

pub static EMPLOYEE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^T\d{3}$").expect("employee number pattern is valid"));

pub fn hire_date_not_future(hire_date: &NaiveDate) -> Result<(), ValidationError> {
    if *hire_date > Utc::now().date_naive() {
        let mut err = ValidationError::new("hire_date_in_future");
        err.message = Some("Hire date cannot be in the future".into());
        return Err(err);
    }
    Ok(())
}

/// The one entry point for teacher validation. The data layer calls this
/// before create and update touch the database, so handlers never need to
/// repeat the checks.
pub fn validate_teacher(teacher: &TeacherPayload) -> Result<(), AppError> {
    teacher.validate().map_err(|errors| {
        let mut parts: Vec<String> = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .clone()
                    .unwrap_or_else(|| "Invalid value".into());
                parts.push(format!("{}: {}", field, message));
            }
        }
        parts.sort();
        AppError::Validation(parts.join("; "))
    })
}

#[derive(Debug, Serialize, Clone)]
pub struct ValidationResponse {
    pub status: &'static str,
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationResponse {
    pub fn new(errors: HashMap<String, Vec<String>>) -> Self {
        Self {
            status: "error",
            errors,
        }
    }

    pub fn with_error(field: &str, message: &str) -> Self {
        let mut errors = HashMap::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        Self::new(errors)
    }
}

pub trait ToValidationResponse {
    fn to_validation_response(self) -> Custom<Json<ValidationResponse>>;
}

impl ToValidationResponse for AppError {
    #[instrument]
    fn to_validation_response(self) -> Custom<Json<ValidationResponse>> {
        self.log_and_record("API error response");
        let status = self.status_code();

        let (field, message) = match &self {
            AppError::Database(db_err) => ("database", format!("Database error: {}", db_err)),
            AppError::Validation(msg) => ("validation", msg.clone()),
            AppError::NotFound(msg) => ("resource", format!("Not found: {}", msg)),
            AppError::Config(msg) => ("config", format!("Configuration error: {}", msg)),
            AppError::Internal(_) => ("server", "Internal server error".to_string()),
        };

        Custom(status, Json(ValidationResponse::with_error(field, &message)))
    }
}

/// Convenience for handlers that bail with a bare status instead of an
/// application error.
impl ToValidationResponse for Status {
    #[instrument]
    fn to_validation_response(self) -> Custom<Json<ValidationResponse>> {
        let (field, message) = match self {
            s if s == Status::NotFound => ("resource", "Resource not found"),
            s if s == Status::BadRequest => ("request", "Bad request"),
            s if s == Status::UnprocessableEntity => ("validation", "Validation failed"),
            s if s == Status::InternalServerError => ("server", "Internal server error"),
            _ => ("error", "An error occurred"),
        };

        Custom(self, Json(ValidationResponse::with_error(field, message)))
    }
}
