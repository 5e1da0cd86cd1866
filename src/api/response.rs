//! Response types for the payroll API.
//!
//! This module defines the error response structures and the mapping from
//! engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, RateViolation};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Every problem found in a rejected rate table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<RateViolation>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            violations: Vec::new(),
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates the response for an empty rate-table history.
    pub fn no_rate_table() -> Self {
        Self::with_details(
            "RATE_TABLE_NOT_FOUND",
            "No rate table is configured",
            "Save a rate table through PUT /settings/rates",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { path } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            ),
            EngineError::ConfigParseError { path, message } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            ),
            EngineError::InvalidRateTable { violations } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError {
                    violations,
                    ..ApiError::with_details(
                        "INVALID_RATE_TABLE",
                        message,
                        "No payroll can be computed until the rate table is corrected",
                    )
                },
            ),
            EngineError::RateTableNotFound { period } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::with_details(
                    "RATE_TABLE_NOT_FOUND",
                    message,
                    format!("No configured rate table covers {}", period),
                ),
            ),
            EngineError::InvalidPeriod { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PERIOD", message),
            ),
            EngineError::InvalidInput {
                employee_id, field, ..
            } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_INPUT",
                    message,
                    format!("Employee '{}', field '{}'", employee_id, field),
                ),
            ),
            EngineError::AmountOverflow { field } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_INPUT",
                    message,
                    format!("Field '{}'", field),
                ),
            ),
            EngineError::DuplicatePeriod { employee_ids, .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "DUPLICATE_PERIOD",
                    message,
                    format!("Already processed: {}", employee_ids.join(", ")),
                ),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
        assert!(!json.contains("violations"));
    }

    #[test]
    fn test_invalid_rate_table_is_unprocessable_with_every_violation() {
        let engine_error = EngineError::InvalidRateTable {
            violations: vec![
                RateViolation::new("pension.employee", "must be between 0 and 1"),
                RateViolation::new("tax_brackets", "must not be empty"),
            ],
        };
        let response: ApiErrorResponse = engine_error.into();

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.error.code, "INVALID_RATE_TABLE");
        assert_eq!(response.error.violations.len(), 2);
        assert_eq!(response.error.violations[1].field, "tax_brackets");
    }

    #[test]
    fn test_duplicate_period_is_conflict() {
        let engine_error = EngineError::DuplicatePeriod {
            period: "January 2025".to_string(),
            employee_ids: vec!["emp_001".to_string(), "emp_002".to_string()],
        };
        let response: ApiErrorResponse = engine_error.into();

        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "DUPLICATE_PERIOD");
        assert_eq!(
            response.error.details.as_deref(),
            Some("Already processed: emp_001, emp_002")
        );
    }

    #[test]
    fn test_invalid_input_is_bad_request() {
        let engine_error = EngineError::InvalidInput {
            employee_id: "emp_009".to_string(),
            field: "base_salary".to_string(),
            message: "must be greater than 0 (got 0)".to_string(),
        };
        let response: ApiErrorResponse = engine_error.into();

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_INPUT");
        assert!(response.error.details.unwrap().contains("base_salary"));
    }

    #[test]
    fn test_amount_overflow_is_bad_request() {
        let response: ApiErrorResponse = EngineError::AmountOverflow {
            field: "overtime.weekday_hours".to_string(),
        }
        .into();

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_INPUT");
        assert_eq!(
            response.error.details.as_deref(),
            Some("Field 'overtime.weekday_hours'")
        );
    }

    #[test]
    fn test_missing_rate_table_is_not_found() {
        let response: ApiErrorResponse = EngineError::RateTableNotFound {
            period: "March 1999".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
