use http::StatusCode;

use crate::api::problem::{Problem, ValidationViolation};
use crate::domain::error::DomainError;

/// Map a domain error to an RFC 9457 Problem.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    // Extract trace ID from current tracing span if available
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());

    let problem = match e {
        DomainError::Validation { field, message } => Problem::new(
            StatusCode::BAD_REQUEST,
            "Validation Failed",
            "Input validation errors",
        )
        .with_code("VALIDATION_FAILED")
        .with_errors(vec![ValidationViolation {
            field: field.clone(),
            message: message.clone(),
            code: None,
        }]),
        DomainError::EmailTaken { email } => Problem::new(
            StatusCode::CONFLICT,
            "Email Already In Use",
            format!("Email '{email}' is already in use"),
        )
        .with_code("EMAIL_TAKEN"),
        DomainError::UnknownCustomer { customer_id } => Problem::new(
            StatusCode::CONFLICT,
            "Unknown Customer",
            format!("Customer with id {customer_id} does not exist"),
        )
        .with_code("UNKNOWN_CUSTOMER"),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Error",
                "An internal database error occurred",
            )
            .with_code("INTERNAL_DATABASE")
        }
    };

    let problem = problem.with_instance(instance);
    match trace_id {
        Some(id) => problem.with_trace_id(id),
        None => problem,
    }
}
