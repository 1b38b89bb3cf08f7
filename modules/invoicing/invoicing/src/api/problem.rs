//! RFC 9457 problem details, the only error body this API emits.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Media type of every error response.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// `StatusCode` as the bare u16 the RFC prescribes for the `status` member.
#[allow(clippy::trivially_copy_pass_by_ref)] // serde `with` requires &T
mod status_code_u16 {
    use http::StatusCode;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u16(status.as_u16())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<StatusCode, D::Error> {
        let code = u16::deserialize(d)?;
        StatusCode::from_u16(code).map_err(serde::de::Error::custom)
    }
}

/// An RFC 9457 problem document.
///
/// `code` is the stable machine-readable discriminator clients switch on;
/// `title`/`detail` are for humans and may be reworded freely.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    title = "Problem",
    description = "RFC 9457 Problem Details for HTTP APIs"
)]
#[must_use]
pub struct Problem {
    /// Problem type URI; `about:blank` when the status says it all.
    #[serde(rename = "type")]
    pub type_url: String,
    /// Short human-readable summary of the problem type.
    pub title: String,
    /// HTTP status of this occurrence, on the wire as a number.
    #[serde(with = "status_code_u16")]
    #[schema(value_type = u16)]
    pub status: StatusCode,
    /// Human-readable explanation of this occurrence.
    pub detail: String,
    /// Request path the problem occurred on.
    pub instance: String,
    /// Stable machine-readable error code.
    pub code: String,
    /// Correlates the response with server-side trace spans.
    pub trace_id: Option<String>,
    /// Per-field violations, present on validation problems.
    pub errors: Option<Vec<ValidationViolation>>,
}

/// One field-level violation inside a validation problem.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "ValidationViolation")]
pub struct ValidationViolation {
    /// Field path, e.g. "email" or "invoiceItemList[2].quantity"
    pub field: String,
    /// What the field failed to satisfy
    pub message: String,
    /// Optional machine-readable code for this violation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
            errors: None,
        }
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<ValidationViolation>) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl axum::response::IntoResponse for Problem {
    fn into_response(self) -> axum::response::Response {
        let status = self.status;
        (
            status,
            [(http::header::CONTENT_TYPE, APPLICATION_PROBLEM_JSON)],
            axum::Json(self),
        )
            .into_response()
    }
}
