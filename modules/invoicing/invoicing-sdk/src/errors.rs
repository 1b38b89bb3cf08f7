//! Public error types for the invoicing HTTP client.

use thiserror::Error;

/// Errors that can be returned by [`InvoicingClient`](crate::client::InvoicingClient).
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure: connect, timeout, or body read/decode.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a status the operation does not expect.
    /// `code` carries the machine-readable error code from the problem
    /// body when one was present.
    #[error("unexpected status {status} ({code})")]
    UnexpectedStatus {
        status: u16,
        code: String,
        detail: Option<String>,
    },

    /// A created resource response did not carry a parsable `Location` header.
    #[error("missing or malformed Location header")]
    BadLocation,

    /// A response value could not be converted to its contract type.
    #[error("decode error: {message}")]
    Decode { message: String },
}

impl ClientError {
    /// Create an `UnexpectedStatus` error.
    pub fn unexpected(status: u16, code: impl Into<String>, detail: Option<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            code: code.into(),
            detail,
        }
    }

    /// Create a Decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}
