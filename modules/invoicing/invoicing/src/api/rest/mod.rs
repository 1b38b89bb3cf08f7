//! REST surface of the invoicing module.
//!
//! `dto` carries the wire representations, `error` maps `DomainError` to
//! RFC 9457 problems, `handlers` hold the axum endpoints and `routes`
//! assembles the router plus the OpenAPI document.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
