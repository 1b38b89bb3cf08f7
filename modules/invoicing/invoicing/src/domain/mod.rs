pub mod calc;
pub mod error;
pub mod repo;
pub mod service;


pub use error::DomainError;
pub use service::InvoicingService;
