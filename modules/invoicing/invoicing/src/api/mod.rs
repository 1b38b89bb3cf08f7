//! API layer - transport DTOs, Problem mapping and route wiring.

pub mod problem;
pub mod rest;
