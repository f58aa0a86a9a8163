//! Student records web application.
//!
//! Hexagonal layout: `domain` holds the record and account model with the
//! services behind the driving ports, `inbound` the Actix Web pages,
//! `outbound` the Diesel and in-memory repositories, and `server` the
//! wiring used by the binary and the integration tests.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;
