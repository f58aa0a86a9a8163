//! Actix middleware shared by every route.
//!
//! Only request correlation lives here; sessions come from `actix-session`.

pub mod trace;

pub use trace::Trace;
