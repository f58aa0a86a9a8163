//! HTTP inbound adapter serving the HTML pages.

pub mod accounts;
pub mod error;
pub mod forms;
pub mod health;
pub mod pages;
pub mod session;
pub mod session_config;
pub mod state;
pub mod students;
#[cfg(test)]
pub mod test_utils;

pub use error::PageResult;
