//! `/health/ready` and `/health/live` probes.
//!
//! Readiness turns on once the listener is bound; liveness turns off when a
//! shutdown signal arrives so load balancers stop routing before workers exit.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{HttpResponse, get, web};

/// Which flag a probe reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Ready,
    Live,
}

/// Probe flags shared by every worker.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Live but not yet ready.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }

    /// Start accepting readiness checks.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness while the server drains.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Readiness flag.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.flag(Probe::Ready)
    }

    /// Liveness flag.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.flag(Probe::Live)
    }

    fn flag(&self, probe: Probe) -> bool {
        let cell = match probe {
            Probe::Ready => &self.ready,
            Probe::Live => &self.live,
        };
        cell.load(Ordering::Acquire)
    }

    fn respond(&self, probe: Probe) -> HttpResponse {
        let mut builder = if self.flag(probe) {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        builder
            .insert_header(CacheControl(vec![CacheDirective::NoStore]))
            .finish()
    }
}

/// 200 once the listener is bound, 503 before.
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.respond(Probe::Ready)
}

/// 200 until shutdown begins, 503 after.
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.respond(Probe::Live)
}
