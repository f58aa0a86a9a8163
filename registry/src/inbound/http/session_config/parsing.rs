//! Parsing helpers for the session toggles.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError};

const FLAG_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Value assumed by debug builds when a toggle is absent or malformed.
pub(super) struct Fallback<T> {
    value: T,
}

impl<T: Copy + std::fmt::Debug> Fallback<T> {
    pub(super) const fn new(value: T) -> Self {
        Self { value }
    }

    /// Debug builds take the fallback; release builds fail with `error`.
    fn apply(self, mode: BuildMode, error: SessionConfigError) -> Result<T, SessionConfigError> {
        if mode.is_debug() {
            warn!(%error, fallback = ?self.value, "using session default");
            Ok(self.value)
        } else {
            Err(error)
        }
    }
}

pub(super) fn parse_flag<E: Env>(
    env: &E,
    name: &'static str,
    mode: BuildMode,
    fallback: Fallback<bool>,
) -> Result<bool, SessionConfigError> {
    let Some(raw) = env.string(name) else {
        return fallback.apply(mode, SessionConfigError::MissingEnv { name });
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        _ => fallback.apply(
            mode,
            SessionConfigError::InvalidEnv {
                name,
                value: raw,
                expected: FLAG_EXPECTED,
            },
        ),
    }
}

pub(super) fn parse_same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let fallback = Fallback::new(if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    });
    let Some(raw) = env.string(SAMESITE_ENV) else {
        return fallback.apply(mode, SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SESSION_SAMESITE=None without a secure cookie; browsers may drop it");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ => fallback.apply(
            mode,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: raw,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}
