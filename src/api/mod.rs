//! HTTP route handlers.
//!
//! Upstream payloads are passed through to the client with their records
//! normalized; failures are rendered by [`crate::errors::AppError`].

mod image;
mod login;
mod posts;
mod tags;

pub use image::*;
pub use login::*;
pub use posts::*;
pub use tags::*;

use std::fmt::Display;
use std::str::FromStr;

use crate::errors::AppError;

/// Result type returned by every handler.
pub type ApiResult<T> = Result<T, AppError>;

/// Treat a present-but-blank query value as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an optional raw parameter; blank counts as absent.
fn parse_param<T>(name: &str, value: Option<String>) -> ApiResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    non_empty(value)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| AppError::BadRequest(format!("Invalid {}: {:?}: {}", name, raw, e)))
        })
        .transpose()
}
