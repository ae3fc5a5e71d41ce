//! Login placeholder.

/// POST /login - Accept any body and report success.
///
/// No authentication happens here; callers pass their upstream credentials
/// as headers on every guarded request instead.
pub async fn login() -> &'static str {
    "Logged in!"
}
