//! Sample identifiers and timestamp helpers matching the server's wire format.

use chrono::{DateTime, Duration, Utc};

/// Bearer token used by the sign-in fixtures.
pub const SAMPLE_TOKEN: &str = "28d5cf150df203a0002f48395e380dff";

/// Patient identifier used by the appointment fixtures.
pub const SAMPLE_PATIENT_ID: &str = "0b8c5e7e-3f5d-4d0c-9a63-3a2f1c7e5b11";

/// Username/password pair submitted by sign-in tests.
pub const SAMPLE_USERNAME: &str = "roman";
/// Password paired with [`SAMPLE_USERNAME`].
pub const SAMPLE_PASSWORD: &str = "sikr3t";

/// Render an instant the way the sign-in endpoint does: microsecond fraction, `Z` suffix.
#[must_use]
pub fn server_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Server timestamp `offset` away from the current instant.
#[must_use]
pub fn expiry_from_now(offset: Duration) -> String {
    server_timestamp(Utc::now() + offset)
}
