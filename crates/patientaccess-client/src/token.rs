//! Access tokens issued by the sign-in endpoint.
//!
//! The server reports expiry as an absolute instant under the misleading
//! `expires_in` name. Decoding turns it into seconds remaining relative to
//! the decode instant so callers get a countdown rather than a timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Bearer credential plus its remaining lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    /// Opaque bearer token.
    pub token: String,
    /// Seconds until expiry at decode time; non-positive means expired.
    pub expires_in: i64,
}

impl AccessToken {
    /// Map a wire token into an [`AccessToken`] relative to `now`.
    ///
    /// An absent expiry yields a lifetime of zero, so the token reads as
    /// already expired.
    ///
    /// # Errors
    ///
    /// - [`ClientError::ExpiryTimestamp`] when the expiry is present but not
    ///   RFC 3339; checked before the token itself.
    /// - [`ClientError::BadCredentials`] when the token is empty or absent.
    pub fn decode(wire: WireAccessToken, now: DateTime<Utc>) -> ClientResult<Self> {
        let expires_in = match wire.expires_in {
            Some(raw_expiry) => DateTime::parse_from_rfc3339(&raw_expiry)
                .map_err(|source| ClientError::ExpiryTimestamp {
                    value: raw_expiry.clone(),
                    source,
                })?
                .with_timezone(&Utc)
                .signed_duration_since(now)
                .num_seconds(),
            None => 0,
        };
        let token = wire
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or(ClientError::BadCredentials)?;

        Ok(Self { token, expires_in })
    }

    /// Whether the token had already lapsed when it was decoded.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expires_in <= 0
    }
}

/// Token object exactly as the sign-in endpoint returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireAccessToken {
    /// Bearer token; empty or missing on rejected credentials.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Absolute expiry instant in RFC 3339 form.
    #[serde(default)]
    pub expires_in: Option<String>,
}

/// Sign-in response wrapper around the token object.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AuthEnvelope {
    #[serde(rename = "accessToken", default)]
    pub(crate) access_token: Option<WireAccessToken>,
}

impl AuthEnvelope {
    pub(crate) fn into_token(self, now: DateTime<Utc>) -> ClientResult<AccessToken> {
        let wire = self.access_token.ok_or(ClientError::BadCredentials)?;
        AccessToken::decode(wire, now)
    }
}

/// Sign-in request body.
#[derive(Serialize)]
pub(crate) struct Credentials<'a> {
    pub(crate) username: &'a str,
    pub(crate) password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use patientaccess_test_support::fixtures::{SAMPLE_TOKEN, expiry_from_now, server_timestamp};

    fn wire(token: Option<&str>, expires_in: Option<String>) -> WireAccessToken {
        WireAccessToken {
            access_token: token.map(str::to_string),
            expires_in,
        }
    }

    #[test]
    fn expiry_five_minutes_out_counts_down_from_three_hundred() -> ClientResult<()> {
        let decoded = AccessToken::decode(
            wire(Some(SAMPLE_TOKEN), Some(expiry_from_now(Duration::minutes(5)))),
            Utc::now(),
        )?;
        assert_eq!(decoded.token, SAMPLE_TOKEN);
        assert!(
            (299..=300).contains(&decoded.expires_in),
            "unexpected remaining lifetime {}",
            decoded.expires_in
        );
        assert!(!decoded.is_expired());
        Ok(())
    }

    #[test]
    fn decode_is_relative_to_supplied_instant() -> ClientResult<()> {
        let now = Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid instant");
        let decoded = AccessToken::decode(
            wire(Some("t"), Some("2024-03-01T12:10:00.500000Z".to_string())),
            now,
        )?;
        assert_eq!(decoded.expires_in, 600);
        Ok(())
    }

    #[test]
    fn past_expiry_yields_negative_lifetime() -> ClientResult<()> {
        let now = Utc::now();
        let decoded = AccessToken::decode(
            wire(
                Some("t"),
                Some(server_timestamp(now - Duration::seconds(90))),
            ),
            now,
        )?;
        assert_eq!(decoded.expires_in, -90);
        assert!(decoded.is_expired());
        Ok(())
    }

    #[test]
    fn empty_or_missing_token_is_bad_credentials() {
        let expiry = Some(expiry_from_now(Duration::minutes(5)));
        for candidate in [wire(Some(""), expiry.clone()), wire(None, expiry)] {
            let err = AccessToken::decode(candidate, Utc::now()).expect_err("must fail");
            assert!(matches!(err, ClientError::BadCredentials));
        }
    }

    #[test]
    fn malformed_expiry_is_a_decoding_error() {
        let err = AccessToken::decode(wire(Some("t"), Some("tomorrow".into())), Utc::now())
            .expect_err("must fail");
        assert!(matches!(err, ClientError::ExpiryTimestamp { .. }));
        assert!(err.is_decoding());
    }

    #[test]
    fn malformed_expiry_wins_over_empty_token() -> anyhow::Result<()> {
        let envelope: AuthEnvelope = serde_json::from_str(
            r#"{"accessToken": {"access_token": "", "expires_in": "garbage"}}"#,
        )?;
        let err = envelope.into_token(Utc::now()).expect_err("must fail");
        assert!(err.is_decoding(), "{err:?}");
        Ok(())
    }

    #[test]
    fn absent_or_null_expiry_is_already_expired() -> anyhow::Result<()> {
        for body in [
            r#"{"accessToken": {"access_token": "abc"}}"#,
            r#"{"accessToken": {"access_token": "abc", "expires_in": null}}"#,
        ] {
            let envelope: AuthEnvelope = serde_json::from_str(body)?;
            let decoded = envelope.into_token(Utc::now())?;
            assert_eq!(decoded.token, "abc");
            assert_eq!(decoded.expires_in, 0);
            assert!(decoded.is_expired());
        }
        Ok(())
    }

    #[test]
    fn null_envelope_is_bad_credentials() -> anyhow::Result<()> {
        let envelope: AuthEnvelope = serde_json::from_str(r#"{"accessToken": null}"#)?;
        let err = envelope.into_token(Utc::now()).expect_err("must fail");
        assert!(matches!(err, ClientError::BadCredentials));
        Ok(())
    }

    #[test]
    fn credentials_serialise_as_flat_object() -> anyhow::Result<()> {
        let body = serde_json::to_value(Credentials {
            username: "roman",
            password: "sikr3t",
        })?;
        assert_eq!(
            body,
            serde_json::json!({"username": "roman", "password": "sikr3t"})
        );
        Ok(())
    }
}
