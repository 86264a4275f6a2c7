//! Response bodies shaped like the Patient Access API.

use serde_json::{Value, json};

/// Successful sign-in envelope carrying `token` and an absolute `expires_in` timestamp.
#[must_use]
pub fn signin_envelope(token: &str, expires_in: &str) -> Value {
    json!({
        "accessToken": {
            "access_token": token,
            "expires_in": expires_in,
        }
    })
}

/// Sign-in envelope returned for rejected credentials.
#[must_use]
pub fn rejected_envelope() -> Value {
    json!({ "accessToken": null })
}

/// Appointment hierarchy body with one slot per `(id, name)` pair.
///
/// Each record also carries the status and default flags the server sends so
/// decoders are exercised against fields they must ignore.
#[must_use]
pub fn hierarchy_body(slots: &[(&str, &str)]) -> Value {
    let slots: Vec<Value> = slots
        .iter()
        .enumerate()
        .map(|(index, (id, name))| {
            json!({
                "slotType": {
                    "id": id,
                    "name": name,
                    "status": "Active",
                    "isDefault": index == 0,
                },
                "sessionHolders": [],
            })
        })
        .collect();
    json!({ "slots": slots })
}
