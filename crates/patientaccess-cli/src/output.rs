//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use patientaccess_client::{AccessToken, AppointmentSlot};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_token(token: &AccessToken, format: OutputFormat) -> CliResult<()> {
    println!("{}", format_token(token, format)?);
    Ok(())
}

pub(crate) fn render_slots(slots: &[AppointmentSlot], format: OutputFormat) -> CliResult<()> {
    println!("{}", format_slots(slots, format)?);
    Ok(())
}

pub(crate) fn format_token(token: &AccessToken, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_pretty_json(token),
        OutputFormat::Table => {
            let mut text = format!("access_token: {}\n", token.token);
            let _ = write!(text, "expires_in: {}", format_lifetime(token.expires_in));
            if token.is_expired() {
                text.push_str(" (expired)");
            }
            Ok(text)
        }
    }
}

pub(crate) fn format_slots(slots: &[AppointmentSlot], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_pretty_json(slots),
        OutputFormat::Table => {
            let mut text = format!("{:<12} NAME", "ID");
            for slot in slots {
                let _ = write!(text, "\n{:<12} {}", slot.slot_type.id, slot.slot_type.name);
            }
            if slots.is_empty() {
                text.push_str("\n(no appointment slots)");
            }
            Ok(text)
        }
    }
}

#[must_use]
pub(crate) fn format_lifetime(seconds: i64) -> String {
    let magnitude = seconds.unsigned_abs();
    let (minutes, secs) = (magnitude / 60, magnitude % 60);
    let sign = if seconds < 0 { "-" } else { "" };
    if minutes == 0 {
        format!("{sign}{secs}s")
    } else {
        format!("{sign}{minutes}m{secs:02}s")
    }
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}
