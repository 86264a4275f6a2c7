use crate::cli::{OutputFormat, SlotsArgs};
use crate::client::{AppContext, CliResult, resolve_credentials};
use crate::output::render_slots;

pub(crate) async fn handle_slots(
    ctx: &AppContext,
    args: SlotsArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let supplied = args
        .token
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    let token = match supplied {
        Some(token) => token,
        None => {
            let credentials = resolve_credentials(&args.credentials)?;
            ctx.client
                .sign_in(&credentials.username, &credentials.password)
                .await?
                .token
        }
    };

    let patient_id = args.patient_id.to_string();
    let slots = ctx.client.appointment_slots(&token, &patient_id).await?;
    render_slots(&slots, format)
}
