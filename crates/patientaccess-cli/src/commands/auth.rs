use crate::cli::{OutputFormat, SigninArgs};
use crate::client::{AppContext, CliResult, resolve_credentials};
use crate::output::render_token;

pub(crate) async fn handle_signin(
    ctx: &AppContext,
    args: SigninArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let credentials = resolve_credentials(&args.credentials)?;
    let token = ctx
        .client
        .sign_in(&credentials.username, &credentials.password)
        .await?;
    if token.is_expired() {
        tracing::warn!(expires_in = token.expires_in, "server issued an already expired token");
    }
    render_token(&token, format)
}
