use serde::Serialize;
use stockpulse_core::{AuthRequest, Registration, StockApiClient};
use tracing::info;

use crate::cli::{AuthArgs, RegisterArgs};
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct AuthResponseData {
    access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_in: Option<i64>,
    env: &'static str,
}

pub async fn register(args: &RegisterArgs, client: &StockApiClient) -> Result<CommandResult, CliError> {
    let registration = Registration {
        company_name: args.company_name.clone(),
        owner_name: args.owner_name.clone(),
        roll_no: args.roll_no.clone(),
        owner_email: args.owner_email.clone(),
        access_code: args.access_code.clone(),
    };

    let credentials = client.register(&registration).await?;
    info!(company = %registration.company_name, "registered with price feed");

    let data = serde_json::to_value(&credentials)?;
    Ok(CommandResult::ok(data).with_warning(
        "store the client secret now; the feed will not show it again",
    ))
}

pub async fn authenticate(args: &AuthArgs, client: &StockApiClient) -> Result<CommandResult, CliError> {
    if args.client_id.trim().is_empty() || args.client_secret.trim().is_empty() {
        return Err(CliError::Command(String::from(
            "client id and client secret must not be empty",
        )));
    }

    let request = AuthRequest {
        client_id: args.client_id.clone(),
        client_secret: args.client_secret.clone(),
        company_name: args.company_name.clone(),
    };

    let token = client.authenticate(&request).await?;
    info!("obtained access token");

    let data = serde_json::to_value(AuthResponseData {
        access_token: token.access_token,
        token_type: token.token_type,
        expires_in: token.expires_in,
        env: "STOCKPULSE_TOKEN",
    })?;
    Ok(CommandResult::ok(data))
}
