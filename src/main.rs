//! GitHub Actions entry point: read the App inputs, issue an installation token, mask it, and
//! publish it as the `app_token` step output.

// std
use std::{io, time::Duration as StdDuration};
// crates.io
use color_eyre::{Result, eyre::WrapErr};
use tracing_subscriber::EnvFilter;
// self
use github_app_token::{
	actions::{ActionsOutput, OUTPUT_NAME},
	auth::InstallationToken,
	client::{ReqwestAppClient, RetryPolicy},
	config::AppConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.with_writer(io::stderr)
		.init();

	let config = AppConfig::from_env().wrap_err("Failed to load the action inputs.")?;
	let client = ReqwestAppClient::from_config(&config)?;

	tracing::info!(
		repository = %config.repository,
		api_base = %config.api_base,
		"issuing installation token"
	);

	let token = issue_with_retry(&client, &config, RetryPolicy::default()).await?;

	tracing::info!(expires_at = ?token.expires_at, "installation token issued");

	ActionsOutput::from_env()
		.publish_secret(OUTPUT_NAME, &token.token, &mut io::stdout().lock())
		.wrap_err("Failed to publish the installation token.")?;

	Ok(())
}

async fn issue_with_retry(
	client: &ReqwestAppClient,
	config: &AppConfig,
	policy: RetryPolicy,
) -> Result<InstallationToken> {
	let mut attempt = 1;

	loop {
		match client.issue_repository_token(&config.credential, &config.repository).await {
			Ok(token) => return Ok(token),
			Err(e) => match policy.next_delay(attempt, &e) {
				Some(delay) => {
					tracing::warn!(attempt, error = %e, ?delay, "transient failure, retrying");
					tokio::time::sleep(StdDuration::try_from(delay).unwrap_or_default()).await;

					attempt += 1;
				},
				None => return Err(e).wrap_err("Failed to issue an installation access token."),
			},
		}
	}
}
