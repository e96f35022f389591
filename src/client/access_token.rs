//! `POST /app/installations/{installation_id}/access_tokens`.

// self
use crate::{
	_prelude::*,
	auth::{InstallationRef, InstallationToken, SignedAssertion},
	client::{self, AppClient},
	error::UpstreamError,
	http::{ApiMethod, ApiRequest, ApiTransport, Authorization},
	obs::{self, StatusClass, Step, StepOutcome, StepSpan},
};

const ENDPOINT: &str = "create_access_token";
const CREATED: u16 = 201;

impl<C> AppClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Exchanges an app assertion for an access token scoped to `installation`.
	///
	/// GitHub must answer `201` with a non-blank `token`; a blank one is reported as
	/// [`UpstreamError::EmptyToken`] and never returned.
	pub async fn get_access_token(
		&self,
		assertion: &SignedAssertion,
		installation: &InstallationRef,
	) -> Result<InstallationToken> {
		const STEP: Step = Step::CreateAccessToken;

		let span = StepSpan::new(STEP, "get_access_token");

		obs::record_step_outcome(STEP, StepOutcome::Attempt, StatusClass::NoResponse);

		span.record_installation(installation);

		let result = span
			.instrument(async {
				let id = installation.id.to_string();
				let url = self.endpoint(&["app", "installations", &id, "access_tokens"])?;
				let request = ApiRequest::new(
					ApiMethod::Post,
					url,
					Authorization::Bearer(assertion.token().clone()),
				);
				let response = self.execute(request).await?;

				span.record_status(response.status);

				let token: InstallationToken =
					client::decode_response(ENDPOINT, CREATED, response)?;

				if token.token.is_blank() {
					return Err(UpstreamError::EmptyToken { status: CREATED }.into());
				}

				#[cfg(feature = "tracing")]
				tracing::debug!(expires_at = ?token.expires_at, "issued installation token");

				Ok(token)
			})
			.await;

		obs::record_step_result(STEP, &result, Some(CREATED));

		result
	}
}
