//! `GET /repos/{owner}/{repo}/installation`.

// self
use crate::{
	_prelude::*,
	auth::{InstallationRef, RepositoryRef, SignedAssertion},
	client::{self, AppClient},
	http::{ApiMethod, ApiRequest, ApiTransport, Authorization},
	obs::{self, StatusClass, Step, StepOutcome, StepSpan},
};

const ENDPOINT: &str = "repository_installation";

#[derive(Deserialize)]
struct InstallationBody {
	id: u64,
}

impl<C> AppClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Finds the installation of the App on `owner_repo`.
	///
	/// `owner_repo` must read `owner/name`; anything else fails with
	/// [`ConfigError::InvalidRepository`](crate::error::ConfigError::InvalidRepository) before a
	/// request is sent. GitHub must answer `200` with an `id`.
	pub async fn resolve_installation_id(
		&self,
		assertion: &SignedAssertion,
		owner_repo: &str,
	) -> Result<InstallationRef> {
		let repository = RepositoryRef::parse(owner_repo)?;

		self.resolve_repository_installation(assertion, &repository).await
	}

	/// Same as [`resolve_installation_id`](Self::resolve_installation_id) for a parsed
	/// repository.
	pub async fn resolve_repository_installation(
		&self,
		assertion: &SignedAssertion,
		repository: &RepositoryRef,
	) -> Result<InstallationRef> {
		const STEP: Step = Step::ResolveInstallation;

		let span = StepSpan::new(STEP, "resolve_repository_installation");

		obs::record_step_outcome(STEP, StepOutcome::Attempt, StatusClass::NoResponse);

		span.record_repository(repository);

		let result = span
			.instrument(async {
				let url =
					self.endpoint(&["repos", repository.owner(), repository.name(), "installation"])?;
				let request = ApiRequest::new(
					ApiMethod::Get,
					url,
					Authorization::Bearer(assertion.token().clone()),
				);
				let response = self.execute(request).await?;

				span.record_status(response.status);

				let body: InstallationBody = client::decode_response(ENDPOINT, 200, response)?;
				let installation = InstallationRef::new(body.id);

				span.record_installation(&installation);

				#[cfg(feature = "tracing")]
				tracing::debug!("resolved installation");

				Ok(installation)
			})
			.await;

		obs::record_step_result(STEP, &result, Some(200));

		result
	}
}
