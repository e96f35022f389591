//! `GET /installation/repositories`, a debugging aid.

// self
use crate::{
	_prelude::*,
	auth::{InstallationToken, RepositorySummary},
	client::{self, AppClient},
	http::{ApiMethod, ApiRequest, ApiTransport, Authorization},
	obs::{self, StatusClass, Step, StepOutcome, StepSpan},
};

const ENDPOINT: &str = "installation_repositories";

#[derive(Deserialize)]
struct RepositoriesBody {
	repositories: Vec<RepositorySummary>,
}

impl<C> AppClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Lists the repositories `token` can reach (first page only).
	pub async fn list_installation_repositories(
		&self,
		token: &InstallationToken,
	) -> Result<Vec<RepositorySummary>> {
		const STEP: Step = Step::ListRepositories;

		let span = StepSpan::new(STEP, "list_installation_repositories");

		obs::record_step_outcome(STEP, StepOutcome::Attempt, StatusClass::NoResponse);

		let result = span
			.instrument(async {
				let url = self.endpoint(&["installation", "repositories"])?;
				let request =
					ApiRequest::new(ApiMethod::Get, url, Authorization::Token(token.token.clone()));
				let response = self.execute(request).await?;

				span.record_status(response.status);

				let body: RepositoriesBody = client::decode_response(ENDPOINT, 200, response)?;

				Ok(body.repositories)
			})
			.await;

		obs::record_step_result(STEP, &result, Some(200));

		result
	}
}
