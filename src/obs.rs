//! Optional observability helpers for token issuance.
//!
//! # Feature Flags
//!
//! - `tracing`: every step runs in a `github_app_token.step` span with `step` and `stage`
//!   fields. `status`, `installation_id` and `repository` are recorded once known.
//! - `metrics`: `github_app_token_step_total` counts attempts and terminal outcomes, labeled by
//!   `step`, `outcome` and the `status_class` of GitHub's answer.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Steps of the issuance flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
	/// RS256 app assertion signing.
	Sign,
	/// `GET /repos/{owner}/{repo}/installation`.
	ResolveInstallation,
	/// `POST /app/installations/{id}/access_tokens`.
	CreateAccessToken,
	/// `GET /installation/repositories`.
	ListRepositories,
	/// End-to-end sign, resolve, and exchange.
	Issue,
}
impl Step {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Step::Sign => "sign",
			Step::ResolveInstallation => "resolve_installation",
			Step::CreateAccessToken => "create_access_token",
			Step::ListRepositories => "list_repositories",
			Step::Issue => "issue",
		}
	}
}
impl Display for Step {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
	/// Entry to a step.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StepOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepOutcome::Attempt => "attempt",
			StepOutcome::Success => "success",
			StepOutcome::Failure => "failure",
		}
	}

	/// Maps a step result onto its terminal outcome.
	pub fn of<T>(result: &Result<T>) -> Self {
		if result.is_ok() { Self::Success } else { Self::Failure }
	}
}
impl Display for StepOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
