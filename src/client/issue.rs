//! End-to-end issuance: sign, resolve the installation, exchange for a token.
//!
//! One assertion serves both calls unless the lookup ran long enough to push it within
//! [`RESIGN_MARGIN`] of expiry, in which case a fresh assertion is signed for the exchange.
//! Nothing is retried here; wrap the call in [`RetryPolicy`] to retry transient failures.

// self
use crate::{
	_prelude::*,
	auth::{AppCredential, InstallationToken, RepositoryRef},
	client::AppClient,
	http::{ApiTransport, DEFAULT_TIMEOUT},
	obs::{self, StatusClass, Step, StepOutcome, StepSpan},
};

/// Remaining lifetime below which an assertion is re-signed before the exchange.
pub const RESIGN_MARGIN: Duration = DEFAULT_TIMEOUT;

impl<C> AppClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Issues an installation access token for `owner_repo`.
	///
	/// The repository is validated before anything is signed or sent.
	pub async fn issue_installation_token(
		&self,
		credential: &AppCredential,
		owner_repo: &str,
	) -> Result<InstallationToken> {
		let repository = RepositoryRef::parse(owner_repo)?;

		self.issue_repository_token(credential, &repository).await
	}

	/// Same as [`issue_installation_token`](Self::issue_installation_token) for a parsed
	/// repository.
	pub async fn issue_repository_token(
		&self,
		credential: &AppCredential,
		repository: &RepositoryRef,
	) -> Result<InstallationToken> {
		const STEP: Step = Step::Issue;

		let span = StepSpan::new(STEP, "issue_repository_token");

		obs::record_step_outcome(STEP, StepOutcome::Attempt, StatusClass::NoResponse);

		span.record_repository(repository);

		let result = span
			.instrument(async {
				let mut assertion = credential.sign_at(self.now())?;
				let installation =
					self.resolve_repository_installation(&assertion, repository).await?;

				span.record_installation(&installation);

				if assertion.expires_within(RESIGN_MARGIN, self.now()) {
					#[cfg(feature = "tracing")]
					tracing::debug!("app assertion close to expiry, signing a fresh one");

					assertion = credential.sign_at(self.now())?;
				}

				self.get_access_token(&assertion, &installation).await
			})
			.await;

		obs::record_step_result(STEP, &result, Some(201));

		result
	}
}

/// Caller-side retry policy for transient failures.
///
/// Only errors for which [`Error::is_retryable`] holds are retried. The delay doubles after
/// every attempt unless GitHub supplied a Retry-After hint, which wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Total attempts including the first one. Zero behaves like one.
	pub max_attempts: u32,
	/// Delay before the second attempt.
	pub base_delay: Duration,
	/// Upper bound for any single delay.
	pub max_delay: Duration,
}
impl RetryPolicy {
	/// Policy that never retries.
	pub const NONE: Self =
		Self { max_attempts: 1, base_delay: Duration::ZERO, max_delay: Duration::ZERO };

	/// Delay to wait after failed attempt number `attempt` (1-based) failed with `error`, or
	/// `None` when the caller should give up.
	pub fn next_delay(&self, attempt: u32, error: &Error) -> Option<Duration> {
		if attempt >= self.max_attempts.max(1) || !error.is_retryable() {
			return None;
		}

		let delay = error.retry_after().unwrap_or_else(|| {
			let factor = 1_i32 << attempt.saturating_sub(1).min(16);

			self.base_delay.checked_mul(factor).unwrap_or(self.max_delay)
		});

		Some(delay.min(self.max_delay).max(Duration::ZERO))
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self { max_attempts: 3, base_delay: Duration::seconds(1), max_delay: Duration::seconds(30) }
	}
}
