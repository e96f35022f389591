//! `github_app_token_step_total{step, outcome, status_class}`.

// self
use crate::{
	_prelude::*,
	obs::{Step, StepOutcome},
};

/// HTTP status class attached to every recorded outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusClass {
	/// No HTTP response: attempts, signing, and transport failures.
	NoResponse,
	/// `1xx`.
	Informational,
	/// `2xx`.
	Success,
	/// `3xx`.
	Redirection,
	/// `4xx`.
	ClientError,
	/// `5xx`.
	ServerError,
}
impl StatusClass {
	/// Classifies an optional HTTP status.
	pub const fn from_status(status: Option<u16>) -> Self {
		match status {
			Some(100..=199) => Self::Informational,
			Some(200..=299) => Self::Success,
			Some(300..=399) => Self::Redirection,
			Some(400..=499) => Self::ClientError,
			Some(500..=599) => Self::ServerError,
			_ => Self::NoResponse,
		}
	}

	/// Classifies a step result; `success` is the status a successful step was answered with.
	pub fn of<T>(result: &Result<T>, success: Option<u16>) -> Self {
		match result {
			Ok(_) => Self::from_status(success),
			Err(e) => Self::from_status(e.status()),
		}
	}

	/// Returns the metric label value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::NoResponse => "none",
			Self::Informational => "1xx",
			Self::Success => "2xx",
			Self::Redirection => "3xx",
			Self::ClientError => "4xx",
			Self::ServerError => "5xx",
		}
	}
}

/// Increments the step counter via the global metrics recorder (when enabled).
pub fn record_step_outcome(step: Step, outcome: StepOutcome, status_class: StatusClass) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"github_app_token_step_total",
			"step" => step.as_str(),
			"outcome" => outcome.as_str(),
			"status_class" => status_class.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (step, outcome, status_class);
	}
}

/// Records the terminal outcome of `step` from its result.
pub fn record_step_result<T>(step: Step, result: &Result<T>, success: Option<u16>) {
	record_step_outcome(step, StepOutcome::of(result), StatusClass::of(result, success));
}
