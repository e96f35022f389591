//! `github_app_token.step` spans carrying the repository, installation, and HTTP status of a step.

// self
use crate::{
	_prelude::*,
	auth::{InstallationRef, RepositoryRef},
	obs::Step,
};

/// Future returned by [`StepSpan::instrument`].
#[cfg(feature = "tracing")]
pub type InstrumentedStep<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`StepSpan::instrument`].
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStep<F> = F;

/// Span around one issuance step.
///
/// `status`, `installation_id` and `repository` start empty and are filled in as the step
/// learns them. Without the `tracing` feature every method is a no-op.
#[derive(Clone, Debug)]
pub struct StepSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StepSpan {
	/// Opens the span for `step`, tagged with the calling `stage`.
	pub fn new(step: Step, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			use tracing::field::Empty;

			let span = tracing::info_span!(
				"github_app_token.step",
				step = step.as_str(),
				stage,
				status = Empty,
				installation_id = Empty,
				repository = Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (step, stage);

			Self {}
		}
	}

	/// Records the HTTP status GitHub answered with.
	pub fn record_status(&self, status: u16) {
		#[cfg(feature = "tracing")]
		self.span.record("status", u64::from(status));
		#[cfg(not(feature = "tracing"))]
		let _ = status;
	}

	/// Records the installation the step targets or resolved.
	pub fn record_installation(&self, installation: &InstallationRef) {
		#[cfg(feature = "tracing")]
		self.span.record("installation_id", installation.id);
		#[cfg(not(feature = "tracing"))]
		let _ = installation;
	}

	/// Records the `owner/name` the step works on.
	pub fn record_repository(&self, repository: &RepositoryRef) {
		#[cfg(feature = "tracing")]
		self.span.record("repository", tracing::field::display(repository));
		#[cfg(not(feature = "tracing"))]
		let _ = repository;
	}

	/// Runs a synchronous step inside the span.
	pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Instruments an async step without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStep<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(all(test, feature = "tracing"))]
mod tests {
	// crates.io
	use parking_lot::Mutex;
	use tracing::{
		Event, Id, Metadata, Subscriber,
		field::{Field, Visit},
		span::{Attributes, Record},
	};
	// self
	use super::*;

	/// Subscriber keeping every span field value, rendered with `Debug`.
	#[derive(Clone, Default)]
	struct FieldLog(Arc<Mutex<Vec<(&'static str, String)>>>);
	impl FieldLog {
		fn get(&self, name: &str) -> Option<String> {
			let fields = self.0.lock();

			fields.iter().rev().find(|(field, _)| *field == name).map(|(_, value)| value.clone())
		}
	}
	impl Visit for FieldLog {
		fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
			self.0.lock().push((field.name(), format!("{value:?}")));
		}
	}
	impl Subscriber for FieldLog {
		fn enabled(&self, _: &Metadata<'_>) -> bool {
			true
		}

		fn new_span(&self, span: &Attributes<'_>) -> Id {
			span.record(&mut self.clone());

			Id::from_u64(1)
		}

		fn record(&self, _: &Id, values: &Record<'_>) {
			values.record(&mut self.clone());
		}

		fn record_follows_from(&self, _: &Id, _: &Id) {}

		fn event(&self, _: &Event<'_>) {}

		fn enter(&self, _: &Id) {}

		fn exit(&self, _: &Id) {}
	}

	#[test]
	fn step_span_records_call_context() {
		let log = FieldLog::default();

		tracing::subscriber::with_default(log.clone(), || {
			let span = StepSpan::new(Step::ResolveInstallation, "resolve_repository_installation");
			let repository = RepositoryRef::parse("octo/hello").expect("Repository should parse.");

			span.record_repository(&repository);
			span.record_status(200);
			span.record_installation(&InstallationRef::new(12345));
		});

		assert_eq!(log.get("step").as_deref(), Some("\"resolve_installation\""));
		assert_eq!(log.get("repository").as_deref(), Some("octo/hello"));
		assert_eq!(log.get("status").as_deref(), Some("200"));
		assert_eq!(log.get("installation_id").as_deref(), Some("12345"));
	}

	#[test]
	fn unknown_context_stays_empty() {
		let log = FieldLog::default();
		let value = tracing::subscriber::with_default(log.clone(), || {
			let span = StepSpan::new(Step::CreateAccessToken, "get_access_token");

			span.record_status(503);
			span.in_scope(|| 42)
		});

		assert_eq!(value, 42);
		assert_eq!(log.get("status").as_deref(), Some("503"));
		assert_eq!(log.get("installation_id"), None);
		assert_eq!(log.get("repository"), None);
	}
}
