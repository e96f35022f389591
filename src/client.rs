//! GitHub App API client: installation lookup, token exchange, and the end-to-end issuance run.

pub mod issue;

mod access_token;
mod installation;
mod repositories;

pub use issue::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, UpstreamError},
	http::{ApiRequest, ApiResponse, ApiTransport},
};
#[cfg(feature = "reqwest")]
use crate::{
	config::AppConfig,
	http::{DEFAULT_TIMEOUT, ReqwestTransport},
};

/// Public GitHub API base URL.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Source of the current time, injectable for tests.
pub type Clock = Arc<dyn Fn() -> OffsetDateTime + Send + Sync>;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestAppClient = AppClient<ReqwestTransport>;

/// Talks to the App endpoints of one GitHub API deployment.
///
/// The client owns no credentials; every call takes the assertion or token it should present,
/// so nothing outlives a single issuance run.
#[derive(Clone)]
pub struct AppClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<C>,
	/// API root, e.g. `https://api.github.com` or `https://ghe.example.com/api/v3`.
	pub api_base: Url,
	clock: Clock,
}
impl<C> AppClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a client over a caller-provided transport.
	///
	/// Fails when `api_base` cannot carry path segments.
	pub fn with_transport(api_base: Url, transport: impl Into<Arc<C>>) -> Result<Self> {
		if api_base.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: api_base.to_string() }.into());
		}

		Ok(Self {
			transport: transport.into(),
			api_base,
			clock: Arc::new(OffsetDateTime::now_utc),
		})
	}

	/// Replaces the clock used to sign and re-sign assertions.
	pub fn with_clock(mut self, clock: impl 'static + Fn() -> OffsetDateTime + Send + Sync) -> Self {
		self.clock = Arc::new(clock);

		self
	}

	pub(crate) fn now(&self) -> OffsetDateTime {
		(self.clock)()
	}

	/// Appends percent-encoded `segments` to the API base.
	pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
		let mut url = self.api_base.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::CannotBeABase { url: self.api_base.to_string() })?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}

	pub(crate) async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
		self.transport.execute(request).await.map_err(Error::from)
	}
}
#[cfg(feature = "reqwest")]
impl AppClient<ReqwestTransport> {
	/// Creates a client over a reqwest transport with [`DEFAULT_TIMEOUT`].
	pub fn new(api_base: Url) -> Result<Self> {
		Self::with_transport(api_base, ReqwestTransport::with_timeout(DEFAULT_TIMEOUT)?)
	}

	/// Creates a client honoring the configured API base and request timeout.
	pub fn from_config(config: &AppConfig) -> Result<Self> {
		Self::with_transport(config.api_base.clone(), ReqwestTransport::with_timeout(config.timeout)?)
	}
}
impl<C> Debug for AppClient<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AppClient").field("api_base", &self.api_base.as_str()).finish()
	}
}

/// Decodes `response` as `T` when it carries the `expected` status.
///
/// Any other status becomes [`UpstreamError::UnexpectedStatus`] with the raw body attached;
/// an undecodable body becomes [`UpstreamError::MalformedResponse`] without it.
pub(crate) fn decode_response<T>(
	endpoint: &'static str,
	expected: u16,
	response: ApiResponse,
) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status;

	if status != expected {
		return Err(UpstreamError::UnexpectedStatus {
			endpoint,
			status,
			body: response.body_text(),
			retry_after: response.retry_after,
		}
		.into());
	}

	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| UpstreamError::MalformedResponse { endpoint, status, source }.into())
}
