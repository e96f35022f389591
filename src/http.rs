//! Transport primitives for GitHub API calls.
//!
//! The module exposes [`ApiTransport`], the crate's only dependency on an HTTP stack, together
//! with the plain [`ApiRequest`]/[`ApiResponse`] values that cross it. Swap in a custom
//! implementation to route calls through a proxy-aware client or a test double; the default
//! [`ReqwestTransport`] covers everything else.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
#[cfg(feature = "reqwest")] use std::time::Duration as StdDuration;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, auth::TokenSecret, error::TransportError};

/// Media type requested from every App endpoint.
pub const ACCEPT_APP_PREVIEW: &str = "application/vnd.github.machine-man-preview+json";
/// `User-Agent` sent with every request; the GitHub API rejects anonymous agents.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
/// Per-request timeout used by [`AppClient::new`](crate::client::AppClient::new).
pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(10);

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to perform one GitHub API request.
///
/// Implementations send the request as described, wait for the full response, and report
/// status and body without interpreting them. Non-2xx statuses are successful transport
/// outcomes; only failures to obtain a response at all map to [`TransportError`].
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Performs `request` and returns the raw response.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP methods used by the App endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiMethod {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
}
impl ApiMethod {
	/// Returns the method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			ApiMethod::Get => "GET",
			ApiMethod::Post => "POST",
		}
	}
}
impl Display for ApiMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Credential placed in the `Authorization` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authorization {
	/// `Bearer <jwt>`; authenticates as the App.
	Bearer(TokenSecret),
	/// `token <installation token>`; authenticates as an installation.
	Token(TokenSecret),
}
impl Authorization {
	/// Renders the header value. Callers must avoid logging it.
	pub fn header_value(&self) -> String {
		match self {
			Self::Bearer(secret) => format!("Bearer {}", secret.expose()),
			Self::Token(secret) => format!("token {}", secret.expose()),
		}
	}

	/// Scheme name without the credential.
	pub const fn scheme(&self) -> &'static str {
		match self {
			Self::Bearer(_) => "Bearer",
			Self::Token(_) => "token",
		}
	}
}

/// Request handed to an [`ApiTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: ApiMethod,
	/// Absolute endpoint URL.
	pub url: Url,
	/// Value of the `Accept` header.
	pub accept: &'static str,
	/// Credential for the `Authorization` header.
	pub authorization: Authorization,
}
impl ApiRequest {
	/// Builds a request asking for [`ACCEPT_APP_PREVIEW`].
	pub fn new(method: ApiMethod, url: Url, authorization: Authorization) -> Self {
		Self { method, url, accept: ACCEPT_APP_PREVIEW, authorization }
	}
}

/// Raw response surfaced by an [`ApiTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl ApiResponse {
	/// Creates a response without a retry hint.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into(), retry_after: None }
	}

	/// Attaches a Retry-After hint.
	pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
		self.retry_after = Some(retry_after);

		self
	}

	/// Body decoded lossily for diagnostics.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Clients built by this crate carry [`USER_AGENT`] and a bounded per-request timeout. When
/// wrapping a custom client, configure both on it; the transport only sets `Accept` and
/// `Authorization` per request.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with [`USER_AGENT`] and the given per-request timeout.
	pub fn with_timeout(timeout: Duration) -> Result<Self> {
		let timeout = StdDuration::try_from(timeout)
			.ok()
			.filter(|value| !value.is_zero())
			.ok_or(crate::error::ConfigError::NonPositiveTimeout)?;
		let client = ReqwestClient::builder()
			.user_agent(USER_AGENT)
			.timeout(timeout)
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let builder = match request.method {
				ApiMethod::Get => client.get(request.url),
				ApiMethod::Post => client.post(request.url),
			};
			let response = builder
				.header(ACCEPT, request.accept)
				.header(AUTHORIZATION, request.authorization.header_value())
				.send()
				.await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok::<_, TransportError>(ApiResponse { status, body, retry_after })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}

	// IMF-fixdate names the zone `GMT`; normalize it to a numeric offset.
	let date = match raw.strip_suffix(" GMT") {
		Some(rest) => format!("{rest} +0000"),
		None => raw.to_owned(),
	};

	if let Ok(moment) = OffsetDateTime::parse(&date, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
