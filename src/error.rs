//! Error types shared by the signer, the API client, and the configuration layer.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The App private key could not be loaded or used; never retried.
	#[error(transparent)]
	Credential(#[from] CredentialError),
	/// GitHub answered with an unexpected status or an unusable body.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl Error {
	/// HTTP status reported by GitHub, when the failure came from a response.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Upstream(e) => Some(e.status()),
			_ => None,
		}
	}

	/// Whether a caller-driven retry may succeed.
	///
	/// Transport failures and 5xx responses qualify. Client errors (4xx), malformed
	/// configuration, and unusable keys will not resolve on their own.
	pub fn is_retryable(&self) -> bool {
		match self {
			Self::Transport(_) => true,
			Self::Upstream(e) => e.is_retryable(),
			Self::Config(_) | Self::Credential(_) => false,
		}
	}

	/// Retry-After hint supplied by GitHub, if any.
	pub fn retry_after(&self) -> Option<Duration> {
		match self {
			Self::Upstream(UpstreamError::UnexpectedStatus { retry_after, .. }) => *retry_after,
			_ => None,
		}
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// The App identifier is empty.
	#[error("GitHub App identifier cannot be empty.")]
	EmptyAppId,
	/// The repository is not in `owner/name` form.
	#[error("Repository `{value}` must be in `owner/name` form.")]
	InvalidRepository {
		/// Rejected input.
		value: String,
	},
	/// A required environment variable is unset or empty.
	#[error("Environment variable `{name}` must be set.")]
	MissingVariable {
		/// Variable name.
		name: &'static str,
	},
	/// An environment variable holds an unusable value.
	#[error("Environment variable `{name}` is invalid: {reason}.")]
	InvalidVariable {
		/// Variable name.
		name: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
	/// The API base URL cannot be parsed.
	#[error("GitHub API base URL is invalid.")]
	InvalidApiBase {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The API base URL cannot carry path segments (e.g. `mailto:`).
	#[error("GitHub API base URL `{url}` cannot be used as a base.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Request timeout must be positive.
	#[error("Request timeout must be positive.")]
	NonPositiveTimeout,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Private key failures.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// The PEM does not hold an RSA private key.
	#[error("Private key is not a valid PEM-encoded RSA private key.")]
	InvalidPrivateKey {
		/// Underlying key parsing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// The key parsed but RS256 signing failed.
	#[error("Failed to sign the app assertion.")]
	Signing {
		/// Underlying signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

/// Failures reported by (or inferred from) GitHub responses.
///
/// None of the variants carry the body of a successful response, so an issued token can never
/// leak through an error message.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// GitHub returned a status other than the one the endpoint promises.
	#[error("GitHub `{endpoint}` returned HTTP {status}: {body}")]
	UnexpectedStatus {
		/// Endpoint label.
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
		/// Raw response body, lossily decoded.
		body: String,
		/// Retry-After hint, if supplied.
		retry_after: Option<Duration>,
	},
	/// The success body could not be decoded into the expected shape.
	#[error("GitHub `{endpoint}` returned a malformed body (HTTP {status}).")]
	MalformedResponse {
		/// Endpoint label.
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// GitHub reported success but handed out a blank token.
	#[error("GitHub returned an empty installation access token (HTTP {status}).")]
	EmptyToken {
		/// HTTP status code.
		status: u16,
	},
}
impl UpstreamError {
	/// HTTP status code attached to the failure.
	pub fn status(&self) -> u16 {
		match self {
			Self::UnexpectedStatus { status, .. }
			| Self::MalformedResponse { status, .. }
			| Self::EmptyToken { status } => *status,
		}
	}

	/// Only server-side (5xx) failures are worth retrying.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::UnexpectedStatus { status, .. } if *status >= 500)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the GitHub API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete within the configured timeout.
	#[error("Request to the GitHub API timed out.")]
	Timeout,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the GitHub API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn unexpected(status: u16) -> Error {
		UpstreamError::UnexpectedStatus {
			endpoint: "repository_installation",
			status,
			body: "{}".into(),
			retry_after: None,
		}
		.into()
	}

	#[test]
	fn retry_classification_splits_client_and_server_failures() {
		assert!(unexpected(502).is_retryable());
		assert!(unexpected(500).is_retryable());
		assert!(!unexpected(404).is_retryable());
		assert!(!unexpected(401).is_retryable());
		assert!(!Error::from(UpstreamError::EmptyToken { status: 201 }).is_retryable());
		assert!(Error::from(TransportError::Timeout).is_retryable());
		assert!(!Error::from(ConfigError::EmptyAppId).is_retryable());
	}

	#[test]
	fn status_is_exposed_for_upstream_failures_only() {
		assert_eq!(unexpected(404).status(), Some(404));
		assert_eq!(Error::from(TransportError::Timeout).status(), None);
	}

	#[test]
	fn unexpected_status_message_carries_body() {
		let err = UpstreamError::UnexpectedStatus {
			endpoint: "create_access_token",
			status: 401,
			body: "{\"message\":\"Bad credentials\"}".into(),
			retry_after: Some(Duration::seconds(3)),
		};

		assert_eq!(
			err.to_string(),
			"GitHub `create_access_token` returned HTTP 401: {\"message\":\"Bad credentials\"}"
		);
		assert_eq!(Error::from(err).retry_after(), Some(Duration::seconds(3)));
	}
}
