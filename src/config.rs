//! Run configuration, validated before any network call.

// self
use crate::{
	_prelude::*,
	auth::{AppCredential, PrivateKeyPem, RepositoryRef},
	client::GITHUB_API_URL,
	error::ConfigError,
	http::DEFAULT_TIMEOUT,
};

/// Environment variable holding the PEM-encoded App private key.
pub const ENV_APP_PEM: &str = "INPUT_APP_PEM";
/// Environment variable holding the App identifier.
pub const ENV_APP_ID: &str = "INPUT_APP_ID";
/// Environment variable holding the target `owner/name` repository.
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
/// Optional environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "GITHUB_API_URL";
/// Optional environment variable overriding the per-request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "INPUT_TIMEOUT_SECS";

/// Everything one issuance run needs.
#[derive(Clone, Debug)]
pub struct AppConfig {
	/// App private key and identifier.
	pub credential: AppCredential,
	/// Repository whose installation is targeted.
	pub repository: RepositoryRef,
	/// API root.
	pub api_base: Url,
	/// Per-request timeout.
	pub timeout: Duration,
}
impl AppConfig {
	/// Builds a configuration against the public API with the default timeout.
	///
	/// Rejects a blank App identifier up front so the run fails before any request.
	pub fn new(credential: AppCredential, repository: RepositoryRef) -> Result<Self> {
		if credential.app_id.trim().is_empty() {
			return Err(ConfigError::EmptyAppId.into());
		}

		let api_base =
			Url::parse(GITHUB_API_URL).map_err(|source| ConfigError::InvalidApiBase { source })?;

		Ok(Self { credential, repository, api_base, timeout: DEFAULT_TIMEOUT })
	}

	/// Overrides the API base URL (GitHub Enterprise Server, test servers).
	pub fn with_api_base(mut self, api_base: Url) -> Self {
		self.api_base = api_base;

		self
	}

	/// Overrides the per-request timeout; non-positive values are rejected.
	pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
		if !timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout.into());
		}

		self.timeout = timeout;

		Ok(self)
	}

	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads the configuration through `lookup`, treating empty values as unset.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());
		let require =
			|name: &'static str| read(name).ok_or(ConfigError::MissingVariable { name });
		let pem = require(ENV_APP_PEM)?;
		let app_id = require(ENV_APP_ID)?;
		let repository = RepositoryRef::parse(require(ENV_REPOSITORY)?)?;
		let mut config =
			Self::new(AppCredential::new(PrivateKeyPem::from(pem), app_id.trim()), repository)?;

		if let Some(raw) = read(ENV_API_URL) {
			let api_base = Url::parse(raw.trim())
				.map_err(|source| ConfigError::InvalidApiBase { source })?;

			if api_base.cannot_be_a_base() {
				return Err(ConfigError::CannotBeABase { url: api_base.to_string() }.into());
			}

			config = config.with_api_base(api_base);
		}
		if let Some(raw) = read(ENV_TIMEOUT_SECS) {
			let secs = raw.trim().parse::<u32>().map_err(|e| ConfigError::InvalidVariable {
				name: ENV_TIMEOUT_SECS,
				reason: e.to_string(),
			})?;

			config = config.with_timeout(Duration::seconds(secs.into()))?;
		}

		Ok(config)
	}
}
