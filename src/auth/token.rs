//! Installation access tokens and the repositories they reach.

// crates.io
use serde::Deserializer;
use time::format_description::well_known::Rfc3339;
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Short-lived credential scoped to one installation.
///
/// Held in memory only; `Debug` and `Display` never reveal the token.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct InstallationToken {
	/// Token value (`ghs_...`).
	pub token: TokenSecret,
	/// Expiry reported by GitHub, usually one hour after issuance.
	///
	/// A value that is not RFC 3339 is treated as absent.
	#[serde(default, deserialize_with = "deserialize_expiry")]
	pub expires_at: Option<OffsetDateTime>,
}
impl InstallationToken {
	/// Wraps a token without an expiry hint.
	pub fn new(token: impl Into<String>) -> Self {
		Self { token: TokenSecret::new(token), expires_at: None }
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.token.expose()
	}
}
impl Display for InstallationToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.token, f)
	}
}

/// Repository reachable through an installation token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
	/// Numeric repository identifier.
	pub id: u64,
	/// Repository name without the owner.
	pub name: String,
	/// `owner/name`.
	pub full_name: String,
}

fn deserialize_expiry<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
	D: Deserializer<'de>,
{
	let Some(raw) = <Option<String>>::deserialize(deserializer)? else {
		return Ok(None);
	};

	match OffsetDateTime::parse(&raw, &Rfc3339) {
		Ok(expires_at) => Ok(Some(expires_at)),
		Err(_e) => {
			#[cfg(feature = "tracing")]
			tracing::warn!(expires_at = %raw, error = %_e, "ignoring unparsable token expiry");

			Ok(None)
		},
	}
}
