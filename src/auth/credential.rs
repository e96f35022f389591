//! App credential and the RS256 assertions it signs.
//!
//! GitHub authenticates an App through a JWT whose `iss` claim carries the App identifier and
//! whose validity window must stay within a few minutes of the server clock. Assertions issued
//! here always live for [`ASSERTION_TTL`] and are meant to serve at most the two calls of one
//! issuance run (installation lookup, then token exchange).

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	auth::{PrivateKeyPem, TokenSecret},
	error::{ConfigError, CredentialError},
	obs::{self, StatusClass, Step, StepOutcome, StepSpan},
};

/// Validity window of every signed assertion.
pub const ASSERTION_TTL: Duration = Duration::seconds(60);

/// Registered claims carried by an app assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Issued-at, epoch seconds.
	pub iat: i64,
	/// Expiry, epoch seconds. Always `iat + 60`.
	pub exp: i64,
	/// App identifier.
	pub iss: String,
}

/// GitHub App identity: private key plus App identifier.
///
/// The key is parsed on every [`sign_at`](AppCredential::sign_at) call; nothing derived from it
/// is kept between assertions.
#[derive(Clone, Debug)]
pub struct AppCredential {
	/// PEM-encoded RSA private key (PKCS#1 or PKCS#8, unencrypted).
	pub private_key: PrivateKeyPem,
	/// App identifier used as the `iss` claim.
	pub app_id: String,
}
impl AppCredential {
	/// Wraps a private key and App identifier. Validation happens when signing.
	pub fn new(private_key: impl Into<PrivateKeyPem>, app_id: impl Into<String>) -> Self {
		Self { private_key: private_key.into(), app_id: app_id.into() }
	}

	/// Signs an assertion valid from now for [`ASSERTION_TTL`].
	pub fn sign(&self) -> Result<SignedAssertion> {
		self.sign_at(OffsetDateTime::now_utc())
	}

	/// Signs an assertion with `iat = now` and `exp = now + 60`.
	///
	/// Fails with [`ConfigError::EmptyAppId`] before touching the key when the App identifier is
	/// blank, and with [`CredentialError`] when the key cannot be parsed or used.
	pub fn sign_at(&self, now: OffsetDateTime) -> Result<SignedAssertion> {
		const STEP: Step = Step::Sign;

		StepSpan::new(STEP, "sign_at").in_scope(|| {
			obs::record_step_outcome(STEP, StepOutcome::Attempt, StatusClass::NoResponse);

			let result = self.encode(now);

			obs::record_step_result(STEP, &result, None);

			result
		})
	}

	fn encode(&self, now: OffsetDateTime) -> Result<SignedAssertion> {
		if self.app_id.trim().is_empty() {
			return Err(ConfigError::EmptyAppId.into());
		}

		let key = EncodingKey::from_rsa_pem(self.private_key.expose())
			.map_err(|source| CredentialError::InvalidPrivateKey { source })?;
		let iat = now.unix_timestamp();
		let claims =
			AssertionClaims { iat, exp: iat + ASSERTION_TTL.whole_seconds(), iss: self.app_id.clone() };
		let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
			.map_err(|source| CredentialError::Signing { source })?;

		Ok(SignedAssertion { token: TokenSecret::new(token), claims })
	}
}

/// Compact RS256 JWT authenticating as the App itself.
#[derive(Clone, Debug)]
pub struct SignedAssertion {
	token: TokenSecret,
	claims: AssertionClaims,
}
impl SignedAssertion {
	/// Compact `header.payload.signature` token.
	pub fn token(&self) -> &TokenSecret {
		&self.token
	}

	/// Claims embedded in the token.
	pub fn claims(&self) -> &AssertionClaims {
		&self.claims
	}

	/// Issued-at, epoch seconds.
	pub fn issued_at(&self) -> i64 {
		self.claims.iat
	}

	/// Expiry, epoch seconds.
	pub fn expires_at(&self) -> i64 {
		self.claims.exp
	}

	/// Whether the assertion expires within `window` of `now` (or already has).
	pub fn expires_within(&self, window: Duration, now: OffsetDateTime) -> bool {
		self.claims.exp - now.unix_timestamp() <= window.whole_seconds()
	}
}
