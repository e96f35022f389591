//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{collections::VecDeque, io, sync::Arc};
// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use parking_lot::Mutex;
use url::Url;
// self
use github_app_token::{
	auth::{AppCredential, AssertionClaims},
	client::{AppClient, GITHUB_API_URL},
	error::TransportError,
	http::{ApiRequest, ApiResponse, ApiTransport, TransportFuture},
};

pub const APP_ID: &str = "12345";
pub const PRIVATE_KEY: &str = include_str!("../fixtures/app-private-key.pem");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/app-public-key.pem");

pub fn credential() -> AppCredential {
	AppCredential::new(PRIVATE_KEY, APP_ID)
}

/// Verifies `token` against the fixture public key and returns its claims.
pub fn verify(token: &str) -> AssertionClaims {
	let key =
		DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).expect("Fixture public key should parse.");
	let mut validation = Validation::new(Algorithm::RS256);

	validation.validate_exp = false;
	validation.required_spec_claims.clear();

	jsonwebtoken::decode::<AssertionClaims>(token, &key, &validation)
		.expect("Assertion should verify against the fixture public key.")
		.claims
}

/// In-process transport that replays canned responses and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
	responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
	requests: Mutex<Vec<ApiRequest>>,
}
impl ScriptedTransport {
	pub fn new(responses: impl IntoIterator<Item = ApiResponse>) -> Arc<Self> {
		Self::with_outcomes(responses.into_iter().map(Ok))
	}

	pub fn with_outcomes(
		outcomes: impl IntoIterator<Item = Result<ApiResponse, TransportError>>,
	) -> Arc<Self> {
		Arc::new(Self {
			responses: Mutex::new(outcomes.into_iter().collect()),
			requests: Mutex::default(),
		})
	}

	pub fn requests(&self) -> Vec<ApiRequest> {
		self.requests.lock().clone()
	}

	pub fn calls(&self) -> usize {
		self.requests.lock().len()
	}
}
impl ApiTransport for ScriptedTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		self.requests.lock().push(request);

		let outcome = self.responses.lock().pop_front().unwrap_or_else(|| {
			Err(TransportError::network(io::Error::other("no scripted response left")))
		});

		Box::pin(std::future::ready(outcome))
	}
}

pub fn scripted_client(transport: &Arc<ScriptedTransport>) -> AppClient<ScriptedTransport> {
	AppClient::with_transport(
		Url::parse(GITHUB_API_URL).expect("Public API URL should parse."),
		Arc::clone(transport),
	)
	.expect("Public API URL should be accepted.")
}
