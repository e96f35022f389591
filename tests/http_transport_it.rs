mod common;

// crates.io
use httpmock::prelude::*;
use time::Duration;
use url::Url;
// self
use common::{credential, verify};
use github_app_token::{
	auth::InstallationToken,
	client::{AppClient, ReqwestAppClient},
	error::{Error, UpstreamError},
	http::{ACCEPT_APP_PREVIEW, ReqwestTransport, USER_AGENT},
};

fn client(base: &str) -> AppClient<ReqwestTransport> {
	let transport =
		ReqwestTransport::with_timeout(Duration::seconds(5)).expect("Transport should build.");

	AppClient::with_transport(Url::parse(base).expect("Mock server URL should parse."), transport)
		.expect("Mock server URL should be accepted.")
}

#[tokio::test]
async fn issue_round_trips_through_reqwest() {
	let server = MockServer::start_async().await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/repos/octo/hello/installation")
				.header("accept", ACCEPT_APP_PREVIEW)
				.header("user-agent", USER_AGENT)
				.header_exists("authorization");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":12345,\"app_id\":1}");
		})
		.await;
	let exchange = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/app/installations/12345/access_tokens")
				.header("accept", ACCEPT_APP_PREVIEW)
				.header_exists("authorization");
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"token\":\"ghs_abc123\",\"expires_at\":\"2024-05-01T13:00:00Z\"}");
		})
		.await;
	let token = client(&server.base_url())
		.issue_installation_token(&credential(), "octo/hello")
		.await
		.expect("Issuance against the mock server should succeed.");

	assert_eq!(token.expose(), "ghs_abc123");

	lookup.assert_async().await;
	exchange.assert_async().await;
}

#[tokio::test]
async fn default_client_identifies_itself() {
	let server = MockServer::start_async().await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET).path("/repos/octo/hello/installation").header("user-agent", USER_AGENT);
			then.status(200).body("{\"id\":12345}");
		})
		.await;
	let client = ReqwestAppClient::new(Url::parse(&server.base_url()).expect("URL should parse."))
		.expect("Default client should build.");
	let assertion = credential().sign().expect("Fixture credential should sign.");
	let installation = client
		.resolve_installation_id(&assertion, "octo/hello")
		.await
		.expect("Requests from the default client should carry the user agent.");

	assert_eq!(installation.id, 12345);

	lookup.assert_async().await;
}

#[tokio::test]
async fn bearer_header_carries_a_verifiable_assertion() {
	let server = MockServer::start_async().await;
	let assertion = credential().sign().expect("Fixture credential should sign.");
	let bearer = format!("Bearer {}", assertion.token().expose());
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET).path("/repos/octo/hello/installation").header("authorization", &bearer);
			then.status(200).body("{\"id\":99}");
		})
		.await;
	let installation = client(&server.base_url())
		.resolve_installation_id(&assertion, "octo/hello")
		.await
		.expect("Lookup should succeed.");

	assert_eq!(installation.id, 99);
	assert_eq!(verify(assertion.token().expose()).iss, common::APP_ID);

	lookup.assert_async().await;
}

#[tokio::test]
async fn enterprise_base_path_is_preserved() {
	let server = MockServer::start_async().await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v3/repos/octo/hello/installation");
			then.status(200).body("{\"id\":7}");
		})
		.await;
	let assertion = credential().sign().expect("Fixture credential should sign.");
	let installation = client(&server.url("/api/v3"))
		.resolve_installation_id(&assertion, "octo/hello")
		.await
		.expect("Lookup under an enterprise base path should succeed.");

	assert_eq!(installation.id, 7);

	lookup.assert_async().await;
}

#[tokio::test]
async fn server_errors_keep_status_body_and_retry_hint() {
	let server = MockServer::start_async().await;
	let exchange = server
		.mock_async(|when, then| {
			when.method(POST).path("/app/installations/5/access_tokens");
			then.status(503).header("retry-after", "2").body("{\"message\":\"Service Unavailable\"}");
		})
		.await;
	let assertion = credential().sign().expect("Fixture credential should sign.");
	let err = client(&server.base_url())
		.get_access_token(&assertion, &github_app_token::auth::InstallationRef::new(5))
		.await
		.expect_err("503 must surface as an upstream error.");

	assert!(err.is_retryable());
	assert_eq!(err.status(), Some(503));
	assert_eq!(err.retry_after(), Some(Duration::seconds(2)));
	assert!(matches!(
		err,
		Error::Upstream(UpstreamError::UnexpectedStatus { ref body, .. })
			if body.contains("Service Unavailable")
	));

	exchange.assert_async().await;
}

#[tokio::test]
async fn repositories_use_the_token_scheme() {
	let server = MockServer::start_async().await;
	let listing = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/installation/repositories")
				.header("authorization", "token ghs_abc123");
			then.status(200).body(
				"{\"total_count\":2,\"repositories\":[\
				{\"id\":1,\"name\":\"hello\",\"full_name\":\"octo/hello\"},\
				{\"id\":2,\"name\":\"world\",\"full_name\":\"octo/world\"}]}",
			);
		})
		.await;
	let repositories = client(&server.base_url())
		.list_installation_repositories(&InstallationToken::new("ghs_abc123"))
		.await
		.expect("Listing should succeed.");
	let names: Vec<_> = repositories.iter().map(|repo| repo.full_name.as_str()).collect();

	assert_eq!(names, ["octo/hello", "octo/world"]);

	listing.assert_async().await;
}
