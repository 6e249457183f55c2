#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
use time::Duration;
use url::Url;
// self
use blink_rest::{
	ClientConfig, Credentials, Error, RestClient, endpoints::Endpoints, http::ReqwestHttpClient,
};

// Accepts the self-signed certificates served by `httpmock`; HTTP/1.1 keeps the `Host` header
// on the wire.
fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.http1_only()
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

fn client(server: &MockServer) -> RestClient<ReqwestHttpClient> {
	let origin = Url::parse(&server.base_url()).expect("Mock server URL should parse.");
	let config =
		ClientConfig::default().with_endpoints(Endpoints::default().with_origin_override(origin));

	RestClient::with_http_client(
		Credentials::new("owner@example.com", "hunter2"),
		config,
		test_reqwest_http_client(),
	)
	.expect("Client should build against the mock server.")
}

async fn mock_login(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/login")
				.header("host", "prod.immedia-semi.com")
				.json_body(json!({
					"email": "owner@example.com",
					"password": "hunter2",
					"client_specifier": "iPhone 9.2 | 2.2 | 222",
				}));
			then.status(200).json_body(json!({
				"authtoken": { "authtoken": "live-token", "message": "auth" },
				"region": { "prde": "Europe" },
			}));
		})
		.await
}

#[tokio::test]
async fn reqwest_transport_round_trips_login_and_calls() {
	let server = MockServer::start_async().await;
	let login = mock_login(&server).await;
	let _networks = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/networks")
				.header("token_auth", "live-token")
				.header("host", "prde.immedia-semi.com");
			then.status(200).json_body(json!({
				"networks": [{ "id": 42, "name": "Home", "armed": false }],
			}));
		})
		.await;
	let client = client(&server);
	let first = client.networks().await.expect("Networks should load through reqwest.");
	let second = client.networks().await.expect("Cached token should be reused.");

	// Exactly one login serves both calls.
	login.assert_async().await;

	assert_eq!(first, second);
	assert_eq!(first[0].name(), Some("Home"));
	assert_eq!(first[0].armed(), Some(false));
}

#[tokio::test]
async fn upstream_throttling_carries_retry_after() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let _arm = server
		.mock_async(|when, then| {
			when.method(POST).path("/network/42/arm");
			then.status(429)
				.header("Retry-After", "30")
				.json_body(json!({ "message": "Too many requests" }));
		})
		.await;
	let client = client(&server);
	let err = client.arm_network(42_i64).await.expect_err("Throttled call should fail.");

	match err {
		Error::Api { message, status, retry_after } => {
			assert_eq!(message, "Too many requests");
			assert_eq!(status, Some(429));
			assert_eq!(retry_after, Some(Duration::seconds(30)));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn unreachable_servers_produce_no_response() {
	let origin = Url::parse("http://127.0.0.1:9/").expect("Origin should parse.");
	let config =
		ClientConfig::default().with_endpoints(Endpoints::default().with_origin_override(origin));
	let client = RestClient::new(Credentials::new("owner@example.com", "hunter2"), config)
		.expect("Client should build with the bundled transport.");

	assert!(matches!(client.networks().await, Err(Error::NoResponse { source: Some(_), .. })));
}
