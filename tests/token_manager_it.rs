mod common;

// std
use std::sync::Arc;
// crates.io
use serde_json::json;
use time::{Duration, OffsetDateTime};
// self
use blink_rest::{
	ClientConfig, Error, TokenManager,
	auth::{Region, RegionId, Session, Token},
};
use common::FakeHttpClient;

fn manager(transport: &Arc<FakeHttpClient>) -> Arc<TokenManager<FakeHttpClient>> {
	let manager =
		TokenManager::new(common::credentials(), ClientConfig::default(), Arc::clone(transport))
			.expect("Default config should validate.");

	Arc::new(manager)
}

fn session_expiring_in(remaining: Duration) -> Session {
	let ttl = Duration::minutes(5);
	let issued_at = OffsetDateTime::now_utc() - ttl + remaining;

	Session::new(
		Token::new("seeded", issued_at, ttl),
		Region {
			id: RegionId::new("prsg").expect("Seeded region should be valid."),
			name: "Singapore".into(),
		},
	)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_login() {
	let transport = FakeHttpClient::with_login_delay(std::time::Duration::from_millis(50));
	let manager = manager(&transport);
	let handles = (0..16)
		.map(|_| {
			let manager = Arc::clone(&manager);

			tokio::spawn(async move { manager.current_token().await })
		})
		.collect::<Vec<_>>();
	let mut tokens = Vec::with_capacity(handles.len());

	for handle in handles {
		tokens.push(
			handle
				.await
				.expect("Caller task should not panic.")
				.expect("Every caller should receive a token."),
		);
	}

	assert_eq!(transport.logins(), 1);
	assert!(tokens.iter().all(|token| token.value.expose() == "token-1"));
	assert!(tokens.windows(2).all(|pair| pair[0] == pair[1]));
	assert_eq!(manager.metrics().attempts(), 1);
}

#[tokio::test]
async fn tokens_inside_the_margin_are_renewed() {
	let transport = FakeHttpClient::new();
	let manager = manager(&transport);

	manager.install_session(session_expiring_in(Duration::seconds(20)));

	let token = manager.current_token().await.expect("Fresh seeded token should be served.");

	assert_eq!(token.value.expose(), "seeded");
	assert_eq!(transport.logins(), 0);

	manager.install_session(session_expiring_in(Duration::seconds(5)));

	let token = manager.current_token().await.expect("Stale seeded token should be renewed.");

	assert_eq!(token.value.expose(), "token-1");
	assert_eq!(transport.logins(), 1);
	assert_eq!(
		manager.current_region().await.expect("Region should follow the renewal.").as_ref(),
		"prde"
	);
}

#[tokio::test]
async fn expired_tokens_are_renewed_and_invalidate_forces_login() {
	let transport = FakeHttpClient::new();
	let manager = manager(&transport);

	manager.install_session(session_expiring_in(Duration::seconds(-30)));
	manager.current_session().await.expect("Expired token should be renewed.");
	manager.invalidate();

	let session = manager.current_session().await.expect("Invalidated session should be renewed.");

	assert_eq!(session.token.value.expose(), "token-2");
	assert_eq!(transport.logins(), 2);

	let forced = manager.renew().await.expect("Forced renewal should succeed.");

	assert_eq!(forced.token.value.expose(), "token-3");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn waiters_retry_after_a_failed_login() {
	let transport = FakeHttpClient::with_login_delay(std::time::Duration::from_millis(20));
	let manager = manager(&transport);

	transport.reply_to_login(200, json!({ "message": "Invalid credentials" }));

	let first = tokio::spawn({
		let manager = Arc::clone(&manager);

		async move { manager.current_token().await }
	});
	let second = tokio::spawn({
		let manager = Arc::clone(&manager);

		async move { manager.current_token().await }
	});

	for handle in [first, second] {
		assert!(matches!(
			handle.await.expect("Caller task should not panic."),
			Err(Error::AuthenticationFailed { .. })
		));
	}

	assert_eq!(transport.logins(), 2);
	assert_eq!(manager.metrics().failures(), 2);
	assert!(manager.session().is_none());
}

#[tokio::test]
async fn login_request_targets_the_production_host() {
	let transport = FakeHttpClient::new();
	let manager = manager(&transport);

	manager.current_token().await.expect("Login should succeed.");

	let logins = transport.login_requests();
	let login = logins.first().expect("Login request should be recorded.");

	assert_eq!(login.url.as_str(), "https://rest.prod.immedia-semi.com/login");
	assert_eq!(login.header("Host"), Some("prod.immedia-semi.com"));
	assert_eq!(
		login.body,
		Some(json!({
			"email": "owner@example.com",
			"password": "hunter2",
			"client_specifier": "iPhone 9.2 | 2.2 | 222",
		}))
	);
	assert!(login.header("TOKEN_AUTH").is_none());
}

#[test]
fn managers_reject_configs_that_renew_on_every_call() {
	let transport = FakeHttpClient::new();
	let config = ClientConfig::default()
		.with_token_ttl(Duration::seconds(10))
		.with_near_expiry_margin(Duration::seconds(10));
	let result = TokenManager::<FakeHttpClient>::new(common::credentials(), config, transport);

	assert!(matches!(result, Err(Error::Config(_))));
}
