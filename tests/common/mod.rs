#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use parking_lot::Mutex;
use serde_json::{Value, json};
// self
use blink_rest::{
	ClientConfig, Credentials, RestClient,
	error::TransportError,
	http::{HttpFuture, HttpRequest, HttpResponse, RestHttpClient},
};

pub type Reply = Result<Option<HttpResponse>, TransportError>;

/// Scripted transport: answers logins itself and pops queued replies for every other call.
#[derive(Default)]
pub struct FakeHttpClient {
	logins: AtomicUsize,
	login_delay: Option<std::time::Duration>,
	login_reply: Mutex<Option<HttpResponse>>,
	replies: Mutex<VecDeque<Reply>>,
	requests: Mutex<Vec<HttpRequest>>,
}
impl FakeHttpClient {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Slows every login down so concurrent callers overlap.
	pub fn with_login_delay(delay: std::time::Duration) -> Arc<Self> {
		Arc::new(Self { login_delay: Some(delay), ..Default::default() })
	}

	/// Replaces the generated login success with a fixed response.
	pub fn reply_to_login(&self, status: u16, body: Value) {
		*self.login_reply.lock() = Some(HttpResponse::json(status, &body));
	}

	pub fn enqueue(&self, reply: Reply) {
		self.replies.lock().push_back(reply);
	}

	pub fn enqueue_json(&self, status: u16, body: Value) {
		self.enqueue(Ok(Some(HttpResponse::json(status, &body))));
	}

	pub fn logins(&self) -> usize {
		self.logins.load(Ordering::SeqCst)
	}

	/// Every non-login request, in send order.
	pub fn api_requests(&self) -> Vec<HttpRequest> {
		self.requests.lock().iter().filter(|request| !is_login(request)).cloned().collect()
	}

	pub fn login_requests(&self) -> Vec<HttpRequest> {
		self.requests.lock().iter().filter(|request| is_login(request)).cloned().collect()
	}
}
impl RestHttpClient for FakeHttpClient {
	fn send(&self, request: HttpRequest) -> HttpFuture<'_> {
		let login = is_login(&request);

		self.requests.lock().push(request);

		if login {
			let count = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
			let reply = self.login_reply.lock().clone().unwrap_or_else(|| {
				HttpResponse::json(
					200,
					&json!({
						"authtoken": { "authtoken": format!("token-{count}"), "message": "auth" },
						"region": { "prde": "Europe" },
					}),
				)
			});
			let delay = self.login_delay;

			return Box::pin(async move {
				if let Some(delay) = delay {
					tokio::time::sleep(delay).await;
				}

				Ok::<_, TransportError>(Some(reply))
			});
		}

		let reply = self
			.replies
			.lock()
			.pop_front()
			.unwrap_or_else(|| Ok(Some(HttpResponse::json(200, &json!({})))));

		Box::pin(async move { reply })
	}
}

pub fn credentials() -> Credentials {
	Credentials::new("owner@example.com", "hunter2")
}

pub fn client(transport: &Arc<FakeHttpClient>) -> RestClient<FakeHttpClient> {
	client_with(transport, ClientConfig::default())
}

pub fn client_with(
	transport: &Arc<FakeHttpClient>,
	config: ClientConfig,
) -> RestClient<FakeHttpClient> {
	RestClient::with_http_client(credentials(), config, Arc::clone(transport))
		.expect("Client should build from a valid config.")
}

fn is_login(request: &HttpRequest) -> bool {
	request.url.path().ends_with("/login")
}
