//! Authenticated, rate-limited request pipeline.
//!
//! [`RestClient::call`] runs one call end to end: admit through the [`RateLimiter`], borrow a
//! fresh [`Session`](crate::auth::Session) from the [`TokenManager`], resolve the regional URL,
//! send, and classify the response. Any body carrying a `message` field is a vendor soft
//! failure and surfaces as [`Error::Api`] even under HTTP 200. The client never retries.

pub mod path;

mod api;

pub use path::*;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenManager},
	config::ClientConfig,
	http::{self, HttpMethod, HttpRequest, RestHttpClient},
	limit::RateLimiter,
	obs::{self, OperationKind, OperationOutcome, OperationSpan, debug_event},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Header carrying the auth token on every authenticated call.
pub const TOKEN_AUTH_HEADER: &str = "TOKEN_AUTH";
/// Region-qualified host header sent with every call.
pub const HOST_HEADER: &str = "Host";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestRestClient = RestClient<ReqwestHttpClient>;

/// Cloneable handle to one account's REST API session.
///
/// Clones share the transport, the token manager, and the rate limiter, so the call budget
/// and the single-flight renewal apply across every clone.
pub struct RestClient<C>
where
	C: ?Sized + RestHttpClient,
{
	http_client: Arc<C>,
	tokens: Arc<TokenManager<C>>,
	limiter: Arc<RateLimiter>,
	config: Arc<ClientConfig>,
}
impl<C> RestClient<C>
where
	C: ?Sized + RestHttpClient,
{
	/// Creates a client on top of a caller-provided transport.
	pub fn with_http_client(
		credentials: Credentials,
		config: ClientConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let config = Arc::new(config);
		let http_client = http_client.into();
		let tokens =
			Arc::new(TokenManager::new(credentials, Arc::clone(&config), Arc::clone(&http_client))?);
		let limiter = Arc::new(RateLimiter::new(config.rate_limit));

		Ok(Self { http_client, tokens, limiter, config })
	}

	/// Shares `limiter` with this client, e.g. to cap several clients with one budget.
	pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
		self.limiter = limiter;

		self
	}

	/// Validated configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Token manager backing this client.
	pub fn token_manager(&self) -> &TokenManager<C> {
		&self.tokens
	}

	/// Rate limiter gating this client.
	pub fn rate_limiter(&self) -> &RateLimiter {
		&self.limiter
	}

	/// Regional base URL, re-resolved from the current session on every call.
	pub async fn base_url(&self) -> Result<Url> {
		let region = self.tokens.current_region().await?;

		Ok(self.config.endpoints.base_url(&region)?)
	}

	/// Issues one authenticated call and returns the decoded JSON body.
	///
	/// `template` placeholders (`{network_id}`) are filled from `params`; each value lands
	/// in a single percent-encoded path segment.
	pub async fn call(
		&self,
		method: HttpMethod,
		template: &str,
		params: &[(&str, &str)],
		body: Option<Value>,
	) -> Result<Value> {
		const KIND: OperationKind = OperationKind::Call;

		let span = OperationSpan::new(KIND, "call");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span.instrument(self.execute(method, template, params, body)).await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		result
	}

	async fn execute(
		&self,
		method: HttpMethod,
		template: &str,
		params: &[(&str, &str)],
		body: Option<Value>,
	) -> Result<Value> {
		let segments = path::render_path(template, params)?;

		self.limiter.admit()?;

		let session = self.tokens.current_session().await?;
		let region = session.region_id();
		let endpoints = &self.config.endpoints;
		let url = endpoints.resolve(region, &segments)?;
		let mut headers = self.config.headers.clone();

		http::set_header(&mut headers, TOKEN_AUTH_HEADER, session.token.value.expose());
		http::set_header(&mut headers, HOST_HEADER, endpoints.host(region));

		let request =
			HttpRequest { method, url: url.clone(), headers, body, timeout: self.config.timeout };

		debug_event!(method = %method, url = %url, "Sending REST call.");

		let response = self
			.http_client
			.send(request)
			.await
			.map_err(|err| err.into_error(&url, self.config.timeout))?
			.ok_or_else(|| Error::NoResponse { url: url.to_string(), source: None })?;

		if response.status == 401 {
			debug_event!("Session rejected; dropping it before the next call.");

			self.tokens.invalidate_session(&session);
		}

		let payload = payload_of(&response)?;

		if let Some(message) = soft_error_message(&payload) {
			return Err(Error::Api {
				message,
				status: Some(response.status),
				retry_after: response.retry_after,
			});
		}
		if !response.is_success() {
			return Err(Error::Api {
				message: format!("HTTP status {}", response.status),
				status: Some(response.status),
				retry_after: response.retry_after,
			});
		}

		Ok(payload)
	}
}
#[cfg(feature = "reqwest")]
impl RestClient<ReqwestHttpClient> {
	/// Creates a client with the bundled reqwest transport, honoring the configured proxy.
	pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
		config.validate()?;

		let http_client = ReqwestHttpClient::from_config(&config)?;

		Self::with_http_client(credentials, config, http_client)
	}
}
impl<C> Clone for RestClient<C>
where
	C: ?Sized + RestHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			tokens: Arc::clone(&self.tokens),
			limiter: Arc::clone(&self.limiter),
			config: Arc::clone(&self.config),
		}
	}
}
impl<C> Debug for RestClient<C>
where
	C: ?Sized + RestHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RestClient")
			.field("tokens", &self.tokens)
			.field("limiter", &self.limiter)
			.field("config", &self.config)
			.finish()
	}
}

/// Extracts the vendor soft-error message, if the body carries one.
pub(crate) fn soft_error_message(payload: &Value) -> Option<String> {
	payload.as_object()?.get("message").map(|message| match message {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	})
}

// Unparseable bodies only matter on success; error statuses fall back to their status line.
pub(crate) fn payload_of(response: &http::HttpResponse) -> Result<Value> {
	match response.parse_json() {
		Err(_) if !response.is_success() => Ok(Value::Null),
		other => other,
	}
}
