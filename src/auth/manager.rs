//! Token acquisition and silent renewal with a single-flight guard.
//!
//! [`TokenManager::current_session`] hands out the current [`Session`] when it is outside the
//! near-expiry margin. Otherwise the caller takes the renewal guard, re-checks (a concurrent
//! caller may have renewed while it waited), and performs at most one `POST /login`. Reads
//! never wait on the guard; only callers that observed a stale token do. A successful login
//! swaps token and region together; a failed one leaves the previous session untouched.

mod metrics;

pub use metrics::{LoginCounts, LoginMetrics};

// self
use crate::{
	_prelude::*,
	auth::{Credentials, Region, RegionId, Session, Token},
	client::{self, HOST_HEADER},
	config::ClientConfig,
	http::{self, HttpMethod, HttpRequest, RestHttpClient},
	obs::{self, OperationKind, OperationOutcome, OperationSpan, debug_event},
};

#[derive(Deserialize)]
struct LoginResponse {
	authtoken: AuthTokenBody,
	region: Map<String, Value>,
}

#[derive(Deserialize)]
struct AuthTokenBody {
	authtoken: String,
}

/// Owns the credentials and the current session for one account.
pub struct TokenManager<C>
where
	C: ?Sized + RestHttpClient,
{
	http_client: Arc<C>,
	credentials: Credentials,
	config: Arc<ClientConfig>,
	current: RwLock<Option<Arc<Session>>>,
	renewal: AsyncMutex<()>,
	metrics: LoginMetrics,
}
impl<C> TokenManager<C>
where
	C: ?Sized + RestHttpClient,
{
	/// Creates a manager without a session; the first use triggers a login.
	///
	/// Fails when `config` does not validate, e.g. a margin that would make every token stale.
	pub fn new(
		credentials: Credentials,
		config: impl Into<Arc<ClientConfig>>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let config = config.into();

		config.validate()?;

		Ok(Self {
			http_client: http_client.into(),
			credentials,
			config,
			current: RwLock::new(None),
			renewal: AsyncMutex::new(()),
			metrics: LoginMetrics::default(),
		})
	}

	/// Account identity used at login.
	pub fn identity(&self) -> &str {
		self.credentials.identity()
	}

	/// Login counters for this manager.
	pub fn metrics(&self) -> &LoginMetrics {
		&self.metrics
	}

	/// Returns the current session without renewing it.
	pub fn session(&self) -> Option<Arc<Session>> {
		self.current.read().clone()
	}

	/// Replaces the current session with one obtained elsewhere.
	pub fn install_session(&self, session: Session) {
		*self.current.write() = Some(Arc::new(session));
	}

	/// Drops the current session; the next use logs in again.
	pub fn invalidate(&self) {
		*self.current.write() = None;
	}

	/// Returns a token outside the near-expiry margin, renewing first when needed.
	pub async fn current_token(&self) -> Result<Token> {
		Ok(self.current_session().await?.token.clone())
	}

	/// Returns the region of the most recent successful login, renewing first when needed.
	pub async fn current_region(&self) -> Result<RegionId> {
		Ok(self.current_session().await?.region.id.clone())
	}

	/// Returns token and region from the same login, renewing first when needed.
	pub async fn current_session(&self) -> Result<Arc<Session>> {
		if let Some(session) = self.fresh_session(OffsetDateTime::now_utc()) {
			return Ok(session);
		}

		let _singleflight = self.renewal.lock().await;

		if let Some(session) = self.fresh_session(OffsetDateTime::now_utc()) {
			debug_event!("Reusing the session renewed by a concurrent caller.");

			return Ok(session);
		}

		self.renew_locked().await
	}

	/// Logs in regardless of the current token's freshness.
	pub async fn renew(&self) -> Result<Arc<Session>> {
		let _singleflight = self.renewal.lock().await;

		self.renew_locked().await
	}

	/// Drops `stale` if it is still the current session.
	pub(crate) fn invalidate_session(&self, stale: &Arc<Session>) {
		let mut current = self.current.write();

		if current.as_ref().is_some_and(|session| Arc::ptr_eq(session, stale)) {
			*current = None;
		}
	}

	fn fresh_session(&self, now: OffsetDateTime) -> Option<Arc<Session>> {
		self.current
			.read()
			.as_ref()
			.filter(|session| !session.token.is_stale_at(now, self.config.near_expiry_margin))
			.cloned()
	}

	async fn renew_locked(&self) -> Result<Arc<Session>> {
		let session = Arc::new(self.login().await?);

		*self.current.write() = Some(Arc::clone(&session));

		Ok(session)
	}

	async fn login(&self) -> Result<Session> {
		const KIND: OperationKind = OperationKind::Login;

		let span = OperationSpan::new(KIND, "login");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span.instrument(self.request_session()).await;

		self.metrics.record_outcome(&result);
		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		result
	}

	async fn request_session(&self) -> Result<Session> {
		let endpoints = &self.config.endpoints;
		let url = endpoints.login_url()?;
		let mut headers = self.config.headers.clone();

		http::set_header(&mut headers, HOST_HEADER, endpoints.login_host());

		let body = serde_json::json!({
			"email": self.credentials.identity(),
			"password": self.credentials.secret().expose(),
			"client_specifier": self.config.client_specifier,
		});
		let request = HttpRequest {
			method: HttpMethod::Post,
			url: url.clone(),
			headers,
			body: Some(body),
			timeout: self.config.timeout,
		};

		debug_event!(url = %url, "Requesting a new auth token.");

		let response = self
			.http_client
			.send(request)
			.await
			.map_err(|err| err.into_error(&url, self.config.timeout))?
			.ok_or_else(|| Error::NoResponse { url: url.to_string(), source: None })?;
		let payload = client::payload_of(&response)?;

		if let Some(message) = client::soft_error_message(&payload) {
			return Err(Error::AuthenticationFailed { message });
		}
		if !response.is_success() {
			return Err(Error::AuthenticationFailed {
				message: format!("HTTP status {}", response.status),
			});
		}

		let parsed: LoginResponse = serde_path_to_error::deserialize(&payload)
			.map_err(|source| Error::ResponseParse { source, status: Some(response.status) })?;

		if parsed.authtoken.authtoken.is_empty() {
			return Err(Error::malformed("login response carries an empty auth token"));
		}

		let region = Region::from_login_map(&parsed.region)?;
		let token = Token::new(
			parsed.authtoken.authtoken,
			OffsetDateTime::now_utc(),
			self.config.token_ttl,
		);

		debug_event!(region = %region.id, expires_at = %token.expires_at, "Auth token renewed.");

		Ok(Session::new(token, region))
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + RestHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("credentials", &self.credentials)
			.field("session", &self.current.read().as_deref())
			.finish()
	}
}
