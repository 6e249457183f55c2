//! Client configuration enumerating every recognized option.

// crates.io
use ::http::{HeaderName, HeaderValue};
// self
use crate::{_prelude::*, endpoints::Endpoints, error::ConfigError};

/// Client identifier sent as `client_specifier` at login.
pub const DEFAULT_CLIENT_SPECIFIER: &str = "iPhone 9.2 | 2.2 | 222";
/// Per-request transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(5);
/// Client-side token lifetime; the login response carries no expiry.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::minutes(5);
/// Tokens closer than this to expiry are renewed before use.
pub const DEFAULT_NEAR_EXPIRY_MARGIN: Duration = Duration::seconds(10);
/// Maximum admitted calls per rate window.
pub const DEFAULT_MAX_CALLS: usize = 10;
/// Trailing rate window.
pub const DEFAULT_RATE_WINDOW: Duration = Duration::seconds(60);

/// Sliding-window budget applied to authenticated calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
	/// Calls allowed within `window`.
	pub max_calls: usize,
	/// Trailing window length.
	pub window: Duration,
}
impl RateLimitConfig {
	/// Creates a budget of `max_calls` per `window`.
	pub fn new(max_calls: usize, window: Duration) -> Self {
		Self { max_calls, window }
	}

	/// Checks the budget admits at least one call.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_calls == 0 {
			return Err(ConfigError::ZeroRateLimit);
		}
		if !self.window.is_positive() {
			return Err(ConfigError::InvalidDuration {
				field: "rate_limit.window",
				reason: "must be positive",
			});
		}

		Ok(())
	}
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self { max_calls: DEFAULT_MAX_CALLS, window: DEFAULT_RATE_WINDOW }
	}
}

/// Options accepted by [`RestClient`](crate::client::RestClient) at construction.
///
/// Credentials are passed separately and never live in this struct, so configs can be
/// loaded from files or logged freely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Identifier sent as `client_specifier` at login.
	pub client_specifier: String,
	/// Base headers sent with every request.
	pub headers: BTreeMap<String, String>,
	/// Proxy applied by the bundled reqwest transport.
	pub proxy: Option<Url>,
	/// Per-request transport timeout.
	pub timeout: Duration,
	/// Lifetime assumed for each issued token.
	pub token_ttl: Duration,
	/// Renew tokens whose remaining lifetime falls below this margin.
	pub near_expiry_margin: Duration,
	/// Admission budget for authenticated calls.
	pub rate_limit: RateLimitConfig,
	/// Endpoint layout.
	pub endpoints: Endpoints,
}
impl ClientConfig {
	/// Overrides the login client identifier.
	pub fn with_client_specifier(mut self, specifier: impl Into<String>) -> Self {
		self.client_specifier = specifier.into();

		self
	}

	/// Adds or replaces a base header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Routes requests through `proxy`.
	pub fn with_proxy(mut self, proxy: Url) -> Self {
		self.proxy = Some(proxy);

		self
	}

	/// Overrides the per-request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the assumed token lifetime.
	pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
		self.token_ttl = ttl;

		self
	}

	/// Overrides the near-expiry renewal margin.
	pub fn with_near_expiry_margin(mut self, margin: Duration) -> Self {
		self.near_expiry_margin = margin;

		self
	}

	/// Overrides the admission budget.
	pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
		self.rate_limit = rate_limit;

		self
	}

	/// Overrides the endpoint layout.
	pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Validates every option; run by the client constructors.
	pub fn validate(&self) -> Result<(), ConfigError> {
		for (name, value) in &self.headers {
			validate_header(name, value)?;
		}

		if !self.timeout.is_positive() {
			return Err(ConfigError::InvalidDuration { field: "timeout", reason: "must be positive" });
		}
		if self.near_expiry_margin.is_negative() {
			return Err(ConfigError::InvalidDuration {
				field: "near_expiry_margin",
				reason: "must not be negative",
			});
		}
		if self.token_ttl <= self.near_expiry_margin {
			return Err(ConfigError::InvalidDuration {
				field: "token_ttl",
				reason: "must exceed the near-expiry margin",
			});
		}

		self.rate_limit.validate()?;
		self.endpoints.validate()
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			client_specifier: DEFAULT_CLIENT_SPECIFIER.into(),
			headers: BTreeMap::from([("Content-Type".into(), "application/json".into())]),
			proxy: None,
			timeout: DEFAULT_TIMEOUT,
			token_ttl: DEFAULT_TOKEN_TTL,
			near_expiry_margin: DEFAULT_NEAR_EXPIRY_MARGIN,
			rate_limit: RateLimitConfig::default(),
			endpoints: Endpoints::default(),
		}
	}
}

fn validate_header(name: &str, value: &str) -> Result<(), ConfigError> {
	let name_ok = HeaderName::from_bytes(name.as_bytes()).is_ok();
	let value_ok = HeaderValue::from_str(value).is_ok();

	if name_ok && value_ok {
		Ok(())
	} else {
		Err(ConfigError::InvalidHeader { name: name.to_owned() })
	}
}
