//! Transport primitives for REST API calls.
//!
//! The module exposes [`RestHttpClient`] alongside [`HttpRequest`] and [`HttpResponse`] so
//! downstream crates can plug in custom HTTP stacks. The client never retries, configures
//! TLS, or chooses proxies itself; those are the transport's concern. Implementations
//! return `Ok(None)` when a call completes without producing any response and
//! [`TransportError`] for failures before a status code was received.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, RETRY_AFTER};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::{config::ClientConfig, error::ConfigError};

/// Boxed future returned by [`RestHttpClient::send`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Option<HttpResponse>, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing REST API calls.
///
/// The trait is the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so one transport can be shared by every clone of a client and
/// by the token manager, and the futures they return must be `Send` so calls can hop
/// executors.
pub trait RestHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes `request`, honoring its timeout.
	fn send(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// HTTP verbs used by the REST API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Returns the wire name of the method.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<HttpMethod> for reqwest::Method {
	fn from(method: HttpMethod) -> Self {
		match method {
			HttpMethod::Get => reqwest::Method::GET,
			HttpMethod::Post => reqwest::Method::POST,
			HttpMethod::Put => reqwest::Method::PUT,
			HttpMethod::Delete => reqwest::Method::DELETE,
		}
	}
}

/// Fully resolved request handed to a [`RestHttpClient`].
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Absolute target URL.
	pub url: Url,
	/// Complete header set, including `TOKEN_AUTH` and `Host` for authenticated calls.
	pub headers: BTreeMap<String, String>,
	/// Optional JSON body.
	pub body: Option<Value>,
	/// Upper bound on the whole exchange.
	pub timeout: Duration,
}
impl HttpRequest {
	/// Returns the header value for `name`, compared case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}
impl Debug for HttpRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(key, value)| {
				let shown = if key.eq_ignore_ascii_case(crate::client::TOKEN_AUTH_HEADER) {
					"<redacted>"
				} else {
					value.as_str()
				};

				(key.as_str(), shown)
			})
			.collect::<BTreeMap<_, _>>();

		f.debug_struct("HttpRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("has_body", &self.body.is_some())
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Raw response returned by a [`RestHttpClient`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Undecoded response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response with a JSON body.
	pub fn json(status: u16, body: &Value) -> Self {
		Self { status, retry_after: None, body: body.to_string().into_bytes() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Parses the body as JSON; an empty body decodes to `null`.
	pub fn parse_json(&self) -> Result<Value> {
		if self.body.iter().all(u8::is_ascii_whitespace) {
			return Ok(Value::Null);
		}

		let parse_error = |source: serde_path_to_error::Error<serde_json::Error>| {
			Error::ResponseParse { source, status: Some(self.status) }
		};
		let mut de = serde_json::Deserializer::from_slice(&self.body);
		let value = serde_path_to_error::deserialize(&mut de).map_err(parse_error)?;

		// Trailing bytes after the document have no path; report them at the root.
		de.end().map_err(|e| {
			parse_error(serde_path_to_error::Error::new(serde_path_to_error::Track::new().path(), e))
		})?;

		Ok(value)
	}
}

/// Inserts `name: value`, replacing any existing header with the same name in any casing.
pub(crate) fn set_header(
	headers: &mut BTreeMap<String, String>,
	name: &str,
	value: impl Into<String>,
) {
	headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
	headers.insert(name.to_owned(), value.into());
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the configured proxy.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder();

		if let Some(proxy) = &config.proxy {
			builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
		}

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl RestHttpClient for ReqwestHttpClient {
	fn send(&self, request: HttpRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let HttpRequest { method, url, headers, body, timeout } = request;
			let mut builder = client.request(method.into(), url);

			if let Ok(timeout) = std::time::Duration::try_from(timeout) {
				builder = builder.timeout(timeout);
			}
			for (name, value) in &headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = body {
				builder = builder.body(body.to_string());
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(Some(HttpResponse { status, retry_after, body }))
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

	parse_retry_after_value(raw, OffsetDateTime::now_utc())
}

#[cfg_attr(not(feature = "reqwest"), allow(dead_code))]
fn parse_retry_after_value(raw: &str, now: OffsetDateTime) -> Option<Duration> {
	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(secs.into()));
	}

	let moment = OffsetDateTime::parse(raw, &Rfc2822).ok()?;
	let delta = moment - now;

	delta.is_positive().then_some(delta)
}
