//! Client-level error types shared by the token manager, rate limiter, decoders, and transport.

// self
use crate::{_prelude::*, auth::IdentifierError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Login response carried a `message` field (or a non-success status).
	#[error("Authentication failed: {message}.")]
	AuthenticationFailed {
		/// Message returned by the login endpoint.
		message: String,
	},
	/// Local admission check rejected the call; back off until `retry_at`.
	#[error("Exceeded calls to the REST API ({count}) of ({max}) within the rate window.")]
	RateLimitExceeded {
		/// Calls counted in the trailing window, including the rejected one.
		count: usize,
		/// Configured maximum per window.
		max: usize,
		/// Instant the oldest counted call leaves the window.
		retry_at: OffsetDateTime,
	},
	/// Decoder met an unrecognized `device_type`/`type` combination.
	#[error("Unknown device type `{device_type}`{}.", describe_specific(.specific))]
	UnknownDeviceType {
		/// Value of the `device_type` discriminator, or `Unknown` when missing.
		device_type: String,
		/// Value of the `type` discriminator for camera devices.
		specific: Option<String>,
	},
	/// Transport produced no response (network failure before any status code).
	#[error("No response from HTTP call to {url}.")]
	NoResponse {
		/// Target URL of the failed call.
		url: String,
		/// Transport failure, when one was reported.
		#[source]
		source: Option<TransportError>,
	},
	/// Transport gave up waiting for the server.
	#[error("HTTP call to {url} timed out after {after}.")]
	Timeout {
		/// Target URL of the failed call.
		url: String,
		/// Configured timeout.
		after: Duration,
	},
	/// Response body carried a `message` field or the status was not successful.
	#[error("REST API returned an error: {message}.")]
	Api {
		/// Vendor-supplied message (or an HTTP status summary).
		message: String,
		/// HTTP status code of the response.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Value handed to an identity-resolution helper has no usable identifier.
	#[error("Invalid resource identifier: {reason}.")]
	InvalidIdentifier {
		/// Why the value was rejected.
		reason: String,
	},
	/// Response body was not valid JSON or did not match the expected structure.
	#[error("REST API returned a body that could not be parsed.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// JSON was valid but did not have the expected shape.
	#[error("Malformed payload: {reason}.")]
	MalformedPayload {
		/// Description of the mismatch.
		reason: String,
	},
}
impl Error {
	/// Returns `true` for errors that a caller may retry after backing off.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::RateLimitExceeded { .. } | Self::NoResponse { .. } | Self::Timeout { .. })
	}

	pub(crate) fn malformed(reason: impl Into<String>) -> Self {
		Self::MalformedPayload { reason: reason.into() }
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint URL could not be assembled.
	#[error("Endpoint URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Origin override cannot carry path segments.
	#[error("Origin override `{url}` cannot be used as a base URL.")]
	InvalidOrigin {
		/// Offending URL text.
		url: String,
	},
	/// Header name or value is not a valid HTTP token.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// Duration option is out of range.
	#[error("The {field} duration is invalid: {reason}.")]
	InvalidDuration {
		/// Option name.
		field: &'static str,
		/// Why the value was rejected.
		reason: &'static str,
	},
	/// Rate limiter would reject every call.
	#[error("Rate limit must admit at least one call per window.")]
	ZeroRateLimit,
	/// Region identifier failed validation.
	#[error(transparent)]
	InvalidRegion(#[from] IdentifierError),
	/// Path template references a parameter the caller did not supply.
	#[error("Path template `{template}` is missing the `{name}` parameter.")]
	MissingPathParam {
		/// Template being rendered.
		template: String,
		/// Placeholder without a value.
		name: String,
	},
	/// Path template has unbalanced braces.
	#[error("Path template `{template}` is malformed.")]
	InvalidPathTemplate {
		/// Template being rendered.
		template: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the REST API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded its timeout.
	#[error("Request timed out while calling the REST API.")]
	Timeout,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the REST API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Converts the transport failure into the client error seen by callers.
	pub(crate) fn into_error(self, url: &Url, after: Duration) -> Error {
		match self {
			Self::Timeout => Error::Timeout { url: url.to_string(), after },
			other => Error::NoResponse { url: url.to_string(), source: Some(other) },
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

fn describe_specific(specific: &Option<String>) -> String {
	specific.as_deref().map(|value| format!(" (`{value}`)")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unknown_device_type_formats_specific_when_present() {
		let camera = Error::UnknownDeviceType {
			device_type: "camera".into(),
			specific: Some("foo".into()),
		};
		let thermostat = Error::UnknownDeviceType { device_type: "thermostat".into(), specific: None };

		assert_eq!(camera.to_string(), "Unknown device type `camera` (`foo`).");
		assert_eq!(thermostat.to_string(), "Unknown device type `thermostat`.");
	}

	#[test]
	fn transport_timeout_maps_to_timeout_error() {
		let url = Url::parse("https://rest.prde.immedia-semi.com/networks")
			.expect("Fixture URL should parse.");
		let err = TransportError::Timeout.into_error(&url, Duration::seconds(5));

		assert!(matches!(err, Error::Timeout { after, .. } if after == Duration::seconds(5)));
		assert!(err.is_retryable());

		let err = TransportError::Io(std::io::Error::other("reset")).into_error(&url, Duration::ZERO);

		match err {
			Error::NoResponse { url, source } => {
				assert_eq!(url, "https://rest.prde.immedia-semi.com/networks");
				assert!(matches!(source, Some(TransportError::Io(_))));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
