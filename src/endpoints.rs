//! Region-aware endpoint construction.
//!
//! Every authenticated call targets `{scheme}://rest.{region}.{domain}` and carries
//! `Host: {region}.{domain}`; login always goes through the production region. The account
//! region is only known after a successful login, so callers resolve it through the token
//! manager on every call instead of caching URLs here.

// self
use crate::{_prelude::*, auth::RegionId, error::ConfigError};

/// Vendor API domain.
pub const DEFAULT_DOMAIN: &str = "immedia-semi.com";
/// Scheme used for every call.
pub const DEFAULT_SCHEME: &str = "https";

/// Endpoint layout of the REST API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
	/// URL scheme (`https` in production).
	pub scheme: String,
	/// Domain suffix shared by all regional hosts.
	pub domain: String,
	/// Region hosting the login endpoint.
	pub login_region: RegionId,
	/// Fixed origin that replaces the regional hosts (mock servers, forward proxies).
	///
	/// The region-qualified `Host` header is still sent.
	pub origin_override: Option<Url>,
}
impl Endpoints {
	/// Routes every request to `origin` while keeping the vendor host headers.
	pub fn with_origin_override(mut self, origin: Url) -> Self {
		self.origin_override = Some(origin);

		self
	}

	/// Overrides the domain suffix.
	pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
		self.domain = domain.into();

		self
	}

	/// Login endpoint: `{scheme}://rest.{login_region}.{domain}/login`.
	pub fn login_url(&self) -> Result<Url, ConfigError> {
		self.resolve(&self.login_region, ["login"])
	}

	/// `Host` header value for login calls.
	pub fn login_host(&self) -> String {
		self.host(&self.login_region)
	}

	/// Base URL for authenticated calls in `region`.
	pub fn base_url(&self, region: &RegionId) -> Result<Url, ConfigError> {
		match &self.origin_override {
			Some(origin) => Ok(origin.clone()),
			None => {
				let raw = format!("{}://rest.{region}.{}", self.scheme, self.domain);

				Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { url: raw, source })
			},
		}
	}

	/// `Host` header value for authenticated calls in `region`.
	pub fn host(&self, region: &RegionId) -> String {
		format!("{region}.{}", self.domain)
	}

	/// Appends already-rendered path segments to the base URL for `region`.
	pub fn resolve<I, S>(&self, region: &RegionId, segments: I) -> Result<Url, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut url = self.base_url(region)?;
		let shown = url.to_string();

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidOrigin { url: shown })?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}

	/// Checks the layout can produce valid URLs.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if let Some(origin) = self.origin_override.as_ref().filter(|url| url.cannot_be_a_base()) {
			return Err(ConfigError::InvalidOrigin { url: origin.to_string() });
		}

		self.login_url().map(|_| ())
	}
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			scheme: DEFAULT_SCHEME.into(),
			domain: DEFAULT_DOMAIN.into(),
			login_region: RegionId::production(),
			origin_override: None,
		}
	}
}
