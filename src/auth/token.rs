//! Immutable session tokens and their lifecycle helpers.

// self
use crate::{
	_prelude::*,
	auth::{Region, RegionId, Secret},
};

/// Lifecycle status for a token relative to a near-expiry margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Token is valid and outside the renewal margin.
	Active,
	/// Token is still valid but inside the renewal margin.
	NearExpiry,
	/// Token exceeded its expiry instant.
	Expired,
}

/// Auth token returned by a successful login.
///
/// Renewal produces a new value; existing tokens are never mutated.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
	/// Token value sent as `TOKEN_AUTH`; callers must avoid logging it.
	pub value: Secret,
	/// Instant the login completed.
	pub issued_at: OffsetDateTime,
	/// Client-side expiry (`issued_at + ttl`, clamped to the representable range); the server
	/// does not report one.
	pub expires_at: OffsetDateTime,
}
impl Token {
	/// Creates a token issued at `issued_at` that lives for `ttl`.
	pub fn new(value: impl Into<Secret>, issued_at: OffsetDateTime, ttl: Duration) -> Self {
		Self { value: value.into(), issued_at, expires_at: issued_at.saturating_add(ttl) }
	}

	/// Computes the lifecycle status at `instant` for the provided margin.
	pub fn status_at(&self, instant: OffsetDateTime, margin: Duration) -> TokenStatus {
		if instant >= self.expires_at {
			return TokenStatus::Expired;
		}
		if self.expires_at - instant < margin {
			return TokenStatus::NearExpiry;
		}

		TokenStatus::Active
	}

	/// Returns `true` if the token must be renewed before use at `instant`.
	pub fn is_stale_at(&self, instant: OffsetDateTime, margin: Duration) -> bool {
		!matches!(self.status_at(instant, margin), TokenStatus::Active)
	}

	/// Remaining lifetime at `instant` (negative once expired).
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		self.expires_at - instant
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("value", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Token plus the region derived from the same login; replaced as a unit on renewal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	/// Current auth token.
	pub token: Token,
	/// Account region reported alongside the token.
	pub region: Region,
}
impl Session {
	/// Creates a session from a token and region.
	pub fn new(token: Token, region: Region) -> Self {
		Self { token, region }
	}

	/// Region code used for hostnames.
	pub fn region_id(&self) -> &RegionId {
		&self.region.id
	}
}
