//! Service-region identifiers derived from the login response.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const REGION_MAX_LEN: usize = 63;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier contains a character that cannot appear in a host label.
	#[error("{kind} identifier contains the invalid character {found:?}.")]
	InvalidCharacter {
		/// Kind of identifier.
		kind: &'static str,
		/// First offending character.
		found: char,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier.
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Short region code (e.g. `prde`, `prod`) embedded in every API hostname.
///
/// Validated as a DNS label so it can be spliced into `rest.{region}.{domain}` safely.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionId(String);
impl RegionId {
	/// Creates a new region identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_label(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Region serving the login endpoint before the account region is known.
	pub fn production() -> Self {
		Self("prod".to_owned())
	}
}
impl Deref for RegionId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for RegionId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for RegionId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<RegionId> for String {
	fn from(value: RegionId) -> Self {
		value.0
	}
}
impl TryFrom<String> for RegionId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_label(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for RegionId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for RegionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Region({})", self.0)
	}
}
impl Display for RegionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Region advertised by the login response: code plus human-readable name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
	/// Region code used in hostnames.
	pub id: RegionId,
	/// Display name (e.g. `Europe`); empty when the server omits it.
	pub name: String,
}
impl Region {
	/// Picks the account region from the login response's `region` map.
	///
	/// The first entry in server order wins; display names that are not strings are ignored.
	pub fn from_login_map(map: &Map<String, Value>) -> Result<Self> {
		let (code, name) =
			map.iter().next().ok_or_else(|| Error::malformed("login response lists no region"))?;
		let id = RegionId::new(code).map_err(crate::error::ConfigError::from)?;

		Ok(Self { id, name: name.as_str().unwrap_or_default().to_owned() })
	}
}

fn validate_label(view: &str) -> Result<(), IdentifierError> {
	const KIND: &str = "Region";

	if view.is_empty() {
		return Err(IdentifierError::Empty { kind: KIND });
	}
	if let Some(found) = view.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-')) {
		return Err(IdentifierError::InvalidCharacter { kind: KIND, found });
	}
	if view.len() > REGION_MAX_LEN {
		return Err(IdentifierError::TooLong { kind: KIND, max: REGION_MAX_LEN });
	}

	Ok(())
}
