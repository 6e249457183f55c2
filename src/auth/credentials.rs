//! Account credentials owned by the token manager.

// self
use crate::{_prelude::*, auth::Secret};

/// Login identity (account email) plus password; immutable for the client's lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	identity: String,
	secret: Secret,
}
impl Credentials {
	/// Creates credentials for the provided identity and secret.
	pub fn new(identity: impl Into<String>, secret: impl Into<Secret>) -> Self {
		Self { identity: identity.into(), secret: secret.into() }
	}

	/// Account identity sent as `email` at login.
	pub fn identity(&self) -> &str {
		&self.identity
	}

	/// Account secret sent as `password` at login.
	pub fn secret(&self) -> &Secret {
		&self.secret
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("identity", &self.identity)
			.field("secret", &"<redacted>")
			.finish()
	}
}
