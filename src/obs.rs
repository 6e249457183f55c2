//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `blink_rest.operation` with the
//!   `operation` and `stage` (call site) fields, plus debug events for renewal and admission
//!   decisions.
//! - Enable `metrics` to increment the `blink_rest_operation_total` counter for every
//!   attempt/success/failure/throttle, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

/// Emits a debug event when tracing is enabled; compiles to nothing otherwise.
macro_rules! debug_event {
	($($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		{
			::tracing::debug!($($arg)+);
		}
	}};
}
pub(crate) use debug_event;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Credential login (token acquisition or renewal).
	Login,
	/// Authenticated REST call.
	Call,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Login => "login",
			OperationKind::Call => "call",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Rejected locally by the rate limiter.
	Throttled,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
			OperationOutcome::Throttled => "throttled",
		}
	}

	/// Classifies a finished operation.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => OperationOutcome::Success,
			Err(Error::RateLimitExceeded { .. }) => OperationOutcome::Throttled,
			Err(_) => OperationOutcome::Failure,
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
