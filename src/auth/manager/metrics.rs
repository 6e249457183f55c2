//! In-process login counters read through [`TokenManager::metrics`](super::TokenManager::metrics).

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

/// Copy of the [`LoginMetrics`] counters at one moment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoginCounts {
	/// `POST /login` requests sent.
	pub attempts: u64,
	/// Logins that installed a session.
	pub successes: u64,
	/// Logins that ended in an error.
	pub failures: u64,
}

/// Counters shared by every caller of one token manager.
///
/// Only requests sent to the login endpoint count; sessions served from the cache, including
/// the ones a waiter picks up after another caller renewed, leave the counters unchanged.
#[derive(Debug, Default)]
pub struct LoginMetrics {
	sent: AtomicU64,
	accepted: AtomicU64,
	rejected: AtomicU64,
}
impl LoginMetrics {
	/// Login requests sent so far.
	pub fn attempts(&self) -> u64 {
		self.sent.load(Ordering::Relaxed)
	}

	/// Logins that installed a session.
	pub fn successes(&self) -> u64 {
		self.accepted.load(Ordering::Relaxed)
	}

	/// Logins rejected by the server or lost in transport.
	pub fn failures(&self) -> u64 {
		self.rejected.load(Ordering::Relaxed)
	}

	/// Reads every counter; a login finishing concurrently may show up in only some fields.
	pub fn snapshot(&self) -> LoginCounts {
		LoginCounts {
			attempts: self.attempts(),
			successes: self.successes(),
			failures: self.failures(),
		}
	}

	pub(crate) fn record_attempt(&self) {
		self.sent.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_outcome<T>(&self, result: &Result<T>) {
		let counter = if result.is_ok() { &self.accepted } else { &self.rejected };

		counter.fetch_add(1, Ordering::Relaxed);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn outcomes_split_into_successes_and_failures() {
		let metrics = LoginMetrics::default();

		metrics.record_attempt();
		metrics.record_outcome(&Ok(()));
		metrics.record_attempt();
		metrics.record_outcome::<()>(&Err(Error::AuthenticationFailed { message: "nope".into() }));
		metrics.record_attempt();

		assert_eq!(metrics.snapshot(), LoginCounts { attempts: 3, successes: 1, failures: 1 });
	}
}
