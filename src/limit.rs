//! Client-side sliding-window rate limiting for authenticated calls.
//!
//! The vendor enforces undocumented abuse thresholds, so the client caps its own call
//! volume. [`RateLimiter::admit`] records the attempt first and then decides: a rejected
//! call still occupies a slot in the window, which keeps bursts bounded at `max + 1`
//! recorded attempts. Admission never blocks or queues; callers receive
//! [`Error::RateLimitExceeded`] with the instant the window frees a slot.

// self
use crate::{_prelude::*, config::RateLimitConfig, obs::debug_event};

/// Successful admission summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Admission {
	/// Calls in the trailing window, including this one.
	pub count: usize,
	/// Configured maximum per window.
	pub max: usize,
}

/// Sliding-window call counter shared by every clone of a client.
#[derive(Debug)]
pub struct RateLimiter {
	config: RateLimitConfig,
	calls: Mutex<VecDeque<OffsetDateTime>>,
}
impl RateLimiter {
	/// Creates a limiter with an empty window.
	pub fn new(config: RateLimitConfig) -> Self {
		Self { config, calls: Mutex::new(VecDeque::new()) }
	}

	/// Returns the configured budget.
	pub fn config(&self) -> RateLimitConfig {
		self.config
	}

	/// Records a call at the current instant and checks the budget.
	pub fn admit(&self) -> Result<Admission> {
		let mut calls = self.calls.lock();

		self.admit_locked(&mut calls, OffsetDateTime::now_utc())
	}

	/// Records a call at `instant` and checks the budget.
	pub fn admit_at(&self, instant: OffsetDateTime) -> Result<Admission> {
		let mut calls = self.calls.lock();

		self.admit_locked(&mut calls, instant)
	}

	/// Counts calls still inside the window at `instant` without recording one.
	pub fn in_window_at(&self, instant: OffsetDateTime) -> usize {
		let horizon = instant.saturating_sub(self.config.window);

		self.calls.lock().iter().filter(|at| **at > horizon).count()
	}

	/// Forgets every recorded call.
	pub fn reset(&self) {
		self.calls.lock().clear();
	}

	fn admit_locked(
		&self,
		calls: &mut VecDeque<OffsetDateTime>,
		instant: OffsetDateTime,
	) -> Result<Admission> {
		let horizon = instant.saturating_sub(self.config.window);

		calls.push_back(instant);
		calls.retain(|at| *at > horizon);

		let count = calls.len();
		let max = self.config.max_calls;

		debug_event!(count, max, "Rate window checked.");

		if count > max {
			let oldest = calls.iter().min().copied().unwrap_or(instant);

			return Err(Error::RateLimitExceeded {
				count,
				max,
				retry_at: oldest.saturating_add(self.config.window),
			});
		}

		Ok(Admission { count, max })
	}
}
impl Default for RateLimiter {
	fn default() -> Self {
		Self::new(RateLimitConfig::default())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	const T0: OffsetDateTime = macros::datetime!(2025-01-01 00:00 UTC);

	fn limiter(max_calls: usize) -> RateLimiter {
		RateLimiter::new(RateLimitConfig::new(max_calls, Duration::seconds(60)))
	}

	#[test]
	fn window_evicts_calls_older_than_the_window() {
		let limiter = limiter(2);
		let counts = [T0, T0 + Duration::seconds(10), T0 + Duration::seconds(70)]
			.map(|at| limiter.admit_at(at).expect("Every call should be admitted.").count);

		assert_eq!(counts, [1, 2, 1]);
	}

	#[test]
	fn rejected_attempts_stay_counted() {
		let limiter = limiter(2);

		limiter.admit_at(T0).expect("First call should be admitted.");
		limiter.admit_at(T0 + Duration::seconds(1)).expect("Second call should be admitted.");

		let err = limiter
			.admit_at(T0 + Duration::seconds(2))
			.expect_err("Third call should exceed the budget.");

		match err {
			Error::RateLimitExceeded { count, max, retry_at } => {
				assert_eq!((count, max), (3, 2));
				assert_eq!(retry_at, T0 + Duration::seconds(60));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}

		assert_eq!(limiter.in_window_at(T0 + Duration::seconds(2)), 3);
		assert!(limiter.admit_at(T0 + Duration::seconds(3)).is_err());
		assert_eq!(
			limiter.admit_at(T0 + Duration::seconds(62)).expect("Window should have drained.").count,
			2,
		);
	}

	#[test]
	fn extreme_budgets_saturate_instead_of_overflowing() {
		let unbounded = RateLimiter::new(RateLimitConfig::new(usize::MAX, Duration::MAX));

		assert_eq!(unbounded.admit_at(T0).expect("First call should be admitted.").count, 1);
		assert_eq!(
			unbounded.admit_at(T0 + Duration::days(365)).expect("Second call should be admitted.").count,
			2
		);
		assert_eq!(unbounded.in_window_at(T0 + Duration::days(365)), 2);

		let single = RateLimiter::new(RateLimitConfig::new(1, Duration::MAX));

		single.admit_at(T0).expect("First call should be admitted.");

		match single.admit_at(T0 + Duration::seconds(1)) {
			Err(Error::RateLimitExceeded { count: 2, max: 1, retry_at }) => assert!(retry_at > T0),
			other => panic!("Unexpected admission result: {other:?}."),
		}
	}

	#[test]
	fn concurrent_admissions_never_exceed_the_budget() {
		let limiter = Arc::new(limiter(10));
		let admitted = std::thread::scope(|scope| {
			let handles = (0..8)
				.map(|_| {
					let limiter = Arc::clone(&limiter);

					scope.spawn(move || (0..5).filter(|_| limiter.admit().is_ok()).count())
				})
				.collect::<Vec<_>>();

			handles
				.into_iter()
				.map(|handle| handle.join().expect("Admission thread should not panic."))
				.sum::<usize>()
		});

		assert_eq!(admitted, 10);
		assert_eq!(limiter.in_window_at(OffsetDateTime::now_utc()), 40);

		limiter.reset();

		assert_eq!(limiter.in_window_at(OffsetDateTime::now_utc()), 0);
	}
}
