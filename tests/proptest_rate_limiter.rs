//! Property-based tests for the in-memory rate limiter

use std::time::Duration;

use gatekeeper::adapters::{InMemoryRateLimiter, RateLimiterConfig};
use gatekeeper::ports::RateLimiter;
use proptest::prelude::*;

fn limiter(max_attempts: u32) -> InMemoryRateLimiter {
    InMemoryRateLimiter::new(RateLimiterConfig {
        max_attempts,
        window: Duration::from_secs(900),
        lockout_time: Duration::from_secs(1800),
    })
    .unwrap()
}

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn permits_exactly_max_attempts_within_window(
        max_attempts in 1u32..20u32,
        calls in 0usize..60usize
    ) {
        let permitted = paused_runtime().block_on(async {
            let limiter = limiter(max_attempts);
            let mut permitted = 0usize;
            for _ in 0..calls {
                if limiter.allow("login:ada@example.com").await.is_allowed() {
                    permitted += 1;
                }
            }
            permitted
        });

        prop_assert_eq!(permitted, calls.min(max_attempts as usize));
    }

    #[test]
    fn denials_never_exceed_lockout(
        max_attempts in 1u32..10u32,
        extra in 1usize..10usize
    ) {
        let retry_afters = paused_runtime().block_on(async {
            let limiter = limiter(max_attempts);
            let mut retry_afters = Vec::new();
            for _ in 0..(max_attempts as usize + extra) {
                if let Err(denied) = limiter.allow("login:203.0.113.7").await.into_result() {
                    retry_afters.push(denied.retry_after);
                }
            }
            retry_afters
        });

        prop_assert_eq!(retry_afters.len(), extra);
        for retry_after in retry_afters {
            prop_assert!(retry_after <= Duration::from_secs(1800));
            prop_assert!(!retry_after.is_zero());
        }
    }

    #[test]
    fn keys_are_counted_independently(
        max_attempts in 1u32..10u32,
        keys in prop::collection::hash_set("[a-z]{1,12}", 1..6)
    ) {
        let all_allowed = paused_runtime().block_on(async {
            let limiter = limiter(max_attempts);
            let mut all_allowed = true;
            for key in &keys {
                for _ in 0..max_attempts {
                    all_allowed &= limiter.allow(key).await.is_allowed();
                }
            }
            all_allowed
        });

        prop_assert!(all_allowed);
    }

    #[test]
    fn reset_restores_full_budget(
        max_attempts in 1u32..10u32,
        spent in 0u32..20u32
    ) {
        let permitted = paused_runtime().block_on(async {
            let limiter = limiter(max_attempts);
            for _ in 0..spent {
                let _ = limiter.allow("register:198.51.100.4").await;
            }
            limiter.reset("register:198.51.100.4").await;

            let mut permitted = 0u32;
            for _ in 0..max_attempts {
                if limiter.allow("register:198.51.100.4").await.is_allowed() {
                    permitted += 1;
                }
            }
            permitted
        });

        prop_assert_eq!(permitted, max_attempts);
    }
}
