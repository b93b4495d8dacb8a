//! Per-identity request rate limiting.
//!
//! Every accepted submission costs two outbound emails, so the limiter is
//! the only throttle against abuse of the contact form. Quota state is an
//! in-process keyed token bucket store; a dedicated service instance is
//! constructed at startup and injected where needed.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};

/// Client identity a quota is tracked against.
///
/// Resolved once per request: an authenticated user keeps the same
/// identity across addresses, everyone else is tracked by remote address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Authenticated user, keyed by stable user id.
    User(i64),
    /// Unauthenticated client, keyed by remote address.
    Anonymous(String),
}

impl Identity {
    /// Stable string key for the bucket store.
    pub fn key(&self) -> String {
        match self {
            Identity::User(id) => format!("user:{id}"),
            Identity::Anonymous(addr) => format!("addr:{addr}"),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Keyed token bucket limiter.
type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Per-identity rate limit service.
pub struct RateLimitService {
    limiter: KeyedLimiter,
    quota_per_minute: u32,
}

impl RateLimitService {
    /// Create a service allowing `quota_per_minute` requests per identity
    /// per rolling minute.
    pub fn new(quota_per_minute: u32) -> Self {
        let quota =
            Quota::per_minute(NonZeroU32::new(quota_per_minute).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::keyed(quota),
            quota_per_minute,
        }
    }

    /// Configured quota per minute.
    pub fn quota_per_minute(&self) -> u32 {
        self.quota_per_minute
    }

    /// Check and consume one slot for the identity.
    ///
    /// Atomic per key: concurrent calls for the same identity cannot both
    /// pass an exhausted bucket.
    pub fn allow(&self, identity: &Identity) -> bool {
        self.limiter.check_key(&identity.key()).is_ok()
    }

    /// Drop buckets that have been idle long enough to be full again.
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
    }

    /// Start a background task that periodically drops idle buckets.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(300)).await;
                self.cleanup();
            }
        });
    }
}
