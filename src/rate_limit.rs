use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::debug;

use crate::clock::Clock;
use crate::metrics::RATE_LIMIT_RECORDS;
use crate::models::Endpoint;

// Longest window a limiter accepts; keeps `now + window` far from Instant overflow
pub const MAX_WINDOW: Duration = Duration::from_secs(365 * 24 * 60 * 60);

// Rate limit record - tracks requests per client identifier within one fixed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub count: u32,
    pub window_reset_at: Instant,
}

/// Fixed-window limiter for a single endpoint.
///
/// The shard write guard returned by `DashMap::entry` is held for the whole
/// read-decide-write in [`RateLimiter::admit`], so two requests for the same
/// client can never both see `count < max`.
pub struct RateLimiter {
    records: DashMap<String, RateLimitRecord>,
    max_requests: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    // Windows above MAX_WINDOW are clamped to it
    pub fn new(max_requests: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            max_requests,
            window: window.min(MAX_WINDOW),
            clock,
        }
    }

    pub fn admit(&self, client_id: &str) -> bool {
        let now = self.clock.now();

        let mut record = self
            .records
            .entry(client_id.to_string())
            .or_insert(RateLimitRecord {
                count: 0,
                window_reset_at: now + self.window,
            });

        // window elapsed..? start a new one
        if now >= record.window_reset_at {
            record.count = 1;
            record.window_reset_at = now + self.window;
            return true;
        }

        if record.count < self.max_requests {
            record.count += 1;
            return true;
        }

        // over limit, count stays where it is
        false
    }

    // Drop records whose window is over; a later request simply recreates them
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.records.len();
        self.records.retain(|_, record| now < record.window_reset_at);
        before.saturating_sub(self.records.len())
    }

    pub fn record(&self, client_id: &str) -> Option<RateLimitRecord> {
        self.records.get(client_id).map(|r| *r)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// One independent table per endpoint
pub struct EndpointLimiters {
    pub contact: RateLimiter,
    pub booking: RateLimiter,
}

impl EndpointLimiters {
    pub fn new(
        contact_max: u32,
        booking_max: u32,
        window: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            contact: RateLimiter::new(contact_max, window, Arc::clone(&clock)),
            booking: RateLimiter::new(booking_max, window, clock),
        }
    }

    pub fn get(&self, endpoint: Endpoint) -> &RateLimiter {
        match endpoint {
            Endpoint::Contact => &self.contact,
            Endpoint::Booking => &self.booking,
        }
    }

    pub fn admit(&self, endpoint: Endpoint, client_id: &str) -> bool {
        self.get(endpoint).admit(client_id)
    }

    pub fn evict_expired(&self) {
        for endpoint in [Endpoint::Contact, Endpoint::Booking] {
            let limiter = self.get(endpoint);
            let evicted = limiter.evict_expired();
            RATE_LIMIT_RECORDS
                .with_label_values(&[endpoint.as_str()])
                .set(limiter.len() as i64);
            if evicted > 0 {
                debug!(%endpoint, evicted, remaining = limiter.len(), "evicted expired rate limit records");
            }
        }
    }
}

// Background eviction loop, keeps the tables bounded by recently active clients
pub async fn sweeper(limiters: Arc<EndpointLimiters>, every: Duration) {
    let mut interval = interval(every);

    debug!(?every, "rate limit sweeper started");

    loop {
        interval.tick().await;
        limiters.evict_expired();
    }
}
