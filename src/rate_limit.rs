use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use actix_web::HttpRequest;

/// Outcome of a rate-limit check. `Denied` maps to a 429 at the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Denied,
}

struct RateLimitRecord {
    count: u32,
    window_reset_at: Instant,
}

/// Fixed-window request counter keyed by client.
///
/// The window resets when it elapses rather than sliding. Records are kept
/// for the lifetime of the process with no eviction; clients behind a shared
/// proxy IP share a bucket. Both are accepted limitations of the
/// single-process deployment model.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    records: Mutex<HashMap<String, RateLimitRecord>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, client_key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut records = self
            .records
            .lock()
            .expect("Rate limit mutex was poisoned.");

        match records.get_mut(client_key) {
            Some(record) if record.window_reset_at > now => {
                if record.count >= self.limit {
                    return RateLimitDecision::Denied;
                }
                record.count += 1;
                RateLimitDecision::Allowed
            }
            _ => {
                records.insert(
                    client_key.to_owned(),
                    RateLimitRecord {
                        count: 1,
                        window_reset_at: now + self.window,
                    },
                );
                RateLimitDecision::Allowed
            }
        }
    }
}

/// Counter for `POST /subscribe`, isolated from the unsubscribe bucket.
pub struct SubscribeRateLimiter(pub RateLimiter);

/// Counter for `POST /unsubscribe`.
pub struct UnsubscribeRateLimiter(pub RateLimiter);

/// Identifies the caller for rate limiting and analytics: the first hop of
/// `x-forwarded-for` when present, otherwise the peer address.
pub fn client_key(request: &HttpRequest) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .or_else(|| request.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_owned())
}
