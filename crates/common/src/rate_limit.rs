//! Sliding-window rate limiter kept in process memory.
//!
//! Each key owns a queue of hit instants. A check first drops hits that
//! left the window, then admits the request while fewer than `max_requests`
//! remain. Denied requests are not recorded, so a throttled client regains
//! capacity as soon as its oldest admitted hit ages out.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// At most `max_requests` hits per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub max_requests: u32,
    pub window: Duration,
}

impl Rule {
    pub const fn new(max_requests: u32, window: Duration) -> Self {
        Self { max_requests, window }
    }

    pub fn per_secs(max_requests: u32, window_secs: u64) -> Self {
        Self::new(max_requests, Duration::from_secs(window_secs))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the oldest hit in the window expires.
    pub reset_after: Duration,
}

impl RateLimitDecision {
    /// Unix timestamp (seconds) at which capacity frees up.
    pub fn reset_at_epoch_secs(&self) -> u64 {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        (now + self.reset_after).as_secs()
    }

    /// Whole seconds to wait before retrying, never less than one.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        let rounded = if self.reset_after.subsec_nanos() > 0 { secs + 1 } else { secs };
        rounded.max(1)
    }
}

/// How a request is mapped to a limiter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    Ip,
    User,
}

impl KeyStrategy {
    /// Build the store key. The preset name keeps separate budgets per route group.
    pub fn key(&self, preset: &str, ip: &str, user_id: Option<&str>) -> String {
        match (self, user_id) {
            (KeyStrategy::User, Some(user)) => format!("user_rate_limit:{preset}:{user}"),
            _ => format!("rate_limit:{preset}:{ip}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct SlidingWindowLimiter {
    hits: DashMap<String, VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, key: &str, rule: Rule) -> RateLimitDecision {
        self.check_at(key, rule, Instant::now())
    }

    pub fn check_at(&self, key: &str, rule: Rule, now: Instant) -> RateLimitDecision {
        let mut entry = self.hits.entry(key.to_string()).or_default();
        let window = entry.value_mut();

        while let Some(oldest) = window.front() {
            if now.saturating_duration_since(*oldest) >= rule.window {
                window.pop_front();
            } else {
                break;
            }
        }

        let allowed = (window.len() as u64) < rule.max_requests as u64;
        if allowed {
            window.push_back(now);
        } else {
            debug!(%key, limit = rule.max_requests, "rate limit exceeded");
        }

        let used = window.len().min(u32::MAX as usize) as u32;
        let reset_after = window
            .front()
            .map(|oldest| rule.window.saturating_sub(now.saturating_duration_since(*oldest)))
            .unwrap_or(rule.window);

        RateLimitDecision {
            allowed,
            limit: rule.max_requests,
            remaining: rule.max_requests.saturating_sub(used),
            reset_after,
        }
    }

    /// Drop keys whose newest hit is older than `max_window`. Returns how many were removed.
    pub fn purge_expired(&self, max_window: Duration) -> usize {
        self.purge_expired_at(max_window, Instant::now())
    }

    pub fn purge_expired_at(&self, max_window: Duration, now: Instant) -> usize {
        let before = self.hits.len();
        self.hits.retain(|_, hits| {
            hits.back()
                .map(|newest| now.saturating_duration_since(*newest) < max_window)
                .unwrap_or(false)
        });
        before.saturating_sub(self.hits.len())
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Periodically purge idle keys on the current tokio runtime.
    pub fn spawn_cleanup(self: &Arc<Self>, every: Duration, max_window: Duration) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = limiter.purge_expired(max_window);
                if removed > 0 {
                    info!(event = "rate_limit_cleanup", removed, remaining = limiter.len(), "purged idle rate limit keys");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_secs(60);

    #[test]
    fn allows_exactly_max_within_window() {
        let limiter = SlidingWindowLimiter::new();
        let rule = Rule::new(3, MIN);
        let t0 = Instant::now();

        let d1 = limiter.check_at("k", rule, t0);
        let d2 = limiter.check_at("k", rule, t0 + Duration::from_secs(1));
        let d3 = limiter.check_at("k", rule, t0 + Duration::from_secs(2));
        let d4 = limiter.check_at("k", rule, t0 + Duration::from_secs(3));

        assert!(d1.allowed && d2.allowed && d3.allowed);
        assert_eq!((d1.remaining, d2.remaining, d3.remaining), (2, 1, 0));
        assert!(!d4.allowed);
        assert_eq!(d4.remaining, 0);
        assert_eq!(d4.limit, 3);
        assert_eq!(d4.reset_after, Duration::from_secs(57));
    }

    #[test]
    fn window_slides_per_hit() {
        let limiter = SlidingWindowLimiter::new();
        let rule = Rule::new(2, MIN);
        let t0 = Instant::now();

        assert!(limiter.check_at("k", rule, t0).allowed);
        assert!(limiter.check_at("k", rule, t0 + Duration::from_secs(30)).allowed);
        assert!(!limiter.check_at("k", rule, t0 + Duration::from_secs(59)).allowed);

        // the first hit has aged out, the second has not
        let d = limiter.check_at("k", rule, t0 + Duration::from_secs(60));
        assert!(d.allowed);
        assert_eq!(d.remaining, 0);
        assert!(!limiter.check_at("k", rule, t0 + Duration::from_secs(61)).allowed);
        assert!(limiter.check_at("k", rule, t0 + Duration::from_secs(90)).allowed);
    }

    #[test]
    fn denied_hits_are_not_recorded() {
        let limiter = SlidingWindowLimiter::new();
        let rule = Rule::new(1, MIN);
        let t0 = Instant::now();

        assert!(limiter.check_at("k", rule, t0).allowed);
        for s in 1..50 {
            assert!(!limiter.check_at("k", rule, t0 + Duration::from_secs(s)).allowed);
        }
        assert!(limiter.check_at("k", rule, t0 + MIN).allowed);
    }

    #[test]
    fn keys_are_independent() {
        let limiter = SlidingWindowLimiter::new();
        let rule = Rule::new(1, MIN);
        let t0 = Instant::now();

        assert!(limiter.check_at("a", rule, t0).allowed);
        assert!(limiter.check_at("b", rule, t0).allowed);
        assert!(!limiter.check_at("a", rule, t0).allowed);
        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn purge_removes_idle_keys_only() {
        let limiter = SlidingWindowLimiter::new();
        let rule = Rule::new(5, MIN);
        let t0 = Instant::now();

        limiter.check_at("idle", rule, t0);
        limiter.check_at("busy", rule, t0 + Duration::from_secs(100));

        let removed = limiter.purge_expired_at(MIN, t0 + Duration::from_secs(120));
        assert_eq!(removed, 1);
        assert_eq!(limiter.len(), 1);
    }

    #[test]
    fn empty_window_resets_after_full_window() {
        let limiter = SlidingWindowLimiter::new();
        let rule = Rule::new(0, MIN);
        let d = limiter.check_at("k", rule, Instant::now());
        assert!(!d.allowed);
        assert_eq!(d.reset_after, MIN);
        assert_eq!(d.retry_after_secs(), 60);
    }

    #[test]
    fn retry_after_rounds_up() {
        let d = RateLimitDecision {
            allowed: false,
            limit: 1,
            remaining: 0,
            reset_after: Duration::from_millis(1500),
        };
        assert_eq!(d.retry_after_secs(), 2);
        let zero = RateLimitDecision { reset_after: Duration::ZERO, ..d };
        assert_eq!(zero.retry_after_secs(), 1);
    }

    #[test]
    fn key_strategy_formats() {
        assert_eq!(KeyStrategy::Ip.key("api", "1.2.3.4", Some("u1")), "rate_limit:api:1.2.3.4");
        assert_eq!(KeyStrategy::User.key("bulk", "1.2.3.4", Some("u1")), "user_rate_limit:bulk:u1");
        assert_eq!(KeyStrategy::User.key("bulk", "1.2.3.4", None), "rate_limit:bulk:1.2.3.4");
    }

    #[tokio::test]
    async fn cleanup_task_can_be_aborted() {
        let limiter = Arc::new(SlidingWindowLimiter::new());
        let handle = limiter.spawn_cleanup(Duration::from_millis(10), MIN);
        tokio::time::sleep(Duration::from_millis(25)).await;
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }
}
