//! Feature flag evaluation with percentage rollouts.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use contracts::flags::{FlagEvaluation, FlagReason};
use models::feature_flag;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Flags scoped to this environment match every deployment.
pub const ANY_ENVIRONMENT: &str = "all";

#[async_trait]
pub trait FlagStore: Send + Sync {
    async fn find_by_key(&self, key: &str) -> Result<Option<feature_flag::Model>, ServiceError>;
}

pub struct SeaOrmFlagStore {
    pub db: DatabaseConnection,
}

#[async_trait]
impl FlagStore for SeaOrmFlagStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<feature_flag::Model>, ServiceError> {
        Ok(feature_flag::find_by_key(&self.db, key).await?)
    }
}

pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct MockFlagStore {
        flags: HashMap<String, feature_flag::Model>,
        pub lookups: AtomicUsize,
    }

    impl MockFlagStore {
        pub fn with(flags: Vec<feature_flag::Model>) -> Self {
            Self { flags: flags.into_iter().map(|f| (f.key.clone(), f)).collect(), lookups: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl FlagStore for MockFlagStore {
        async fn find_by_key(&self, key: &str) -> Result<Option<feature_flag::Model>, ServiceError> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            Ok(self.flags.get(key).cloned())
        }
    }
}

/// 32-bit FNV-1a.
pub fn fnv1a(input: &str) -> u32 {
    const OFFSET: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    input.bytes().fold(OFFSET, |hash, b| (hash ^ u32::from(b)).wrapping_mul(PRIME))
}

/// Stable 0..100 bucket for a user within a flag.
pub fn rollout_bucket(key: &str, user_id: Uuid) -> u32 {
    fnv1a(&format!("{}:{}", key, user_id)) % 100
}

/// Applies the evaluation rules to a loaded flag.
///
/// ```
/// use contracts::flags::FlagReason;
/// use service::feature_flags::evaluate;
/// let user = uuid::Uuid::new_v4();
/// assert_eq!(evaluate("beta", None, "production", user).reason, FlagReason::NotFound);
/// ```
pub fn evaluate(key: &str, flag: Option<&feature_flag::Model>, environment: &str, user_id: Uuid) -> FlagEvaluation {
    let Some(flag) = flag else {
        return FlagEvaluation::disabled(key, FlagReason::NotFound);
    };
    if !flag.is_active || flag.archived_at.is_some() {
        return FlagEvaluation::disabled(key, FlagReason::Inactive);
    }
    if flag.environment != ANY_ENVIRONMENT && flag.environment != environment {
        return FlagEvaluation::disabled(key, FlagReason::Environment);
    }
    let percentage = flag.rollout_percentage.clamp(0, 100) as u32;
    if rollout_bucket(key, user_id) < percentage {
        FlagEvaluation { key: key.to_string(), enabled: true, value: flag.default_value.clone(), reason: FlagReason::Rollout }
    } else {
        FlagEvaluation::disabled(key, FlagReason::Excluded)
    }
}

pub struct FeatureFlagService {
    store: Arc<dyn FlagStore>,
    cache: Cache<String, Option<feature_flag::Model>>,
    environment: String,
}

impl FeatureFlagService {
    pub fn new(store: Arc<dyn FlagStore>, environment: impl Into<String>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(10_000).time_to_live(ttl).build();
        Self { store, cache, environment: environment.into() }
    }

    #[instrument(skip(self))]
    pub async fn evaluate(&self, key: &str, user_id: Uuid) -> Result<FlagEvaluation, ServiceError> {
        let flag = match self.cache.get(key).await {
            Some(hit) => hit,
            None => {
                let loaded = self.store.find_by_key(key).await?;
                self.cache.insert(key.to_string(), loaded.clone()).await;
                loaded
            }
        };
        let result = evaluate(key, flag.as_ref(), &self.environment, user_id);
        debug!(flag = %key, enabled = result.enabled, reason = ?result.reason, "flag evaluated");
        Ok(result)
    }

    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockFlagStore;
    use super::*;
    use crate::mappers::fixtures::at;
    use models::json::StringList;
    use serde_json::Value;
    use std::sync::atomic::Ordering;

    fn flag(key: &str, percentage: i32) -> feature_flag::Model {
        feature_flag::Model {
            id: Uuid::new_v4(),
            name: key.to_string(),
            key: key.to_string(),
            description: None,
            default_value: Value::Bool(true),
            rollout_percentage: percentage,
            environment: "production".into(),
            is_active: true,
            tags: StringList::default(),
            owner: None,
            archived_at: None,
            created_at: at(0),
            updated_at: at(0),
        }
    }

    #[test]
    fn fnv1a_known_vectors() {
        assert_eq!(fnv1a(""), 0x811c_9dc5);
        assert_eq!(fnv1a("a"), 0xe40c_292c);
        assert_eq!(fnv1a("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn rules_apply_in_order() {
        let user = Uuid::new_v4();
        let mut f = flag("new-dashboard", 100);
        f.is_active = false;
        assert_eq!(evaluate("new-dashboard", Some(&f), "production", user).reason, FlagReason::Inactive);

        let mut f = flag("new-dashboard", 100);
        f.archived_at = Some(at(5));
        assert_eq!(evaluate("new-dashboard", Some(&f), "production", user).reason, FlagReason::Inactive);

        let f = flag("new-dashboard", 100);
        assert_eq!(evaluate("new-dashboard", Some(&f), "staging", user).reason, FlagReason::Environment);

        let on = evaluate("new-dashboard", Some(&f), "production", user);
        assert!(on.enabled);
        assert_eq!(on.value, Value::Bool(true));
        assert_eq!(on.reason, FlagReason::Rollout);

        let off = evaluate("new-dashboard", Some(&flag("new-dashboard", 0)), "production", user);
        assert!(!off.enabled);
        assert_eq!(off.value, Value::Bool(false));
        assert_eq!(off.reason, FlagReason::Excluded);
    }

    #[test]
    fn rollout_is_sticky_and_roughly_proportional() {
        let f = flag("gradual", 30);
        let users: Vec<Uuid> = (0..2000).map(|_| Uuid::new_v4()).collect();
        let enabled = users.iter().filter(|u| evaluate("gradual", Some(&f), "production", **u).enabled).count();
        assert!((400..800).contains(&enabled), "enabled {enabled}");
        let u = users[0];
        assert_eq!(
            evaluate("gradual", Some(&f), "production", u).enabled,
            evaluate("gradual", Some(&f), "production", u).enabled
        );
    }

    #[tokio::test]
    async fn service_caches_lookups() {
        let store = Arc::new(MockFlagStore::with(vec![flag("cached", 100)]));
        let svc = FeatureFlagService::new(store.clone(), "production", Duration::from_secs(60));
        let user = Uuid::new_v4();
        assert!(svc.evaluate("cached", user).await.unwrap().enabled);
        assert!(svc.evaluate("cached", user).await.unwrap().enabled);
        assert_eq!(svc.evaluate("missing", user).await.unwrap().reason, FlagReason::NotFound);
        assert_eq!(store.lookups.load(Ordering::Relaxed), 2);

        svc.invalidate("cached").await;
        svc.evaluate("cached", user).await.unwrap();
        assert_eq!(store.lookups.load(Ordering::Relaxed), 3);
    }
}
