use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use contracts::users::UserFilters;
use contracts::PageRequest;
use models::user_profile;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Persistence for user profiles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self, filters: &UserFilters, page: &PageRequest) -> Result<(Vec<user_profile::Model>, u64), ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<user_profile::Model>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<user_profile::Model>, ServiceError>;
    async fn insert(&self, profile: user_profile::Model) -> Result<user_profile::Model, ServiceError>;
    async fn update(&self, profile: user_profile::Model) -> Result<user_profile::Model, ServiceError>;
    /// Returns false when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn touch_last_active(&self, id: Uuid, at: DateTime<FixedOffset>) -> Result<(), ServiceError>;
}

/// In-memory repository for tests and router-level checks.
pub mod mock {
    use super::*;
    use crate::errors::unique_violation;
    use crate::pagination::{matches_search, slice_page};
    use contracts::SortOrder;
    use std::cmp::Ordering;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserRepository {
        rows: Mutex<HashMap<Uuid, user_profile::Model>>,
    }

    impl MockUserRepository {
        pub fn with(profiles: Vec<user_profile::Model>) -> Self {
            let repo = Self::default();
            if let Ok(mut rows) = repo.rows.lock() {
                rows.extend(profiles.into_iter().map(|p| (p.id, p)));
            }
            repo
        }
    }

    fn lock_err() -> ServiceError {
        ServiceError::Internal("user store poisoned".into())
    }

    fn compare(a: &user_profile::Model, b: &user_profile::Model, sort: Option<&str>) -> Ordering {
        match sort {
            Some("updatedAt") => a.updated_at.cmp(&b.updated_at),
            Some("email") => a.email.cmp(&b.email),
            Some("lastName") => a.last_name.cmp(&b.last_name),
            Some("lastActiveAt") => a.last_active_at.cmp(&b.last_active_at),
            _ => a.created_at.cmp(&b.created_at),
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn list(&self, filters: &UserFilters, page: &PageRequest) -> Result<(Vec<user_profile::Model>, u64), ServiceError> {
            let rows = self.rows.lock().map_err(|_| lock_err())?;
            let mut items: Vec<user_profile::Model> = rows
                .values()
                .filter(|u| {
                    filters.search.as_deref().map_or(true, |s| {
                        matches_search(s, &[Some(&u.first_name), Some(&u.last_name), u.display_name.as_deref(), Some(&u.email)])
                    })
                })
                .filter(|u| filters.ministry_role.map_or(true, |r| u.ministry_role == r))
                .filter(|u| filters.account_status.map_or(true, |s| u.account_status == s))
                .filter(|u| filters.subscription_tier.map_or(true, |t| u.subscription_tier == t))
                .filter(|u| filters.country_code.as_deref().map_or(true, |c| u.country_code.as_deref() == Some(c)))
                .cloned()
                .collect();
            items.sort_by(|a, b| {
                let ord = compare(a, b, page.sort.as_deref());
                if page.order == SortOrder::Desc { ord.reverse() } else { ord }
            });
            let total = items.len() as u64;
            Ok((slice_page(&items, page), total))
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<user_profile::Model>, ServiceError> {
            Ok(self.rows.lock().map_err(|_| lock_err())?.get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<user_profile::Model>, ServiceError> {
            let email = email.to_lowercase();
            Ok(self.rows.lock().map_err(|_| lock_err())?.values().find(|u| u.email == email).cloned())
        }

        async fn insert(&self, profile: user_profile::Model) -> Result<user_profile::Model, ServiceError> {
            let mut rows = self.rows.lock().map_err(|_| lock_err())?;
            if rows.contains_key(&profile.id) || rows.values().any(|u| u.email == profile.email) {
                return Err(unique_violation("user_profiles"));
            }
            rows.insert(profile.id, profile.clone());
            Ok(profile)
        }

        async fn update(&self, profile: user_profile::Model) -> Result<user_profile::Model, ServiceError> {
            let mut rows = self.rows.lock().map_err(|_| lock_err())?;
            match rows.get_mut(&profile.id) {
                Some(row) => {
                    *row = profile.clone();
                    Ok(profile)
                }
                None => Err(ServiceError::not_found("User", profile.id)),
            }
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().map_err(|_| lock_err())?.remove(&id).is_some())
        }

        async fn touch_last_active(&self, id: Uuid, at: DateTime<FixedOffset>) -> Result<(), ServiceError> {
            if let Some(row) = self.rows.lock().map_err(|_| lock_err())?.get_mut(&id) {
                row.last_active_at = at;
            }
            Ok(())
        }
    }
}
