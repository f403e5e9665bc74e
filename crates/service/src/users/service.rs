use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use contracts::users::{CreateUserProfileRequest, UpdateUserProfileRequest, UserFilters, UserProfileResponse};
use contracts::{PageRequest, PaginatedResponse, Validate};
use models::enums::{AccountStatus, SubscriptionTier};
use models::user_profile;
use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::repository::UserRepository;
use crate::bulk::{decode, BulkHandler};
use crate::errors::ServiceError;
use crate::mappers::users::to_user_profile;

const ENTITY: &str = "User";

/// User profile business rules, independent of the web framework.
pub struct UserService<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &UserFilters, page: &PageRequest) -> Result<PaginatedResponse<UserProfileResponse>, ServiceError> {
        filters.validate()?;
        let (rows, total) = self.repo.list(filters, page).await?;
        Ok(PaginatedResponse::new(rows.into_iter().map(to_user_profile).collect(), page, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<UserProfileResponse, ServiceError> {
        let row = self.repo.find_by_id(id).await?.ok_or(ServiceError::not_found(ENTITY, id))?;
        Ok(to_user_profile(row))
    }

    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserProfileResponse>, ServiceError> {
        Ok(self.repo.find_by_email(email).await?.map(to_user_profile))
    }

    /// Creates a profile with the given id.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::users::{repository::mock::MockUserRepository, UserService};
    /// let svc = UserService::new(Arc::new(MockUserRepository::default()));
    /// let req = serde_json::from_value(serde_json::json!({
    ///     "email": "Lydia@Church.org", "firstName": "Lydia", "lastName": "Thyatira", "ministryRole": "missionary"
    /// })).unwrap();
    /// let user = tokio_test::block_on(svc.create(uuid::Uuid::new_v4(), req)).unwrap();
    /// assert_eq!(user.email, "lydia@church.org");
    /// assert_eq!(user.full_name, "Lydia Thyatira");
    /// ```
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn create(&self, id: Uuid, req: CreateUserProfileRequest) -> Result<UserProfileResponse, ServiceError> {
        req.validate()?;
        let email = req.email.trim().to_lowercase();
        if let Some(existing) = self.repo.find_by_email(&email).await? {
            debug!(user_id = %existing.id, "email already registered");
            return Err(ServiceError::Conflict("User with this email already exists".into()));
        }
        if self.repo.find_by_id(id).await?.is_some() {
            return Err(ServiceError::Conflict("User profile already exists".into()));
        }

        let now = Utc::now().fixed_offset();
        let profile = user_profile::Model {
            id,
            email,
            first_name: req.first_name,
            last_name: req.last_name,
            display_name: req.display_name,
            bio: req.bio,
            avatar_url: req.avatar_url,
            ministry_role: req.ministry_role,
            denomination: req.denomination,
            organization_name: req.organization_name,
            years_in_ministry: req.years_in_ministry,
            country_code: req.country_code,
            timezone: req.timezone,
            language_primary: req.language_primary.unwrap_or_else(|| "en".to_string()),
            cultural_context: req.cultural_context,
            leader_tier: req.leader_tier,
            subdomain: req.subdomain,
            custom_domain: req.custom_domain,
            brand_colors: Some(req.brand_colors.unwrap_or_default()),
            subscription_tier: SubscriptionTier::Free,
            theological_focus: req.theological_focus.into(),
            email_notifications: Some(req.email_notifications.unwrap_or_default()),
            privacy_settings: Some(req.privacy_settings.unwrap_or_default()),
            onboarding_completed: false,
            onboarding_step: 1,
            account_status: AccountStatus::PendingVerification,
            created_at: now,
            updated_at: now,
            last_active_at: now,
        };
        let created = self.repo.insert(profile).await?;
        info!(event = "user_created", user_id = %created.id);
        Ok(to_user_profile(created))
    }

    /// Only the profile owner may update it.
    #[instrument(skip(self, req))]
    pub async fn update(&self, actor: Uuid, id: Uuid, req: UpdateUserProfileRequest) -> Result<UserProfileResponse, ServiceError> {
        req.validate()?;
        if actor != id {
            return Err(ServiceError::access_denied());
        }
        let mut row = self.repo.find_by_id(id).await?.ok_or(ServiceError::not_found(ENTITY, id))?;

        macro_rules! assign {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(v) = req.$field { row.$field = v; })+
            };
        }
        macro_rules! assign_opt {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(v) = req.$field { row.$field = Some(v); })+
            };
        }
        assign!(first_name, last_name, ministry_role, language_primary, onboarding_completed, onboarding_step);
        assign_opt!(
            display_name, bio, avatar_url, denomination, organization_name, years_in_ministry, country_code, timezone,
            cultural_context, leader_tier, subdomain, custom_domain, brand_colors, email_notifications, privacy_settings,
        );
        if let Some(focus) = req.theological_focus {
            row.theological_focus = focus.into();
        }
        row.updated_at = Utc::now().fixed_offset();

        let updated = self.repo.update(row).await?;
        info!(event = "user_updated", user_id = %updated.id);
        Ok(to_user_profile(updated))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, actor: Uuid, id: Uuid) -> Result<(), ServiceError> {
        if actor != id {
            return Err(ServiceError::access_denied());
        }
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        info!(event = "user_deleted", user_id = %id);
        Ok(())
    }

    pub async fn touch_last_active(&self, id: Uuid) -> Result<(), ServiceError> {
        self.repo.touch_last_active(id, Utc::now().fixed_offset()).await
    }
}

#[async_trait]
impl<R: UserRepository + ?Sized> BulkHandler for UserService<R> {
    async fn bulk_create(&self, _actor: Uuid, data: Value) -> Result<(Uuid, Value), ServiceError> {
        let req: CreateUserProfileRequest = decode(data)?;
        let created = self.create(Uuid::new_v4(), req).await?;
        let id = created.id;
        let json = serde_json::to_value(created).map_err(|e| ServiceError::Internal(e.to_string()))?;
        Ok((id, json))
    }

    async fn bulk_update(&self, actor: Uuid, id: Uuid, data: Value) -> Result<Value, ServiceError> {
        let req: UpdateUserProfileRequest = decode(data)?;
        let updated = self.update(actor, id, req).await?;
        serde_json::to_value(updated).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    async fn bulk_delete(&self, actor: Uuid, id: Uuid) -> Result<(), ServiceError> {
        self.delete(actor, id).await
    }
}
