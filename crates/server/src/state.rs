use std::sync::Arc;
use std::time::Duration;

use common::perf::PerformanceMonitor;
use common::rate_limit::SlidingWindowLimiter;
use configs::{AppConfig, RateLimitConfig};
use sea_orm::DatabaseConnection;
use service::assessments::{AssessmentRepository, AssessmentService, SeaOrmAssessmentRepository};
use service::content::{ContentRepository, ContentService, SeaOrmContentRepository};
use service::feature_flags::{FeatureFlagService, FlagStore, SeaOrmFlagStore};
use service::users::{SeaOrmUserRepository, UserRepository, UserService};

use crate::auth::JwtVerifier;

/// Storage behind the repository-backed services.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub assessments: Arc<dyn AssessmentRepository>,
    pub content: Arc<dyn ContentRepository>,
    pub flags: Arc<dyn FlagStore>,
}

impl Repositories {
    pub fn seaorm(db: &DatabaseConnection) -> Self {
        Self {
            users: Arc::new(SeaOrmUserRepository { db: db.clone() }),
            assessments: Arc::new(SeaOrmAssessmentRepository { db: db.clone() }),
            content: Arc::new(SeaOrmContentRepository { db: db.clone() }),
            flags: Arc::new(SeaOrmFlagStore { db: db.clone() }),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub users: Arc<UserService<dyn UserRepository>>,
    pub assessments: Arc<AssessmentService<dyn AssessmentRepository>>,
    pub content: Arc<ContentService<dyn ContentRepository>>,
    pub flags: Arc<FeatureFlagService>,
    pub auth: Arc<JwtVerifier>,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub rate_limits: Arc<RateLimitConfig>,
    pub monitor: Arc<PerformanceMonitor>,
}

impl AppState {
    pub fn new(cfg: &AppConfig, db: DatabaseConnection, repos: Repositories) -> Self {
        let flag_ttl = Duration::from_secs(cfg.feature_flags.cache_ttl_secs);
        Self {
            db,
            users: Arc::new(UserService::new(repos.users)),
            assessments: Arc::new(AssessmentService::new(repos.assessments)),
            content: Arc::new(ContentService::new(repos.content)),
            flags: Arc::new(FeatureFlagService::new(repos.flags, cfg.feature_flags.environment.clone(), flag_ttl)),
            auth: Arc::new(JwtVerifier::new(&cfg.auth)),
            limiter: Arc::new(SlidingWindowLimiter::new()),
            rate_limits: Arc::new(cfg.rate_limit.clone()),
            monitor: Arc::new(PerformanceMonitor::new(
                cfg.monitoring.max_metrics,
                cfg.monitoring.slow_request_ms as f64,
            )),
        }
    }
}
