use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Error envelope shared by every failing endpoint.
#[derive(ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    /// `VALIDATION_ERROR`, `AUTHENTICATION_ERROR`, `AUTHORIZATION_ERROR`, `NOT_FOUND`,
    /// `CONFLICT`, `RATE_LIMIT_EXCEEDED`, `DATABASE_ERROR` or `INTERNAL_SERVER_ERROR`.
    pub code: String,
    #[schema(value_type = Option<Object>)]
    pub details: Option<String>,
    pub timestamp: String,
}

#[derive(ToSchema)]
pub struct DeleteBody {
    pub success: bool,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Ministry Platform API"),
    paths(
        crate::routes::health,
        crate::routes::ready,
        crate::routes::users::list,
        crate::routes::users::create,
        crate::routes::users::me,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::users::bulk,
        crate::routes::organizations::list,
        crate::routes::organizations::create,
        crate::routes::organizations::get,
        crate::routes::organizations::update,
        crate::routes::organizations::list_members,
        crate::routes::organizations::invite_member,
        crate::routes::assessments::list,
        crate::routes::assessments::create,
        crate::routes::assessments::get,
        crate::routes::assessments::add_question,
        crate::routes::assessments::start,
        crate::routes::assessments::list_mine,
        crate::routes::assessments::get_mine,
        crate::routes::assessments::update_mine,
        crate::routes::assessments::delete_mine,
        crate::routes::assessments::save_responses,
        crate::routes::assessments::complete,
        crate::routes::content::list,
        crate::routes::content::create,
        crate::routes::content::get,
        crate::routes::content::update,
        crate::routes::content::delete,
        crate::routes::content::list_categories,
        crate::routes::content::create_category,
        crate::routes::communities::list,
        crate::routes::communities::create,
        crate::routes::communities::join,
        crate::routes::subscriptions::plans,
        crate::routes::subscriptions::mine,
        crate::routes::audit_logs::list,
        crate::routes::flags::evaluate,
        crate::routes::metrics::performance,
        crate::routes::metrics::report,
    ),
    components(schemas(HealthResponse, ErrorBody, DeleteBody)),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "organizations"),
        (name = "assessments"),
        (name = "user-assessments"),
        (name = "content"),
        (name = "communities"),
        (name = "subscriptions"),
        (name = "audit"),
        (name = "feature-flags"),
        (name = "metrics")
    )
)]
pub struct ApiDoc;
