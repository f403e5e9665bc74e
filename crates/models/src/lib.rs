pub mod db;
pub mod enums;
pub mod json;

pub mod user_profile;
pub mod organization;
pub mod organization_membership;
pub mod assessment;
pub mod assessment_question;
pub mod user_assessment;
pub mod assessment_response;
pub mod content_category;
pub mod content_item;
pub mod community;
pub mod community_membership;
pub mod subscription_plan;
pub mod user_subscription;
pub mod audit_log;
pub mod feature_flag;

#[cfg(test)]
mod tests;
