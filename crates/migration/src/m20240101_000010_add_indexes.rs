use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[(&str, &str, &[&str])] = &[
    ("idx_user_profiles_account_status", "user_profiles", &["account_status"]),
    ("idx_user_profiles_ministry_role", "user_profiles", &["ministry_role"]),
    ("idx_org_membership_org", "organization_memberships", &["organization_id", "status"]),
    ("idx_assessments_status_published", "assessments", &["status", "published_at"]),
    ("idx_questions_assessment_order", "assessment_questions", &["assessment_id", "order_index"]),
    ("idx_user_assessments_user", "user_assessments", &["user_id", "created_at"]),
    ("idx_content_status_published", "content_items", &["status", "published_at"]),
    ("idx_content_author", "content_items", &["author_id"]),
    ("idx_content_category", "content_items", &["primary_category_id"]),
    ("idx_communities_active", "communities", &["is_active", "created_at"]),
    ("idx_subscriptions_user", "user_subscriptions", &["user_id"]),
    ("idx_audit_user_created", "audit_logs", &["user_id", "created_at"]),
    ("idx_audit_resource", "audit_logs", &["resource", "resource_id"]),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, cols) in INDEXES {
            let mut index = Index::create();
            index.name(*name).table(Alias::new(*table)).if_not_exists();
            for col in *cols {
                index.col(Alias::new(*col));
            }
            manager.create_index(index.to_owned()).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _) in INDEXES.iter().rev() {
            manager
                .drop_index(Index::drop().name(*name).table(Alias::new(*table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
