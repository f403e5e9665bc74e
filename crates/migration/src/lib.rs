//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user_profiles;
mod m20240101_000002_create_organizations;
mod m20240101_000003_create_assessments;
mod m20240101_000004_create_user_assessments;
mod m20240101_000005_create_content;
mod m20240101_000006_create_communities;
mod m20240101_000007_create_subscriptions;
mod m20240101_000008_create_audit_logs;
mod m20240101_000009_create_feature_flags;
mod m20240101_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user_profiles::Migration),
            Box::new(m20240101_000002_create_organizations::Migration),
            Box::new(m20240101_000003_create_assessments::Migration),
            Box::new(m20240101_000004_create_user_assessments::Migration),
            Box::new(m20240101_000005_create_content::Migration),
            Box::new(m20240101_000006_create_communities::Migration),
            Box::new(m20240101_000007_create_subscriptions::Migration),
            Box::new(m20240101_000008_create_audit_logs::Migration),
            Box::new(m20240101_000009_create_feature_flags::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000010_add_indexes::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered_with_indexes_last() {
        let names: Vec<String> = Migrator::migrations().iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names.len(), 10);
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.last().unwrap().ends_with("add_indexes"));
    }
}
