use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::ApestDimension;
use crate::json::{StringList, UuidList};
use crate::{assessment, user_profile};

/// One attempt of a user at an assessment, with its stored results.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_assessments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub assessment_id: Uuid,
    pub started_at: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub completion_percentage: i32,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub raw_scores: Option<Json>,
    pub total_score: Option<i32>,
    pub max_possible_score: Option<i32>,
    pub apostolic_score: Option<i32>,
    pub prophetic_score: Option<i32>,
    pub evangelistic_score: Option<i32>,
    pub shepherding_score: Option<i32>,
    pub teaching_score: Option<i32>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub normalized_scores: Option<Json>,
    pub primary_gift: Option<ApestDimension>,
    pub secondary_gift: Option<ApestDimension>,
    pub response_consistency: Option<f64>,
    pub completion_time: Option<i32>,
    pub confidence_level: Option<i32>,
    pub cultural_adjustment_applied: bool,
    pub cultural_adjustment_factor: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ai_insights: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub personalized_recommendations: Option<Json>,
    #[sea_orm(column_type = "JsonBinary")]
    pub suggested_peers: UuidList,
    #[sea_orm(column_type = "JsonBinary")]
    pub complementary_gifts: StringList,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Assessment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user_profile::Entity)
                .from(Column::UserId)
                .to(user_profile::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Assessment => Entity::belongs_to(assessment::Entity)
                .from(Column::AssessmentId)
                .to(assessment::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<assessment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
