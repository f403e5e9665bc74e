use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{assessment_question, user_assessment};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assessment_responses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_assessment_id: Uuid,
    pub question_id: Uuid,
    pub response_value: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub response_text: Option<String>,
    pub response_time: Option<i32>,
    pub confidence: Option<i32>,
    pub skipped: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    UserAssessment,
    Question,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::UserAssessment => Entity::belongs_to(user_assessment::Entity)
                .from(Column::UserAssessmentId)
                .to(user_assessment::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Question => Entity::belongs_to(assessment_question::Entity)
                .from(Column::QuestionId)
                .to(assessment_question::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
