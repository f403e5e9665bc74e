use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assessment;
use crate::enums::{ApestDimension, QuestionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assessment_questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub assessment_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    pub question_type: QuestionType,
    pub order_index: i32,
    pub is_required: bool,
    pub category: Option<String>,
    pub weight: f64,
    pub reverse_scored: bool,
    pub apest_dimension: Option<ApestDimension>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub answer_options: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Assessment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
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
