use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::{AssessmentStatus, AssessmentType, CulturalContext, ScoringMethod};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assessments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub assessment_type: AssessmentType,
    pub questions_count: i32,
    pub estimated_duration: Option<i32>,
    pub passing_score: Option<i32>,
    pub validity_score: Option<f64>,
    pub reliability_score: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub instructions: Option<String>,
    pub version: String,
    pub language: String,
    pub cultural_adaptation: CulturalContext,
    pub research_backed: bool,
    pub scoring_method: ScoringMethod,
    pub status: AssessmentStatus,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations defined here")
    }
}

impl ActiveModelBehavior for ActiveModel {}
