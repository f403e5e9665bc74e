use models::enums::{
    ApestDimension, AssessmentStatus, AssessmentType, CulturalContext, QuestionType, ScoringMethod,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::validation::{Validate, ValidationErrors, Validator};

pub const ASSESSMENT_SORTS: &[&str] = &["publishedAt", "createdAt", "name"];
pub const MAX_RESPONSES_PER_SUBMIT: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub assessment_type: AssessmentType,
    pub estimated_duration: Option<i32>,
    pub passing_score: Option<i32>,
    pub validity_score: Option<f64>,
    pub reliability_score: Option<f64>,
    pub instructions: Option<String>,
    pub version: Option<String>,
    pub language: Option<String>,
    pub cultural_adaptation: Option<CulturalContext>,
    pub research_backed: Option<bool>,
    pub scoring_method: Option<ScoringMethod>,
    pub status: Option<AssessmentStatus>,
}

impl Validate for CreateAssessmentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.length("name", &self.name, 1, 255)
            .slug("slug", &self.slug)
            .opt_length("description", self.description.as_deref(), 0, 2000)
            .range_i64("estimatedDuration", self.estimated_duration.map(i64::from), 1, 600)
            .percentage("passingScore", self.passing_score.map(i64::from))
            .range_f64("validityScore", self.validity_score, 0.0, 1.0)
            .range_f64("reliabilityScore", self.reliability_score, 0.0, 1.0)
            .opt_length("instructions", self.instructions.as_deref(), 0, 5000)
            .opt_length("version", self.version.as_deref(), 1, 16)
            .opt_length("language", self.language.as_deref(), 2, 10);
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub question_text: String,
    pub question_type: QuestionType,
    pub order_index: i32,
    pub is_required: Option<bool>,
    pub category: Option<String>,
    pub weight: Option<f64>,
    pub reverse_scored: Option<bool>,
    pub apest_dimension: Option<ApestDimension>,
    pub answer_options: Option<Value>,
}

impl Validate for CreateQuestionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.length("questionText", &self.question_text, 1, 1000)
            .range_i64("orderIndex", Some(i64::from(self.order_index)), 0, 10_000)
            .opt_length("category", self.category.as_deref(), 1, 64)
            .weight("weight", self.weight);
        if let Some(options) = &self.answer_options {
            if !options.is_array() {
                v.fail("answerOptions", "must be an array", "invalid_type");
            }
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserAssessmentRequest {
    pub confidence_level: Option<i32>,
    pub cultural_adjustment_applied: Option<bool>,
    pub cultural_adjustment_factor: Option<f64>,
    pub suggested_peers: Option<Vec<Uuid>>,
}

impl Validate for UpdateUserAssessmentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.range_i64("confidenceLevel", self.confidence_level.map(i64::from), 1, 5)
            .range_f64("culturalAdjustmentFactor", self.cultural_adjustment_factor, 0.0, 2.0);
        if let Some(peers) = &self.suggested_peers {
            v.list_len("suggestedPeers", peers, 0, 50);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseInput {
    pub question_id: Uuid,
    pub response_value: Option<i32>,
    pub response_text: Option<String>,
    pub response_time: Option<i32>,
    pub confidence: Option<i32>,
    #[serde(default)]
    pub skipped: bool,
}

impl Validate for ResponseInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.response_value("responseValue", self.response_value.map(i64::from))
            .opt_length("responseText", self.response_text.as_deref(), 0, 5000)
            .range_i64("responseTime", self.response_time.map(i64::from), 0, 86_400)
            .range_i64("confidence", self.confidence.map(i64::from), 1, 5);
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponsesRequest {
    pub responses: Vec<ResponseInput>,
}

impl Validate for SubmitResponsesRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.list_len("responses", &self.responses, 1, MAX_RESPONSES_PER_SUBMIT);
        for (i, r) in self.responses.iter().enumerate() {
            v.nested(&format!("responses[{}]", i), r.validate());
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentFilters {
    pub search: Option<String>,
    pub assessment_type: Option<AssessmentType>,
    pub status: Option<AssessmentStatus>,
    pub language: Option<String>,
    pub cultural_adaptation: Option<CulturalContext>,
    pub research_backed: Option<bool>,
}

impl Validate for AssessmentFilters {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.opt_length("search", self.search.as_deref(), 0, 100)
            .opt_length("language", self.language.as_deref(), 2, 10);
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub assessment_type: AssessmentType,
    pub questions_count: i32,
    pub estimated_duration: Option<i32>,
    pub passing_score: Option<i32>,
    pub validity_score: Option<f64>,
    pub reliability_score: Option<f64>,
    pub instructions: String,
    pub version: String,
    pub language: String,
    pub cultural_adaptation: CulturalContext,
    pub research_backed: bool,
    pub scoring_method: ScoringMethod,
    pub status: AssessmentStatus,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: Uuid,
    pub assessment_id: Uuid,
    pub question_text: String,
    pub question_type: QuestionType,
    pub order_index: i32,
    pub is_required: bool,
    pub category: Option<String>,
    pub weight: f64,
    pub reverse_scored: bool,
    pub apest_dimension: Option<ApestDimension>,
    pub answer_options: Value,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentWithQuestions {
    #[serde(flatten)]
    pub assessment: AssessmentResponse,
    pub questions: Vec<QuestionResponse>,
}

/// Stored per-dimension scores, each 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApestScoreSet {
    pub apostolic: i32,
    pub prophetic: i32,
    pub evangelistic: i32,
    pub shepherding: i32,
    pub teaching: i32,
}

impl ApestScoreSet {
    pub fn get(&self, dim: ApestDimension) -> i32 {
        match dim {
            ApestDimension::Apostolic => self.apostolic,
            ApestDimension::Prophetic => self.prophetic,
            ApestDimension::Evangelistic => self.evangelistic,
            ApestDimension::Shepherding => self.shepherding,
            ApestDimension::Teaching => self.teaching,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub strengths: Vec<String>,
    pub growth_areas: Vec<String>,
    pub action_items: Vec<String>,
    pub content_recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAssessmentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub assessment_id: Uuid,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub completion_percentage: i32,
    pub raw_scores: Option<Value>,
    pub total_score: Option<i32>,
    pub max_possible_score: Option<i32>,
    pub normalized_scores: Option<Value>,
    pub primary_gift: Option<ApestDimension>,
    pub secondary_gift: Option<ApestDimension>,
    pub response_consistency: Option<f64>,
    pub completion_time: Option<i32>,
    pub confidence_level: Option<i32>,
    pub cultural_adjustment_applied: bool,
    pub cultural_adjustment_factor: Option<f64>,
    pub ai_insights: Option<String>,
    pub personalized_recommendations: Option<Recommendations>,
    pub suggested_peers: Vec<Uuid>,
    pub complementary_gifts: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub is_completed: bool,
    /// Present once every dimension has a stored score.
    pub apest_scores: Option<ApestScoreSet>,
    pub assessment: Option<AssessmentSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub assessment_type: AssessmentType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResponsesResponse {
    pub saved: usize,
    pub completion_percentage: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_weight_is_bounded() {
        let req: CreateQuestionRequest = serde_json::from_value(serde_json::json!({
            "questionText": "I enjoy starting new things",
            "questionType": "likert",
            "orderIndex": 1,
            "weight": 12.0,
            "apestDimension": "apostolic"
        }))
        .unwrap();
        assert_eq!(req.validate().unwrap_err().fields(), vec!["weight"]);
    }

    #[test]
    fn responses_report_indexed_fields() {
        let q = Uuid::new_v4();
        let req = SubmitResponsesRequest {
            responses: vec![
                ResponseInput { question_id: q, response_value: Some(4), response_text: None, response_time: None, confidence: None, skipped: false },
                ResponseInput { question_id: q, response_value: Some(9), response_text: None, response_time: None, confidence: Some(0), skipped: false },
            ],
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.fields(), vec!["responses[1].responseValue", "responses[1].confidence"]);
    }

    #[test]
    fn empty_submission_is_rejected() {
        let err = SubmitResponsesRequest { responses: vec![] }.validate().unwrap_err();
        assert_eq!(err.0[0].code, "too_small");
    }

    #[test]
    fn detail_flattens_assessment_fields() {
        let a = AssessmentResponse {
            id: Uuid::nil(),
            name: "APEST".into(),
            slug: "apest".into(),
            description: String::new(),
            assessment_type: AssessmentType::Apest,
            questions_count: 0,
            estimated_duration: None,
            passing_score: None,
            validity_score: None,
            reliability_score: None,
            instructions: String::new(),
            version: "1.0".into(),
            language: "en".into(),
            cultural_adaptation: CulturalContext::Universal,
            research_backed: false,
            scoring_method: ScoringMethod::Likert5,
            status: AssessmentStatus::Active,
            published_at: None,
            created_at: "2024-01-01T00:00:00+00:00".into(),
            updated_at: "2024-01-01T00:00:00+00:00".into(),
            is_active: true,
        };
        let json = serde_json::to_value(AssessmentWithQuestions { assessment: a, questions: vec![] }).unwrap();
        assert_eq!(json["slug"], "apest");
        assert_eq!(json["assessmentType"], "apest");
        assert!(json["questions"].as_array().unwrap().is_empty());
    }
}
