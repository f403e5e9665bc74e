use contracts::assessments::{
    ApestScoreSet, AssessmentResponse, AssessmentSummary, AssessmentWithQuestions, QuestionResponse, Recommendations,
    UserAssessmentResponse,
};
use models::enums::AssessmentStatus;
use models::{assessment, assessment_question, user_assessment};
use serde_json::Value;

use super::{opt_ts, ts};

pub fn to_assessment(a: assessment::Model) -> AssessmentResponse {
    AssessmentResponse {
        is_active: a.status == AssessmentStatus::Active,
        id: a.id,
        name: a.name,
        slug: a.slug,
        description: a.description.unwrap_or_default(),
        assessment_type: a.assessment_type,
        questions_count: a.questions_count,
        estimated_duration: a.estimated_duration,
        passing_score: a.passing_score,
        validity_score: a.validity_score,
        reliability_score: a.reliability_score,
        instructions: a.instructions.unwrap_or_default(),
        version: a.version,
        language: a.language,
        cultural_adaptation: a.cultural_adaptation,
        research_backed: a.research_backed,
        scoring_method: a.scoring_method,
        status: a.status,
        published_at: opt_ts(&a.published_at),
        created_at: ts(&a.created_at),
        updated_at: ts(&a.updated_at),
    }
}

pub fn to_question(q: assessment_question::Model) -> QuestionResponse {
    QuestionResponse {
        id: q.id,
        assessment_id: q.assessment_id,
        question_text: q.question_text,
        question_type: q.question_type,
        order_index: q.order_index,
        is_required: q.is_required,
        category: q.category,
        weight: q.weight,
        reverse_scored: q.reverse_scored,
        apest_dimension: q.apest_dimension,
        answer_options: q.answer_options.unwrap_or_else(|| Value::Array(Vec::new())),
        created_at: ts(&q.created_at),
        updated_at: ts(&q.updated_at),
    }
}

pub fn to_assessment_with_questions(
    a: assessment::Model,
    questions: Vec<assessment_question::Model>,
) -> AssessmentWithQuestions {
    AssessmentWithQuestions { assessment: to_assessment(a), questions: questions.into_iter().map(to_question).collect() }
}

pub fn to_assessment_summary(a: &assessment::Model) -> AssessmentSummary {
    AssessmentSummary { id: a.id, name: a.name.clone(), slug: a.slug.clone(), assessment_type: a.assessment_type }
}

fn score_set(ua: &user_assessment::Model) -> Option<ApestScoreSet> {
    Some(ApestScoreSet {
        apostolic: ua.apostolic_score?,
        prophetic: ua.prophetic_score?,
        evangelistic: ua.evangelistic_score?,
        shepherding: ua.shepherding_score?,
        teaching: ua.teaching_score?,
    })
}

pub fn to_user_assessment(ua: user_assessment::Model, assessment: Option<&assessment::Model>) -> UserAssessmentResponse {
    let apest_scores = score_set(&ua);
    let personalized_recommendations = ua
        .personalized_recommendations
        .clone()
        .and_then(|v| serde_json::from_value::<Recommendations>(v).ok());
    UserAssessmentResponse {
        is_completed: ua.is_completed(),
        apest_scores,
        assessment: assessment.map(to_assessment_summary),
        personalized_recommendations,
        id: ua.id,
        user_id: ua.user_id,
        assessment_id: ua.assessment_id,
        started_at: ts(&ua.started_at),
        completed_at: opt_ts(&ua.completed_at),
        completion_percentage: ua.completion_percentage,
        raw_scores: ua.raw_scores,
        total_score: ua.total_score,
        max_possible_score: ua.max_possible_score,
        normalized_scores: ua.normalized_scores,
        primary_gift: ua.primary_gift,
        secondary_gift: ua.secondary_gift,
        response_consistency: ua.response_consistency,
        completion_time: ua.completion_time,
        confidence_level: ua.confidence_level,
        cultural_adjustment_applied: ua.cultural_adjustment_applied,
        cultural_adjustment_factor: ua.cultural_adjustment_factor,
        ai_insights: ua.ai_insights,
        suggested_peers: ua.suggested_peers.0,
        complementary_gifts: ua.complementary_gifts.into_inner(),
        created_at: ts(&ua.created_at),
        updated_at: ts(&ua.updated_at),
    }
}
