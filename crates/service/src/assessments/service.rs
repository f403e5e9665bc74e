use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use contracts::assessments::{
    AssessmentFilters, AssessmentResponse, AssessmentWithQuestions, CreateAssessmentRequest, CreateQuestionRequest,
    QuestionResponse, SavedResponsesResponse, SubmitResponsesRequest, UpdateUserAssessmentRequest,
    UserAssessmentResponse,
};
use contracts::{PageRequest, PaginatedResponse, Validate};
use models::enums::{AssessmentStatus, CulturalContext, ScoringMethod};
use models::json::{StringList, UuidList};
use models::{assessment, assessment_question, assessment_response, user_assessment};
use tracing::{info, instrument};
use uuid::Uuid;

use super::repository::AssessmentRepository;
use crate::errors::ServiceError;
use crate::mappers::assessments::{to_assessment, to_assessment_with_questions, to_question, to_user_assessment};
use crate::scoring::{self, ScoringQuestion, ScoringResponse};

const ASSESSMENT: &str = "Assessment";
const USER_ASSESSMENT: &str = "User assessment";
const ALREADY_COMPLETED: &str = "Assessment already completed";

pub struct AssessmentService<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: AssessmentRepository + ?Sized> AssessmentService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &AssessmentFilters, page: &PageRequest) -> Result<PaginatedResponse<AssessmentResponse>, ServiceError> {
        filters.validate()?;
        let (rows, total) = self.repo.list(filters, page).await?;
        Ok(PaginatedResponse::new(rows.into_iter().map(to_assessment).collect(), page, total))
    }

    #[instrument(skip(self))]
    pub async fn get_with_questions(&self, id: Uuid) -> Result<AssessmentWithQuestions, ServiceError> {
        let a = self.repo.find(id).await?.ok_or(ServiceError::not_found(ASSESSMENT, id))?;
        let questions = self.repo.questions(id).await?;
        Ok(to_assessment_with_questions(a, questions))
    }

    #[instrument(skip(self, req), fields(slug = %req.slug))]
    pub async fn create(&self, req: CreateAssessmentRequest) -> Result<AssessmentResponse, ServiceError> {
        req.validate()?;
        let now = Utc::now().fixed_offset();
        let status = req.status.unwrap_or(AssessmentStatus::Draft);
        let row = assessment::Model {
            id: Uuid::new_v4(),
            name: req.name,
            slug: req.slug,
            description: req.description,
            assessment_type: req.assessment_type,
            questions_count: 0,
            estimated_duration: req.estimated_duration,
            passing_score: req.passing_score,
            validity_score: req.validity_score,
            reliability_score: req.reliability_score,
            instructions: req.instructions,
            version: req.version.unwrap_or_else(|| "1.0".to_string()),
            language: req.language.unwrap_or_else(|| "en".to_string()),
            cultural_adaptation: req.cultural_adaptation.unwrap_or(CulturalContext::Universal),
            research_backed: req.research_backed.unwrap_or(false),
            scoring_method: req.scoring_method.unwrap_or(ScoringMethod::Likert5),
            status,
            published_at: (status == AssessmentStatus::Active).then_some(now),
            created_at: now,
            updated_at: now,
        };
        let created = self.repo.insert(row).await?;
        info!(event = "assessment_created", assessment_id = %created.id);
        Ok(to_assessment(created))
    }

    #[instrument(skip(self, req))]
    pub async fn add_question(&self, assessment_id: Uuid, req: CreateQuestionRequest) -> Result<QuestionResponse, ServiceError> {
        req.validate()?;
        if self.repo.find(assessment_id).await?.is_none() {
            return Err(ServiceError::not_found(ASSESSMENT, assessment_id));
        }
        let now = Utc::now().fixed_offset();
        let q = assessment_question::Model {
            id: Uuid::new_v4(),
            assessment_id,
            question_text: req.question_text,
            question_type: req.question_type,
            order_index: req.order_index,
            is_required: req.is_required.unwrap_or(true),
            category: req.category,
            weight: req.weight.unwrap_or(1.0),
            reverse_scored: req.reverse_scored.unwrap_or(false),
            apest_dimension: req.apest_dimension,
            answer_options: req.answer_options,
            created_at: now,
            updated_at: now,
        };
        Ok(to_question(self.repo.add_question(q).await?))
    }

    /// Starts an attempt, or returns the one already in progress.
    #[instrument(skip(self))]
    pub async fn start(&self, user_id: Uuid, assessment_id: Uuid) -> Result<UserAssessmentResponse, ServiceError> {
        let a = self.repo.find(assessment_id).await?.ok_or(ServiceError::not_found(ASSESSMENT, assessment_id))?;
        if a.status != AssessmentStatus::Active {
            return Err(ServiceError::BadRequest("Assessment is not active".into()));
        }
        if let Some(existing) = self.repo.find_in_progress(user_id, assessment_id).await? {
            return Ok(to_user_assessment(existing, Some(&a)));
        }
        let now = Utc::now().fixed_offset();
        let ua = user_assessment::Model {
            id: Uuid::new_v4(),
            user_id,
            assessment_id,
            started_at: now,
            completed_at: None,
            completion_percentage: 0,
            raw_scores: None,
            total_score: None,
            max_possible_score: None,
            apostolic_score: None,
            prophetic_score: None,
            evangelistic_score: None,
            shepherding_score: None,
            teaching_score: None,
            normalized_scores: None,
            primary_gift: None,
            secondary_gift: None,
            response_consistency: None,
            completion_time: None,
            confidence_level: None,
            cultural_adjustment_applied: false,
            cultural_adjustment_factor: None,
            ai_insights: None,
            personalized_recommendations: None,
            suggested_peers: UuidList::default(),
            complementary_gifts: StringList::default(),
            created_at: now,
            updated_at: now,
        };
        let created = self.repo.insert_user_assessment(ua).await?;
        info!(event = "assessment_started", user_id = %user_id, assessment_id = %assessment_id, user_assessment_id = %created.id);
        Ok(to_user_assessment(created, Some(&a)))
    }

    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: Uuid, page: &PageRequest) -> Result<PaginatedResponse<UserAssessmentResponse>, ServiceError> {
        let (rows, total) = self.repo.list_user_assessments(user_id, page).await?;
        let data = rows.into_iter().map(|(ua, a)| to_user_assessment(ua, a.as_ref())).collect();
        Ok(PaginatedResponse::new(data, page, total))
    }

    async fn owned(&self, user_id: Uuid, id: Uuid) -> Result<(user_assessment::Model, Option<assessment::Model>), ServiceError> {
        let (ua, a) = self.repo.find_user_assessment(id).await?.ok_or(ServiceError::not_found(USER_ASSESSMENT, id))?;
        if ua.user_id != user_id {
            return Err(ServiceError::access_denied());
        }
        Ok((ua, a))
    }

    #[instrument(skip(self))]
    pub async fn get_user_assessment(&self, user_id: Uuid, id: Uuid) -> Result<UserAssessmentResponse, ServiceError> {
        let (ua, a) = self.owned(user_id, id).await?;
        Ok(to_user_assessment(ua, a.as_ref()))
    }

    #[instrument(skip(self, req))]
    pub async fn update_user_assessment(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: UpdateUserAssessmentRequest,
    ) -> Result<UserAssessmentResponse, ServiceError> {
        req.validate()?;
        let (mut ua, a) = self.owned(user_id, id).await?;
        if let Some(level) = req.confidence_level {
            ua.confidence_level = Some(level);
        }
        if let Some(applied) = req.cultural_adjustment_applied {
            ua.cultural_adjustment_applied = applied;
        }
        if let Some(factor) = req.cultural_adjustment_factor {
            ua.cultural_adjustment_factor = Some(factor);
        }
        if let Some(peers) = req.suggested_peers {
            ua.suggested_peers = peers.into();
        }
        ua.updated_at = Utc::now().fixed_offset();
        let updated = self.repo.update_user_assessment(ua).await?;
        Ok(to_user_assessment(updated, a.as_ref()))
    }

    #[instrument(skip(self))]
    pub async fn delete_user_assessment(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        self.owned(user_id, id).await?;
        self.repo.delete_user_assessment(id).await?;
        info!(event = "user_assessment_deleted", user_assessment_id = %id);
        Ok(())
    }

    /// Upserts answers and recomputes the completion percentage.
    #[instrument(skip(self, req), fields(count = req.responses.len()))]
    pub async fn save_responses(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: SubmitResponsesRequest,
    ) -> Result<SavedResponsesResponse, ServiceError> {
        req.validate()?;
        let (mut ua, _) = self.owned(user_id, id).await?;
        if ua.is_completed() {
            return Err(ServiceError::Conflict(ALREADY_COMPLETED.into()));
        }
        let questions = self.repo.questions(ua.assessment_id).await?;
        let known: HashSet<Uuid> = questions.iter().map(|q| q.id).collect();
        let unknown: Vec<String> =
            req.responses.iter().filter(|r| !known.contains(&r.question_id)).map(|r| r.question_id.to_string()).collect();
        if !unknown.is_empty() {
            return Err(ServiceError::BadRequest(format!(
                "Questions do not belong to this assessment: {}",
                unknown.join(", ")
            )));
        }

        // one row per question; a later entry for the same question wins
        let now = Utc::now().fixed_offset();
        let mut latest: HashMap<Uuid, assessment_response::Model> = HashMap::new();
        for r in req.responses {
            latest.insert(
                r.question_id,
                assessment_response::Model {
                    id: Uuid::new_v4(),
                    user_assessment_id: ua.id,
                    question_id: r.question_id,
                    response_value: if r.skipped { None } else { r.response_value },
                    response_text: r.response_text,
                    response_time: r.response_time,
                    confidence: r.confidence,
                    skipped: r.skipped,
                    created_at: now,
                    updated_at: now,
                },
            );
        }
        let saved = self.repo.upsert_responses(latest.into_values().collect()).await?;

        let responses = self.repo.responses(ua.id).await?;
        let sq: Vec<ScoringQuestion> = questions.iter().map(ScoringQuestion::from).collect();
        let sr: Vec<ScoringResponse> = responses.iter().map(ScoringResponse::from).collect();
        ua.completion_percentage = i32::from(scoring::calculate_completion_percentage(&sq, &sr));
        ua.updated_at = now;
        let ua = self.repo.update_user_assessment(ua).await?;

        Ok(SavedResponsesResponse { saved, completion_percentage: ua.completion_percentage })
    }

    /// Scores the attempt and stores results, insights and recommendations.
    #[instrument(skip(self))]
    pub async fn complete(&self, user_id: Uuid, id: Uuid) -> Result<UserAssessmentResponse, ServiceError> {
        let (mut ua, a) = self.owned(user_id, id).await?;
        if ua.is_completed() {
            return Err(ServiceError::Conflict(ALREADY_COMPLETED.into()));
        }
        let questions = self.repo.questions(ua.assessment_id).await?;
        let responses = self.repo.responses(ua.id).await?;
        let sq: Vec<ScoringQuestion> = questions.iter().map(ScoringQuestion::from).collect();
        let sr: Vec<ScoringResponse> = responses.iter().map(ScoringResponse::from).collect();

        let result = scoring::score_apest_assessment(&sq, &sr);
        let insights = scoring::generate_apest_insights(&result);
        let recommendations = scoring::generate_personalized_recommendations(&result);
        let to_json = |v: serde_json::Result<serde_json::Value>| v.map_err(|e| ServiceError::Internal(e.to_string()));

        let now = Utc::now().fixed_offset();
        let pct = result.apest_scores;
        ua.raw_scores = Some(to_json(serde_json::to_value(result.raw_scores))?);
        ua.total_score = Some(result.total_score as i32);
        ua.max_possible_score = Some(result.max_possible_score as i32);
        ua.apostolic_score = Some(pct.apostolic as i32);
        ua.prophetic_score = Some(pct.prophetic as i32);
        ua.evangelistic_score = Some(pct.evangelistic as i32);
        ua.shepherding_score = Some(pct.shepherding as i32);
        ua.teaching_score = Some(pct.teaching as i32);
        ua.normalized_scores = Some(to_json(serde_json::to_value(&result.normalized_scores))?);
        ua.primary_gift = Some(result.primary_gift);
        ua.secondary_gift = Some(result.secondary_gift);
        ua.response_consistency = Some((result.response_consistency * 100.0).round() / 100.0);
        ua.completion_percentage = i32::from(result.completion_percentage);
        ua.completion_time = Some((now - ua.started_at).num_seconds().clamp(0, i32::MAX as i64) as i32);
        ua.ai_insights = Some(insights);
        ua.personalized_recommendations = Some(to_json(serde_json::to_value(&recommendations))?);
        ua.complementary_gifts = scoring::complementary_gifts(&result).into();
        ua.completed_at = Some(now);
        ua.updated_at = now;

        let updated = self.repo.update_user_assessment(ua).await?;
        info!(
            event = "assessment_completed",
            user_assessment_id = %updated.id,
            primary_gift = %result.primary_gift,
            secondary_gift = %result.secondary_gift,
            completion = result.completion_percentage
        );
        Ok(to_user_assessment(updated, a.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessments::repository::mock::MockAssessmentRepository;
    use crate::mappers::fixtures;
    use contracts::assessments::ResponseInput;
    use models::enums::ApestDimension;

    struct Fixture {
        svc: AssessmentService<MockAssessmentRepository>,
        assessment: assessment::Model,
        questions: Vec<assessment_question::Model>,
    }

    fn fixture(status: AssessmentStatus) -> Fixture {
        let a = fixtures::assessment(status);
        let questions = vec![
            fixtures::question(a.id, 1, Some(ApestDimension::Apostolic)),
            fixtures::question(a.id, 2, Some(ApestDimension::Prophetic)),
            fixtures::question(a.id, 3, Some(ApestDimension::Teaching)),
        ];
        let repo = MockAssessmentRepository::with(vec![a.clone()], questions.clone());
        Fixture { svc: AssessmentService::new(Arc::new(repo)), assessment: a, questions }
    }

    fn answer(question_id: Uuid, value: i32) -> ResponseInput {
        ResponseInput { question_id, response_value: Some(value), response_text: None, response_time: None, confidence: None, skipped: false }
    }

    #[tokio::test]
    async fn start_requires_active_and_reuses_attempt() {
        let draft = fixture(AssessmentStatus::Draft);
        let err = draft.svc.start(Uuid::new_v4(), draft.assessment.id).await.unwrap_err();
        assert_eq!(err.public_message(), "Assessment is not active");

        let f = fixture(AssessmentStatus::Active);
        let user = Uuid::new_v4();
        let first = f.svc.start(user, f.assessment.id).await.unwrap();
        let again = f.svc.start(user, f.assessment.id).await.unwrap();
        assert_eq!(first.id, again.id);
        assert!(matches!(f.svc.start(user, Uuid::new_v4()).await.unwrap_err(), ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn save_then_complete_scores_the_attempt() {
        let f = fixture(AssessmentStatus::Active);
        let user = Uuid::new_v4();
        let ua = f.svc.start(user, f.assessment.id).await.unwrap();

        let saved = f
            .svc
            .save_responses(user, ua.id, SubmitResponsesRequest { responses: vec![answer(f.questions[0].id, 2)] })
            .await
            .unwrap();
        assert_eq!(saved.completion_percentage, 33);

        let resubmit = vec![answer(f.questions[0].id, 5), answer(f.questions[1].id, 4), answer(f.questions[2].id, 2)];
        let saved = f.svc.save_responses(user, ua.id, SubmitResponsesRequest { responses: resubmit }).await.unwrap();
        assert_eq!(saved.saved, 3);
        assert_eq!(saved.completion_percentage, 100);

        let done = f.svc.complete(user, ua.id).await.unwrap();
        assert!(done.is_completed);
        assert_eq!(done.primary_gift, Some(ApestDimension::Apostolic));
        assert_eq!(done.secondary_gift, Some(ApestDimension::Prophetic));
        assert_eq!(done.total_score, Some(11));
        let scores = done.apest_scores.unwrap();
        assert_eq!(scores.apostolic, 100);
        assert_eq!(scores.teaching, 40);
        assert!(done.ai_insights.unwrap().starts_with("Apostolic gifts"));
        assert_eq!(done.complementary_gifts, vec!["evangelistic", "shepherding"]);
        assert_eq!(done.personalized_recommendations.map(|r| r.action_items.len()), Some(4));

        let err = f.svc.complete(user, ua.id).await.unwrap_err();
        assert_eq!(err.public_message(), ALREADY_COMPLETED);
        let err = f
            .svc
            .save_responses(user, ua.id, SubmitResponsesRequest { responses: vec![answer(f.questions[0].id, 1)] })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn foreign_questions_and_users_are_rejected() {
        let f = fixture(AssessmentStatus::Active);
        let user = Uuid::new_v4();
        let ua = f.svc.start(user, f.assessment.id).await.unwrap();

        let err = f
            .svc
            .save_responses(user, ua.id, SubmitResponsesRequest { responses: vec![answer(Uuid::new_v4(), 3)] })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let stranger = Uuid::new_v4();
        assert_eq!(f.svc.get_user_assessment(stranger, ua.id).await.unwrap_err().public_message(), "Access denied");
        assert_eq!(f.svc.delete_user_assessment(stranger, ua.id).await.unwrap_err().public_message(), "Access denied");
    }

    #[tokio::test]
    async fn questions_keep_count_in_sync() {
        let f = fixture(AssessmentStatus::Draft);
        let req: CreateQuestionRequest = serde_json::from_value(serde_json::json!({
            "questionText": "I notice who is missing",
            "questionType": "likert",
            "orderIndex": 0,
            "apestDimension": "evangelistic"
        }))
        .unwrap();
        let q = f.svc.add_question(f.assessment.id, req).await.unwrap();
        assert_eq!(q.weight, 1.0);
        let detail = f.svc.get_with_questions(f.assessment.id).await.unwrap();
        assert_eq!(detail.assessment.questions_count, 1);
        assert_eq!(detail.questions[0].order_index, 0);
    }

    #[tokio::test]
    async fn update_and_list_attempts() {
        let f = fixture(AssessmentStatus::Active);
        let user = Uuid::new_v4();
        let ua = f.svc.start(user, f.assessment.id).await.unwrap();
        let req = UpdateUserAssessmentRequest { confidence_level: Some(4), ..Default::default() };
        let updated = f.svc.update_user_assessment(user, ua.id, req).await.unwrap();
        assert_eq!(updated.confidence_level, Some(4));

        let page = f.svc.list_for_user(user, &PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.data[0].assessment.as_ref().map(|a| a.id), Some(f.assessment.id));
    }
}
