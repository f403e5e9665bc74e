use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use contracts::assessments::{ResponseInput, SubmitResponsesRequest};
use models::enums::ApestDimension;
use service::assessments::repository::mock::MockAssessmentRepository;
use service::assessments::AssessmentService;
use service::scoring::{score_apest_assessment, ScoringQuestion, ScoringResponse, DIMENSIONS};

fn questions(n: usize) -> Vec<ScoringQuestion> {
    (0..n)
        .map(|i| ScoringQuestion {
            id: uuid::Uuid::new_v4(),
            apest_dimension: Some(DIMENSIONS[i % DIMENSIONS.len()]),
            weight: Some(1.0 + (i % 3) as f64 * 0.5),
            reverse_scored: i % 7 == 0,
            is_required: true,
        })
        .collect()
}

fn bench_scoring(c: &mut Criterion) {
    let qs = questions(100);
    let rs: Vec<ScoringResponse> = qs
        .iter()
        .enumerate()
        .map(|(i, q)| ScoringResponse { question_id: q.id, response_value: Some((i % 5) as i32 + 1), skipped: i % 11 == 0 })
        .collect();

    c.bench_function("score_apest_100_questions", |b| {
        b.iter(|| score_apest_assessment(&qs, &rs));
    });
}

fn bench_save_responses(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let now = chrono::Utc::now().fixed_offset();
    let assessment: models::assessment::Model = serde_json::from_value(serde_json::json!({
        "id": uuid::Uuid::new_v4(), "name": "APEST", "slug": "apest-bench", "description": null,
        "assessment_type": "apest", "questions_count": 0, "estimated_duration": null, "passing_score": null,
        "validity_score": null, "reliability_score": null, "instructions": null, "version": "1.0",
        "language": "en", "cultural_adaptation": "universal", "research_backed": true,
        "scoring_method": "likert_5", "status": "active", "published_at": now, "created_at": now, "updated_at": now
    }))
    .unwrap();
    let qs: Vec<models::assessment_question::Model> = (0..50)
        .map(|i| models::assessment_question::Model {
            id: uuid::Uuid::new_v4(),
            assessment_id: assessment.id,
            question_text: format!("Q{}", i),
            question_type: models::enums::QuestionType::Likert,
            order_index: i,
            is_required: true,
            category: None,
            weight: 1.0,
            reverse_scored: false,
            apest_dimension: Some(ApestDimension::Teaching),
            answer_options: None,
            created_at: now,
            updated_at: now,
        })
        .collect();
    let svc = AssessmentService::new(Arc::new(MockAssessmentRepository::with(vec![assessment.clone()], qs.clone())));
    let user = uuid::Uuid::new_v4();
    let attempt = rt.block_on(svc.start(user, assessment.id)).unwrap();
    let responses: Vec<ResponseInput> = qs
        .iter()
        .map(|q| ResponseInput { question_id: q.id, response_value: Some(4), response_text: None, response_time: None, confidence: None, skipped: false })
        .collect();

    c.bench_function("save_50_responses", |b| {
        b.iter(|| {
            let req = SubmitResponsesRequest { responses: responses.clone() };
            rt.block_on(svc.save_responses(user, attempt.id, req)).unwrap();
        });
    });
}

criterion_group!(benches, bench_scoring, bench_save_responses);
criterion_main!(benches);
