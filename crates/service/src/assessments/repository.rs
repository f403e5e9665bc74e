use async_trait::async_trait;
use contracts::assessments::AssessmentFilters;
use contracts::PageRequest;
use models::{assessment, assessment_question, assessment_response, user_assessment};
use uuid::Uuid;

use crate::errors::ServiceError;

pub type UserAssessmentRow = (user_assessment::Model, Option<assessment::Model>);

/// Persistence for assessments and user attempts.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    async fn list(&self, filters: &AssessmentFilters, page: &PageRequest) -> Result<(Vec<assessment::Model>, u64), ServiceError>;
    async fn find(&self, id: Uuid) -> Result<Option<assessment::Model>, ServiceError>;
    async fn insert(&self, assessment: assessment::Model) -> Result<assessment::Model, ServiceError>;

    /// Questions ordered by `order_index`.
    async fn questions(&self, assessment_id: Uuid) -> Result<Vec<assessment_question::Model>, ServiceError>;
    /// Inserts the question and keeps `questions_count` in step.
    async fn add_question(&self, question: assessment_question::Model) -> Result<assessment_question::Model, ServiceError>;

    async fn find_in_progress(&self, user_id: Uuid, assessment_id: Uuid) -> Result<Option<user_assessment::Model>, ServiceError>;
    async fn find_user_assessment(&self, id: Uuid) -> Result<Option<UserAssessmentRow>, ServiceError>;
    /// Newest attempts first.
    async fn list_user_assessments(&self, user_id: Uuid, page: &PageRequest) -> Result<(Vec<UserAssessmentRow>, u64), ServiceError>;
    async fn insert_user_assessment(&self, ua: user_assessment::Model) -> Result<user_assessment::Model, ServiceError>;
    async fn update_user_assessment(&self, ua: user_assessment::Model) -> Result<user_assessment::Model, ServiceError>;
    async fn delete_user_assessment(&self, id: Uuid) -> Result<bool, ServiceError>;

    async fn responses(&self, user_assessment_id: Uuid) -> Result<Vec<assessment_response::Model>, ServiceError>;
    /// Inserts or replaces one row per question. Returns the number written.
    async fn upsert_responses(&self, responses: Vec<assessment_response::Model>) -> Result<usize, ServiceError>;
}

/// In-memory repository for tests and router-level checks.
pub mod mock {
    use super::*;
    use crate::errors::unique_violation;
    use crate::pagination::{matches_search, slice_page};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Store {
        assessments: HashMap<Uuid, assessment::Model>,
        questions: HashMap<Uuid, assessment_question::Model>,
        attempts: HashMap<Uuid, user_assessment::Model>,
        responses: HashMap<(Uuid, Uuid), assessment_response::Model>,
    }

    #[derive(Default)]
    pub struct MockAssessmentRepository {
        store: Mutex<Store>,
    }

    impl MockAssessmentRepository {
        pub fn with(assessments: Vec<assessment::Model>, questions: Vec<assessment_question::Model>) -> Self {
            let repo = Self::default();
            if let Ok(mut s) = repo.store.lock() {
                s.assessments.extend(assessments.into_iter().map(|a| (a.id, a)));
                s.questions.extend(questions.into_iter().map(|q| (q.id, q)));
            }
            repo
        }
    }

    fn lock_err() -> ServiceError {
        ServiceError::Internal("assessment store poisoned".into())
    }

    #[async_trait]
    impl AssessmentRepository for MockAssessmentRepository {
        async fn list(&self, filters: &AssessmentFilters, page: &PageRequest) -> Result<(Vec<assessment::Model>, u64), ServiceError> {
            let s = self.store.lock().map_err(|_| lock_err())?;
            let mut items: Vec<assessment::Model> = s
                .assessments
                .values()
                .filter(|a| filters.search.as_deref().map_or(true, |t| matches_search(t, &[Some(&a.name), a.description.as_deref()])))
                .filter(|a| filters.assessment_type.map_or(true, |t| a.assessment_type == t))
                .filter(|a| filters.status.map_or(true, |st| a.status == st))
                .filter(|a| filters.language.as_deref().map_or(true, |l| a.language == l))
                .filter(|a| filters.cultural_adaptation.map_or(true, |c| a.cultural_adaptation == c))
                .filter(|a| filters.research_backed.map_or(true, |r| a.research_backed == r))
                .cloned()
                .collect();
            // published first (newest), then unpublished by creation time
            items.sort_by(|a, b| match (&a.published_at, &b.published_at) {
                (Some(x), Some(y)) => y.cmp(x).then(b.created_at.cmp(&a.created_at)),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => b.created_at.cmp(&a.created_at),
            });
            let total = items.len() as u64;
            Ok((slice_page(&items, page), total))
        }

        async fn find(&self, id: Uuid) -> Result<Option<assessment::Model>, ServiceError> {
            Ok(self.store.lock().map_err(|_| lock_err())?.assessments.get(&id).cloned())
        }

        async fn insert(&self, a: assessment::Model) -> Result<assessment::Model, ServiceError> {
            let mut s = self.store.lock().map_err(|_| lock_err())?;
            if s.assessments.values().any(|x| x.slug == a.slug) {
                return Err(unique_violation("assessments_slug_key"));
            }
            s.assessments.insert(a.id, a.clone());
            Ok(a)
        }

        async fn questions(&self, assessment_id: Uuid) -> Result<Vec<assessment_question::Model>, ServiceError> {
            let s = self.store.lock().map_err(|_| lock_err())?;
            let mut qs: Vec<_> = s.questions.values().filter(|q| q.assessment_id == assessment_id).cloned().collect();
            qs.sort_by_key(|q| q.order_index);
            Ok(qs)
        }

        async fn add_question(&self, q: assessment_question::Model) -> Result<assessment_question::Model, ServiceError> {
            let mut s = self.store.lock().map_err(|_| lock_err())?;
            let a = s
                .assessments
                .get_mut(&q.assessment_id)
                .ok_or_else(|| ServiceError::ForeignKey("assessment_questions_assessment_id_fkey".into()))?;
            a.questions_count += 1;
            s.questions.insert(q.id, q.clone());
            Ok(q)
        }

        async fn find_in_progress(&self, user_id: Uuid, assessment_id: Uuid) -> Result<Option<user_assessment::Model>, ServiceError> {
            let s = self.store.lock().map_err(|_| lock_err())?;
            Ok(s
                .attempts
                .values()
                .find(|ua| ua.user_id == user_id && ua.assessment_id == assessment_id && ua.completed_at.is_none())
                .cloned())
        }

        async fn find_user_assessment(&self, id: Uuid) -> Result<Option<UserAssessmentRow>, ServiceError> {
            let s = self.store.lock().map_err(|_| lock_err())?;
            Ok(s.attempts.get(&id).map(|ua| (ua.clone(), s.assessments.get(&ua.assessment_id).cloned())))
        }

        async fn list_user_assessments(&self, user_id: Uuid, page: &PageRequest) -> Result<(Vec<UserAssessmentRow>, u64), ServiceError> {
            let s = self.store.lock().map_err(|_| lock_err())?;
            let mut items: Vec<UserAssessmentRow> = s
                .attempts
                .values()
                .filter(|ua| ua.user_id == user_id)
                .map(|ua| (ua.clone(), s.assessments.get(&ua.assessment_id).cloned()))
                .collect();
            items.sort_by(|a, b| b.0.started_at.cmp(&a.0.started_at));
            let total = items.len() as u64;
            Ok((slice_page(&items, page), total))
        }

        async fn insert_user_assessment(&self, ua: user_assessment::Model) -> Result<user_assessment::Model, ServiceError> {
            self.store.lock().map_err(|_| lock_err())?.attempts.insert(ua.id, ua.clone());
            Ok(ua)
        }

        async fn update_user_assessment(&self, ua: user_assessment::Model) -> Result<user_assessment::Model, ServiceError> {
            let mut s = self.store.lock().map_err(|_| lock_err())?;
            match s.attempts.get_mut(&ua.id) {
                Some(row) => {
                    *row = ua.clone();
                    Ok(ua)
                }
                None => Err(ServiceError::not_found("User assessment", ua.id)),
            }
        }

        async fn delete_user_assessment(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut s = self.store.lock().map_err(|_| lock_err())?;
            s.responses.retain(|(ua, _), _| *ua != id);
            Ok(s.attempts.remove(&id).is_some())
        }

        async fn responses(&self, user_assessment_id: Uuid) -> Result<Vec<assessment_response::Model>, ServiceError> {
            let s = self.store.lock().map_err(|_| lock_err())?;
            Ok(s.responses.values().filter(|r| r.user_assessment_id == user_assessment_id).cloned().collect())
        }

        async fn upsert_responses(&self, responses: Vec<assessment_response::Model>) -> Result<usize, ServiceError> {
            let mut s = self.store.lock().map_err(|_| lock_err())?;
            let n = responses.len();
            for r in responses {
                let key = (r.user_assessment_id, r.question_id);
                match s.responses.get_mut(&key) {
                    Some(existing) => {
                        let id = existing.id;
                        let created_at = existing.created_at;
                        *existing = assessment_response::Model { id, created_at, ..r };
                    }
                    None => {
                        s.responses.insert(key, r);
                    }
                }
            }
            Ok(n)
        }
    }
}
