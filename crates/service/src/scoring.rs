//! APEST assessment scoring.
//!
//! Pure functions over question and response snapshots. Scores are weighted
//! averages on a 5-point scale; reverse-scored items are flipped before
//! weighting. Nothing here touches the database.
use std::collections::BTreeMap;

use contracts::assessments::Recommendations;
use models::enums::ApestDimension;
use models::{assessment_question, assessment_response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SCALE_MAX: f64 = 5.0;
const STRENGTH_THRESHOLD: f64 = 75.0;
const GROWTH_THRESHOLD: f64 = 50.0;
const SPECIALIZATION_SPREAD: f64 = 20.0;
const GENERAL_KEY: &str = "general";

/// Dimensions in canonical order.
pub const DIMENSIONS: [ApestDimension; 5] = [
    ApestDimension::Apostolic,
    ApestDimension::Prophetic,
    ApestDimension::Evangelistic,
    ApestDimension::Shepherding,
    ApestDimension::Teaching,
];

#[derive(Debug, Clone)]
pub struct ScoringQuestion {
    pub id: Uuid,
    pub apest_dimension: Option<ApestDimension>,
    pub weight: Option<f64>,
    pub reverse_scored: bool,
    pub is_required: bool,
}

impl From<&assessment_question::Model> for ScoringQuestion {
    fn from(q: &assessment_question::Model) -> Self {
        Self {
            id: q.id,
            apest_dimension: q.apest_dimension,
            weight: Some(q.weight),
            reverse_scored: q.reverse_scored,
            is_required: q.is_required,
        }
    }
}

impl ScoringQuestion {
    /// Zero or missing weight counts as 1.
    fn effective_weight(&self) -> f64 {
        match self.weight {
            Some(w) if w > 0.0 => w,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoringResponse {
    pub question_id: Uuid,
    pub response_value: Option<i32>,
    pub skipped: bool,
}

impl From<&assessment_response::Model> for ScoringResponse {
    fn from(r: &assessment_response::Model) -> Self {
        Self { question_id: r.question_id, response_value: r.response_value, skipped: r.skipped }
    }
}

impl ScoringResponse {
    fn answered_value(&self) -> Option<f64> {
        if self.skipped {
            None
        } else {
            self.response_value.map(f64::from)
        }
    }
}

/// Per-dimension averages on the 1..=5 scale (0 when unanswered).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ApestScores {
    pub apostolic: f64,
    pub prophetic: f64,
    pub evangelistic: f64,
    pub shepherding: f64,
    pub teaching: f64,
}

impl ApestScores {
    pub fn get(&self, dim: ApestDimension) -> f64 {
        match dim {
            ApestDimension::Apostolic => self.apostolic,
            ApestDimension::Prophetic => self.prophetic,
            ApestDimension::Evangelistic => self.evangelistic,
            ApestDimension::Shepherding => self.shepherding,
            ApestDimension::Teaching => self.teaching,
        }
    }

    fn set(&mut self, dim: ApestDimension, value: f64) {
        match dim {
            ApestDimension::Apostolic => self.apostolic = value,
            ApestDimension::Prophetic => self.prophetic = value,
            ApestDimension::Evangelistic => self.evangelistic = value,
            ApestDimension::Shepherding => self.shepherding = value,
            ApestDimension::Teaching => self.teaching = value,
        }
    }

    pub fn entries(&self) -> Vec<(ApestDimension, f64)> {
        DIMENSIONS.iter().map(|d| (*d, self.get(*d))).collect()
    }

    pub fn sum(&self) -> f64 {
        DIMENSIONS.iter().map(|d| self.get(*d)).sum()
    }

    /// Rescales 1..=5 averages to 0..=100.
    pub fn to_percentages(&self) -> ApestScores {
        let mut out = ApestScores::default();
        for d in DIMENSIONS {
            out.set(d, (self.get(d) / SCALE_MAX * 100.0).round());
        }
        out
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        DIMENSIONS.iter().map(|d| (d.as_str().to_string(), self.get(*d))).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApestResult {
    pub raw_scores: ApestScores,
    pub total_score: i64,
    pub max_possible_score: i64,
    pub normalized_scores: BTreeMap<String, f64>,
    /// Dimension scores on 0..=100.
    pub apest_scores: ApestScores,
    pub primary_gift: ApestDimension,
    pub secondary_gift: ApestDimension,
    pub completion_percentage: u8,
    pub response_consistency: f64,
}

fn responses_by_question(responses: &[ScoringResponse]) -> BTreeMap<Uuid, &ScoringResponse> {
    responses.iter().map(|r| (r.question_id, r)).collect()
}

pub fn calculate_apest_scores(questions: &[ScoringQuestion], responses: &[ScoringResponse]) -> ApestScores {
    let by_question = responses_by_question(responses);
    let mut scores = ApestScores::default();

    for dim in DIMENSIONS {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for q in questions.iter().filter(|q| q.apest_dimension == Some(dim)) {
            let Some(value) = by_question.get(&q.id).and_then(|r| r.answered_value()) else {
                continue;
            };
            let value = if q.reverse_scored { SCALE_MAX + 1.0 - value } else { value };
            let w = q.effective_weight();
            weighted += value * w;
            total_weight += w;
        }
        scores.set(dim, if total_weight > 0.0 { weighted / total_weight } else { 0.0 });
    }
    scores
}

/// Highest and second-highest dimensions. Ties keep canonical order.
pub fn determine_apest_gifts(entries: &[(ApestDimension, f64)]) -> (ApestDimension, ApestDimension) {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let primary = sorted.first().map(|e| e.0).unwrap_or(ApestDimension::Teaching);
    let secondary = sorted.get(1).map(|e| e.0).unwrap_or(ApestDimension::Shepherding);
    (primary, secondary)
}

/// 1.0 for perfectly uniform answers, falling to 0 as the spread reaches 2 points.
pub fn calculate_response_consistency(responses: &[ScoringResponse]) -> f64 {
    let values: Vec<f64> = responses.iter().filter_map(|r| r.answered_value()).collect();
    if values.len() < 2 {
        return 1.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance.sqrt() / 2.0).max(0.0)
}

/// Share of required questions that have an answer, 0..=100.
pub fn calculate_completion_percentage(questions: &[ScoringQuestion], responses: &[ScoringResponse]) -> u8 {
    let by_question = responses_by_question(responses);
    let required: Vec<&ScoringQuestion> = questions.iter().filter(|q| q.is_required).collect();
    if required.is_empty() {
        return 0;
    }
    let answered = required
        .iter()
        .filter(|q| by_question.get(&q.id).and_then(|r| r.answered_value()).is_some())
        .count();
    let pct = (answered as f64 / required.len() as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Highest attainable sum per dimension; questions without one land in `general`.
pub fn calculate_max_possible_scores(questions: &[ScoringQuestion]) -> BTreeMap<String, f64> {
    let mut max = BTreeMap::new();
    for q in questions {
        let key = q.apest_dimension.map(|d| d.as_str().to_string()).unwrap_or_else(|| GENERAL_KEY.to_string());
        *max.entry(key).or_insert(0.0) += SCALE_MAX * q.effective_weight();
    }
    max
}

pub fn normalize_scores(raw: &BTreeMap<String, f64>, max: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    raw.iter()
        .map(|(dim, score)| {
            let m = match max.get(dim) {
                Some(m) if *m > 0.0 => *m,
                _ => SCALE_MAX,
            };
            (dim.clone(), (score / m * 100.0).round())
        })
        .collect()
}

pub fn score_apest_assessment(questions: &[ScoringQuestion], responses: &[ScoringResponse]) -> ApestResult {
    let raw = calculate_apest_scores(questions, responses);
    let max = calculate_max_possible_scores(questions);
    let (primary, secondary) = determine_apest_gifts(&raw.entries());
    ApestResult {
        raw_scores: raw,
        total_score: raw.sum().round() as i64,
        max_possible_score: max.values().sum::<f64>().round() as i64,
        normalized_scores: normalize_scores(&raw.to_map(), &max),
        apest_scores: raw.to_percentages(),
        primary_gift: primary,
        secondary_gift: secondary,
        completion_percentage: calculate_completion_percentage(questions, responses),
        response_consistency: calculate_response_consistency(responses),
    }
}

fn gift_description(gift: ApestDimension) -> &'static str {
    match gift {
        ApestDimension::Apostolic => "Apostolic gifts focus on pioneering, vision-casting, and expanding God's kingdom into new territories. You are drawn to starting new things and reaching unreached people.",
        ApestDimension::Prophetic => "Prophetic gifts involve speaking truth, challenging the status quo, and calling people back to God's heart. You have a deep sense of what God is saying and aren't afraid to speak up.",
        ApestDimension::Evangelistic => "Evangelistic gifts center on sharing the gospel and connecting with people who don't yet know Christ. You naturally build bridges between the church and the world.",
        ApestDimension::Shepherding => "Shepherding gifts focus on caring for, nurturing, and protecting God's people. You have a heart for helping others grow and supporting them through difficult times.",
        ApestDimension::Teaching => "Teaching gifts involve helping people understand and apply God's Word. You have a passion for discipleship and helping others develop a solid biblical foundation.",
    }
}

/// Narrative summary of a result.
pub fn generate_apest_insights(result: &ApestResult) -> String {
    let mut parts = vec![gift_description(result.primary_gift).to_string()];
    if result.secondary_gift != result.primary_gift {
        parts.push(format!(
            "Your secondary gift of {} complements your primary {} gift, creating a well-rounded ministry profile.",
            result.secondary_gift, result.primary_gift
        ));
    }
    let values: Vec<f64> = result.apest_scores.entries().into_iter().map(|e| e.1).collect();
    let highest = values.iter().cloned().fold(f64::MIN, f64::max);
    let lowest = values.iter().cloned().fold(f64::MAX, f64::min);
    if highest - lowest > SPECIALIZATION_SPREAD {
        parts.push("Your profile shows strong specialization in certain areas. Consider how you can work with others who have complementary gifts.".to_string());
    } else {
        parts.push("You have a relatively balanced profile across all APEST dimensions, making you versatile in ministry contexts.".to_string());
    }
    parts.join(" ")
}

fn action_items(gift: ApestDimension) -> [&'static str; 3] {
    match gift {
        ApestDimension::Apostolic => [
            "Consider starting a new ministry or expanding existing work",
            "Connect with other apostolic leaders for mentoring",
            "Develop skills in vision-casting and team building",
        ],
        ApestDimension::Prophetic => [
            "Find opportunities to speak truth in your context",
            "Develop discernment through prayer and Scripture study",
            "Connect with prophetic communities for accountability",
        ],
        ApestDimension::Evangelistic => [
            "Practice sharing your faith story regularly",
            "Build relationships with people outside the church",
            "Develop cultural intelligence for different contexts",
        ],
        ApestDimension::Shepherding => [
            "Mentor someone in their spiritual journey",
            "Develop counseling and care skills",
            "Create safe spaces for vulnerable conversations",
        ],
        ApestDimension::Teaching => [
            "Develop a systematic approach to discipleship",
            "Study theology and biblical interpretation",
            "Practice explaining complex concepts simply",
        ],
    }
}

fn content_topics(gift: ApestDimension) -> [&'static str; 3] {
    match gift {
        ApestDimension::Apostolic => ["Church Planting Resources", "Leadership Development", "Vision and Strategy"],
        ApestDimension::Prophetic => ["Social Justice Resources", "Spiritual Formation", "Cultural Engagement"],
        ApestDimension::Evangelistic => ["Evangelism Training", "Cross-Cultural Ministry", "Community Outreach"],
        ApestDimension::Shepherding => ["Pastoral Care Resources", "Counseling Skills", "Small Group Leadership"],
        ApestDimension::Teaching => ["Biblical Studies", "Theological Education", "Discipleship Resources"],
    }
}

pub fn generate_personalized_recommendations(result: &ApestResult) -> Recommendations {
    let mut rec = Recommendations::default();
    for (dim, score) in result.apest_scores.entries() {
        if score >= STRENGTH_THRESHOLD {
            rec.strengths.push(format!("Strong {} gifts - leverage this in your ministry", dim));
        }
        if score < GROWTH_THRESHOLD {
            rec.growth_areas.push(format!("Develop your {} gifts through intentional practice", dim));
        }
    }
    rec.action_items = action_items(result.primary_gift).iter().map(|s| s.to_string()).collect();
    rec.content_recommendations = content_topics(result.primary_gift).iter().map(|s| s.to_string()).collect();
    if result.secondary_gift != result.primary_gift {
        rec.action_items.push(action_items(result.secondary_gift)[0].to_string());
        rec.content_recommendations.push(content_topics(result.secondary_gift)[0].to_string());
    }
    rec
}

/// The two weakest dimensions, weakest first.
pub fn complementary_gifts(result: &ApestResult) -> Vec<String> {
    let mut entries = result.apest_scores.entries();
    entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    entries.into_iter().take(2).map(|(d, _)| d.as_str().to_string()).collect()
}
