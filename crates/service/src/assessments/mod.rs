//! Assessments, their questions, and user attempts with APEST scoring.

pub mod repository;
pub mod seaorm;
pub mod service;

pub use repository::AssessmentRepository;
pub use seaorm::SeaOrmAssessmentRepository;
pub use service::AssessmentService;
