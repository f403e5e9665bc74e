//! Published content and its categories.

pub mod repository;
pub mod seaorm;
pub mod service;

pub use repository::ContentRepository;
pub use seaorm::SeaOrmContentRepository;
pub use service::ContentService;
