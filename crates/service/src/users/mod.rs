//! User profiles: repository abstraction, SeaORM backing and the service.

pub mod repository;
pub mod seaorm;
pub mod service;

pub use repository::UserRepository;
pub use seaorm::SeaOrmUserRepository;
pub use service::UserService;
