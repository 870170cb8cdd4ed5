pub mod config;
pub mod elo;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod repository;
pub mod selector;
pub mod types;

pub use error::QuizError;
