//! Storage contract consumed by the quiz engine.
//!
//! Each call is individually atomic; nothing here spans a transaction
//! across calls.

use crate::store::operations::attempts::Attempt;
use crate::store::operations::questions::Question;
use crate::store::{Store, StoreError};

pub trait QuizRepository: Send + Sync {
    /// Existing rating, or `default_rating` created atomically.
    fn get_student_rating(&self, student_id: &str, default_rating: f64)
        -> Result<f64, StoreError>;

    fn set_student_rating(&self, student_id: &str, rating: f64) -> Result<(), StoreError>;

    fn get_question(&self, question_id: &str) -> Result<Option<Question>, StoreError>;

    /// One uniformly random match, or `None` when the range is empty.
    fn sample_question_by_difficulty(
        &self,
        topic_id: &str,
        min: f64,
        max: f64,
    ) -> Result<Option<Question>, StoreError>;

    fn get_easiest_question(&self, topic_id: &str) -> Result<Option<Question>, StoreError>;

    fn set_question_difficulty(&self, question_id: &str, rating: f64) -> Result<(), StoreError>;

    fn insert_attempt(&self, attempt: &Attempt) -> Result<(), StoreError>;

    fn insert_question(&self, question: &Question) -> Result<(), StoreError>;

    fn list_student_attempts(
        &self,
        student_id: &str,
        limit: usize,
    ) -> Result<Vec<Attempt>, StoreError>;
}

impl QuizRepository for Store {
    fn get_student_rating(
        &self,
        student_id: &str,
        default_rating: f64,
    ) -> Result<f64, StoreError> {
        self.get_or_create_student_rating(student_id, default_rating)
    }

    fn set_student_rating(&self, student_id: &str, rating: f64) -> Result<(), StoreError> {
        Store::set_student_rating(self, student_id, rating)
    }

    fn get_question(&self, question_id: &str) -> Result<Option<Question>, StoreError> {
        Store::get_question(self, question_id)
    }

    fn sample_question_by_difficulty(
        &self,
        topic_id: &str,
        min: f64,
        max: f64,
    ) -> Result<Option<Question>, StoreError> {
        Store::sample_question_by_difficulty(self, topic_id, min, max)
    }

    fn get_easiest_question(&self, topic_id: &str) -> Result<Option<Question>, StoreError> {
        Store::get_easiest_question(self, topic_id)
    }

    fn set_question_difficulty(&self, question_id: &str, rating: f64) -> Result<(), StoreError> {
        Store::set_question_difficulty(self, question_id, rating)
    }

    fn insert_attempt(&self, attempt: &Attempt) -> Result<(), StoreError> {
        Store::insert_attempt(self, attempt)
    }

    fn insert_question(&self, question: &Question) -> Result<(), StoreError> {
        Store::insert_question(self, question)
    }

    fn list_student_attempts(
        &self,
        student_id: &str,
        limit: usize,
    ) -> Result<Vec<Attempt>, StoreError> {
        Store::list_student_attempts(self, student_id, limit)
    }
}
