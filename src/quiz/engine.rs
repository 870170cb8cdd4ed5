use std::sync::Arc;

use chrono::Utc;

use crate::constants::MAX_ATTEMPT_PAGE_SIZE;
use crate::quiz::config::EloConfig;
use crate::quiz::elo::{self, RatingExchange};
use crate::quiz::error::QuizError;
use crate::quiz::metrics::{self, track_operation, PersistTarget, QuizOperation};
use crate::quiz::repository::QuizRepository;
use crate::quiz::selector::{self, Selection};
use crate::quiz::types::{AnswerSubmission, NewQuestion, PublicQuestion, SubmitOutcome};
use crate::store::operations::attempts::Attempt;
use crate::store::operations::questions::Question;
use crate::store::StoreError;
use crate::validation::{is_valid_id, validate_options, validate_rating, validate_stem};

/// Adaptive question selection and Elo scoring over an injected repository.
///
/// Concurrent submissions by the same student are not serialized: two
/// attempts that read the same pre-rating both write, and the last write
/// wins.
pub struct QuizEngine {
    config: EloConfig,
    repo: Arc<dyn QuizRepository>,
    metrics_registry: Arc<metrics::MetricsRegistry>,
}

fn ensure_id(kind: &'static str, value: &str) -> Result<(), QuizError> {
    if is_valid_id(value) {
        Ok(())
    } else {
        Err(QuizError::InvalidId {
            kind,
            value: value.to_string(),
        })
    }
}

impl QuizEngine {
    pub fn new(config: EloConfig, repo: Arc<dyn QuizRepository>) -> Self {
        Self {
            config,
            repo,
            metrics_registry: Arc::new(metrics::MetricsRegistry::new()),
        }
    }

    pub fn config(&self) -> &EloConfig {
        &self.config
    }

    pub fn metrics_registry(&self) -> &Arc<metrics::MetricsRegistry> {
        &self.metrics_registry
    }

    /// GetNextQuestion: select a question for the student within the topic.
    pub async fn next_question(
        &self,
        student_id: &str,
        topic_id: &str,
    ) -> Result<PublicQuestion, QuizError> {
        track_operation!(
            self.metrics_registry,
            QuizOperation::NextQuestion,
            self.next_question_inner(student_id, topic_id)
        )
    }

    fn next_question_inner(
        &self,
        student_id: &str,
        topic_id: &str,
    ) -> Result<PublicQuestion, QuizError> {
        ensure_id("student", student_id)?;
        ensure_id("topic", topic_id)?;

        let rating = self
            .repo
            .get_student_rating(student_id, self.config.default_rating)?;
        let selection = self.select(topic_id, rating)?;
        Ok(PublicQuestion::from(&selection.question))
    }

    /// SubmitAnswer: score, persist best-effort, and pick the next question.
    pub async fn submit_answer(
        &self,
        submission: AnswerSubmission,
    ) -> Result<SubmitOutcome, QuizError> {
        track_operation!(
            self.metrics_registry,
            QuizOperation::SubmitAnswer,
            self.submit_answer_inner(&submission)
        )
    }

    fn submit_answer_inner(&self, submission: &AnswerSubmission) -> Result<SubmitOutcome, QuizError> {
        let student_id = submission.student_id.as_str();
        let question_id = submission.question_id.as_str();

        ensure_id("student", student_id)?;
        ensure_id("question", question_id)?;
        if submission.time_taken_ms < 0 {
            return Err(QuizError::InvalidInput(
                "timeTakenMs must not be negative".to_string(),
            ));
        }

        let question = self
            .repo
            .get_question(question_id)?
            .ok_or_else(|| QuizError::not_found("question", question_id))?;

        let student_rating = self
            .repo
            .get_student_rating(student_id, self.config.default_rating)?;

        let correct = submission.chosen_index == question.correct_index;
        let exchange =
            elo::score_answer(student_rating, question.difficulty_rating, correct, &self.config);

        self.persist_best_effort(submission, &question, correct, &exchange);

        let next_question = match self.select(&question.topic_id, exchange.student_post) {
            Ok(selection) => Some(PublicQuestion::from(&selection.question)),
            Err(error) => {
                self.metrics_registry.record_next_question_omitted();
                tracing::warn!(
                    student_id,
                    topic_id = %question.topic_id,
                    error = %error,
                    "Next question selection failed, omitting from response"
                );
                None
            }
        };

        tracing::info!(
            student_id,
            question_id,
            correct,
            student_pre = exchange.student_pre,
            student_post = exchange.student_post,
            question_pre = exchange.question_pre,
            question_post = exchange.question_post,
            "Answer scored"
        );

        Ok(SubmitOutcome {
            correct,
            new_student_rating: exchange.student_post,
            question_rating: exchange.question_post,
            next_question,
        })
    }

    /// The three writes are independent; a failure in one is logged and
    /// counted but never surfaced, and does not stop the others.
    fn persist_best_effort(
        &self,
        submission: &AnswerSubmission,
        question: &Question,
        correct: bool,
        exchange: &RatingExchange,
    ) {
        let student_id = submission.student_id.as_str();

        if let Err(error) = self
            .repo
            .set_student_rating(student_id, exchange.student_post)
        {
            self.report_persist_failure(PersistTarget::StudentRating, student_id, &error);
        }

        if let Err(error) = self
            .repo
            .set_question_difficulty(&question.id, exchange.question_post)
        {
            self.report_persist_failure(PersistTarget::QuestionDifficulty, &question.id, &error);
        }

        let attempt = Attempt {
            id: uuid::Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            question_id: question.id.clone(),
            chosen_index: submission.chosen_index,
            correct,
            time_taken_ms: submission.time_taken_ms,
            attempted_at: Utc::now(),
            student_rating_pre: exchange.student_pre,
            student_rating_post: exchange.student_post,
            question_rating_pre: exchange.question_pre,
            question_rating_post: exchange.question_post,
        };
        if let Err(error) = self.repo.insert_attempt(&attempt) {
            self.report_persist_failure(PersistTarget::Attempt, &attempt.id, &error);
        }
    }

    fn report_persist_failure(&self, target: PersistTarget, key: &str, error: &StoreError) {
        self.metrics_registry.record_persist_failure(target);
        tracing::error!(
            target_kind = target.as_str(),
            key,
            error = %error,
            "Best-effort write failed, continuing with scored result"
        );
    }

    fn select(&self, topic_id: &str, rating: f64) -> Result<Selection, QuizError> {
        let selection = selector::select_question(self.repo.as_ref(), &self.config, topic_id, rating)?;
        self.metrics_registry.record_selection(selection.source);
        tracing::debug!(
            topic_id,
            rating,
            question_id = %selection.question.id,
            source = selection.source.as_str(),
            "Question selected"
        );
        Ok(selection)
    }

    pub async fn create_question(&self, input: NewQuestion) -> Result<Question, QuizError> {
        track_operation!(
            self.metrics_registry,
            QuizOperation::CreateQuestion,
            self.create_question_inner(input)
        )
    }

    fn create_question_inner(&self, input: NewQuestion) -> Result<Question, QuizError> {
        ensure_id("topic", &input.topic_id)?;
        validate_stem(&input.stem).map_err(|msg| QuizError::InvalidInput(msg.to_string()))?;
        validate_options(&input.options, input.correct_index).map_err(QuizError::InvalidInput)?;
        let difficulty_rating = input.difficulty_rating.unwrap_or(self.config.default_rating);
        validate_rating(difficulty_rating)
            .map_err(|msg| QuizError::InvalidInput(msg.to_string()))?;

        let question = Question {
            id: uuid::Uuid::new_v4().to_string(),
            stem: input.stem.trim().to_string(),
            options: input.options.iter().map(|o| o.trim().to_string()).collect(),
            correct_index: input.correct_index,
            difficulty_rating,
            topic_id: input.topic_id,
            created_at: Utc::now(),
        };
        self.repo.insert_question(&question)?;
        tracing::info!(question_id = %question.id, topic_id = %question.topic_id, "Question created");
        Ok(question)
    }

    pub async fn question(&self, question_id: &str) -> Result<PublicQuestion, QuizError> {
        ensure_id("question", question_id)?;
        self.repo
            .get_question(question_id)?
            .map(|q| PublicQuestion::from(&q))
            .ok_or_else(|| QuizError::not_found("question", question_id))
    }

    pub async fn student_rating(&self, student_id: &str) -> Result<f64, QuizError> {
        ensure_id("student", student_id)?;
        Ok(self
            .repo
            .get_student_rating(student_id, self.config.default_rating)?)
    }

    pub async fn attempt_history(
        &self,
        student_id: &str,
        limit: usize,
    ) -> Result<Vec<Attempt>, QuizError> {
        ensure_id("student", student_id)?;
        let limit = limit.clamp(1, MAX_ATTEMPT_PAGE_SIZE);
        Ok(self.repo.list_student_attempts(student_id, limit)?)
    }
}
