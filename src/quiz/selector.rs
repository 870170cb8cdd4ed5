//! 自适应选题：在学生评分附近的难度窗口内随机选题，
//! 窗口内无题时回退到主题内最简单的题。

use crate::quiz::config::EloConfig;
use crate::quiz::error::QuizError;
use crate::quiz::repository::QuizRepository;
use crate::quiz::types::SelectionSource;
use crate::store::operations::questions::Question;

#[derive(Debug, Clone)]
pub struct Selection {
    pub question: Question,
    pub source: SelectionSource,
}

pub fn select_question(
    repo: &dyn QuizRepository,
    config: &EloConfig,
    topic_id: &str,
    student_rating: f64,
) -> Result<Selection, QuizError> {
    let (min, max) = config.window_bounds(student_rating);

    if let Some(question) = repo.sample_question_by_difficulty(topic_id, min, max)? {
        return Ok(Selection {
            question,
            source: SelectionSource::Window,
        });
    }

    tracing::debug!(
        topic_id,
        student_rating,
        min,
        max,
        "No question in rating window, falling back to easiest"
    );

    match repo.get_easiest_question(topic_id)? {
        Some(question) => Ok(Selection {
            question,
            source: SelectionSource::EasiestFallback,
        }),
        None => Err(QuizError::not_found("topic", topic_id)),
    }
}
