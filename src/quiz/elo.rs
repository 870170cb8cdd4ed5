//! Elo rating exchange between a student and a question.
//!
//! The question plays the opponent: it "wins" when the student answers
//! incorrectly. Ratings are unbounded; no clamping is applied.

use serde::Serialize;

use crate::constants::ELO_SCALE;
use crate::quiz::config::EloConfig;

/// Expected score for player A against player B, in (0, 1).
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / ELO_SCALE))
}

pub fn updated_rating(old_rating: f64, k: f64, actual_score: f64, expected_score: f64) -> f64 {
    old_rating + k * (actual_score - expected_score)
}

/// Actual scores for (student, question) given a binary answer.
pub fn actual_scores(correct: bool) -> (f64, f64) {
    if correct {
        (1.0, 0.0)
    } else {
        (0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingExchange {
    pub student_expected: f64,
    pub question_expected: f64,
    pub student_pre: f64,
    pub student_post: f64,
    pub question_pre: f64,
    pub question_post: f64,
}

/// Score one answer and compute both post-attempt ratings.
pub fn score_answer(
    student_rating: f64,
    question_rating: f64,
    correct: bool,
    config: &EloConfig,
) -> RatingExchange {
    let student_expected = expected_score(student_rating, question_rating);
    let question_expected = 1.0 - student_expected;
    let (student_actual, question_actual) = actual_scores(correct);

    RatingExchange {
        student_expected,
        question_expected,
        student_pre: student_rating,
        student_post: updated_rating(
            student_rating,
            config.student_k_factor,
            student_actual,
            student_expected,
        ),
        question_pre: question_rating,
        question_post: updated_rating(
            question_rating,
            config.question_k_factor,
            question_actual,
            question_expected,
        ),
    }
}
