use serde::{Deserialize, Serialize};

use crate::store::operations::questions::Question;

/// 对外暴露的题目视图，不含正确答案下标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: String,
    pub stem: String,
    pub options: Vec<String>,
    pub difficulty_rating: f64,
    pub topic_id: String,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            stem: q.stem.clone(),
            options: q.options.clone(),
            difficulty_rating: q.difficulty_rating,
            topic_id: q.topic_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub stem: String,
    pub options: Vec<String>,
    pub correct_index: i32,
    pub topic_id: String,
    pub difficulty_rating: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub student_id: String,
    pub question_id: String,
    pub chosen_index: i32,
    pub time_taken_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub correct: bool,
    pub new_student_rating: f64,
    pub question_rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<PublicQuestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionSource {
    /// 难度窗口内随机抽取
    Window,
    /// 窗口内无题，回退到主题内最简单的题
    EasiestFallback,
}

impl SelectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::EasiestFallback => "easiest_fallback",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn public_question_omits_answer_key() {
        let question = Question {
            id: "q1".to_string(),
            stem: "Capital of France?".to_string(),
            options: vec!["Paris".to_string(), "Rome".to_string()],
            correct_index: 0,
            difficulty_rating: 1000.0,
            topic_id: "geo".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(PublicQuestion::from(&question)).unwrap();
        assert!(json.get("correctIndex").is_none());
        assert_eq!(json["topicId"], "geo");
        assert_eq!(json["options"][1], "Rome");
    }

    #[test]
    fn outcome_without_next_question_skips_field() {
        let outcome = SubmitOutcome {
            correct: true,
            new_student_rating: 1016.0,
            question_rating: 984.0,
            next_question: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("nextQuestion").is_none());
        assert_eq!(json["newStudentRating"], 1016.0);
    }
}
