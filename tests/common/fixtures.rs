use chrono::Utc;

use quiz_backend::store::operations::questions::Question;
use quiz_backend::store::Store;

pub fn seed_question(
    store: &Store,
    id: &str,
    topic_id: &str,
    difficulty: f64,
    correct_index: i32,
) -> Question {
    let question = Question {
        id: id.to_string(),
        stem: format!("What is {id}?"),
        options: vec![
            "alpha".to_string(),
            "beta".to_string(),
            "gamma".to_string(),
            "delta".to_string(),
        ],
        correct_index,
        difficulty_rating: difficulty,
        topic_id: topic_id.to_string(),
        created_at: Utc::now(),
    };
    store.insert_question(&question).expect("insert seed question");
    question
}

/// 按给定难度批量建题，id 为 `{topic}-q{idx}`
pub fn seed_topic(store: &Store, topic_id: &str, difficulties: &[f64]) -> Vec<Question> {
    difficulties
        .iter()
        .enumerate()
        .map(|(idx, d)| seed_question(store, &format!("{topic_id}-q{idx}"), topic_id, *d, 0))
        .collect()
}
