use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Transactional;

use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::validation::validate_rating;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub stem: String,
    pub options: Vec<String>,
    /// 仅服务端可见
    pub correct_index: i32,
    pub difficulty_rating: f64,
    pub topic_id: String,
    pub created_at: DateTime<Utc>,
}

fn map_tx_error(error: TransactionError<StoreError>) -> StoreError {
    match error {
        TransactionError::Abort(store_error) => store_error,
        TransactionError::Storage(storage_error) => StoreError::Sled(storage_error),
    }
}

/// 蓄水池抽样：单次遍历中等概率地选出一个元素
pub fn reservoir_pick<T, E, I, R>(items: I, rng: &mut R) -> Result<Option<T>, E>
where
    I: IntoIterator<Item = Result<T, E>>,
    R: Rng + ?Sized,
{
    let mut chosen = None;
    let mut seen = 0u64;
    for item in items {
        let item = item?;
        seen += 1;
        if rng.gen_range(0..seen) == 0 {
            chosen = Some(item);
        }
    }
    Ok(chosen)
}

impl Store {
    pub fn insert_question(&self, question: &Question) -> Result<(), StoreError> {
        validate_rating(question.difficulty_rating)
            .map_err(|msg| StoreError::Validation(msg.to_string()))?;

        let key = keys::question_key(&question.id)?;
        let index_key =
            keys::topic_index_key(&question.topic_id, question.difficulty_rating, &question.id)?;
        let bytes = Self::serialize(question)?;

        (&self.questions, &self.questions_by_topic)
            .transaction(|(tx_questions, tx_index)| {
                if tx_questions.get(key.as_bytes())?.is_some() {
                    return Err(ConflictableTransactionError::Abort(StoreError::Conflict {
                        entity: "question".to_string(),
                        key: question.id.clone(),
                    }));
                }
                tx_questions.insert(key.as_bytes(), bytes.as_slice())?;
                tx_index.insert(index_key.as_bytes(), question.id.as_bytes())?;
                Ok(())
            })
            .map_err(map_tx_error)
    }

    pub fn get_question(&self, question_id: &str) -> Result<Option<Question>, StoreError> {
        let key = keys::question_key(question_id)?;
        match self.questions.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// 按主题与难度区间随机抽取一道题；区间内无题时返回 `None`
    pub fn sample_question_by_difficulty_with<R: Rng + ?Sized>(
        &self,
        topic_id: &str,
        min: f64,
        max: f64,
        rng: &mut R,
    ) -> Result<Option<Question>, StoreError> {
        let (start, end) = keys::topic_index_range(topic_id, min, max)?;
        // NaN 或反向区间直接视为空
        if !(min <= max) {
            return Ok(None);
        }

        let ids = self
            .questions_by_topic
            .range(start.as_bytes()..=end.as_bytes())
            .values();
        let Some(raw_id) = reservoir_pick(ids, rng)? else {
            return Ok(None);
        };

        self.resolve_indexed_question(&raw_id)
    }

    pub fn sample_question_by_difficulty(
        &self,
        topic_id: &str,
        min: f64,
        max: f64,
    ) -> Result<Option<Question>, StoreError> {
        self.sample_question_by_difficulty_with(topic_id, min, max, &mut rand::thread_rng())
    }

    /// 主题内难度最低的题目，同难度按题目 ID 升序
    pub fn get_easiest_question(&self, topic_id: &str) -> Result<Option<Question>, StoreError> {
        let prefix = keys::topic_index_prefix(topic_id)?;
        match self.questions_by_topic.scan_prefix(prefix.as_bytes()).next() {
            Some(item) => {
                let (_, raw_id) = item?;
                self.resolve_indexed_question(&raw_id)
            }
            None => Ok(None),
        }
    }

    pub fn count_topic_questions(&self, topic_id: &str) -> Result<usize, StoreError> {
        let prefix = keys::topic_index_prefix(topic_id)?;
        let mut count = 0usize;
        for item in self.questions_by_topic.scan_prefix(prefix.as_bytes()) {
            let _ = item?;
            count += 1;
        }
        Ok(count)
    }

    /// 更新题目难度，同一事务内迁移难度索引
    pub fn set_question_difficulty(
        &self,
        question_id: &str,
        rating: f64,
    ) -> Result<(), StoreError> {
        validate_rating(rating).map_err(|msg| StoreError::Validation(msg.to_string()))?;
        let key = keys::question_key(question_id)?;

        (&self.questions, &self.questions_by_topic)
            .transaction(|(tx_questions, tx_index)| {
                let Some(raw) = tx_questions.get(key.as_bytes())? else {
                    return Err(ConflictableTransactionError::Abort(StoreError::NotFound {
                        entity: "question".to_string(),
                        key: question_id.to_string(),
                    }));
                };
                let mut question: Question = serde_json::from_slice(&raw).map_err(|error| {
                    ConflictableTransactionError::Abort(StoreError::Serialization(error))
                })?;

                let old_index_key = keys::topic_index_key(
                    &question.topic_id,
                    question.difficulty_rating,
                    &question.id,
                )
                .map_err(ConflictableTransactionError::Abort)?;
                question.difficulty_rating = rating;
                let new_index_key = keys::topic_index_key(
                    &question.topic_id,
                    question.difficulty_rating,
                    &question.id,
                )
                .map_err(ConflictableTransactionError::Abort)?;
                let bytes = serde_json::to_vec(&question).map_err(|error| {
                    ConflictableTransactionError::Abort(StoreError::Serialization(error))
                })?;

                tx_index.remove(old_index_key.as_bytes())?;
                tx_index.insert(new_index_key.as_bytes(), question.id.as_bytes())?;
                tx_questions.insert(key.as_bytes(), bytes)?;
                Ok(())
            })
            .map_err(map_tx_error)
    }

    fn resolve_indexed_question(&self, raw_id: &[u8]) -> Result<Option<Question>, StoreError> {
        let question_id = match std::str::from_utf8(raw_id) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid UTF-8 in questions_by_topic index");
                return Ok(None);
            }
        };
        let question = self.get_question(question_id)?;
        if question.is_none() {
            tracing::warn!(question_id, "Dangling entry in questions_by_topic index");
        }
        Ok(question)
    }
}
