use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Transactional;

use crate::store::keys;
use crate::store::{Store, StoreError};

/// 单次作答的审计记录，写入后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: String,
    pub student_id: String,
    pub question_id: String,
    pub chosen_index: i32,
    pub correct: bool,
    pub time_taken_ms: i64,
    pub attempted_at: DateTime<Utc>,
    pub student_rating_pre: f64,
    pub student_rating_post: f64,
    pub question_rating_pre: f64,
    pub question_rating_post: f64,
}

impl Store {
    /// 写入一次性答题记录；同一 attempt id 再次写入返回 `Conflict`
    pub fn insert_attempt(&self, attempt: &Attempt) -> Result<(), StoreError> {
        let id_key = keys::attempt_id_key(&attempt.id)?;
        // 同一微秒内的先后由单调递增的序号区分
        let key = keys::attempt_key(
            &attempt.student_id,
            attempt.attempted_at.timestamp_micros(),
            self.raw_db().generate_id()?,
        )?;
        let bytes = Self::serialize(attempt)?;

        (&self.attempts, &self.attempt_ids)
            .transaction(|(tx_attempts, tx_ids)| {
                if tx_ids.get(id_key.as_bytes())?.is_some() {
                    return Err(ConflictableTransactionError::Abort(StoreError::Conflict {
                        entity: "attempt".to_string(),
                        key: attempt.id.clone(),
                    }));
                }
                tx_attempts.insert(key.as_bytes(), bytes.as_slice())?;
                tx_ids.insert(id_key.as_bytes(), key.as_bytes())?;
                Ok(())
            })
            .map_err(|error| match error {
                TransactionError::Abort(store_error) => store_error,
                TransactionError::Storage(storage_error) => StoreError::Sled(storage_error),
            })
    }

    /// 学生答题记录，按时间倒序
    pub fn list_student_attempts(
        &self,
        student_id: &str,
        limit: usize,
    ) -> Result<Vec<Attempt>, StoreError> {
        let prefix = keys::attempt_prefix(student_id)?;
        let mut attempts = Vec::new();
        for item in self.attempts.scan_prefix(prefix.as_bytes()) {
            if attempts.len() >= limit {
                break;
            }
            let (_, value) = item?;
            attempts.push(Self::deserialize::<Attempt>(&value)?);
        }
        Ok(attempts)
    }

    pub fn count_student_attempts(&self, student_id: &str) -> Result<usize, StoreError> {
        let prefix = keys::attempt_prefix(student_id)?;
        let mut count = 0usize;
        for item in self.attempts.scan_prefix(prefix.as_bytes()) {
            let _ = item?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    use super::*;

    fn attempt(id: &str, student: &str, offset_secs: i64) -> Attempt {
        Attempt {
            id: id.to_string(),
            student_id: student.to_string(),
            question_id: "q1".to_string(),
            chosen_index: 0,
            correct: true,
            time_taken_ms: 1200,
            attempted_at: Utc::now() + Duration::seconds(offset_secs),
            student_rating_pre: 1000.0,
            student_rating_post: 1016.0,
            question_rating_pre: 1000.0,
            question_rating_post: 984.0,
        }
    }

    #[test]
    fn attempts_listed_newest_first() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        store.insert_attempt(&attempt("a1", "s1", 0)).unwrap();
        store.insert_attempt(&attempt("a2", "s1", 5)).unwrap();
        store.insert_attempt(&attempt("a3", "s2", 10)).unwrap();

        let listed = store.list_student_attempts("s1", 10).unwrap();
        let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a1"]);
        assert_eq!(store.count_student_attempts("s1").unwrap(), 2);
        assert_eq!(store.list_student_attempts("s1", 1).unwrap().len(), 1);
    }

    #[test]
    fn attempts_within_one_millisecond_listed_newest_first() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        let base = Utc::now();
        let mut older = attempt("a-older", "s1", 0);
        older.attempted_at = base;
        let mut newer = attempt("z-newer", "s1", 0);
        newer.attempted_at = base + Duration::microseconds(300);
        let mut same_instant = attempt("m-latest", "s1", 0);
        same_instant.attempted_at = newer.attempted_at;

        store.insert_attempt(&older).unwrap();
        store.insert_attempt(&newer).unwrap();
        store.insert_attempt(&same_instant).unwrap();

        let listed = store.list_student_attempts("s1", 10).unwrap();
        let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["m-latest", "z-newer", "a-older"]);
    }

    #[test]
    fn attempt_is_write_once() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        let first = attempt("a1", "s1", 0);
        store.insert_attempt(&first).unwrap();
        let mut rewrite = first.clone();
        rewrite.correct = false;

        let err = store.insert_attempt(&rewrite).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
        assert_eq!(store.list_student_attempts("s1", 10).unwrap()[0], first);
    }

    #[test]
    fn attempt_snapshot_round_trips() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        let record = attempt("a1", "s1", 0);
        store.insert_attempt(&record).unwrap();
        let stored = &store.list_student_attempts("s1", 1).unwrap()[0];
        assert_eq!(stored.student_rating_pre, 1000.0);
        assert_eq!(stored.student_rating_post, 1016.0);
        assert_eq!(stored.question_rating_pre, 1000.0);
        assert_eq!(stored.question_rating_post, 984.0);
    }
}
