use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::validation::validate_rating;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRating {
    pub student_id: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentRating {
    fn new(student_id: &str, rating: f64) -> Self {
        let now = Utc::now();
        Self {
            student_id: student_id.to_string(),
            rating,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Store {
    pub fn get_student(&self, student_id: &str) -> Result<Option<StudentRating>, StoreError> {
        let key = keys::student_key(student_id)?;
        match self.students.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// 读取学生评分，不存在时以默认值原子创建
    pub fn get_or_create_student_rating(
        &self,
        student_id: &str,
        default_rating: f64,
    ) -> Result<f64, StoreError> {
        if let Some(existing) = self.get_student(student_id)? {
            return Ok(existing.rating);
        }

        let key = keys::student_key(student_id)?;
        let record = StudentRating::new(student_id, default_rating);

        // 仅在键不存在时写入，并发首次读取只会创建一条记录
        let cas_result = self.students.compare_and_swap(
            key.as_bytes(),
            None::<&[u8]>,
            Some(Self::serialize(&record)?),
        )?;

        match cas_result {
            Ok(()) => {
                tracing::debug!(student_id, rating = default_rating, "Created student rating");
                Ok(default_rating)
            }
            Err(current) => match current.current {
                Some(raw) => Ok(Self::deserialize::<StudentRating>(&raw)?.rating),
                None => Err(StoreError::Conflict {
                    entity: "student".to_string(),
                    key: student_id.to_string(),
                }),
            },
        }
    }

    pub fn set_student_rating(&self, student_id: &str, rating: f64) -> Result<(), StoreError> {
        validate_rating(rating).map_err(|msg| StoreError::Validation(msg.to_string()))?;
        let key = keys::student_key(student_id)?;
        let record = match self.get_student(student_id)? {
            Some(mut existing) => {
                existing.rating = rating;
                existing.updated_at = Utc::now();
                existing
            }
            None => StudentRating::new(student_id, rating),
        };
        self.students
            .insert(key.as_bytes(), Self::serialize(&record)?)?;
        Ok(())
    }
}
