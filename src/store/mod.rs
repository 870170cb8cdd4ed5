pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub students: sled::Tree,
    pub questions: sled::Tree,
    pub attempts: sled::Tree,
    pub config_versions: sled::Tree,
    // Secondary index trees
    pub questions_by_topic: sled::Tree,
    pub attempt_ids: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("conflict: entity={entity}, key={key}")]
    Conflict { entity: String, key: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let students = db.open_tree(trees::STUDENTS)?;
        let questions = db.open_tree(trees::QUESTIONS)?;
        let attempts = db.open_tree(trees::ATTEMPTS)?;
        let config_versions = db.open_tree(trees::CONFIG_VERSIONS)?;
        let questions_by_topic = db.open_tree(trees::QUESTIONS_BY_TOPIC)?;
        let attempt_ids = db.open_tree(trees::ATTEMPT_IDS)?;

        Ok(Self {
            db,
            students,
            questions,
            attempts,
            config_versions,
            questions_by_topic,
            attempt_ids,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub fn raw_db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
