use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::quiz::engine::QuizEngine;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    quiz_engine: Arc<QuizEngine>,
    config: Arc<Config>,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<Store>, quiz_engine: Arc<QuizEngine>, config: &Config) -> Self {
        Self {
            store,
            quiz_engine,
            config: Arc::new(config.clone()),
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn quiz(&self) -> &QuizEngine {
        &self.quiz_engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
