use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use serde::Serialize;

use crate::quiz::types::SelectionSource;

const LATENCY_BUCKETS: [u64; 6] = [100, 500, 1_000, 5_000, 10_000, u64::MAX];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizOperation {
    NextQuestion,
    SubmitAnswer,
    CreateQuestion,
}

impl QuizOperation {
    pub const ALL: [QuizOperation; 3] = [
        QuizOperation::NextQuestion,
        QuizOperation::SubmitAnswer,
        QuizOperation::CreateQuestion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NextQuestion => "next_question",
            Self::SubmitAnswer => "submit_answer",
            Self::CreateQuestion => "create_question",
        }
    }
}

/// 提交答案时按尽力而为语义写入的目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistTarget {
    StudentRating,
    QuestionDifficulty,
    Attempt,
}

impl PersistTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StudentRating => "student_rating",
            Self::QuestionDifficulty => "question_difficulty",
            Self::Attempt => "attempt",
        }
    }
}

#[derive(Default)]
pub struct OperationMetrics {
    pub call_count: AtomicU64,
    pub total_latency_us: AtomicU64,
    pub error_count: AtomicU64,
    pub last_called_at: AtomicI64,
    latency_buckets: [AtomicU64; 6],
}

impl OperationMetrics {
    fn record_latency_bucket(&self, latency_us: u64) {
        for (i, &threshold) in LATENCY_BUCKETS.iter().enumerate() {
            if latency_us <= threshold {
                self.latency_buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
    }

    fn bucket_counts(&self) -> [u64; 6] {
        let mut counts = [0u64; 6];
        for (slot, bucket) in counts.iter_mut().zip(&self.latency_buckets) {
            *slot = bucket.load(Ordering::Relaxed);
        }
        counts
    }
}

#[derive(Default)]
struct OutcomeCounters {
    window_selections: AtomicU64,
    fallback_selections: AtomicU64,
    next_question_omitted: AtomicU64,
    student_rating_write_failures: AtomicU64,
    question_difficulty_write_failures: AtomicU64,
    attempt_write_failures: AtomicU64,
}

pub struct MetricsRegistry {
    operations: HashMap<QuizOperation, OperationMetrics>,
    outcomes: OutcomeCounters,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        let operations = QuizOperation::ALL
            .iter()
            .map(|op| (*op, OperationMetrics::default()))
            .collect();
        Self {
            operations,
            outcomes: OutcomeCounters::default(),
        }
    }

    pub fn record_call(&self, op: QuizOperation, latency_us: u64, is_error: bool) {
        if let Some(metric) = self.operations.get(&op) {
            metric.call_count.fetch_add(1, Ordering::Relaxed);
            metric
                .total_latency_us
                .fetch_add(latency_us, Ordering::Relaxed);
            if is_error {
                metric.error_count.fetch_add(1, Ordering::Relaxed);
            }
            metric.record_latency_bucket(latency_us);
            metric
                .last_called_at
                .store(chrono::Utc::now().timestamp_millis(), Ordering::Relaxed);
        }
    }

    pub fn record_selection(&self, source: SelectionSource) {
        let counter = match source {
            SelectionSource::Window => &self.outcomes.window_selections,
            SelectionSource::EasiestFallback => &self.outcomes.fallback_selections,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_next_question_omitted(&self) {
        self.outcomes
            .next_question_omitted
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persist_failure(&self, target: PersistTarget) {
        let counter = match target {
            PersistTarget::StudentRating => &self.outcomes.student_rating_write_failures,
            PersistTarget::QuestionDifficulty => &self.outcomes.question_difficulty_write_failures,
            PersistTarget::Attempt => &self.outcomes.attempt_write_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let operations = self
            .operations
            .iter()
            .map(|(op, metric)| {
                (
                    op.as_str().to_string(),
                    OperationSnapshot {
                        call_count: metric.call_count.load(Ordering::Relaxed),
                        total_latency_us: metric.total_latency_us.load(Ordering::Relaxed),
                        error_count: metric.error_count.load(Ordering::Relaxed),
                        latency_buckets: metric.bucket_counts(),
                    },
                )
            })
            .collect();

        let o = &self.outcomes;
        MetricsSnapshot {
            operations,
            window_selections: o.window_selections.load(Ordering::Relaxed),
            fallback_selections: o.fallback_selections.load(Ordering::Relaxed),
            next_question_omitted: o.next_question_omitted.load(Ordering::Relaxed),
            student_rating_write_failures: o.student_rating_write_failures.load(Ordering::Relaxed),
            question_difficulty_write_failures: o
                .question_difficulty_write_failures
                .load(Ordering::Relaxed),
            attempt_write_failures: o.attempt_write_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSnapshot {
    pub call_count: u64,
    pub total_latency_us: u64,
    pub error_count: u64,
    pub latency_buckets: [u64; 6],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub operations: HashMap<String, OperationSnapshot>,
    pub window_selections: u64,
    pub fallback_selections: u64,
    pub next_question_omitted: u64,
    pub student_rating_write_failures: u64,
    pub question_difficulty_write_failures: u64,
    pub attempt_write_failures: u64,
}

macro_rules! track_operation {
    ($registry:expr, $op:expr, $block:expr) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let latency_us = start.elapsed().as_micros() as u64;
        $registry.record_call($op, latency_us, result.is_err());
        result
    }};
}

pub(crate) use track_operation;
