use serde::{Deserialize, Serialize};

use crate::config::EloEnvConfig;
use crate::constants::{DEFAULT_RATING, QUESTION_K_FACTOR, RATING_WINDOW, STUDENT_K_FACTOR};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EloConfig {
    pub student_k_factor: f64,
    pub question_k_factor: f64,
    pub default_rating: f64,
    /// 选题窗口半宽：`[rating - window, rating + window]`
    pub rating_window: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            student_k_factor: STUDENT_K_FACTOR,
            question_k_factor: QUESTION_K_FACTOR,
            default_rating: DEFAULT_RATING,
            rating_window: RATING_WINDOW,
        }
    }
}

impl EloConfig {
    pub fn from_env(env: &EloEnvConfig) -> Self {
        let candidate = Self {
            student_k_factor: env.student_k_factor,
            question_k_factor: env.question_k_factor,
            default_rating: env.default_rating,
            rating_window: env.rating_window,
        };
        match candidate.validate() {
            Ok(()) => candidate,
            Err(reason) => {
                tracing::warn!(reason = %reason, "Invalid Elo config from env, using defaults");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("studentKFactor", self.student_k_factor),
            ("questionKFactor", self.question_k_factor),
            ("ratingWindow", self.rating_window),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a finite non-negative number"));
            }
        }
        if !self.default_rating.is_finite() {
            return Err("defaultRating must be finite".to_string());
        }
        Ok(())
    }

    /// 学生评分对应的选题难度区间
    pub fn window_bounds(&self, rating: f64) -> (f64, f64) {
        (rating - self.rating_window, rating + self.rating_window)
    }
}
