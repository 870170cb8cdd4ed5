use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::constants::{DEFAULT_RATING, QUESTION_K_FACTOR, RATING_WINDOW, STUDENT_K_FACTOR};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub cors_origin: String,
    pub elo: EloEnvConfig,
}

#[derive(Debug, Clone)]
pub struct EloEnvConfig {
    pub student_k_factor: f64,
    pub question_k_factor: f64,
    pub default_rating: f64,
    pub rating_window: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/quiz.sled"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            elo: EloEnvConfig {
                student_k_factor: env_or_parse("QUIZ_STUDENT_K_FACTOR", STUDENT_K_FACTOR),
                question_k_factor: env_or_parse("QUIZ_QUESTION_K_FACTOR", QUESTION_K_FACTOR),
                default_rating: env_or_parse("QUIZ_DEFAULT_RATING", DEFAULT_RATING),
                rating_window: env_or_parse("QUIZ_RATING_WINDOW", RATING_WINDOW),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
