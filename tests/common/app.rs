use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use quiz_backend::config::{Config, EloEnvConfig};
use quiz_backend::quiz::config::EloConfig;
use quiz_backend::quiz::engine::QuizEngine;
use quiz_backend::routes::build_router;
use quiz_backend::state::AppState;
use quiz_backend::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<Store>,
    pub config: Config,
    _temp_dir: TempDir,
}

pub async fn spawn_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("quiz-test.sled");

    // 直接构造 Config，避免使用 set_var 造成多线程测试环境变量竞态
    let config = Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: sled_path.to_string_lossy().to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        elo: EloEnvConfig {
            student_k_factor: 32.0,
            question_k_factor: 32.0,
            default_rating: 1000.0,
            rating_window: 75.0,
        },
    };

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let engine = Arc::new(QuizEngine::new(
        EloConfig::from_env(&config.elo),
        store.clone(),
    ));
    let state = AppState::new(store.clone(), engine, &config);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        store,
        config,
        _temp_dir: temp_dir,
    }
}
