mod common;

use axum::http::StatusCode;

use common::app::spawn_test_app;
use common::fixtures::seed_question;
use common::http::{get_json, submit_answer};

#[tokio::test]
async fn it_health_live_and_ready() {
    let app = spawn_test_app().await;

    assert_eq!(get_json(&app.app, "/health/live").await.status, StatusCode::OK);
    assert_eq!(get_json(&app.app, "/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn it_health_root_and_database() {
    let app = spawn_test_app().await;

    let root = get_json(&app.app, "/health").await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body["status"], "ok");
    assert!(root.body["uptimeSecs"].is_u64());

    let db = get_json(&app.app, "/health/database").await;
    assert_eq!(db.status, StatusCode::OK);
    assert_eq!(db.body["healthy"], true);
}

#[tokio::test]
async fn it_health_metrics_counts_quiz_operations() {
    let app = spawn_test_app().await;
    seed_question(&app.store, "q1", "math", 1000.0, 0);

    let submitted = submit_answer(&app.app, "s1", "q1", 0).await;
    assert_eq!(submitted.status, StatusCode::OK);

    let resp = get_json(&app.app, "/health/metrics").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["quiz"]["operations"]["submit_answer"]["callCount"], 1);
    assert_eq!(resp.body["quiz"]["windowSelections"], 1);
    assert_eq!(resp.body["elo"]["studentKFactor"], 32.0);
    assert_eq!(
        app.state.quiz().metrics_registry().snapshot().attempt_write_failures,
        0
    );
}
