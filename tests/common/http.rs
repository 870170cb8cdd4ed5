use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

/// 解析后的响应：状态码、响应头与 JSON 体（空体记为 `{}`）
pub struct JsonResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl JsonResponse {
    /// `{ success: true, data }` 信封中的 `data`
    pub fn data(&self) -> &Value {
        assert!(
            self.status.is_success(),
            "expected success, got {}: {}",
            self.status,
            self.body
        );
        assert_eq!(self.body["success"], true);
        &self.body["data"]
    }

    /// 错误信封：校验状态码与错误码，并要求带回 traceId
    pub fn assert_error(&self, status: StatusCode, code: &str) {
        assert_eq!(self.status, status, "body: {}", self.body);
        assert_eq!(self.body["success"], false);
        assert_eq!(self.body["code"], code);
        assert!(self.body["message"].is_string());
        assert!(self.body["traceId"].is_string());
    }

    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
    }

    pub fn f64_at(&self, field: &str) -> f64 {
        self.data()[field]
            .as_f64()
            .unwrap_or_else(|| panic!("data.{field} is not a number: {}", self.body))
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> JsonResponse {
    let mut builder = Request::builder().method(method).uri(path);
    for (k, v) in headers {
        builder = builder.header(*k, *v);
    }

    let req = match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request body"),
        None => builder.body(Body::empty()).expect("empty body"),
    };

    let resp = app.clone().oneshot(req).await.expect("oneshot response");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body bytes");
    let body = if bytes.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_slice(&bytes).expect("parse json body")
    };

    JsonResponse {
        status,
        headers,
        body,
    }
}

pub async fn get_json(app: &Router, path: &str) -> JsonResponse {
    send(app, Method::GET, path, None, &[]).await
}

pub async fn post_json(app: &Router, path: &str, body: Value) -> JsonResponse {
    send(app, Method::POST, path, Some(body), &[]).await
}

pub async fn submit_answer(
    app: &Router,
    student_id: &str,
    question_id: &str,
    chosen_index: i32,
) -> JsonResponse {
    post_json(
        app,
        "/api/quiz/answers",
        serde_json::json!({
            "studentId": student_id,
            "questionId": question_id,
            "chosenIndex": chosen_index,
            "timeTakenMs": 1500
        }),
    )
    .await
}

pub async fn next_question(app: &Router, student_id: &str, topic_id: &str) -> JsonResponse {
    post_json(
        app,
        "/api/quiz/next-question",
        serde_json::json!({ "studentId": student_id, "topicId": topic_id }),
    )
    .await
}
