// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_broken_store_server, create_test_app, FakeVideoApi};
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};
use veo_relay::domain::models::video_task::TaskStatus;
use veo_relay::domain::repositories::task_repository::TaskRepository;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn submit_form(client_id: &str, with_image: bool) -> MultipartForm {
    let form = MultipartForm::new()
        .add_text("prompt", "a red kite over the sea")
        .add_text("model", "veo3-fast")
        .add_text("aspectRatio", "16:9")
        .add_text("clientId", client_id)
        .add_text("localId", "local-1");

    if with_image {
        form.add_part(
            "image",
            Part::bytes(b"fake-png-bytes".to_vec())
                .file_name("kite.png")
                .mime_type("image/png"),
        )
    } else {
        form
    }
}

/// 根路径与健康检查
#[tokio::test]
async fn test_banner_and_health() {
    let remote = MockServer::start().await;
    let app = create_test_app(&format!("{}/v1", remote.uri()), Some(TOKEN)).await;

    let response = app.server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "ok");

    let response = app.server.get("/api/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["port"], 3001);
}

/// 缺少 clientId 时任务列表返回 400
#[tokio::test]
async fn test_list_tasks_requires_client_id() {
    let remote = MockServer::start().await;
    let app = create_test_app(&format!("{}/v1", remote.uri()), Some(TOKEN)).await;

    let response = app.server.get("/api/tasks").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("clientId"));

    let response = app
        .server
        .get("/api/tasks")
        .add_query_param("clientId", "nobody")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"success": true, "tasks": []}));
}

/// 提交、查询、列表的完整流程
#[tokio::test]
async fn test_submit_poll_and_list_flow() {
    let remote = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "video-123",
            "status": "queued",
            "progress": 0
        })))
        .expect(1)
        .mount(&remote)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/videos/video-123"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "video-123",
            "detail": {
                "status": "processing",
                "pending_info": { "progress_pct": 0.42 }
            }
        })))
        .mount(&remote)
        .await;

    let app = create_test_app(&format!("{}/v1", remote.uri()), Some(TOKEN)).await;

    let response = app
        .server
        .post("/api/videos")
        .multipart(submit_form("client-9", true))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], "video-123");
    assert_eq!(body["status"], "queued");
    assert_eq!(body["raw"]["id"], "video-123");
    let db_id = body["dbId"].as_i64().unwrap();

    let response = app.server.get("/api/videos/video-123").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["id"], "video-123");
    assert_eq!(body["status"], "processing");
    assert_eq!(body["progress"], 0.42);
    assert_eq!(body["displayProgress"], 42.0);
    assert_eq!(body["videoUrl"], "");
    assert_eq!(body["error"], "");

    let task = app.repo.find_by_id(db_id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Processing);
    assert_eq!(task.progress, 0.42);

    let response = app
        .server
        .get("/api/tasks")
        .add_query_param("clientId", "client-9")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["dbId"], db_id);
    assert_eq!(tasks[0]["apiId"], "video-123");
    assert_eq!(tasks[0]["localId"], "local-1");
    assert_eq!(tasks[0]["imageName"], "kite.png");
    assert_eq!(tasks[0]["progress"], 42.0);
    assert_eq!(tasks[0]["isRetrying"], false);
}

/// 缺少参考图返回 400 且不调用远程接口
#[tokio::test]
async fn test_submit_without_image_is_rejected() {
    let remote = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&remote)
        .await;

    let app = create_test_app(&format!("{}/v1", remote.uri()), Some(TOKEN)).await;

    let response = app
        .server
        .post("/api/videos")
        .multipart(submit_form("client-9", false))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("image"));
}

/// 未配置令牌时提交与查询都返回 500
#[tokio::test]
async fn test_missing_token_is_server_error() {
    let remote = MockServer::start().await;
    let app = create_test_app(&format!("{}/v1", remote.uri()), None).await;

    let response = app
        .server
        .post("/api/videos")
        .multipart(submit_form("client-9", true))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["success"], false);

    let response = app.server.get("/api/videos/anything").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// 远程返回 404 时透传状态码和响应体，并把本地记录标记为失败
#[tokio::test]
async fn test_remote_not_found_is_passed_through() {
    let remote = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "gone-1"})))
        .mount(&remote)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/videos/gone-1"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": {"message": "task not found"}})),
        )
        .mount(&remote)
        .await;

    let app = create_test_app(&format!("{}/v1", remote.uri()), Some(TOKEN)).await;

    let response = app
        .server
        .post("/api/videos")
        .multipart(submit_form("client-9", true))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let db_id = response.json::<Value>()["dbId"].as_i64().unwrap();

    let response = app.server.get("/api/videos/gone-1").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["detail"]["error"]["message"], "task not found");

    let task = app.repo.find_by_id(db_id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Failed);
    assert_eq!(task.error_message, "task not found");
}

/// 远程提交失败时透传状态码，本地记录停留在 creating
#[tokio::test]
async fn test_submit_remote_failure_is_passed_through() {
    let remote = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"error": {"message": "quota exceeded"}})),
        )
        .expect(1)
        .mount(&remote)
        .await;

    let app = create_test_app(&format!("{}/v1", remote.uri()), Some(TOKEN)).await;

    let response = app
        .server
        .post("/api/videos")
        .multipart(submit_form("client-9", true))
        .await;
    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "failed to create video task");
    assert_eq!(body["detail"]["error"]["message"], "quota exceeded");

    let tasks = app.repo.list_by_client("client-9").await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Creating);
    assert!(!tasks[0].is_bound());
}

/// 存储故障时任务列表返回 500 并附带原因
#[tokio::test]
async fn test_list_tasks_storage_failure() {
    let server = create_broken_store_server(FakeVideoApi::new());

    let response = server
        .get("/api/tasks")
        .add_query_param("clientId", "client-9")
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "failed to list tasks");
    assert!(body["detail"].as_str().unwrap().contains("disk I/O error"));
}
