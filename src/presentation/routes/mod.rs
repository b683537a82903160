// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::usecases::video_task::VideoTaskUseCase;
use crate::config::settings::Settings;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::video_api::VideoGenerationApi;
use crate::presentation::handlers::{task_handler, video_handler};
use axum::{
    extract::{DefaultBodyLimit, Extension},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 参数
///
/// * `use_case` - 视频任务用例
/// * `settings` - 应用配置
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes<R, A>(use_case: Arc<VideoTaskUseCase<R, A>>, settings: Arc<Settings>) -> Router
where
    R: TaskRepository + 'static,
    A: VideoGenerationApi + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health_check))
        .route("/api/tasks", get(task_handler::list_tasks::<R, A>))
        .route("/api/videos", post(video_handler::create_video::<R, A>))
        .route("/api/videos/{id}", get(video_handler::get_video::<R, A>))
        .layer(DefaultBodyLimit::max(settings.upload.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(use_case))
        .layer(Extension(settings))
}

/// 存活横幅
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "veo relay backend is running",
        "status": "ok",
    }))
}

/// 健康检查端点
pub async fn health_check(Extension(settings): Extension<Arc<Settings>>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "service is healthy",
        "port": settings.server.port,
    }))
}
