// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{Extension, Json, Query};
use std::sync::Arc;

use crate::application::dto::video_request::TaskListQuery;
use crate::application::dto::video_response::TaskListResponseDto;
use crate::application::usecases::video_task::VideoTaskUseCase;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::video_api::VideoGenerationApi;
use crate::presentation::errors::{AppError, LIST_TASKS_FAILED};

/// 列出客户端的任务
pub async fn list_tasks<R, A>(
    Extension(use_case): Extension<Arc<VideoTaskUseCase<R, A>>>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<TaskListResponseDto>, AppError>
where
    R: TaskRepository + 'static,
    A: VideoGenerationApi + 'static,
{
    let client_id = query.client_id.unwrap_or_default();

    let tasks = use_case
        .list(&client_id)
        .await
        .map_err(|e| AppError::new(LIST_TASKS_FAILED, e))?;

    Ok(Json(TaskListResponseDto {
        success: true,
        tasks,
    }))
}
