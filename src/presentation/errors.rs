// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::usecases::video_task::VideoTaskError;

/// 创建视频任务失败时的概述
pub const CREATE_VIDEO_FAILED: &str = "failed to create video task";
/// 查询视频任务失败时的概述
pub const QUERY_VIDEO_FAILED: &str = "failed to query video task";
/// 获取任务列表失败时的概述
pub const LIST_TASKS_FAILED: &str = "failed to list tasks";

/// 应用错误类型
///
/// 封装用例错误，并附带当前操作的概述。
/// 校验与配置错误直接返回错误信息；远程与存储错误返回概述并在 `detail` 中附带原因。
#[derive(Debug)]
pub struct AppError {
    summary: &'static str,
    inner: VideoTaskError,
}

impl AppError {
    pub fn new(summary: &'static str, inner: VideoTaskError) -> Self {
        Self { summary, inner }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.inner {
            VideoTaskError::Validation { message, .. } => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": message }),
            ),
            VideoTaskError::Configuration(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": message }),
            ),
            VideoTaskError::RemoteApi(remote) => {
                let status = remote
                    .status
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (
                    status,
                    json!({ "success": false, "error": self.summary, "detail": remote.detail() }),
                )
            }
            VideoTaskError::Storage(storage) => {
                error!("{}: {}", self.summary, storage);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": self.summary, "detail": storage.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
