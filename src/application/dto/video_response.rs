// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::video_task::{TaskStatus, VideoTask};
use crate::domain::services::progress::display_progress;
use crate::domain::services::status_normalizer::CanonicalStatus;
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::Value;

/// 创建视频任务的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    /// 本地任务标识符
    pub db_id: i64,
    /// 远程任务标识符，远程未返回时为空
    pub remote_id: String,
    /// 远程返回的初始状态，未返回时为空
    pub status: String,
    /// 远程返回的初始进度
    pub progress: f64,
    /// 远程原始响应
    pub raw: Value,
}

/// 创建视频任务响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVideoResponseDto {
    pub success: bool,
    pub db_id: i64,
    pub id: String,
    pub status: String,
    pub progress: f64,
    pub display_progress: f64,
    pub raw: Value,
}

impl From<SubmitOutcome> for SubmitVideoResponseDto {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            success: true,
            db_id: outcome.db_id,
            id: outcome.remote_id,
            status: outcome.status,
            progress: outcome.progress,
            display_progress: display_progress(outcome.progress),
            raw: outcome.raw,
        }
    }
}

/// 查询视频任务响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatusResponseDto {
    pub success: bool,
    pub id: String,
    pub status: TaskStatus,
    pub progress: f64,
    pub display_progress: f64,
    pub video_url: String,
    pub error: String,
    pub raw: Value,
}

impl From<CanonicalStatus> for VideoStatusResponseDto {
    fn from(status: CanonicalStatus) -> Self {
        Self {
            success: true,
            id: status.id,
            status: status.status,
            progress: status.progress,
            display_progress: display_progress(status.progress),
            video_url: status.video_url,
            error: status.error,
            raw: status.raw,
        }
    }
}

/// 任务列表中的单个任务视图
///
/// `retry_hint`、`is_retrying`、`can_retry_after_refresh` 留给客户端使用，
/// 服务端始终返回空值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskViewDto {
    pub db_id: i64,
    pub local_id: String,
    pub api_id: String,
    pub prompt: String,
    pub model: String,
    pub aspect_ratio: String,
    pub image_name: String,
    pub status: TaskStatus,
    /// 已换算为 0-100 的展示进度
    pub progress: f64,
    pub video_url: String,
    pub error: String,
    pub retry_hint: String,
    pub created_at: String,
    pub is_retrying: bool,
    pub can_retry_after_refresh: bool,
}

impl From<VideoTask> for TaskViewDto {
    fn from(task: VideoTask) -> Self {
        Self {
            db_id: task.id,
            local_id: task.local_id,
            api_id: task.remote_task_id,
            prompt: task.prompt,
            model: task.model,
            aspect_ratio: task.aspect_ratio,
            image_name: task.image_name,
            status: task.status,
            progress: display_progress(task.progress),
            video_url: task.video_url,
            error: task.error_message,
            retry_hint: String::new(),
            created_at: task.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            is_retrying: false,
            can_retry_after_refresh: false,
        }
    }
}

/// 任务列表响应
#[derive(Debug, Serialize)]
pub struct TaskListResponseDto {
    pub success: bool,
    pub tasks: Vec<TaskViewDto>,
}
