// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::application::dto::video_request::SubmitVideoCommand;
use crate::application::dto::video_response::{SubmitOutcome, TaskViewDto};
use crate::domain::models::video_task::{NewVideoTask, StatusPatch, TaskStatus, VideoSize};
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use crate::domain::services::status_normalizer::{
    id_field, normalize, numeric_field, remote_error_message, string_field, CanonicalStatus,
};
use crate::domain::services::video_api::{
    RemoteApiError, VideoGenerationApi, VideoGenerationRequest,
};
use crate::infrastructure::metrics::{
    TASKS_SUBMITTED, TASKS_SUBMIT_FAILED, TASK_POLLS, TASK_POLL_FAILURES,
};

/// 远程查询失败且响应体中没有错误信息时写入的默认原因
pub const POLL_FAILED_MESSAGE: &str = "failed to query video task";

/// 视频任务用例错误
#[derive(Error, Debug)]
pub enum VideoTaskError {
    /// 调用方输入有误，`field` 为第一个不合法的字段
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// 服务端缺少必要配置
    #[error("{0}")]
    Configuration(String),

    /// 远程接口返回非成功状态或传输失败
    #[error("Remote API error: {0}")]
    RemoteApi(#[from] RemoteApiError),

    /// 本地持久化失败
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl VideoTaskError {
    fn validation(field: &'static str, message: &str) -> Self {
        VideoTaskError::Validation {
            field,
            message: message.to_string(),
        }
    }
}

// === Section: Use Case Definition ===

/// 视频任务生命周期编排
///
/// 负责 创建 → 提交远程 → 绑定远程ID → 查询状态 → 更新本地记录 的完整流程。
/// 仓库和远程接口都通过构造函数注入。
pub struct VideoTaskUseCase<R: TaskRepository, A: VideoGenerationApi> {
    task_repo: Arc<R>,
    video_api: Arc<A>,
}

// === Section: Implementation ===

impl<R: TaskRepository, A: VideoGenerationApi> VideoTaskUseCase<R, A> {
    pub fn new(task_repo: Arc<R>, video_api: Arc<A>) -> Self {
        Self {
            task_repo,
            video_api,
        }
    }

    fn ensure_configured(&self) -> Result<(), VideoTaskError> {
        if self.video_api.is_configured() {
            Ok(())
        } else {
            Err(VideoTaskError::Configuration(
                "VECTOR_API_TOKEN is not configured".to_string(),
            ))
        }
    }

    /// 创建视频任务
    ///
    /// 校验顺序：远程凭证、clientId、prompt、model、aspectRatio、image。
    /// 所有校验都在产生任何副作用之前完成。远程提交失败时本地记录保持
    /// `creating` 状态且没有远程ID，不做任何补偿。
    pub async fn submit(&self, command: SubmitVideoCommand) -> Result<SubmitOutcome, VideoTaskError> {
        self.ensure_configured()?;

        let client_id = command
            .client_id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| VideoTaskError::validation("clientId", "clientId must not be empty"))?;
        let prompt = command
            .prompt
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| VideoTaskError::validation("prompt", "prompt must not be empty"))?;
        let model = command
            .model
            .filter(|v| !v.is_empty())
            .ok_or_else(|| VideoTaskError::validation("model", "model must not be empty"))?;
        let aspect_ratio = command
            .aspect_ratio
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                VideoTaskError::validation("aspectRatio", "aspectRatio must not be empty")
            })?;

        let mut images = command.images;
        if images.len() != 1 {
            return Err(VideoTaskError::validation(
                "image",
                "exactly one reference image is required",
            ));
        }
        let image = images.remove(0);

        let new_task = NewVideoTask::creating(
            client_id,
            command.local_id.unwrap_or_default(),
            prompt.clone(),
            model.clone(),
            aspect_ratio.clone(),
            image.file_name.clone(),
        );
        let db_id = self.task_repo.create(&new_task).await?;
        info!(
            "Created task {} for client {} (model {}, aspect ratio {})",
            db_id, new_task.client_id, model, aspect_ratio
        );

        let size = VideoSize::from_aspect_ratio(&aspect_ratio);
        let request = VideoGenerationRequest::new(model, prompt, size, image);

        let data = match self.video_api.submit(request).await {
            Ok(data) => data,
            Err(e) => {
                counter!(TASKS_SUBMIT_FAILED).increment(1);
                error!("Remote submission for task {} failed: {}", db_id, e);
                return Err(e.into());
            }
        };

        let remote_id = id_field(&data);
        let status = string_field(&data, "status");
        let progress = numeric_field(&data, "progress").unwrap_or(0.0);

        if remote_id.is_empty() {
            warn!(
                "Remote API accepted task {} without returning an id; it stays unbound",
                db_id
            );
        } else {
            let now = Utc::now();
            self.task_repo.bind_remote_id(db_id, &remote_id, now).await?;

            let initial_status = if status.is_empty() {
                TaskStatus::Queued
            } else {
                TaskStatus::from(status.as_str())
            };
            let patch = StatusPatch {
                status: initial_status,
                progress,
                video_url: string_field(&data, "video_url"),
                error_message: String::new(),
                updated_at: now,
            };
            self.task_repo.update_by_remote_id(&remote_id, &patch).await?;
            info!("Bound task {} to remote task {}", db_id, remote_id);
        }

        counter!(TASKS_SUBMITTED).increment(1);

        Ok(SubmitOutcome {
            db_id,
            remote_id,
            status,
            progress,
            raw: data,
        })
    }

    /// 查询远程任务状态并同步到本地
    ///
    /// 远程查询失败时尽力把本地记录标记为 `failed`，这一步的存储错误被吞掉，
    /// 调用方收到的始终是原始的远程错误。
    pub async fn poll(&self, remote_task_id: &str) -> Result<CanonicalStatus, VideoTaskError> {
        self.ensure_configured()?;

        if remote_task_id.trim().is_empty() {
            return Err(VideoTaskError::validation("id", "task id must not be empty"));
        }

        counter!(TASK_POLLS).increment(1);

        let data = match self.video_api.fetch_status(remote_task_id).await {
            Ok(data) => data,
            Err(e) => {
                counter!(TASK_POLL_FAILURES).increment(1);
                error!("Status query for remote task {} failed: {}", remote_task_id, e);
                self.mark_failed(remote_task_id, &e).await;
                return Err(e.into());
            }
        };

        let normalized = normalize(&data);
        let affected = self
            .task_repo
            .update_by_remote_id(remote_task_id, &normalized.to_patch(Utc::now()))
            .await?;

        debug!(
            "Remote task {} is {} ({}), {} local row(s) updated",
            remote_task_id, normalized.status, normalized.progress, affected
        );

        Ok(normalized)
    }

    async fn mark_failed(&self, remote_task_id: &str, cause: &RemoteApiError) {
        let message = cause
            .body
            .as_ref()
            .and_then(remote_error_message)
            .unwrap_or_else(|| POLL_FAILED_MESSAGE.to_string());

        match self
            .task_repo
            .update_by_remote_id(remote_task_id, &StatusPatch::failed(message))
            .await
        {
            Ok(affected) => info!(
                "Marked {} local row(s) of remote task {} as failed",
                affected, remote_task_id
            ),
            Err(e) => warn!(
                "Could not mark remote task {} as failed: {}",
                remote_task_id, e
            ),
        }
    }

    /// 列出客户端的全部任务，进度已换算为展示百分比
    pub async fn list(&self, client_id: &str) -> Result<Vec<TaskViewDto>, VideoTaskError> {
        if client_id.trim().is_empty() {
            return Err(VideoTaskError::validation(
                "clientId",
                "clientId must not be empty",
            ));
        }

        let tasks = self.task_repo.list_by_client(client_id).await?;
        Ok(tasks.into_iter().map(TaskViewDto::from).collect())
    }
}
