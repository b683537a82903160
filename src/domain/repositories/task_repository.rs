// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::video_task::{NewVideoTask, StatusPatch, VideoTask};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// 任务仓库特质
///
/// 定义视频任务的数据访问接口。按标识符的写操作返回受影响行数，
/// 找不到记录时返回 0 而不是错误。
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 插入新任务，返回本地标识符
    async fn create(&self, task: &NewVideoTask) -> Result<i64, RepositoryError>;
    /// 将远程任务标识符绑定到本地任务，已绑定的任务返回 0
    async fn bind_remote_id(
        &self,
        id: i64,
        remote_task_id: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, RepositoryError>;
    /// 按远程任务标识符覆盖状态字段
    async fn update_by_remote_id(
        &self,
        remote_task_id: &str,
        patch: &StatusPatch,
    ) -> Result<u64, RepositoryError>;
    /// 列出客户端的全部任务，最新创建的在前
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<VideoTask>, RepositoryError>;
    /// 根据本地标识符查找任务
    async fn find_by_id(&self, id: i64) -> Result<Option<VideoTask>, RepositoryError>;
}
