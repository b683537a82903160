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

use crate::domain::models::video_task::{NewVideoTask, StatusPatch, VideoTask};
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use crate::infrastructure::database::entities::task as task_entity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::debug;

/// 任务仓库实现
///
/// 基于SeaORM实现的任务数据访问层
#[derive(Clone)]
pub struct TaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl TaskRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<task_entity::Model> for VideoTask {
    fn from(model: task_entity::Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            local_id: model.local_id,
            remote_task_id: model.api_task_id,
            prompt: model.prompt,
            model: model.model,
            aspect_ratio: model.aspect_ratio,
            image_name: model.image_name,
            status: model.status.into(),
            progress: model.progress,
            video_url: model.video_url,
            error_message: model.error_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&NewVideoTask> for task_entity::ActiveModel {
    fn from(task: &NewVideoTask) -> Self {
        Self {
            id: NotSet,
            client_id: Set(task.client_id.clone()),
            local_id: Set(task.local_id.clone()),
            api_task_id: Set(String::new()),
            prompt: Set(task.prompt.clone()),
            model: Set(task.model.clone()),
            aspect_ratio: Set(task.aspect_ratio.clone()),
            image_name: Set(task.image_name.clone()),
            status: Set(task.status.to_string()),
            progress: Set(task.progress),
            video_url: Set(String::new()),
            error_message: Set(String::new()),
            created_at: Set(task.created_at),
            updated_at: Set(task.created_at),
        }
    }
}

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    async fn create(&self, task: &NewVideoTask) -> Result<i64, RepositoryError> {
        let model: task_entity::ActiveModel = task.into();

        let result = task_entity::Entity::insert(model)
            .exec(self.db.as_ref())
            .await?;

        debug!(
            "Inserted task {} for client {}",
            result.last_insert_id, task.client_id
        );
        Ok(result.last_insert_id)
    }

    async fn bind_remote_id(
        &self,
        id: i64,
        remote_task_id: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let result = task_entity::Entity::update_many()
            .col_expr(
                task_entity::Column::ApiTaskId,
                Expr::value(remote_task_id.to_string()),
            )
            .col_expr(task_entity::Column::UpdatedAt, Expr::value(updated_at))
            .filter(task_entity::Column::Id.eq(id))
            // 绑定只发生一次，已绑定的任务不会被覆盖
            .filter(task_entity::Column::ApiTaskId.eq(""))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }

    async fn update_by_remote_id(
        &self,
        remote_task_id: &str,
        patch: &StatusPatch,
    ) -> Result<u64, RepositoryError> {
        // Unbound rows carry an empty api_task_id and must never match.
        if remote_task_id.is_empty() {
            return Ok(0);
        }

        let result = task_entity::Entity::update_many()
            .col_expr(
                task_entity::Column::Status,
                Expr::value(patch.status.to_string()),
            )
            .col_expr(task_entity::Column::Progress, Expr::value(patch.progress))
            .col_expr(
                task_entity::Column::VideoUrl,
                Expr::value(patch.video_url.clone()),
            )
            .col_expr(
                task_entity::Column::ErrorMessage,
                Expr::value(patch.error_message.clone()),
            )
            .col_expr(task_entity::Column::UpdatedAt, Expr::value(patch.updated_at))
            .filter(task_entity::Column::ApiTaskId.eq(remote_task_id))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<VideoTask>, RepositoryError> {
        let models = task_entity::Entity::find()
            .filter(task_entity::Column::ClientId.eq(client_id))
            .order_by_desc(task_entity::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(VideoTask::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<VideoTask>, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }
}
