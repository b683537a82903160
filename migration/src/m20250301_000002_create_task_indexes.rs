use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tasks::Tasks;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing is always scoped to one client
        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_client_id")
                    .table(Tasks::Table)
                    .col(Tasks::ClientId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Status updates are addressed by the remote task id
        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_api_task_id")
                    .table(Tasks::Table)
                    .col(Tasks::ApiTaskId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_tasks_api_task_id")
                    .table(Tasks::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_tasks_client_id")
                    .table(Tasks::Table)
                    .to_owned(),
            )
            .await
    }
}
