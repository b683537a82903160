use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Video generation tasks, one row per submission
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tasks::ClientId).string().not_null())
                    .col(ColumnDef::new(Tasks::LocalId).string().not_null().default(""))
                    .col(ColumnDef::new(Tasks::ApiTaskId).string().not_null().default(""))
                    .col(ColumnDef::new(Tasks::Prompt).text().not_null())
                    .col(ColumnDef::new(Tasks::Model).string().not_null())
                    .col(ColumnDef::new(Tasks::AspectRatio).string().not_null())
                    .col(ColumnDef::new(Tasks::ImageName).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Tasks::Status)
                            .string()
                            .not_null()
                            .default("queued"),
                    )
                    .col(ColumnDef::new(Tasks::Progress).double().not_null().default(0.0))
                    .col(ColumnDef::new(Tasks::VideoUrl).text().not_null().default(""))
                    .col(ColumnDef::new(Tasks::ErrorMessage).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Tasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Tasks {
    Table,
    Id,
    ClientId,
    LocalId,
    ApiTaskId,
    Prompt,
    Model,
    AspectRatio,
    ImageName,
    Status,
    Progress,
    VideoUrl,
    ErrorMessage,
    CreatedAt,
    UpdatedAt,
}
