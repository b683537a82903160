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

use axum::extract::{multipart::MultipartError, Extension, Json, Multipart, Path};
use std::sync::Arc;
use tracing::debug;

use crate::{
    application::dto::video_request::SubmitVideoCommand,
    application::dto::video_response::{SubmitVideoResponseDto, VideoStatusResponseDto},
    application::usecases::video_task::{VideoTaskError, VideoTaskUseCase},
    domain::repositories::task_repository::TaskRepository,
    domain::services::video_api::{ReferenceImage, VideoGenerationApi},
    presentation::errors::{AppError, CREATE_VIDEO_FAILED, QUERY_VIDEO_FAILED},
};

/// 解析创建视频任务的 multipart 表单
///
/// 只有带文件名的 `image` 字段才被视为参考图；未知字段被忽略
async fn read_submit_form(mut multipart: Multipart) -> Result<SubmitVideoCommand, MultipartError> {
    let mut command = SubmitVideoCommand::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "image" => {
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    debug!("Ignoring non-file image field");
                    continue;
                };
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;
                command.images.push(ReferenceImage {
                    file_name,
                    content_type,
                    data,
                });
            }
            "prompt" => command.prompt = Some(field.text().await?),
            "model" => command.model = Some(field.text().await?),
            "aspectRatio" => command.aspect_ratio = Some(field.text().await?),
            "clientId" => command.client_id = Some(field.text().await?),
            "localId" => command.local_id = Some(field.text().await?),
            other => debug!("Ignoring unexpected form field {}", other),
        }
    }

    Ok(command)
}

pub async fn create_video<R, A>(
    Extension(use_case): Extension<Arc<VideoTaskUseCase<R, A>>>,
    multipart: Multipart,
) -> Result<Json<SubmitVideoResponseDto>, AppError>
where
    R: TaskRepository + 'static,
    A: VideoGenerationApi + 'static,
{
    let command = read_submit_form(multipart).await.map_err(|e| {
        AppError::new(
            CREATE_VIDEO_FAILED,
            VideoTaskError::Validation {
                field: "body",
                message: format!("invalid multipart body: {}", e.body_text()),
            },
        )
    })?;

    let outcome = use_case
        .submit(command)
        .await
        .map_err(|e| AppError::new(CREATE_VIDEO_FAILED, e))?;

    Ok(Json(outcome.into()))
}

pub async fn get_video<R, A>(
    Path(id): Path<String>,
    Extension(use_case): Extension<Arc<VideoTaskUseCase<R, A>>>,
) -> Result<Json<VideoStatusResponseDto>, AppError>
where
    R: TaskRepository + 'static,
    A: VideoGenerationApi + 'static,
{
    let status = use_case
        .poll(&id)
        .await
        .map_err(|e| AppError::new(QUERY_VIDEO_FAILED, e))?;

    Ok(Json(status.into()))
}
