// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RemoteApiSettings;
use crate::domain::services::video_api::{
    RemoteApiError, VideoGenerationApi, VideoGenerationRequest,
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// VectorEngine 视频接口客户端
///
/// 通过 Bearer 令牌调用 `/videos` 与 `/videos/{id}`
pub struct VectorEngineClient {
    /// HTTP 客户端
    client: reqwest::Client,
    /// 以 `/` 结尾的接口基础地址
    base_url: Url,
    /// 访问令牌
    token: Option<String>,
}

impl VectorEngineClient {
    /// 根据配置创建客户端
    pub fn new(settings: &RemoteApiSettings) -> anyhow::Result<Self> {
        let mut base = settings.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let token = settings
            .api_token
            .clone()
            .filter(|t| !t.trim().is_empty());

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn videos_url(&self) -> Result<Url, RemoteApiError> {
        self.base_url
            .join("videos")
            .map_err(|e| RemoteApiError::transport(format!("Invalid remote URL: {}", e)))
    }

    fn video_url(&self, remote_task_id: &str) -> Result<Url, RemoteApiError> {
        let mut url = self.videos_url()?;
        url.path_segments_mut()
            .map_err(|_| RemoteApiError::transport("Remote base URL cannot be a base"))?
            .push(remote_task_id);
        Ok(url)
    }

    fn bearer(&self) -> Result<String, RemoteApiError> {
        self.token
            .as_ref()
            .map(|t| format!("Bearer {}", t))
            .ok_or_else(|| RemoteApiError::transport("Remote API token is not configured"))
    }

    async fn read_response(response: reqwest::Response) -> Result<Value, RemoteApiError> {
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read remote response body: {}", e);
            RemoteApiError::transport(e.to_string())
        })?;
        let body = parse_body(&text);

        if status.is_success() {
            Ok(body)
        } else {
            Err(RemoteApiError::http(status.as_u16(), body))
        }
    }
}

/// 解析响应体：空响应视为 `{}`，非 JSON 响应原样作为字符串
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl VideoGenerationApi for VectorEngineClient {
    fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    async fn submit(&self, request: VideoGenerationRequest) -> Result<Value, RemoteApiError> {
        let url = self.videos_url()?;
        let image = request.image;

        let part = Part::bytes(image.data.to_vec())
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| RemoteApiError::transport(format!("Invalid image content type: {}", e)))?;

        let form = Form::new()
            .text("model", request.model)
            .text("prompt", request.prompt)
            .text("seconds", request.seconds.to_string())
            .text("size", request.size.to_string())
            .text("watermark", request.watermark.to_string())
            .part("input_reference", part);

        debug!("Submitting video generation request to {}", url);

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.bearer()?)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Video submission transport failure: {}", e);
                RemoteApiError::transport(e.to_string())
            })?;

        Self::read_response(response).await
    }

    async fn fetch_status(&self, remote_task_id: &str) -> Result<Value, RemoteApiError> {
        let url = self.video_url(remote_task_id)?;

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.bearer()?)
            .send()
            .await
            .map_err(|e| {
                error!("Video status transport failure for {}: {}", remote_task_id, e);
                RemoteApiError::transport(e.to_string())
            })?;

        Self::read_response(response).await
    }
}

#[cfg(test)]
#[path = "vector_engine_test.rs"]
mod tests;
