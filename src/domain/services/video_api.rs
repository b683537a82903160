// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::video_task::VideoSize;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

/// 提交给远程接口的固定视频时长（秒）
pub const VIDEO_SECONDS: u32 = 8;

/// 参考图
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    /// 原始文件名
    pub file_name: String,
    /// MIME 类型
    pub content_type: String,
    /// 文件内容
    pub data: Bytes,
}

/// 视频生成请求
#[derive(Debug, Clone)]
pub struct VideoGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub seconds: u32,
    pub size: VideoSize,
    pub watermark: bool,
    pub image: ReferenceImage,
}

impl VideoGenerationRequest {
    /// 使用固定时长、关闭水印创建请求
    pub fn new(model: String, prompt: String, size: VideoSize, image: ReferenceImage) -> Self {
        Self {
            model,
            prompt,
            seconds: VIDEO_SECONDS,
            size,
            watermark: false,
            image,
        }
    }
}

/// 远程接口错误
///
/// 非 2xx 响应会带上状态码和响应体；传输层失败两者都为空
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct RemoteApiError {
    /// 远程返回的 HTTP 状态码
    pub status: Option<u16>,
    /// 远程返回的响应体
    pub body: Option<Value>,
    /// 错误描述
    pub message: String,
}

impl RemoteApiError {
    /// 传输层失败（连接、超时、解码等）
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }

    /// 远程返回了非成功状态码
    pub fn http(status: u16, body: Value) -> Self {
        Self {
            status: Some(status),
            message: format!("Remote API responded with status {}", status),
            body: Some(body),
        }
    }

    /// 用于响应的详情：优先返回远程响应体，否则返回错误描述
    pub fn detail(&self) -> Value {
        self.body
            .clone()
            .unwrap_or_else(|| Value::String(self.message.clone()))
    }
}

/// 视频生成接口特质
///
/// 远程视频生成服务的抽象，便于在测试中替换
#[async_trait]
pub trait VideoGenerationApi: Send + Sync {
    /// 是否配置了访问凭证
    fn is_configured(&self) -> bool;

    /// 提交生成任务，返回远程响应体
    async fn submit(&self, request: VideoGenerationRequest) -> Result<Value, RemoteApiError>;

    /// 查询远程任务状态，返回远程响应体
    async fn fetch_status(&self, remote_task_id: &str) -> Result<Value, RemoteApiError>;
}
