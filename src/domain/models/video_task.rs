// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 视频生成任务实体
///
/// 本地持久化的任务记录。`remote_task_id` 在远程接口受理之前为空，
/// 绑定之后作为状态更新的查找键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTask {
    /// 本地自增标识符
    pub id: i64,
    /// 所属客户端会话
    pub client_id: String,
    /// 客户端提供的关联标记，可能为空
    pub local_id: String,
    /// 远程任务标识符，未绑定时为空
    pub remote_task_id: String,
    /// 提示词
    pub prompt: String,
    /// 生成模型
    pub model: String,
    /// 画面比例（客户端原始值）
    pub aspect_ratio: String,
    /// 参考图文件名
    pub image_name: String,
    /// 任务状态
    pub status: TaskStatus,
    /// 进度，刻度不确定（0-1 或 0-100）
    pub progress: f64,
    /// 生成成功后的视频地址
    pub video_url: String,
    /// 失败原因
    pub error_message: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 最后更新时间
    pub updated_at: DateTime<Utc>,
}

impl VideoTask {
    /// 是否已经绑定远程任务标识符
    pub fn is_bound(&self) -> bool {
        !self.remote_task_id.is_empty()
    }
}

/// 待插入的新任务
#[derive(Debug, Clone)]
pub struct NewVideoTask {
    pub client_id: String,
    pub local_id: String,
    pub prompt: String,
    pub model: String,
    pub aspect_ratio: String,
    pub image_name: String,
    pub status: TaskStatus,
    pub progress: f64,
    pub created_at: DateTime<Utc>,
}

impl NewVideoTask {
    /// 创建一条处于 `creating` 状态、进度为 0 的新任务
    pub fn creating(
        client_id: String,
        local_id: String,
        prompt: String,
        model: String,
        aspect_ratio: String,
        image_name: String,
    ) -> Self {
        Self {
            client_id,
            local_id,
            prompt,
            model,
            aspect_ratio,
            image_name,
            status: TaskStatus::Creating,
            progress: 0.0,
            created_at: Utc::now(),
        }
    }
}

/// 按远程任务标识符写入的状态补丁
///
/// 每次写入都会整体覆盖这几个字段
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPatch {
    pub status: TaskStatus,
    pub progress: f64,
    pub video_url: String,
    pub error_message: String,
    pub updated_at: DateTime<Utc>,
}

impl StatusPatch {
    /// 远程查询失败时使用的补丁
    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failed,
            progress: 0.0,
            video_url: String::new(),
            error_message: error_message.into(),
            updated_at: Utc::now(),
        }
    }
}

/// 任务状态
///
/// 状态集合是开放的：远程接口返回的任何值都会原样保存在 `Other` 中。
/// 没有定义状态转换图。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// 已入队
    #[default]
    Queued,
    /// 本地已创建，尚未被远程受理
    Creating,
    /// 生成中
    Processing,
    /// 生成成功
    Succeeded,
    /// 生成失败
    Failed,
    /// 远程响应中没有任何状态信息
    Unknown,
    /// 远程定义的其他状态
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Creating => "creating",
            TaskStatus::Processing => "processing",
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
            TaskStatus::Unknown => "unknown",
            TaskStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "queued" => TaskStatus::Queued,
            "creating" => TaskStatus::Creating,
            "processing" => TaskStatus::Processing,
            "succeeded" => TaskStatus::Succeeded,
            "failed" => TaskStatus::Failed,
            "unknown" => TaskStatus::Unknown,
            other => TaskStatus::Other(other.to_string()),
        })
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        TaskStatus::from(s.to_string())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// 远程接口的尺寸词汇
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSize {
    /// 16x9
    Landscape,
    /// 9x16
    Portrait,
}

impl VideoSize {
    /// 将客户端画面比例转换为远程尺寸，未识别的比例一律按横屏处理
    pub fn from_aspect_ratio(aspect_ratio: &str) -> Self {
        match aspect_ratio {
            "9:16" => VideoSize::Portrait,
            _ => VideoSize::Landscape,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoSize::Landscape => "16x9",
            VideoSize::Portrait => "9x16",
        }
    }
}

impl fmt::Display for VideoSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
