// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::video_task::{StatusPatch, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// 规范化后的任务状态
///
/// 无论远程响应是扁平结构还是嵌套在 `detail` / `detail.pending_info` 下，
/// 都会被归一化为同一个结构。`raw` 保留原始响应用于排查问题。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalStatus {
    /// 远程响应中的任务标识符，缺失时为空
    pub id: String,
    pub status: TaskStatus,
    pub progress: f64,
    pub video_url: String,
    pub error: String,
    pub raw: Value,
}

impl CanonicalStatus {
    /// 转换为写入本地记录的状态补丁
    pub fn to_patch(&self, updated_at: DateTime<Utc>) -> StatusPatch {
        StatusPatch {
            status: self.status.clone(),
            progress: self.progress,
            video_url: self.video_url.clone(),
            error_message: self.error.clone(),
            updated_at,
        }
    }
}

/// 状态字段可能出现的位置，按优先级排列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusSource {
    /// `status`
    TopLevel,
    /// `detail.status`
    Detail,
    /// `detail.pending_info.status`
    PendingInfo,
}

const STATUS_SOURCES: [StatusSource; 3] = [
    StatusSource::TopLevel,
    StatusSource::Detail,
    StatusSource::PendingInfo,
];

impl StatusSource {
    fn extract(self, payload: &Value) -> Option<&str> {
        let value = match self {
            StatusSource::TopLevel => payload.get("status"),
            StatusSource::Detail => payload.pointer("/detail/status"),
            StatusSource::PendingInfo => payload.pointer("/detail/pending_info/status"),
        };
        value.and_then(Value::as_str).filter(|s| !s.is_empty())
    }
}

/// 进度字段可能出现的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProgressSource {
    /// `progress`
    TopLevel,
    /// `detail.pending_info.progress_pct`
    PendingInfo,
}

const PROGRESS_SOURCES: [ProgressSource; 2] = [ProgressSource::TopLevel, ProgressSource::PendingInfo];

impl ProgressSource {
    // A present zero is a value, not an absence.
    fn extract(self, payload: &Value) -> Option<f64> {
        let value = match self {
            ProgressSource::TopLevel => payload.get("progress"),
            ProgressSource::PendingInfo => payload.pointer("/detail/pending_info/progress_pct"),
        };
        value.and_then(numeric)
    }
}

/// 错误信息可能出现的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorSource {
    /// `error` 本身是字符串
    PlainString,
    /// `error.message`
    ErrorObject,
    /// `detail.pending_info.failure_reason`
    FailureReason,
}

const ERROR_SOURCES: [ErrorSource; 3] = [
    ErrorSource::PlainString,
    ErrorSource::ErrorObject,
    ErrorSource::FailureReason,
];

impl ErrorSource {
    fn extract(self, payload: &Value) -> Option<&str> {
        match self {
            // any string counts here, even an empty one
            ErrorSource::PlainString => payload.get("error").and_then(Value::as_str),
            ErrorSource::ErrorObject => payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty()),
            ErrorSource::FailureReason => payload
                .pointer("/detail/pending_info/failure_reason")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty()),
        }
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
        _ => None,
    }
}

/// 将远程状态响应归一化
///
/// 该函数是全函数：任何字段缺失或类型不符都会退化为默认值，不会失败。
pub fn normalize(payload: &Value) -> CanonicalStatus {
    let status = STATUS_SOURCES
        .iter()
        .find_map(|source| source.extract(payload))
        .map(TaskStatus::from)
        .unwrap_or(TaskStatus::Unknown);

    let progress = PROGRESS_SOURCES
        .iter()
        .find_map(|source| source.extract(payload))
        .unwrap_or(0.0);

    let error = ERROR_SOURCES
        .iter()
        .find_map(|source| source.extract(payload))
        .unwrap_or_default()
        .to_string();

    CanonicalStatus {
        id: id_field(payload),
        status,
        progress,
        video_url: string_field(payload, "video_url"),
        error,
        raw: payload.clone(),
    }
}

/// 从远程错误响应体中提取可读的错误信息
///
/// 只看 `error` 字符串和 `error.message`，空字符串视为缺失
pub fn remote_error_message(body: &Value) -> Option<String> {
    [ErrorSource::PlainString, ErrorSource::ErrorObject]
        .iter()
        .find_map(|source| source.extract(body).filter(|s| !s.is_empty()))
        .map(str::to_string)
}

/// 读取顶层字符串字段，缺失或非字符串时返回空串
pub fn string_field(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// 读取远程任务标识符，数字形式的 `id` 转为字符串
pub fn id_field(payload: &Value) -> String {
    match payload.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// 读取顶层数值字段
pub fn numeric_field(payload: &Value, key: &str) -> Option<f64> {
    payload.get(key).and_then(numeric)
}
