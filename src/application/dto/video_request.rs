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

use crate::domain::services::video_api::ReferenceImage;
use serde::Deserialize;

/// 创建视频任务的请求
///
/// 由 multipart 表单解析而来，字段全部可选，校验在用例中按固定顺序进行
#[derive(Debug, Default, Clone)]
pub struct SubmitVideoCommand {
    /// 客户端会话标识
    pub client_id: Option<String>,
    /// 客户端本地关联标记
    pub local_id: Option<String>,
    /// 提示词
    pub prompt: Option<String>,
    /// 生成模型
    pub model: Option<String>,
    /// 画面比例，例如 `16:9`
    pub aspect_ratio: Option<String>,
    /// 上传的参考图，必须恰好一张
    pub images: Vec<ReferenceImage>,
}

/// 任务列表查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub client_id: Option<String>,
}
