// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 状态归一化（status_normalizer）：把不同形态的远程状态响应统一为规范结构
/// - 进度换算（progress）：统一小数与百分比两种进度刻度
/// - 视频接口（video_api）：远程视频生成服务的抽象
pub mod progress;
pub mod status_normalizer;
pub mod video_api;
