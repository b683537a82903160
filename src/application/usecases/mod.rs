// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// - 视频任务（video_task）：创建、查询、列出视频生成任务
pub mod video_task;
