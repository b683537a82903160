// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体：
/// - 视频任务（video_task）：本地任务记录、状态标签与尺寸词汇
pub mod video_task;
