// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 远程视频生成接口的 HTTP 实现
pub mod vector_engine;
