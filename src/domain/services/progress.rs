// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 将存储的进度换算为 0-100 的展示百分比
///
/// 远程接口有时返回 0-1 的小数，有时返回 0-100 的百分比。这里按启发式区分：
/// `(1, 100]` 区间内视为已经是百分比，原样返回；其他值视为小数，乘以 100
/// 后四舍五入。恰好为 1 的值按小数处理（即 100%），而不是 1%。
/// 这只是一个启发式规则，边界值无法保证正确。
pub fn display_progress(progress: f64) -> f64 {
    if !progress.is_finite() {
        return 0.0;
    }
    if progress > 1.0 && progress <= 100.0 {
        progress
    } else {
        (progress * 100.0).round()
    }
}
