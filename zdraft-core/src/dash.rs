//! 虚线图案合成：手动模式直接取参数，自动模式按图形长度均分。

use crate::document::Shape;
use crate::metrics::length_of;
use crate::style::{LineType, StyleAttributes};

/// 开放图形自动模式下的划线段数。
pub const AUTO_DASH_REPEATS: usize = 10;
/// 闭合轮廓自动模式下的周期数。
pub const CLOSED_DASH_PERIODS: usize = 10;
/// 闭合轮廓每个周期中实线段所占比例；图案为单个周期，由渲染端循环。
pub const CLOSED_DASH_RATIO: f64 = 0.6;

/// 自动模式下划线、间隔与点的相对比例。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashRatios {
    pub dash: f64,
    pub gap: f64,
    pub dot: f64,
}

impl DashRatios {
    pub fn for_line_type(line_type: LineType) -> Option<Self> {
        match line_type {
            LineType::Solid => None,
            LineType::Dash => Some(Self {
                dash: 4.0,
                gap: 2.0,
                dot: 0.0,
            }),
            LineType::DashDot => Some(Self {
                dash: 4.0,
                gap: 2.0,
                dot: 2.0,
            }),
            LineType::DashDotDot => Some(Self {
                dash: 4.0,
                gap: 2.0,
                dot: 1.0,
            }),
        }
    }

    /// 两条划线之间的分隔序列（以比例单位计）。
    fn separator(self, line_type: LineType) -> Vec<f64> {
        match line_type {
            LineType::Solid => Vec::new(),
            LineType::Dash => vec![self.gap],
            LineType::DashDot => vec![self.gap, self.dot, self.gap],
            LineType::DashDotDot => vec![self.gap, self.dot, self.gap, self.dot, self.gap],
        }
    }
}

/// 图形当前样式对应的虚线图案（交替的实/空长度）。实线返回空序列。
pub fn dash_pattern_of(shape: &Shape) -> Vec<f64> {
    let style = shape.style();
    if style.line_type == LineType::Solid {
        return Vec::new();
    }
    let total = if style.dash_auto_mode {
        length_of(shape)
    } else {
        0.0
    };
    dash_pattern(style, total)
}

/// 按样式与图形长度合成虚线图案；`total_length` 仅在自动模式下使用。
pub fn dash_pattern(style: &StyleAttributes, total_length: f64) -> Vec<f64> {
    if style.line_type == LineType::Solid {
        return Vec::new();
    }
    if !style.dash_auto_mode {
        return manual_pattern(style);
    }

    let total = if total_length.is_finite() && total_length > 0.0 {
        total_length
    } else {
        1.0
    };
    if style.is_closed {
        closed_pattern(total)
    } else {
        open_pattern(style.line_type, total)
    }
}

fn manual_pattern(style: &StyleAttributes) -> Vec<f64> {
    let params = &style.dash_params;
    match style.line_type {
        LineType::Solid => Vec::new(),
        LineType::Dash => vec![params.dash_length, params.dash_gap],
        LineType::DashDot => vec![
            params.dash_length,
            params.dash_space,
            params.dot_length,
            params.dash_space,
        ],
        LineType::DashDotDot => vec![
            params.dash_length,
            params.dash_space,
            params.dot_length,
            params.dot_space,
            params.dot_length,
            params.dash_space,
        ],
    }
}

fn closed_pattern(total: f64) -> Vec<f64> {
    let period = total / CLOSED_DASH_PERIODS as f64;
    let on = period * CLOSED_DASH_RATIO;
    vec![on, period - on]
}

/// 以划线开始并以划线结束，图案总长恰为 `total`。
fn open_pattern(line_type: LineType, total: f64) -> Vec<f64> {
    let Some(ratios) = DashRatios::for_line_type(line_type) else {
        return Vec::new();
    };
    let separator = ratios.separator(line_type);
    let separator_units: f64 = separator.iter().sum();
    let repeats = AUTO_DASH_REPEATS as f64;
    let unit = total / (repeats * ratios.dash + (repeats - 1.0) * separator_units);

    let mut pattern = Vec::with_capacity(AUTO_DASH_REPEATS * (separator.len() + 1));
    for _ in 0..AUTO_DASH_REPEATS {
        pattern.push(ratios.dash * unit);
        pattern.extend(separator.iter().map(|units| units * unit));
    }
    pattern.truncate(pattern.len() - separator.len());
    pattern
}
