//! 文本坐标输入：直角坐标 `"X Y"` 或极坐标 `"R θ"`（角度单位为度）。

use zdraft_core::construct::polar_to_cartesian;
use zdraft_core::geometry::Point2;

use crate::errors::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSystem {
    #[default]
    Cartesian,
    Polar,
}

impl CoordinateSystem {
    pub fn key(self) -> &'static str {
        match self {
            CoordinateSystem::Cartesian => "cartesian",
            CoordinateSystem::Polar => "polar",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CoordinateSystem::Cartesian => "直角坐标",
            CoordinateSystem::Polar => "极坐标",
        }
    }
}

/// 解析单个有限数值，接受逗号作为小数点。
pub fn parse_number(field: &'static str, text: &str) -> Result<f64, EngineError> {
    let trimmed = text.trim();
    let value = trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| EngineError::invalid_edit(field, trimmed))?;
    if !value.is_finite() {
        return Err(EngineError::invalid_edit(field, trimmed));
    }
    Ok(value)
}

/// 解析以空白分隔的两个分量。
pub fn parse_point(text: &str, system: CoordinateSystem) -> Result<Point2, EngineError> {
    let mut parts = text.split_whitespace();
    let (Some(first), Some(second), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(EngineError::invalid_edit("point", text.trim()));
    };
    match system {
        CoordinateSystem::Cartesian => Ok(Point2::new(
            parse_number("x", first)?,
            parse_number("y", second)?,
        )),
        CoordinateSystem::Polar => {
            let radius = parse_number("radius", first)?;
            if radius < 0.0 {
                return Err(EngineError::invalid_edit("radius", first));
            }
            let angle = parse_number("angle", second)?;
            Ok(polar_to_cartesian(radius, angle))
        }
    }
}
