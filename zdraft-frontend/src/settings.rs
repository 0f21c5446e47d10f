//! 配置文件到运行时样式与导入参数的转换。

use zdraft_config::{AppConfig, DrawingConfig};
use zdraft_core::style::{DashParams, LineType, Rgb, StyleAttributes};
use zdraft_io::ImportOptions;

use crate::errors::FrontendError;

/// 新建图形的初始样式。
pub fn style_from_config(drawing: &DrawingConfig) -> Result<StyleAttributes, FrontendError> {
    let line_type =
        LineType::from_key(&drawing.line_type).ok_or_else(|| FrontendError::InvalidSetting {
            field: "drawing.line_type",
            message: format!("未知线型 \"{}\"", drawing.line_type),
        })?;
    let [r, g, b] = drawing.color;

    let mut style = StyleAttributes::default()
        .with_line_type(line_type)
        .with_color(Rgb::new(r, g, b))
        .with_dash_auto_mode(drawing.dash_auto_mode);
    style
        .set_line_thickness(drawing.line_thickness)
        .map_err(|err| FrontendError::InvalidSetting {
            field: "drawing.line_thickness",
            message: err.to_string(),
        })?;
    style
        .set_dash_params(DashParams {
            dash_length: drawing.dash_length,
            dash_gap: drawing.dash_gap,
            dash_space: drawing.dash_space,
            dot_length: drawing.dot_length,
            dot_space: drawing.dot_space,
        })
        .map_err(|err| FrontendError::InvalidSetting {
            field: "drawing.dash",
            message: err.to_string(),
        })?;
    Ok(style)
}

pub fn import_options_from_config(config: &AppConfig) -> Result<ImportOptions, FrontendError> {
    Ok(ImportOptions {
        target_size: config.import.target_size,
        default_style: style_from_config(&config.drawing)?,
    })
}
