//! DXF 属性词汇表：ACI 色号、标准线宽与线型名称。

use zdraft_core::style::{LineType, Rgb, STANDARD_COLORS, StyleAttributes};

use crate::parser::RawAttributes;

/// 随层颜色（BYLAYER）。
pub const ACI_BY_LAYER: u16 = 256;

/// 标准线宽表，单位 0.01 mm，升序。
pub const STANDARD_LINEWEIGHTS: [i16; 24] = [
    0, 5, 9, 13, 15, 18, 20, 25, 30, 35, 40, 50, 53, 60, 70, 80, 90, 100, 106, 120, 140, 158, 200,
    211,
];

/// 导出时写入 LTYPE 表的线型定义。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinetypeDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// 正值为实线段，负值为空白，0 为点。
    pub pattern: &'static [f64],
}

impl LinetypeDefinition {
    pub fn total_length(&self) -> f64 {
        self.pattern.iter().map(|element| element.abs()).sum()
    }
}

pub const LINETYPES: [LinetypeDefinition; 4] = [
    LinetypeDefinition {
        name: "CONTINUOUS",
        description: "Solid line",
        pattern: &[],
    },
    LinetypeDefinition {
        name: "DASHED",
        description: "Dashed __ __ __",
        pattern: &[10.0, -5.0],
    },
    LinetypeDefinition {
        name: "DASHDOT",
        description: "Dash dot __ . __ .",
        pattern: &[10.0, -3.0, 0.0, -3.0],
    },
    LinetypeDefinition {
        name: "DASHDOT2",
        description: "Dash dot dot __ . . __",
        pattern: &[10.0, -3.0, 0.0, -3.0, 0.0, -3.0],
    },
];

/// ACI 0..=9 查表；其余色号（含 256 随层）返回 `None`。
pub fn color_from_aci(index: i16) -> Option<Rgb> {
    usize::try_from(index)
        .ok()
        .and_then(|index| STANDARD_COLORS.get(index))
        .map(|(_, color)| *color)
}

/// 最接近的标准色号：精确匹配优先，距离相同取较小色号。
pub fn nearest_aci(color: Rgb) -> u16 {
    if let Some(index) = color.standard_index() {
        return index as u16;
    }
    STANDARD_COLORS
        .iter()
        .enumerate()
        .min_by_key(|(index, (_, candidate))| (color.distance_squared(*candidate), *index))
        .map_or(ACI_BY_LAYER, |(index, _)| index as u16)
}

/// 单值颜色编码；未指定颜色时为随层。
pub fn aci_for_color(color: Option<Rgb>) -> u16 {
    color.map_or(ACI_BY_LAYER, nearest_aci)
}

pub fn line_type_from_name(name: &str) -> LineType {
    match name.trim().to_ascii_uppercase().as_str() {
        "DASHED" => LineType::Dash,
        "DASHDOT" => LineType::DashDot,
        "DASHDOT2" | "DIVIDE" => LineType::DashDotDot,
        _ => LineType::Solid,
    }
}

pub fn line_type_name(line_type: LineType) -> &'static str {
    match line_type {
        LineType::Solid => "CONTINUOUS",
        LineType::Dash => "DASHED",
        LineType::DashDot => "DASHDOT",
        LineType::DashDotDot => "DASHDOT2",
    }
}

/// 线宽（毫米）映射到最接近的标准线宽，距离相同取较小值。
pub fn lineweight_for_thickness(thickness_mm: f64) -> i16 {
    let target = (thickness_mm * 100.0).round();
    STANDARD_LINEWEIGHTS
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (f64::from(*a) - target).abs();
            let db = (f64::from(*b) - target).abs();
            da.total_cmp(&db)
        })
        .unwrap_or(0)
}

/// 正的线宽组码换算为毫米。
pub fn thickness_from_lineweight(lineweight: i16) -> Option<f64> {
    (lineweight > 0).then(|| f64::from(lineweight) / 100.0)
}

/// 单个实体导出时写入的属性组。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityAttributes {
    pub color: u16,
    pub linetype: &'static str,
    pub lineweight: i16,
}

impl EntityAttributes {
    pub fn from_style(style: &StyleAttributes) -> Self {
        Self {
            color: nearest_aci(style.color),
            linetype: line_type_name(style.line_type),
            lineweight: lineweight_for_thickness(style.line_thickness),
        }
    }
}

/// 按组码还原样式；缺失的属性沿用 `defaults`。
pub(crate) fn decode_style(raw: &RawAttributes, defaults: &StyleAttributes) -> StyleAttributes {
    let mut style = *defaults;

    let thickness = raw
        .lineweight
        .and_then(thickness_from_lineweight)
        .or_else(|| raw.thickness.filter(|value| *value > 0.0));
    if let Some(thickness) = thickness {
        style.line_thickness = thickness;
    }

    if let Some(color) = raw.color.and_then(color_from_aci) {
        style.color = color;
    }

    style.line_type = raw
        .linetype
        .as_deref()
        .map_or(LineType::Solid, line_type_from_name);
    style.is_closed = false;
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aci_palette_round_trips() {
        for (index, (_, color)) in STANDARD_COLORS.iter().enumerate() {
            assert_eq!(color_from_aci(index as i16), Some(*color));
            assert_eq!(nearest_aci(*color), index as u16);
        }
        assert_eq!(color_from_aci(256), None);
        assert_eq!(color_from_aci(-1), None);
        assert_eq!(color_from_aci(10), None);
    }

    #[test]
    fn nearest_color_uses_euclidean_distance() {
        assert_eq!(nearest_aci(Rgb::new(250, 10, 10)), 1);
        assert_eq!(nearest_aci(Rgb::new(130, 128, 125)), 8);
        // (64,64,64) 与黑色、灰色等距，取较小色号
        assert_eq!(nearest_aci(Rgb::new(64, 64, 64)), 0);
        assert_eq!(aci_for_color(None), ACI_BY_LAYER);
        assert_eq!(aci_for_color(Some(Rgb::BLUE)), 5);
    }

    #[test]
    fn lineweight_snaps_to_standard_table() {
        assert_eq!(lineweight_for_thickness(0.5), 50);
        assert_eq!(lineweight_for_thickness(1.0), 100);
        assert_eq!(lineweight_for_thickness(0.52), 53);
        assert_eq!(lineweight_for_thickness(0.07), 5);
        assert_eq!(lineweight_for_thickness(5.0), 211);
        // 距离 18 与 20 相同时取较小值
        assert_eq!(lineweight_for_thickness(0.19), 18);
        assert_eq!(thickness_from_lineweight(50), Some(0.5));
        assert_eq!(thickness_from_lineweight(-3), None);
    }

    #[test]
    fn line_type_names_are_case_insensitive() {
        assert_eq!(line_type_from_name("dashed"), LineType::Dash);
        assert_eq!(line_type_from_name("DashDot"), LineType::DashDot);
        assert_eq!(line_type_from_name("DIVIDE"), LineType::DashDotDot);
        assert_eq!(line_type_from_name("BYLAYER"), LineType::Solid);
        for line_type in LineType::ALL {
            assert_eq!(line_type_from_name(line_type_name(line_type)), line_type);
        }
    }

    #[test]
    fn decode_style_prefers_lineweight_over_thickness() {
        let defaults = StyleAttributes::default().with_color(Rgb::GREEN);
        let raw = RawAttributes {
            lineweight: Some(35),
            thickness: Some(2.0),
            color: Some(256),
            linetype: Some("DASHED".into()),
            ..RawAttributes::default()
        };
        let style = decode_style(&raw, &defaults);
        assert_eq!(style.line_thickness, 0.35);
        assert_eq!(style.color, Rgb::GREEN);
        assert_eq!(style.line_type, LineType::Dash);

        let thick_only = RawAttributes {
            lineweight: Some(-1),
            thickness: Some(2.0),
            ..RawAttributes::default()
        };
        assert_eq!(decode_style(&thick_only, &defaults).line_thickness, 2.0);
        assert_eq!(decode_style(&RawAttributes::default(), &defaults).line_thickness, 1.0);
    }

    #[test]
    fn entity_attributes_follow_style() {
        let mut style = StyleAttributes::default()
            .with_color(Rgb::RED)
            .with_line_type(LineType::DashDotDot);
        style.set_line_thickness(0.25).expect("positive");
        let attributes = EntityAttributes::from_style(&style);
        assert_eq!(
            attributes,
            EntityAttributes {
                color: 1,
                linetype: "DASHDOT2",
                lineweight: 25,
            }
        );
    }
}
