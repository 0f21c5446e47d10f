pub mod construct;
pub mod dash;
pub mod document;
pub mod metrics;
pub mod transform;

pub mod geometry {
    use glam::DVec2;
    use serde::{Deserialize, Serialize};

    /// 二维点，内部以 `glam::DVec2` 表示，坐标为双精度。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        pub const ORIGIN: Point2 = Point2(DVec2::ZERO);

        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        /// 由圆心、半径与极角（弧度）求圆周上的点。
        #[inline]
        pub fn polar(center: Point2, radius: f64, angle_rad: f64) -> Self {
            Self(center.0 + DVec2::new(angle_rad.cos(), angle_rad.sin()) * radius)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn translate(self, offset: Vector2) -> Self {
            Self(self.0 + offset.0)
        }

        #[inline]
        pub fn vector_to(self, other: Point2) -> Vector2 {
            Vector2(other.0 - self.0)
        }

        #[inline]
        pub fn distance_to(self, other: Point2) -> f64 {
            self.0.distance(other.0)
        }

        /// 以本点为原点，`other` 所在方向的极角（弧度，范围 (-π, π]）。
        #[inline]
        pub fn angle_to(self, other: Point2) -> f64 {
            let delta = other.0 - self.0;
            delta.y.atan2(delta.x)
        }

        #[inline]
        pub fn midpoint(self, other: Point2) -> Self {
            Self((self.0 + other.0) * 0.5)
        }

        /// 绕 `pivot` 逆时针旋转 `angle_rad` 弧度。
        pub fn rotate_around(self, pivot: Point2, angle_rad: f64) -> Self {
            let (sin, cos) = angle_rad.sin_cos();
            let offset = self.0 - pivot.0;
            let rotated = DVec2::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos);
            Self(pivot.0 + rotated)
        }

        #[inline]
        pub fn approx_eq(self, other: Point2, epsilon: f64) -> bool {
            self.0.abs_diff_eq(other.0, epsilon)
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 二维向量。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_points(start: Point2, end: Point2) -> Self {
            Self(end.0 - start.0)
        }

        #[inline]
        pub fn length(self) -> f64 {
            self.0.length()
        }

        #[inline]
        pub fn dot(self, other: Vector2) -> f64 {
            self.0.dot(other.0)
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }
    }

    impl From<DVec2> for Vector2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 将角度（度）归一化到 [0, 360)。
    pub fn normalize_degrees(angle: f64) -> f64 {
        let normalized = angle.rem_euclid(360.0);
        // rem_euclid 对极小的负数可能返回 360.0
        if normalized >= 360.0 { 0.0 } else { normalized }
    }

    /// 轴对齐边界框，用于估算文档/图形范围。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        #[inline]
        pub fn new(min: Point2, max: Point2) -> Self {
            Self { min, max }
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        #[inline]
        pub fn width(&self) -> f64 {
            if self.is_empty() { 0.0 } else { self.max.x() - self.min.x() }
        }

        #[inline]
        pub fn height(&self) -> f64 {
            if self.is_empty() { 0.0 } else { self.max.y() - self.min.y() }
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            self.min = Point2::from_vec(self.min.as_vec2().min(point.as_vec2()));
            self.max = Point2::from_vec(self.max.as_vec2().max(point.as_vec2()));
        }

        /// 把以 `center` 为圆心、`radius` 为半径的整圆纳入范围。
        pub fn include_circle(&mut self, center: Point2, radius: f64) {
            let radius = radius.abs();
            self.include_point(Point2::new(center.x() - radius, center.y() - radius));
            self.include_point(Point2::new(center.x() + radius, center.y() + radius));
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            debug_assert!(!self.is_empty());
            self.min.midpoint(self.max)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::f64::consts::FRAC_PI_2;

        #[test]
        fn rotate_quarter_turn_around_pivot() {
            let rotated = Point2::new(2.0, 1.0).rotate_around(Point2::new(1.0, 1.0), FRAC_PI_2);
            assert!(rotated.approx_eq(Point2::new(1.0, 2.0), 1e-12));
        }

        #[test]
        fn normalize_degrees_wraps_negative_and_full_turns() {
            assert_eq!(normalize_degrees(-90.0), 270.0);
            assert_eq!(normalize_degrees(360.0), 0.0);
            assert_eq!(normalize_degrees(725.0), 5.0);
            assert!(normalize_degrees(-1e-20) < 360.0);
        }

        #[test]
        fn bounds_track_points_and_circles() {
            let mut bounds = Bounds2D::empty();
            assert!(bounds.is_empty());
            assert_eq!(bounds.width(), 0.0);
            bounds.include_point(Point2::new(1.0, 1.0));
            bounds.include_circle(Point2::new(5.0, 5.0), 2.0);
            assert_eq!(bounds.min(), Point2::new(1.0, 1.0));
            assert_eq!(bounds.max(), Point2::new(7.0, 7.0));
            assert_eq!(bounds.center(), Point2::new(4.0, 4.0));
            assert_eq!(bounds.width(), 6.0);
        }
    }
}

pub mod style {
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    /// 线型。非实线线型在导出时映射到 DXF 的 DASHED/DASHDOT/DASHDOT2。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LineType {
        #[default]
        Solid,
        Dash,
        DashDot,
        DashDotDot,
    }

    impl LineType {
        pub const ALL: [LineType; 4] = [
            LineType::Solid,
            LineType::Dash,
            LineType::DashDot,
            LineType::DashDotDot,
        ];

        pub fn key(self) -> &'static str {
            match self {
                LineType::Solid => "solid",
                LineType::Dash => "dash",
                LineType::DashDot => "dash_dot",
                LineType::DashDotDot => "dash_dot_dot",
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                LineType::Solid => "实线",
                LineType::Dash => "虚线",
                LineType::DashDot => "点划线",
                LineType::DashDotDot => "双点划线",
            }
        }

        pub fn from_key(key: &str) -> Option<Self> {
            Self::ALL
                .into_iter()
                .find(|line_type| line_type.key().eq_ignore_ascii_case(key.trim()))
        }
    }

    /// 手动虚线模式下使用的五个长度参数。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct DashParams {
        pub dash_length: f64,
        pub dash_gap: f64,
        pub dash_space: f64,
        pub dot_length: f64,
        pub dot_space: f64,
    }

    impl Default for DashParams {
        fn default() -> Self {
            Self {
                dash_length: 5.0,
                dash_gap: 5.0,
                dash_space: 3.0,
                dot_length: 1.0,
                dot_space: 2.0,
            }
        }
    }

    impl DashParams {
        pub fn is_valid(&self) -> bool {
            [
                self.dash_length,
                self.dash_gap,
                self.dash_space,
                self.dot_length,
                self.dot_space,
            ]
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Rgb {
        pub r: u8,
        pub g: u8,
        pub b: u8,
    }

    impl Rgb {
        pub const BLACK: Rgb = Rgb::new(0, 0, 0);
        pub const RED: Rgb = Rgb::new(255, 0, 0);
        pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
        pub const GREEN: Rgb = Rgb::new(0, 255, 0);
        pub const CYAN: Rgb = Rgb::new(0, 255, 255);
        pub const BLUE: Rgb = Rgb::new(0, 0, 255);
        pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);
        pub const WHITE: Rgb = Rgb::new(255, 255, 255);
        pub const GRAY: Rgb = Rgb::new(128, 128, 128);
        pub const LIGHT_GRAY: Rgb = Rgb::new(192, 192, 192);

        pub const fn new(r: u8, g: u8, b: u8) -> Self {
            Self { r, g, b }
        }

        /// RGB 空间中的欧氏距离平方。
        pub fn distance_squared(self, other: Rgb) -> u32 {
            let dr = i32::from(self.r) - i32::from(other.r);
            let dg = i32::from(self.g) - i32::from(other.g);
            let db = i32::from(self.b) - i32::from(other.b);
            (dr * dr + dg * dg + db * db) as u32
        }

        /// 在标准色表中的下标；下标即 DXF 的 ACI 色号。
        pub fn standard_index(self) -> Option<usize> {
            STANDARD_COLORS.iter().position(|(_, color)| *color == self)
        }
    }

    /// 命名标准色表，顺序与 ACI 0..=9 一致。
    pub static STANDARD_COLORS: [(&str, Rgb); 10] = [
        ("黑色", Rgb::BLACK),
        ("红色", Rgb::RED),
        ("黄色", Rgb::YELLOW),
        ("绿色", Rgb::GREEN),
        ("青色", Rgb::CYAN),
        ("蓝色", Rgb::BLUE),
        ("品红", Rgb::MAGENTA),
        ("白色", Rgb::WHITE),
        ("灰色", Rgb::GRAY),
        ("浅灰", Rgb::LIGHT_GRAY),
    ];

    #[derive(Debug, Error, Clone, PartialEq)]
    pub enum StyleError {
        #[error("line thickness must be positive, got {0}")]
        NonPositiveThickness(f64),
        #[error("dash parameters must be finite and non-negative")]
        InvalidDashParams,
    }

    /// 每个图形携带的绘制样式。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct StyleAttributes {
        pub line_type: LineType,
        /// 线宽，单位毫米，始终为正。
        pub line_thickness: f64,
        pub dash_params: DashParams,
        pub dash_auto_mode: bool,
        pub color: Rgb,
        /// 闭合轮廓在自动虚线模式下使用周期性图案。
        pub is_closed: bool,
    }

    impl Default for StyleAttributes {
        fn default() -> Self {
            Self {
                line_type: LineType::Solid,
                line_thickness: 1.0,
                dash_params: DashParams::default(),
                dash_auto_mode: false,
                color: Rgb::BLACK,
                is_closed: false,
            }
        }
    }

    impl StyleAttributes {
        pub fn with_line_type(mut self, line_type: LineType) -> Self {
            self.line_type = line_type;
            self
        }

        pub fn with_color(mut self, color: Rgb) -> Self {
            self.color = color;
            self
        }

        pub fn with_dash_auto_mode(mut self, enabled: bool) -> Self {
            self.dash_auto_mode = enabled;
            self
        }

        pub fn closed(mut self, is_closed: bool) -> Self {
            self.is_closed = is_closed;
            self
        }

        pub fn set_line_thickness(&mut self, thickness: f64) -> Result<(), StyleError> {
            if !(thickness.is_finite() && thickness > 0.0) {
                return Err(StyleError::NonPositiveThickness(thickness));
            }
            self.line_thickness = thickness;
            Ok(())
        }

        pub fn set_dash_params(&mut self, params: DashParams) -> Result<(), StyleError> {
            if !params.is_valid() {
                return Err(StyleError::InvalidDashParams);
            }
            self.dash_params = params;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn defaults_match_drawing_defaults() {
            let style = StyleAttributes::default();
            assert_eq!(style.line_type, LineType::Solid);
            assert_eq!(style.line_thickness, 1.0);
            assert_eq!(style.color, Rgb::BLACK);
            assert!(!style.dash_auto_mode);
            assert!(!style.is_closed);
            assert_eq!(style.dash_params.dash_length, 5.0);
            assert_eq!(style.dash_params.dot_space, 2.0);
        }

        #[test]
        fn thickness_must_be_positive() {
            let mut style = StyleAttributes::default();
            assert_eq!(
                style.set_line_thickness(0.0),
                Err(StyleError::NonPositiveThickness(0.0))
            );
            assert!(style.set_line_thickness(f64::NAN).is_err());
            assert_eq!(style.line_thickness, 1.0);
            style.set_line_thickness(0.35).expect("positive thickness");
            assert_eq!(style.line_thickness, 0.35);
        }

        #[test]
        fn negative_dash_params_are_rejected() {
            let mut style = StyleAttributes::default();
            let params = DashParams {
                dash_gap: -1.0,
                ..DashParams::default()
            };
            assert_eq!(style.set_dash_params(params), Err(StyleError::InvalidDashParams));
        }

        #[test]
        fn standard_color_index_matches_table_order() {
            assert_eq!(Rgb::BLACK.standard_index(), Some(0));
            assert_eq!(Rgb::RED.standard_index(), Some(1));
            assert_eq!(Rgb::LIGHT_GRAY.standard_index(), Some(9));
            assert_eq!(Rgb::new(1, 2, 3).standard_index(), None);
        }

        #[test]
        fn line_type_keys_round_trip() {
            for line_type in LineType::ALL {
                assert_eq!(LineType::from_key(line_type.key()), Some(line_type));
            }
            assert_eq!(LineType::from_key(" DASH_DOT "), Some(LineType::DashDot));
            assert_eq!(LineType::from_key("zigzag"), None);
        }
    }
}
