//! 绘图模式表与分组。

/// 交互式构造图形的方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawingMode {
    #[default]
    Line,
    CircleCenterRadius,
    CircleThreePoints,
    ArcThreePoints,
    ArcRadiusChord,
    Polygon,
    PolygonInscribed,
    PolygonCircumscribed,
    RectangleSides,
    RectangleCenter,
    SplineBezier,
    SplineSegments,
}

/// 模式在工具栏中的分组。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeGroup {
    Line,
    Spline,
    Rectangle,
    Polygon,
    Circle,
    Arc,
}

impl ModeGroup {
    pub const DISPLAY_ORDER: [ModeGroup; 6] = [
        ModeGroup::Line,
        ModeGroup::Spline,
        ModeGroup::Rectangle,
        ModeGroup::Polygon,
        ModeGroup::Circle,
        ModeGroup::Arc,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ModeGroup::Line => "直线",
            ModeGroup::Spline => "样条",
            ModeGroup::Rectangle => "矩形",
            ModeGroup::Polygon => "多边形",
            ModeGroup::Circle => "圆",
            ModeGroup::Arc => "圆弧",
        }
    }

    /// 组内模式，按声明顺序。
    pub fn modes(self) -> impl Iterator<Item = DrawingMode> {
        DrawingMode::ALL
            .into_iter()
            .filter(move |mode| mode.group() == self)
    }
}

impl DrawingMode {
    pub const ALL: [DrawingMode; 12] = [
        DrawingMode::Line,
        DrawingMode::CircleCenterRadius,
        DrawingMode::CircleThreePoints,
        DrawingMode::ArcThreePoints,
        DrawingMode::ArcRadiusChord,
        DrawingMode::Polygon,
        DrawingMode::PolygonInscribed,
        DrawingMode::PolygonCircumscribed,
        DrawingMode::RectangleSides,
        DrawingMode::RectangleCenter,
        DrawingMode::SplineBezier,
        DrawingMode::SplineSegments,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DrawingMode::Line => "line",
            DrawingMode::CircleCenterRadius => "circle_center_radius",
            DrawingMode::CircleThreePoints => "circle_three_points",
            DrawingMode::ArcThreePoints => "arc_three_points",
            DrawingMode::ArcRadiusChord => "arc_radius_chord",
            DrawingMode::Polygon => "polygon",
            DrawingMode::PolygonInscribed => "polygon_inscribed",
            DrawingMode::PolygonCircumscribed => "polygon_circumscribed",
            DrawingMode::RectangleSides => "rectangle_sides",
            DrawingMode::RectangleCenter => "rectangle_center",
            DrawingMode::SplineBezier => "spline_bezier",
            DrawingMode::SplineSegments => "spline_segments",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DrawingMode::Line => "直线",
            DrawingMode::CircleCenterRadius => "圆心半径画圆",
            DrawingMode::CircleThreePoints => "三点画圆",
            DrawingMode::ArcThreePoints => "三点画弧",
            DrawingMode::ArcRadiusChord => "半径弦长画弧",
            DrawingMode::Polygon => "逐点多边形",
            DrawingMode::PolygonInscribed => "内接正多边形",
            DrawingMode::PolygonCircumscribed => "外切正多边形",
            DrawingMode::RectangleSides => "对角点矩形",
            DrawingMode::RectangleCenter => "中心点矩形",
            DrawingMode::SplineBezier => "贝塞尔样条",
            DrawingMode::SplineSegments => "分段样条",
        }
    }

    pub fn group(self) -> ModeGroup {
        match self {
            DrawingMode::Line => ModeGroup::Line,
            DrawingMode::CircleCenterRadius | DrawingMode::CircleThreePoints => ModeGroup::Circle,
            DrawingMode::ArcThreePoints | DrawingMode::ArcRadiusChord => ModeGroup::Arc,
            DrawingMode::Polygon
            | DrawingMode::PolygonInscribed
            | DrawingMode::PolygonCircumscribed => ModeGroup::Polygon,
            DrawingMode::RectangleSides | DrawingMode::RectangleCenter => ModeGroup::Rectangle,
            DrawingMode::SplineBezier | DrawingMode::SplineSegments => ModeGroup::Spline,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.key().eq_ignore_ascii_case(key))
    }

    /// 构造所需的最少点数。
    pub fn min_points(self) -> usize {
        match self {
            DrawingMode::CircleThreePoints
            | DrawingMode::ArcThreePoints
            | DrawingMode::ArcRadiusChord
            | DrawingMode::Polygon => 3,
            _ => 2,
        }
    }

    /// 点数固定的模式返回 `Some`，逐点输入的模式返回 `None`。
    pub fn fixed_points(self) -> Option<usize> {
        match self {
            DrawingMode::Polygon | DrawingMode::SplineBezier | DrawingMode::SplineSegments => None,
            other => Some(other.min_points()),
        }
    }
}
