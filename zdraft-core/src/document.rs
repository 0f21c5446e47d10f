use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use crate::construct::{
    self, ArcGeometry, ArcSweep, BEZIER_SEGMENTS, CATMULL_ROM_SAMPLES, CircleGeometry,
};
use crate::geometry::{Bounds2D, Point2};
use crate::style::StyleAttributes;

/// 轴对齐矩形：左下角 + 非负宽高。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point2,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(origin: Point2, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
        .normalized()
    }

    pub fn from_corners(a: Point2, b: Point2) -> Self {
        let min = a.as_vec2().min(b.as_vec2());
        let max = a.as_vec2().max(b.as_vec2());
        Self {
            origin: Point2::from_vec(min),
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    /// 负宽高翻转到另一侧，保证宽高非负。
    pub fn normalized(self) -> Self {
        let far = Point2::new(self.origin.x() + self.width, self.origin.y() + self.height);
        Self::from_corners(self.origin, far)
    }

    #[inline]
    pub fn min(&self) -> Point2 {
        self.origin
    }

    #[inline]
    pub fn max(&self) -> Point2 {
        Point2::new(self.origin.x() + self.width, self.origin.y() + self.height)
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        self.min().midpoint(self.max())
    }

    /// 四个角点，从 `origin` 起依次沿 x 轴、对角、y 轴。
    pub fn corners(&self) -> [Point2; 4] {
        let min = self.min();
        let max = self.max();
        [
            min,
            Point2::new(max.x(), min.y()),
            max,
            Point2::new(min.x(), max.y()),
        ]
    }

    #[inline]
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Line,
    Circle,
    CircleByThreePoints,
    ArcByThreePoints,
    ArcByRadiusChord,
    Rectangle,
    Polygon,
    BezierSpline,
    SegmentSpline,
}

impl ShapeKind {
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Line => "线段",
            ShapeKind::Circle => "圆",
            ShapeKind::CircleByThreePoints => "三点圆",
            ShapeKind::ArcByThreePoints => "三点圆弧",
            ShapeKind::ArcByRadiusChord => "半径弦长圆弧",
            ShapeKind::Rectangle => "矩形",
            ShapeKind::Polygon => "多边形",
            ShapeKind::BezierSpline => "贝塞尔样条",
            ShapeKind::SegmentSpline => "分段样条",
        }
    }

    /// 圆、矩形与多边形在构造时视为闭合轮廓。
    pub fn is_closed_outline(self) -> bool {
        matches!(
            self,
            ShapeKind::Circle
                | ShapeKind::CircleByThreePoints
                | ShapeKind::Rectangle
                | ShapeKind::Polygon
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
    pub style: StyleAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
    pub style: StyleAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleByThreePoints {
    pub points: [Point2; 3],
    pub style: StyleAttributes,
}

impl CircleByThreePoints {
    /// 外接圆；三点共线时为 `None`。
    pub fn geometry(&self) -> Option<CircleGeometry> {
        let [p0, p1, p2] = self.points;
        construct::circumcircle(p0, p1, p2)
    }
}

/// 过三点的圆弧：起点、途经点、终点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcByThreePoints {
    pub points: [Point2; 3],
    pub style: StyleAttributes,
}

impl ArcByThreePoints {
    pub fn geometry(&self) -> Option<ArcGeometry> {
        let [p0, p1, p2] = self.points;
        construct::arc_by_three_points(p0, p1, p2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcByRadiusChord {
    pub center: Point2,
    pub radius_point: Point2,
    pub chord_point: Point2,
    pub style: StyleAttributes,
}

impl ArcByRadiusChord {
    pub fn sweep(&self) -> ArcSweep {
        construct::arc_by_radius_chord(self.center, self.radius_point, self.chord_point)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub rect: Rect,
    pub style: StyleAttributes,
}

/// 有序顶点列；闭合边不隐式补齐。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point2>,
    pub style: StyleAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierSpline {
    pub control_points: Vec<Point2>,
    pub style: StyleAttributes,
}

impl BezierSpline {
    pub fn samples(&self) -> Vec<Point2> {
        construct::bezier_samples(&self.control_points, BEZIER_SEGMENTS)
    }
}

/// 经过全部控制点的 Catmull-Rom 样条。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpline {
    pub points: Vec<Point2>,
    pub style: StyleAttributes,
}

impl SegmentSpline {
    pub fn samples(&self) -> Vec<Point2> {
        construct::catmull_rom_chain(&self.points, CATMULL_ROM_SAMPLES)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Line(Line),
    Circle(Circle),
    CircleByThreePoints(CircleByThreePoints),
    ArcByThreePoints(ArcByThreePoints),
    ArcByRadiusChord(ArcByRadiusChord),
    Rectangle(Rectangle),
    Polygon(Polygon),
    BezierSpline(BezierSpline),
    SegmentSpline(SegmentSpline),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Line(_) => ShapeKind::Line,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::CircleByThreePoints(_) => ShapeKind::CircleByThreePoints,
            Shape::ArcByThreePoints(_) => ShapeKind::ArcByThreePoints,
            Shape::ArcByRadiusChord(_) => ShapeKind::ArcByRadiusChord,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::BezierSpline(_) => ShapeKind::BezierSpline,
            Shape::SegmentSpline(_) => ShapeKind::SegmentSpline,
        }
    }

    #[inline]
    pub fn style(&self) -> &StyleAttributes {
        match self {
            Shape::Line(shape) => &shape.style,
            Shape::Circle(shape) => &shape.style,
            Shape::CircleByThreePoints(shape) => &shape.style,
            Shape::ArcByThreePoints(shape) => &shape.style,
            Shape::ArcByRadiusChord(shape) => &shape.style,
            Shape::Rectangle(shape) => &shape.style,
            Shape::Polygon(shape) => &shape.style,
            Shape::BezierSpline(shape) => &shape.style,
            Shape::SegmentSpline(shape) => &shape.style,
        }
    }

    #[inline]
    pub fn style_mut(&mut self) -> &mut StyleAttributes {
        match self {
            Shape::Line(shape) => &mut shape.style,
            Shape::Circle(shape) => &mut shape.style,
            Shape::CircleByThreePoints(shape) => &mut shape.style,
            Shape::ArcByThreePoints(shape) => &mut shape.style,
            Shape::ArcByRadiusChord(shape) => &mut shape.style,
            Shape::Rectangle(shape) => &mut shape.style,
            Shape::Polygon(shape) => &mut shape.style,
            Shape::BezierSpline(shape) => &mut shape.style,
            Shape::SegmentSpline(shape) => &mut shape.style,
        }
    }

    /// 计算图形的 2D 轴对齐范围；退化图形回落到定义点。
    pub fn bounds(&self) -> Option<Bounds2D> {
        let mut bounds = Bounds2D::empty();
        match self {
            Shape::Line(line) => {
                bounds.include_point(line.start);
                bounds.include_point(line.end);
            }
            Shape::Circle(circle) => bounds.include_circle(circle.center, circle.radius),
            Shape::CircleByThreePoints(circle) => match circle.geometry() {
                Some(geometry) => bounds.include_circle(geometry.center, geometry.radius),
                None => circle.points.iter().for_each(|p| bounds.include_point(*p)),
            },
            Shape::ArcByThreePoints(arc) => match arc.geometry() {
                Some(geometry) => arc_bounds(
                    geometry.center,
                    geometry.radius,
                    geometry.start_angle_deg,
                    geometry.span_angle_deg,
                    &mut bounds,
                ),
                None => arc.points.iter().for_each(|p| bounds.include_point(*p)),
            },
            Shape::ArcByRadiusChord(arc) => {
                let sweep = arc.sweep();
                arc_bounds(
                    arc.center,
                    sweep.radius,
                    sweep.start_angle_deg,
                    sweep.span_angle_deg,
                    &mut bounds,
                );
            }
            Shape::Rectangle(rectangle) => {
                bounds.include_point(rectangle.rect.min());
                bounds.include_point(rectangle.rect.max());
            }
            Shape::Polygon(polygon) => {
                polygon.points.iter().for_each(|p| bounds.include_point(*p));
            }
            // 控制多边形包含整条贝塞尔曲线
            Shape::BezierSpline(spline) => {
                spline.control_points.iter().for_each(|p| bounds.include_point(*p));
            }
            Shape::SegmentSpline(spline) => {
                spline.points.iter().for_each(|p| bounds.include_point(*p));
                spline.samples().iter().for_each(|p| bounds.include_point(*p));
            }
        }
        if bounds.is_empty() { None } else { Some(bounds) }
    }
}

fn arc_bounds(center: Point2, radius: f64, start_deg: f64, span_deg: f64, bounds: &mut Bounds2D) {
    let radius = radius.abs();
    if radius <= f64::EPSILON {
        bounds.include_point(center);
        return;
    }
    let start = start_deg.to_radians();
    let end = start + span_deg.to_radians();
    bounds.include_point(Point2::polar(center, radius, start));
    bounds.include_point(Point2::polar(center, radius, end));

    const QUADRANTS: [f64; 4] = [0.0, FRAC_PI_2, PI, FRAC_PI_2 * 3.0];
    for base in QUADRANTS {
        let mut candidate = base;
        while candidate < start {
            candidate += TAU;
        }
        if candidate <= end {
            bounds.include_point(Point2::polar(center, radius, candidate));
        }
    }
}

/// 有序图形集合，插入顺序即绘制与导出顺序。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    shapes: Vec<Shape>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// 追加图形并返回其下标。
    pub fn push(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<Shape> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }

    pub fn bounds(&self) -> Option<Bounds2D> {
        let mut bounds = Bounds2D::empty();
        for shape in &self.shapes {
            if let Some(shape_bounds) = shape.bounds() {
                bounds.include_bounds(&shape_bounds);
            }
        }
        if bounds.is_empty() { None } else { Some(bounds) }
    }
}

impl Extend<Shape> for Document {
    fn extend<T: IntoIterator<Item = Shape>>(&mut self, iter: T) {
        self.shapes.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{LineType, Rgb};

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        Shape::Line(Line {
            start: Point2::new(x0, y0),
            end: Point2::new(x1, y1),
            style: StyleAttributes::default(),
        })
    }

    #[test]
    fn shapes_survive_json_serialization() {
        let mut style = StyleAttributes::default()
            .with_line_type(LineType::DashDotDot)
            .with_color(Rgb::RED)
            .with_dash_auto_mode(true)
            .closed(true);
        style.set_line_thickness(0.35).expect("线宽为正");

        let mut document = Document::new();
        document.push(line(0.0, 0.0, 3.0, 4.0));
        document.push(Shape::Polygon(Polygon {
            points: vec![
                Point2::new(0.0, 0.0),
                Point2::new(4.0, 0.0),
                Point2::new(2.0, 3.0),
            ],
            style,
        }));

        let json = serde_json::to_string(&document).expect("serialize");
        let restored: Document = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, document);
        assert_eq!(restored.shapes()[1].style(), &style);

        let style_json = serde_json::to_value(style).expect("style");
        assert_eq!(style_json["line_type"], "dash_dot_dot");
        assert_eq!(style_json["is_closed"], true);
    }

    #[test]
    fn rect_normalizes_negative_extent() {
        let rect = Rect::new(Point2::new(10.0, 10.0), -4.0, -6.0);
        assert_eq!(rect.origin, Point2::new(6.0, 4.0));
        assert_eq!(rect.width, 4.0);
        assert_eq!(rect.height, 6.0);
        assert_eq!(rect.center(), Point2::new(8.0, 7.0));
        assert_eq!(rect.corners()[2], Point2::new(10.0, 10.0));
    }

    #[test]
    fn document_keeps_insertion_order() {
        let mut document = Document::new();
        assert_eq!(document.push(line(0.0, 0.0, 1.0, 0.0)), 0);
        assert_eq!(document.push(line(0.0, 0.0, 2.0, 0.0)), 1);
        assert_eq!(document.len(), 2);

        let removed = document.remove(0).expect("first shape");
        assert_eq!(removed, line(0.0, 0.0, 1.0, 0.0));
        assert_eq!(document.get(0), Some(&line(0.0, 0.0, 2.0, 0.0)));
        assert!(document.remove(5).is_none());
    }

    #[test]
    fn arc_bounds_include_crossed_quadrants() {
        let arc = Shape::ArcByRadiusChord(ArcByRadiusChord {
            center: Point2::ORIGIN,
            radius_point: Point2::new(1.0, 0.0),
            chord_point: Point2::new(-1.0, 0.0),
            style: StyleAttributes::default(),
        });
        let bounds = arc.bounds().expect("arc bounds");
        assert!((bounds.max().y() - 1.0).abs() < 1e-12);
        assert!(bounds.min().y().abs() < 1e-12);
        assert!((bounds.min().x() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn document_bounds_cover_all_shapes() {
        let mut document = Document::new();
        document.push(line(0.0, 0.0, 4.0, 0.0));
        document.push(Shape::Circle(Circle {
            center: Point2::new(10.0, 0.0),
            radius: 2.0,
            style: StyleAttributes::default(),
        }));
        let bounds = document.bounds().expect("non-empty document");
        assert_eq!(bounds.min(), Point2::new(0.0, -2.0));
        assert_eq!(bounds.max(), Point2::new(12.0, 2.0));
    }

    #[test]
    fn closed_outline_kinds() {
        assert!(ShapeKind::Rectangle.is_closed_outline());
        assert!(ShapeKind::CircleByThreePoints.is_closed_outline());
        assert!(!ShapeKind::Line.is_closed_outline());
        assert!(!ShapeKind::SegmentSpline.is_closed_outline());
    }
}
