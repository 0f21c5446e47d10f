//! 按绘图模式把输入点组装成图形。

use zdraft_core::construct::{self, PolygonMode};
use zdraft_core::document::{
    ArcByRadiusChord, ArcByThreePoints, BezierSpline, Circle, CircleByThreePoints, Line, Polygon,
    Rectangle, SegmentSpline, Shape,
};
use zdraft_core::geometry::Point2;
use zdraft_core::style::StyleAttributes;

use crate::modes::DrawingMode;

/// 一次构造收集到的输入。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructionParams {
    pub points: Vec<Point2>,
    /// 仅正多边形模式使用。
    pub num_sides: usize,
}

impl ConstructionParams {
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        Self {
            points: points.into_iter().collect(),
            num_sides: 0,
        }
    }

    pub fn with_sides(mut self, num_sides: usize) -> Self {
        self.num_sides = num_sides;
        self
    }
}

/// 点数不符或几何退化时返回 `None`。闭合轮廓会设置 `is_closed`。
pub fn construct(
    mode: DrawingMode,
    params: &ConstructionParams,
    style: &StyleAttributes,
) -> Option<Shape> {
    let points = params.points.as_slice();
    let count_ok = match mode.fixed_points() {
        Some(expected) => points.len() == expected,
        None => points.len() >= mode.min_points(),
    };
    if !count_ok {
        return None;
    }

    let open = style.closed(false);
    let closed = style.closed(true);

    let shape = match mode {
        DrawingMode::Line => Shape::Line(Line {
            start: points[0],
            end: points[1],
            style: open,
        }),
        DrawingMode::CircleCenterRadius => {
            let radius = points[0].distance_to(points[1]);
            if !(radius > 0.0) {
                return None;
            }
            Shape::Circle(Circle {
                center: points[0],
                radius,
                style: closed,
            })
        }
        DrawingMode::CircleThreePoints => {
            construct::circumcircle(points[0], points[1], points[2])?;
            Shape::CircleByThreePoints(CircleByThreePoints {
                points: [points[0], points[1], points[2]],
                style: closed,
            })
        }
        DrawingMode::ArcThreePoints => {
            construct::arc_by_three_points(points[0], points[1], points[2])?;
            Shape::ArcByThreePoints(ArcByThreePoints {
                points: [points[0], points[1], points[2]],
                style: open,
            })
        }
        DrawingMode::ArcRadiusChord => {
            if !(points[0].distance_to(points[1]) > 0.0) {
                return None;
            }
            Shape::ArcByRadiusChord(ArcByRadiusChord {
                center: points[0],
                radius_point: points[1],
                chord_point: points[2],
                style: open,
            })
        }
        DrawingMode::Polygon => Shape::Polygon(Polygon {
            points: points.to_vec(),
            style: closed,
        }),
        DrawingMode::PolygonInscribed | DrawingMode::PolygonCircumscribed => {
            let polygon_mode = if mode == DrawingMode::PolygonInscribed {
                PolygonMode::Inscribed
            } else {
                PolygonMode::Circumscribed
            };
            let vertices =
                construct::regular_polygon(points[0], points[1], params.num_sides, polygon_mode);
            if vertices.is_empty() {
                return None;
            }
            Shape::Polygon(Polygon {
                points: vertices,
                style: closed,
            })
        }
        DrawingMode::RectangleSides => Shape::Rectangle(Rectangle {
            rect: construct::rect_from_corners(points[0], points[1]),
            style: closed,
        }),
        DrawingMode::RectangleCenter => Shape::Rectangle(Rectangle {
            rect: construct::rect_from_center(points[0], points[1]),
            style: closed,
        }),
        DrawingMode::SplineBezier => Shape::BezierSpline(BezierSpline {
            control_points: points.to_vec(),
            style: open,
        }),
        DrawingMode::SplineSegments => Shape::SegmentSpline(SegmentSpline {
            points: points.to_vec(),
            style: open,
        }),
    };
    Some(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::document::ShapeKind;

    fn params(points: &[(f64, f64)]) -> ConstructionParams {
        ConstructionParams::from_points(points.iter().map(|(x, y)| Point2::new(*x, *y)))
    }

    #[test]
    fn wrong_point_count_yields_none() {
        let style = StyleAttributes::default();
        assert!(construct(DrawingMode::Line, &params(&[(0.0, 0.0)]), &style).is_none());
        assert!(
            construct(
                DrawingMode::Line,
                &params(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]),
                &style
            )
            .is_none()
        );
        assert!(
            construct(DrawingMode::Polygon, &params(&[(0.0, 0.0), (1.0, 0.0)]), &style).is_none()
        );
        assert!(construct(DrawingMode::SplineBezier, &params(&[(0.0, 0.0)]), &style).is_none());
    }

    #[test]
    fn degenerate_geometry_yields_none() {
        let style = StyleAttributes::default();
        let collinear = params(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert!(construct(DrawingMode::CircleThreePoints, &collinear, &style).is_none());
        assert!(construct(DrawingMode::ArcThreePoints, &collinear, &style).is_none());

        let zero_radius = params(&[(1.0, 1.0), (1.0, 1.0)]);
        assert!(construct(DrawingMode::CircleCenterRadius, &zero_radius, &style).is_none());

        let too_few_sides = params(&[(0.0, 0.0), (1.0, 0.0)]).with_sides(2);
        assert!(construct(DrawingMode::PolygonInscribed, &too_few_sides, &style).is_none());
    }

    #[test]
    fn closed_outlines_are_flagged() {
        let style = StyleAttributes::default();
        let circle = construct(
            DrawingMode::CircleCenterRadius,
            &params(&[(0.0, 0.0), (3.0, 4.0)]),
            &style,
        )
        .expect("circle");
        let Shape::Circle(circle) = &circle else {
            panic!("expected circle");
        };
        assert_eq!(circle.radius, 5.0);
        assert!(circle.style.is_closed);

        let rect = construct(
            DrawingMode::RectangleCenter,
            &params(&[(0.0, 0.0), (2.0, -1.0)]),
            &style,
        )
        .expect("rectangle");
        let Shape::Rectangle(rect) = &rect else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.rect.origin, Point2::new(-2.0, -1.0));
        assert_eq!((rect.rect.width, rect.rect.height), (4.0, 2.0));
        assert!(rect.style.is_closed);

        let line = construct(
            DrawingMode::Line,
            &params(&[(0.0, 0.0), (1.0, 0.0)]),
            &style.closed(true),
        )
        .expect("line");
        assert!(!line.style().is_closed);
    }

    #[test]
    fn regular_polygons_use_requested_sides() {
        let style = StyleAttributes::default();
        let hexagon = construct(
            DrawingMode::PolygonCircumscribed,
            &params(&[(0.0, 0.0), (10.0, 0.0)]).with_sides(6),
            &style,
        )
        .expect("hexagon");
        let Shape::Polygon(polygon) = &hexagon else {
            panic!("expected polygon");
        };
        assert_eq!(polygon.points.len(), 6);
        let expected = 10.0 / (std::f64::consts::PI / 6.0).cos();
        assert!((polygon.points[0].x() - expected).abs() < 1e-9);
        assert!(polygon.style.is_closed);
    }

    #[test]
    fn every_mode_builds_with_valid_input() {
        let style = StyleAttributes::default();
        let three = params(&[(0.0, 0.0), (10.0, 0.0), (6.0, 8.0)]);
        let two = params(&[(0.0, 0.0), (10.0, 5.0)]);
        for mode in DrawingMode::ALL {
            let input = match mode.fixed_points() {
                Some(2) => two.clone().with_sides(5),
                _ => three.clone(),
            };
            let shape = construct(mode, &input, &style)
                .unwrap_or_else(|| panic!("{} should construct", mode.key()));
            let expected = match mode {
                DrawingMode::Line => ShapeKind::Line,
                DrawingMode::CircleCenterRadius => ShapeKind::Circle,
                DrawingMode::CircleThreePoints => ShapeKind::CircleByThreePoints,
                DrawingMode::ArcThreePoints => ShapeKind::ArcByThreePoints,
                DrawingMode::ArcRadiusChord => ShapeKind::ArcByRadiusChord,
                DrawingMode::Polygon
                | DrawingMode::PolygonInscribed
                | DrawingMode::PolygonCircumscribed => ShapeKind::Polygon,
                DrawingMode::RectangleSides | DrawingMode::RectangleCenter => ShapeKind::Rectangle,
                DrawingMode::SplineBezier => ShapeKind::BezierSpline,
                DrawingMode::SplineSegments => ShapeKind::SegmentSpline,
            };
            assert_eq!(shape.kind(), expected);
        }
    }
}
