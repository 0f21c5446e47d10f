use std::f64::consts::TAU;

use crate::construct::{BEZIER_SEGMENTS, bezier_samples};
use crate::document::Shape;
use crate::geometry::Point2;

/// 图形的可见长度（周长/弧长/折线长）。退化图形返回 0，结果始终有限且非负。
pub fn length_of(shape: &Shape) -> f64 {
    let length = match shape {
        Shape::Line(line) => line.start.distance_to(line.end),
        Shape::Circle(circle) => TAU * circle.radius.abs(),
        Shape::CircleByThreePoints(circle) => circle
            .geometry()
            .map_or(0.0, |geometry| TAU * geometry.radius),
        Shape::ArcByThreePoints(arc) => arc
            .geometry()
            .map_or(0.0, |geometry| arc_length(geometry.radius, geometry.span_angle_deg)),
        Shape::ArcByRadiusChord(arc) => {
            let sweep = arc.sweep();
            arc_length(sweep.radius, sweep.span_angle_deg)
        }
        Shape::Rectangle(rectangle) => rectangle.rect.perimeter(),
        Shape::Polygon(polygon) => polyline_length(&polygon.points),
        Shape::BezierSpline(spline) if spline.control_points.len() >= 2 => {
            polyline_length(&bezier_samples(&spline.control_points, BEZIER_SEGMENTS))
        }
        Shape::SegmentSpline(spline) if spline.points.len() >= 2 => {
            polyline_length(&spline.samples())
        }
        Shape::BezierSpline(_) | Shape::SegmentSpline(_) => 0.0,
    };

    if length.is_finite() && length > 0.0 { length } else { 0.0 }
}

#[inline]
pub fn arc_length(radius: f64, span_deg: f64) -> f64 {
    radius.abs() * span_deg.to_radians().abs()
}

/// 相邻点距离之和，不补闭合边。
pub fn polyline_length(points: &[Point2]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_to(pair[1]))
        .sum()
}
