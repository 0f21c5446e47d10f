use crate::document::{Rect, Shape};
use crate::geometry::Point2;

impl Shape {
    /// 默认旋转中心：圆心、点列质心、线段中点或矩形中心。
    pub fn rotation_pivot(&self) -> Option<Point2> {
        match self {
            Shape::Line(line) => Some(line.start.midpoint(line.end)),
            Shape::Circle(circle) => Some(circle.center),
            Shape::ArcByRadiusChord(arc) => Some(arc.center),
            Shape::Rectangle(rectangle) => Some(rectangle.rect.center()),
            Shape::CircleByThreePoints(circle) => centroid(&circle.points),
            Shape::ArcByThreePoints(arc) => centroid(&arc.points),
            Shape::Polygon(polygon) => centroid(&polygon.points),
            Shape::BezierSpline(spline) => centroid(&spline.control_points),
            Shape::SegmentSpline(spline) => centroid(&spline.points),
        }
    }

    /// 绕 `pivot` 逆时针旋转 `angle_deg` 度。矩形保持轴对齐，由旋转后的两个对角点重建。
    pub fn rotate_around(&mut self, pivot: Point2, angle_deg: f64) {
        let angle = angle_deg.to_radians();
        let rotate = |point: &mut Point2| *point = point.rotate_around(pivot, angle);
        match self {
            Shape::Line(line) => {
                rotate(&mut line.start);
                rotate(&mut line.end);
            }
            Shape::Circle(circle) => rotate(&mut circle.center),
            Shape::CircleByThreePoints(circle) => circle.points.iter_mut().for_each(rotate),
            Shape::ArcByThreePoints(arc) => arc.points.iter_mut().for_each(rotate),
            Shape::ArcByRadiusChord(arc) => {
                rotate(&mut arc.center);
                rotate(&mut arc.radius_point);
                rotate(&mut arc.chord_point);
            }
            Shape::Rectangle(rectangle) => {
                let mut min = rectangle.rect.min();
                let mut max = rectangle.rect.max();
                rotate(&mut min);
                rotate(&mut max);
                rectangle.rect = Rect::from_corners(min, max);
            }
            Shape::Polygon(polygon) => polygon.points.iter_mut().for_each(rotate),
            Shape::BezierSpline(spline) => spline.control_points.iter_mut().for_each(rotate),
            Shape::SegmentSpline(spline) => spline.points.iter_mut().for_each(rotate),
        }
    }

    /// 绕默认中心旋转；没有可用中心（空点列）时不做任何修改。
    pub fn rotate(&mut self, angle_deg: f64) -> bool {
        match self.rotation_pivot() {
            Some(pivot) => {
                self.rotate_around(pivot, angle_deg);
                true
            }
            None => false,
        }
    }
}

fn centroid(points: &[Point2]) -> Option<Point2> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(glam::DVec2::ZERO, |acc, point| acc + point.as_vec2());
    Some(Point2::from_vec(sum / points.len() as f64))
}

#[cfg(test)]
mod tests {
    use crate::document::{Circle, Line, Polygon, Rect, Rectangle, Shape};
    use crate::geometry::Point2;
    use crate::metrics::length_of;
    use crate::style::StyleAttributes;

    #[test]
    fn line_rotates_about_its_midpoint() {
        let mut line = Shape::Line(Line {
            start: Point2::new(0.0, 0.0),
            end: Point2::new(2.0, 0.0),
            style: StyleAttributes::default(),
        });
        assert!(line.rotate(90.0));
        let Shape::Line(rotated) = &line else {
            panic!("expected line");
        };
        assert!(rotated.start.approx_eq(Point2::new(1.0, -1.0), 1e-12));
        assert!(rotated.end.approx_eq(Point2::new(1.0, 1.0), 1e-12));
        assert!((length_of(&line) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn circle_rotates_about_external_pivot() {
        let mut circle = Shape::Circle(Circle {
            center: Point2::new(1.0, 0.0),
            radius: 3.0,
            style: StyleAttributes::default(),
        });
        circle.rotate_around(Point2::ORIGIN, 180.0);
        let Shape::Circle(rotated) = &circle else {
            panic!("expected circle");
        };
        assert!(rotated.center.approx_eq(Point2::new(-1.0, 0.0), 1e-12));
        assert_eq!(rotated.radius, 3.0);
    }

    #[test]
    fn rectangle_stays_axis_aligned_after_quarter_turn() {
        let mut rectangle = Shape::Rectangle(Rectangle {
            rect: Rect::new(Point2::new(0.0, 0.0), 4.0, 2.0),
            style: StyleAttributes::default(),
        });
        rectangle.rotate(90.0);
        let Shape::Rectangle(rotated) = &rectangle else {
            panic!("expected rectangle");
        };
        assert!((rotated.rect.width - 2.0).abs() < 1e-12);
        assert!((rotated.rect.height - 4.0).abs() < 1e-12);
        assert!(rotated.rect.center().approx_eq(Point2::new(2.0, 1.0), 1e-12));
    }

    #[test]
    fn empty_polygon_has_no_pivot() {
        let mut polygon = Shape::Polygon(Polygon {
            points: Vec::new(),
            style: StyleAttributes::default(),
        });
        assert!(polygon.rotation_pivot().is_none());
        assert!(!polygon.rotate(45.0));
    }
}
