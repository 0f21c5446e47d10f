use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use zdraft_core::document::{
    ArcByRadiusChord, BezierSpline, Circle, Line, Polygon, Rect, Rectangle, Shape,
};
use zdraft_core::geometry::{Bounds2D, Point2, Vector2};
use zdraft_core::style::StyleAttributes;

use crate::DxfError;
use crate::attributes::decode_style;
use crate::parser::{DxfParser, RawEntity, RawGeometry};
use crate::reader::BINARY_SENTINEL;

/// 导入后图形整体缩放到的目标尺寸（最大边长）。
pub const DEFAULT_TARGET_SIZE: f64 = 1000.0;
/// 判定四边形为矩形时相邻边点积的容差。
pub const RECTANGLE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImportError {
    #[error("unsupported DXF content: {0}")]
    Unsupported(String),
    #[error("malformed DXF: {0}")]
    Malformed(String),
}

impl From<DxfError> for ImportError {
    fn from(err: DxfError) -> Self {
        match err {
            DxfError::Unsupported { feature } => ImportError::Unsupported(feature),
            DxfError::Invalid { message } => ImportError::Malformed(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub target_size: f64,
    /// 缺失属性的回落值，同时提供虚线参数与自动模式。
    pub default_style: StyleAttributes,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            default_style: StyleAttributes::default(),
        }
    }
}

pub fn import_document(bytes: &[u8]) -> Result<Vec<Shape>, ImportError> {
    import_document_with(bytes, &ImportOptions::default())
}

/// 解析 ASCII DXF，整体居中缩放后解码为图形。失败时不返回任何图形。
pub fn import_document_with(
    bytes: &[u8],
    options: &ImportOptions,
) -> Result<Vec<Shape>, ImportError> {
    if bytes.starts_with(BINARY_SENTINEL) {
        return Err(DxfError::unsupported("二进制 DXF").into());
    }
    let source = String::from_utf8_lossy(bytes);
    let mut entities = DxfParser::new(&source).parse()?;
    debug!(count = entities.len(), "DXF 实体解析完成");

    let scale = normalize(&mut entities, options.target_size);
    let shapes: Vec<Shape> = entities
        .iter()
        .filter_map(|entity| decode_entity(entity, &options.default_style))
        .collect();
    info!(
        entities = entities.len(),
        shapes = shapes.len(),
        scale,
        "DXF 导入完成"
    );
    Ok(shapes)
}

/// 丢弃 Z 坐标，把全部几何的包围盒中心移到原点，再缩放到 `target_size`。返回缩放系数。
/// 包围盒计入线段端点、多段线顶点与样条控制点，圆和圆弧按整圆外接框计入。
fn normalize(entities: &mut [RawEntity], target_size: f64) -> f64 {
    for entity in entities.iter_mut() {
        for_each_point(&mut entity.geometry, |point| point.z = 0.0);
    }

    let bounds = raw_bounds(entities);
    if bounds.is_empty() {
        return 1.0;
    }
    let center = bounds.center().as_vec2().extend(0.0);
    let extent = bounds.width().max(bounds.height());
    let scale = if extent > 0.0 && extent.is_finite() && target_size > 0.0 {
        target_size / extent
    } else {
        1.0
    };

    for entity in entities.iter_mut() {
        for_each_point(&mut entity.geometry, |point| *point = (*point - center) * scale);
        match &mut entity.geometry {
            RawGeometry::Circle { radius, .. } | RawGeometry::Arc { radius, .. } => {
                *radius *= scale;
            }
            _ => {}
        }
    }
    scale
}

fn for_each_point(geometry: &mut RawGeometry, mut visit: impl FnMut(&mut DVec3)) {
    match geometry {
        RawGeometry::Line { start, end } => {
            visit(start);
            visit(end);
        }
        RawGeometry::Circle { center, .. } | RawGeometry::Arc { center, .. } => visit(center),
        RawGeometry::Polyline { vertices, .. } => vertices.iter_mut().for_each(visit),
        RawGeometry::Spline { control_points } => control_points.iter_mut().for_each(visit),
    }
}

fn raw_bounds(entities: &[RawEntity]) -> Bounds2D {
    let mut bounds = Bounds2D::empty();
    for entity in entities {
        match &entity.geometry {
            RawGeometry::Line { start, end } => {
                bounds.include_point(flatten(*start));
                bounds.include_point(flatten(*end));
            }
            RawGeometry::Circle { center, radius } | RawGeometry::Arc { center, radius, .. } => {
                bounds.include_circle(flatten(*center), *radius);
            }
            RawGeometry::Polyline { vertices, .. } => {
                vertices.iter().for_each(|v| bounds.include_point(flatten(*v)));
            }
            RawGeometry::Spline { control_points } => {
                control_points.iter().for_each(|p| bounds.include_point(flatten(*p)));
            }
        }
    }
    bounds
}

#[inline]
fn flatten(point: DVec3) -> Point2 {
    Point2::new(point.x, point.y)
}

fn decode_entity(entity: &RawEntity, defaults: &StyleAttributes) -> Option<Shape> {
    let mut style = decode_style(&entity.attributes, defaults);
    let shape = match &entity.geometry {
        RawGeometry::Line { start, end } => Shape::Line(Line {
            start: flatten(*start),
            end: flatten(*end),
            style,
        }),
        RawGeometry::Circle { center, radius } => {
            style.is_closed = true;
            Shape::Circle(Circle {
                center: flatten(*center),
                radius: *radius,
                style,
            })
        }
        RawGeometry::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        } => {
            let center = flatten(*center);
            Shape::ArcByRadiusChord(ArcByRadiusChord {
                center,
                radius_point: Point2::polar(center, *radius, start_angle.to_radians()),
                chord_point: Point2::polar(center, *radius, end_angle.to_radians()),
                style,
            })
        }
        RawGeometry::Polyline {
            vertices,
            is_closed,
        } => return decode_polyline(vertices, *is_closed, style),
        RawGeometry::Spline { control_points } => {
            if control_points.len() < 2 {
                debug!(points = control_points.len(), "跳过控制点不足的 SPLINE");
                return None;
            }
            Shape::BezierSpline(BezierSpline {
                control_points: control_points.iter().copied().map(flatten).collect(),
                style,
            })
        }
    };
    Some(shape)
}

fn decode_polyline(
    vertices: &[DVec3],
    is_closed: bool,
    mut style: StyleAttributes,
) -> Option<Shape> {
    let mut points: Vec<Point2> = vertices.iter().copied().map(flatten).collect();
    if is_closed && points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < 2 {
        debug!(points = points.len(), "跳过顶点不足的多段线");
        return None;
    }

    style.is_closed = true;
    if is_rectangle(&points) {
        let mut bounds = Bounds2D::empty();
        points.iter().for_each(|point| bounds.include_point(*point));
        return Some(Shape::Rectangle(Rectangle {
            rect: Rect::from_corners(bounds.min(), bounds.max()),
            style,
        }));
    }
    Some(Shape::Polygon(Polygon { points, style }))
}

/// 四个顶点且每对相邻边都垂直。
fn is_rectangle(points: &[Point2]) -> bool {
    if points.len() != 4 {
        return false;
    }
    (0..4).all(|i| {
        let p1 = points[i];
        let p2 = points[(i + 1) % 4];
        let p3 = points[(i + 2) % 4];
        let v1 = Vector2::from_points(p1, p2);
        let v2 = Vector2::from_points(p2, p3);
        v1.dot(v2).abs() <= RECTANGLE_TOLERANCE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RawAttributes;

    fn raw(geometry: RawGeometry) -> RawEntity {
        RawEntity {
            geometry,
            attributes: RawAttributes::default(),
        }
    }

    #[test]
    fn normalize_centres_and_scales_all_geometry() {
        let mut entities = vec![
            raw(RawGeometry::Line {
                start: DVec3::new(0.0, 0.0, 4.0),
                end: DVec3::new(10.0, 0.0, 4.0),
            }),
            raw(RawGeometry::Circle {
                center: DVec3::new(5.0, 0.0, 0.0),
                radius: 2.0,
            }),
        ];
        let scale = normalize(&mut entities, 1000.0);
        assert_eq!(scale, 100.0);
        assert_eq!(
            entities[0].geometry,
            RawGeometry::Line {
                start: DVec3::new(-500.0, 0.0, 0.0),
                end: DVec3::new(500.0, 0.0, 0.0),
            }
        );
        assert_eq!(
            entities[1].geometry,
            RawGeometry::Circle {
                center: DVec3::ZERO,
                radius: 200.0,
            }
        );
    }

    #[test]
    fn degenerate_extent_keeps_unit_scale() {
        let mut entities = vec![raw(RawGeometry::Polyline {
            vertices: vec![DVec3::new(3.0, 3.0, 0.0), DVec3::new(3.0, 3.0, 0.0)],
            is_closed: false,
        })];
        assert_eq!(normalize(&mut entities, 1000.0), 1.0);
        assert!(normalize(&mut [], 1000.0) == 1.0);
    }

    #[test]
    fn rectangle_detection_requires_right_angles() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        assert!(is_rectangle(&square));
        let skewed = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 2.0),
            Point2::new(1.0, 2.0),
        ];
        assert!(!is_rectangle(&skewed));
        assert!(!is_rectangle(&square[..3]));
    }

    #[test]
    fn closed_polyline_drops_duplicate_closing_vertex() {
        let vertices = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(4.0, 0.0, 0.0),
            DVec3::new(2.0, 3.0, 0.0),
            DVec3::new(0.0, 0.0, 0.0),
        ];
        let shape = decode_polyline(&vertices, true, StyleAttributes::default())
            .expect("triangle");
        let Shape::Polygon(polygon) = shape else {
            panic!("expected polygon, got {shape:?}");
        };
        assert_eq!(polygon.points.len(), 3);
        assert!(polygon.style.is_closed);
    }

    #[test]
    fn closed_polyline_of_one_repeated_vertex_is_skipped() {
        let vertices = [DVec3::new(3.0, 3.0, 0.0), DVec3::new(3.0, 3.0, 0.0)];
        let style = StyleAttributes::default();
        assert!(decode_polyline(&vertices, true, style).is_none());

        let open = decode_polyline(&vertices, false, style).expect("open polyline");
        let Shape::Polygon(polygon) = open else {
            panic!("expected polygon, got {open:?}");
        };
        assert_eq!(polygon.points.len(), 2);
    }

    #[test]
    fn closed_square_polyline_becomes_rectangle() {
        let vertices = [
            DVec3::new(-1.0, -1.0, 0.0),
            DVec3::new(1.0, -1.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(-1.0, 1.0, 0.0),
            DVec3::new(-1.0, -1.0, 0.0),
        ];
        let shape = decode_polyline(&vertices, true, StyleAttributes::default())
            .expect("rectangle");
        assert_eq!(
            shape,
            Shape::Rectangle(Rectangle {
                rect: Rect::new(Point2::new(-1.0, -1.0), 2.0, 2.0),
                style: StyleAttributes::default().closed(true),
            })
        );
    }

    #[test]
    fn short_polylines_and_splines_are_skipped() {
        let style = StyleAttributes::default();
        assert!(decode_polyline(&[DVec3::ZERO], false, style).is_none());
        let spline = raw(RawGeometry::Spline {
            control_points: vec![DVec3::ZERO],
        });
        assert!(decode_entity(&spline, &style).is_none());
    }

    #[test]
    fn arc_points_sit_on_circle_at_start_and_end_angles() {
        let arc = raw(RawGeometry::Arc {
            center: DVec3::ZERO,
            radius: 10.0,
            start_angle: 0.0,
            end_angle: 90.0,
        });
        let Some(Shape::ArcByRadiusChord(decoded)) =
            decode_entity(&arc, &StyleAttributes::default())
        else {
            panic!("expected arc");
        };
        assert!(decoded.radius_point.approx_eq(Point2::new(10.0, 0.0), 1e-9));
        assert!(decoded.chord_point.approx_eq(Point2::new(0.0, 10.0), 1e-9));
        assert!(!decoded.style.is_closed);
    }

    #[test]
    fn binary_dxf_is_unsupported() {
        let mut bytes = BINARY_SENTINEL.to_vec();
        bytes.extend_from_slice(b"\r\n\x1a\0");
        assert!(matches!(
            import_document(&bytes),
            Err(ImportError::Unsupported(_))
        ));
    }
}
