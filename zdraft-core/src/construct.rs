//! 由用户输入点推导规范几何：外接圆、圆弧扫掠、正多边形顶点与样条采样。

use std::f64::consts::{PI, SQRT_2, TAU};

use glam::DVec2;

use crate::document::Rect;
use crate::geometry::{Point2, normalize_degrees};

/// 贝塞尔曲线求长时的均分段数。
pub const BEZIER_SEGMENTS: usize = 100;
/// Catmull-Rom 每段的采样点数（含两端）。
pub const CATMULL_ROM_SAMPLES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleGeometry {
    pub center: Point2,
    pub radius: f64,
}

/// 从 `start_angle_deg` 起逆时针扫过 `span_angle_deg` 的圆弧。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub center: Point2,
    pub radius: f64,
    pub start_angle_deg: f64,
    pub span_angle_deg: f64,
}

impl ArcGeometry {
    pub fn end_angle_deg(&self) -> f64 {
        normalize_degrees(self.start_angle_deg + self.span_angle_deg)
    }
}

/// 半径-弦长圆弧的扫掠参数，圆心由图形自身给出。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSweep {
    pub radius: f64,
    pub start_angle_deg: f64,
    pub span_angle_deg: f64,
}

impl ArcSweep {
    pub fn end_angle_deg(&self) -> f64 {
        normalize_degrees(self.start_angle_deg + self.span_angle_deg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    /// 顶点落在参考圆上。
    #[default]
    Inscribed,
    /// 边与参考圆相切。
    Circumscribed,
}

/// 三点外接圆；三点共线（行列式为 0）时返回 `None`。
pub fn circumcircle(p0: Point2, p1: Point2, p2: Point2) -> Option<CircleGeometry> {
    let (ax, ay) = (p0.x(), p0.y());
    let (bx, by) = (p1.x(), p1.y());
    let (cx, cy) = (p2.x(), p2.y());

    let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
    if d == 0.0 || !d.is_finite() {
        return None;
    }

    let a2 = ax * ax + ay * ay;
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
    let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;

    let center = Point2::new(ux, uy);
    Some(CircleGeometry {
        center,
        radius: center.distance_to(p0),
    })
}

fn polar_angle_deg(center: Point2, point: Point2) -> f64 {
    normalize_degrees(center.angle_to(point).to_degrees())
}

/// 过三点的圆弧：从 `p0` 出发，扫掠方向保证经过 `p1`。
pub fn arc_by_three_points(p0: Point2, p1: Point2, p2: Point2) -> Option<ArcGeometry> {
    let circle = circumcircle(p0, p1, p2)?;
    let start = polar_angle_deg(circle.center, p0);
    let mid = polar_angle_deg(circle.center, p1);
    let end = polar_angle_deg(circle.center, p2);

    let mut span = normalize_degrees(end - start);
    if normalize_degrees(mid - start) > span {
        span = 360.0 - span;
    }

    Some(ArcGeometry {
        center: circle.center,
        radius: circle.radius,
        start_angle_deg: start,
        span_angle_deg: span,
    })
}

/// 由圆心、半径点与弦端点确定圆弧。弦长超过 r·√2 且扫角不足 180° 时取优弧。
pub fn arc_by_radius_chord(center: Point2, radius_point: Point2, chord_point: Point2) -> ArcSweep {
    let radius = center.distance_to(radius_point);
    let start = polar_angle_deg(center, radius_point);
    let end = polar_angle_deg(center, chord_point);

    let mut span = normalize_degrees(end - start);
    let chord_length = radius_point.distance_to(chord_point);
    if chord_length > radius * SQRT_2 && span < 180.0 {
        span = 360.0 - span;
    }

    ArcSweep {
        radius,
        start_angle_deg: start,
        span_angle_deg: span,
    }
}

/// 正多边形顶点，第一个顶点位于参考点方向上，逆时针排列。
pub fn regular_polygon(
    center: Point2,
    radius_point: Point2,
    num_sides: usize,
    mode: PolygonMode,
) -> Vec<Point2> {
    let radius = center.distance_to(radius_point);
    if num_sides < 3 || !(radius.is_finite() && radius > 0.0) {
        return Vec::new();
    }

    let n = num_sides as f64;
    let vertex_radius = match mode {
        PolygonMode::Inscribed => radius,
        PolygonMode::Circumscribed => radius / (PI / n).cos(),
    };
    let start = center.angle_to(radius_point);
    let step = TAU / n;

    (0..num_sides)
        .map(|k| Point2::polar(center, vertex_radius, start + k as f64 * step))
        .collect()
}

/// Bernstein 形式的贝塞尔求值；控制点为空时返回原点。
pub fn bezier_point(control_points: &[Point2], t: f64) -> Point2 {
    let Some(degree) = control_points.len().checked_sub(1) else {
        return Point2::ORIGIN;
    };

    let mut acc = DVec2::ZERO;
    let mut binomial = 1.0_f64;
    for (i, point) in control_points.iter().enumerate() {
        let basis = binomial * (1.0 - t).powi((degree - i) as i32) * t.powi(i as i32);
        acc += point.as_vec2() * basis;
        binomial = binomial * (degree - i) as f64 / (i + 1) as f64;
    }
    Point2::from_vec(acc)
}

/// 在 t ∈ [0, 1] 上均匀取 `segments + 1` 个点。
pub fn bezier_samples(control_points: &[Point2], segments: usize) -> Vec<Point2> {
    if control_points.is_empty() || segments == 0 {
        return Vec::new();
    }
    (0..=segments)
        .map(|i| bezier_point(control_points, i as f64 / segments as f64))
        .collect()
}

/// 单段均匀 Catmull-Rom，曲线从 `p1` 走到 `p2`。
pub fn catmull_rom_segment(
    p0: Point2,
    p1: Point2,
    p2: Point2,
    p3: Point2,
    samples: usize,
) -> Vec<Point2> {
    match samples {
        0 => return Vec::new(),
        1 => return vec![p1],
        _ => {}
    }

    let (p0, p1, p2, p3) = (p0.as_vec2(), p1.as_vec2(), p2.as_vec2(), p3.as_vec2());
    (0..samples)
        .map(|i| {
            let t = i as f64 / (samples - 1) as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let point = 0.5
                * (2.0 * p1
                    + (p2 - p0) * t
                    + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
                    + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3);
            Point2::from_vec(point)
        })
        .collect()
}

/// 将相邻点对逐段连接，首尾缺失的邻点用端点自身代替。
pub fn catmull_rom_chain(points: &[Point2], samples_per_segment: usize) -> Vec<Point2> {
    let mut samples = Vec::new();
    for i in 0..points.len().saturating_sub(1) {
        let p0 = if i > 0 { points[i - 1] } else { points[i] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points.get(i + 2).copied().unwrap_or(p2);
        samples.extend(catmull_rom_segment(p0, p1, p2, p3, samples_per_segment));
    }
    samples
}

pub fn rect_from_corners(a: Point2, b: Point2) -> Rect {
    Rect::from_corners(a, b)
}

/// 以 `center` 为中心、`corner` 为一个角点的矩形。
pub fn rect_from_center(center: Point2, corner: Point2) -> Rect {
    let half = (corner.as_vec2() - center.as_vec2()).abs();
    Rect {
        origin: Point2::from_vec(center.as_vec2() - half),
        width: half.x * 2.0,
        height: half.y * 2.0,
    }
}

/// 极坐标转直角坐标，角度单位为度。
pub fn polar_to_cartesian(radius: f64, angle_deg: f64) -> Point2 {
    Point2::polar(Point2::ORIGIN, radius, angle_deg.to_radians())
}

pub fn polar_offset(origin: Point2, radius: f64, angle_deg: f64) -> Point2 {
    Point2::polar(origin, radius, angle_deg.to_radians())
}
