use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};
use zdraft_config::AppConfig;
use zdraft_core::document::Shape;
use zdraft_core::geometry::Point2;
use zdraft_engine::command::{CommandBus, CommandContext, CommandRequest};
use zdraft_engine::scene::Scene;
use zdraft_io::{DocumentSaver, DxfFacade};

use crate::errors::FrontendError;
use crate::loader::{
    DocumentSource, LoadedScene, load_scene_from_env_or_demo, load_scene_from_path,
};

/// 命令行传入的文件参数。
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub open: Option<PathBuf>,
    pub export: Option<PathBuf>,
}

/// 加载文档（或内置示例），打印概览，按需导出 DXF。
pub fn run(config: &AppConfig, options: &CliOptions) -> Result<(), FrontendError> {
    let loaded = match &options.open {
        Some(path) => load_scene_from_path(path, config)?,
        None => load_scene_from_env_or_demo(config)?,
    };
    let LoadedScene {
        mut scene,
        source,
        demo_shapes,
    } = loaded;

    let command_bus = CommandBus::new();
    let mut commands: Vec<&str> = command_bus.available_commands().copied().collect();
    commands.sort_unstable();
    println!("支持的命令: {}", commands.join(", "));

    if let Some(ids) = demo_shapes {
        // 演示旋转命令：矩形保持轴对齐
        let mut context = CommandContext { scene: &mut scene };
        let request = CommandRequest::new("rotate", [ids.rectangle.to_string(), "90".to_string()]);
        if let Err(err) = dispatch_cli_command(&command_bus, &request, &mut context) {
            warn!("CLI 命令执行失败: {err}");
        }
    }

    print!("{}", render_report(&scene, &source));

    if let Some(path) = &options.export {
        DxfFacade::new().save(scene.document(), path)?;
        info!(path = %path.display(), shapes = scene.document().len(), "已导出 DXF");
        println!("已导出 DXF：{}", path.display());
    }
    Ok(())
}

fn dispatch_cli_command(
    bus: &CommandBus,
    request: &CommandRequest,
    context: &mut CommandContext<'_>,
) -> Result<(), String> {
    let response = bus.dispatch(request, context);
    if response.success {
        if let Some(message) = response.message {
            println!("[命令] {message}");
        }
        Ok(())
    } else {
        Err(response.message.unwrap_or_else(|| "未知错误".to_string()))
    }
}

/// 场景概览：来源、样式以及每个图形的几何、长度与虚线图案。
pub fn render_report(scene: &Scene, source: &DocumentSource) -> String {
    SceneReport { scene, source }.to_string()
}

struct SceneReport<'a> {
    scene: &'a Scene,
    source: &'a DocumentSource,
}

impl fmt::Display for SceneReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let document = self.scene.document();
        writeln!(f, "zdraft CLI 演示")?;
        match self.source {
            DocumentSource::Dxf(path) => writeln!(f, "已从 DXF 加载文档：{}", path.display())?,
            DocumentSource::Demo => writeln!(f, "已通过构造入口生成内置示例图形")?,
        }

        let style = self.scene.style();
        writeln!(
            f,
            "当前样式：线型={}, 线宽={} mm, 颜色=({}, {}, {}), 自动虚线={}",
            style.line_type.label(),
            style.line_thickness,
            style.color.r,
            style.color.g,
            style.color.b,
            yes_no(style.dash_auto_mode)
        )?;

        if let Some(bounds) = document.bounds() {
            writeln!(
                f,
                "文档范围：{} -> {}（{:.2} x {:.2}）",
                format_point(bounds.min()),
                format_point(bounds.max()),
                bounds.width(),
                bounds.height()
            )?;
        }

        writeln!(f, "当前文档图形（共 {} 个）：", document.len())?;
        for (index, shape) in document.iter().enumerate() {
            let length = self.scene.length_of(index).unwrap_or_default();
            let pattern = self.scene.dash_pattern_of(index).unwrap_or_default();
            writeln!(
                f,
                "  - #{index} {}：{}，长度={:.2}，闭合={}，虚线={}",
                shape.kind().label(),
                describe_geometry(shape),
                length,
                yes_no(shape.style().is_closed),
                format_pattern(&pattern)
            )?;
        }
        Ok(())
    }
}

fn describe_geometry(shape: &Shape) -> String {
    match shape {
        Shape::Line(line) => {
            format!("起点={}, 终点={}", format_point(line.start), format_point(line.end))
        }
        Shape::Circle(circle) => format!(
            "圆心={}, 半径={:.2}",
            format_point(circle.center),
            circle.radius
        ),
        Shape::CircleByThreePoints(circle) => match circle.geometry() {
            Some(geometry) => format!(
                "圆心={}, 半径={:.2}",
                format_point(geometry.center),
                geometry.radius
            ),
            None => "三点共线，无法确定圆".to_string(),
        },
        Shape::ArcByThreePoints(arc) => match arc.geometry() {
            Some(geometry) => format!(
                "圆心={}, 半径={:.2}, 起始角={:.1}°, 张角={:.1}°",
                format_point(geometry.center),
                geometry.radius,
                geometry.start_angle_deg,
                geometry.span_angle_deg
            ),
            None => "三点共线，无法确定圆弧".to_string(),
        },
        Shape::ArcByRadiusChord(arc) => {
            let sweep = arc.sweep();
            format!(
                "圆心={}, 半径={:.2}, 起始角={:.1}°, 张角={:.1}°",
                format_point(arc.center),
                sweep.radius,
                sweep.start_angle_deg,
                sweep.span_angle_deg
            )
        }
        Shape::Rectangle(rectangle) => format!(
            "原点={}, 宽={:.2}, 高={:.2}",
            format_point(rectangle.rect.origin),
            rectangle.rect.width,
            rectangle.rect.height
        ),
        Shape::Polygon(polygon) => format!(
            "顶点数={}, 顶点={}",
            polygon.points.len(),
            format_points(&polygon.points)
        ),
        Shape::BezierSpline(spline) => format!(
            "控制点数={}, 控制点={}",
            spline.control_points.len(),
            format_points(&spline.control_points)
        ),
        Shape::SegmentSpline(spline) => format!(
            "型值点数={}, 型值点={}",
            spline.points.len(),
            format_points(&spline.points)
        ),
    }
}

fn format_point(point: Point2) -> String {
    format!("({:.2}, {:.2})", point.x(), point.y())
}

fn format_points(points: &[Point2]) -> String {
    points
        .iter()
        .map(|point| format_point(*point))
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn format_pattern(pattern: &[f64]) -> String {
    if pattern.is_empty() {
        return "实线".to_string();
    }
    let values: Vec<String> = pattern.iter().map(|value| format!("{value:.2}")).collect();
    format!("[{}]", values.join(", "))
}

fn yes_no(value: bool) -> &'static str {
    if value { "是" } else { "否" }
}
