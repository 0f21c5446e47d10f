use std::fmt::Display;
use std::io::{self, Write};

use thiserror::Error;
use tracing::{debug, info};
use zdraft_core::document::Shape;
use zdraft_core::geometry::Point2;

use crate::attributes::{EntityAttributes, LINETYPES};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write DXF output: {0}")]
    Io(#[from] io::Error),
}

/// 写出一份 R2000 ASCII DXF：HEADER、LTYPE/LAYER 表与全部实体，均位于图层 0。
pub fn export_document<W: Write>(shapes: &[Shape], writer: W) -> Result<(), ExportError> {
    let mut dxf = DxfWriter::new(writer);
    dxf.write_header()?;
    dxf.write_tables()?;

    dxf.begin_section("ENTITIES")?;
    let mut written = 0usize;
    for (index, shape) in shapes.iter().enumerate() {
        if dxf.write_shape(shape)? {
            written += 1;
        } else {
            debug!(index, kind = shape.kind().label(), "跳过退化图形");
        }
    }
    dxf.end_section()?;
    dxf.finish()?;

    info!(shapes = shapes.len(), written, "DXF 导出完成");
    Ok(())
}

const LAYER: &str = "0";

struct DxfWriter<W: Write> {
    out: W,
    next_handle: u32,
}

impl<W: Write> DxfWriter<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            next_handle: 0x20,
        }
    }

    fn pair(&mut self, code: i32, value: impl Display) -> io::Result<()> {
        writeln!(self.out, "{code:>3}")?;
        writeln!(self.out, "{value}")
    }

    fn point(&mut self, base_code: i32, point: Point2) -> io::Result<()> {
        self.pair(base_code, point.x())?;
        self.pair(base_code + 10, point.y())?;
        self.pair(base_code + 20, 0.0)
    }

    fn handle(&mut self) -> io::Result<()> {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.pair(5, format!("{handle:X}"))
    }

    fn begin_section(&mut self, name: &str) -> io::Result<()> {
        self.pair(0, "SECTION")?;
        self.pair(2, name)
    }

    fn end_section(&mut self) -> io::Result<()> {
        self.pair(0, "ENDSEC")
    }

    fn finish(mut self) -> io::Result<()> {
        self.pair(0, "EOF")?;
        self.out.flush()
    }

    fn write_header(&mut self) -> io::Result<()> {
        self.begin_section("HEADER")?;
        self.pair(9, "$ACADVER")?;
        self.pair(1, "AC1015")?;
        self.pair(9, "$INSUNITS")?;
        self.pair(70, 4)?;
        self.pair(9, "$LWDISPLAY")?;
        self.pair(290, 1)?;
        self.end_section()
    }

    fn write_tables(&mut self) -> io::Result<()> {
        self.begin_section("TABLES")?;

        self.begin_table("LTYPE", LINETYPES.len())?;
        for linetype in &LINETYPES {
            self.pair(0, "LTYPE")?;
            self.handle()?;
            self.pair(100, "AcDbSymbolTableRecord")?;
            self.pair(100, "AcDbLinetypeTableRecord")?;
            self.pair(2, linetype.name)?;
            self.pair(70, 0)?;
            self.pair(3, linetype.description)?;
            self.pair(72, 65)?;
            self.pair(73, linetype.pattern.len())?;
            self.pair(40, linetype.total_length())?;
            for element in linetype.pattern {
                self.pair(49, element)?;
                self.pair(74, 0)?;
            }
        }
        self.pair(0, "ENDTAB")?;

        self.begin_table("LAYER", 1)?;
        self.pair(0, "LAYER")?;
        self.handle()?;
        self.pair(100, "AcDbSymbolTableRecord")?;
        self.pair(100, "AcDbLayerTableRecord")?;
        self.pair(2, LAYER)?;
        self.pair(70, 0)?;
        self.pair(62, 7)?;
        self.pair(6, "CONTINUOUS")?;
        self.pair(370, -3)?;
        self.pair(0, "ENDTAB")?;

        self.end_section()
    }

    fn begin_table(&mut self, name: &str, entries: usize) -> io::Result<()> {
        self.pair(0, "TABLE")?;
        self.pair(2, name)?;
        self.handle()?;
        self.pair(100, "AcDbSymbolTable")?;
        self.pair(70, entries)
    }

    fn entity_header(&mut self, kind: &str, attributes: &EntityAttributes) -> io::Result<()> {
        self.pair(0, kind)?;
        self.handle()?;
        self.pair(100, "AcDbEntity")?;
        self.pair(8, LAYER)?;
        self.pair(6, attributes.linetype)?;
        self.pair(62, attributes.color)?;
        self.pair(370, attributes.lineweight)
    }

    /// 写出单个图形；退化图形不写出并返回 `false`。
    fn write_shape(&mut self, shape: &Shape) -> io::Result<bool> {
        let attributes = EntityAttributes::from_style(shape.style());
        match shape {
            Shape::Line(line) => {
                self.entity_header("LINE", &attributes)?;
                self.pair(100, "AcDbLine")?;
                self.point(10, line.start)?;
                self.point(11, line.end)?;
            }
            Shape::Circle(circle) => {
                self.write_circle(&attributes, circle.center, circle.radius)?;
            }
            Shape::CircleByThreePoints(circle) => match circle.geometry() {
                Some(geometry) => self.write_circle(&attributes, geometry.center, geometry.radius)?,
                None => return Ok(false),
            },
            Shape::ArcByThreePoints(arc) => match arc.geometry() {
                Some(geometry) => self.write_arc(
                    &attributes,
                    geometry.center,
                    geometry.radius,
                    geometry.start_angle_deg,
                    geometry.end_angle_deg(),
                )?,
                None => return Ok(false),
            },
            Shape::ArcByRadiusChord(arc) => {
                let sweep = arc.sweep();
                self.write_arc(
                    &attributes,
                    arc.center,
                    sweep.radius,
                    sweep.start_angle_deg,
                    sweep.end_angle_deg(),
                )?;
            }
            Shape::Rectangle(rectangle) => {
                let corners = rectangle.rect.corners();
                let mut points = corners.to_vec();
                points.push(corners[0]);
                self.write_lwpolyline(&attributes, &points, true)?;
            }
            Shape::Polygon(polygon) => {
                let (Some(first), Some(last)) = (polygon.points.first(), polygon.points.last())
                else {
                    return Ok(false);
                };
                if polygon.points.len() < 2 {
                    return Ok(false);
                }
                if first == last {
                    self.write_lwpolyline(&attributes, &polygon.points, false)?;
                } else {
                    let mut points = polygon.points.clone();
                    points.push(*first);
                    self.write_lwpolyline(&attributes, &points, true)?;
                }
            }
            Shape::BezierSpline(spline) => {
                if spline.control_points.len() < 2 {
                    return Ok(false);
                }
                self.write_spline(&attributes, &spline.control_points)?;
            }
            Shape::SegmentSpline(spline) => {
                let samples = spline.samples();
                if samples.len() < 2 {
                    return Ok(false);
                }
                self.write_lwpolyline(&attributes, &samples, false)?;
            }
        }
        Ok(true)
    }

    fn write_circle(
        &mut self,
        attributes: &EntityAttributes,
        center: Point2,
        radius: f64,
    ) -> io::Result<()> {
        self.entity_header("CIRCLE", attributes)?;
        self.pair(100, "AcDbCircle")?;
        self.point(10, center)?;
        self.pair(40, radius)
    }

    fn write_arc(
        &mut self,
        attributes: &EntityAttributes,
        center: Point2,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
    ) -> io::Result<()> {
        self.entity_header("ARC", attributes)?;
        self.pair(100, "AcDbCircle")?;
        self.point(10, center)?;
        self.pair(40, radius)?;
        self.pair(100, "AcDbArc")?;
        self.pair(50, start_deg)?;
        self.pair(51, end_deg)
    }

    fn write_lwpolyline(
        &mut self,
        attributes: &EntityAttributes,
        points: &[Point2],
        closed: bool,
    ) -> io::Result<()> {
        self.entity_header("LWPOLYLINE", attributes)?;
        self.pair(100, "AcDbPolyline")?;
        self.pair(90, points.len())?;
        self.pair(70, u8::from(closed))?;
        self.pair(43, 0.0)?;
        for point in points {
            self.pair(10, point.x())?;
            self.pair(20, point.y())?;
        }
        Ok(())
    }

    /// 钳位均匀 B 样条：次数 n-1，节点向量为 n 个 0 与 n 个 1，与同阶贝塞尔曲线重合。
    fn write_spline(
        &mut self,
        attributes: &EntityAttributes,
        control_points: &[Point2],
    ) -> io::Result<()> {
        let count = control_points.len();
        self.entity_header("SPLINE", attributes)?;
        self.pair(100, "AcDbSpline")?;
        self.pair(210, 0.0)?;
        self.pair(220, 0.0)?;
        self.pair(230, 1.0)?;
        self.pair(70, 8)?;
        self.pair(71, count - 1)?;
        self.pair(72, count * 2)?;
        self.pair(73, count)?;
        self.pair(74, 0)?;
        for knot in std::iter::repeat_n(0.0, count).chain(std::iter::repeat_n(1.0, count)) {
            self.pair(40, knot)?;
        }
        for point in control_points {
            self.point(10, *point)?;
        }
        Ok(())
    }
}
