use glam::DVec3;
use tracing::debug;

use crate::DxfError;
use crate::reader::{DxfReader, assign_coord, parse_f64, parse_i16, parse_i32};

/// ENTITIES 段中读出的原始实体，坐标保留 Z 分量，尚未归一化。
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawEntity {
    pub geometry: RawGeometry,
    pub attributes: RawAttributes,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawGeometry {
    Line {
        start: DVec3,
        end: DVec3,
    },
    Circle {
        center: DVec3,
        radius: f64,
    },
    /// 角度单位为度，自起始角逆时针到终止角。
    Arc {
        center: DVec3,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Polyline {
        vertices: Vec<DVec3>,
        is_closed: bool,
    },
    Spline {
        control_points: Vec<DVec3>,
    },
}

/// 与样式相关的公共组码。
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawAttributes {
    pub layer: Option<String>,
    pub linetype: Option<String>,
    pub color: Option<i16>,
    pub lineweight: Option<i16>,
    pub thickness: Option<f64>,
}

impl RawAttributes {
    /// 吸收公共组码；其余组码忽略。
    fn absorb(&mut self, code: i32, value: &str, entity: &str) -> Result<(), DxfError> {
        match code {
            8 => self.layer = Some(value.trim().to_string()),
            6 => self.linetype = Some(value.trim().to_string()),
            62 => self.color = Some(parse_i16(value, &format!("{entity} 颜色（组码 62）"))?),
            370 => {
                self.lineweight = Some(parse_i16(value, &format!("{entity} 线宽（组码 370）"))?)
            }
            39 => self.thickness = Some(parse_f64(value, &format!("{entity} 厚度（组码 39）"))?),
            _ => {}
        }
        Ok(())
    }
}

pub(crate) struct DxfParser<'a> {
    reader: DxfReader<'a>,
}

impl<'a> DxfParser<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            reader: DxfReader::new(source),
        }
    }

    pub(crate) fn parse(mut self) -> Result<Vec<RawEntity>, DxfError> {
        let result = self.parse_sections();
        result.map_err(|err| err.at_line(self.reader.line_number()))
    }

    fn parse_sections(&mut self) -> Result<Vec<RawEntity>, DxfError> {
        let mut entities = Vec::new();
        let mut saw_eof = false;
        while let Some((code, value)) = self.reader.next_pair()? {
            match code {
                999 => continue,
                0 => {}
                _ => {
                    return Err(DxfError::invalid(format!(
                        "意外的组码 {code}（期望 0 表示 SECTION/EOF）"
                    )));
                }
            }
            match value.trim() {
                "SECTION" => {
                    let (name_code, name) = self
                        .reader
                        .next_pair()?
                        .ok_or_else(|| DxfError::invalid("SECTION 缺少名称（组码 2）"))?;
                    if name_code != 2 {
                        return Err(DxfError::invalid(format!(
                            "SECTION 名称使用了组码 {name_code}（期望 2）"
                        )));
                    }
                    match name.trim() {
                        "ENTITIES" => self.parse_entities(&mut entities)?,
                        _ => self.skip_section()?,
                    }
                }
                "EOF" => {
                    saw_eof = true;
                    break;
                }
                unexpected => {
                    return Err(DxfError::invalid(format!(
                        "意外的标记 {unexpected}，期望 SECTION 或 EOF"
                    )));
                }
            }
        }
        if !saw_eof {
            return Err(DxfError::invalid("文件缺少 EOF 标记"));
        }
        Ok(entities)
    }

    fn skip_section(&mut self) -> Result<(), DxfError> {
        loop {
            match self.reader.next_pair()? {
                Some((0, value)) if value.trim() == "ENDSEC" => break,
                Some(_) => continue,
                None => {
                    return Err(DxfError::invalid("SECTION 未找到 ENDSEC 终止标记"));
                }
            }
        }
        Ok(())
    }

    fn parse_entities(&mut self, entities: &mut Vec<RawEntity>) -> Result<(), DxfError> {
        loop {
            let (code, value) = match self.reader.next_pair()? {
                Some(pair) => pair,
                None => return Err(DxfError::invalid("ENTITIES 段提前结束")),
            };
            if code != 0 {
                return Err(DxfError::invalid(format!(
                    "ENTITIES 段遇到组码 {code}（期望 0 表示实体起始）"
                )));
            }

            match value.trim() {
                "ENDSEC" => break,
                "LINE" => entities.push(self.parse_line()?),
                "CIRCLE" => entities.push(self.parse_circle()?),
                "ARC" => entities.push(self.parse_arc()?),
                "LWPOLYLINE" => entities.push(self.parse_lwpolyline()?),
                "POLYLINE" => {
                    if let Some(entity) = self.parse_polyline_entity()? {
                        entities.push(entity);
                    }
                }
                "SPLINE" => entities.push(self.parse_spline()?),
                other => {
                    debug!(entity = other, "跳过不支持的 DXF 实体");
                    self.skip_entity_body()?;
                }
            }
        }
        Ok(())
    }

    fn skip_entity_body(&mut self) -> Result<(), DxfError> {
        loop {
            match self.reader.next_pair()? {
                Some((0, value)) => {
                    self.reader.put_back((0, value));
                    return Ok(());
                }
                Some(_) => continue,
                None => return Err(DxfError::invalid("实体未正确结束")),
            }
        }
    }

    /// 读取实体体直至下一个组码 0；`visit` 处理几何组码，公共组码写入属性。
    fn read_body(
        &mut self,
        entity: &str,
        mut visit: impl FnMut(i32, &str) -> Result<(), DxfError>,
    ) -> Result<RawAttributes, DxfError> {
        let mut attributes = RawAttributes::default();
        loop {
            match self.reader.next_pair()? {
                Some((0, value)) => {
                    self.reader.put_back((0, value));
                    break;
                }
                Some((code, value)) => {
                    attributes.absorb(code, &value, entity)?;
                    visit(code, &value)?;
                }
                None => return Err(DxfError::invalid(format!("{entity} 未正确结束"))),
            }
        }
        Ok(attributes)
    }

    fn parse_line(&mut self) -> Result<RawEntity, DxfError> {
        let mut start = CoordSlots::default();
        let mut end = CoordSlots::default();
        let attributes = self.read_body("LINE", |code, value| match code {
            10 => assign_coord(&mut start.x, value, "LINE 起点 X（组码 10）"),
            20 => assign_coord(&mut start.y, value, "LINE 起点 Y（组码 20）"),
            30 => assign_coord(&mut start.z, value, "LINE 起点 Z（组码 30）"),
            11 => assign_coord(&mut end.x, value, "LINE 终点 X（组码 11）"),
            21 => assign_coord(&mut end.y, value, "LINE 终点 Y（组码 21）"),
            31 => assign_coord(&mut end.z, value, "LINE 终点 Z（组码 31）"),
            _ => Ok(()),
        })?;

        Ok(RawEntity {
            geometry: RawGeometry::Line {
                start: start.finish("LINE 起点")?,
                end: end.finish("LINE 终点")?,
            },
            attributes,
        })
    }

    fn parse_circle(&mut self) -> Result<RawEntity, DxfError> {
        let mut center = CoordSlots::default();
        let mut radius = None;
        let attributes = self.read_body("CIRCLE", |code, value| match code {
            10 => assign_coord(&mut center.x, value, "CIRCLE 圆心 X（组码 10）"),
            20 => assign_coord(&mut center.y, value, "CIRCLE 圆心 Y（组码 20）"),
            30 => assign_coord(&mut center.z, value, "CIRCLE 圆心 Z（组码 30）"),
            40 => assign_coord(&mut radius, value, "CIRCLE 半径（组码 40）"),
            _ => Ok(()),
        })?;

        Ok(RawEntity {
            geometry: RawGeometry::Circle {
                center: center.finish("CIRCLE 圆心")?,
                radius: radius.ok_or_else(|| DxfError::invalid("CIRCLE 缺少半径（组码 40）"))?,
            },
            attributes,
        })
    }

    fn parse_arc(&mut self) -> Result<RawEntity, DxfError> {
        let mut center = CoordSlots::default();
        let mut radius = None;
        let mut start_angle = None;
        let mut end_angle = None;
        let attributes = self.read_body("ARC", |code, value| match code {
            10 => assign_coord(&mut center.x, value, "ARC 圆心 X（组码 10）"),
            20 => assign_coord(&mut center.y, value, "ARC 圆心 Y（组码 20）"),
            30 => assign_coord(&mut center.z, value, "ARC 圆心 Z（组码 30）"),
            40 => assign_coord(&mut radius, value, "ARC 半径（组码 40）"),
            50 => assign_coord(&mut start_angle, value, "ARC 起始角（组码 50）"),
            51 => assign_coord(&mut end_angle, value, "ARC 终止角（组码 51）"),
            _ => Ok(()),
        })?;

        Ok(RawEntity {
            geometry: RawGeometry::Arc {
                center: center.finish("ARC 圆心")?,
                radius: radius.ok_or_else(|| DxfError::invalid("ARC 缺少半径（组码 40）"))?,
                start_angle: start_angle
                    .ok_or_else(|| DxfError::invalid("ARC 缺少起始角（组码 50）"))?,
                end_angle: end_angle
                    .ok_or_else(|| DxfError::invalid("ARC 缺少终止角（组码 51）"))?,
            },
            attributes,
        })
    }

    fn parse_lwpolyline(&mut self) -> Result<RawEntity, DxfError> {
        let mut is_closed = false;
        let mut elevation = 0.0;
        let mut vertices: Vec<(f64, f64)> = Vec::new();
        let mut pending_x: Option<f64> = None;
        let mut pending_y: Option<f64> = None;
        let attributes = self.read_body("LWPOLYLINE", |code, value| {
            match code {
                70 => {
                    let flag = parse_i32(value, "LWPOLYLINE 标志（组码 70）")?;
                    is_closed = flag & 0x01 == 0x01;
                }
                38 => elevation = parse_f64(value, "LWPOLYLINE 标高（组码 38）")?,
                10 => {
                    let x = parse_f64(value, "LWPOLYLINE 顶点 X")?;
                    if let Some(y) = pending_y.take() {
                        vertices.push((x, y));
                    } else if pending_x.replace(x).is_some() {
                        return Err(DxfError::invalid("LWPOLYLINE 顶点缺少对应的 Y（组码 20）"));
                    }
                }
                20 => {
                    let y = parse_f64(value, "LWPOLYLINE 顶点 Y")?;
                    if let Some(x) = pending_x.take() {
                        vertices.push((x, y));
                    } else if pending_y.replace(y).is_some() {
                        return Err(DxfError::invalid("LWPOLYLINE 顶点缺少对应的 X（组码 10）"));
                    }
                }
                // 凸度（42）不参与解码，多段线按直线段处理
                _ => {}
            }
            Ok(())
        })?;

        if pending_x.is_some() || pending_y.is_some() {
            return Err(DxfError::invalid(
                "LWPOLYLINE 顶点坐标成对出现（组码 10/20），检测到不完整的顶点",
            ));
        }

        Ok(RawEntity {
            geometry: RawGeometry::Polyline {
                vertices: vertices
                    .into_iter()
                    .map(|(x, y)| DVec3::new(x, y, elevation))
                    .collect(),
                is_closed,
            },
            attributes,
        })
    }

    /// 旧式 POLYLINE：头部之后是 VERTEX 序列，以 SEQEND 结束。网格类多段线整体跳过。
    fn parse_polyline_entity(&mut self) -> Result<Option<RawEntity>, DxfError> {
        let mut flags: i16 = 0;
        let attributes = self.read_body("POLYLINE", |code, value| {
            if code == 70 {
                flags = parse_i16(value, "POLYLINE 标志（组码 70）")?;
            }
            Ok(())
        })?;

        let is_mesh = flags & (0x10 | 0x40) != 0;
        let mut vertices = Vec::new();
        loop {
            match self.reader.next_pair()? {
                Some((0, value)) => match value.trim() {
                    "VERTEX" => {
                        if let Some(vertex) = self.parse_vertex()? {
                            vertices.push(vertex);
                        }
                    }
                    "SEQEND" => {
                        self.skip_entity_body()?;
                        break;
                    }
                    _ => {
                        // 缺少 SEQEND 的文件直接以下一个实体收尾
                        self.reader.put_back((0, value));
                        break;
                    }
                },
                Some(_) => {
                    return Err(DxfError::invalid(
                        "POLYLINE 遇到无效的记录，期望 VERTEX/SEQEND",
                    ));
                }
                None => {
                    return Err(DxfError::invalid(
                        "POLYLINE 缺少 SEQEND（组码 0, 值为 SEQEND）",
                    ));
                }
            }
        }

        if is_mesh {
            debug!(flags, "跳过网格类 POLYLINE");
            return Ok(None);
        }

        Ok(Some(RawEntity {
            geometry: RawGeometry::Polyline {
                vertices,
                is_closed: flags & 0x01 == 0x01,
            },
            attributes,
        }))
    }

    fn parse_vertex(&mut self) -> Result<Option<DVec3>, DxfError> {
        let mut position = CoordSlots::default();
        let mut flags: i16 = 0;
        self.read_body("VERTEX", |code, value| match code {
            10 => assign_coord(&mut position.x, value, "VERTEX X（组码 10）"),
            20 => assign_coord(&mut position.y, value, "VERTEX Y（组码 20）"),
            30 => assign_coord(&mut position.z, value, "VERTEX Z（组码 30）"),
            70 => {
                flags = parse_i16(value, "VERTEX 标志（组码 70）")?;
                Ok(())
            }
            _ => Ok(()),
        })?;

        // 样条拟合控制点（16）不属于可见折线
        if flags & 0x10 != 0 {
            return Ok(None);
        }
        position.finish("VERTEX").map(Some)
    }

    fn parse_spline(&mut self) -> Result<RawEntity, DxfError> {
        let mut control_points = Vec::new();
        let mut pending = CoordSlots::default();
        let attributes = self.read_body("SPLINE", |code, value| {
            match code {
                10 => {
                    if pending.x.is_some() {
                        control_points.push(pending.take("SPLINE 控制点")?);
                    }
                    pending.x = Some(parse_f64(value, "SPLINE 控制点 X（组码 10）")?);
                }
                20 => assign_coord(&mut pending.y, value, "SPLINE 控制点 Y（组码 20）")?,
                30 => assign_coord(&mut pending.z, value, "SPLINE 控制点 Z（组码 30）")?,
                _ => {}
            }
            Ok(())
        })?;
        if pending.x.is_some() || pending.y.is_some() {
            control_points.push(pending.take("SPLINE 控制点")?);
        }

        Ok(RawEntity {
            geometry: RawGeometry::Spline { control_points },
            attributes,
        })
    }
}

#[derive(Debug, Default)]
struct CoordSlots {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
}

impl CoordSlots {
    fn finish(&self, context: &str) -> Result<DVec3, DxfError> {
        let x = self
            .x
            .ok_or_else(|| DxfError::invalid(format!("{context} 缺少 X 坐标")))?;
        let y = self
            .y
            .ok_or_else(|| DxfError::invalid(format!("{context} 缺少 Y 坐标")))?;
        Ok(DVec3::new(x, y, self.z.unwrap_or(0.0)))
    }

    fn take(&mut self, context: &str) -> Result<DVec3, DxfError> {
        let point = self.finish(context)?;
        *self = Self::default();
        Ok(point)
    }
}
