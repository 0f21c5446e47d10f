pub mod command;
pub mod construct;
pub mod input;
pub mod modes;

pub mod errors {
    use thiserror::Error;
    use zdraft_core::style::StyleError;

    #[derive(Debug, Error)]
    pub enum EngineError {
        #[error("shape with index {0} not found")]
        ShapeNotFound(usize),
        #[error("invalid value for {field}: {value:?}")]
        InvalidEdit { field: &'static str, value: String },
        #[error("input does not define a valid {mode} shape")]
        DegenerateGeometry { mode: &'static str },
        #[error(transparent)]
        Style(#[from] StyleError),
    }

    impl EngineError {
        pub fn invalid_edit(field: &'static str, value: impl Into<String>) -> Self {
            Self::InvalidEdit {
                field,
                value: value.into(),
            }
        }
    }
}

pub mod scene {
    use tracing::debug;
    use zdraft_core::dash;
    use zdraft_core::document::{Document, Shape};
    use zdraft_core::geometry::Point2;
    use zdraft_core::metrics;
    use zdraft_core::style::{DashParams, LineType, Rgb, StyleAttributes};

    use crate::construct::{ConstructionParams, construct};
    use crate::errors::EngineError;
    use crate::input::{CoordinateSystem, parse_number};
    use crate::modes::DrawingMode;

    /// 引擎层维护 `Document` 以及当前样式、绘图模式等编辑状态。
    #[derive(Debug, Default)]
    pub struct Scene {
        document: Document,
        style: StyleAttributes,
        mode: DrawingMode,
        coordinate_system: CoordinateSystem,
    }

    /// 演示文档中各图形的索引。
    #[derive(Debug, Clone, Copy)]
    pub struct DemoShapes {
        pub baseline: usize,
        pub circle: usize,
        pub arc: usize,
        pub rectangle: usize,
        pub hexagon: usize,
        pub spline: usize,
    }

    impl Scene {
        pub fn new() -> Self {
            Self::default()
        }

        /// 使用现有文档初始化场景。
        pub fn with_document(document: Document) -> Self {
            let mut scene = Self::new();
            scene.load_document(document);
            scene
        }

        /// 替换当前文档，编辑状态保持不变。
        pub fn load_document(&mut self, document: Document) {
            debug!(shapes = document.len(), "载入文档");
            self.document = document;
        }

        #[inline]
        pub fn document(&self) -> &Document {
            &self.document
        }

        #[inline]
        pub fn document_mut(&mut self) -> &mut Document {
            &mut self.document
        }

        #[inline]
        pub fn style(&self) -> &StyleAttributes {
            &self.style
        }

        pub fn set_style(&mut self, style: StyleAttributes) {
            self.style = style;
        }

        #[inline]
        pub fn mode(&self) -> DrawingMode {
            self.mode
        }

        pub fn set_mode(&mut self, mode: DrawingMode) {
            self.mode = mode;
        }

        #[inline]
        pub fn coordinate_system(&self) -> CoordinateSystem {
            self.coordinate_system
        }

        pub fn set_coordinate_system(&mut self, system: CoordinateSystem) {
            self.coordinate_system = system;
        }

        pub fn shape(&self, index: usize) -> Result<&Shape, EngineError> {
            self.document
                .get(index)
                .ok_or(EngineError::ShapeNotFound(index))
        }

        fn shape_mut(&mut self, index: usize) -> Result<&mut Shape, EngineError> {
            self.document
                .get_mut(index)
                .ok_or(EngineError::ShapeNotFound(index))
        }

        /// 以当前样式构造图形并追加到文档，返回其索引。
        pub fn commit(
            &mut self,
            mode: DrawingMode,
            params: &ConstructionParams,
        ) -> Result<usize, EngineError> {
            let shape = construct(mode, params, &self.style)
                .ok_or(EngineError::DegenerateGeometry { mode: mode.key() })?;
            let index = self.document.push(shape);
            debug!(index, mode = mode.key(), "已提交图形");
            Ok(index)
        }

        /// 使用当前绘图模式提交。
        pub fn commit_current(&mut self, params: &ConstructionParams) -> Result<usize, EngineError> {
            self.commit(self.mode, params)
        }

        /// 绕默认旋转中心旋转，角度单位为度，正值为逆时针。
        pub fn rotate_shape(&mut self, index: usize, angle_deg: f64) -> Result<(), EngineError> {
            if !angle_deg.is_finite() {
                return Err(EngineError::invalid_edit("angle", angle_deg.to_string()));
            }
            let shape = self.shape_mut(index)?;
            if !shape.rotate(angle_deg) {
                return Err(EngineError::DegenerateGeometry {
                    mode: shape.kind().label(),
                });
            }
            Ok(())
        }

        pub fn rotate_shape_around(
            &mut self,
            index: usize,
            pivot: Point2,
            angle_deg: f64,
        ) -> Result<(), EngineError> {
            if !angle_deg.is_finite() {
                return Err(EngineError::invalid_edit("angle", angle_deg.to_string()));
            }
            self.shape_mut(index)?.rotate_around(pivot, angle_deg);
            Ok(())
        }

        pub fn remove_shape(&mut self, index: usize) -> Result<Shape, EngineError> {
            let shape = self
                .document
                .remove(index)
                .ok_or(EngineError::ShapeNotFound(index))?;
            debug!(index, kind = shape.kind().label(), "已删除图形");
            Ok(shape)
        }

        /// 解析文本线宽；非法或非正值时保留原值。
        pub fn set_line_thickness_text(&mut self, text: &str) -> Result<f64, EngineError> {
            let thickness = parse_number("line_thickness", text)?;
            self.style.set_line_thickness(thickness)?;
            Ok(thickness)
        }

        pub fn set_line_type(&mut self, line_type: LineType) {
            self.style.line_type = line_type;
        }

        pub fn set_color(&mut self, color: Rgb) {
            self.style.color = color;
        }

        pub fn set_dash_auto_mode(&mut self, enabled: bool) {
            self.style.dash_auto_mode = enabled;
        }

        pub fn set_dash_params(&mut self, params: DashParams) -> Result<(), EngineError> {
            self.style.set_dash_params(params)?;
            Ok(())
        }

        /// 把当前样式套用到已有图形，图形自身的闭合标记保持不变。
        pub fn apply_style(&mut self, index: usize) -> Result<(), EngineError> {
            let style = self.style;
            let target = self.shape_mut(index)?.style_mut();
            *target = style.closed(target.is_closed);
            Ok(())
        }

        pub fn length_of(&self, index: usize) -> Result<f64, EngineError> {
            self.shape(index).map(metrics::length_of)
        }

        pub fn dash_pattern_of(&self, index: usize) -> Result<Vec<f64>, EngineError> {
            self.shape(index).map(dash::dash_pattern_of)
        }

        /// 通过构造入口生成一组示例图形，返回关键索引。
        pub fn populate_demo(&mut self) -> Result<DemoShapes, EngineError> {
            let points = |coords: &[(f64, f64)]| {
                ConstructionParams::from_points(coords.iter().map(|(x, y)| Point2::new(*x, *y)))
            };

            let baseline = self.commit(DrawingMode::Line, &points(&[(0.0, 0.0), (100.0, 0.0)]))?;
            let circle = self.commit(
                DrawingMode::CircleCenterRadius,
                &points(&[(50.0, 25.0), (62.5, 25.0)]),
            )?;
            let arc = self.commit(
                DrawingMode::ArcRadiusChord,
                &points(&[(20.0, 10.0), (27.5, 10.0), (20.0, 17.5)]),
            )?;
            let rectangle = self.commit(
                DrawingMode::RectangleSides,
                &points(&[(70.0, -20.0), (95.0, -5.0)]),
            )?;
            let hexagon = self.commit(
                DrawingMode::PolygonInscribed,
                &points(&[(20.0, -15.0), (30.0, -15.0)]).with_sides(6),
            )?;
            let spline = self.commit(
                DrawingMode::SplineBezier,
                &points(&[(0.0, 10.0), (10.0, 20.0), (25.0, 5.0), (40.0, 15.0)]),
            )?;

            let ids = DemoShapes {
                baseline,
                circle,
                arc,
                rectangle,
                hexagon,
                spline,
            };
            debug!(shapes = self.document.len(), "已创建演示图形");
            Ok(ids)
        }
    }

}
