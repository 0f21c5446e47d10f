use std::collections::HashMap;

use tracing::debug;
use zdraft_core::style::LineType;

use crate::input::parse_number;
use crate::scene::Scene;

#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn arg(&self, position: usize) -> Option<&str> {
        self.args.get(position).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub success: bool,
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse;
}

pub struct CommandContext<'a> {
    pub scene: &'a mut Scene,
}

pub struct CommandBus {
    handlers: HashMap<&'static str, Box<dyn CommandHandler>>,
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBus {
    pub fn new() -> Self {
        let mut bus = Self {
            handlers: HashMap::new(),
        };
        bus.register(RotateCommand);
        bus.register(DeleteCommand);
        bus.register(ThicknessCommand);
        bus.register(LineTypeCommand);
        bus
    }

    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) {
        self.handlers.insert(handler.name(), Box::new(handler));
    }

    pub fn dispatch(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if let Some(handler) = self.handlers.get(request.name.as_str()) {
            debug!(command = request.name.as_str(), args = ?request.args, "执行命令");
            handler.execute(request, context)
        } else {
            CommandResponse::err(format!("未知命令: {}", request.name))
        }
    }

    pub fn available_commands(&self) -> impl Iterator<Item = &&'static str> {
        self.handlers.keys()
    }
}

fn parse_index(request: &CommandRequest) -> Result<usize, CommandResponse> {
    let raw = request
        .arg(0)
        .ok_or_else(|| CommandResponse::err("缺少图形序号"))?;
    raw.trim()
        .parse::<usize>()
        .map_err(|_| CommandResponse::err(format!("无效的图形序号: {raw}")))
}

/// `rotate <序号> <角度>`，角度单位为度。
struct RotateCommand;

impl CommandHandler for RotateCommand {
    fn name(&self) -> &'static str {
        "rotate"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let index = match parse_index(request) {
            Ok(index) => index,
            Err(response) => return response,
        };
        let angle = match request.arg(1).map(|raw| parse_number("angle", raw)) {
            Some(Ok(angle)) => angle,
            Some(Err(err)) => return CommandResponse::err(err.to_string()),
            None => return CommandResponse::err("缺少旋转角度"),
        };
        match context.scene.rotate_shape(index, angle) {
            Ok(()) => CommandResponse::ok(format!("图形 {index} 已旋转 {angle}°")),
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

struct DeleteCommand;

impl CommandHandler for DeleteCommand {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let index = match parse_index(request) {
            Ok(index) => index,
            Err(response) => return response,
        };
        match context.scene.remove_shape(index) {
            Ok(shape) => CommandResponse::ok(format!("已删除{}", shape.kind().label())),
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

/// 设置当前线宽（毫米）。
struct ThicknessCommand;

impl CommandHandler for ThicknessCommand {
    fn name(&self) -> &'static str {
        "thickness"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let Some(raw) = request.arg(0) else {
            return CommandResponse::err("缺少线宽数值");
        };
        match context.scene.set_line_thickness_text(raw) {
            Ok(value) => CommandResponse::ok(format!("线宽已设为 {value} mm")),
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

struct LineTypeCommand;

impl CommandHandler for LineTypeCommand {
    fn name(&self) -> &'static str {
        "line_type"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let Some(line_type) = request.arg(0).and_then(LineType::from_key) else {
            return CommandResponse::err("未知线型");
        };
        context.scene.set_line_type(line_type);
        CommandResponse::ok(format!("线型已设为{}", line_type.label()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    #[test]
    fn rotate_and_delete_commands_work() {
        let mut scene = Scene::new();
        let ids = scene.populate_demo().expect("demo");
        let before = scene.document().len();

        let bus = CommandBus::new();
        let mut context = CommandContext { scene: &mut scene };

        let rotate = CommandRequest::new("rotate", [ids.rectangle.to_string(), "45".to_string()]);
        let response = bus.dispatch(&rotate, &mut context);
        assert!(response.success, "{:?}", response.message);

        let delete = CommandRequest::new("delete", [ids.baseline.to_string()]);
        let response = bus.dispatch(&delete, &mut context);
        assert!(response.success);
        assert_eq!(context.scene.document().len(), before - 1);

        let missing = CommandRequest::new("delete", ["99"]);
        assert!(!bus.dispatch(&missing, &mut context).success);
    }

    #[test]
    fn style_commands_update_current_style() {
        let mut scene = Scene::new();
        let bus = CommandBus::new();
        let mut context = CommandContext { scene: &mut scene };

        let response = bus.dispatch(&CommandRequest::new("thickness", ["0.7"]), &mut context);
        assert!(response.success);
        assert_eq!(context.scene.style().line_thickness, 0.7);

        let response = bus.dispatch(&CommandRequest::new("thickness", ["0"]), &mut context);
        assert!(!response.success);
        assert_eq!(context.scene.style().line_thickness, 0.7);

        let response = bus.dispatch(&CommandRequest::new("line_type", ["dash_dot"]), &mut context);
        assert!(response.success);
        assert_eq!(context.scene.style().line_type, LineType::DashDot);
    }

    #[test]
    fn unknown_command_and_missing_args_fail() {
        let mut scene = Scene::new();
        let bus = CommandBus::new();
        let mut context = CommandContext { scene: &mut scene };

        let unknown = CommandRequest::new("explode", Vec::<String>::new());
        let response = bus.dispatch(&unknown, &mut context);
        assert!(!response.success);
        assert!(response.message.unwrap().contains("explode"));

        let rotate = CommandRequest::new("rotate", ["0"]);
        assert!(!bus.dispatch(&rotate, &mut context).success);
        assert_eq!(bus.available_commands().count(), 4);
    }
}
