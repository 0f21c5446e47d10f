use std::env;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use zdraft_config::AppConfig;
use zdraft_engine::scene::{DemoShapes, Scene};
use zdraft_io::{DocumentLoader, DxfFacade};

use crate::errors::FrontendError;
use crate::settings::{import_options_from_config, style_from_config};

/// 未显式指定文件时读取的样例 DXF 路径。
pub const SAMPLE_DXF_ENV: &str = "ZDRAFT_CLI_SAMPLE_DXF";

/// 文档来源，便于前端呈现加载信息。
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    Dxf(PathBuf),
    Demo,
}

/// 统一封装加载后的场景与元信息。
#[derive(Debug)]
pub struct LoadedScene {
    pub scene: Scene,
    pub source: DocumentSource,
    pub demo_shapes: Option<DemoShapes>,
}

/// 加载指定 DXF；失败直接返回错误。
pub fn load_scene_from_path(path: &Path, config: &AppConfig) -> Result<LoadedScene, FrontendError> {
    let mut scene = new_scene(config)?;
    let loader = DxfFacade::with_options(import_options_from_config(config)?);
    let document = loader.load(path)?;
    info!(path = %path.display(), shapes = document.len(), "从 DXF 加载文档成功");
    scene.load_document(document);
    Ok(LoadedScene {
        scene,
        source: DocumentSource::Dxf(path.to_path_buf()),
        demo_shapes: None,
    })
}

/// 从环境变量 `ZDRAFT_CLI_SAMPLE_DXF` 指定的路径加载 DXF，
/// 若未设置或加载失败则回退到内置示例。
pub fn load_scene_from_env_or_demo(config: &AppConfig) -> Result<LoadedScene, FrontendError> {
    if let Some(path) = env::var_os(SAMPLE_DXF_ENV) {
        let path = PathBuf::from(path);
        match load_scene_from_path(&path, config) {
            Ok(loaded) => return Ok(loaded),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "加载 DXF 失败，回退到内置示例");
            }
        }
    }
    load_demo_scene(config)
}

pub fn load_demo_scene(config: &AppConfig) -> Result<LoadedScene, FrontendError> {
    let mut scene = new_scene(config)?;
    let demo_shapes = scene.populate_demo()?;
    Ok(LoadedScene {
        scene,
        source: DocumentSource::Demo,
        demo_shapes: Some(demo_shapes),
    })
}

fn new_scene(config: &AppConfig) -> Result<Scene, FrontendError> {
    let mut scene = Scene::new();
    scene.set_style(style_from_config(&config.drawing)?);
    Ok(scene)
}
