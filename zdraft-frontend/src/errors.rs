use thiserror::Error;
use zdraft_engine::errors::EngineError;
use zdraft_io::IoError;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("配置项 {field} 无效: {message}")]
    InvalidSetting {
        field: &'static str,
        message: String,
    },
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
