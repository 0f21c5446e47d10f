pub mod cli;
pub mod errors;
pub mod loader;
pub mod settings;

use errors::FrontendError;
use tracing::info;
use zdraft_config::AppConfig;

pub use cli::CliOptions;

/// 启动 CLI 前端。
pub fn run_cli(config: &AppConfig, options: &CliOptions) -> Result<(), FrontendError> {
    info!(
        open = ?options.open,
        export = ?options.export,
        "启动 CLI 前端"
    );
    cli::run(config, options)
}
