use std::path::PathBuf;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zdraft_config::{AppConfig, ConfigError};
use zdraft_frontend::CliOptions;

const USAGE: &str = "用法: zdraft-app [--config PATH] [--open FILE.dxf] [--export FILE.dxf]";

fn main() {
    let mut args = std::env::args().skip(1);
    let mut config_override: Option<PathBuf> = None;
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--config" => &mut config_override,
            "--open" => &mut options.open,
            "--export" => &mut options.export,
            "-h" | "--help" => {
                println!("{USAGE}");
                return;
            }
            other => {
                eprintln!("未知参数：{other}");
                eprintln!("{USAGE}");
                std::process::exit(1);
            }
        };
        let Some(path) = args.next() else {
            eprintln!("`{arg}` 需要提供文件路径");
            std::process::exit(1);
        };
        *slot = Some(PathBuf::from(path));
    }

    let config = load_configuration(config_override);
    init_logging(&config);
    info!("启动 zdraft");

    if let Err(err) = zdraft_frontend::run_cli(&config, &options) {
        error!(error = %err, "执行 CLI 失败");
        eprintln!("错误：{err}");
        std::process::exit(1);
    }
}

fn load_configuration(override_path: Option<PathBuf>) -> AppConfig {
    match override_path {
        Some(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "加载指定配置失败，使用默认配置");
            AppConfig::default()
        }),
        None => match AppConfig::discover() {
            Ok(cfg) => cfg,
            Err(err) => {
                match &err {
                    ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
                        warn!(path = %path.display(), error = %err, "加载默认配置失败，使用内建默认值");
                    }
                    ConfigError::Context { .. } | ConfigError::Invalid { .. } => {
                        warn!(error = %err, "加载默认配置失败，使用内建默认值");
                    }
                }
                AppConfig::default()
            }
        },
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
