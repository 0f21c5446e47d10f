use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// 可识别的线型键。
pub const LINE_TYPE_KEYS: [&str; 4] = ["solid", "dash", "dash_dot", "dash_dot_dot"];

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub drawing: DrawingConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

impl AppConfig {
    /// 从显式路径加载配置并校验。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 自动发现配置文件：优先读取环境变量 `ZDRAFT_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("ZDRAFT_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let drawing = &self.drawing;
        if !LINE_TYPE_KEYS
            .iter()
            .any(|key| key.eq_ignore_ascii_case(drawing.line_type.trim()))
        {
            return Err(ConfigError::invalid(format!(
                "未知线型 \"{}\"，可选值：{}",
                drawing.line_type,
                LINE_TYPE_KEYS.join(", ")
            )));
        }
        if !(drawing.line_thickness.is_finite() && drawing.line_thickness > 0.0) {
            return Err(ConfigError::invalid(format!(
                "线宽必须为正数，当前为 {}",
                drawing.line_thickness
            )));
        }
        let dash_values = [
            ("dash_length", drawing.dash_length),
            ("dash_gap", drawing.dash_gap),
            ("dash_space", drawing.dash_space),
            ("dot_length", drawing.dot_length),
            ("dot_space", drawing.dot_space),
        ];
        if let Some((name, value)) = dash_values
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        {
            return Err(ConfigError::invalid(format!(
                "虚线参数 {name} 不能为负数，当前为 {value}"
            )));
        }
        if !(self.import.target_size.is_finite() && self.import.target_size > 0.0) {
            return Err(ConfigError::invalid(format!(
                "导入目标尺寸必须为正数，当前为 {}",
                self.import.target_size
            )));
        }
        Ok(())
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 新建图形使用的初始样式。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    pub line_type: String,
    /// 线宽，单位毫米。
    pub line_thickness: f64,
    pub color: [u8; 3],
    pub dash_auto_mode: bool,
    pub dash_length: f64,
    pub dash_gap: f64,
    pub dash_space: f64,
    pub dot_length: f64,
    pub dot_space: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            line_type: "solid".to_string(),
            line_thickness: 1.0,
            color: [0, 0, 0],
            dash_auto_mode: false,
            dash_length: 5.0,
            dash_gap: 5.0,
            dash_space: 3.0,
            dot_length: 1.0,
            dot_space: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// 导入后包围盒长边的目标尺寸。
    #[serde(default = "ImportConfig::default_target_size")]
    pub target_size: f64,
}

impl ImportConfig {
    fn default_target_size() -> f64 {
        1000.0
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            target_size: Self::default_target_size(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
    #[error("配置无效: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_returned_when_file_missing() {
        let cfg = AppConfig::discover().expect("discover should succeed");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.drawing.line_type, "solid");
        assert_eq!(cfg.drawing.line_thickness, 1.0);
        assert_eq!(cfg.drawing.color, [0, 0, 0]);
        assert!(!cfg.drawing.dash_auto_mode);
        assert_eq!(cfg.import.target_size, 1000.0);
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn load_from_temp_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            r#"
            [logging]
            level = "debug"

            [drawing]
            line_type = "dash_dot"
            line_thickness = 0.35
            color = [255, 0, 0]
            dash_auto_mode = true
            dash_length = 8.0

            [import]
            target_size = 500.0
            "#
        )
        .unwrap();

        let cfg = AppConfig::from_file(file.path()).expect("load config");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.drawing.line_type, "dash_dot");
        assert_eq!(cfg.drawing.line_thickness, 0.35);
        assert_eq!(cfg.drawing.color, [255, 0, 0]);
        assert!(cfg.drawing.dash_auto_mode);
        assert_eq!(cfg.drawing.dash_length, 8.0);
        // 未写出的字段取默认值
        assert_eq!(cfg.drawing.dash_gap, 5.0);
        assert_eq!(cfg.import.target_size, 500.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            "[drawing]\nline_type = \"zigzag\"\n",
            "[drawing]\nline_thickness = 0.0\n",
            "[drawing]\ndot_space = -1.0\n",
            "[import]\ntarget_size = -10.0\n",
        ];
        for content in cases {
            let mut file = tempfile::NamedTempFile::new().expect("create temp file");
            file.write_all(content.as_bytes()).unwrap();
            let err = AppConfig::from_file(file.path()).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "{content}");
        }
    }

    #[test]
    fn malformed_toml_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(b"[drawing\nline_type = ").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let missing = AppConfig::from_file("/nonexistent/zdraft.toml").unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
