use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;
use tracing::debug;
use zdraft_core::document::Document;

pub mod attributes;
mod export;
mod import;
mod parser;
mod reader;

pub use export::{ExportError, export_document};
pub use import::{
    DEFAULT_TARGET_SIZE, ImportError, ImportOptions, RECTANGLE_TOLERANCE, import_document,
    import_document_with,
};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path:?}: {source}")]
    WriteError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid document structure: {0}")]
    InvalidDocument(String),
}

impl From<ImportError> for IoError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Unsupported(feature) => IoError::UnsupportedFeature(feature),
            ImportError::Malformed(message) => IoError::InvalidDocument(message),
        }
    }
}

pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Document, IoError>;
}

pub trait DocumentSaver {
    fn save(&self, document: &Document, path: &Path) -> Result<(), IoError>;
}

/// 基于路径的 DXF 读写入口。
#[derive(Debug, Clone, Default)]
pub struct DxfFacade {
    options: ImportOptions,
}

impl DxfFacade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }
}

impl DocumentLoader for DxfFacade {
    fn load(&self, path: &Path) -> Result<Document, IoError> {
        let data = fs::read(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = data.len(), "读取 DXF 文件");
        let shapes = import_document_with(&data, &self.options)?;
        Ok(Document::from_shapes(shapes))
    }
}

impl DocumentSaver for DxfFacade {
    fn save(&self, document: &Document, path: &Path) -> Result<(), IoError> {
        let write_error = |source| IoError::WriteError {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(write_error)?;
        export_document(document.shapes(), BufWriter::new(file)).map_err(|err| match err {
            ExportError::Io(source) => write_error(source),
        })
    }
}

/// 解析过程中的内部错误，在 crate 边界转换为公开错误类型。
#[derive(Debug)]
pub(crate) enum DxfError {
    Unsupported { feature: String },
    Invalid { message: String },
}

impl DxfError {
    pub(crate) fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// 为格式错误附加出错位置。
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            Self::Invalid { message } => Self::Invalid {
                message: format!("{message}（第 {line} 行附近）"),
            },
            other => other,
        }
    }
}
