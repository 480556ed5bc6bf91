//! 统一错误处理框架
//!
//! 报告生成过程中所有错误类型的定义。所有错误都直接呈现给用户，不做重试。

use std::fmt;
use std::io;

/// 报告生成相关的统一错误类型
#[derive(Debug)]
pub enum ReportError {
    /// `-R` 参数不是合法的 `x:y` 数值区间
    InvalidRangeFormat(String),

    /// `-C` 参数不是可识别的编码格式
    UnknownCodec(String),

    /// `-S` 指定的发布组在过滤后的数据中不存在
    UnknownSource(String),

    /// `-O` 参数不是可识别的排序方式
    InvalidOrderOption(String),

    /// 其他命令行输入错误
    InvalidInput(String),

    /// 文件I/O错误
    IoError(io::Error),

    /// 数据集格式错误
    DataFormatError(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::InvalidRangeFormat(value) => {
                write!(f, "无效的效率区间 / Invalid range format: '{value}' (expected MIN:MAX)")
            }
            ReportError::UnknownCodec(value) => {
                write!(f, "未知编码格式 / Unknown codec: '{value}'")
            }
            ReportError::UnknownSource(name) => {
                write!(f, "过滤后的数据中没有该发布组 / Unknown source: '{name}'")
            }
            ReportError::InvalidOrderOption(value) => {
                write!(f, "无效的排序方式 / Invalid order option: '{value}'")
            }
            ReportError::InvalidInput(msg) => write!(f, "输入验证失败 / Invalid input: {msg}"),
            ReportError::IoError(err) => write!(f, "文件I/O错误 / I/O error: {err}"),
            ReportError::DataFormatError(msg) => {
                write!(f, "数据格式错误 / Data format error: {msg}")
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(err: io::Error) -> Self {
        ReportError::IoError(err)
    }
}

/// 报告生成操作的标准Result类型
pub type ReportResult<T> = Result<T, ReportError>;

/// 创建数据格式错误的helper函数
#[inline]
pub fn data_format_error<E: fmt::Display>(context: &str, err: E) -> ReportError {
    ReportError::DataFormatError(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================

/// 错误类别枚举（用于选择提示信息和退出码）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ErrorCategory {
    /// 命令行选项取值错误
    Options,
    /// 数据相关错误（格式损坏、发布组不存在）
    Data,
    /// I/O相关错误（文件不存在、权限不足等）
    Io,
}

impl ErrorCategory {
    /// 从ReportError提取错误类别
    pub fn from_report_error(e: &ReportError) -> Self {
        match e {
            ReportError::InvalidRangeFormat(_)
            | ReportError::UnknownCodec(_)
            | ReportError::InvalidOrderOption(_)
            | ReportError::InvalidInput(_) => Self::Options,
            ReportError::UnknownSource(_) | ReportError::DataFormatError(_) => Self::Data,
            ReportError::IoError(_) => Self::Io,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Options => "选项错误 / Option error",
            Self::Data => "数据错误 / Data error",
            Self::Io => "I/O错误 / I/O error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_errors_are_classified_as_options() {
        for err in [
            ReportError::InvalidRangeFormat("5".into()),
            ReportError::UnknownCodec("vp9".into()),
            ReportError::InvalidOrderOption("x".into()),
        ] {
            assert_eq!(ErrorCategory::from_report_error(&err), ErrorCategory::Options);
        }
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err: ReportError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert_eq!(ErrorCategory::from_report_error(&err), ErrorCategory::Io);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(
            ErrorCategory::from_report_error(&err).display_name(),
            "I/O错误 / I/O error"
        );
    }

    #[test]
    fn test_display_mentions_offending_value() {
        let err = ReportError::UnknownSource("DON".into());
        assert!(err.to_string().contains("DON"));
    }
}
