//! 数据集加载模块
//!
//! 数据来源通过 [`RecordLoader`] trait 抽象，默认实现读取JSON文件或目录。

use super::record::ReleaseRecord;
use crate::error::{ReportError, ReportResult, data_format_error};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 数据集文件扩展名
const DATA_EXTENSION: &str = "json";

/// 发布记录加载器
pub trait RecordLoader {
    /// 加载全部发布记录
    fn load(&self) -> ReportResult<Vec<ReleaseRecord>>;
}

/// 内存数据源（测试和嵌入使用）
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    records: Vec<ReleaseRecord>,
}

impl InMemoryLoader {
    pub fn new(records: Vec<ReleaseRecord>) -> Self {
        Self { records }
    }
}

impl RecordLoader for InMemoryLoader {
    fn load(&self) -> ReportResult<Vec<ReleaseRecord>> {
        self.records.iter().try_for_each(ReleaseRecord::validate)?;
        Ok(self.records.clone())
    }
}

/// 顶层JSON文档：记录数组或带 `records` 字段的对象
#[derive(Deserialize)]
#[serde(untagged)]
enum DataDocument {
    List(Vec<ReleaseRecord>),
    Wrapped { records: Vec<ReleaseRecord> },
}

impl DataDocument {
    fn into_records(self) -> Vec<ReleaseRecord> {
        match self {
            DataDocument::List(records) | DataDocument::Wrapped { records } => records,
        }
    }
}

/// JSON数据加载器
///
/// 路径为文件时直接解析；为目录时读取其中所有 `.json` 文件（不递归子目录，按文件名排序）。
#[derive(Debug, Clone)]
pub struct JsonLoader {
    path: PathBuf,
    verbose: bool,
}

impl JsonLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            verbose: false,
        }
    }

    /// 启用详细诊断输出（写到stderr）
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 扫描目录中的数据文件
    pub fn scan_data_files(&self) -> ReportResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| match e.into_io_error() {
                Some(io_err) => ReportError::IoError(io_err),
                None => ReportError::InvalidInput(format!(
                    "无法遍历目录 / cannot walk directory: {}",
                    self.path.display()
                )),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            let is_data_file = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(DATA_EXTENSION));

            if is_data_file {
                files.push(path);
            } else if self.verbose {
                eprintln!("[WARNING] 跳过非数据文件 / Skipping non-data file: {}", path.display());
            }
        }

        Ok(files)
    }

    fn load_file(&self, path: &Path) -> ReportResult<Vec<ReleaseRecord>> {
        let content = std::fs::read_to_string(path)?;
        let document: DataDocument = serde_json::from_str(&content)
            .map_err(|e| data_format_error(&path.display().to_string(), e))?;
        let records = document.into_records();

        for record in &records {
            record
                .validate()
                .map_err(|e| data_format_error(&path.display().to_string(), e))?;
        }

        if self.verbose {
            eprintln!(
                "[INFO] 已加载 / Loaded {} records from {}",
                records.len(),
                path.display()
            );
        }

        Ok(records)
    }
}

impl RecordLoader for JsonLoader {
    fn load(&self) -> ReportResult<Vec<ReleaseRecord>> {
        if !self.path.exists() {
            return Err(ReportError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("数据路径不存在 / data path not found: {}", self.path.display()),
            )));
        }

        if self.path.is_file() {
            return self.load_file(&self.path);
        }

        let files = self.scan_data_files()?;
        if files.is_empty() && self.verbose {
            eprintln!(
                "[WARNING] 目录中没有JSON数据文件 / No JSON data files in {}",
                self.path.display()
            );
        }

        let mut records = Vec::new();
        for file in &files {
            records.extend(self.load_file(file)?);
        }
        Ok(records)
    }
}
