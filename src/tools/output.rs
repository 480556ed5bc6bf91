//! 输出写入模块
//!
//! 报告始终写到标准输出；指定 `-o` 时额外写出JSON排名文件。

use super::cli::AppConfig;
use crate::error::ReportResult;
use crate::report::{RankingExport, Report};
use std::io::Write;
use std::path::Path;

/// 将渲染好的报告写到标准输出
fn write_report(output: &str) -> ReportResult<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(output.as_bytes())?;
    handle.flush()?;
    Ok(())
}

/// 将排名写成JSON文件
pub fn write_export(export: &RankingExport, path: &Path) -> ReportResult<()> {
    let mut json = export.to_json_pretty()?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}

/// 处理输出：报告写到控制台，按需导出JSON
pub fn write_output(report: &Report<'_>, rendered: &str, config: &AppConfig) -> ReportResult<()> {
    write_report(rendered)?;

    if let Some(output_path) = &config.output_path {
        let export = RankingExport::new(report, &config.request);
        write_export(&export, output_path)?;
        if config.verbose {
            eprintln!("[INFO] 排名已导出到 / Ranking exported to: {}", output_path.display());
        }
    }

    Ok(())
}
