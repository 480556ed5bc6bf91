//! Release Ranker - 主程序入口
//!
//! 纯流程控制器，负责协调加载、报告管线和输出模块。

use release_efficiency_ranker::{
    CuratedLoader, JsonLoader, RecordLoader, build_report,
    error::{ErrorCategory, ReportError},
    render_report,
    tools::{self, constants::exit_codes},
};
use std::process;

/// 获取错误建议文本
fn get_error_suggestion(error: &ReportError) -> &'static str {
    match error {
        ReportError::InvalidRangeFormat(_) => {
            "区间格式为 MIN:MAX，例如 -R 40:60 / Range must look like MIN:MAX, e.g. -R 40:60"
        }
        ReportError::UnknownCodec(_) => {
            "支持的编码: h264, h265, av1 / Supported codecs: h264, h265, av1"
        }
        ReportError::InvalidOrderOption(_) => {
            "排序方式: e (效率), r (发布数), a (名称) / Order: e (efficiency), r (releases), a (alphabetical)"
        }
        ReportError::UnknownSource(_) => {
            "检查发布组名称，或放宽过滤条件 (-H, -R, -C, -L) / Check the source name or relax the filters (-H, -R, -C, -L)"
        }
        _ => match ErrorCategory::from_report_error(error) {
            ErrorCategory::Options => {
                "检查命令行参数是否正确，使用 --help 查看完整用法 / Check command-line arguments, use --help for usage"
            }
            ErrorCategory::Data => {
                "确保数据文件为有效的发布记录JSON / Ensure the data file is valid release-record JSON"
            }
            ErrorCategory::Io => {
                "检查数据路径是否存在且可读 / Check that the data path exists and is readable"
            }
        },
    }
}

/// 错误处理和建议
fn handle_error(error: ReportError) -> ! {
    let category = ErrorCategory::from_report_error(&error);
    eprintln!("[ERROR] {}: {error}", category.display_name());
    if let Some(source) = std::error::Error::source(&error) {
        eprintln!("[ERROR] 原因 / Cause: {source}");
    }
    eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(&error));

    let exit_code = match &error {
        ReportError::UnknownSource(_) => exit_codes::UNKNOWN_SOURCE,
        _ => match category {
            ErrorCategory::Options => exit_codes::OPTION_ERROR,
            ErrorCategory::Data => exit_codes::DATA_ERROR,
            ErrorCategory::Io => exit_codes::GENERAL_ERROR,
        },
    };

    process::exit(exit_code);
}

/// 应用程序主逻辑
fn run() -> Result<(), ReportError> {
    // 1. 解析命令行参数（选项取值错误在加载数据前就失败）
    let config = tools::parse_args()?;
    tools::show_startup_info(&config);

    // 2. 加载数据集
    let loader = JsonLoader::new(&config.data_path).verbose(config.verbose);
    let records = CuratedLoader::new(loader, config.curation.clone()).load()?;
    if config.verbose {
        eprintln!("[INFO] 共加载 / Loaded {} records", records.len());
    }

    // 3. 过滤、聚合、排序
    let report = build_report(&records, &config.request)?;

    // 4. 渲染并输出
    let rendered = render_report(&report, &config.request);
    tools::write_output(&report, &rendered, &config)
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
