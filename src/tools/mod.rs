//! 工具模块集合
//!
//! 包含CLI、常量、输出写入等工具模块，支持main.rs的流程控制。

pub mod cli;
pub mod constants;
pub mod output;

// 重新导出主要的公共接口
pub use cli::{AppConfig, build_command, parse_args, parse_args_from, show_startup_info};
pub use output::{write_export, write_output};
