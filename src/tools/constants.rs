//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 默认配置值
pub mod defaults {
    /// 默认数据路径（存放各影片分析结果的目录）
    pub const DATA_PATH: &str = "output";

    /// 默认排序方式：按聚合效率降序
    pub const ORDER: &str = "e";

    /// 默认聚合策略：算术平均
    pub const AGGREGATE_POLICY: &str = "mean";
}

/// JSON导出相关常量
pub mod export {
    /// 导出时效率值保留的小数位数
    pub const EFFICIENCY_DECIMALS: i32 = 2;

    /// 导出文档中生成时间的格式
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// 进程退出码
pub mod exit_codes {
    /// 通用错误（I/O等）
    pub const GENERAL_ERROR: i32 = 1;
    /// 选项取值错误
    pub const OPTION_ERROR: i32 = 2;
    /// 数据格式错误
    pub const DATA_ERROR: i32 = 3;
    /// 指定的发布组不存在
    pub const UNKNOWN_SOURCE: i32 = 4;
}
