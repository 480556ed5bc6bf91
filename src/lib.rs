//! Release Efficiency Ranker
//!
//! 读取发布组编码记录数据集，按用户给定的条件过滤、按发布组聚合效率并排序，
//! 输出排名表格或单个发布组的详细记录。
//!
//! ## 处理流程
//! - 加载：通过 [`RecordLoader`] 读取发布记录（默认JSON文件/目录），可选别名归一化和黑名单
//! - 过滤：效率区间、编码格式、HDR、发布组
//! - 聚合：按发布组计算发布数量和聚合效率（平均/加权平均/中位数）
//! - 排序：效率降序、发布数降序或名称升序，同值按名称升序
//! - 分级：指定目标效率时按分数划分层级
//! - 渲染：固定宽度表格、详情块、JSON导出

pub mod dataset;
pub mod error;
pub mod report;
pub mod tools;

// 重新导出核心类型
pub use dataset::{
    Codec, CuratedLoader, GroupCuration, InMemoryLoader, JsonLoader, RecordLoader, ReleaseRecord,
};
pub use error::{ErrorCategory, ReportError, ReportResult};
pub use report::{
    AggregatePolicy, EfficiencyRange, FilterOptions, Report, ReportRequest, SortOrder,
    SourceGroup, TierOptions, TierReport, build_report, render_report,
};
