//! 报告生成模块
//!
//! 完整管线：过滤 → 分组聚合 → 最低发布数过滤 → 排序或分级 → 渲染。

pub mod aggregate;
pub mod filter;
pub mod render;
pub mod sort;
pub mod tier;

pub use aggregate::{AggregatePolicy, SourceGroup, apply_lower_bound, group_by_source};
pub use filter::{EfficiencyRange, FilterOptions, apply_filters};
pub use render::{
    RankingExport, render_report, render_source_detail, render_table, render_tiers,
};
pub use sort::{SortOrder, sort_groups};
pub use tier::{TierOptions, TierPlacement, TierReport, TierStats, assign_tiers};

use crate::dataset::ReleaseRecord;
use crate::error::{ReportError, ReportResult};
use sort::compare_names;

/// 一次报告运行的全部参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRequest {
    pub filter: FilterOptions,
    /// 最低发布数量（`None` 表示不限制）
    pub lower: Option<usize>,
    pub order: SortOrder,
    pub policy: AggregatePolicy,
    /// 目标效率分级（设置后取代普通排名）
    pub tiering: Option<TierOptions>,
}

/// 报告结果
#[derive(Debug, Clone, PartialEq)]
pub enum Report<'a> {
    /// 排好序的发布组排名
    Ranking(Vec<SourceGroup<'a>>),
    /// `-S` 指定的单个发布组详情
    Detail(SourceGroup<'a>),
    /// 按目标效率分级的发布组
    Tiers(TierReport<'a>),
}

impl<'a> Report<'a> {
    /// 报告中展示的发布组（详情模式下只有一个）
    pub fn groups(&self) -> &[SourceGroup<'a>] {
        match self {
            Report::Ranking(groups) => groups,
            Report::Detail(group) => std::slice::from_ref(group),
            Report::Tiers(tiers) => &tiers.groups,
        }
    }
}

/// 执行完整的报告管线
pub fn build_report<'a>(
    records: &'a [ReleaseRecord],
    request: &ReportRequest,
) -> ReportResult<Report<'a>> {
    let filtered = apply_filters(records, &request.filter);

    if let Some(source) = &request.filter.source {
        return source_detail(source, filtered, request).map(Report::Detail);
    }

    let mut groups = group_by_source(&filtered, request.policy);
    apply_lower_bound(&mut groups, request.lower);

    match &request.tiering {
        Some(options) => {
            options.validate()?;
            Ok(Report::Tiers(assign_tiers(groups, options)))
        }
        None => {
            sort_groups(&mut groups, request.order);
            Ok(Report::Ranking(groups))
        }
    }
}

/// 构建 `-S` 详情组
///
/// 过滤后的记录都属于大小写不敏感匹配的发布组。不同大小写的拼写合并为一个组，
/// 名称优先取与 `-S` 完全一致的拼写，否则取名称排序最靠前的拼写。
fn source_detail<'a>(
    source: &str,
    members: Vec<&'a ReleaseRecord>,
    request: &ReportRequest,
) -> ReportResult<SourceGroup<'a>> {
    let name = members
        .iter()
        .map(|r| r.source.as_str())
        .find(|name| *name == source)
        .or_else(|| {
            members
                .iter()
                .map(|r| r.source.as_str())
                .min_by(|a, b| compare_names(a, b))
        })
        .ok_or_else(|| ReportError::UnknownSource(source.to_string()))?
        .to_string();

    if request.lower.is_some_and(|min| members.len() < min) {
        return Err(ReportError::UnknownSource(source.to_string()));
    }

    Ok(SourceGroup {
        source: name,
        release_count: members.len(),
        efficiency: request.policy.aggregate(&members),
        records: members,
    })
}
