//! 发布组排序

use super::aggregate::SourceGroup;
use crate::error::ReportError;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// 排序方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// `e`：聚合效率降序
    #[default]
    Efficiency,
    /// `r`：发布数量降序
    Releases,
    /// `a`：发布组名称升序（大小写不敏感）
    Alphabetical,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Efficiency => "efficiency",
            SortOrder::Releases => "releases",
            SortOrder::Alphabetical => "alphabetical",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "e" | "efficiency" => Ok(SortOrder::Efficiency),
            "r" | "releases" => Ok(SortOrder::Releases),
            "a" | "alpha" | "alphabetical" => Ok(SortOrder::Alphabetical),
            _ => Err(ReportError::InvalidOrderOption(s.to_string())),
        }
    }
}

/// 名称比较：先大小写不敏感，再按原始字节保证全序
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// 按指定方式排序，同值时按名称升序
pub fn sort_groups(groups: &mut [SourceGroup<'_>], order: SortOrder) {
    groups.sort_by(|a, b| {
        let primary = match order {
            SortOrder::Efficiency => b.efficiency.total_cmp(&a.efficiency),
            SortOrder::Releases => b.release_count.cmp(&a.release_count),
            SortOrder::Alphabetical => Ordering::Equal,
        };
        primary.then_with(|| compare_names(&a.source, &b.source))
    });
}
