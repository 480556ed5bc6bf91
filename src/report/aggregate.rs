//! 按发布组聚合
//!
//! 将过滤后的记录按发布组分组，计算发布数量和聚合效率，并按最低发布数量过滤。

use crate::dataset::ReleaseRecord;
use crate::error::ReportError;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 聚合效率计算策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregatePolicy {
    /// 算术平均
    #[default]
    Mean,
    /// 以 `size_gb` 为权重的加权平均
    ///
    /// 只有带正体积的记录参与加权；组内没有任何体积信息时退化为算术平均。
    Weighted,
    /// 中位数
    Median,
}

impl AggregatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregatePolicy::Mean => "mean",
            AggregatePolicy::Weighted => "weighted",
            AggregatePolicy::Median => "median",
        }
    }

    /// 计算一组记录的聚合效率；空集合返回0
    pub fn aggregate(&self, records: &[&ReleaseRecord]) -> f64 {
        if records.is_empty() {
            return 0.0;
        }

        match self {
            AggregatePolicy::Mean => mean(records),
            AggregatePolicy::Weighted => {
                let (weighted_sum, total_weight) = records
                    .iter()
                    .filter_map(|r| record_weight(r).map(|w| (r.efficiency, w)))
                    .fold((0.0, 0.0), |(sum, weight), (value, w)| {
                        (sum + value * w, weight + w)
                    });
                if total_weight > 0.0 {
                    weighted_sum / total_weight
                } else {
                    mean(records)
                }
            }
            AggregatePolicy::Median => {
                let mut values: Vec<f64> = records.iter().map(|r| r.efficiency).collect();
                values.sort_by(f64::total_cmp);
                let mid = values.len() / 2;
                if values.len() % 2 == 0 {
                    (values[mid - 1] + values[mid]) / 2.0
                } else {
                    values[mid]
                }
            }
        }
    }
}

#[inline]
fn mean(records: &[&ReleaseRecord]) -> f64 {
    records.iter().map(|r| r.efficiency).sum::<f64>() / records.len() as f64
}

/// 记录的加权权重（GB）；无体积或体积非正时不参与加权
#[inline]
fn record_weight(record: &ReleaseRecord) -> Option<f64> {
    record.size_gb.filter(|&size| size > 0.0)
}

impl fmt::Display for AggregatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregatePolicy {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" | "avg" => Ok(AggregatePolicy::Mean),
            "weighted" | "weighted-mean" => Ok(AggregatePolicy::Weighted),
            "median" => Ok(AggregatePolicy::Median),
            _ => Err(ReportError::InvalidInput(format!(
                "未知聚合策略 / unknown aggregate policy '{s}' (expected mean, weighted or median)"
            ))),
        }
    }
}

/// 发布组聚合结果（每次运行重新计算，不持久化）
#[derive(Debug, Clone, PartialEq)]
pub struct SourceGroup<'a> {
    pub source: String,
    pub release_count: usize,
    pub efficiency: f64,
    /// 组内记录（保持加载顺序）
    pub records: Vec<&'a ReleaseRecord>,
}

/// 按发布组分组并计算聚合值，返回顺序不确定
pub fn group_by_source<'a>(
    records: &[&'a ReleaseRecord],
    policy: AggregatePolicy,
) -> Vec<SourceGroup<'a>> {
    let mut buckets: HashMap<&str, Vec<&'a ReleaseRecord>> = HashMap::new();
    for &record in records {
        buckets.entry(record.source.as_str()).or_default().push(record);
    }

    buckets
        .into_iter()
        .map(|(source, members)| SourceGroup {
            source: source.to_string(),
            release_count: members.len(),
            efficiency: policy.aggregate(&members),
            records: members,
        })
        .collect()
}

/// 丢弃发布数量低于下限的组
pub fn apply_lower_bound(groups: &mut Vec<SourceGroup<'_>>, lower: Option<usize>) {
    if let Some(min_releases) = lower {
        groups.retain(|g| g.release_count >= min_releases);
    }
}
