//! 过滤管线
//!
//! 按效率区间、编码格式、HDR和发布组依次过滤记录，无副作用。

use crate::dataset::{Codec, ReleaseRecord};
use crate::error::ReportError;
use std::str::FromStr;

/// 效率闭区间 `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EfficiencyRange {
    pub min: f64,
    pub max: f64,
}

impl EfficiencyRange {
    #[inline]
    pub fn contains(&self, efficiency: f64) -> bool {
        efficiency >= self.min && efficiency <= self.max
    }
}

impl FromStr for EfficiencyRange {
    type Err = ReportError;

    /// 解析 `x:y` 形式的区间
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReportError::InvalidRangeFormat(s.to_string());

        let (min, max) = s.split_once(':').ok_or_else(invalid)?;
        let min: f64 = min.trim().parse().map_err(|_| invalid())?;
        let max: f64 = max.trim().parse().map_err(|_| invalid())?;

        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(invalid());
        }

        Ok(Self { min, max })
    }
}

/// 过滤条件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub range: Option<EfficiencyRange>,
    pub codec: Option<Codec>,
    /// 是否包含HDR记录（未设置时排除所有HDR记录）
    pub include_hdr: bool,
    /// 只保留该发布组（大小写不敏感）
    pub source: Option<String>,
}

impl FilterOptions {
    /// 判断单条记录是否通过所有过滤条件
    pub fn matches(&self, record: &ReleaseRecord) -> bool {
        if let Some(range) = &self.range
            && !range.contains(record.efficiency)
        {
            return false;
        }
        if let Some(codec) = self.codec
            && record.codec != codec
        {
            return false;
        }
        if record.hdr && !self.include_hdr {
            return false;
        }
        if let Some(source) = &self.source
            && !record.source.eq_ignore_ascii_case(source)
        {
            return false;
        }
        true
    }
}

/// 应用过滤管线，返回通过的记录引用
pub fn apply_filters<'a>(
    records: &'a [ReleaseRecord],
    options: &FilterOptions,
) -> Vec<&'a ReleaseRecord> {
    records.iter().filter(|r| options.matches(r)).collect()
}
