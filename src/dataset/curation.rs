//! 发布组名称整理
//!
//! 加载时对发布组名称做别名归一化，并剔除黑名单中的发布组。
//! 别名和黑名单都按大小写不敏感匹配。

use super::loader::RecordLoader;
use super::record::ReleaseRecord;
use crate::error::{ReportError, ReportResult, data_format_error};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// 名称整理配置文件格式
///
/// ```json
/// { "aliases": { "beyondhd": "W4NK3R" }, "blacklist": ["HONE"] }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CurationFile {
    aliases: HashMap<String, String>,
    blacklist: Vec<String>,
}

/// 别名表和黑名单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupCuration {
    /// 小写别名 -> 规范名称
    aliases: HashMap<String, String>,
    /// 小写规范名称
    blacklist: HashSet<String>,
}

impl GroupCuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从JSON配置文件读取
    pub fn from_file(path: &Path) -> ReportResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: CurationFile = serde_json::from_str(&content)
            .map_err(|e| data_format_error(&path.display().to_string(), e))?;

        let mut curation = Self::new();
        for (from, to) in &file.aliases {
            curation.add_alias(from, to)?;
        }
        for name in &file.blacklist {
            curation.exclude(name);
        }
        Ok(curation)
    }

    /// 解析 `FROM=TO` 形式的别名参数
    pub fn parse_alias(spec: &str) -> ReportResult<(String, String)> {
        match spec.split_once('=') {
            Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
                Ok((from.trim().to_string(), to.trim().to_string()))
            }
            _ => Err(ReportError::InvalidInput(format!(
                "别名格式应为 FROM=TO / alias must look like FROM=TO: '{spec}'"
            ))),
        }
    }

    pub fn add_alias(&mut self, from: &str, to: &str) -> ReportResult<()> {
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            return Err(ReportError::InvalidInput(format!(
                "别名两侧不能为空 / alias sides must not be empty: '{from}={to}'"
            )));
        }
        self.aliases.insert(from.to_lowercase(), to.to_string());
        Ok(())
    }

    pub fn exclude(&mut self, name: &str) {
        self.blacklist.insert(name.trim().to_lowercase());
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.blacklist.is_empty()
    }

    /// 别名归一化后的发布组名称；没有别名时原样返回
    pub fn canonical_name(&self, name: &str) -> String {
        self.aliases
            .get(&name.trim().to_lowercase())
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// 归一化后的名称是否在黑名单中
    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.blacklist
            .contains(&self.canonical_name(name).to_lowercase())
    }

    /// 归一化名称并剔除黑名单记录
    pub fn apply(&self, records: Vec<ReleaseRecord>) -> Vec<ReleaseRecord> {
        if self.is_empty() {
            return records;
        }

        records
            .into_iter()
            .filter_map(|mut record| {
                let canonical = self.canonical_name(&record.source);
                if self.blacklist.contains(&canonical.to_lowercase()) {
                    return None;
                }
                record.source = canonical;
                Some(record)
            })
            .collect()
    }
}

/// 在任意加载器之上应用名称整理
#[derive(Debug, Clone)]
pub struct CuratedLoader<L> {
    inner: L,
    curation: GroupCuration,
}

impl<L: RecordLoader> CuratedLoader<L> {
    pub fn new(inner: L, curation: GroupCuration) -> Self {
        Self { inner, curation }
    }
}

impl<L: RecordLoader> RecordLoader for CuratedLoader<L> {
    fn load(&self) -> ReportResult<Vec<ReleaseRecord>> {
        Ok(self.curation.apply(self.inner.load()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Codec, InMemoryLoader};

    fn curation() -> GroupCuration {
        let mut curation = GroupCuration::new();
        curation.add_alias("beyondhd", "W4NK3R").unwrap();
        curation.add_alias("terminal", "TERMiNAL").unwrap();
        curation.exclude("HONE");
        curation
    }

    #[test]
    fn test_alias_is_case_insensitive() {
        let curation = curation();
        assert_eq!(curation.canonical_name("BeyondHD"), "W4NK3R");
        assert_eq!(curation.canonical_name("terminal"), "TERMiNAL");
        assert_eq!(curation.canonical_name("DON"), "DON");
    }

    #[test]
    fn test_loader_renames_and_drops() {
        let loader = CuratedLoader::new(
            InMemoryLoader::new(vec![
                ReleaseRecord::new("BeyondHD", Codec::H265, false, 50.0),
                ReleaseRecord::new("hone", Codec::H265, false, 20.0),
                ReleaseRecord::new("DON", Codec::H264, false, 60.0),
            ]),
            curation(),
        );
        let records = loader.load().unwrap();
        let sources: Vec<&str> = records.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, ["W4NK3R", "DON"]);
    }

    #[test]
    fn test_blacklist_applies_after_alias() {
        let mut curation = curation();
        curation.exclude("w4nk3r");
        assert!(curation.is_blacklisted("beyondhd"));
        assert!(!curation.is_blacklisted("DON"));
    }

    #[test]
    fn test_parse_alias() {
        assert_eq!(
            GroupCuration::parse_alias("10bit-hds = HDS").unwrap(),
            ("10bit-hds".to_string(), "HDS".to_string())
        );
        for bad in ["HDS", "=HDS", "hds="] {
            assert!(matches!(
                GroupCuration::parse_alias(bad),
                Err(ReportError::InvalidInput(_))
            ));
        }
    }
}
