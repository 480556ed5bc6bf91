//! 输出格式化模块
//!
//! 负责排名表格、单个发布组详情块、汇总统计和JSON导出的格式化。

use super::aggregate::SourceGroup;
use super::sort::compare_names;
use super::tier::TierReport;
use super::{Report, ReportRequest};
use crate::error::{ReportResult, data_format_error};
use crate::tools::constants::export;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// 创建统一样式的固定宽度表格
fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    // 列宽由内容决定，不随终端宽度变化
    table.set_content_arrangement(ContentArrangement::Disabled);
    table.set_header(header);
    table
}

#[inline]
fn right(text: impl ToString) -> Cell {
    Cell::new(text.to_string()).set_alignment(CellAlignment::Right)
}

/// 格式化排名表格（排名、发布组、发布数、效率）
pub fn render_table(groups: &[SourceGroup<'_>]) -> String {
    let mut table = new_table(vec!["#", "Source", "Releases", "Efficiency"]);

    for (index, group) in groups.iter().enumerate() {
        table.add_row(vec![
            right(index + 1),
            Cell::new(&group.source),
            right(group.release_count),
            right(format!("{:.2}", group.efficiency)),
        ]);
    }

    table.to_string()
}

/// 汇总统计（总组数、总发布数、组效率均值、最高效率组、最大组）
pub fn render_summary(groups: &[SourceGroup<'_>]) -> String {
    let mut output = String::new();
    let total_releases: usize = groups.iter().map(|g| g.release_count).sum();

    output.push_str(&format!("Total groups:       {}\n", groups.len()));
    output.push_str(&format!("Total releases:     {total_releases}\n"));

    if !groups.is_empty() {
        let overall = groups.iter().map(|g| g.efficiency).sum::<f64>() / groups.len() as f64;
        output.push_str(&format!("Overall efficiency: {overall:.2}\n"));
    }

    // 与排序无关：按值选取，同值取名称靠前者
    let most_efficient = groups.iter().min_by(|a, b| {
        b.efficiency
            .total_cmp(&a.efficiency)
            .then_with(|| a.source.cmp(&b.source))
    });
    if let Some(group) = most_efficient {
        output.push_str(&format!(
            "Most efficient:     {} ({:.2})\n",
            group.source, group.efficiency
        ));
    }

    let largest = groups.iter().min_by(|a, b| {
        b.release_count
            .cmp(&a.release_count)
            .then_with(|| a.source.cmp(&b.source))
    });
    if let Some(group) = largest {
        output.push_str(&format!(
            "Largest group:      {} ({} releases)\n",
            group.source, group.release_count
        ));
    }

    output
}

/// 格式化单个发布组的详情块，记录按效率降序
pub fn render_source_detail(group: &SourceGroup<'_>, request: &ReportRequest) -> String {
    let mut output = String::new();

    let title = format!("Source: {}", group.source);
    output.push_str(&title);
    output.push('\n');
    output.push_str(&"=".repeat(title.width()));
    output.push('\n');

    let mut records = group.records.clone();
    records.sort_by(|a, b| b.efficiency.total_cmp(&a.efficiency));

    let show_titles = records.iter().any(|r| r.title.is_some());
    let mut header = vec!["Codec", "HDR", "Efficiency"];
    if show_titles {
        header.push("Title");
    }
    let mut table = new_table(header);

    for record in records {
        let mut row = vec![
            Cell::new(record.codec),
            Cell::new(if record.hdr { "yes" } else { "no" }),
            right(format!("{:.2}", record.efficiency)),
        ];
        if show_titles {
            row.push(Cell::new(record.title.as_deref().unwrap_or("-")));
        }
        table.add_row(row);
    }

    output.push_str(&table.to_string());
    output.push('\n');

    let mut spellings: Vec<&str> = group.records.iter().map(|r| r.source.as_str()).collect();
    spellings.sort_by(|a, b| compare_names(a, b));
    spellings.dedup();
    if spellings.len() > 1 {
        output.push_str(&format!("Spellings:  {}\n", spellings.join(", ")));
    }

    output.push_str(&format!("Releases:   {}\n", group.release_count));
    output.push_str(&format!(
        "Efficiency: {:.2} ({})\n",
        group.efficiency, request.policy
    ));

    output
}

/// 格式化分级报告：每个层级一张表格，附层级统计
pub fn render_tiers(tiers: &TierReport<'_>) -> String {
    let mut output = format!(
        "Tiered ranking (target: {:.2}, tiers: {}, groups: {})\n",
        tiers.target,
        tiers.tier_count,
        tiers.groups.len()
    );
    if !tiers.boundaries.is_empty() {
        let boundaries: Vec<String> = tiers.boundaries.iter().map(|b| format!("{b:.2}")).collect();
        output.push_str(&format!("Boundaries: {}\n", boundaries.join(", ")));
    }

    for stats in tiers.stats() {
        output.push_str(&format!("\nTier {}\n", stats.tier));
        output.push_str(&format!(
            "Groups: {} | Releases: {} | Avg score: {:.2} | Avg efficiency: {:.2} | Avg std dev: {:.2}\n",
            stats.groups,
            stats.total_releases,
            stats.avg_score,
            stats.avg_efficiency,
            stats.avg_std_dev
        ));

        let mut table = new_table(vec![
            "Source",
            "Score",
            "Efficiency",
            "Delta",
            "Std Dev",
            "Releases",
        ]);
        for (group, placement) in tiers.tier(stats.tier) {
            table.add_row(vec![
                Cell::new(&group.source),
                right(format!("{:.2}", placement.score)),
                right(format!("{:.2}", group.efficiency)),
                right(format!("{:.2}", placement.delta)),
                right(format!("{:.2}", placement.std_dev)),
                right(group.release_count),
            ]);
        }
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output
}

/// 根据报告类型选择渲染方式
pub fn render_report(report: &Report<'_>, request: &ReportRequest) -> String {
    match report {
        Report::Detail(group) => render_source_detail(group, request),
        Report::Ranking(groups) if groups.is_empty() => no_groups_notice(),
        Report::Tiers(tiers) if tiers.groups.is_empty() => no_groups_notice(),
        Report::Tiers(tiers) => render_tiers(tiers),
        Report::Ranking(groups) => {
            let mut output = format!(
                "Release group ranking (order: {}, aggregate: {})\n",
                request.order, request.policy
            );
            output.push_str(&render_table(groups));
            output.push_str("\n\n");
            output.push_str(&render_summary(groups));
            output
        }
    }
}

fn no_groups_notice() -> String {
    "没有符合条件的发布组 / No source groups match the given filters.\n".to_string()
}

/// 排名导出条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub source: String,
    pub releases: usize,
    pub efficiency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl RankingEntry {
    fn new(rank: usize, group: &SourceGroup<'_>) -> Self {
        Self {
            rank,
            source: group.source.clone(),
            releases: group.release_count,
            efficiency: round_to(group.efficiency, export::EFFICIENCY_DECIMALS),
            tier: None,
            score: None,
        }
    }
}

/// 排名JSON导出文档
#[derive(Debug, Clone, Serialize)]
pub struct RankingExport {
    pub generated_at: String,
    pub policy: String,
    pub order: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    pub ranking: Vec<RankingEntry>,
}

impl RankingExport {
    pub fn new(report: &Report<'_>, request: &ReportRequest) -> Self {
        let (ranking, order, target) = match report {
            Report::Tiers(tiers) => {
                let ranking = tiers
                    .entries()
                    .enumerate()
                    .map(|(index, (group, placement))| RankingEntry {
                        tier: Some(placement.tier),
                        score: Some(placement.score),
                        ..RankingEntry::new(index + 1, group)
                    })
                    .collect();
                (ranking, "tier".to_string(), Some(tiers.target))
            }
            _ => {
                let ranking = report
                    .groups()
                    .iter()
                    .enumerate()
                    .map(|(index, group)| RankingEntry::new(index + 1, group))
                    .collect();
                (ranking, request.order.to_string(), None)
            }
        };

        Self {
            generated_at: chrono::Local::now()
                .format(export::TIMESTAMP_FORMAT)
                .to_string(),
            policy: request.policy.to_string(),
            order,
            target,
            ranking,
        }
    }

    pub fn to_json_pretty(&self) -> ReportResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| data_format_error("JSON导出 / JSON export", e))
    }
}

#[inline]
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Codec, ReleaseRecord};

    #[test]
    fn test_detail_lists_every_record() {
        let records = vec![
            ReleaseRecord::new("DON", Codec::H264, false, 41.0).with_title("Movie.2019.1080p"),
            ReleaseRecord::new("DON", Codec::H265, true, 63.25),
        ];
        let group = SourceGroup {
            source: "DON".to_string(),
            release_count: 2,
            efficiency: 52.125,
            records: records.iter().collect(),
        };
        let output = render_source_detail(&group, &ReportRequest::default());

        assert!(output.starts_with("Source: DON\n==========="));
        assert!(output.contains("h264") && output.contains("h265"));
        assert!(output.contains("63.25"));
        assert!(output.contains("Movie.2019.1080p"));
        // 效率降序
        assert!(output.find("63.25").unwrap() < output.find("41.00").unwrap());
    }

    #[test]
    fn test_detail_lists_case_variants() {
        let records = vec![
            ReleaseRecord::new("DON", Codec::H264, false, 60.0),
            ReleaseRecord::new("don", Codec::H264, false, 40.0),
        ];
        let group = SourceGroup {
            source: "don".to_string(),
            release_count: 2,
            efficiency: 50.0,
            records: records.iter().collect(),
        };
        let output = render_source_detail(&group, &ReportRequest::default());
        assert!(output.contains("Spellings:  DON, don"));
        assert!(output.contains("Releases:   2"));
    }

    #[test]
    fn test_tiers_render_one_table_per_tier() {
        let mut records: Vec<ReleaseRecord> = (0..16)
            .map(|_| ReleaseRecord::new("BIG", Codec::H265, false, 55.0))
            .collect();
        records.extend((0..6).map(|_| ReleaseRecord::new("FAR", Codec::H265, false, 80.0)));
        let request = ReportRequest {
            tiering: Some(crate::report::TierOptions::new(55.0).with_tiers(2)),
            ..Default::default()
        };
        let report = crate::report::build_report(&records, &request).unwrap();
        let output = render_report(&report, &request);

        assert!(output.starts_with("Tiered ranking (target: 55.00, tiers: 2, groups: 2)"));
        assert!(output.find("Tier 1").unwrap() < output.find("BIG").unwrap());
        assert!(output.find("Tier 2").unwrap() < output.find("FAR").unwrap());
        assert_eq!(output.matches("Score").count(), 2);

        let export = RankingExport::new(&report, &request);
        assert_eq!(export.order, "tier");
        assert_eq!(export.target, Some(55.0));
        assert_eq!(export.ranking[0].tier, Some(1));
        assert_eq!(export.ranking[1].tier, Some(2));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(52.125_1, 2), 52.13);
        assert_eq!(round_to(70.0, 2), 70.0);
    }
}
