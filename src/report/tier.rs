//! 目标效率分级
//!
//! 以目标效率为中心给每个发布组打分（0-100），再按分数分位点划分层级。
//! 效率与目标值使用同一单位（百分比），偏差按百分点计算。
//!
//! 评分由四部分组成：
//! - 基础分：偏差越大衰减越快，`70·e^(-3d)`，`d` 为偏差的小数形式
//! - 数量奖励：`min(20, 4·log2(n+1))`
//! - 一致性奖励：组内样本标准差越小越高，`10·e^(-3σ)`（至少两条记录）
//! - 惩罚：发布数过少的置信度惩罚，偏差过大的效率惩罚
//!
//! 最终分数受偏差和发布数双重上限约束。

use super::aggregate::SourceGroup;
use super::sort::compare_names;
use crate::error::{ReportError, ReportResult};

/// 各层级的最低分数要求（第1层到第4层）
const MIN_TIER_SCORES: [f64; 4] = [85.0, 75.0, 65.0, 55.0];

/// 偏差阈值（百分点），超过后分别触发更严格的上限和惩罚
const DELTA_SEVERE: f64 = 12.0;
const DELTA_HIGH: f64 = 8.0;
const DELTA_MODERATE: f64 = 5.0;

/// 分级参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierOptions {
    /// 目标效率（与数据同单位）
    pub target: f64,
    /// 层级数量；`None` 时根据发布组数量自动确定
    pub tiers: Option<usize>,
}

impl TierOptions {
    pub fn new(target: f64) -> Self {
        Self { target, tiers: None }
    }

    pub fn with_tiers(mut self, tiers: usize) -> Self {
        self.tiers = Some(tiers);
        self
    }

    /// 校验目标值和层级数
    pub fn validate(&self) -> ReportResult<()> {
        if !self.target.is_finite() {
            return Err(ReportError::InvalidInput(format!(
                "目标效率必须是有限数值 / target must be a finite number: {}",
                self.target
            )));
        }
        if let Some(tiers) = self.tiers
            && tiers < 2
        {
            return Err(ReportError::InvalidInput(format!(
                "层级数至少为2 / tier count must be at least 2: {tiers}"
            )));
        }
        Ok(())
    }
}

/// 单个发布组的分级结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierPlacement {
    /// 层级（1为最好）
    pub tier: usize,
    pub score: f64,
    /// 与目标的绝对偏差（百分点）
    pub delta: f64,
    /// 组内效率的样本标准差
    pub std_dev: f64,
}

/// 单个层级的统计
#[derive(Debug, Clone, PartialEq)]
pub struct TierStats {
    pub tier: usize,
    pub groups: usize,
    pub total_releases: usize,
    pub avg_score: f64,
    pub avg_efficiency: f64,
    pub avg_std_dev: f64,
}

/// 分级报告
///
/// `groups` 与 `placements` 按下标一一对应，按层级升序、分数降序、名称升序排列。
#[derive(Debug, Clone, PartialEq)]
pub struct TierReport<'a> {
    pub target: f64,
    pub tier_count: usize,
    /// 第1层到第k-1层的分数下界
    pub boundaries: Vec<f64>,
    pub groups: Vec<SourceGroup<'a>>,
    pub placements: Vec<TierPlacement>,
}

impl<'a> TierReport<'a> {
    /// 发布组及其分级结果
    pub fn entries(&self) -> impl Iterator<Item = (&SourceGroup<'a>, &TierPlacement)> {
        self.groups.iter().zip(&self.placements)
    }

    /// 某一层级内的发布组
    pub fn tier(&self, tier: usize) -> impl Iterator<Item = (&SourceGroup<'a>, &TierPlacement)> {
        self.entries().filter(move |(_, p)| p.tier == tier)
    }

    /// 各层级统计；空层级不出现
    pub fn stats(&self) -> Vec<TierStats> {
        (1..=self.tier_count)
            .filter_map(|tier| {
                let members: Vec<_> = self.tier(tier).collect();
                if members.is_empty() {
                    return None;
                }
                let count = members.len() as f64;
                Some(TierStats {
                    tier,
                    groups: members.len(),
                    total_releases: members.iter().map(|(g, _)| g.release_count).sum(),
                    avg_score: members.iter().map(|(_, p)| p.score).sum::<f64>() / count,
                    avg_efficiency: members.iter().map(|(g, _)| g.efficiency).sum::<f64>() / count,
                    avg_std_dev: members.iter().map(|(_, p)| p.std_dev).sum::<f64>() / count,
                })
            })
            .collect()
    }
}

/// 根据发布组数量自动确定层级数
pub fn auto_tier_count(total_groups: usize) -> usize {
    match total_groups {
        0..15 => 3,
        15..30 => 4,
        30..50 => 5,
        _ => 6,
    }
}

/// 样本标准差（n-1）；少于两条记录时为0
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// 计算发布组相对目标效率的分数（0-100，保留两位小数）
pub fn group_score(group: &SourceGroup<'_>, target: f64) -> f64 {
    let efficiencies: Vec<f64> = group.records.iter().map(|r| r.efficiency).collect();
    score_components(
        (group.efficiency - target).abs(),
        group.release_count,
        sample_std_dev(&efficiencies),
    )
}

fn score_components(delta: f64, releases: usize, std_dev: f64) -> f64 {
    let mut cap: f64 = if delta > DELTA_SEVERE {
        45.0
    } else if delta > DELTA_HIGH {
        65.0
    } else if delta > DELTA_MODERATE {
        75.0
    } else {
        100.0
    };
    cap = match releases {
        0..5 => cap.min(65.0),
        5..10 => cap.min(75.0),
        10..15 => cap.min(85.0),
        _ => cap,
    };

    let base = 70.0 * (-3.0 * delta / 100.0).exp();
    let volume = (4.0 * ((releases + 1) as f64).log2()).min(20.0);
    let consistency = if releases > 1 {
        10.0 * (-3.0 * std_dev / 100.0).exp()
    } else {
        0.0
    };

    let confidence_penalty = match releases {
        0..5 => 25.0 - 4.0 * releases as f64,
        5..10 => 10.0,
        _ => 0.0,
    };
    let efficiency_penalty = if delta > DELTA_SEVERE {
        20.0
    } else if delta > DELTA_HIGH {
        15.0
    } else if delta > DELTA_MODERATE {
        10.0
    } else {
        0.0
    };

    let score = (base + volume + consistency - confidence_penalty - efficiency_penalty)
        .min(cap)
        .clamp(0.0, 100.0);
    (score * 100.0).round() / 100.0
}

/// 偏差或发布数量决定的最好可达层级
pub fn tier_cap(delta: f64, releases: usize) -> usize {
    if delta > DELTA_SEVERE || releases < 5 {
        4
    } else if delta > DELTA_HIGH || releases < 10 {
        3
    } else if delta > DELTA_MODERATE || releases < 15 {
        2
    } else {
        1
    }
}

/// 线性插值分位数，`sorted` 必须升序且非空
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (rank - lower as f64)
}

/// 计算第1层到第k-1层的分数下界
///
/// 第i层下界为分数分布的 `100 - i·(100/k)` 分位点，且不低于该层的最低分数要求。
pub fn tier_thresholds(scores: &[f64], tiers: usize) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);

    (1..tiers)
        .map(|tier| {
            let pct = 100.0 - tier as f64 * (100.0 / tiers as f64);
            let value = percentile(&sorted, pct);
            match MIN_TIER_SCORES.get(tier - 1) {
                Some(&min) => value.max(min),
                None => value,
            }
        })
        .collect()
}

/// 为发布组打分并划分层级
pub fn assign_tiers<'a>(groups: Vec<SourceGroup<'a>>, options: &TierOptions) -> TierReport<'a> {
    let tier_count = options
        .tiers
        .unwrap_or_else(|| auto_tier_count(groups.len()));

    let mut placements: Vec<TierPlacement> = groups
        .iter()
        .map(|group| {
            let efficiencies: Vec<f64> = group.records.iter().map(|r| r.efficiency).collect();
            TierPlacement {
                tier: tier_count,
                score: group_score(group, options.target),
                delta: (group.efficiency - options.target).abs(),
                std_dev: sample_std_dev(&efficiencies),
            }
        })
        .collect();

    let scores: Vec<f64> = placements.iter().map(|p| p.score).collect();
    let boundaries = tier_thresholds(&scores, tier_count);

    for (group, placement) in groups.iter().zip(placements.iter_mut()) {
        let by_score = boundaries
            .iter()
            .position(|&boundary| placement.score >= boundary)
            .map_or(tier_count, |index| index + 1);
        // 层级数少于4时上限按最差层级截断
        let cap = tier_cap(placement.delta, group.release_count).min(tier_count);
        placement.tier = by_score.max(cap);
    }

    let mut entries: Vec<(SourceGroup<'a>, TierPlacement)> =
        groups.into_iter().zip(placements).collect();
    entries.sort_by(|(ga, pa), (gb, pb)| {
        pa.tier
            .cmp(&pb.tier)
            .then_with(|| pb.score.total_cmp(&pa.score))
            .then_with(|| compare_names(&ga.source, &gb.source))
    });
    let (groups, placements): (Vec<_>, Vec<_>) = entries.into_iter().unzip();

    TierReport {
        target: options.target,
        tier_count,
        boundaries,
        groups,
        placements,
    }
}
