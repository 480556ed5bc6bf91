//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use super::constants::defaults;
use crate::dataset::{Codec, GroupCuration};
use crate::error::{ReportError, ReportResult};
use crate::report::{
    AggregatePolicy, EfficiencyRange, FilterOptions, ReportRequest, SortOrder, TierOptions,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置（一次运行内不可变）
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 数据文件或数据目录
    pub data_path: PathBuf,

    /// 报告参数（过滤、下限、排序、聚合策略、分级）
    pub request: ReportRequest,

    /// 加载时应用的发布组别名和黑名单
    pub curation: GroupCuration,

    /// 排名JSON导出路径（可选）
    pub output_path: Option<PathBuf>,

    /// 是否显示详细信息
    pub verbose: bool,
}

/// 构建命令行定义
pub fn build_command() -> Command {
    Command::new("release-rank")
        .version(VERSION)
        .about(DESCRIPTION)
        .author("Release Ranker Team")
        .arg(
            Arg::new("DATA")
                .help("JSON数据文件或包含JSON文件的目录 / JSON data file or directory of JSON files")
                .default_value(defaults::DATA_PATH)
                .index(1),
        )
        .arg(
            Arg::new("range")
                .long("range")
                .short('R')
                .help("只保留效率在闭区间内的记录 / Keep records with efficiency in [MIN, MAX]")
                .value_name("MIN:MAX")
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('S')
                .help("显示单个发布组的详细记录 / Show detailed records for one source")
                .value_name("NAME")
                .conflicts_with("target"),
        )
        .arg(
            Arg::new("lower")
                .long("lower")
                .short('L')
                .help("最低发布数量 / Minimum number of releases per source")
                .value_name("N")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("codec")
                .long("codec")
                .short('C')
                .help("只保留指定编码 (h264, h265, av1) / Keep only this codec")
                .value_name("CODEC"),
        )
        .arg(
            Arg::new("hdr")
                .long("hdr")
                .short('H')
                .help("包含HDR记录（默认排除） / Include HDR releases (excluded by default)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("order")
                .long("order")
                .short('O')
                .help("排序方式: e=效率, r=发布数, a=名称 / Sort: e=efficiency, r=releases, a=alphabetical")
                .value_name("ORDER")
                .default_value(defaults::ORDER),
        )
        .arg(
            Arg::new("aggregate")
                .long("aggregate")
                .short('A')
                .help("聚合效率策略 / Aggregate efficiency policy (mean, weighted, median)")
                .value_name("POLICY")
                .default_value(defaults::AGGREGATE_POLICY),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('T')
                .help("按目标效率对发布组打分分级 / Score and tier groups against a target efficiency")
                .value_name("EFFICIENCY")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("tiers")
                .long("tiers")
                .short('k')
                .help("层级数量（默认按组数自动确定） / Number of tiers (default: chosen from group count)")
                .value_name("K")
                .value_parser(clap::value_parser!(usize))
                .requires("target"),
        )
        .arg(
            Arg::new("alias")
                .long("alias")
                .help("发布组别名，可重复 / Group alias, repeatable")
                .value_name("FROM=TO")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .help("排除的发布组，可重复 / Group to drop at load time, repeatable")
                .value_name("NAME")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("groups")
                .long("groups")
                .help("别名与黑名单JSON文件 / JSON file with aliases and blacklist")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("同时将排名导出为JSON文件 / Also export the ranking as JSON")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息 / Show diagnostic messages on stderr")
                .action(ArgAction::SetTrue),
        )
}

impl AppConfig {
    /// 从clap解析结果构建配置，选项取值错误时返回对应的错误类型
    pub fn from_matches(matches: &ArgMatches) -> ReportResult<Self> {
        let range = matches
            .get_one::<String>("range")
            .map(|value| value.parse::<EfficiencyRange>())
            .transpose()?;

        let codec = matches
            .get_one::<String>("codec")
            .map(|value| value.parse::<Codec>())
            .transpose()?;

        let order = match matches.get_one::<String>("order") {
            Some(value) => value.parse::<SortOrder>()?,
            None => SortOrder::default(),
        };

        let policy = match matches.get_one::<String>("aggregate") {
            Some(value) => value.parse::<AggregatePolicy>()?,
            None => AggregatePolicy::default(),
        };

        let tiering = match matches.get_one::<f64>("target") {
            Some(&target) => {
                let mut options = TierOptions::new(target);
                options.tiers = matches.get_one::<usize>("tiers").copied();
                options.validate()?;
                Some(options)
            }
            None => None,
        };

        let curation = curation_from_matches(matches)?;
        // -S 的名称与数据一样经过别名归一化
        let source = matches
            .get_one::<String>("source")
            .map(|name| curation.canonical_name(name));

        let data_path = matches
            .get_one::<String>("DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(defaults::DATA_PATH));

        Ok(AppConfig {
            data_path,
            request: ReportRequest {
                filter: FilterOptions {
                    range,
                    codec,
                    include_hdr: matches.get_flag("hdr"),
                    source,
                },
                lower: matches.get_one::<usize>("lower").copied(),
                order,
                policy,
                tiering,
            },
            curation,
            output_path: matches.get_one::<String>("output").map(PathBuf::from),
            verbose: matches.get_flag("verbose"),
        })
    }
}

/// 合并配置文件和命令行中的别名、黑名单（命令行优先）
fn curation_from_matches(matches: &ArgMatches) -> ReportResult<GroupCuration> {
    let mut curation = match matches.get_one::<String>("groups") {
        Some(path) => GroupCuration::from_file(Path::new(path))?,
        None => GroupCuration::new(),
    };

    for spec in matches.get_many::<String>("alias").into_iter().flatten() {
        let (from, to) = GroupCuration::parse_alias(spec)?;
        curation.add_alias(&from, &to)?;
    }
    for name in matches.get_many::<String>("exclude").into_iter().flatten() {
        curation.exclude(name);
    }

    Ok(curation)
}

/// 解析进程命令行参数（`--help`/用法错误由clap直接处理并退出）
pub fn parse_args() -> ReportResult<AppConfig> {
    let matches = build_command().get_matches();
    AppConfig::from_matches(&matches)
}

/// 从给定参数列表解析配置（首个元素为程序名）
pub fn parse_args_from<I, T>(args: I) -> ReportResult<AppConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command()
        .try_get_matches_from(args)
        .map_err(|e| ReportError::InvalidInput(e.to_string()))?;
    AppConfig::from_matches(&matches)
}

/// 显示程序启动信息（仅verbose模式，写到stderr）
pub fn show_startup_info(config: &AppConfig) {
    if config.verbose {
        eprintln!("[INFO] Release Ranker v{VERSION}");
        eprintln!("[INFO] 数据路径 / Data path: {}", config.data_path.display());
        eprintln!(
            "[INFO] 排序 / Order: {}, 聚合 / Aggregate: {}",
            config.request.order, config.request.policy
        );
        if let Some(tiering) = &config.request.tiering {
            match tiering.tiers {
                Some(tiers) => eprintln!(
                    "[INFO] 目标效率 / Target: {:.2}, 层级 / Tiers: {tiers}",
                    tiering.target
                ),
                None => eprintln!(
                    "[INFO] 目标效率 / Target: {:.2}, 层级 / Tiers: auto",
                    tiering.target
                ),
            }
        }
        if !config.curation.is_empty() {
            eprintln!("[INFO] 已启用发布组别名/黑名单 / Group aliases or blacklist active");
        }
    }
}
