//! 工具层集成测试
//!
//! 测试CLI解析、JSON数据加载和输出写入等工具模块的集成功能。

use release_efficiency_ranker::dataset::{
    Codec, CuratedLoader, GroupCuration, JsonLoader, RecordLoader,
};
use release_efficiency_ranker::error::ReportError;
use release_efficiency_ranker::report::{
    AggregatePolicy, RankingExport, ReportRequest, SortOrder, build_report,
};
use release_efficiency_ranker::tools::{self, parse_args_from};
use std::fs;
use std::path::PathBuf;

/// 为每个测试创建独立的临时目录
fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("release_rank_test_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

// ============================================================================
// CLI配置测试
// ============================================================================

/// 验证所有短选项正确映射到报告参数
#[test]
fn test_cli_short_options() {
    let config = parse_args_from([
        "release-rank", "data.json", "-R", "40:60", "-S", "DON", "-L", "3", "-C", "hevc", "-H",
        "-O", "r", "-A", "median", "-o", "ranking.json", "-v",
    ])
    .unwrap();

    let request = &config.request;
    let range = request.filter.range.unwrap();
    assert_eq!((range.min, range.max), (40.0, 60.0));
    assert_eq!(request.filter.source.as_deref(), Some("DON"));
    assert_eq!(request.lower, Some(3));
    assert_eq!(request.filter.codec, Some(Codec::H265));
    assert!(request.filter.include_hdr);
    assert_eq!(request.order, SortOrder::Releases);
    assert_eq!(request.policy, AggregatePolicy::Median);
    assert_eq!(config.data_path, PathBuf::from("data.json"));
    assert_eq!(config.output_path, Some(PathBuf::from("ranking.json")));
    assert!(config.verbose);
    println!("  ✓ 短选项解析正确");
}

/// 验证长选项形式
#[test]
fn test_cli_long_options() {
    let config = parse_args_from([
        "release-rank", "--range", "0.1:0.9", "--codec", "av1", "--order", "a", "--lower", "2",
    ])
    .unwrap();

    assert_eq!(config.request.filter.codec, Some(Codec::Av1));
    assert_eq!(config.request.order, SortOrder::Alphabetical);
    assert_eq!(config.request.lower, Some(2));
    assert!(!config.request.filter.include_hdr);
}

/// 错误类型名称（便于表驱动断言）
fn error_kind(err: &ReportError) -> &'static str {
    match err {
        ReportError::InvalidRangeFormat(_) => "range",
        ReportError::UnknownCodec(_) => "codec",
        ReportError::UnknownSource(_) => "source",
        ReportError::InvalidOrderOption(_) => "order",
        ReportError::InvalidInput(_) => "input",
        ReportError::IoError(_) => "io",
        ReportError::DataFormatError(_) => "data",
    }
}

/// 验证各类选项取值错误映射到正确的错误类型
#[test]
fn test_cli_malformed_values() {
    let cases = [
        (["release-rank", "-R", "40-60"], "range"),
        (["release-rank", "-R", "abc:1"], "range"),
        (["release-rank", "-C", "vp9"], "codec"),
        (["release-rank", "-O", "z"], "order"),
        (["release-rank", "-L", "many"], "input"),
        (["release-rank", "-A", "mode"], "input"),
    ];

    for (args, expected) in cases {
        let err = parse_args_from(args).expect_err("should fail");
        assert_eq!(error_kind(&err), expected, "{args:?} produced {err:?}");
        println!("  ✓ {args:?} -> {err}");
    }
}

// ============================================================================
// 数据加载测试
// ============================================================================

/// 验证单文件加载（顶层数组）
#[test]
fn test_load_single_file() {
    let dir = temp_dir("single");
    let file = dir.join("dataset.json");
    fs::write(
        &file,
        r#"[
            {"source": "DON", "codec": "h264", "hdr": false, "efficiency": 61.2, "size_gb": 12.5},
            {"source": "ZQ", "codec": "av1", "hdr": true, "efficiency": 33.0, "title": "Movie.2160p"}
        ]"#,
    )
    .unwrap();

    let records = JsonLoader::new(&file).load().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].size_gb, Some(12.5));
    assert_eq!(records[1].title.as_deref(), Some("Movie.2160p"));

    let _ = fs::remove_dir_all(&dir);
}

/// 验证目录加载：合并所有JSON文件，忽略其他文件
#[test]
fn test_load_directory_merges_json_files() {
    let dir = temp_dir("directory");
    fs::write(
        dir.join("a.json"),
        r#"{"records": [{"source": "DON", "codec": "x265", "efficiency": 50.0}]}"#,
    )
    .unwrap();
    fs::write(
        dir.join("b.json"),
        r#"[{"source": "ACE", "codec": "h264", "efficiency": 40.0}]"#,
    )
    .unwrap();
    fs::write(dir.join("notes.txt"), "not data").unwrap();

    let loader = JsonLoader::new(&dir);
    let files = loader.scan_data_files().unwrap();
    assert_eq!(files.len(), 2);

    let records = loader.load().unwrap();
    let sources: Vec<&str> = records.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(sources, ["DON", "ACE"]);

    let _ = fs::remove_dir_all(&dir);
}

/// 验证不存在的路径返回I/O错误
#[test]
fn test_load_nonexistent_path() {
    let missing = std::env::temp_dir()
        .join("release_rank_nonexistent_9a8b7c6d")
        .join("data.json");
    let result = JsonLoader::new(&missing).load();
    assert!(matches!(result, Err(ReportError::IoError(_))));
}

/// 验证损坏的JSON和非法编码返回数据格式错误
#[test]
fn test_load_malformed_data() {
    let dir = temp_dir("malformed");

    let broken = dir.join("broken.json");
    fs::write(&broken, "[{\"source\": \"DON\",").unwrap();
    assert!(matches!(
        JsonLoader::new(&broken).load(),
        Err(ReportError::DataFormatError(_))
    ));

    let bad_codec = dir.join("bad_codec.json");
    fs::write(
        &bad_codec,
        r#"[{"source": "DON", "codec": "mpeg2", "efficiency": 1.0}]"#,
    )
    .unwrap();
    assert!(matches!(
        JsonLoader::new(&bad_codec).load(),
        Err(ReportError::DataFormatError(_))
    ));

    let _ = fs::remove_dir_all(&dir);
}

/// 验证别名/黑名单配置文件在加载时生效，命令行参数叠加其上
#[test]
fn test_groups_config_curates_loaded_records() {
    let dir = temp_dir("curation");
    let data = dir.join("data.json");
    fs::write(
        &data,
        r#"[
            {"source": "BeyondHD", "codec": "h265", "efficiency": 50.0},
            {"source": "W4NK3R", "codec": "h265", "efficiency": 54.0},
            {"source": "HONE", "codec": "h264", "efficiency": 20.0},
            {"source": "DON", "codec": "h264", "efficiency": 60.0}
        ]"#,
    )
    .unwrap();
    let groups = dir.join("groups.json");
    fs::write(
        &groups,
        r#"{"aliases": {"beyondhd": "W4NK3R"}, "blacklist": ["hone"]}"#,
    )
    .unwrap();

    let config = parse_args_from([
        "release-rank".to_string(),
        data.display().to_string(),
        "--groups".to_string(),
        groups.display().to_string(),
        "--exclude".to_string(),
        "DON".to_string(),
    ])
    .unwrap();

    let records = CuratedLoader::new(JsonLoader::new(&config.data_path), config.curation)
        .load()
        .unwrap();
    let report = build_report(&records, &config.request).unwrap();
    assert_eq!(report.groups().len(), 1);
    assert_eq!(report.groups()[0].source, "W4NK3R");
    assert_eq!(report.groups()[0].release_count, 2);
    assert_eq!(report.groups()[0].efficiency, 52.0);
    println!("  ✓ 别名合并与黑名单剔除在加载时生效");

    let bad = dir.join("bad_groups.json");
    fs::write(&bad, r#"{"aliases": {"x": ""}}"#).unwrap();
    assert!(matches!(
        GroupCuration::from_file(&bad),
        Err(ReportError::InvalidInput(_))
    ));

    let _ = fs::remove_dir_all(&dir);
}

// ============================================================================
// 输出测试
// ============================================================================

/// 验证JSON排名导出
#[test]
fn test_ranking_export_written_to_file() {
    let dir = temp_dir("export");
    let data = dir.join("data.json");
    fs::write(
        &data,
        r#"[
            {"source": "B", "codec": "h264", "efficiency": 70.004},
            {"source": "A", "codec": "h264", "efficiency": 50.0},
            {"source": "B", "codec": "h265", "efficiency": 70.0}
        ]"#,
    )
    .unwrap();

    let records = JsonLoader::new(&data).load().unwrap();
    let request = ReportRequest::default();
    let report = build_report(&records, &request).unwrap();

    let export_path = dir.join("ranking.json");
    tools::write_export(&RankingExport::new(&report, &request), &export_path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(json["policy"], "mean");
    assert_eq!(json["order"], "efficiency");
    assert_eq!(json["ranking"][0]["source"], "B");
    assert_eq!(json["ranking"][0]["rank"], 1);
    assert_eq!(json["ranking"][0]["releases"], 2);
    assert_eq!(json["ranking"][0]["efficiency"], 70.0);
    assert_eq!(json["ranking"][1]["source"], "A");
    assert!(json["generated_at"].is_string());
    // 普通排名不带分级字段
    assert!(json.get("target").is_none());
    assert!(json["ranking"][0].get("tier").is_none());

    let _ = fs::remove_dir_all(&dir);
}
