//! 发布记录数据模型
//!
//! 记录在加载时创建，之后只读；进程退出时丢弃。

use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 视频编码格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Codec {
    H264,
    H265,
    Av1,
}

impl Codec {
    /// 所有可识别的编码格式（用于错误提示）
    pub const ALL: [Codec; 3] = [Codec::H264, Codec::H265, Codec::Av1];

    /// 规范化名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Codec::H264 => "h264",
            Codec::H265 => "h265",
            Codec::Av1 => "av1",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Codec {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "h264" | "h.264" | "x264" | "avc" => Ok(Codec::H264),
            "h265" | "h.265" | "x265" | "hevc" => Ok(Codec::H265),
            "av1" => Ok(Codec::Av1),
            _ => Err(ReportError::UnknownCodec(s.to_string())),
        }
    }
}

impl TryFrom<String> for Codec {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Codec> for String {
    fn from(codec: Codec) -> Self {
        codec.as_str().to_string()
    }
}

/// 单条发布记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    /// 发布组名称
    pub source: String,
    pub codec: Codec,
    #[serde(default)]
    pub hdr: bool,
    /// 效率分数（体积/质量权衡）
    pub efficiency: f64,
    /// 发布标题（可选，仅用于详情展示）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// 编码体积（GB，可选，加权平均时作为权重）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<f64>,
}

impl ReleaseRecord {
    /// 创建不带可选信息的记录
    pub fn new(source: impl Into<String>, codec: Codec, hdr: bool, efficiency: f64) -> Self {
        Self {
            source: source.into(),
            codec,
            hdr,
            efficiency,
            title: None,
            size_gb: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_size_gb(mut self, size_gb: f64) -> Self {
        self.size_gb = Some(size_gb);
        self
    }

    /// 加载后的合法性检查
    pub fn validate(&self) -> ReportResult<()> {
        if self.source.trim().is_empty() {
            return Err(ReportError::DataFormatError(
                "发布组名称为空 / empty source name".to_string(),
            ));
        }
        if !self.efficiency.is_finite() {
            return Err(ReportError::DataFormatError(format!(
                "效率值无效 / non-finite efficiency for source '{}'",
                self.source
            )));
        }
        if let Some(size) = self.size_gb
            && !size.is_finite()
        {
            return Err(ReportError::DataFormatError(format!(
                "体积无效 / non-finite size_gb for source '{}'",
                self.source
            )));
        }
        Ok(())
    }
}
