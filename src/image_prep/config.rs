//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `PrepConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中质量档位（quality / balanced / speed）作为高层语义，映射到底层参数组合。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `QualityProfile` 负责档位字符串解析与反向输出。
//! - `apply_quality_profile` 将档位转换为具体的缩放滤镜与 PNG 压缩级别。
//! - `infer_quality_profile` 用于从当前配置反推档位。
//! - 支持 `serde` 序列化，可从 JSON 设置文件加载（缺省字段回退默认值）。

use fast_image_resize as fr;
use image::codecs::png::CompressionType;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use super::PrepError;
use super::source::Rgb;

/// 图片预处理配置。
///
/// 字段覆盖了解码、合成、缩放与编码四个阶段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// 输入文件允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 合成画布像素上限，避免极端比例导致超大分配。
    pub max_canvas_pixels: u64,
    /// Favicon 固定画布边长（像素）。
    pub favicon_size: u32,
    /// 不透明背景时的填充色。
    pub fill_color: Rgb,
    /// Favicon 缩放滤镜。
    pub resize_filter: ResampleFilter,
    /// PNG 压缩级别。
    pub png_compression: PngCompression,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            max_canvas_pixels: 64_000_000,
            favicon_size: 64,
            fill_color: Rgb::WHITE,
            resize_filter: ResampleFilter::Triangle,
            png_compression: PngCompression::Default,
        }
    }
}

impl PrepConfig {
    /// 从 JSON 字符串加载配置，未出现的字段使用默认值。
    ///
    /// # 示例
    /// ```rust
    /// use brand_image_prep::image_prep::PrepConfig;
    ///
    /// let config = PrepConfig::from_json_str(r#"{ "favicon_size": 32 }"#)?;
    /// assert_eq!(config.favicon_size, 32);
    /// # Ok::<(), brand_image_prep::image_prep::PrepError>(())
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, PrepError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PrepError::InvalidFormat(format!("解析配置失败：{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置取值范围。
    pub fn validate(&self) -> Result<(), PrepError> {
        if self.favicon_size == 0 || self.favicon_size > 1024 {
            return Err(PrepError::InvalidInput(
                "favicon_size 必须在 1~1024 之间".to_string(),
            ));
        }
        if self.max_decoded_pixels == 0 || self.max_canvas_pixels == 0 {
            return Err(PrepError::InvalidInput(
                "max_decoded_pixels 与 max_canvas_pixels 必须大于 0".to_string(),
            ));
        }
        if self.max_decoded_bytes < 4 * 1024 * 1024 {
            return Err(PrepError::InvalidInput(
                "max_decoded_bytes 不能小于 4MB".to_string(),
            ));
        }
        if self.max_file_size == 0 {
            return Err(PrepError::InvalidInput("max_file_size 必须大于 0".to_string()));
        }
        Ok(())
    }

    /// 基于当前参数反推质量档位。
    pub fn infer_quality_profile(&self) -> QualityProfile {
        match (self.resize_filter, self.png_compression) {
            (ResampleFilter::Lanczos3, PngCompression::Best) => QualityProfile::Quality,
            (ResampleFilter::Nearest, _) | (_, PngCompression::Fast) => QualityProfile::Speed,
            _ => QualityProfile::Balanced,
        }
    }

    /// 应用指定质量档位到实际参数。
    pub fn apply_quality_profile(&mut self, profile: QualityProfile) {
        match profile {
            QualityProfile::Quality => {
                self.resize_filter = ResampleFilter::Lanczos3;
                self.png_compression = PngCompression::Best;
            }
            QualityProfile::Balanced => {
                self.resize_filter = ResampleFilter::Triangle;
                self.png_compression = PngCompression::Default;
            }
            QualityProfile::Speed => {
                self.resize_filter = ResampleFilter::Nearest;
                self.png_compression = PngCompression::Fast;
            }
        }
    }
}

/// 质量档位（面向产品/用户语义）。
///
/// - `Quality`：缩放尽量保真、PNG 体积最小
/// - `Balanced`：质量与速度平衡
/// - `Speed`：优先处理速度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityProfile {
    Quality,
    Balanced,
    Speed,
}

impl QualityProfile {
    /// 从外部字符串解析档位。
    pub fn parse(profile: &str) -> Result<Self, PrepError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(PrepError::InvalidInput(format!(
                "未知质量档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串，供展示与持久化。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

/// 缩放滤镜。
///
/// `image::imageops::FilterType` 不支持 serde，这里单独定义并负责映射。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    pub(crate) fn to_image_filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }

    pub(crate) fn to_fast_algorithm(self) -> fr::ResizeAlg {
        match self {
            Self::Nearest => fr::ResizeAlg::Nearest,
            Self::Triangle => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            Self::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
            Self::Gaussian => fr::ResizeAlg::Convolution(fr::FilterType::Gaussian),
            Self::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }
}

/// PNG 压缩级别（无损，仅影响体积与速度）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PngCompression {
    Fast,
    Default,
    Best,
}

impl PngCompression {
    pub(crate) fn to_compression_type(self) -> CompressionType {
        match self {
            Self::Fast => CompressionType::Fast,
            Self::Default => CompressionType::Default,
            Self::Best => CompressionType::Best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_and_fallback_filters_agree() {
        assert_eq!(ResampleFilter::Gaussian.to_image_filter(), FilterType::Gaussian);
        assert!(matches!(
            ResampleFilter::Gaussian.to_fast_algorithm(),
            fr::ResizeAlg::Convolution(fr::FilterType::Gaussian)
        ));

        assert_eq!(ResampleFilter::Lanczos3.to_image_filter(), FilterType::Lanczos3);
        assert!(matches!(
            ResampleFilter::Lanczos3.to_fast_algorithm(),
            fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3)
        ));

        assert_eq!(ResampleFilter::Nearest.to_image_filter(), FilterType::Nearest);
        assert!(matches!(
            ResampleFilter::Nearest.to_fast_algorithm(),
            fr::ResizeAlg::Nearest
        ));
    }

    #[test]
    fn default_config_is_valid_and_balanced() {
        let config = PrepConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.infer_quality_profile(), QualityProfile::Balanced);
        assert_eq!(config.favicon_size, 64);
        assert_eq!(config.fill_color, Rgb::WHITE);
    }

    #[test]
    fn profile_round_trips_through_config() {
        let mut config = PrepConfig::default();

        for profile in [
            QualityProfile::Quality,
            QualityProfile::Speed,
            QualityProfile::Balanced,
        ] {
            config.apply_quality_profile(profile);
            assert_eq!(config.infer_quality_profile(), profile);
        }
    }

    #[test]
    fn profile_parse_is_case_insensitive() {
        assert_eq!(
            QualityProfile::parse("  SPEED ").expect("parse failed"),
            QualityProfile::Speed
        );
        assert_eq!(QualityProfile::Quality.as_str(), "quality");
        assert!(matches!(
            QualityProfile::parse("ultra"),
            Err(PrepError::InvalidInput(_))
        ));
    }

    #[test]
    fn json_config_fills_missing_fields_with_defaults() {
        let config = PrepConfig::from_json_str(
            r#"{ "resize_filter": "lanczos3", "fill_color": { "r": 0, "g": 0, "b": 0 } }"#,
        )
        .expect("config should parse");

        assert_eq!(config.resize_filter, ResampleFilter::Lanczos3);
        assert_eq!(config.fill_color, Rgb::BLACK);
        assert_eq!(config.max_decoded_pixels, PrepConfig::default().max_decoded_pixels);
    }

    #[test]
    fn json_config_rejects_out_of_range_values() {
        assert!(matches!(
            PrepConfig::from_json_str(r#"{ "favicon_size": 0 }"#),
            Err(PrepError::InvalidInput(_))
        ));
        assert!(matches!(
            PrepConfig::from_json_str("not json"),
            Err(PrepError::InvalidFormat(_))
        ));
    }
}
