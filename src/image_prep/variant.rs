//! # 变体配置表
//!
//! 四个固定变体的比例、最小尺寸、尺寸策略与背景策略集中在这里，
//! 编排层只根据表项调度，不再硬编码任何数值。
//!
//! | 变体 | 比例 | 最小尺寸 | 尺寸策略 | 背景 |
//! |------|------|----------|----------|------|
//! | 横版 Logo | 5:2 | 400×160 | 补边 | 跟随调用方 |
//! | 方形 Logo | 1:1 | 40×40 | 补边 | 跟随调用方 |
//! | Favicon | 1:1 | 固定画布 | 等比缩放 | 跟随调用方 |
//! | 证件照 | 73:100 | 292×400 | 补边 | 始终白色 |

use serde::{Deserialize, Serialize};

use super::fit::{AspectRatio, FitResult, fit, fit_scaled};
use super::source::{LogoOptions, RenderOptions};
use super::{PrepConfig, PrepError};

const RECTANGULAR_LOGO_RATIO: AspectRatio = AspectRatio::fixed(5, 2);
const SQUARE_RATIO: AspectRatio = AspectRatio::fixed(1, 1);
const HEADSHOT_RATIO: AspectRatio = AspectRatio::fixed(73, 100);

/// 输出变体。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    RectangularLogo,
    SquareLogo,
    Favicon,
    Headshot,
}

/// 尺寸策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    /// 仅补边到目标比例与最小尺寸，源图不缩放。
    PadToRatio {
        ratio: AspectRatio,
        min_width: u32,
        min_height: u32,
    },
    /// 固定正方形画布（边长取自 `PrepConfig::favicon_size`），源图等比缩放居中。
    ScaleToSquare,
}

/// 背景策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundPolicy {
    /// 由 `LogoOptions::use_transparent_background` 决定。
    CallerChoice,
    /// 始终使用配置中的不透明填充色。
    AlwaysOpaque,
}

impl VariantKind {
    /// Logo 系列的三个变体，按输出顺序排列。
    pub const LOGO_FAMILY: [VariantKind; 3] = [
        VariantKind::RectangularLogo,
        VariantKind::SquareLogo,
        VariantKind::Favicon,
    ];

    pub fn sizing(self) -> Sizing {
        match self {
            Self::RectangularLogo => Sizing::PadToRatio {
                ratio: RECTANGULAR_LOGO_RATIO,
                min_width: 400,
                min_height: 160,
            },
            Self::SquareLogo => Sizing::PadToRatio {
                ratio: SQUARE_RATIO,
                min_width: 40,
                min_height: 40,
            },
            Self::Favicon => Sizing::ScaleToSquare,
            Self::Headshot => Sizing::PadToRatio {
                ratio: HEADSHOT_RATIO,
                min_width: 292,
                min_height: 400,
            },
        }
    }

    pub fn background_policy(self) -> BackgroundPolicy {
        match self {
            Self::Headshot => BackgroundPolicy::AlwaysOpaque,
            _ => BackgroundPolicy::CallerChoice,
        }
    }

    /// 计算该变体下的画布几何。
    pub fn fit(
        self,
        source_width: u32,
        source_height: u32,
        config: &PrepConfig,
    ) -> Result<FitResult, PrepError> {
        match self.sizing() {
            Sizing::PadToRatio {
                ratio,
                min_width,
                min_height,
            } => fit(source_width, source_height, ratio, min_width, min_height),
            Sizing::ScaleToSquare => fit_scaled(source_width, source_height, config.favicon_size),
        }
    }

    /// 解析该变体的合成参数。
    pub fn render_options(self, logo: LogoOptions, config: &PrepConfig) -> RenderOptions {
        match self.background_policy() {
            BackgroundPolicy::CallerChoice if logo.use_transparent_background => {
                RenderOptions::transparent()
            }
            _ => RenderOptions::opaque(config.fill_color),
        }
    }

    /// 稳定标识，用于日志与下载文件名。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RectangularLogo => "logo-rectangular",
            Self::SquareLogo => "logo-square",
            Self::Favicon => "favicon",
            Self::Headshot => "headshot",
        }
    }
}
