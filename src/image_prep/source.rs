//! # 数据模型
//!
//! ## 设计思路
//!
//! 将“外部输入”“流水线中间结果”“最终产物”解耦：
//! - `Bitmap` 表示已解码、尺寸合法的 RGBA 位图
//! - `RenderOptions` / `KeyingSpec` / `CropRect` 表示单次请求的参数
//! - `ProcessedImage` 表示已编码、交还给调用方的产物
//!
//! 原先散落在界面层的全局状态（当前标签页、是否透明背景等）
//! 统一收敛为 `PrepRequest`，按请求显式传递。

use base64::{Engine as _, engine::general_purpose};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::PrepError;
use super::fit::FitResult;
use super::variant::VariantKind;

/// 已解码的 RGBA8 位图（行优先、自上而下）。
///
/// 宽高恒大于 0：零面积位图在构造阶段即被拒绝，后续阶段无需重复判断。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    /// 从原始 RGBA 字节构造位图。
    ///
    /// # 示例
    /// ```rust
    /// use brand_image_prep::image_prep::Bitmap;
    ///
    /// let bitmap = Bitmap::from_rgba(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255])?;
    /// assert_eq!(bitmap.dimensions(), (2, 1));
    /// # Ok::<(), brand_image_prep::image_prep::PrepError>(())
    /// ```
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, PrepError> {
        Self::ensure_non_empty(width, height)?;

        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(4))
            .ok_or_else(|| PrepError::ResourceLimit("位图尺寸导致内存溢出风险".to_string()))?;

        if pixels.len() != expected_len {
            return Err(PrepError::InvalidInput(format!(
                "像素数据长度异常：期望 {} 字节，实际 {} 字节",
                expected_len,
                pixels.len()
            )));
        }

        let image = RgbaImage::from_raw(width, height, pixels)
            .ok_or_else(|| PrepError::InvalidInput("像素缓冲与尺寸不匹配".to_string()))?;

        Ok(Self { image })
    }

    /// 从 `image` 的 RGBA 缓冲构造位图。
    pub fn from_image(image: RgbaImage) -> Result<Self, PrepError> {
        Self::ensure_non_empty(image.width(), image.height())?;
        Ok(Self { image })
    }

    fn ensure_non_empty(width: u32, height: u32) -> Result<(), PrepError> {
        if width == 0 || height == 0 {
            return Err(PrepError::InvalidInput(format!(
                "位图尺寸无效：{}x{}（宽高必须大于 0）",
                width, height
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// RGBA 字节（`width * height * 4`）。
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// 仅供取色抠图原地修改 alpha 通道。
    pub(crate) fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }
}

/// 不透明 RGB 颜色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// 画布背景填充方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "color")]
pub enum BackgroundMode {
    /// 不透明纯色填充（alpha = 255）。
    Opaque(Rgb),
    /// 全透明填充（alpha = 0，颜色无意义）。
    Transparent,
}

/// 合成阶段参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub background: BackgroundMode,
}

impl RenderOptions {
    pub const fn opaque(fill: Rgb) -> Self {
        Self {
            background: BackgroundMode::Opaque(fill),
        }
    }

    pub const fn transparent() -> Self {
        Self {
            background: BackgroundMode::Transparent,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::opaque(Rgb::WHITE)
    }
}

/// 取色抠图参数：目标颜色 + 欧氏距离容差（通常为 0~255 量级）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyingSpec {
    target: Rgb,
    tolerance: f64,
}

impl KeyingSpec {
    /// 创建抠图参数。容差必须是有限的非负数。
    pub fn new(target: Rgb, tolerance: f64) -> Result<Self, PrepError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(PrepError::InvalidInput(format!(
                "抠图容差无效：{}（必须为有限非负数）",
                tolerance
            )));
        }
        Ok(Self { target, tolerance })
    }

    /// 以左上角像素颜色作为背景色。
    ///
    /// 适用于纯色背景的 Logo：角落几乎总是背景。
    pub fn sampled_from_corner(bitmap: &Bitmap, tolerance: f64) -> Result<Self, PrepError> {
        let corner = bitmap.as_image().get_pixel(0, 0);
        Self::new(Rgb::new(corner[0], corner[1], corner[2]), tolerance)
    }

    pub fn target(&self) -> Rgb {
        self.target
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// 裁剪矩形（位图像素坐标）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// 输出编码格式。
///
/// Favicon 同样输出 PNG，不生成 ICO 容器。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
        }
    }
}

/// 单个变体的最终产物：编码字节 + 格式 + 生成它的几何结果。
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    variant: VariantKind,
    format: OutputFormat,
    fit: FitResult,
    bytes: Vec<u8>,
}

impl ProcessedImage {
    pub(crate) fn new(variant: VariantKind, fit: FitResult, bytes: Vec<u8>) -> Self {
        Self {
            variant,
            format: OutputFormat::Png,
            fit,
            bytes,
        }
    }

    pub fn variant(&self) -> VariantKind {
        self.variant
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn fit(&self) -> &FitResult {
        &self.fit
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// 下载时建议使用的文件名，例如 `logo-rectangular.png`。
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.variant.as_str(), self.format.extension())
    }

    /// 输出 `data:image/png;base64,...`，供预览或下载链接直接使用。
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Logo 系列请求参数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoOptions {
    pub use_transparent_background: bool,
}

/// Logo 系列三个变体的结果集（全部成功才返回）。
#[derive(Debug, Clone)]
pub struct LogoVariants {
    pub rectangular: ProcessedImage,
    pub square: ProcessedImage,
    pub favicon: ProcessedImage,
}

impl LogoVariants {
    pub fn iter(&self) -> impl Iterator<Item = &ProcessedImage> {
        [&self.rectangular, &self.square, &self.favicon].into_iter()
    }
}

/// 单次上传的目标系列。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepTarget {
    Logo(LogoOptions),
    Headshot,
}

/// 单次上传的完整请求参数。
#[derive(Debug, Clone, Copy)]
pub struct PrepRequest {
    pub target: PrepTarget,
    /// 先裁剪再做后续处理。
    pub crop: Option<CropRect>,
    /// 合成前先执行取色抠图。
    pub background_removal: Option<KeyingSpec>,
}

impl PrepRequest {
    pub fn logo(options: LogoOptions) -> Self {
        Self {
            target: PrepTarget::Logo(options),
            crop: None,
            background_removal: None,
        }
    }

    pub fn headshot() -> Self {
        Self {
            target: PrepTarget::Headshot,
            crop: None,
            background_removal: None,
        }
    }

    pub fn with_crop(mut self, rect: CropRect) -> Self {
        self.crop = Some(rect);
        self
    }

    pub fn with_background_removal(mut self, spec: KeyingSpec) -> Self {
        self.background_removal = Some(spec);
        self
    }
}

/// `prepare` 的产物，按目标系列区分。
#[derive(Debug, Clone)]
pub enum PrepOutput {
    Logo(LogoVariants),
    Headshot(ProcessedImage),
}
