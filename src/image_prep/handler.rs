//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImagePrep` 只负责流程编排与配置持有，不与任何界面或 IO 层绑定。
//! 处理链路固定为：
//! 1. 解码上传字节（可选，调用方也可直接提供位图）
//! 2. 按需裁剪
//! 3. 按需取色抠图
//! 4. 逐个变体执行“几何计算 → 合成 → 编码”
//!
//! ## 实现思路
//!
//! - 配置在构造后不可变，`ImagePrep` 为 `Send + Sync`，多个上传可在不同线程并行处理。
//! - 多变体请求是“全有或全无”：任一变体失败即整体返回错误，不返回残缺结果集。
//! - 记录 `decode/crop/key/render/total` 阶段耗时，便于性能诊断。

use std::time::Instant;

use super::codec;
use super::compositor;
use super::keyer;
use super::source::{
    Bitmap, CropRect, KeyingSpec, LogoOptions, LogoVariants, PrepOutput, PrepRequest, PrepTarget,
    ProcessedImage, RenderOptions,
};
use super::variant::VariantKind;
use super::{PrepConfig, PrepError, QualityProfile};

/// 图片预处理器。
pub struct ImagePrep {
    config: PrepConfig,
}

impl ImagePrep {
    /// 根据配置创建处理器，配置非法时直接返回错误。
    ///
    /// # 示例
    /// ```rust
    /// use brand_image_prep::image_prep::{ImagePrep, PrepConfig};
    ///
    /// let prep = ImagePrep::new(PrepConfig::default())?;
    /// assert_eq!(prep.config().favicon_size, 64);
    /// # Ok::<(), brand_image_prep::image_prep::PrepError>(())
    /// ```
    pub fn new(config: PrepConfig) -> Result<Self, PrepError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 在默认配置基础上应用质量档位。
    pub fn with_profile(profile: QualityProfile) -> Result<Self, PrepError> {
        let mut config = PrepConfig::default();
        config.apply_quality_profile(profile);

        log::info!(
            "⚙️ 图片预处理档位：{}（filter={:?}, png={:?}）",
            profile.as_str(),
            config.resize_filter,
            config.png_compression
        );

        Self::new(config)
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    /// 解码上传的原始字节。
    pub fn decode(&self, bytes: &[u8]) -> Result<Bitmap, PrepError> {
        codec::decode(bytes, &self.config)
    }

    /// 裁剪为子位图。
    pub fn crop(&self, bitmap: &Bitmap, rect: CropRect) -> Result<Bitmap, PrepError> {
        compositor::crop(bitmap, rect)
    }

    /// 取色抠图（朴素颜色距离，不涉及任何分割模型）。
    pub fn remove_background(&self, bitmap: Bitmap, spec: &KeyingSpec) -> Bitmap {
        keyer::key_out(bitmap, spec)
    }

    /// 生成单个变体。
    pub fn process_variant(
        &self,
        bitmap: &Bitmap,
        kind: VariantKind,
        options: &RenderOptions,
    ) -> Result<ProcessedImage, PrepError> {
        let (width, height) = bitmap.dimensions();
        let fit = kind.fit(width, height, &self.config)?;
        let bytes = compositor::render(bitmap, &fit, options, &self.config)?;

        log::debug!(
            "变体 {} 完成 - 源图 {}x{} 画布 {}x{} 内容 {}x{} 偏移 ({}, {}) 输出 {}KB",
            kind.as_str(),
            width,
            height,
            fit.canvas_width,
            fit.canvas_height,
            fit.content_width,
            fit.content_height,
            fit.offset_x,
            fit.offset_y,
            bytes.len() / 1024
        );

        Ok(ProcessedImage::new(kind, fit, bytes))
    }

    /// 生成 Logo 系列三个变体（横版、方形、Favicon）。
    ///
    /// # 示例
    /// ```rust
    /// use brand_image_prep::image_prep::{Bitmap, ImagePrep, LogoOptions, PrepConfig};
    ///
    /// let prep = ImagePrep::new(PrepConfig::default())?;
    /// let bitmap = Bitmap::from_rgba(1, 1, vec![0, 0, 0, 255])?;
    /// let variants = prep.process_logo_variants(&bitmap, LogoOptions::default())?;
    /// assert_eq!(variants.rectangular.fit().canvas_width, 400);
    /// # Ok::<(), brand_image_prep::image_prep::PrepError>(())
    /// ```
    pub fn process_logo_variants(
        &self,
        bitmap: &Bitmap,
        options: LogoOptions,
    ) -> Result<LogoVariants, PrepError> {
        let render = |kind: VariantKind| {
            self.process_variant(bitmap, kind, &kind.render_options(options, &self.config))
        };

        Ok(LogoVariants {
            rectangular: render(VariantKind::RectangularLogo)?,
            square: render(VariantKind::SquareLogo)?,
            favicon: render(VariantKind::Favicon)?,
        })
    }

    /// 生成证件照变体（始终白底、只补边不缩放）。
    pub fn process_headshot(&self, bitmap: &Bitmap) -> Result<ProcessedImage, PrepError> {
        let kind = VariantKind::Headshot;
        let options = kind.render_options(LogoOptions::default(), &self.config);
        self.process_variant(bitmap, kind, &options)
    }

    /// 处理主入口：字节 → 位图 → 裁剪 → 抠图 → 变体集合。
    pub fn prepare(&self, bytes: &[u8], request: PrepRequest) -> Result<PrepOutput, PrepError> {
        let total_start = Instant::now();

        let decode_start = Instant::now();
        let bitmap = self.decode(bytes)?;
        let decode_elapsed = decode_start.elapsed();

        let crop_start = Instant::now();
        let bitmap = match request.crop {
            Some(rect) => self.crop(&bitmap, rect)?,
            None => bitmap,
        };
        let crop_elapsed = crop_start.elapsed();

        let key_start = Instant::now();
        let bitmap = match request.background_removal {
            Some(spec) => self.remove_background(bitmap, &spec),
            None => bitmap,
        };
        let key_elapsed = key_start.elapsed();

        let render_start = Instant::now();
        let output = match request.target {
            PrepTarget::Logo(options) => {
                PrepOutput::Logo(self.process_logo_variants(&bitmap, options)?)
            }
            PrepTarget::Headshot => PrepOutput::Headshot(self.process_headshot(&bitmap)?),
        };
        let render_elapsed = render_start.elapsed();

        log::info!(
            "✅ 图片预处理完成 - 源图 {}x{} decode={}ms crop={}ms key={}ms render={}ms total={}ms",
            bitmap.width(),
            bitmap.height(),
            decode_elapsed.as_millis(),
            crop_elapsed.as_millis(),
            key_elapsed.as_millis(),
            render_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(output)
    }
}
